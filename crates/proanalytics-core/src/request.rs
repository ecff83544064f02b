//! Request and response types exchanged with the HTTP transport.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::endpoints::join_url;
use crate::error::RequestFailure;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What an API operation asks for, independent of where it is sent.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchParams {
    pub path: String,
    pub method: HttpMethod,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl FetchParams {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method,
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(HttpMethod::Post, path).with_body(body)
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Bind these parameters to a resolved base URL.
    pub fn to_request(&self, base_url: &str) -> HttpRequest {
        HttpRequest {
            url: join_url(base_url, &self.path),
            method: self.method,
            query: self.query.clone(),
            body: self.body.clone(),
        }
    }
}

/// A fully resolved request handed to the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

/// Raw response returned by the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: None,
            body: body.into(),
        }
    }

    pub fn json(status: u16, body: &Value) -> Self {
        Self {
            status,
            content_type: Some("application/json".into()),
            body: body.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.contains("json"))
    }

    /// Decode a success body into `T`.
    ///
    /// `204` and empty bodies decode from `null`, JSON content types are parsed
    /// as JSON, and anything else is treated as a JSON string so plain-text
    /// endpoints can decode into `String`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, RequestFailure> {
        let decoded = if self.status == 204 || self.body.is_empty() {
            serde_json::from_value(Value::Null)
        } else if self.is_json() {
            serde_json::from_str(&self.body)
        } else {
            serde_json::from_value(Value::String(self.body.clone()))
        };
        decoded.map_err(|e| RequestFailure::Malformed(e.to_string()))
    }

    /// Code and human-readable detail from a JSON API error body.
    pub fn api_error(&self) -> ApiErrorBody {
        let Ok(value) = serde_json::from_str::<Value>(&self.body) else {
            return ApiErrorBody::default();
        };
        let field = |keys: &[&str]| {
            keys.iter().find_map(|key| match value.get(key)? {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
        };
        ApiErrorBody {
            code: field(&["errorType", "error_code", "code"]),
            description: field(&["description", "message"]),
        }
    }
}

/// Fields the API puts in error responses. Both are absent for non-JSON bodies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiErrorBody {
    pub code: Option<String>,
    pub description: Option<String>,
}
