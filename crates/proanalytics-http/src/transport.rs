//! `HttpTransport` backed by `reqwest`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

use proanalytics_core::error::{ProAnalyticsError, TransportError};
use proanalytics_core::request::{HttpMethod, HttpRequest, HttpResponse};
use proanalytics_core::transport::HttpTransport;

/// Per-attempt timeout applied when none is configured.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Production transport: one `reqwest::Client` with a per-attempt timeout.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
    timeout: Duration,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, ProAnalyticsError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProAnalyticsError::Configuration {
                reason: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self { http, timeout })
    }

    /// Wrap an existing client. `timeout` is only used for error reporting.
    pub fn from_client(http: reqwest::Client, timeout: Duration) -> Self {
        Self { http, timeout }
    }
}

fn to_reqwest(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self
            .http
            .request(to_reqwest(req.method), &req.url)
            .header(CONTENT_TYPE, "application/json");
        if !req.query.is_empty() {
            builder = builder.query(&req.query);
        }
        if let Some(body) = &req.body {
            builder = builder.json(body);
        }

        let resp = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout {
                    ms: self.timeout.as_millis() as u64,
                }
            } else {
                TransportError::Http(e.to_string())
            }
        })?;

        let status = resp.status().as_u16();
        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let body = resp
            .text()
            .await
            .map_err(|e| TransportError::Http(e.to_string()))?;

        Ok(HttpResponse {
            status,
            content_type,
            body,
        })
    }

    fn name(&self) -> &str {
        "reqwest"
    }
}
