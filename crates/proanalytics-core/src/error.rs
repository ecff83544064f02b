//! Error types for the request pipeline.

use thiserror::Error;

/// Failures reported by an [`HttpTransport`](crate::transport::HttpTransport)
/// before any HTTP status was received.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// Connection refused, DNS failure, reset, etc.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The attempt timed out at the transport layer.
    #[error("Request timed out after {ms}ms")]
    Timeout { ms: u64 },
}

/// Outcome of a single failed attempt.
#[derive(Debug, Clone, Error)]
pub enum RequestFailure {
    /// The transport never produced a response.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The server answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// A success status whose body could not be decoded into the expected type.
    #[error("Malformed response body: {0}")]
    Malformed(String),
}

impl RequestFailure {
    /// Returns `true` if the failure is worth retrying: network errors,
    /// timeouts and 5xx responses.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Status { status, .. } => *status >= 500,
            Self::Malformed(_) => false,
        }
    }

    /// HTTP status, when one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Errors surfaced by the Pro Analytics client.
#[derive(Debug, Error)]
pub enum ProAnalyticsError {
    /// The resolved URL table has no usable entry, or the client was built
    /// from invalid settings.
    #[error("Configuration error: {reason}")]
    Configuration { reason: String },

    /// A raw chain id outside the supported set.
    #[error("Unsupported chain id: {0}")]
    UnsupportedChain(u64),

    /// An environment tag other than `prod` or `staging`.
    #[error("Unknown environment: {0}")]
    UnknownEnvironment(String),

    /// 4xx or undecodable success body. Never retried.
    #[error("Request to {endpoint} failed: {failure}")]
    Terminal {
        endpoint: String,
        attempts: u32,
        failure: RequestFailure,
        /// Machine-readable code from the error body, if the API sent one.
        error_code: Option<String>,
        /// `description`/`message` from the error body, if the API sent one.
        description: Option<String>,
    },

    /// The retry budget ran out while the endpoint kept failing transiently.
    #[error("Request to {endpoint} failed after {attempts} attempts: {last}")]
    RetriesExhausted {
        endpoint: String,
        attempts: u32,
        last: RequestFailure,
    },
}

impl ProAnalyticsError {
    /// Returns `true` for configuration mistakes (as opposed to request outcomes).
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::Configuration { .. } | Self::UnsupportedChain(_) | Self::UnknownEnvironment(_)
        )
    }

    /// Endpoint the failing request targeted.
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            Self::Terminal { endpoint, .. } | Self::RetriesExhausted { endpoint, .. } => {
                Some(endpoint)
            }
            _ => None,
        }
    }

    /// Number of HTTP attempts made before giving up.
    pub fn attempts(&self) -> Option<u32> {
        match self {
            Self::Terminal { attempts, .. } | Self::RetriesExhausted { attempts, .. } => {
                Some(*attempts)
            }
            _ => None,
        }
    }

    /// HTTP status of the last failed attempt.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Terminal { failure, .. } => failure.status(),
            Self::RetriesExhausted { last, .. } => last.status(),
            _ => None,
        }
    }

    /// Human-readable detail the API returned with a terminal failure.
    pub fn description(&self) -> Option<&str> {
        match self {
            Self::Terminal { description, .. } => description.as_deref(),
            _ => None,
        }
    }

    pub(crate) fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }
}
