//! The `HttpTransport` trait: the single HTTP primitive the pipeline calls into.

use async_trait::async_trait;

use crate::error::TransportError;
use crate::request::{HttpRequest, HttpResponse};

/// Performs one HTTP exchange.
///
/// Implementations return every received response as `Ok`, whatever its
/// status; classification and retry happen in [`dispatch`](crate::dispatch).
///
/// # Object Safety
/// The trait is object-safe and can be stored as `Arc<dyn HttpTransport>`.
#[async_trait]
pub trait HttpTransport: Send + Sync + 'static {
    async fn execute(&self, req: HttpRequest) -> Result<HttpResponse, TransportError>;

    /// Short identifier for logs.
    fn name(&self) -> &str {
        "http"
    }
}
