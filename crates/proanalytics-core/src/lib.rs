//! proanalytics-core: request pipeline for the Pro Analytics API.
//!
//! # Overview
//!
//! A request names a logical target (network + environment) rather than a
//! URL. The core crate turns that into an HTTP exchange:
//!
//! ```text
//! ApiContext ⊕ override → locate(base URL) → RateLimiter → dispatch (retry) → T
//! ```
//!
//! - [`SupportedChainId`] / [`Environment`]: the closed set of targets
//! - [`ApiContext`] / [`PartialApiContext`]: context and per-call override
//! - [`endpoints`]: built-in base URL tables and [`locate`]
//! - [`policy`]: token bucket rate limiter and backoff schedule
//! - [`dispatch()`]: retrying dispatcher over an [`HttpTransport`]

pub mod chain;
pub mod context;
pub mod dispatch;
pub mod endpoints;
pub mod error;
pub mod policy;
pub mod request;
pub mod transport;

pub use chain::{map_supported_networks, SupportedChainId};
pub use context::{ApiContext, Environment, PartialApiContext, RequestOptions};
pub use dispatch::dispatch;
pub use endpoints::{default_base_url, locate, ApiBaseUrls};
pub use error::{ProAnalyticsError, RequestFailure, TransportError};
pub use policy::{BackoffConfig, BackoffPolicy, RateLimiter, RateLimiterConfig};
pub use request::{ApiErrorBody, FetchParams, HttpMethod, HttpRequest, HttpResponse};
pub use transport::HttpTransport;
