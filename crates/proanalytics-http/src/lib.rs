//! proanalytics-http: Pro Analytics API client over `reqwest`.
//!
//! # Quick start
//! ```rust,no_run
//! use proanalytics_core::{Environment, PartialApiContext};
//! use proanalytics_http::ProAnalyticsClient;
//!
//! # async fn run() -> Result<(), proanalytics_core::ProAnalyticsError> {
//! let client = ProAnalyticsClient::default_client()?;
//! let version = client.get_version(&PartialApiContext::default()).await?;
//! let staging = client
//!     .get_version(&PartialApiContext::env(Environment::Staging))
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod transport;

pub use client::ProAnalyticsClient;
pub use config::{BackoffSettings, ClientConfig, RateLimiterSettings};
pub use transport::{ReqwestTransport, DEFAULT_REQUEST_TIMEOUT};
