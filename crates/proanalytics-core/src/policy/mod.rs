//! Request policies applied to every attempt.
//!
//! ```text
//! Attempt → [RateLimiter] → [Transport] → on transient failure: [BackoffPolicy] → Attempt
//! ```

pub mod backoff;
pub mod rate_limiter;

pub use backoff::{BackoffConfig, BackoffPolicy};
pub use rate_limiter::{RateLimiter, RateLimiterConfig};
