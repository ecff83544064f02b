//! Rate-limited, backoff-retried dispatch of a single logical request.

use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::error::{ProAnalyticsError, RequestFailure};
use crate::policy::{BackoffPolicy, RateLimiter};
use crate::request::{ApiErrorBody, FetchParams};
use crate::transport::HttpTransport;

/// Send `params` to `base_url` and decode the success body into `T`.
///
/// Every attempt, including retries, first takes a token from `limiter`, so a
/// flaky endpoint never receives more traffic than the limiter allows.
/// Transient failures (network, timeout, 5xx) are retried on the `backoff`
/// schedule; 4xx responses and undecodable bodies fail immediately.
pub async fn dispatch<T: DeserializeOwned>(
    transport: &dyn HttpTransport,
    limiter: &RateLimiter,
    base_url: &str,
    params: &FetchParams,
    backoff: &BackoffPolicy,
) -> Result<T, ProAnalyticsError> {
    let req = params.to_request(base_url);
    let endpoint = req.url.clone();

    let mut attempt = 0u32;
    let mut slept = Duration::ZERO;
    loop {
        attempt += 1;
        limiter.acquire().await;

        let (failure, api_error) = match transport.execute(req.clone()).await {
            Ok(resp) if resp.is_success() => match resp.decode::<T>() {
                Ok(value) => {
                    tracing::trace!(attempt, url = %endpoint, status = resp.status, "request succeeded");
                    return Ok(value);
                }
                Err(failure) => (failure, ApiErrorBody::default()),
            },
            Ok(resp) => {
                let api_error = resp.api_error();
                let failure = RequestFailure::Status {
                    status: resp.status,
                    body: resp.body,
                };
                (failure, api_error)
            }
            Err(e) => (RequestFailure::from(e), ApiErrorBody::default()),
        };

        if !failure.is_transient() {
            tracing::debug!(attempt, error = %failure, url = %endpoint, "request failed, not retrying");
            return Err(ProAnalyticsError::Terminal {
                endpoint,
                attempts: attempt,
                failure,
                error_code: api_error.code,
                description: api_error.description,
            });
        }

        match backoff.next_delay(attempt, slept) {
            Some(delay) => {
                tracing::warn!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %failure,
                    url = %endpoint,
                    "retrying request"
                );
                tokio::time::sleep(delay).await;
                slept += delay;
            }
            None => {
                tracing::error!(attempt, error = %failure, url = %endpoint, "max retries exceeded");
                return Err(ProAnalyticsError::RetriesExhausted {
                    endpoint,
                    attempts: attempt,
                    last: failure,
                });
            }
        }
    }
}
