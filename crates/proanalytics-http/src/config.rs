//! Serializable client configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use proanalytics_core::{
    ApiBaseUrls, BackoffConfig, Environment, PartialApiContext, ProAnalyticsError,
    RateLimiterConfig, RequestOptions, SupportedChainId,
};

/// Token bucket settings in "N requests per interval" form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimiterSettings {
    #[serde(default = "default_tokens_per_interval")]
    pub tokens_per_interval: u32,
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

fn default_tokens_per_interval() -> u32 { 5 }
fn default_interval_ms() -> u64 { 1_000 }

impl From<&RateLimiterSettings> for RateLimiterConfig {
    fn from(s: &RateLimiterSettings) -> Self {
        RateLimiterConfig::per_interval(s.tokens_per_interval, Duration::from_millis(s.interval_ms))
    }
}

/// Backoff settings with millisecond durations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackoffSettings {
    #[serde(default = "default_num_of_attempts")]
    pub num_of_attempts: u32,
    #[serde(default = "default_starting_delay_ms")]
    pub starting_delay_ms: u64,
    #[serde(default = "default_time_multiple")]
    pub time_multiple: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_delay_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_total_delay_ms: Option<u64>,
}

fn default_num_of_attempts() -> u32 { 10 }
fn default_starting_delay_ms() -> u64 { 100 }
fn default_time_multiple() -> f64 { 2.0 }

impl From<&BackoffSettings> for BackoffConfig {
    fn from(s: &BackoffSettings) -> Self {
        BackoffConfig {
            num_of_attempts: s.num_of_attempts,
            starting_delay: Duration::from_millis(s.starting_delay_ms),
            time_multiple: s.time_multiple,
            max_delay: s.max_delay_ms.map(Duration::from_millis),
            max_total_delay: s.max_total_delay_ms.map(Duration::from_millis),
        }
    }
}

/// Everything needed to build a [`ProAnalyticsClient`](crate::ProAnalyticsClient).
///
/// Every field is optional in the serialized form:
/// ```json
/// { "chain_id": 1891, "env": "staging", "rate_limiter": { "tokens_per_interval": 2 } }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<SupportedChainId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<Environment>,
    /// chain id → base URL; replaces the built-in tables when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_urls: Option<ApiBaseUrls>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_limiter: Option<RateLimiterSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backoff: Option<BackoffSettings>,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_request_timeout_ms() -> u64 { 30_000 }

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            chain_id: None,
            env: None,
            base_urls: None,
            rate_limiter: None,
            backoff: None,
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl ClientConfig {
    pub fn from_json(json: &str) -> Result<Self, ProAnalyticsError> {
        serde_json::from_str(json).map_err(|e| ProAnalyticsError::Configuration {
            reason: format!("invalid client config: {e}"),
        })
    }

    pub fn context(&self) -> PartialApiContext {
        PartialApiContext {
            chain_id: self.chain_id,
            env: self.env,
            base_urls: self.base_urls.clone(),
        }
    }

    pub fn options(&self) -> RequestOptions {
        RequestOptions {
            rate_limiter: self.rate_limiter.as_ref().map(RateLimiterConfig::from),
            backoff: self.backoff.as_ref().map(BackoffConfig::from),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_uses_defaults() {
        let cfg = ClientConfig::from_json("{}").unwrap();
        assert!(cfg.context().is_empty());
        assert!(cfg.options().rate_limiter.is_none());
        assert_eq!(cfg.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn full_json() {
        let cfg = ClientConfig::from_json(
            r#"{
                "chain_id": 1891,
                "env": "staging",
                "base_urls": { "1891": "https://pegasus.example" },
                "rate_limiter": { "tokens_per_interval": 2, "interval_ms": 500 },
                "backoff": { "num_of_attempts": 3, "max_total_delay_ms": 2000 },
                "request_timeout_ms": 5000
            }"#,
        )
        .unwrap();

        let ctx = cfg.context();
        assert_eq!(ctx.chain_id, Some(SupportedChainId::LightlinkPegasusTestnet));
        assert_eq!(ctx.env, Some(Environment::Staging));
        assert_eq!(
            ctx.base_urls.unwrap().get(SupportedChainId::LightlinkPegasusTestnet),
            Some("https://pegasus.example")
        );

        let opts = cfg.options();
        let limiter = opts.rate_limiter.unwrap();
        assert_eq!(limiter.capacity, 2.0);
        assert_eq!(limiter.refill_rate, 4.0);
        let backoff = opts.backoff.unwrap();
        assert_eq!(backoff.num_of_attempts, 3);
        assert_eq!(backoff.starting_delay, Duration::from_millis(100));
        assert_eq!(backoff.max_total_delay, Some(Duration::from_secs(2)));
        assert_eq!(cfg.request_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn unsupported_chain_rejected() {
        let err = ClientConfig::from_json(r#"{"chain_id": 1}"#).unwrap_err();
        assert!(err.is_configuration());
    }
}
