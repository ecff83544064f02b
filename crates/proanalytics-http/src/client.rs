//! Pro Analytics API client.
//!
//! Each call:
//! - merges the per-call override into the client context
//! - resolves the base URL for the effective (env, chain)
//! - dispatches through the client's rate limiter with exponential backoff

use std::sync::Arc;

use serde::de::DeserializeOwned;

use proanalytics_core::{
    dispatch, locate, ApiContext, BackoffPolicy, FetchParams, HttpTransport, PartialApiContext,
    ProAnalyticsError, RateLimiter, RequestOptions,
};

use crate::config::ClientConfig;
use crate::transport::{ReqwestTransport, DEFAULT_REQUEST_TIMEOUT};

/// Client for the Pro Analytics HTTP API.
///
/// Owns one rate limiter; every request issued through this instance, retries
/// included, shares its tokens. Separate instances never share limits.
pub struct ProAnalyticsClient {
    context: ApiContext,
    transport: Arc<dyn HttpTransport>,
    rate_limiter: RateLimiter,
    backoff: BackoffPolicy,
}

impl ProAnalyticsClient {
    /// Create a client over `reqwest`. Missing context fields default to
    /// LightLink Phoenix mainnet on `prod`.
    ///
    /// No network I/O happens here.
    pub fn new(
        context: PartialApiContext,
        options: RequestOptions,
    ) -> Result<Self, ProAnalyticsError> {
        let transport = ReqwestTransport::new(DEFAULT_REQUEST_TIMEOUT)?;
        Self::with_transport(Arc::new(transport), context, options)
    }

    /// Create a client with the default context and options.
    pub fn default_client() -> Result<Self, ProAnalyticsError> {
        Self::new(PartialApiContext::default(), RequestOptions::default())
    }

    /// Build a client from a deserialized [`ClientConfig`].
    pub fn from_config(config: &ClientConfig) -> Result<Self, ProAnalyticsError> {
        let transport = ReqwestTransport::new(config.request_timeout())?;
        Self::with_transport(Arc::new(transport), config.context(), config.options())
    }

    /// Create a client over any transport.
    pub fn with_transport(
        transport: Arc<dyn HttpTransport>,
        context: PartialApiContext,
        options: RequestOptions,
    ) -> Result<Self, ProAnalyticsError> {
        let limiter_config = options.rate_limiter.unwrap_or_default();
        limiter_config.validate()?;

        Ok(Self {
            context: context.into(),
            transport,
            rate_limiter: RateLimiter::new(limiter_config),
            backoff: BackoffPolicy::new(options.backoff.unwrap_or_default()),
        })
    }

    pub fn context(&self) -> &ApiContext {
        &self.context
    }

    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }

    /// Base URL a call with `over` would be sent to.
    pub fn base_url(&self, over: &PartialApiContext) -> Result<String, ProAnalyticsError> {
        let ctx = self.context.with_override(over);
        locate(ctx.env, ctx.chain_id, ctx.base_urls.as_ref())
    }

    /// Get the version of the API.
    pub async fn get_version(&self, over: &PartialApiContext) -> Result<String, ProAnalyticsError> {
        self.fetch(&FetchParams::get("/api/v1/version"), over).await
    }

    /// Send an arbitrary request and decode the response into `T`.
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        params: &FetchParams,
        over: &PartialApiContext,
    ) -> Result<T, ProAnalyticsError> {
        let ctx = self.context.with_override(over);
        let base_url = locate(ctx.env, ctx.chain_id, ctx.base_urls.as_ref())?;
        tracing::debug!(
            chain_id = ctx.chain_id.chain_id(),
            env = %ctx.env,
            method = %params.method,
            path = %params.path,
            base_url = %base_url,
            transport = self.transport.name(),
            "dispatching request"
        );
        dispatch(
            self.transport.as_ref(),
            &self.rate_limiter,
            &base_url,
            params,
            &self.backoff,
        )
        .await
    }
}

impl std::fmt::Debug for ProAnalyticsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProAnalyticsClient")
            .field("context", &self.context)
            .field("rate_limiter", &self.rate_limiter)
            .field("backoff", &self.backoff)
            .finish_non_exhaustive()
    }
}
