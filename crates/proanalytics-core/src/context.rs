//! API context: which network and which deployment a request targets.

use serde::{Deserialize, Serialize};

use crate::chain::SupportedChainId;
use crate::endpoints::ApiBaseUrls;
use crate::error::ProAnalyticsError;
use crate::policy::{BackoffConfig, RateLimiterConfig};

/// Deployment stage of the remote API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Prod,
    Staging,
}

impl Environment {
    pub const ALL: [Environment; 2] = [Self::Prod, Self::Staging];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Prod => "prod",
            Self::Staging => "staging",
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Environment {
    type Err = ProAnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "prod" => Ok(Self::Prod),
            "staging" => Ok(Self::Staging),
            other => Err(ProAnalyticsError::UnknownEnvironment(other.to_string())),
        }
    }
}

/// The logical target of a request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiContext {
    pub chain_id: SupportedChainId,
    pub env: Environment,
    /// Caller-supplied base URLs. When set, the built-in tables are not consulted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_urls: Option<ApiBaseUrls>,
}

/// An [`ApiContext`] with every field optional.
///
/// Used both to build a client (missing fields take the defaults) and to
/// override the client's context for a single call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialApiContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<SupportedChainId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<Environment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_urls: Option<ApiBaseUrls>,
}

impl PartialApiContext {
    pub fn chain(chain_id: SupportedChainId) -> Self {
        Self {
            chain_id: Some(chain_id),
            ..Default::default()
        }
    }

    pub fn env(env: Environment) -> Self {
        Self {
            env: Some(env),
            ..Default::default()
        }
    }

    pub fn base_urls(base_urls: ApiBaseUrls) -> Self {
        Self {
            base_urls: Some(base_urls),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.chain_id.is_none() && self.env.is_none() && self.base_urls.is_none()
    }
}

impl ApiContext {
    /// Shallow field-wise merge: every field present in `over` replaces ours.
    ///
    /// No validation happens here; an unusable combination surfaces when the
    /// base URL is looked up.
    pub fn with_override(&self, over: &PartialApiContext) -> ApiContext {
        ApiContext {
            chain_id: over.chain_id.unwrap_or(self.chain_id),
            env: over.env.unwrap_or(self.env),
            base_urls: over
                .base_urls
                .clone()
                .or_else(|| self.base_urls.clone()),
        }
    }
}

impl From<PartialApiContext> for ApiContext {
    fn from(partial: PartialApiContext) -> Self {
        ApiContext::default().with_override(&partial)
    }
}

/// Per-client request policy. Missing fields use the crate defaults.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub rate_limiter: Option<RateLimiterConfig>,
    pub backoff: Option<BackoffConfig>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> ApiContext {
        ApiContext {
            chain_id: SupportedChainId::LightlinkPegasusTestnet,
            env: Environment::Staging,
            base_urls: Some(ApiBaseUrls::uniform("https://base.example")),
        }
    }

    #[test]
    fn default_context_is_mainnet_prod() {
        let ctx = ApiContext::default();
        assert_eq!(ctx.chain_id, SupportedChainId::LightlinkPhoenixMainnet);
        assert_eq!(ctx.env, Environment::Prod);
        assert!(ctx.base_urls.is_none());
    }

    #[test]
    fn empty_override_is_identity() {
        let over = PartialApiContext::default();
        assert!(over.is_empty());
        assert_eq!(base().with_override(&over), base());
    }

    #[test]
    fn override_replaces_only_present_fields() {
        let merged = base().with_override(&PartialApiContext::env(Environment::Prod));
        assert_eq!(merged.env, Environment::Prod);
        assert_eq!(merged.chain_id, SupportedChainId::LightlinkPegasusTestnet);
        assert_eq!(merged.base_urls, base().base_urls);

        let urls = ApiBaseUrls::uniform("https://other.example");
        let merged = base().with_override(&PartialApiContext {
            chain_id: Some(SupportedChainId::Sepolia),
            env: None,
            base_urls: Some(urls.clone()),
        });
        assert_eq!(merged.chain_id, SupportedChainId::Sepolia);
        assert_eq!(merged.env, Environment::Staging);
        assert_eq!(merged.base_urls, Some(urls));
    }

    #[test]
    fn partial_fills_from_defaults() {
        let ctx: ApiContext = PartialApiContext::env(Environment::Staging).into();
        assert_eq!(ctx.env, Environment::Staging);
        assert_eq!(ctx.chain_id, SupportedChainId::LightlinkPhoenixMainnet);
    }

    #[test]
    fn environment_parsing() {
        assert_eq!("staging".parse::<Environment>().unwrap(), Environment::Staging);
        assert!(matches!(
            "dev".parse::<Environment>(),
            Err(ProAnalyticsError::UnknownEnvironment(tag)) if tag == "dev"
        ));
        assert_eq!(serde_json::to_string(&Environment::Prod).unwrap(), "\"prod\"");
    }
}
