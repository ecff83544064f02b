//! Base URL tables and endpoint lookup.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::chain::{map_supported_networks, SupportedChainId};
use crate::context::Environment;
use crate::error::ProAnalyticsError;

/// Mapping from network to API base URL.
///
/// Tables built by callers may be partial; the built-in ones cover every
/// [`SupportedChainId`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiBaseUrls(BTreeMap<SupportedChainId, String>);

impl ApiBaseUrls {
    pub fn new() -> Self {
        Self::default()
    }

    /// The same base URL for every supported network.
    pub fn uniform(url: impl Into<String>) -> Self {
        let url = url.into();
        Self(map_supported_networks(|_| url.clone()))
    }

    /// The built-in table for `env`.
    pub fn builtin(env: Environment) -> Self {
        Self(map_supported_networks(|chain| {
            default_base_url(env, chain).to_string()
        }))
    }

    pub fn with(mut self, chain: SupportedChainId, url: impl Into<String>) -> Self {
        self.0.insert(chain, url.into());
        self
    }

    pub fn insert(&mut self, chain: SupportedChainId, url: impl Into<String>) -> Option<String> {
        self.0.insert(chain, url.into())
    }

    pub fn get(&self, chain: SupportedChainId) -> Option<&str> {
        self.0.get(&chain).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SupportedChainId, &str)> {
        self.0.iter().map(|(chain, url)| (*chain, url.as_str()))
    }
}

impl FromIterator<(SupportedChainId, String)> for ApiBaseUrls {
    fn from_iter<I: IntoIterator<Item = (SupportedChainId, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Built-in base URL for a network in a given environment.
pub const fn default_base_url(env: Environment, chain: SupportedChainId) -> &'static str {
    match (env, chain) {
        (Environment::Prod, SupportedChainId::LightlinkPhoenixMainnet) => {
            "https://pro-analytics.phoenix.lightlink.io"
        }
        (Environment::Prod, SupportedChainId::LightlinkPegasusTestnet) => {
            "https://pro-analytics.pegasus.lightlink.io"
        }
        (Environment::Prod, SupportedChainId::Sepolia) => {
            "https://pro-analytics.sepolia.lightlink.io"
        }
        (Environment::Staging, SupportedChainId::LightlinkPhoenixMainnet) => {
            "https://pro-analytics-staging.phoenix.lightlink.io"
        }
        (Environment::Staging, SupportedChainId::LightlinkPegasusTestnet) => {
            "https://pro-analytics-staging.pegasus.lightlink.io"
        }
        (Environment::Staging, SupportedChainId::Sepolia) => {
            "https://pro-analytics-staging.sepolia.lightlink.io"
        }
    }
}

/// Resolve the base URL for `chain`.
///
/// A `custom` table takes precedence over the built-in table for `env`, and
/// `env` is then ignored entirely. Missing or empty entries are a
/// configuration error.
pub fn locate(
    env: Environment,
    chain: SupportedChainId,
    custom: Option<&ApiBaseUrls>,
) -> Result<String, ProAnalyticsError> {
    let url = match custom {
        Some(table) => table.get(chain).ok_or_else(|| {
            ProAnalyticsError::configuration(format!(
                "custom base URL table has no entry for {chain}"
            ))
        })?,
        None => default_base_url(env, chain),
    };

    if url.is_empty() {
        return Err(ProAnalyticsError::configuration(format!(
            "base URL for {chain} ({env}) is empty"
        )));
    }
    Ok(url.to_string())
}

/// Join a base URL and an absolute request path without doubling the slash.
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    if path.is_empty() {
        base.to_string()
    } else if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}
