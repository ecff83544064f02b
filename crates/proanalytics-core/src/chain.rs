//! Supported networks and their chain ids.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ProAnalyticsError;

/// A network the Pro Analytics API is deployed for.
///
/// Serialized as its integer chain id. Raw ids coming from outside the crate
/// go through [`TryFrom<u64>`], which rejects anything not listed here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub enum SupportedChainId {
    #[default]
    LightlinkPhoenixMainnet,
    LightlinkPegasusTestnet,
    Sepolia,
}

impl SupportedChainId {
    /// Every supported network, mainnet first.
    pub const ALL: [SupportedChainId; 3] = [
        Self::LightlinkPhoenixMainnet,
        Self::LightlinkPegasusTestnet,
        Self::Sepolia,
    ];

    /// EIP-155 chain id.
    pub const fn chain_id(self) -> u64 {
        match self {
            Self::LightlinkPhoenixMainnet => 1890,
            Self::LightlinkPegasusTestnet => 1891,
            Self::Sepolia => 11_155_111,
        }
    }

    /// Human-readable network name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::LightlinkPhoenixMainnet => "lightlink-phoenix",
            Self::LightlinkPegasusTestnet => "lightlink-pegasus",
            Self::Sepolia => "sepolia",
        }
    }

    pub const fn is_testnet(self) -> bool {
        !matches!(self, Self::LightlinkPhoenixMainnet)
    }
}

impl TryFrom<u64> for SupportedChainId {
    type Error = ProAnalyticsError;

    fn try_from(id: u64) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|chain| chain.chain_id() == id)
            .ok_or(ProAnalyticsError::UnsupportedChain(id))
    }
}

impl From<SupportedChainId> for u64 {
    fn from(chain: SupportedChainId) -> Self {
        chain.chain_id()
    }
}

impl std::str::FromStr for SupportedChainId {
    type Err = ProAnalyticsError;

    /// Accepts either the numeric chain id or the network name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(id) = s.parse::<u64>() {
            return Self::try_from(id);
        }
        Self::ALL
            .into_iter()
            .find(|chain| chain.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ProAnalyticsError::Configuration {
                reason: format!("unknown network name '{s}'"),
            })
    }
}

impl std::fmt::Display for SupportedChainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name(), self.chain_id())
    }
}

/// Build a map with one entry per supported network.
pub fn map_supported_networks<T>(
    mut value: impl FnMut(SupportedChainId) -> T,
) -> BTreeMap<SupportedChainId, T> {
    SupportedChainId::ALL
        .into_iter()
        .map(|chain| (chain, value(chain)))
        .collect()
}
