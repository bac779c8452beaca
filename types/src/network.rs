//! Network identifier.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Identifies which EVM network the toolkit talks to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkId {
    /// Ethereum mainnet.
    Mainnet,
    /// The Sepolia public test network.
    Sepolia,
    /// The Holesky public test network.
    Holesky,
    /// A local development node (Hardhat / Anvil).
    Local,
}

impl NetworkId {
    /// EIP-155 chain id.
    pub fn chain_id(&self) -> u64 {
        match self {
            Self::Mainnet => 1,
            Self::Sepolia => 11_155_111,
            Self::Holesky => 17_000,
            Self::Local => 31_337,
        }
    }

    /// Symbol of the native currency.
    pub fn native_symbol(&self) -> &'static str {
        "ETH"
    }

    /// Whether the default RPC endpoint needs a provider API key.
    pub fn requires_api_key(&self) -> bool {
        !matches!(self, Self::Local)
    }

    /// Default JSON-RPC endpoint for this network.
    pub fn default_rpc_url(&self, api_key: &str) -> String {
        match self {
            Self::Local => "http://127.0.0.1:8545".to_string(),
            hosted => format!(
                "https://eth-{}.g.alchemy.com/v2/{}",
                hosted.as_str(),
                api_key
            ),
        }
    }

    /// Human-readable name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Sepolia => "sepolia",
            Self::Holesky => "holesky",
            Self::Local => "local",
        }
    }
}

impl Default for NetworkId {
    fn default() -> Self {
        Self::Sepolia
    }
}

impl FromStr for NetworkId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mainnet" => Ok(Self::Mainnet),
            "sepolia" => Ok(Self::Sepolia),
            "holesky" => Ok(Self::Holesky),
            "local" | "localhost" | "hardhat" => Ok(Self::Local),
            other => Err(format!("unknown network: {other}")),
        }
    }
}
