//! Explicit client configuration.
//!
//! Credentials and network selection are gathered into [`ClientSettings`]
//! from any mix of sources (TOML file, environment, CLI flags), then validated
//! once into a [`ClientConfig`]. Nothing downstream reads the process
//! environment.

use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use zeroize::Zeroizing;

use ballot_types::{InputError, NetworkId, PrivateKey};

/// Environment variable holding the node provider API key.
pub const ENV_API_KEY: &str = "ALCHEMY_API_KEY";
/// Environment variable holding the signer's private key (hex).
pub const ENV_PRIVATE_KEY: &str = "PRIVATE_KEY";
/// Environment variable selecting the network.
pub const ENV_NETWORK: &str = "BALLOT_NETWORK";
/// Environment variable overriding the RPC endpoint.
pub const ENV_RPC_URL: &str = "BALLOT_RPC_URL";

fn default_request_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting: {0}")]
    MissingField(&'static str),

    #[error("invalid private key")]
    InvalidKey(#[source] InputError),

    #[error("invalid network: {0}")]
    InvalidNetwork(String),
}

/// Unvalidated settings; every field may be absent.
#[derive(Clone, Default, Deserialize)]
pub struct ClientSettings {
    #[serde(default, alias = "apiKey")]
    pub api_key: Option<String>,
    #[serde(default, alias = "privateKey")]
    pub private_key: Option<Zeroizing<String>>,
    #[serde(default, alias = "networkId")]
    pub network: Option<String>,
    #[serde(default)]
    pub rpc_url: Option<String>,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl fmt::Debug for ClientSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .field("network", &self.network)
            .field("rpc_url", &self.rpc_url.as_ref().map(|_| "<redacted>"))
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl ClientSettings {
    /// Parse settings from TOML text. Unknown keys are ignored.
    pub fn from_toml_str(contents: &str) -> Result<Self, String> {
        toml::from_str(contents).map_err(|e| e.to_string())
    }

    /// Collect settings through `lookup` (normally `std::env::var`).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v: &String| !v.trim().is_empty());
        Self {
            api_key: non_empty(ENV_API_KEY),
            private_key: non_empty(ENV_PRIVATE_KEY).map(Zeroizing::new),
            network: non_empty(ENV_NETWORK),
            rpc_url: non_empty(ENV_RPC_URL),
            request_timeout_secs: None,
        }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Overlay `other` on top of `self`: any field set in `other` wins.
    pub fn merge(self, other: Self) -> Self {
        Self {
            api_key: other.api_key.or(self.api_key),
            private_key: other.private_key.or(self.private_key),
            network: other.network.or(self.network),
            rpc_url: other.rpc_url.or(self.rpc_url),
            request_timeout_secs: other.request_timeout_secs.or(self.request_timeout_secs),
        }
    }
}

/// Validated configuration for one run against one network.
pub struct ClientConfig {
    api_key: String,
    private_key: PrivateKey,
    network: NetworkId,
    rpc_url: String,
    request_timeout: Duration,
}

impl ClientConfig {
    /// Validate settings. Required: `networkId`, `privateKey`, and `apiKey`
    /// unless the network is local or an explicit RPC URL is given.
    pub fn new(settings: ClientSettings) -> Result<Self, ConfigError> {
        let network: NetworkId = settings
            .network
            .as_deref()
            .ok_or(ConfigError::MissingField("networkId"))?
            .parse()
            .map_err(ConfigError::InvalidNetwork)?;

        let private_key = settings
            .private_key
            .as_deref()
            .ok_or(ConfigError::MissingField("privateKey"))
            .and_then(|hex| PrivateKey::from_hex(hex).map_err(ConfigError::InvalidKey))?;

        let api_key = settings.api_key.unwrap_or_default();
        let rpc_url = match settings.rpc_url {
            Some(url) => url,
            None => {
                if network.requires_api_key() && api_key.is_empty() {
                    return Err(ConfigError::MissingField("apiKey"));
                }
                network.default_rpc_url(&api_key)
            }
        };

        Ok(Self {
            api_key,
            private_key,
            network,
            rpc_url,
            request_timeout: Duration::from_secs(
                settings
                    .request_timeout_secs
                    .unwrap_or_else(default_request_timeout_secs),
            ),
        })
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    pub fn network(&self) -> NetworkId {
        self.network
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("network", &self.network)
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}
