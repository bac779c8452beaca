//! Settings layering for the `ballot` binary.
//!
//! Lowest to highest precedence: built-in defaults, the TOML file given with
//! `--config`, the process environment, command-line flags.

use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use ballot_ops::WaitPolicy;
use ballot_rpc::ClientSettings;

pub const DEFAULT_BALLOT_ARTIFACT: &str =
    "artifacts/contracts/TokenizedBallot.sol/TokenizedBallot.json";
pub const DEFAULT_TOKEN_ARTIFACT: &str = "artifacts/contracts/MyToken.sol/MyToken.json";
pub const DEFAULT_NETWORK: &str = "sepolia";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Non-credential settings from the TOML file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FileSettings {
    pub wait: WaitPolicy,
    pub log_level: Option<String>,
    pub log_format: Option<String>,
    pub ballot_artifact: Option<PathBuf>,
    pub token_artifact: Option<PathBuf>,
}

impl FileSettings {
    pub fn from_toml_str(contents: &str) -> anyhow::Result<Self> {
        toml::from_str(contents).context("invalid config file")
    }
}

/// Both halves of a config file, parsed from a single read.
pub fn load_file(path: &Path) -> anyhow::Result<(ClientSettings, FileSettings)> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let client = ClientSettings::from_toml_str(&contents)
        .map_err(anyhow::Error::msg)
        .with_context(|| format!("invalid client settings in {}", path.display()))?;
    let file = FileSettings::from_toml_str(&contents)
        .with_context(|| format!("in {}", path.display()))?;
    Ok((client, file))
}

/// Merge client settings by precedence and fill the default network.
pub fn layer(file: ClientSettings, env: ClientSettings, flags: ClientSettings) -> ClientSettings {
    let mut merged = file.merge(env).merge(flags);
    if merged.network.is_none() {
        merged.network = Some(DEFAULT_NETWORK.to_string());
    }
    merged
}
