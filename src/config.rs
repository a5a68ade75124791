use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::duration::{deserialize_duration, serialize_duration};
use crate::market_data::providers::blockchain::{
    BLOCKCHAIN_TICKER_URL, DEFAULT_HEADER_NAME, DEFAULT_HEADER_VALUE, DEFAULT_TIMEOUT,
};
use crate::market_data::DEFAULT_CURRENCY;

const CONFIG_FILE_NAME: &str = "btcprice.toml";

fn default_endpoint() -> String {
    BLOCKCHAIN_TICKER_URL.to_string()
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

fn default_timeout() -> Duration {
    DEFAULT_TIMEOUT
}

/// Default polling interval for `watch` (one minute).
fn default_watch_interval() -> Duration {
    Duration::from_secs(60)
}

/// Identifying header sent with every ticker request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderConfig {
    pub name: String,
    pub value: String,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_HEADER_NAME.to_string(),
            value: DEFAULT_HEADER_VALUE.to_string(),
        }
    }
}

/// Polling settings used by the `watch` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Delay between refreshes.
    #[serde(
        default = "default_watch_interval",
        deserialize_with = "deserialize_duration",
        serialize_with = "serialize_duration"
    )]
    pub interval: Duration,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            interval: default_watch_interval(),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Ticker URL. Must return the Blockchain.com ticker schema.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Currency code to read from the ticker (e.g. "USD", "EUR").
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Request timeout, covering connect through the end of the body.
    #[serde(
        default = "default_timeout",
        deserialize_with = "deserialize_duration",
        serialize_with = "serialize_duration"
    )]
    pub timeout: Duration,

    #[serde(default)]
    pub header: HeaderConfig,

    #[serde(default)]
    pub watch: WatchConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            currency: default_currency(),
            timeout: default_timeout(),
            header: HeaderConfig::default(),
            watch: WatchConfig::default(),
        }
    }
}

impl Config {
    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load config from a file, or return default config if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}

/// Returns the default config file path.
///
/// Resolution order:
/// 1. `./btcprice.toml` if it exists in the current directory
/// 2. `<config dir>/btcprice/btcprice.toml` (e.g. `~/.config` on Linux)
pub fn default_config_path() -> PathBuf {
    let local_config = PathBuf::from(CONFIG_FILE_NAME);
    if local_config.exists() {
        return local_config;
    }

    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("btcprice").join(CONFIG_FILE_NAME);
    }

    local_config
}
