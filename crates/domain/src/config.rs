//! Application configuration structures
//!
//! Every section carries serde defaults so a config file only needs the
//! values it overrides. Loading lives in `timetrail-infra::config`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{APP_NAME, DEFAULT_REMOTE_TIMEOUT_SECS, DEFAULT_TIMEZONE};
use crate::impl_keyword_conversions;

/// Which storage provider backs the entry store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Local,
    Remote,
}

impl_keyword_conversions!(BackendKind {
    Local => "local",
    Remote => "remote",
});

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub remote: Option<RemoteConfig>,
    #[serde(default)]
    pub batch: BatchConfig,
    #[serde(default)]
    pub query: QueryConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: BackendKind,
    /// Directory holding the local key-value records.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    /// Prefix for persistence keys.
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            data_dir: default_data_dir(),
            namespace: default_namespace(),
        }
    }
}

/// Remote account service settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConfig {
    pub base_url: String,
    pub account_key: String,
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default = "default_remote_timeout")]
    pub timeout_secs: u64,
}

impl RemoteConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Pause between batch items, on top of the cooperative yield.
    #[serde(default)]
    pub item_delay_ms: u64,
    /// Abort the remaining items of a batch after this long.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl BatchConfig {
    pub fn item_delay(&self) -> Duration {
        Duration::from_millis(self.item_delay_ms)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryConfig {
    /// IANA zone used to read day/month/year from timestamps.
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self { timezone: default_timezone() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), json: false }
    }
}

fn default_data_dir() -> String {
    format!(".{APP_NAME}")
}

fn default_namespace() -> String {
    APP_NAME.to_string()
}

fn default_remote_timeout() -> u64 {
    DEFAULT_REMOTE_TIMEOUT_SECS
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}
