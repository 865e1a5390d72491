//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If `TIMETRAIL_DATA_DIR` is missing, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `TIMETRAIL_DATA_DIR`: Directory for local records (required)
//! - `TIMETRAIL_BACKEND`: `local` or `remote`
//! - `TIMETRAIL_NAMESPACE`: Persistence key prefix
//! - `TIMETRAIL_REMOTE_URL`: Account service base URL
//! - `TIMETRAIL_ACCOUNT_KEY`: Account key on the remote service
//! - `TIMETRAIL_API_TOKEN`: Bearer token for the remote service
//! - `TIMETRAIL_REMOTE_TIMEOUT`: Remote request timeout in seconds
//! - `TIMETRAIL_BATCH_ITEM_DELAY_MS`: Pause between batch items
//! - `TIMETRAIL_BATCH_TIMEOUT`: Batch timeout in seconds
//! - `TIMETRAIL_TIMEZONE`: IANA zone for date filters and grouping
//! - `TIMETRAIL_LOG_LEVEL`: Default tracing filter
//! - `TIMETRAIL_LOG_JSON`: Emit JSON log lines (true/false)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./timetrail.json` or `./timetrail.toml` (current working directory)
//! 2. `./config.json` or `./config.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use timetrail_domain::{
    BackendKind, BatchConfig, Config, LoggingConfig, QueryConfig, RemoteConfig, Result,
    StorageConfig, TimetrailError,
};

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If the required
/// variable is missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `TimetrailError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - A remote backend is selected without a remote section
pub fn load() -> Result<Config> {
    let config = match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            config
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)?
        }
    };

    validate(&config)?;
    Ok(config)
}

/// Load configuration from environment variables
///
/// `TIMETRAIL_DATA_DIR` must be present; every other variable falls back to
/// its default.
///
/// # Errors
/// Returns `TimetrailError::Config` if the required variable is missing or
/// a value cannot be parsed.
pub fn load_from_env() -> Result<Config> {
    let data_dir = env_var("TIMETRAIL_DATA_DIR")?;

    let storage_defaults = StorageConfig::default();
    let backend = match std::env::var("TIMETRAIL_BACKEND") {
        Ok(raw) => BackendKind::from_str(&raw)
            .map_err(|_| TimetrailError::Config(format!("Invalid backend: {}", raw)))?,
        Err(_) => storage_defaults.backend,
    };
    let namespace = env_opt("TIMETRAIL_NAMESPACE").unwrap_or(storage_defaults.namespace);

    let remote = match (env_opt("TIMETRAIL_REMOTE_URL"), env_opt("TIMETRAIL_ACCOUNT_KEY")) {
        (Some(base_url), Some(account_key)) => Some(RemoteConfig {
            base_url,
            account_key,
            api_token: env_opt("TIMETRAIL_API_TOKEN"),
            timeout_secs: env_parse("TIMETRAIL_REMOTE_TIMEOUT", "remote timeout")?
                .unwrap_or(timetrail_domain::constants::DEFAULT_REMOTE_TIMEOUT_SECS),
        }),
        _ => None,
    };

    let batch = BatchConfig {
        item_delay_ms: env_parse("TIMETRAIL_BATCH_ITEM_DELAY_MS", "batch item delay")?
            .unwrap_or_default(),
        timeout_secs: env_parse("TIMETRAIL_BATCH_TIMEOUT", "batch timeout")?,
    };

    let query = QueryConfig {
        timezone: env_opt("TIMETRAIL_TIMEZONE").unwrap_or_else(|| QueryConfig::default().timezone),
    };

    let logging = LoggingConfig {
        level: env_opt("TIMETRAIL_LOG_LEVEL").unwrap_or_else(|| LoggingConfig::default().level),
        json: env_bool("TIMETRAIL_LOG_JSON", false),
    };

    Ok(Config { storage: StorageConfig { backend, data_dir, namespace }, remote, batch, query, logging })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `TimetrailError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(TimetrailError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            TimetrailError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| TimetrailError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content, picking the format from the
/// file extension.
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| TimetrailError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| TimetrailError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(TimetrailError::Config(format!("Unsupported config format: {}", extension))),
    }
}

fn validate(config: &Config) -> Result<()> {
    if config.storage.backend == BackendKind::Remote && config.remote.is_none() {
        return Err(TimetrailError::Config(
            "remote backend selected but no remote section configured".to_string(),
        ));
    }
    Ok(())
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    const NAMES: [&str; 6] = [
        "timetrail.json",
        "timetrail.toml",
        "config.json",
        "config.toml",
        "../config.json",
        "../config.toml",
    ];

    let mut roots = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        roots.push(cwd);
    }
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            roots.push(exe_dir.to_path_buf());
        }
    }

    roots
        .iter()
        .flat_map(|root| NAMES.iter().map(move |name| root.join(name)))
        .find(|path| path.exists())
}

/// Get required environment variable
///
/// # Errors
/// Returns `TimetrailError::Config` if the variable is not set.
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        TimetrailError::Config(format!("Missing required environment variable: {}", key))
    })
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn env_parse<T: FromStr>(key: &str, what: &str) -> Result<Option<T>>
where
    T::Err: std::fmt::Display,
{
    env_opt(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| TimetrailError::Config(format!("Invalid {}: {}", what, e)))
        })
        .transpose()
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
