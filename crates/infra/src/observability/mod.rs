//! Tracing subscriber setup
//!
//! `RUST_LOG` takes precedence over the configured level. Installing a
//! second time is a no-op, so tests and embedding applications can call
//! [`init_tracing`] freely.

use timetrail_domain::{LoggingConfig, Result, TimetrailError};
use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber described by `config`.
///
/// # Errors
/// Returns `TimetrailError::Config` when `config.level` is not a valid
/// filter directive.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level).map_err(|err| {
            TimetrailError::Config(format!("Invalid log level {:?}: {}", config.level, err))
        })?,
    };

    let installed = if config.json {
        tracing_subscriber::fmt().with_env_filter(filter).json().try_init()
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).try_init()
    };

    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
    Ok(())
}
