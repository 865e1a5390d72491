//! Backend drivers and selection of the active one

mod local;
mod remote;
mod snapshot;

use std::sync::Arc;

use timetrail_core::{BackendDriver, QueryEngine};
use timetrail_domain::{BackendKind, Config, Result, TimetrailError};
use tracing::info;

pub use local::{LocalDriver, LocalRecordStore};
pub use remote::{RemoteDriver, RemoteRecordStore};
pub use snapshot::{RecordStore, SnapshotDriver};

use crate::storage::FileKeyValueStore;

/// Build the driver selected by `config.storage.backend`.
///
/// # Errors
/// Returns `TimetrailError::Config` for an unknown time zone or a remote
/// backend without a `remote` section, and storage errors from seeding the
/// local record.
pub async fn build_backend(config: &Config) -> Result<Arc<dyn BackendDriver>> {
    let engine = QueryEngine::with_timezone_name(&config.query.timezone)?;

    let driver: Arc<dyn BackendDriver> = match config.storage.backend {
        BackendKind::Local => {
            let kv = Arc::new(FileKeyValueStore::new(&config.storage.data_dir));
            Arc::new(LocalDriver::open(kv, &config.storage.namespace, engine).await?)
        }
        BackendKind::Remote => {
            let remote = config.remote.as_ref().ok_or_else(|| {
                TimetrailError::Config("remote backend selected but not configured".into())
            })?;
            Arc::new(RemoteDriver::remote(remote, engine)?)
        }
    };

    info!(backend = driver.name(), "backend ready");
    Ok(driver)
}
