//! Local driver persisting to a key-value store

use std::sync::Arc;

use async_trait::async_trait;
use timetrail_core::QueryEngine;
use timetrail_domain::constants::{LEGACY_ENTRIES_KEY_SUFFIX, LOCAL_ENTRIES_KEY_SUFFIX};
use timetrail_domain::{EntriesRecord, Result};
use tracing::{info, instrument, warn};

use super::snapshot::{RecordStore, SnapshotDriver};
use crate::errors::InfraError;
use crate::storage::KeyValueStore;

/// Entries persisted under `<namespace>-entries-local`.
pub type LocalDriver = SnapshotDriver<LocalRecordStore>;

/// Record store behind [`LocalDriver`].
pub struct LocalRecordStore {
    kv: Arc<dyn KeyValueStore>,
    key: String,
    legacy_key: String,
}

impl LocalRecordStore {
    pub fn new(kv: Arc<dyn KeyValueStore>, namespace: &str) -> Self {
        Self {
            kv,
            key: format!("{namespace}{LOCAL_ENTRIES_KEY_SUFFIX}"),
            legacy_key: format!("{namespace}{LEGACY_ENTRIES_KEY_SUFFIX}"),
        }
    }

    /// Key the record is written under.
    pub fn key(&self) -> &str {
        &self.key
    }

    async fn write(&self, record: &EntriesRecord) -> Result<()> {
        let body = serde_json::to_string(record).map_err(InfraError::from)?;
        self.kv.set(&self.key, &body).await
    }
}

fn parse_record(raw: &str, key: &str) -> EntriesRecord {
    match serde_json::from_str::<EntriesRecord>(raw) {
        Ok(record) => record,
        Err(err) => {
            warn!(key, error = %err, "stored entries are unreadable, treating as empty");
            EntriesRecord::default()
        }
    }
}

#[async_trait]
impl RecordStore for LocalRecordStore {
    fn name(&self) -> &'static str {
        "local"
    }

    #[instrument(skip(self), fields(key = %self.key))]
    async fn load(&self) -> Result<EntriesRecord> {
        if let Some(raw) = self.kv.get(&self.key).await? {
            return Ok(parse_record(&raw, &self.key));
        }

        if let Some(raw) = self.kv.get(&self.legacy_key).await? {
            let record = parse_record(&raw, &self.legacy_key);
            self.write(&record).await?;
            info!(
                from = %self.legacy_key,
                entries = record.entries.len(),
                "migrated entries from legacy key"
            );
            return Ok(record);
        }

        let record = EntriesRecord::default();
        self.write(&record).await?;
        info!("seeded empty entries record");
        Ok(record)
    }

    #[instrument(skip(self, record), fields(key = %self.key, entries = record.entries.len()))]
    async fn save(&self, record: &EntriesRecord) -> Result<()> {
        self.write(record).await
    }
}

impl LocalDriver {
    /// Driver over `kv` without touching storage yet.
    pub fn local(kv: Arc<dyn KeyValueStore>, namespace: &str, engine: QueryEngine) -> Self {
        SnapshotDriver::new(LocalRecordStore::new(kv, namespace), engine)
    }

    /// Driver over `kv`, seeding or migrating the stored record.
    ///
    /// # Errors
    /// Returns `TimetrailError::Storage` when the store cannot be read or
    /// written.
    pub async fn open(
        kv: Arc<dyn KeyValueStore>,
        namespace: &str,
        engine: QueryEngine,
    ) -> Result<Self> {
        let driver = Self::local(kv, namespace, engine);
        driver.store().load().await?;
        Ok(driver)
    }
}
