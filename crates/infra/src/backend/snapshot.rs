//! Drivers that hold the whole record in memory and persist full snapshots

use async_trait::async_trait;
use timetrail_core::{BackendDriver, QueryEngine, WorkingSet};
use timetrail_domain::{EntriesRecord, EntriesResponse, Entry, QueryParams, Result};
use tokio::sync::Mutex;
use tracing::debug;

/// Where a [`SnapshotDriver`] reads and writes its record.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Driver name reported through [`BackendDriver::name`].
    fn name(&self) -> &'static str;

    /// Current persisted record. Unreadable data yields an empty record.
    async fn load(&self) -> Result<EntriesRecord>;

    /// Persist `record` wholesale.
    async fn save(&self, record: &EntriesRecord) -> Result<()>;
}

/// [`BackendDriver`] over a [`RecordStore`].
///
/// Every mutation is applied to a copy of the working set, saved, and only
/// then committed, so a failed save leaves the driver's state unchanged.
pub struct SnapshotDriver<S> {
    store: S,
    engine: QueryEngine,
    // None until the first load.
    state: Mutex<Option<WorkingSet>>,
}

impl<S: RecordStore> SnapshotDriver<S> {
    pub fn new(store: S, engine: QueryEngine) -> Self {
        Self { store, engine, state: Mutex::new(None) }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    async fn fetch(&self) -> Result<WorkingSet> {
        let record = self.store.load().await?;
        debug!(driver = self.store.name(), entries = record.entries.len(), "record loaded");
        Ok(WorkingSet::from_record(record, self.engine))
    }

    /// Apply `change` to a copy of the working set, persist, then commit.
    async fn mutate<T, F>(&self, change: F) -> Result<T>
    where
        F: FnOnce(&mut WorkingSet) -> Result<T> + Send,
        T: Send,
    {
        let mut guard = self.state.lock().await;
        let mut working = match guard.as_ref() {
            Some(current) => current.clone(),
            None => self.fetch().await?,
        };

        let output = change(&mut working)?;
        self.store.save(&working.snapshot()).await?;
        *guard = Some(working);
        Ok(output)
    }
}

#[async_trait]
impl<S: RecordStore> BackendDriver for SnapshotDriver<S> {
    fn name(&self) -> &'static str {
        self.store.name()
    }

    async fn get_entries(&self, params: &QueryParams) -> Result<EntriesResponse> {
        let mut guard = self.state.lock().await;
        let working = self.fetch().await?;
        let response = working.query(params);
        *guard = Some(working);
        response
    }

    async fn post_entries(&self, entries: Vec<Entry>) -> Result<Vec<Entry>> {
        self.mutate(|working| working.post(entries)).await
    }

    async fn patch_entries(&self, entries: Vec<Entry>) -> Result<Vec<Entry>> {
        self.mutate(|working| working.patch(entries)).await
    }

    async fn delete_entries(&self, entries: Vec<Entry>) -> Result<()> {
        self.mutate(|working| {
            let removed = working.remove(&entries);
            debug!(requested = entries.len(), removed, "entries deleted");
            Ok(())
        })
        .await
    }

    async fn replace_entries(&self, entries: Vec<Entry>) -> Result<()> {
        self.mutate(|working| {
            working.replace_all(entries);
            Ok(())
        })
        .await
    }
}
