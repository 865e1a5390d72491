//! In-memory `BackendDriver` for store tests

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use timetrail_core::{BackendDriver, QueryEngine, WorkingSet};
use timetrail_domain::{EntriesResponse, Entry, QueryParams, Result, TimetrailError};
use tokio::sync::Notify;

/// Backend keeping entries in a `WorkingSet`.
///
/// Individual calls can be held back until the test releases them, and
/// writes can be made to fail.
pub struct MemoryBackend {
    name: &'static str,
    set: Mutex<WorkingSet>,
    held_queries: Mutex<VecDeque<Arc<Notify>>>,
    held_replace: Mutex<Option<Arc<Notify>>>,
    replace_started: Notify,
    fail_writes: AtomicBool,
    replace_calls: AtomicUsize,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::named("memory")
    }

    pub fn named(name: &'static str) -> Self {
        Self {
            name,
            set: Mutex::new(WorkingSet::new(QueryEngine::default())),
            held_queries: Mutex::new(VecDeque::new()),
            held_replace: Mutex::new(None),
            replace_started: Notify::new(),
            fail_writes: AtomicBool::new(false),
            replace_calls: AtomicUsize::new(0),
        }
    }

    /// Backend already holding `entries` (ids are kept as given).
    pub fn with_entries(entries: Vec<Entry>) -> Self {
        let backend = Self::new();
        backend.set.lock().replace_all(entries);
        backend
    }

    pub fn stored(&self) -> Vec<Entry> {
        self.set.lock().entries().to_vec()
    }

    /// The next `get_entries` call waits until the returned handle is
    /// notified.
    pub fn hold_next_query(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.held_queries.lock().push_back(Arc::clone(&gate));
        gate
    }

    /// The next `replace_entries` call waits until the returned handle is
    /// notified.
    pub fn hold_next_replace(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.held_replace.lock() = Some(Arc::clone(&gate));
        gate
    }

    /// Resolves once a `replace_entries` call has started.
    pub async fn replace_started(&self) {
        self.replace_started.notified().await;
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn replace_calls(&self) -> usize {
        self.replace_calls.load(Ordering::SeqCst)
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(TimetrailError::RemoteSync("backend unavailable".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl BackendDriver for MemoryBackend {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn get_entries(&self, params: &QueryParams) -> Result<EntriesResponse> {
        let gate = self.held_queries.lock().pop_front();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.set.lock().query(params)
    }

    async fn post_entries(&self, entries: Vec<Entry>) -> Result<Vec<Entry>> {
        self.check_writable()?;
        self.set.lock().post(entries)
    }

    async fn patch_entries(&self, entries: Vec<Entry>) -> Result<Vec<Entry>> {
        self.check_writable()?;
        self.set.lock().patch(entries)
    }

    async fn delete_entries(&self, entries: Vec<Entry>) -> Result<()> {
        self.check_writable()?;
        self.set.lock().remove(&entries);
        Ok(())
    }

    async fn replace_entries(&self, entries: Vec<Entry>) -> Result<()> {
        self.replace_calls.fetch_add(1, Ordering::SeqCst);
        self.replace_started.notify_one();
        let gate = self.held_replace.lock().take();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.check_writable()?;
        self.set.lock().replace_all(entries);
        Ok(())
    }
}
