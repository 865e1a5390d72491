//! Entry store service - the orchestrating core
//!
//! Holds the visible collection (the current query window, with the active
//! context prefix removed from every entry) and the canonical collection
//! (every persisted entry, full details). Reads go through the active
//! backend driver; writes update the local collections and forward to the
//! driver.

pub mod observers;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono_tz::Tz;
use parking_lot::{Mutex, RwLock};
use timetrail_domain::{
    BatchConfig, BatchOp, BatchReport, BatchState, Context, EntriesResponse, Entry, Pagination,
    Period, QueryParams, Result, StoreEvent, TimetrailError, ToastLevel,
};
use tracing::{debug, error, info};

use self::observers::{Observers, StoreObserver};
use crate::backend::ports::BackendDriver;
use crate::batch::{BatchPermit, BatchQueue};
use crate::collection::{by_start, by_stop_desc, EntryCollection};
use crate::context::{attach_context, strip_context, ContextResolver};

struct StoreState {
    visible: EntryCollection,
    all: EntryCollection,
    entries_pagination: Pagination,
    group_pagination: Pagination,
    // Whether `all` mirrors the whole backend rather than local writes only.
    all_loaded: bool,
}

impl Default for StoreState {
    fn default() -> Self {
        Self {
            visible: by_start(),
            all: by_stop_desc(),
            entries_pagination: Pagination::default(),
            group_pagination: Pagination::default(),
            all_loaded: false,
        }
    }
}

/// Entry store
///
/// Locks are never held across an `.await`; every backend call works on
/// values copied out of the state first.
pub struct EntryStore {
    backend: RwLock<Arc<dyn BackendDriver>>,
    state: Mutex<StoreState>,
    resolver: Mutex<ContextResolver>,
    batch: BatchQueue,
    observers: Observers,
    generation: AtomicU64,
}

impl EntryStore {
    /// Create a store on top of `backend`, reading dates in UTC.
    pub fn new(backend: Arc<dyn BackendDriver>) -> Self {
        Self {
            backend: RwLock::new(backend),
            state: Mutex::new(StoreState::default()),
            resolver: Mutex::new(ContextResolver::new(Tz::UTC)),
            batch: BatchQueue::new(),
            observers: Observers::new(),
            generation: AtomicU64::new(0),
        }
    }

    /// Add an observer for store events
    pub fn with_observer(mut self, observer: Arc<dyn StoreObserver>) -> Self {
        self.observers.add(observer);
        self
    }

    pub fn with_batch_queue(mut self, queue: BatchQueue) -> Self {
        self.batch = queue;
        self
    }

    pub fn with_batch_config(self, config: &BatchConfig) -> Self {
        self.with_batch_queue(BatchQueue::from_config(config))
    }

    /// Time zone used to derive periods from contexts.
    pub fn with_timezone(mut self, tz: Tz) -> Self {
        self.resolver = Mutex::new(ContextResolver::new(tz));
        self
    }

    /// The active driver.
    pub fn backend(&self) -> Arc<dyn BackendDriver> {
        Arc::clone(&*self.backend.read())
    }

    /// Switch to another driver. Both collections are cleared and queries
    /// still in flight against the old driver will not be applied.
    pub fn set_backend(&self, backend: Arc<dyn BackendDriver>) {
        let previous = std::mem::replace(&mut *self.backend.write(), backend);
        self.generation.fetch_add(1, Ordering::SeqCst);
        *self.state.lock() = StoreState::default();
        info!(from = previous.name(), to = self.backend().name(), "backend switched");
    }

    // Context -----------------------------------------------------------

    /// Replace the navigation stack with `context`.
    pub fn set_context(&self, context: Context) {
        let path = {
            let mut resolver = self.resolver.lock();
            resolver.set(context);
            resolver.path()
        };
        self.notify(StoreEvent::ContextSet { path });
    }

    /// Descend into `context`.
    pub fn push_context(&self, context: Context) {
        let path = {
            let mut resolver = self.resolver.lock();
            resolver.push(context);
            resolver.path()
        };
        self.notify(StoreEvent::ContextSet { path });
    }

    /// Step back out of the innermost context.
    pub fn pop_context(&self) -> Option<Context> {
        let (popped, remaining, path) = {
            let mut resolver = self.resolver.lock();
            let popped = resolver.pop();
            (popped, resolver.depth(), resolver.path())
        };
        if popped.is_some() {
            if remaining == 0 {
                self.notify(StoreEvent::ContextCleared);
            } else {
                self.notify(StoreEvent::ContextSet { path });
            }
        }
        popped
    }

    pub fn clear_context(&self) {
        self.resolver.lock().clear();
        self.notify(StoreEvent::ContextCleared);
    }

    /// Active label path.
    pub fn context_path(&self) -> Vec<String> {
        self.resolver.lock().path()
    }

    /// Period derived from the active context.
    pub fn period(&self) -> Option<Period> {
        self.resolver.lock().period()
    }

    // Queries -----------------------------------------------------------

    /// Query the backend and make the result the visible collection.
    ///
    /// The active context, if any, replaces `params.context`. When calls
    /// overlap only the most recently issued one updates the visible
    /// collection; older responses are still returned to their callers.
    ///
    /// # Errors
    /// `TimetrailError::NotFound` for an empty window, after clearing the
    /// visible collection and resetting the pagination offsets. Other
    /// backend errors are also reported through a toast event.
    pub async fn get_entries(&self, mut params: QueryParams) -> Result<EntriesResponse> {
        let path = self.context_path();
        if !path.is_empty() {
            params.context = Some(path.clone());
        }
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let backend = self.backend();

        self.notify(StoreEvent::QueryPending);
        let outcome = backend.get_entries(&params).await;

        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(generation, "discarding stale query response");
            return outcome.map(|response| strip_response(response, &path));
        }

        match outcome {
            Ok(response) => {
                let scope = response.context.clone().unwrap_or_else(|| path.clone());
                let response = strip_response(response, &scope);
                {
                    let mut state = self.state.lock();
                    if response.pagination.group.is_some() {
                        state.group_pagination = response.pagination.clone();
                    } else {
                        state.entries_pagination = response.pagination.clone();
                    }
                    state.visible.clear();
                    state.visible.extend(response.entries.iter().cloned());
                }
                if response.context.is_some() && scope != path {
                    self.set_context(Context::task(scope));
                }
                self.notify(StoreEvent::QueryComplete);
                Ok(response)
            }
            Err(err) if err.is_not_found() => {
                debug!(reason = %err, "query window empty");
                {
                    let mut state = self.state.lock();
                    state.visible.clear();
                    state.entries_pagination.offset = 0;
                    state.group_pagination.offset = 0;
                }
                self.notify(StoreEvent::QueryComplete);
                Err(err)
            }
            Err(err) => Err(self.report_failure("get entries", err)),
        }
    }

    /// Fill the canonical collection with every stored entry.
    ///
    /// Returns the number of entries loaded.
    pub async fn load_all(&self) -> Result<usize> {
        let backend = self.backend();
        let entries = match backend.get_entries(&QueryParams::default()).await {
            Ok(response) => response.entries,
            Err(err) if err.is_not_found() => Vec::new(),
            Err(err) => return Err(self.report_failure("load entries", err)),
        };

        let count = {
            let mut state = self.state.lock();
            state.all.clear();
            state.all_loaded = true;
            state.all.extend(entries)
        };
        info!(count, backend = backend.name(), "canonical collection loaded");
        Ok(count)
    }

    // Mutations ---------------------------------------------------------

    /// Create entries relative to the active context.
    ///
    /// Returns the stored entries, context prefix removed.
    pub async fn post_entries(&self, entries: Vec<Entry>) -> Result<Vec<Entry>> {
        let path = self.context_path();
        let outgoing: Vec<Entry> = entries.into_iter().map(|e| attach_context(e, &path)).collect();

        let stored = match self.backend().post_entries(outgoing).await {
            Ok(stored) => stored,
            Err(err) => return Err(self.report_failure("post entries", err)),
        };

        let posted: Vec<Entry> = stored.iter().cloned().map(|e| strip_context(e, &path)).collect();
        {
            let mut state = self.state.lock();
            state.all.extend(stored);
            state.visible.extend(posted.iter().cloned());
        }
        self.notify(StoreEvent::EntriesUpdated { ids: ids_of(&posted) });
        Ok(posted)
    }

    /// Swap `remove` for `add` in the visible collection right away, then
    /// forward `add` to the backend.
    ///
    /// Both lists are relative to the active context. The local swap happens
    /// under one lock, so readers never see a half-applied update.
    pub async fn patch_entries(&self, remove: Vec<Entry>, add: Vec<Entry>) -> Result<Vec<Entry>> {
        for entry in &add {
            if entry.id().is_none() {
                return Err(TimetrailError::InvalidInput("cannot patch an entry without id".into()));
            }
            entry.validate()?;
        }
        let path = self.context_path();
        let outgoing: Vec<Entry> = add.iter().cloned().map(|e| attach_context(e, &path)).collect();
        {
            let mut state = self.state.lock();
            for entry in &remove {
                state.visible.remove(entry);
                if let Some(id) = entry.id() {
                    state.all.remove_by_id(id);
                }
            }
            for (relative, full) in add.iter().zip(&outgoing) {
                if let Some(id) = relative.id() {
                    state.visible.replace(id, relative.clone());
                    state.all.replace(id, full.clone());
                }
            }
        }
        self.notify(StoreEvent::EntriesUpdated { ids: ids_of(&add) });

        match self.backend().patch_entries(outgoing).await {
            Ok(patched) => Ok(patched.into_iter().map(|e| strip_context(e, &path)).collect()),
            Err(err) => Err(self.report_failure("patch entries", err)),
        }
    }

    /// Remove entries locally and on the backend.
    pub async fn delete_entries(&self, entries: Vec<Entry>) -> Result<()> {
        {
            let mut state = self.state.lock();
            for entry in &entries {
                state.visible.remove(entry);
                if let Some(id) = entry.id() {
                    state.all.remove_by_id(id);
                }
            }
        }
        self.notify(StoreEvent::EntriesUpdated { ids: ids_of(&entries) });

        self.backend()
            .delete_entries(entries)
            .await
            .map_err(|err| self.report_failure("delete entries", err))
    }

    /// Delete `entries`, then re-run `params`.
    pub async fn delete_and_get_entries(
        &self,
        entries: Vec<Entry>,
        params: QueryParams,
    ) -> Result<EntriesResponse> {
        self.delete_entries(entries).await?;
        self.get_entries(params).await
    }

    /// Apply `ops` to the canonical collection through the batch queue, then
    /// persist the whole collection.
    ///
    /// Entries in `ops` carry their full details, not context-relative ones.
    /// Visible entries touched by an update are refreshed in place. The
    /// canonical collection is loaded from the backend first unless
    /// [`load_all`](Self::load_all) already ran against the active backend.
    ///
    /// # Errors
    /// `TimetrailError::BatchInProgress` if another batch is running; nothing
    /// from `ops` is applied then. Load failures abort before any item is
    /// applied. Persistence failures are returned after the completion
    /// event.
    pub async fn batch_update(&self, ops: Vec<BatchOp>) -> Result<BatchReport> {
        let permit = self.batch.try_start()?;
        self.ensure_all_loaded().await?;
        self.run_batch(permit, ops).await
    }

    async fn ensure_all_loaded(&self) -> Result<()> {
        let loaded = self.state.lock().all_loaded;
        if !loaded {
            self.load_all().await?;
        }
        Ok(())
    }

    async fn run_batch(&self, permit: BatchPermit<'_>, ops: Vec<BatchOp>) -> Result<BatchReport> {
        let path = self.context_path();

        let report = self.batch.process(&permit, &ops, |op| self.apply_batch_op(op, &path)).await;

        let snapshot = self.state.lock().all.as_slice().to_vec();
        let persisted = self.backend().replace_entries(snapshot).await;
        permit.finish();

        self.notify(StoreEvent::BatchUpdateComplete { report: report.clone() });
        persisted.map_err(|err| self.report_failure("persist batch", err))?;
        Ok(report)
    }

    /// Move every canonical entry under `from` to `to`, keeping ids.
    ///
    /// Loads the canonical collection first unless it was already loaded.
    pub async fn rename_context(&self, from: &[String], to: &[String]) -> Result<BatchReport> {
        if from.is_empty() {
            return Err(TimetrailError::InvalidInput("cannot rename the root context".into()));
        }
        let permit = self.batch.try_start()?;
        self.ensure_all_loaded().await?;

        let ops: Vec<BatchOp> = {
            let state = self.state.lock();
            state
                .all
                .iter()
                .filter(|entry| entry.has_prefix(from))
                .filter_map(|entry| {
                    let id = entry.id()?.to_string();
                    let details = to.iter().chain(&entry.details[from.len()..]).cloned().collect();
                    Some(BatchOp::Update { id, entry: entry.clone().with_details(details) })
                })
                .collect()
        };
        info!(?from, ?to, entries = ops.len(), "renaming context");
        self.run_batch(permit, ops).await
    }

    fn apply_batch_op(&self, op: &BatchOp, path: &[String]) -> Result<()> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        match op {
            BatchOp::Add { entry } => {
                let id = entry
                    .id()
                    .ok_or_else(|| TimetrailError::InvalidInput("batch add needs an id".into()))?;
                entry.validate()?;
                if state.all.contains(id) {
                    return Err(TimetrailError::InvalidInput(format!("entry {id} already exists")));
                }
                state.all.insert(entry.clone());
            }
            BatchOp::Update { id, entry } => {
                entry.validate()?;
                if !state.all.contains(id) {
                    return Err(TimetrailError::InvalidInput(format!("unknown entry {id}")));
                }
                let replacement = entry.clone().with_id(id.as_str());
                state.all.replace(id, replacement.clone());
                if state.visible.contains(id) {
                    if replacement.has_prefix(path) {
                        state.visible.replace(id, strip_context(replacement, path));
                    } else {
                        state.visible.remove_by_id(id);
                    }
                }
            }
            BatchOp::Remove { id } => {
                state
                    .all
                    .remove_by_id(id)
                    .ok_or_else(|| TimetrailError::InvalidInput(format!("unknown entry {id}")))?;
                state.visible.remove_by_id(id);
            }
        }
        Ok(())
    }

    // Accessors ---------------------------------------------------------

    /// Current visible collection, sorted by `start` ascending.
    pub fn visible_entries(&self) -> Vec<Entry> {
        self.state.lock().visible.as_slice().to_vec()
    }

    /// Current canonical collection, sorted by `stop` descending.
    pub fn all_entries(&self) -> Vec<Entry> {
        self.state.lock().all.as_slice().to_vec()
    }

    pub fn entries_pagination(&self) -> Pagination {
        self.state.lock().entries_pagination.clone()
    }

    pub fn group_pagination(&self) -> Pagination {
        self.state.lock().group_pagination.clone()
    }

    pub fn batch_state(&self) -> BatchState {
        self.batch.state()
    }

    fn notify(&self, event: StoreEvent) {
        self.observers.notify(&event);
    }

    fn report_failure(&self, action: &str, err: TimetrailError) -> TimetrailError {
        error!(action, backend = self.backend().name(), error = %err, "backend operation failed");
        self.notify(StoreEvent::Toast {
            level: ToastLevel::Error,
            content: format!("Could not {action}: {err}"),
        });
        err
    }
}

fn strip_response(mut response: EntriesResponse, path: &[String]) -> EntriesResponse {
    response.entries =
        std::mem::take(&mut response.entries).into_iter().map(|e| strip_context(e, path)).collect();
    response
}

fn ids_of(entries: &[Entry]) -> Vec<String> {
    entries.iter().filter_map(Entry::id).map(str::to_string).collect()
}
