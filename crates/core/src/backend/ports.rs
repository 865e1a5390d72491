//! Port interface for entry storage providers
//!
//! The store talks to exactly one driver at a time and can swap it at
//! runtime. Drivers own id assignment and persistence; query evaluation is
//! theirs too, so a driver may push it to a server.

use async_trait::async_trait;
use timetrail_domain::{EntriesResponse, Entry, QueryParams, Result};

/// Storage provider for entries.
#[async_trait]
pub trait BackendDriver: Send + Sync {
    /// Short driver name for logs.
    fn name(&self) -> &'static str;

    /// Evaluate `params` against the stored entries.
    ///
    /// Returns `TimetrailError::NotFound` when the window is empty.
    async fn get_entries(&self, params: &QueryParams) -> Result<EntriesResponse>;

    /// Store new entries, assigning each a fresh id. Returns them as stored.
    async fn post_entries(&self, entries: Vec<Entry>) -> Result<Vec<Entry>>;

    /// Replace stored entries by id; entries not yet stored are added.
    async fn patch_entries(&self, entries: Vec<Entry>) -> Result<Vec<Entry>>;

    /// Remove entries by id. Unknown ids are ignored.
    async fn delete_entries(&self, entries: Vec<Entry>) -> Result<()>;

    /// Overwrite the whole stored collection with `entries`.
    async fn replace_entries(&self, entries: Vec<Entry>) -> Result<()>;
}
