use timetrail_domain::{EntriesRecord, EntriesResponse, Entry, QueryParams, Result, TimetrailError};
use uuid::Uuid;

use crate::collection::{by_start, EntryCollection};
use crate::query::QueryEngine;

/// In-memory entry collection with the mutation rules every driver shares.
///
/// Drivers keep one of these next to their persistence and write a
/// snapshot of it after each successful mutation.
#[derive(Debug, Clone)]
pub struct WorkingSet {
    entries: EntryCollection,
    engine: QueryEngine,
}

impl WorkingSet {
    pub fn new(engine: QueryEngine) -> Self {
        Self { entries: by_start(), engine }
    }

    /// Working set seeded from a persisted record. Duplicate ids keep the
    /// first occurrence.
    pub fn from_record(record: EntriesRecord, engine: QueryEngine) -> Self {
        let mut set = Self::new(engine);
        set.entries.extend(record.entries);
        set
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Entry] {
        self.entries.as_slice()
    }

    /// Evaluate a query over the working set.
    ///
    /// # Errors
    /// Propagates `TimetrailError::NotFound` from the query engine.
    pub fn query(&self, params: &QueryParams) -> Result<EntriesResponse> {
        self.engine.run(self.entries.as_slice(), params)
    }

    /// Add `entries` under fresh ids and return them as stored.
    ///
    /// # Errors
    /// Returns `TimetrailError::InvalidInput` if any entry fails validation;
    /// nothing is added in that case.
    pub fn post(&mut self, entries: Vec<Entry>) -> Result<Vec<Entry>> {
        for entry in &entries {
            entry.validate()?;
        }
        let posted: Vec<Entry> = entries
            .into_iter()
            .map(|entry| entry.with_id(Uuid::now_v7().to_string()))
            .collect();
        self.entries.extend(posted.iter().cloned());
        Ok(posted)
    }

    /// Replace entries by id, adding those not present.
    ///
    /// # Errors
    /// Returns `TimetrailError::InvalidInput` for an entry without an id or
    /// one that fails validation; nothing is changed in that case.
    pub fn patch(&mut self, entries: Vec<Entry>) -> Result<Vec<Entry>> {
        for entry in &entries {
            if entry.id().is_none() {
                return Err(TimetrailError::InvalidInput("cannot patch an entry without id".into()));
            }
            entry.validate()?;
        }
        for entry in &entries {
            if let Some(id) = entry.id() {
                self.entries.replace(id, entry.clone());
            }
        }
        Ok(entries)
    }

    /// Remove entries by id. Returns how many were present.
    pub fn remove(&mut self, entries: &[Entry]) -> usize {
        entries.iter().filter_map(|entry| self.entries.remove(entry)).count()
    }

    /// Drop everything and load `entries` instead.
    pub fn replace_all(&mut self, entries: Vec<Entry>) {
        self.entries.clear();
        self.entries.extend(entries);
    }

    /// Persistable copy of the current contents.
    pub fn snapshot(&self) -> EntriesRecord {
        EntriesRecord { entries: self.entries.as_slice().to_vec() }
    }
}
