//! Batch mutation types

use serde::{Deserialize, Serialize};

use super::entry::Entry;
use crate::impl_keyword_conversions;

/// One item of a bulk mutation against the canonical collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum BatchOp {
    /// Insert an entry; it must already carry an id.
    Add { entry: Entry },
    /// Replace the entry identified by `id` with `entry`.
    Update { id: String, entry: Entry },
    /// Remove the entry identified by `id`.
    Remove { id: String },
}

impl BatchOp {
    /// Identifier the operation targets, when known.
    pub fn target_id(&self) -> Option<&str> {
        match self {
            Self::Add { entry } => entry.id(),
            Self::Update { id, .. } | Self::Remove { id } => Some(id),
        }
    }
}

/// Lock state of the batch queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchState {
    Idle,
    Running,
}

impl_keyword_conversions!(BatchState {
    Idle => "idle",
    Running => "running",
});

/// A batch item that could not be applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchItemFailure {
    pub index: usize,
    pub id: Option<String>,
    pub reason: String,
}

/// Outcome of a completed batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    pub total: usize,
    pub applied: usize,
    pub failures: Vec<BatchItemFailure>,
    /// Items never attempted because the batch timed out.
    pub skipped: usize,
    pub timed_out: bool,
}

impl BatchReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && !self.timed_out
    }
}
