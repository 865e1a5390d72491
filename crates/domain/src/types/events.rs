//! Notifications published by the entry store

use serde::{Deserialize, Serialize};

use super::batch::BatchReport;

/// Severity of a user-facing toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastLevel {
    Info,
    Error,
}

/// Fire-and-forget notification for UI collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum StoreEvent {
    QueryPending,
    QueryComplete,
    EntriesUpdated { ids: Vec<String> },
    BatchUpdateComplete { report: BatchReport },
    ContextSet { path: Vec<String> },
    ContextCleared,
    Toast { level: ToastLevel, content: String },
}
