//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a query produced an empty window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum NotFoundReason {
    /// Context and filters excluded every entry.
    NoMatches,
    /// Entries matched, but the requested offset lies past the last item.
    OffsetOutOfRange { offset: usize, count: usize },
    /// The offset is in range but the window has no room (`limit` of zero).
    EmptyWindow { offset: usize, limit: usize },
}

impl std::fmt::Display for NotFoundReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoMatches => write!(f, "no entries match the query"),
            Self::OffsetOutOfRange { offset, count } => {
                write!(f, "offset {offset} is past the end ({count} items)")
            }
            Self::EmptyWindow { offset, limit } => {
                write!(f, "window at offset {offset} with limit {limit} is empty")
            }
        }
    }
}

/// Main error type for Timetrail
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum TimetrailError {
    #[error("Not found: {0}")]
    NotFound(NotFoundReason),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Remote sync failed: {0}")]
    RemoteSync(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("A batch update is already running")]
    BatchInProgress,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl TimetrailError {
    /// Whether this is the NotFound condition raised by an empty query window.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Stable label suitable for logging fields.
    pub fn label(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::Parse(_) => "parse",
            Self::RemoteSync(_) => "remote_sync",
            Self::Storage(_) => "storage",
            Self::Config(_) => "config",
            Self::InvalidInput(_) => "invalid_input",
            Self::BatchInProgress => "batch_in_progress",
            Self::Internal(_) => "internal",
        }
    }
}

/// Result type alias for Timetrail operations
pub type Result<T> = std::result::Result<T, TimetrailError>;
