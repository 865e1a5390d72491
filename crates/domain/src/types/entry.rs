//! Time-tracked entry

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use timetrail_common::Identified;

use crate::constants::TASK_DELIMITER;
use crate::errors::{Result, TimetrailError};

/// One recorded time interval with a hierarchical label path.
///
/// Entries are treated as immutable values: an update is expressed as a
/// replacement carrying the same `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Stable unique identifier, assigned by the backend driver on creation.
    #[serde(default, alias = "uid", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Epoch milliseconds when tracking began.
    pub start: i64,
    /// Epoch milliseconds when tracking ended; absent or zero while running.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop: Option<i64>,
    /// Label path, outermost first (client, project, task, ...).
    #[serde(default)]
    pub details: Vec<String>,
}

impl Entry {
    /// New entry without an id.
    pub fn new(start: i64, stop: Option<i64>, details: Vec<String>) -> Self {
        Self { id: None, start, stop, details }
    }

    /// Same entry carrying `id`.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Same entry with `details` replaced.
    #[must_use]
    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = details;
        self
    }

    /// Identifier, if assigned.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Whether tracking is still in progress.
    pub fn is_running(&self) -> bool {
        matches!(self.stop, None | Some(0))
    }

    /// Stop timestamp used for ordering; running entries sort as the latest.
    pub fn stop_or_max(&self) -> i64 {
        match self.stop {
            Some(stop) if stop != 0 => stop,
            _ => i64::MAX,
        }
    }

    /// `start` as a UTC timestamp.
    pub fn start_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.start)
    }

    /// Tracked duration; running entries are measured up to `now_ms`.
    pub fn duration_ms(&self, now_ms: i64) -> i64 {
        let end = if self.is_running() { now_ms } else { self.stop_or_max() };
        (end - self.start).max(0)
    }

    /// Whether the first `prefix.len()` details equal `prefix`, segment by
    /// segment.
    pub fn has_prefix(&self, prefix: &[String]) -> bool {
        self.details.len() >= prefix.len()
            && self.details.iter().zip(prefix).all(|(detail, segment)| detail == segment)
    }

    /// Detail segment at `depth`, if the path is that deep.
    pub fn detail_at(&self, depth: usize) -> Option<&str> {
        self.details.get(depth).map(String::as_str)
    }

    /// Label path joined with the task delimiter.
    pub fn path(&self) -> String {
        self.details.join(TASK_DELIMITER)
    }

    /// Check the `stop >= start` invariant.
    ///
    /// # Errors
    /// Returns `TimetrailError::InvalidInput` when a finished entry stops
    /// before it starts.
    pub fn validate(&self) -> Result<()> {
        match self.stop {
            Some(stop) if stop != 0 && stop < self.start => Err(TimetrailError::InvalidInput(
                format!("entry stops ({stop}) before it starts ({})", self.start),
            )),
            _ => Ok(()),
        }
    }
}

impl Identified for Entry {
    /// Entries without an id share the empty identity, so at most one
    /// unsaved entry fits in a collection.
    fn identity(&self) -> &str {
        self.id.as_deref().unwrap_or_default()
    }
}

/// Persisted record shape: `{ "entries": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntriesRecord {
    #[serde(default)]
    pub entries: Vec<Entry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(path: &[&str]) -> Vec<String> {
        path.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn prefix_matches_whole_segments_only() {
        let entry = Entry::new(0, Some(1), details(&["ClientA", "ProjectX", "Design"]));

        assert!(entry.has_prefix(&[]));
        assert!(entry.has_prefix(&details(&["ClientA"])));
        assert!(entry.has_prefix(&details(&["ClientA", "ProjectX", "Design"])));
        assert!(!entry.has_prefix(&details(&["Client"])));
        assert!(!entry.has_prefix(&details(&["clienta"])));
        assert!(!entry.has_prefix(&details(&["ClientA", "ProjectX", "Design", "Deeper"])));
    }

    #[test]
    fn zero_stop_means_running() {
        let running = Entry::new(1_000, Some(0), vec![]);
        assert!(running.is_running());
        assert_eq!(running.stop_or_max(), i64::MAX);
        assert_eq!(running.duration_ms(4_000), 3_000);

        let done = Entry::new(1_000, Some(2_500), vec![]);
        assert!(!done.is_running());
        assert_eq!(done.duration_ms(9_999), 1_500);
    }

    #[test]
    fn validate_rejects_inverted_interval() {
        assert!(Entry::new(10, Some(5), vec![]).validate().is_err());
        assert!(Entry::new(10, Some(10), vec![]).validate().is_ok());
        assert!(Entry::new(10, None, vec![]).validate().is_ok());
    }

    #[test]
    fn accepts_uid_alias_and_missing_fields() {
        let entry: Entry = serde_json::from_str(r#"{"uid":"abc","start":5}"#).unwrap();
        assert_eq!(entry.id(), Some("abc"));
        assert_eq!(entry.stop, None);
        assert!(entry.details.is_empty());

        let json = serde_json::to_value(Entry::new(5, None, details(&["A"]))).unwrap();
        assert_eq!(json, serde_json::json!({ "start": 5, "details": ["A"] }));
    }
}
