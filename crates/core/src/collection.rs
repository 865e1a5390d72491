//! Entry views over the shared sorted collection
//!
//! The store keeps two views of the same entries: the visible window,
//! ordered by `start` ascending, and the canonical collection, ordered by
//! `stop` descending with running entries first.

use timetrail_common::{SortDirection, SortedVec};
use timetrail_domain::Entry;

/// Sorted, id-deduplicated entry collection.
pub type EntryCollection = SortedVec<Entry>;

fn start_key(entry: &Entry) -> i64 {
    entry.start
}

fn stop_key(entry: &Entry) -> i64 {
    entry.stop_or_max()
}

/// Empty collection ordered by `start` ascending.
pub fn by_start() -> EntryCollection {
    SortedVec::new(start_key, SortDirection::Ascending)
}

/// Empty collection ordered by `stop` descending, running entries first.
pub fn by_stop_desc() -> EntryCollection {
    SortedVec::new(stop_key, SortDirection::Descending)
}
