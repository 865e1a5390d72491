//! Shared test helpers for `timetrail-core` integration tests.
//!
//! These helpers provide an in-memory backend driver and a recording
//! observer so store tests can focus on behaviour instead of boilerplate.

#![allow(dead_code)]

pub mod backend;
pub mod observer;

use timetrail_domain::Entry;

/// Label path from string slices.
pub fn path(labels: &[&str]) -> Vec<String> {
    labels.iter().map(|label| (*label).to_string()).collect()
}

/// Finished entry lasting one hour.
pub fn entry(start: i64, labels: &[&str]) -> Entry {
    Entry::new(start, Some(start + 3_600_000), path(labels))
}
