//! Batch mutation queue
//!
//! Bulk edits against the canonical collection run one item at a time,
//! yielding to the runtime between items. Only one batch may run at once;
//! the lock stays held until the caller has persisted the result.

mod lock;
mod queue;

pub use lock::{BatchLock, BatchPermit};
pub use queue::BatchQueue;
