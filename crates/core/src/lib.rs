//! # Timetrail Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - The filter/group/paginate query engine
//! - The backend driver port and the in-memory working set drivers share
//! - The batch mutation queue and context/period resolution
//! - The `EntryStore` service tying them together
//!
//! ## Architecture Principles
//! - Only depends on `timetrail-common` and `timetrail-domain`
//! - No filesystem, HTTP, or platform code
//! - All storage access via the `BackendDriver` trait
//! - Pure, testable business logic

pub mod backend;
pub mod batch;
pub mod collection;
pub mod context;
pub mod query;
pub mod store;

pub use backend::ports::BackendDriver;
pub use backend::WorkingSet;
pub use batch::{BatchLock, BatchPermit, BatchQueue};
pub use collection::{by_start, by_stop_desc, EntryCollection};
pub use context::ContextResolver;
pub use query::QueryEngine;
pub use store::observers::{BroadcastObserver, Observers, StoreObserver};
pub use store::EntryStore;
