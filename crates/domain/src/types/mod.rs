//! Domain types and models

pub mod batch;
pub mod context;
pub mod entry;
pub mod events;
pub mod query;

pub use batch::{BatchItemFailure, BatchOp, BatchReport, BatchState};
pub use context::{Context, ContextKind, Period, PeriodKind};
pub use entry::{EntriesRecord, Entry};
pub use events::{StoreEvent, ToastLevel};
pub use query::{EntriesResponse, GroupBy, PageSlice, Pagination, QueryParams};
