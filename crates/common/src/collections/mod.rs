//! Specialized data structures
//!
//! - **[`sorted`]**: ordered vector with positional insert and identity
//!   deduplication
//!
//! ## Usage
//!
//! ```rust
//! use timetrail_common::collections::{Identified, SortDirection, SortedVec};
//!
//! #[derive(Clone)]
//! struct Item {
//!     id: String,
//!     at: i64,
//! }
//!
//! impl Identified for Item {
//!     fn identity(&self) -> &str {
//!         &self.id
//!     }
//! }
//!
//! let mut items = SortedVec::new(|item: &Item| item.at, SortDirection::Ascending);
//! items.insert(Item { id: "b".into(), at: 20 });
//! items.insert(Item { id: "a".into(), at: 10 });
//! assert_eq!(items.first().map(|i| i.at), Some(10));
//! ```

pub mod sorted;

pub use sorted::{Identified, SortDirection, SortedVec};
