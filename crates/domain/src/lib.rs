//! # Timetrail Domain
//!
//! Business domain types and models for Timetrail.
//!
//! This crate contains:
//! - Domain data types (Entry, Context, query parameters and responses)
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Domain constants
//!
//! ## Architecture
//! - Depends only on `timetrail-common` (for the `Identified` contract)
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
