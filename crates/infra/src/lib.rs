//! # Timetrail Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - Key-value persistence (filesystem and in-memory)
//! - The local and remote backend drivers
//! - HTTP client implementation
//! - Configuration loading and tracing setup
//!
//! ## Architecture
//! - Implements `BackendDriver` defined in `timetrail-core`
//! - Depends on `timetrail-domain` and `timetrail-core`
//! - Contains all "impure" code (filesystem, network)

pub mod backend;
pub mod config;
pub mod errors;
pub mod http;
pub mod observability;
pub mod storage;

// Re-export commonly used items
pub use backend::{build_backend, LocalDriver, RemoteDriver, SnapshotDriver};
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use storage::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
