//! Key-value persistence for serialized records

mod kv;

pub use kv::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
