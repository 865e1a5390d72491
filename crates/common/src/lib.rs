//! Common building blocks shared across Timetrail crates.
//!
//! # Safety and Quality
//!
//! No `unsafe`, no panicking accessors. Everything here is synchronous and
//! free of I/O so both the core service layer and the infrastructure drivers
//! can depend on it.

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod collections;

pub use collections::{Identified, SortDirection, SortedVec};
