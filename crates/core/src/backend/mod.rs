//! Backend driver port and the working set shared by in-memory drivers

pub mod ports;
mod working_set;

pub use working_set::WorkingSet;
