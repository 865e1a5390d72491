//! HTTP client used by the remote driver

mod client;

pub use client::{HttpClient, HttpClientBuilder};
