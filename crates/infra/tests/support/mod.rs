//! Shared helpers for `timetrail-infra` integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use tempfile::TempDir;
use timetrail_core::QueryEngine;
use timetrail_domain::{Entry, RemoteConfig};
use timetrail_infra::{FileKeyValueStore, KeyValueStore, LocalDriver};

pub const HOUR: i64 = 3_600_000;
pub const JAN_1: i64 = 1_704_067_200_000;

/// Label path from string slices.
pub fn path(labels: &[&str]) -> Vec<String> {
    labels.iter().map(|label| (*label).to_string()).collect()
}

/// Finished entry lasting one hour.
pub fn entry(start: i64, labels: &[&str]) -> Entry {
    Entry::new(start, Some(start + HOUR), path(labels))
}

/// File-backed key-value store in a fresh temporary directory.
///
/// The directory lives as long as the returned guard.
pub struct TempStore {
    pub kv: Arc<FileKeyValueStore>,
    pub dir: TempDir,
}

impl TempStore {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("temp dir should be created");
        let kv = Arc::new(FileKeyValueStore::new(dir.path()));
        Self { kv, dir }
    }

    pub fn shared(&self) -> Arc<dyn KeyValueStore> {
        self.kv.clone()
    }

    pub async fn driver(&self, namespace: &str) -> LocalDriver {
        LocalDriver::open(self.shared(), namespace, QueryEngine::default())
            .await
            .expect("local driver should open")
    }
}

/// Remote section pointing at a mock server.
pub fn remote_config(base_url: &str) -> RemoteConfig {
    RemoteConfig {
        base_url: base_url.to_string(),
        account_key: "acc-1".to_string(),
        api_token: Some("token-1".to_string()),
        timeout_secs: 5,
    }
}
