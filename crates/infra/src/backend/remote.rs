//! Remote driver storing the record on an account service

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use timetrail_core::QueryEngine;
use timetrail_domain::{EntriesRecord, RemoteConfig, Result, TimetrailError};
use tracing::{instrument, warn};

use super::snapshot::{RecordStore, SnapshotDriver};
use crate::errors::InfraError;
use crate::http::HttpClient;

/// Entries stored as one record per account on a remote service.
pub type RemoteDriver = SnapshotDriver<RemoteRecordStore>;

/// Wire body: the serialized record travels as a string.
#[derive(Debug, Serialize, Deserialize)]
struct AccountRecord {
    data: String,
}

/// Record store behind [`RemoteDriver`].
///
/// Reads `GET {base}/accounts/{key}/entries`, writes the whole record with
/// `PUT` on the same URL.
pub struct RemoteRecordStore {
    http: HttpClient,
    url: String,
}

impl RemoteRecordStore {
    pub fn new(http: HttpClient, base_url: &str, account_key: &str) -> Self {
        let url = format!("{}/accounts/{}/entries", base_url.trim_end_matches('/'), account_key);
        Self { http, url }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl RecordStore for RemoteRecordStore {
    fn name(&self) -> &'static str {
        "remote"
    }

    #[instrument(skip(self), fields(url = %self.url))]
    async fn load(&self) -> Result<EntriesRecord> {
        let response = self.http.send(self.http.request(Method::GET, &self.url)).await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Ok(EntriesRecord::default());
        }
        if !status.is_success() {
            return Err(TimetrailError::RemoteSync(format!("loading entries failed: HTTP {status}")));
        }

        let body = response.text().await.map_err(InfraError::from)?;
        let record = serde_json::from_str::<AccountRecord>(&body)
            .and_then(|account| serde_json::from_str::<EntriesRecord>(&account.data));
        match record {
            Ok(record) => Ok(record),
            Err(err) => {
                warn!(error = %err, "remote entries are unreadable, treating as empty");
                Ok(EntriesRecord::default())
            }
        }
    }

    #[instrument(skip(self, record), fields(url = %self.url, entries = record.entries.len()))]
    async fn save(&self, record: &EntriesRecord) -> Result<()> {
        let data = serde_json::to_string(record).map_err(InfraError::from)?;
        let request = self.http.request(Method::PUT, &self.url).json(&AccountRecord { data });
        let response = self.http.send(request).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TimetrailError::RemoteSync(format!("saving entries failed: HTTP {status}")));
        }
        Ok(())
    }
}

impl RemoteDriver {
    /// Driver for the account described by `config`.
    ///
    /// # Errors
    /// Returns `TimetrailError::Config` if the HTTP client cannot be built.
    pub fn remote(config: &RemoteConfig, engine: QueryEngine) -> Result<Self> {
        let mut builder = HttpClient::builder().timeout(config.timeout());
        if let Some(token) = &config.api_token {
            builder = builder.bearer_token(token);
        }
        let http = builder.build()?;
        Ok(SnapshotDriver::new(
            RemoteRecordStore::new(http, &config.base_url, &config.account_key),
            engine,
        ))
    }
}
