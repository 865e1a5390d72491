//! Remote driver against a mock account service

mod support;

use std::sync::Arc;

use serde_json::{json, Value};
use support::{entry, path, remote_config, JAN_1};
use timetrail_core::{BackendDriver, EntryStore, QueryEngine};
use timetrail_domain::{
    BackendKind, Config, EntriesRecord, QueryParams, StoreEvent, TimetrailError,
};
use timetrail_infra::{build_backend, RemoteDriver};
use wiremock::matchers::{header, method, path as url_path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ENTRIES_PATH: &str = "/accounts/acc-1/entries";

fn account_body(record: &EntriesRecord) -> Value {
    json!({ "data": serde_json::to_string(record).unwrap() })
}

fn driver_for(server: &MockServer) -> RemoteDriver {
    RemoteDriver::remote(&remote_config(&server.uri()), QueryEngine::default()).unwrap()
}

async fn last_put_record(server: &MockServer) -> EntriesRecord {
    let requests = server.received_requests().await.unwrap();
    let put = requests
        .iter()
        .rev()
        .find(|request| request.method.as_str() == "PUT")
        .expect("a PUT request should have been sent");
    let body: Value = serde_json::from_slice(&put.body).unwrap();
    serde_json::from_str(body["data"].as_str().unwrap()).unwrap()
}

#[tokio::test]
async fn test_get_reads_account_record_with_token() {
    let server = MockServer::start().await;
    let record = EntriesRecord {
        entries: vec![
            entry(JAN_1, &["ClientA", "Design"]).with_id("a"),
            entry(JAN_1 + 1, &["ClientB"]).with_id("b"),
        ],
    };
    Mock::given(method("GET"))
        .and(url_path(ENTRIES_PATH))
        .and(header("authorization", "Bearer token-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(account_body(&record)))
        .expect(1)
        .mount(&server)
        .await;

    let driver = driver_for(&server);
    let response = driver
        .get_entries(&QueryParams::new().with_context(path(&["ClientA"])))
        .await
        .unwrap();

    assert_eq!(response.entries, vec![record.entries[0].clone()]);
}

#[tokio::test]
async fn test_missing_account_record_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(url_path(ENTRIES_PATH))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = driver_for(&server).get_entries(&QueryParams::new()).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_unreadable_remote_payload_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(url_path(ENTRIES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": "not entries" })))
        .mount(&server)
        .await;

    let err = driver_for(&server).get_entries(&QueryParams::new()).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_post_writes_whole_record() {
    let server = MockServer::start().await;
    let existing = EntriesRecord { entries: vec![entry(JAN_1, &["Old"]).with_id("old")] };
    Mock::given(method("GET"))
        .and(url_path(ENTRIES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(account_body(&existing)))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(url_path(ENTRIES_PATH))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let driver = driver_for(&server);
    let posted = driver.post_entries(vec![entry(JAN_1 + 10, &["New"])]).await.unwrap();

    let saved = last_put_record(&server).await;
    assert_eq!(saved.entries.len(), 2);
    assert_eq!(saved.entries[0].id(), Some("old"));
    assert_eq!(saved.entries[1], posted[0]);
}

#[tokio::test]
async fn test_server_error_is_single_attempt_remote_sync_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(url_path(ENTRIES_PATH))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let err = driver_for(&server).get_entries(&QueryParams::new()).await.unwrap_err();
    assert!(matches!(err, TimetrailError::RemoteSync(_)));
}

#[tokio::test]
async fn test_failed_save_leaves_driver_state_unchanged() {
    let server = MockServer::start().await;
    let existing = EntriesRecord { entries: vec![entry(JAN_1, &["Kept"]).with_id("kept")] };
    Mock::given(method("GET"))
        .and(url_path(ENTRIES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(account_body(&existing)))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(url_path(ENTRIES_PATH))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let driver = driver_for(&server);
    let err = driver.post_entries(vec![entry(JAN_1 + 10, &["Lost"])]).await.unwrap_err();
    assert!(matches!(err, TimetrailError::RemoteSync(_)));

    let response = driver.get_entries(&QueryParams::new()).await.unwrap();
    assert_eq!(response.entries, existing.entries);
}

#[tokio::test]
async fn test_store_surfaces_remote_failure_as_toast() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let mut config = Config::default();
    config.storage.backend = BackendKind::Remote;
    config.remote = Some(remote_config(&server.uri()));
    let backend = build_backend(&config).await.unwrap();
    assert_eq!(backend.name(), "remote");

    let observer = Arc::new(timetrail_core::BroadcastObserver::new(8));
    let mut events = observer.subscribe();
    let store = EntryStore::new(backend).with_observer(observer);

    let err = store.get_entries(QueryParams::new()).await.unwrap_err();
    assert!(matches!(err, TimetrailError::RemoteSync(_)));

    let mut saw_toast = false;
    while let Ok(event) = events.try_recv() {
        saw_toast |= matches!(event, StoreEvent::Toast { .. });
    }
    assert!(saw_toast);
}

#[tokio::test]
async fn test_build_backend_requires_remote_section() {
    let mut config = Config::default();
    config.storage.backend = BackendKind::Remote;

    let err = build_backend(&config).await.err().unwrap();
    assert!(matches!(err, TimetrailError::Config(_)));
}
