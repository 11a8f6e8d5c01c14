//! End-to-end sync tests: a real HTTP server over an in-memory document
//! store, exercised through the sync client.

use std::sync::Arc;

use chrono::NaiveDate;

use casefile::cache::LocalCache;
use casefile::record::{Criminal, Photo};
use casefile::server::{router, ServerState};
use casefile::{DocumentStore, EvidenceSet, HttpRemote, SyncClient};

async fn spawn_server() -> String {
    let store = DocumentStore::open_in_memory().unwrap();
    let app = router(ServerState::new(store), None);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

fn client(base_url: &str, dir: &std::path::Path) -> SyncClient {
    let cache = LocalCache::open(dir).unwrap();
    SyncClient::new(Arc::new(HttpRemote::new(base_url)), cache)
}

fn sample_set() -> EvidenceSet {
    let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
    let mut set = EvidenceSet::default();
    set.photos.push(Photo {
        id: 1_700_000_000_001,
        title: "scene overview".to_string(),
        description: "front entrance".to_string(),
        url: "https://example.com/p1.jpg".to_string(),
        date,
    });
    set.criminals.push(Criminal {
        id: 1_700_000_000_002,
        name: "John Doe".to_string(),
        age: 34,
        charges: "burglary".to_string(),
        status: "at large".to_string(),
        photo: String::new(),
        description: String::new(),
        date,
    });
    set
}

#[tokio::test]
async fn first_fetch_returns_empty_document() {
    let base_url = spawn_server().await;
    let dir = tempfile::tempdir().unwrap();

    let set = client(&base_url, dir.path()).load().await;
    assert!(set.is_empty());
}

#[tokio::test]
async fn save_then_load_roundtrips_over_http() {
    let base_url = spawn_server().await;
    let dir = tempfile::tempdir().unwrap();
    let client = client(&base_url, dir.path());

    let set = sample_set();
    client.save(&set).await.unwrap();

    assert_eq!(client.load().await, set);
}

#[tokio::test]
async fn writes_are_visible_to_other_clients() {
    let base_url = spawn_server().await;
    let dir_a = tempfile::tempdir().unwrap();
    let dir_b = tempfile::tempdir().unwrap();

    let writer = client(&base_url, dir_a.path());
    let reader = client(&base_url, dir_b.path());

    let set = sample_set();
    writer.save(&set).await.unwrap();

    assert_eq!(reader.load().await, set);
}

#[tokio::test]
async fn last_writer_wins() {
    let base_url = spawn_server().await;
    let dir_a = tempfile::tempdir().unwrap();
    let dir_b = tempfile::tempdir().unwrap();

    let first = client(&base_url, dir_a.path());
    let second = client(&base_url, dir_b.path());

    first.save(&sample_set()).await.unwrap();
    // The second client replaces the whole document.
    second.save(&EvidenceSet::default()).await.unwrap();

    assert!(first.load().await.is_empty());
}
