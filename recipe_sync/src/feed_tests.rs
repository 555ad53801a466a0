//! Tests for feed loading

use crate::error::{ErrorKind, SyncError};
use crate::feed::{parse_snapshot, FeedSource};
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SNAPSHOT: &str = r#"[
    {"id": 1, "name": "Dirt Seed", "tier": 1, "recipe": "Dirt"},
    {"id": 2, "name": "Rock Seed", "tier": 2, "recipe": ""}
]"#;

#[test]
fn parse_detects_urls() {
    assert_eq!(
        FeedSource::parse("https://example.com/items.json"),
        FeedSource::Url("https://example.com/items.json".to_string())
    );
    assert_eq!(
        FeedSource::parse("http://localhost:8080/items"),
        FeedSource::Url("http://localhost:8080/items".to_string())
    );
    assert_eq!(
        FeedSource::parse("items.json"),
        FeedSource::File(PathBuf::from("items.json"))
    );
}

#[test]
fn parse_snapshot_returns_descriptors() {
    let descriptors = parse_snapshot(SNAPSHOT).unwrap();
    assert_eq!(descriptors.len(), 2);
    assert_eq!(descriptors[0]["name"], "Dirt Seed");
}

#[test]
fn parse_snapshot_keeps_malformed_entries() {
    // Per-item validation happens during ingestion
    let descriptors = parse_snapshot(r#"[{"id": 1}, "junk", 42]"#).unwrap();
    assert_eq!(descriptors.len(), 3);
}

#[test]
fn parse_snapshot_rejects_non_array() {
    let err = parse_snapshot(r#"{"items": []}"#).unwrap_err();
    assert!(matches!(err, SyncError::InvalidFeed(_)));
    assert_eq!(err.kind(), ErrorKind::FeedUnreadable);
    assert!(err.to_string().contains("an object"));
}

#[test]
fn parse_snapshot_rejects_invalid_json() {
    let err = parse_snapshot("[{\"id\": 1,").unwrap_err();
    assert!(matches!(err, SyncError::Parse(_)));
    assert_eq!(err.kind(), ErrorKind::FeedUnreadable);
}

#[tokio::test]
async fn fetch_reads_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    write!(temp_file, "{}", SNAPSHOT).unwrap();

    let feed = FeedSource::File(temp_file.path().to_path_buf());
    let descriptors = feed.fetch().await.unwrap();
    assert_eq!(descriptors.len(), 2);
}

#[tokio::test]
async fn fetch_missing_file_is_unreadable() {
    let feed = FeedSource::File(PathBuf::from("/nonexistent/dir/items.json"));
    let err = feed.fetch().await.unwrap_err();
    assert!(matches!(err, SyncError::Io(_)));
    assert_eq!(err.kind(), ErrorKind::FeedUnreadable);
}

#[tokio::test]
async fn fetch_reads_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/items.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SNAPSHOT))
        .mount(&server)
        .await;

    let feed = FeedSource::parse(&format!("{}/items.json", server.uri()));
    let descriptors = feed.fetch().await.unwrap();
    assert_eq!(descriptors.len(), 2);
    assert_eq!(descriptors[1]["id"], 2);
}

#[tokio::test]
async fn fetch_url_error_status_is_unreadable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/items.json"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let feed = FeedSource::parse(&format!("{}/items.json", server.uri()));
    let err = feed.fetch().await.unwrap_err();
    assert!(matches!(
        err,
        SyncError::HttpStatus(status) if status == reqwest::StatusCode::SERVICE_UNAVAILABLE
    ));
    assert_eq!(err.kind(), ErrorKind::FeedUnreadable);
}

#[test]
fn display_shows_location() {
    assert_eq!(
        FeedSource::parse("https://example.com/items.json").to_string(),
        "https://example.com/items.json"
    );
    assert_eq!(FeedSource::parse("items.json").to_string(), "items.json");
}
