//! Integration tests for the directory backend behind the engine.

use std::sync::Arc;

use memsource::{
    CacheEntry, Config, DirectoryBackend, FetchError, Memsource, Mode, RecordingStore,
};
use tempfile::TempDir;

fn tile_dir() -> TempDir {
    let dir = TempDir::new().expect("temp dir");
    std::fs::create_dir_all(dir.path().join("tiles/2/1")).unwrap();
    std::fs::write(dir.path().join("tiles/2/1/1.png"), b"\x89PNG\r\n\x1a\n").unwrap();
    std::fs::write(
        dir.path().join("tiles/metadata.json"),
        br#"{"name":"demo","minzoom":0,"maxzoom":4}"#,
    )
    .unwrap();
    dir
}

fn engine(dir: &TempDir, mode: Mode) -> (Arc<RecordingStore>, Memsource) {
    let store = Arc::new(RecordingStore::new());
    let config = Config {
        mode,
        root: dir.path().to_path_buf(),
        ..Config::default()
    };
    config.validate().expect("valid config");
    let source = Memsource::from_config(
        &config,
        store.clone(),
        Arc::new(DirectoryBackend::new(config.root.clone())),
    )
    .build();
    (store, source)
}

#[tokio::test]
async fn test_file_served_then_cached() {
    let dir = tile_dir();
    let (store, source) = engine(&dir, Mode::ReadThrough);

    let live = source.get("tiles/2/1/1.png").await.unwrap();
    source.settle().await;
    let cached = source.get("tiles/2/1/1.png").await.unwrap();

    assert!(cached.is_cached());
    assert_eq!(cached.payload, live.payload);
    assert_eq!(cached.headers.content_type(), Some("image/png"));
    assert_eq!(cached.headers.content_length(), Some("8"));
    assert_eq!(store.get_count(), 2);
}

#[tokio::test]
async fn test_json_file_comes_back_structured() {
    let dir = tile_dir();
    let (_store, source) = engine(&dir, Mode::ReadThrough);

    let live = source.get("tiles/metadata.json").await.unwrap();
    assert!(!live.payload.is_json());
    source.settle().await;

    let cached = source.get("tiles/metadata.json").await.unwrap();
    assert_eq!(cached.payload.as_json().unwrap()["name"], "demo");
}

#[tokio::test]
async fn test_missing_file_cached_as_sentinel() {
    let dir = tile_dir();
    let (store, source) = engine(&dir, Mode::Relay);

    let err = source.get("tiles/9/9/9.png").await.unwrap_err();
    assert_eq!(err, FetchError::not_found());
    source.settle().await;

    let raw = store.peek(&source.key_for("tiles/9/9/9.png")).unwrap();
    assert_eq!(CacheEntry::decode(&raw).unwrap(), CacheEntry::NotFound);
}

#[tokio::test]
async fn test_traversal_is_forbidden_and_cached() {
    let dir = tile_dir();
    let (store, source) = engine(&dir, Mode::ReadThrough);

    let err = source.get("../outside.png").await.unwrap_err();
    assert_eq!(err.status, Some(403));
    source.settle().await;

    assert_eq!(
        store.peek(&source.key_for("../outside.png")),
        Some(b"403".to_vec())
    );
    let cached = source.get("../outside.png").await.unwrap_err();
    assert!(cached.is_cached());
}

#[tokio::test]
async fn test_roots_do_not_share_entries() {
    let a = tile_dir();
    let b = tile_dir();
    let (_, source_a) = engine(&a, Mode::ReadThrough);
    let (_, source_b) = engine(&b, Mode::ReadThrough);

    assert_ne!(
        source_a.key_for("tiles/2/1/1.png"),
        source_b.key_for("tiles/2/1/1.png")
    );
}
