use super::*;

#[tokio::test]
async fn test_memory_store_get_set() {
    let store = MemoryStore::new();

    assert_eq!(store.get("missing").await.unwrap(), None);

    store
        .set("key", b"value".to_vec(), Duration::from_secs(60))
        .await
        .unwrap();
    assert_eq!(store.get("key").await.unwrap(), Some(b"value".to_vec()));

    store
        .set("key", b"other".to_vec(), Duration::from_secs(60))
        .await
        .unwrap();
    assert_eq!(store.peek("key"), Some(b"other".to_vec()));

    store.run_pending_tasks();
    assert_eq!(store.len(), 1);
    assert!(store.contains("key"));
}

#[tokio::test]
async fn test_memory_store_ttl_expires() {
    let store = MemoryStore::new();
    store
        .set("short", b"v".to_vec(), Duration::from_millis(200))
        .await
        .unwrap();
    store
        .set("forever", b"v".to_vec(), Duration::ZERO)
        .await
        .unwrap();

    assert!(store.get("short").await.unwrap().is_some());

    tokio::time::sleep(Duration::from_millis(400)).await;

    assert_eq!(store.get("short").await.unwrap(), None);
    assert!(store.get("forever").await.unwrap().is_some());
}

#[tokio::test]
async fn test_arc_dyn_store() {
    let store: Arc<dyn CacheStore> = Arc::new(MemoryStore::new());
    store
        .set("k", vec![1, 2, 3], Duration::from_secs(1))
        .await
        .unwrap();

    assert_eq!(store.get("k").await.unwrap(), Some(vec![1, 2, 3]));
    assert_eq!(store.name(), "memory");
}

#[tokio::test]
async fn test_timeout_store_turns_hang_into_error() {
    let store = TimeoutStore::new(
        RecordingStore::with_get_delay(Duration::from_secs(3600)),
        Duration::from_millis(50),
    );

    let err = store.get("k").await.unwrap_err();
    assert!(matches!(err, StoreError::Timeout(_)));

    store
        .set("k", b"v".to_vec(), Duration::ZERO)
        .await
        .expect("set is not delayed");
    assert_eq!(store.inner().set_count(), 1);
}

#[tokio::test]
async fn test_failing_store_modes() {
    let both = FailingStore::new();
    assert!(both.get("k").await.is_err());
    assert!(both.set("k", vec![], Duration::ZERO).await.is_err());
    assert_eq!(both.attempts(), 2);

    let sets = FailingStore::failing_sets();
    assert_eq!(sets.get("k").await.unwrap(), None);
    assert!(sets.set("k", vec![], Duration::ZERO).await.is_err());

    let gets = FailingStore::failing_gets();
    assert!(gets.get("k").await.is_err());
    assert!(gets.set("k", vec![], Duration::ZERO).await.is_ok());
}

#[tokio::test]
async fn test_recording_store_records_calls() {
    let store = RecordingStore::new();
    store.get("a").await.unwrap();
    store
        .set("a", b"xyz".to_vec(), Duration::from_secs(5))
        .await
        .unwrap();

    assert_eq!(
        store.calls(),
        vec![
            StoreCall::Get { key: "a".into() },
            StoreCall::Set {
                key: "a".into(),
                ttl: Duration::from_secs(5),
                len: 3
            },
        ]
    );
    assert_eq!(store.sets(), vec![("a".to_string(), Duration::from_secs(5))]);
}
