use catalog_core::prelude::*;
use std::sync::Arc;

#[tokio::test]
async fn test_concurrent_adds_can_lose_updates() {
    let _ = tracing_subscriber::fmt::try_init();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("race_test.json");
    // Rename-based writes so a reader never sees a half-written file
    let config = StoreConfig::new(path.clone()).with_atomic_writes(true);
    let store = Arc::new(JsonFileStore::new(config));

    let count = 20;
    let mut handles = Vec::new();
    for i in 0..count {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            let code = format!("code-{}", i);
            store.add(NewProduct::new("Item", "racing", 1, "none", code, 1)).await
        }));
    }

    for handle in handles {
        let outcome = handle.await.unwrap().unwrap();
        assert!(outcome.product().is_some());
    }

    // Every call succeeded, but interleaved read-modify-write cycles may
    // have overwritten each other. The file is still a valid catalog.
    let survivors = JsonFileStore::open(path).load().await.unwrap();
    println!("{} of {} products survived", survivors.len(), count);
    assert!(!survivors.is_empty());
    assert!(survivors.len() <= count);
}

#[tokio::test]
async fn test_sequential_adds_from_clones_see_each_other() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::open(dir.path().join("products.json"));
    let other = store.clone();

    store.add(NewProduct::new("A", "d", 1, "t", "c1", 1)).await.unwrap();
    let outcome = other.add(NewProduct::new("B", "d", 1, "t", "c1", 1)).await.unwrap();

    // No cache: the clone re-reads the file and sees the taken code
    assert!(matches!(
        outcome,
        AddOutcome::Rejected(Warning::DuplicateCode { .. })
    ));
}
