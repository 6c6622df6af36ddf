//! Integration tests for the SQLite memory mirror and the startup load.

use std::time::Duration;

use chat_memory::{MemoryRepository, MemoryStore, DEFAULT_MEMORY_CAPACITY};

async fn repository() -> (MemoryRepository, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("memory.db");
    let repository = MemoryRepository::new(path.to_str().unwrap()).await.unwrap();
    (repository, dir)
}

#[tokio::test]
async fn upsert_and_load_round_trip() {
    let (repository, _dir) = repository().await;
    repository
        .upsert(7, &["likes tea".to_string(), "lives in Tokyo".to_string()])
        .await
        .unwrap();

    let rows = repository.load_all().await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].0, 7);
    assert_eq!(rows[0].1, vec!["likes tea", "lives in Tokyo"]);
}

#[tokio::test]
async fn upsert_replaces_content_for_same_user() {
    let (repository, _dir) = repository().await;
    repository.upsert(7, &["old".to_string()]).await.unwrap();
    repository
        .upsert(7, &["new a".to_string(), "new b".to_string()])
        .await
        .unwrap();

    let rows = repository.load_all().await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].1, vec!["new a", "new b"]);
}

#[tokio::test]
async fn store_loads_from_database_and_reports_synced() {
    let (repository, _dir) = repository().await;
    repository.upsert(7, &["likes tea".to_string()]).await.unwrap();

    let store = MemoryStore::with_repository(DEFAULT_MEMORY_CAPACITY, repository);
    assert!(!store.is_synced());
    store.load_from_database().await;
    assert!(store.is_synced());
    assert_eq!(store.memories(7), vec!["likes tea".to_string()]);
}

#[tokio::test]
async fn early_remember_wins_over_startup_load() {
    let (repository, _dir) = repository().await;
    repository.upsert(7, &["from disk".to_string()]).await.unwrap();

    let store = MemoryStore::with_repository(DEFAULT_MEMORY_CAPACITY, repository);
    store.remember(7, "from a live turn");
    store.load_from_database().await;

    let notes = store.memories(7);
    assert_eq!(notes, vec!["from a live turn".to_string()]);
}

#[tokio::test]
async fn remember_persists_in_background() {
    let (repository, _dir) = repository().await;
    let store = MemoryStore::with_repository(DEFAULT_MEMORY_CAPACITY, repository.clone());

    store.remember(7, "likes tea");

    // The upsert is fire-and-forget; poll until the row lands.
    let mut rows = Vec::new();
    for _ in 0..50 {
        rows = repository.load_all().await.unwrap();
        if !rows.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].1, vec!["likes tea"]);
}

#[tokio::test]
async fn oversized_rows_are_truncated_to_capacity_on_load() {
    let (repository, _dir) = repository().await;
    let notes: Vec<String> = (0..15).map(|i| format!("note {}", i)).collect();
    repository.upsert(7, &notes).await.unwrap();

    let store = MemoryStore::with_repository(DEFAULT_MEMORY_CAPACITY, repository);
    store.load_from_database().await;

    let loaded = store.memories(7);
    assert_eq!(loaded.len(), DEFAULT_MEMORY_CAPACITY);
    assert_eq!(loaded[0], "note 5");
    assert_eq!(loaded[9], "note 14");
}
