//! Persistence round-trip and edge case tests.

use std::path::PathBuf;
use tempfile::TempDir;

use crate::cache::CacheEntry;
use crate::error::StoreError;
use crate::persistence::{ensure_dir, load_json, load_json_or_default, save_json};
use wallfeed_core::{ProviderId, Wallpaper};

// ============================================================================
// JSON Persistence Tests
// ============================================================================

#[tokio::test]
async fn test_save_and_load_json_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("entry.json");

    let wallpaper = Wallpaper::builder(ProviderId::Pexels, "7", "https://p/7")
        .title(Some("Dunes".into()))
        .dimensions(4000, 3000)
        .tags(["sand", "desert"])
        .build();
    let entry = CacheEntry::new("featured:1:24", vec![wallpaper]);

    save_json(&file_path, &entry).await.unwrap();
    let loaded: CacheEntry = load_json(&file_path).await.unwrap();

    assert_eq!(loaded, entry);
}

#[tokio::test]
async fn test_save_creates_parent_directories() {
    let temp_dir = TempDir::new().unwrap();
    let nested_path = temp_dir.path().join("deeply").join("nested").join("test.json");

    save_json(&nested_path, &serde_json::json!({ "key": "value" }))
        .await
        .unwrap();
    assert!(nested_path.exists());
}

#[tokio::test]
async fn test_save_leaves_no_temp_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("data.json");

    save_json(&path, &vec![1, 2, 3]).await.unwrap();
    save_json(&path, &vec![4]).await.unwrap();

    assert!(!path.with_extension("json.tmp").exists());
    let loaded: Vec<u32> = load_json(&path).await.unwrap();
    assert_eq!(loaded, vec![4]);
}

#[tokio::test]
async fn test_load_nonexistent_file() {
    let file_path = PathBuf::from("/nonexistent/path/wallpapers.json");
    let result: Result<CacheEntry, _> = load_json(&file_path).await;
    assert!(matches!(result, Err(StoreError::Io(_))));
}

#[tokio::test]
async fn test_load_corrupt_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("bad.json");
    tokio::fs::write(&path, "{ truncated").await.unwrap();

    let result: Result<Vec<u32>, _> = load_json(&path).await;
    assert!(matches!(result, Err(StoreError::Serialization(_))));

    let fallback: Vec<u32> = load_json_or_default(&path).await;
    assert!(fallback.is_empty());
}

#[tokio::test]
async fn test_ensure_dir_is_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    let new_dir = temp_dir.path().join("new_directory");

    ensure_dir(&new_dir).await.unwrap();
    ensure_dir(&new_dir).await.unwrap();
    assert!(new_dir.is_dir());
}
