//! Tests for the in-memory remote store.

use curio_core::{ListOptions, ManualClock, RemoteAsset, ResourceKind, UploadOptions};
use curio_storage::{InMemoryAssetStore, RemoteAssetStore};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

fn options(folder: &str, kind: ResourceKind) -> UploadOptions {
    UploadOptions::new(folder, kind)
}

#[tokio::test]
async fn test_upload_list_delete() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("photo.jpg");
    std::fs::write(&path, b"x").unwrap();

    let clock = Arc::new(ManualClock::new(1_000));
    let store = InMemoryAssetStore::with_clock(clock.clone());

    let first = store
        .upload(&path, &options("gallery", ResourceKind::Image))
        .await
        .unwrap();
    clock.advance(Duration::from_secs(1));
    let second = store
        .upload(&path, &options("gallery", ResourceKind::Image))
        .await
        .unwrap();

    assert!(first.url.starts_with("https://cdn.test/image/upload/v1/gallery/"));
    assert!(first.url.ends_with(".jpg"));
    assert_ne!(first.id, second.id);

    let listed = store.list(Some("gallery"), &ListOptions::default()).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id.as_deref(), Some(second.id.as_str()));
    assert_eq!(listed[0].timestamp, Some(2_000));

    store.delete(&first.id, ResourceKind::Image).await.unwrap();
    assert_eq!(store.len(), 1);
    assert_eq!(store.deleted_ids(), vec![first.id]);
}

#[tokio::test]
async fn test_raw_uploads_are_not_listed() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("cv.pdf");
    std::fs::write(&path, b"x").unwrap();
    let store = InMemoryAssetStore::new();

    let uploaded = store
        .upload(&path, &options("resumes", ResourceKind::Raw))
        .await
        .unwrap();

    assert!(uploaded.url.contains("/raw/upload/"));
    assert!(store.list(None, &ListOptions::default()).await.unwrap().is_empty());
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_failure_switches() {
    let store = InMemoryAssetStore::new();
    store.seed(
        "gallery",
        RemoteAsset {
            url: "https://cdn.test/a.png".to_string(),
            id: Some("gallery/a".to_string()),
            timestamp: Some(1),
        },
    );

    store.fail_listing(true);
    assert!(store.list(None, &ListOptions::default()).await.is_err());
    store.fail_listing(false);
    assert_eq!(store.list(None, &ListOptions::default()).await.unwrap().len(), 1);

    store.fail_deletes(true);
    assert!(store.delete("gallery/a", ResourceKind::Image).await.is_err());
    assert_eq!(store.len(), 1);

    store.fail_uploads(true);
    let err = store
        .upload(
            std::path::Path::new("a.png"),
            &options("gallery", ResourceKind::Image),
        )
        .await
        .unwrap_err();
    assert!(err.is_upstream());

    assert_eq!(store.list_calls(), 2);
    assert_eq!(store.delete_calls(), 1);
    assert_eq!(store.upload_calls(), 1);
}
