//! Tests for the directory-backed remote store.

use curio_core::{ListOptions, ResourceKind, UploadOptions};
use curio_storage::{DirectoryAssetStore, RemoteAssetStore};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn store_in(temp_dir: &TempDir) -> DirectoryAssetStore {
    DirectoryAssetStore::new(temp_dir.path().join("objects"), "https://media.test/")
        .unwrap()
}

fn staged(temp_dir: &TempDir, name: &str, data: &[u8]) -> PathBuf {
    let dir = temp_dir.path().join("uploads");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, data).unwrap();
    path
}

fn image_into(folder: &str) -> UploadOptions {
    UploadOptions::new(folder, ResourceKind::Image)
}

#[tokio::test]
async fn test_upload_names_object_after_content() {
    let temp_dir = TempDir::new().unwrap();
    let store = store_in(&temp_dir);
    let path = staged(&temp_dir, "Sunset.JPG", b"pixels");

    let uploaded = store.upload(&path, &image_into("gallery")).await.unwrap();

    let name = uploaded.id.strip_prefix("gallery/").unwrap();
    let (hash, nonce) = name.split_once('-').unwrap();
    assert_eq!(hash.len(), 16);
    assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(nonce.len(), 32);
    assert_eq!(
        uploaded.url,
        format!("https://media.test/image/upload/{}.jpg", uploaded.id)
    );
    let stored = temp_dir
        .path()
        .join("objects/image")
        .join(format!("{}.jpg", uploaded.id));
    assert_eq!(std::fs::read(stored).unwrap(), b"pixels");
}

#[tokio::test]
async fn test_identical_uploads_are_independent_objects() {
    let temp_dir = TempDir::new().unwrap();
    let store = store_in(&temp_dir);
    let first = staged(&temp_dir, "a.png", b"same");
    let second = staged(&temp_dir, "b.png", b"same");

    let a = store.upload(&first, &image_into("gallery")).await.unwrap();
    let b = store.upload(&second, &image_into("gallery")).await.unwrap();

    assert_ne!(a.id, b.id);
    assert_ne!(a.url, b.url);
    let listed = store.list(None, &ListOptions::default()).await.unwrap();
    assert_eq!(listed.len(), 2);

    store.delete(&a.id, ResourceKind::Image).await.unwrap();
    let remaining = store.list(None, &ListOptions::default()).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id.as_deref(), Some(b.id.as_str()));
    assert_eq!(remaining[0].url, b.url);
}

#[tokio::test]
async fn test_concurrent_identical_uploads_leave_no_temp_files() {
    let temp_dir = TempDir::new().unwrap();
    let store = std::sync::Arc::new(store_in(&temp_dir));
    let path = staged(&temp_dir, "same.png", b"same bytes");

    let mut handles = Vec::new();
    for _ in 0..8 {
        let store = store.clone();
        let path = path.clone();
        handles.push(tokio::spawn(async move {
            store.upload(&path, &image_into("gallery")).await
        }));
    }
    let mut ids = std::collections::HashSet::new();
    for handle in handles {
        ids.insert(handle.await.unwrap().unwrap().id);
    }
    assert_eq!(ids.len(), 8);

    let entries: Vec<_> = std::fs::read_dir(temp_dir.path().join("objects/image/gallery"))
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(entries.len(), 8);
    assert!(entries.iter().all(|name| name.ends_with(".png")));
}

#[tokio::test]
async fn test_upload_takes_extension_from_original_name() {
    let temp_dir = TempDir::new().unwrap();
    let store = store_in(&temp_dir);
    let path = staged(&temp_dir, "upload-1", b"%PDF-1.7");

    let options =
        UploadOptions::new("resumes", ResourceKind::Raw).with_file_name("CV.PDF".to_string());
    let uploaded = store.upload(&path, &options).await.unwrap();
    assert!(uploaded.url.ends_with(".pdf"), "{}", uploaded.url);

    let bare = store
        .upload(&path, &UploadOptions::new("resumes", ResourceKind::Raw))
        .await
        .unwrap();
    assert!(bare.url.ends_with(".bin"), "{}", bare.url);
}

#[tokio::test]
async fn test_upload_missing_file_is_upstream_error() {
    let temp_dir = TempDir::new().unwrap();
    let store = store_in(&temp_dir);

    let err = store
        .upload(Path::new("/definitely/not/here.png"), &image_into("gallery"))
        .await
        .unwrap_err();
    assert!(err.is_upstream());
}

#[tokio::test]
async fn test_upload_rejects_escaping_folder() {
    let temp_dir = TempDir::new().unwrap();
    let store = store_in(&temp_dir);
    let path = staged(&temp_dir, "a.png", b"x");

    for folder in ["../outside", "/abs", ""] {
        assert!(
            store.upload(&path, &image_into(folder)).await.is_err(),
            "{folder:?} should be rejected"
        );
    }
}

#[tokio::test]
async fn test_list_filters_by_folder_and_kind() {
    let temp_dir = TempDir::new().unwrap();
    let store = store_in(&temp_dir);

    let g = staged(&temp_dir, "g.png", b"gallery");
    let p = staged(&temp_dir, "p.png", b"project");
    let r = staged(&temp_dir, "r.pdf", b"resume");
    store.upload(&g, &image_into("gallery")).await.unwrap();
    store.upload(&p, &image_into("projects")).await.unwrap();
    store
        .upload(
            &r,
            &UploadOptions::new("resumes", ResourceKind::Raw),
        )
        .await
        .unwrap();

    let all = store.list(None, &ListOptions::default()).await.unwrap();
    assert_eq!(all.len(), 2);
    assert!(all.iter().all(|asset| asset.timestamp.is_some()));

    let projects = store
        .list(Some("projects"), &ListOptions::default())
        .await
        .unwrap();
    assert_eq!(projects.len(), 1);
    assert!(projects[0].id.as_deref().unwrap().starts_with("projects/"));

    let limited = store
        .list(None, &ListOptions { max_results: 1 })
        .await
        .unwrap();
    assert_eq!(limited.len(), 1);

    let empty = store
        .list(Some("nothing-here"), &ListOptions::default())
        .await
        .unwrap();
    assert!(empty.is_empty());
}

#[tokio::test]
async fn test_delete_removes_object() {
    let temp_dir = TempDir::new().unwrap();
    let store = store_in(&temp_dir);
    let path = staged(&temp_dir, "a.webp", b"data");
    let uploaded = store.upload(&path, &image_into("gallery")).await.unwrap();

    store.delete(&uploaded.id, ResourceKind::Image).await.unwrap();

    assert!(store.list(None, &ListOptions::default()).await.unwrap().is_empty());
    let err = store
        .delete(&uploaded.id, ResourceKind::Image)
        .await
        .unwrap_err();
    assert!(err.is_upstream());
}

#[tokio::test]
async fn test_delete_respects_kind() {
    let temp_dir = TempDir::new().unwrap();
    let store = store_in(&temp_dir);
    let path = staged(&temp_dir, "a.png", b"data");
    let uploaded = store.upload(&path, &image_into("gallery")).await.unwrap();

    assert!(store.delete(&uploaded.id, ResourceKind::Raw).await.is_err());
    assert!(store.delete("../../etc/passwd", ResourceKind::Image).await.is_err());
    assert_eq!(store.list(None, &ListOptions::default()).await.unwrap().len(), 1);
}
