//! In-memory remote asset store.
//!
//! Holds objects in a `Vec` behind a lock and can be told to fail any of its
//! operations. Useful for tests and for exercising degradation paths.

use crate::RemoteAssetStore;
use curio_core::{
    Clock, ListOptions, RemoteAsset, ResourceKind, SystemClock, UploadOptions, UploadedAsset,
};
use curio_error::{CurioResult, UpstreamError, UpstreamErrorKind};
use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

#[derive(Debug, Clone)]
struct StoredObject {
    id: String,
    url: String,
    kind: ResourceKind,
    folder: String,
    timestamp: i64,
}

/// Remote store that keeps everything in memory.
///
/// # Example
///
/// ```
/// use curio_core::ResourceKind;
/// use curio_storage::{InMemoryAssetStore, RemoteAssetStore};
///
/// # async fn example() {
/// let store = InMemoryAssetStore::new();
/// store.fail_deletes(true);
///
/// assert!(store.delete("gallery/abc", ResourceKind::Image).await.is_err());
/// assert_eq!(store.delete_calls(), 1);
/// # }
/// ```
#[derive(Debug)]
pub struct InMemoryAssetStore {
    base_url: String,
    clock: Arc<dyn Clock>,
    objects: Mutex<Vec<StoredObject>>,
    deleted: Mutex<Vec<String>>,
    next_id: AtomicUsize,
    fail_uploads: AtomicBool,
    fail_deletes: AtomicBool,
    fail_listing: AtomicBool,
    upload_calls: AtomicUsize,
    delete_calls: AtomicUsize,
    list_calls: AtomicUsize,
}

impl InMemoryAssetStore {
    /// Create an empty store using the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create an empty store that timestamps uploads with `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            base_url: "https://cdn.test".to_string(),
            clock,
            objects: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
            next_id: AtomicUsize::new(1),
            fail_uploads: AtomicBool::new(false),
            fail_deletes: AtomicBool::new(false),
            fail_listing: AtomicBool::new(false),
            upload_calls: AtomicUsize::new(0),
            delete_calls: AtomicUsize::new(0),
            list_calls: AtomicUsize::new(0),
        }
    }

    /// Add an image object as if it had been uploaded out of band.
    pub fn seed(&self, folder: impl Into<String>, asset: RemoteAsset) {
        let id = asset
            .id
            .clone()
            .unwrap_or_else(|| format!("seed-{}", self.next_id.fetch_add(1, Ordering::SeqCst)));
        self.objects.lock().push(StoredObject {
            id,
            url: asset.url,
            kind: ResourceKind::Image,
            folder: folder.into(),
            timestamp: asset.timestamp.unwrap_or_else(|| self.clock.now_millis()),
        });
    }

    /// Make every upload fail.
    pub fn fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::SeqCst);
    }

    /// Make every delete fail.
    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    /// Make every listing fail.
    pub fn fail_listing(&self, fail: bool) {
        self.fail_listing.store(fail, Ordering::SeqCst);
    }

    /// Number of `upload` calls so far, failed ones included.
    pub fn upload_calls(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }

    /// Number of `delete` calls so far, failed ones included.
    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    /// Number of `list` calls so far, failed ones included.
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Identifiers successfully deleted, in order.
    pub fn deleted_ids(&self) -> Vec<String> {
        self.deleted.lock().clone()
    }

    /// Number of objects currently held.
    pub fn len(&self) -> usize {
        self.objects.lock().len()
    }

    /// Check if the store holds no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.lock().is_empty()
    }
}

impl Default for InMemoryAssetStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl RemoteAssetStore for InMemoryAssetStore {
    async fn upload(&self, path: &Path, options: &UploadOptions) -> CurioResult<UploadedAsset> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(UpstreamError::new(UpstreamErrorKind::Upload(
                "simulated upload failure".to_string(),
            ))
            .into());
        }

        if !tokio::fs::try_exists(path).await.unwrap_or(false) {
            return Err(UpstreamError::new(UpstreamErrorKind::Upload(format!(
                "no such file: {}",
                path.display()
            )))
            .into());
        }

        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        let id = format!("{}/asset-{}", options.folder, n);
        let ext = options.extension(path).unwrap_or_else(|| "bin".to_string());
        let url = format!("{}/{}/upload/v1/{}.{}", self.base_url, options.kind, id, ext);

        self.objects.lock().push(StoredObject {
            id: id.clone(),
            url: url.clone(),
            kind: options.kind,
            folder: options.folder.clone(),
            timestamp: self.clock.now_millis(),
        });

        Ok(UploadedAsset { url, id })
    }

    async fn delete(&self, id: &str, kind: ResourceKind) -> CurioResult<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(UpstreamError::new(UpstreamErrorKind::Delete(
                "simulated delete failure".to_string(),
            ))
            .into());
        }

        let mut objects = self.objects.lock();
        let before = objects.len();
        objects.retain(|object| !(object.id == id && object.kind == kind));
        if objects.len() == before {
            return Err(UpstreamError::new(UpstreamErrorKind::Delete(format!(
                "object not found: {}",
                id
            )))
            .into());
        }
        drop(objects);

        self.deleted.lock().push(id.to_string());
        Ok(())
    }

    async fn list(
        &self,
        folder: Option<&str>,
        options: &ListOptions,
    ) -> CurioResult<Vec<RemoteAsset>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_listing.load(Ordering::SeqCst) {
            return Err(UpstreamError::new(UpstreamErrorKind::List(
                "simulated listing failure".to_string(),
            ))
            .into());
        }

        let mut assets: Vec<RemoteAsset> = self
            .objects
            .lock()
            .iter()
            .filter(|object| object.kind == ResourceKind::Image)
            .filter(|object| folder.is_none_or(|folder| object.folder == folder))
            .map(|object| RemoteAsset {
                url: object.url.clone(),
                id: Some(object.id.clone()),
                timestamp: Some(object.timestamp),
            })
            .collect();

        assets.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        assets.truncate(options.max_results);
        Ok(assets)
    }
}
