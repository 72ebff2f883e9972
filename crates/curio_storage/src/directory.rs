//! Directory-backed remote asset store.
//!
//! Stands in for a content-delivery network during development and in
//! single-host deployments: objects live under a local directory and are
//! addressed by public URLs shaped like a CDN's delivery URLs.

use crate::RemoteAssetStore;
use curio_core::{ListOptions, RemoteAsset, ResourceKind, UploadOptions, UploadedAsset};
use curio_error::{CurioResult, UpstreamError, UpstreamErrorKind};
use sha2::{Digest, Sha256};
use std::path::{Component, Path, PathBuf};
use std::time::UNIX_EPOCH;
use uuid::Uuid;

/// Object store in a local directory.
///
/// Every upload gets its own object named `{hash}-{nonce}`, where `hash` is a
/// prefix of the content's SHA-256 and `nonce` is a fresh UUID. Objects are
/// stored at `{base_path}/{kind}/{folder}/{name}.{ext}`, have the remote
/// identifier `{folder}/{name}`, and are served at
/// `{public_base_url}/{kind}/upload/{folder}/{name}.{ext}`.
///
/// # Example Structure
///
/// ```text
/// /var/curio/objects/
/// ├── image/
/// │   ├── gallery/
/// │   │   └── 3fa1...c9-5e0b...41.jpg
/// │   └── projects/
/// │       └── 77be...02-a9d2...7c.png
/// └── raw/
///     └── resumes/
///         └── 0d4e...aa-17f0...e3.pdf
/// ```
///
/// Uploading identical content twice yields two objects, so deleting one never
/// affects the other.
#[derive(Debug, Clone)]
pub struct DirectoryAssetStore {
    base_path: PathBuf,
    public_base_url: String,
}

impl DirectoryAssetStore {
    /// Create a store rooted at `base_path`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created.
    #[tracing::instrument(skip(base_path, public_base_url))]
    pub fn new(
        base_path: impl Into<PathBuf>,
        public_base_url: impl Into<String>,
    ) -> CurioResult<Self> {
        let base_path = base_path.into();

        std::fs::create_dir_all(&base_path).map_err(|e| {
            UpstreamError::new(UpstreamErrorKind::Unavailable(format!(
                "{}: {}",
                base_path.display(),
                e
            )))
        })?;

        tracing::info!(path = %base_path.display(), "Created directory asset store");
        Ok(Self {
            base_path,
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Compute SHA-256 hash of data.
    fn compute_hash(data: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(data);
        format!("{:x}", hasher.finalize())
    }

    /// Reject folders and identifiers that would escape the store.
    fn relative(value: &str) -> Option<PathBuf> {
        let path = Path::new(value);
        if value.is_empty()
            || !path
                .components()
                .all(|component| matches!(component, Component::Normal(_)))
        {
            return None;
        }
        Some(path.to_path_buf())
    }

    fn kind_dir(&self, kind: ResourceKind) -> PathBuf {
        self.base_path.join(kind.as_str())
    }

    fn public_url(&self, kind: ResourceKind, id: &str, ext: &str) -> String {
        format!("{}/{}/upload/{}.{}", self.public_base_url, kind, id, ext)
    }

    /// Find the stored file for `{folder}/{hash}`, whatever its extension.
    async fn locate(&self, id: &str, kind: ResourceKind) -> CurioResult<Option<PathBuf>> {
        let relative = Self::relative(id).ok_or_else(|| {
            UpstreamError::new(UpstreamErrorKind::Delete(format!("invalid id {}", id)))
        })?;
        let Some(stem) = relative.file_name().map(|s| s.to_string_lossy().to_string()) else {
            return Ok(None);
        };
        let dir = match relative.parent() {
            Some(parent) => self.kind_dir(kind).join(parent),
            None => self.kind_dir(kind),
        };

        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(UpstreamError::new(UpstreamErrorKind::Delete(format!(
                    "{}: {}",
                    dir.display(),
                    e
                )))
                .into());
            }
        };

        while let Some(entry) = entries.next_entry().await.map_err(|e| {
            UpstreamError::new(UpstreamErrorKind::Delete(format!("{}: {}", dir.display(), e)))
        })? {
            let path = entry.path();
            let matches = path
                .file_stem()
                .is_some_and(|s| s.to_string_lossy() == stem)
                && path.extension().is_some_and(|ext| ext != "tmp");
            if matches {
                return Ok(Some(path));
            }
        }
        Ok(None)
    }

    /// Walk `root` and collect every stored object beneath it.
    async fn walk(&self, kind: ResourceKind, root: PathBuf) -> std::io::Result<Vec<RemoteAsset>> {
        let kind_dir = self.kind_dir(kind);
        let mut found = Vec::new();
        let mut pending = vec![root];

        while let Some(dir) = pending.pop() {
            let mut entries = match tokio::fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e),
            };

            while let Some(entry) = entries.next_entry().await? {
                let path = entry.path();
                let metadata = entry.metadata().await?;
                if metadata.is_dir() {
                    pending.push(path);
                    continue;
                }
                let Some(ext) = path.extension().map(|e| e.to_string_lossy().to_string()) else {
                    continue;
                };
                if ext == "tmp" {
                    continue;
                }
                let Ok(relative) = path.with_extension("").strip_prefix(&kind_dir).map(Path::to_path_buf)
                else {
                    continue;
                };
                let id = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().to_string())
                    .collect::<Vec<_>>()
                    .join("/");
                let timestamp = metadata
                    .modified()
                    .ok()
                    .and_then(|modified| modified.duration_since(UNIX_EPOCH).ok())
                    .and_then(|since| i64::try_from(since.as_millis()).ok());

                found.push(RemoteAsset {
                    url: self.public_url(kind, &id, &ext),
                    id: Some(id),
                    timestamp,
                });
            }
        }

        Ok(found)
    }
}

#[async_trait::async_trait]
impl RemoteAssetStore for DirectoryAssetStore {
    #[tracing::instrument(skip(self, options), fields(path = %path.display(), folder = %options.folder, kind = %options.kind))]
    async fn upload(&self, path: &Path, options: &UploadOptions) -> CurioResult<UploadedAsset> {
        let folder = Self::relative(&options.folder).ok_or_else(|| {
            UpstreamError::new(UpstreamErrorKind::Upload(format!(
                "invalid folder {}",
                options.folder
            )))
        })?;

        let data = tokio::fs::read(path).await.map_err(|e| {
            UpstreamError::new(UpstreamErrorKind::Upload(format!(
                "{}: {}",
                path.display(),
                e
            )))
        })?;

        let hash = Self::compute_hash(&data);
        let ext = options.extension(path).unwrap_or_else(|| "bin".to_string());
        let name = format!("{}-{}", &hash[..16], Uuid::new_v4().simple());
        let id = format!("{}/{}", options.folder.trim_matches('/'), name);
        let url = self.public_url(options.kind, &id, &ext);
        let target = self
            .kind_dir(options.kind)
            .join(&folder)
            .join(format!("{}.{}", name, ext));

        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                UpstreamError::new(UpstreamErrorKind::Upload(format!(
                    "{}: {}",
                    parent.display(),
                    e
                )))
            })?;
        }

        // Write to temp file first, then rename for atomicity
        let temp_path = target.with_file_name(format!(".{}.{}.tmp", name, Uuid::new_v4()));
        tokio::fs::write(&temp_path, &data).await.map_err(|e| {
            UpstreamError::new(UpstreamErrorKind::Upload(format!(
                "{}: {}",
                temp_path.display(),
                e
            )))
        })?;

        if let Err(e) = tokio::fs::rename(&temp_path, &target).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(UpstreamError::new(UpstreamErrorKind::Upload(format!(
                "rename {} to {}: {}",
                temp_path.display(),
                target.display(),
                e
            )))
            .into());
        }

        tracing::info!(id = %id, size = data.len(), "Stored object");
        Ok(UploadedAsset { url, id })
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: &str, kind: ResourceKind) -> CurioResult<()> {
        let Some(path) = self.locate(id, kind).await? else {
            return Err(UpstreamError::new(UpstreamErrorKind::Delete(format!(
                "object not found: {}",
                id
            )))
            .into());
        };

        tokio::fs::remove_file(&path).await.map_err(|e| {
            UpstreamError::new(UpstreamErrorKind::Delete(format!(
                "{}: {}",
                path.display(),
                e
            )))
        })?;

        tracing::info!(path = %path.display(), "Deleted object");
        Ok(())
    }

    #[tracing::instrument(skip(self, options), fields(max_results = options.max_results))]
    async fn list(
        &self,
        folder: Option<&str>,
        options: &ListOptions,
    ) -> CurioResult<Vec<RemoteAsset>> {
        let kind = ResourceKind::Image;
        let root = match folder {
            Some(folder) => {
                let relative = Self::relative(folder).ok_or_else(|| {
                    UpstreamError::new(UpstreamErrorKind::List(format!("invalid folder {}", folder)))
                })?;
                self.kind_dir(kind).join(relative)
            }
            None => self.kind_dir(kind),
        };

        let mut assets = self.walk(kind, root).await.map_err(|e| {
            UpstreamError::new(UpstreamErrorKind::List(e.to_string()))
        })?;

        assets.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        assets.truncate(options.max_results);

        tracing::debug!(count = assets.len(), "Listed objects");
        Ok(assets)
    }
}
