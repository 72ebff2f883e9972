//! The persisted index: one JSON file per collection.

use curio_core::{AssetRecord, Clock, CollectionName};
use curio_error::{CurioResult, JsonError, StorageError, StorageErrorKind};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

/// Schema version written into every index file.
pub const INDEX_VERSION: u32 = 1;

#[derive(serde::Serialize)]
struct IndexEnvelope<'a> {
    version: u32,
    records: &'a [AssetRecord],
}

/// Durable, ordered record of the assets in each collection.
///
/// `save` always rewrites the whole collection. Callers that load, modify and
/// save must serialise those steps per collection themselves, and must load
/// with [`load_for_update`](Self::load_for_update).
#[async_trait::async_trait]
pub trait AssetIndex: Send + Sync {
    /// Load a collection in stored order, for reading.
    ///
    /// A missing or unparseable backing file yields an empty sequence. An
    /// unreadable file or a file from a newer schema is an error.
    async fn load(&self, collection: &CollectionName) -> CurioResult<Vec<AssetRecord>>;

    /// Load a collection that is about to be rewritten with `save`.
    ///
    /// Unlike [`load`](Self::load), an unparseable backing file is an error, so
    /// a write never replaces content it could not read.
    async fn load_for_update(&self, collection: &CollectionName) -> CurioResult<Vec<AssetRecord>> {
        self.load(collection).await
    }

    /// Replace a collection's contents.
    async fn save(&self, collection: &CollectionName, records: &[AssetRecord]) -> CurioResult<()>;
}

/// Index backed by `{dir}/{collection}.json`.
///
/// Files are written as a versioned envelope:
///
/// ```json
/// { "version": 1, "records": [ { "url": "...", "publicId": "...", "timestamp": 1 } ] }
/// ```
///
/// A bare JSON array of records is also accepted on load. Unparseable content
/// reads as empty through [`AssetIndex::load`] but is never overwritten.
#[derive(Debug, Clone)]
pub struct JsonFileIndex {
    dir: PathBuf,
    clock: Arc<dyn Clock>,
}

impl JsonFileIndex {
    /// Create an index rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created.
    #[tracing::instrument(skip(dir, clock))]
    pub fn new(dir: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> CurioResult<Self> {
        let dir = dir.into();

        std::fs::create_dir_all(&dir).map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                dir.display(),
                e
            )))
        })?;

        tracing::info!(path = %dir.display(), "Opened asset index");
        Ok(Self { dir, clock })
    }

    /// Path of a collection's backing file.
    pub fn path_for(&self, collection: &CollectionName) -> PathBuf {
        self.dir.join(format!("{}.json", collection))
    }

    /// Parse file content into records.
    ///
    /// The inner `Err` carries the reason the content is corrupt.
    fn parse(&self, content: &[u8], path: &Path) -> CurioResult<Result<Vec<AssetRecord>, String>> {
        if content.iter().all(u8::is_ascii_whitespace) {
            return Ok(Ok(Vec::new()));
        }

        let raw = match serde_json::from_slice::<Value>(content) {
            Ok(raw) => raw,
            Err(e) => return Ok(Err(format!("not valid JSON: {}", e))),
        };

        let entries = match raw {
            Value::Array(entries) => entries,
            Value::Object(mut envelope) => {
                let version = envelope
                    .get("version")
                    .and_then(Value::as_u64)
                    .unwrap_or(u64::from(INDEX_VERSION));
                if version > u64::from(INDEX_VERSION) {
                    return Err(StorageError::new(StorageErrorKind::UnsupportedVersion {
                        version: u32::try_from(version).unwrap_or(u32::MAX),
                        path: path.display().to_string(),
                    })
                    .into());
                }
                match envelope.remove("records") {
                    Some(Value::Array(entries)) => entries,
                    _ => return Ok(Err("envelope has no records array".to_string())),
                }
            }
            _ => return Ok(Err("neither an array nor an envelope".to_string())),
        };

        let total = entries.len();
        let now = self.clock.now_millis();
        let records: Vec<AssetRecord> = entries
            .into_iter()
            .filter_map(|entry| AssetRecord::from_json(entry, now))
            .collect();

        if records.len() < total {
            tracing::warn!(
                path = %path.display(),
                dropped = total - records.len(),
                "Skipped index entries without a url"
            );
        }

        Ok(Ok(records))
    }

    /// Read and parse a collection's backing file.
    async fn read(
        &self,
        collection: &CollectionName,
    ) -> CurioResult<(PathBuf, Result<Vec<AssetRecord>, String>)> {
        let path = self.path_for(collection);

        let content = match tokio::fs::read(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No index file yet");
                return Ok((path, Ok(Vec::new())));
            }
            Err(e) => {
                return Err(StorageError::new(StorageErrorKind::FileRead(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
                .into());
            }
        };

        let parsed = self.parse(&content, &path)?;
        Ok((path, parsed))
    }
}

#[async_trait::async_trait]
impl AssetIndex for JsonFileIndex {
    #[tracing::instrument(skip(self), fields(collection = %collection))]
    async fn load(&self, collection: &CollectionName) -> CurioResult<Vec<AssetRecord>> {
        let (path, parsed) = self.read(collection).await?;
        let records = parsed.unwrap_or_else(|reason| {
            tracing::error!(path = %path.display(), reason = %reason, "Corrupt index file, treating as empty");
            Vec::new()
        });
        tracing::debug!(count = records.len(), "Loaded index");
        Ok(records)
    }

    #[tracing::instrument(skip(self), fields(collection = %collection))]
    async fn load_for_update(&self, collection: &CollectionName) -> CurioResult<Vec<AssetRecord>> {
        let (path, parsed) = self.read(collection).await?;
        match parsed {
            Ok(records) => Ok(records),
            Err(reason) => {
                tracing::error!(path = %path.display(), reason = %reason, "Refusing to rewrite corrupt index file");
                Err(StorageError::new(StorageErrorKind::Corrupt(format!(
                    "{}: {}",
                    path.display(),
                    reason
                )))
                .into())
            }
        }
    }

    #[tracing::instrument(skip(self, records), fields(collection = %collection, count = records.len()))]
    async fn save(&self, collection: &CollectionName, records: &[AssetRecord]) -> CurioResult<()> {
        let path = self.path_for(collection);

        let envelope = IndexEnvelope {
            version: INDEX_VERSION,
            records,
        };
        let bytes = serde_json::to_vec_pretty(&envelope).map_err(JsonError::from)?;

        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                self.dir.display(),
                e
            )))
        })?;

        // Write to temp file first, then rename for atomicity
        let temp_path = self
            .dir
            .join(format!(".{}.{}.tmp", collection, Uuid::new_v4()));
        tokio::fs::write(&temp_path, &bytes).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                temp_path.display(),
                e
            )))
        })?;

        if let Err(e) = tokio::fs::rename(&temp_path, &path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(StorageError::new(StorageErrorKind::FileWrite(format!(
                "rename {} to {}: {}",
                temp_path.display(),
                path.display(),
                e
            )))
            .into());
        }

        tracing::info!(path = %path.display(), "Saved index");
        Ok(())
    }
}
