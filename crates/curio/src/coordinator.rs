//! Create and delete orchestration across the remote store and the local index.

use crate::artifact::TempArtifact;
use crate::resolve::{MatchKind, remote_id_for, resolve_identifier};
use crate::{CollectionConfig, CollectionView};
use curio_cache::TtlCache;
use curio_core::{
    AssetMetadata, AssetRecord, Clock, CollectionName, FilePayload, RESERVED_KEYS, ResourceKind,
    UploadOptions, UploadedAsset,
};
use curio_error::{CurioResult, NotFoundError, ValidationError};
use curio_storage::{AssetIndex, RemoteAssetStore};
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::OwnedMutexGuard;

/// One async mutex per collection.
///
/// Every load-modify-save sequence against the index holds its collection's
/// guard, so concurrent writers cannot lose each other's updates.
#[derive(Debug, Default)]
pub struct CollectionLocks {
    locks: Mutex<HashMap<CollectionName, Arc<tokio::sync::Mutex<()>>>>,
}

impl CollectionLocks {
    /// Create an empty lock table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to a collection.
    pub async fn acquire(&self, collection: &CollectionName) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .lock()
            .entry(collection.clone())
            .or_default()
            .clone();
        lock.lock_owned().await
    }
}

/// What happened to the remote object during a delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RemoteCleanup {
    /// The remote object was deleted
    Deleted {
        /// Remote identifier used
        id: String,
    },
    /// The remote delete failed; the object may be orphaned
    Failed {
        /// Remote identifier used
        id: String,
        /// Why it failed
        reason: String,
    },
    /// No remote identifier could be determined
    Skipped,
}

/// Result of a successful delete.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletionOutcome {
    /// The record removed from the index
    pub record: AssetRecord,
    /// Where it was in the stored sequence
    pub index: usize,
    /// How the identifier resolved
    #[serde(serialize_with = "serialize_display")]
    pub matched_by: MatchKind,
    /// Remote cleanup result
    pub remote: RemoteCleanup,
}

fn serialize_display<S: serde::Serializer>(value: &MatchKind, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(value)
}

/// Orchestrates the two-sided effects of creating and deleting assets.
///
/// Create uploads first and only then touches the index, so a failed upload
/// leaves no local trace. Delete updates the index first and treats remote
/// cleanup as best-effort, so a slow or unreachable remote store never keeps a
/// deleted asset visible in the registry.
pub struct MutationCoordinator {
    store: Arc<dyn RemoteAssetStore>,
    index: Arc<dyn AssetIndex>,
    cache: Arc<TtlCache<CollectionView>>,
    locks: CollectionLocks,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for MutationCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MutationCoordinator")
            .field("locks", &self.locks)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

impl MutationCoordinator {
    /// Create a coordinator over the given collaborators.
    pub fn new(
        store: Arc<dyn RemoteAssetStore>,
        index: Arc<dyn AssetIndex>,
        cache: Arc<TtlCache<CollectionView>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            index,
            cache,
            locks: CollectionLocks::new(),
            clock,
        }
    }

    /// Upload a file and append its record to the collection.
    ///
    /// # Errors
    ///
    /// - `ValidationError` if `payload` is `None`; nothing is written anywhere
    /// - `UpstreamError` if the upload fails; the index is untouched
    /// - `StorageError` if the index cannot be read or written
    ///
    /// The staged file is removed on every path.
    #[tracing::instrument(skip(self, config, payload, metadata), fields(collection = %collection, folder = %config.folder))]
    pub async fn create(
        &self,
        collection: &CollectionName,
        config: &CollectionConfig,
        payload: Option<FilePayload>,
        metadata: AssetMetadata,
    ) -> CurioResult<AssetRecord> {
        let Some(payload) = payload else {
            return Err(ValidationError::new("No image file provided").into());
        };
        let artifact = TempArtifact::new(payload.as_path());

        let options = UploadOptions::new(config.folder.clone(), config.kind)
            .with_file_name(payload.original_name().clone());
        let uploaded = match self.store.upload(artifact.path(), &options).await {
            Ok(uploaded) => uploaded,
            Err(e) => {
                tracing::error!(error = %e, "Upload failed");
                return Err(e);
            }
        };
        tracing::info!(url = %uploaded.url, remote_id = %uploaded.id, "Uploaded asset");

        let record = AssetRecord::new(
            uploaded.url.clone(),
            Some(uploaded.id.clone()),
            self.clock.now_millis(),
        )
        .with_attributes(apply_defaults(&config.defaults, metadata));

        match self.append(collection, &record).await {
            Ok(None) => {}
            Ok(Some(existing)) => {
                tracing::warn!(
                    url = %existing.url,
                    remote_id = %uploaded.id,
                    "Remote store returned an object the index already references"
                );
                return Ok(existing);
            }
            Err(e) => {
                tracing::error!(error = %e, remote_id = %uploaded.id, "Index update failed after upload");
                self.discard_upload(&uploaded, config.kind).await;
                return Err(e);
            }
        }

        self.cache.invalidate(collection.as_str());
        tracing::info!(url = %record.url, "Created asset");
        Ok(record)
    }

    /// Remove the asset an identifier resolves to.
    ///
    /// The index is rewritten before the remote object is touched. A remote
    /// failure is logged and reported in the outcome, never returned as an error.
    ///
    /// # Errors
    ///
    /// - `ValidationError` if `identifier` is empty
    /// - `NotFoundError` if nothing resolves; nothing is written
    /// - `StorageError` if the index cannot be read or written
    #[tracing::instrument(skip(self, config), fields(collection = %collection))]
    pub async fn delete(
        &self,
        collection: &CollectionName,
        config: &CollectionConfig,
        identifier: &str,
    ) -> CurioResult<DeletionOutcome> {
        if identifier.is_empty() {
            Err(ValidationError::new("Asset identifier is required"))?
        }

        let (record, resolution) = {
            let _guard = self.locks.acquire(collection).await;
            let mut records = self.index.load_for_update(collection).await?;

            let Some(resolution) = resolve_identifier(&records, identifier) else {
                return Err(NotFoundError::new(format!(
                    "Asset not found in {}: {}",
                    collection, identifier
                ))
                .into());
            };

            let record = records.remove(resolution.index);
            self.index.save(collection, &records).await?;
            (record, resolution)
        };
        tracing::info!(
            url = %record.url,
            index = resolution.index,
            matched_by = %resolution.matched_by,
            "Removed asset from index"
        );

        let remote = self.delete_remote(&record, config.kind).await;

        self.cache.invalidate(collection.as_str());

        Ok(DeletionOutcome {
            record,
            index: resolution.index,
            matched_by: resolution.matched_by,
            remote,
        })
    }

    /// Upload a standalone document without recording it in any collection.
    ///
    /// # Errors
    ///
    /// - `ValidationError` if `payload` is `None`
    /// - `UpstreamError` if the upload fails
    #[tracing::instrument(skip(self, payload))]
    pub async fn upload_document(
        &self,
        folder: &str,
        payload: Option<FilePayload>,
    ) -> CurioResult<UploadedAsset> {
        let Some(payload) = payload else {
            return Err(ValidationError::new("No document file provided").into());
        };
        let artifact = TempArtifact::new(payload.as_path());

        let options = UploadOptions::new(folder, ResourceKind::Raw)
            .with_file_name(payload.original_name().clone());
        let uploaded = self.store.upload(artifact.path(), &options).await.inspect_err(|e| {
            tracing::error!(error = %e, "Document upload failed");
        })?;

        tracing::info!(url = %uploaded.url, "Uploaded document");
        Ok(uploaded)
    }

    /// Append `record` under the collection lock.
    ///
    /// Returns the already stored record instead when one has the same URL;
    /// the index is then left untouched.
    async fn append(
        &self,
        collection: &CollectionName,
        record: &AssetRecord,
    ) -> CurioResult<Option<AssetRecord>> {
        let _guard = self.locks.acquire(collection).await;
        let mut records = self.index.load_for_update(collection).await?;

        if let Some(existing) = records.iter().find(|r| r.url == record.url) {
            return Ok(Some(existing.clone()));
        }

        records.push(record.clone());
        self.index.save(collection, &records).await?;
        Ok(None)
    }

    async fn delete_remote(&self, record: &AssetRecord, kind: ResourceKind) -> RemoteCleanup {
        let Some(id) = remote_id_for(record) else {
            tracing::warn!(url = %record.url, "No remote identifier for deleted asset, skipping remote cleanup");
            return RemoteCleanup::Skipped;
        };

        match self.store.delete(&id, kind).await {
            Ok(()) => {
                tracing::info!(remote_id = %id, "Deleted remote object");
                RemoteCleanup::Deleted { id }
            }
            Err(e) => {
                tracing::error!(
                    remote_id = %id,
                    url = %record.url,
                    error = %e,
                    "Remote delete failed; remote object may be orphaned"
                );
                RemoteCleanup::Failed {
                    id,
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Best-effort removal of an upload whose record could not be stored.
    async fn discard_upload(&self, uploaded: &UploadedAsset, kind: ResourceKind) {
        if let Err(e) = self.store.delete(&uploaded.id, kind).await {
            tracing::error!(
                remote_id = %uploaded.id,
                error = %e,
                "Failed to discard upload; remote object may be orphaned"
            );
        }
    }
}

/// Overlay caller metadata on collection defaults.
///
/// Null and empty-string values fall back to the default; reserved keys are ignored.
fn apply_defaults(defaults: &AssetMetadata, metadata: AssetMetadata) -> AssetMetadata {
    let mut merged = defaults.clone();
    for (key, value) in metadata {
        if RESERVED_KEYS.contains(&key.as_str()) {
            continue;
        }
        let blank = match &value {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            _ => false,
        };
        if blank && merged.contains_key(&key) {
            continue;
        }
        merged.insert(key, value);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> AssetMetadata {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn defaults_fill_blank_values() {
        let defaults = map(json!({"title": "Project", "category": "General"}));
        let merged = apply_defaults(&defaults, map(json!({"title": "", "category": "Civic"})));

        assert_eq!(merged["title"], "Project");
        assert_eq!(merged["category"], "Civic");
    }

    #[test]
    fn reserved_keys_are_ignored() {
        let merged = apply_defaults(
            &AssetMetadata::new(),
            map(json!({"url": "evil", "timestamp": 1, "note": "kept"})),
        );

        assert!(!merged.contains_key("url"));
        assert!(!merged.contains_key("timestamp"));
        assert_eq!(merged["note"], "kept");
    }
}
