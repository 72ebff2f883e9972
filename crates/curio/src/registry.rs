//! The registry facade exposed to the request-handling layer.

use crate::{
    CollectionView, DeletionOutcome, MutationCoordinator, ReconciliationEngine, RegistryConfig,
};
use curio_cache::TtlCache;
use curio_core::{
    AssetMetadata, AssetRecord, Clock, CollectionName, FilePayload, SystemClock, UploadedAsset,
};
use curio_error::CurioResult;
use curio_storage::{AssetIndex, DirectoryAssetStore, JsonFileIndex, RemoteAssetStore};
use std::sync::Arc;

/// Catalog of media assets: reads from a time-bounded cache of the reconciled
/// view, writes through the [`MutationCoordinator`].
///
/// Construct one per process and share it by reference. Callers are responsible
/// for authorizing requests before invoking the write operations.
///
/// # Example
///
/// ```no_run
/// use curio::{AssetRegistry, RegistryConfig};
/// use curio_core::{AssetMetadata, FilePayload};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let registry = AssetRegistry::from_config(RegistryConfig::load()?)?;
///
/// let record = registry
///     .create_asset("gallery", Some(FilePayload::new("/tmp/upload-1.jpg")), AssetMetadata::new())
///     .await?;
/// let view = registry.read_collection("gallery").await?;
/// assert!(view.iter().any(|r| r.url == record.url));
/// # Ok(())
/// # }
/// ```
pub struct AssetRegistry {
    config: RegistryConfig,
    index: Arc<dyn AssetIndex>,
    cache: Arc<TtlCache<CollectionView>>,
    engine: ReconciliationEngine,
    coordinator: MutationCoordinator,
}

impl std::fmt::Debug for AssetRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetRegistry")
            .field("config", &self.config)
            .field("engine", &self.engine)
            .field("coordinator", &self.coordinator)
            .finish_non_exhaustive()
    }
}

impl AssetRegistry {
    /// Assemble a registry from explicit collaborators.
    pub fn new(
        config: RegistryConfig,
        store: Arc<dyn RemoteAssetStore>,
        index: Arc<dyn AssetIndex>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let cache = Arc::new(TtlCache::new(config.cache.clone(), clock.clone()));
        let engine = ReconciliationEngine::new(store.clone(), clock.clone());
        let coordinator = MutationCoordinator::new(store, index.clone(), cache.clone(), clock);
        Self {
            config,
            index,
            cache,
            engine,
            coordinator,
        }
    }

    /// Build a registry backed by the configured directory store and JSON index.
    ///
    /// # Errors
    ///
    /// Returns error if either storage directory cannot be created.
    #[tracing::instrument(skip(config), fields(data_dir = %config.data_dir.display()))]
    pub fn from_config(config: RegistryConfig) -> CurioResult<Self> {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let store = DirectoryAssetStore::new(
            config.remote.base_path.clone(),
            config.remote.public_base_url.clone(),
        )?;
        let index = JsonFileIndex::new(config.data_dir.clone(), clock.clone())?;
        Ok(Self::new(config, Arc::new(store), Arc::new(index), clock))
    }

    /// The active configuration.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// The collection view cache.
    pub fn cache(&self) -> &TtlCache<CollectionView> {
        &self.cache
    }

    /// Deduplicated, newest-first view of a collection.
    ///
    /// Served from the cache inside the freshness window. Otherwise the index is
    /// loaded and reconciled with the remote listing. Neither an unreadable index
    /// nor a failed listing fails the read; each degrades to an empty or
    /// local-only contribution.
    ///
    /// # Errors
    ///
    /// - `ValidationError` if the name is not a valid collection name
    /// - `NotFoundError` if the collection is not configured
    #[tracing::instrument(skip(self))]
    pub async fn read_collection(&self, collection: &str) -> CurioResult<CollectionView> {
        let name = CollectionName::new(collection)?;
        let config = self.config.collection(&name)?;

        if let Some(view) = self.cache.get_fresh(name.as_str()) {
            tracing::debug!(count = view.len(), "Serving cached view");
            return Ok(view);
        }

        let ticket = self.cache.ticket(name.as_str());
        let local = match self.index.load(&name).await {
            Ok(records) => records,
            Err(e) => {
                tracing::error!(error = %e, "Index unreadable, treating collection as empty");
                Vec::new()
            }
        };

        let view: CollectionView = Arc::new(self.engine.reconcile(config, local).await);
        self.cache.set_if_current(name.as_str(), view.clone(), ticket);

        tracing::debug!(count = view.len(), "Computed view");
        Ok(view)
    }

    /// Upload a file and add it to a collection.
    ///
    /// `metadata` is merged over the collection's configured defaults.
    ///
    /// # Errors
    ///
    /// - `ValidationError` if the name is invalid or `payload` is `None`
    /// - `NotFoundError` if the collection is not configured
    /// - `UpstreamError` if the upload fails
    /// - `StorageError` if the index cannot be updated
    #[tracing::instrument(skip(self, payload, metadata))]
    pub async fn create_asset(
        &self,
        collection: &str,
        payload: Option<FilePayload>,
        metadata: AssetMetadata,
    ) -> CurioResult<AssetRecord> {
        let name = match CollectionName::new(collection) {
            Ok(name) => name,
            Err(e) => {
                drop_payload(payload);
                return Err(e);
            }
        };
        let config = match self.config.collection(&name) {
            Ok(config) => config,
            Err(e) => {
                drop_payload(payload);
                return Err(e);
            }
        };
        self.coordinator.create(&name, config, payload, metadata).await
    }

    /// Remove an asset by position, remote identifier, URL or URL fragment.
    ///
    /// # Errors
    ///
    /// - `ValidationError` if the name is invalid or `identifier` is empty
    /// - `NotFoundError` if the collection is unknown or nothing resolves
    /// - `StorageError` if the index cannot be updated
    #[tracing::instrument(skip(self))]
    pub async fn delete_asset(
        &self,
        collection: &str,
        identifier: &str,
    ) -> CurioResult<DeletionOutcome> {
        let name = CollectionName::new(collection)?;
        let config = self.config.collection(&name)?;
        self.coordinator.delete(&name, config, identifier).await
    }

    /// Upload a standalone document (e.g. a resume) and return its location.
    ///
    /// # Errors
    ///
    /// - `ValidationError` if `payload` is `None`
    /// - `UpstreamError` if the upload fails
    #[tracing::instrument(skip(self, payload))]
    pub async fn upload_document(&self, payload: Option<FilePayload>) -> CurioResult<UploadedAsset> {
        self.coordinator
            .upload_document(&self.config.documents.folder, payload)
            .await
    }
}

/// Remove a staged file for a request rejected before reaching the coordinator.
fn drop_payload(payload: Option<FilePayload>) {
    if let Some(payload) = payload {
        drop(crate::artifact::TempArtifact::new(payload.as_path()));
    }
}
