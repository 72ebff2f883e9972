//! Merging the remote listing with the local index.

use crate::CollectionConfig;
use curio_core::{AssetRecord, Clock, ListOptions};
use curio_storage::RemoteAssetStore;
use std::collections::HashMap;
use std::sync::Arc;

/// Builds the deduplicated, newest-first view of a collection.
#[derive(Clone)]
pub struct ReconciliationEngine {
    store: Arc<dyn RemoteAssetStore>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for ReconciliationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReconciliationEngine")
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

impl ReconciliationEngine {
    /// Create an engine that lists from `store`.
    pub fn new(store: Arc<dyn RemoteAssetStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Merge two record sources keyed by URL.
    ///
    /// Remote records go in first and win on collision; local records fill in
    /// URLs the remote side does not report. Records without a URL are dropped.
    /// The result is sorted by timestamp, newest first, with ties kept in
    /// insertion order.
    ///
    /// # Example
    ///
    /// ```
    /// use curio::ReconciliationEngine;
    /// use curio_core::AssetRecord;
    ///
    /// let local = vec![AssetRecord::new("a", None, 100), AssetRecord::new("b", None, 200)];
    /// let remote = vec![AssetRecord::new("b", Some("R1".to_string()), 200)];
    ///
    /// let view = ReconciliationEngine::merge(remote, local);
    /// assert_eq!(view[0].remote_id.as_deref(), Some("R1"));
    /// assert_eq!(view[1].url, "a");
    /// ```
    pub fn merge(remote: Vec<AssetRecord>, local: Vec<AssetRecord>) -> Vec<AssetRecord> {
        let mut positions: HashMap<String, usize> = HashMap::new();
        let mut merged: Vec<AssetRecord> = Vec::with_capacity(remote.len() + local.len());

        for record in remote {
            if record.url.is_empty() {
                continue;
            }
            match positions.get(&record.url) {
                Some(&at) => merged[at] = record,
                None => {
                    positions.insert(record.url.clone(), merged.len());
                    merged.push(record);
                }
            }
        }

        for record in local {
            if record.url.is_empty() || positions.contains_key(&record.url) {
                continue;
            }
            positions.insert(record.url.clone(), merged.len());
            merged.push(record);
        }

        merged.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        merged
    }

    /// Produce a collection's view from its local records.
    ///
    /// When the collection reconciles, the remote listing is fetched and merged.
    /// A failed listing degrades to the local records alone; it is logged and
    /// never returned to the reader.
    #[tracing::instrument(skip(self, config, local), fields(folder = %config.folder, local = local.len()))]
    pub async fn reconcile(
        &self,
        config: &CollectionConfig,
        local: Vec<AssetRecord>,
    ) -> Vec<AssetRecord> {
        if !config.reconcile {
            return Self::merge(Vec::new(), local);
        }

        let options = ListOptions {
            max_results: config.max_results,
        };
        let remote = match self.store.list(config.list_folder.as_deref(), &options).await {
            Ok(assets) => {
                let now = self.clock.now_millis();
                tracing::debug!(count = assets.len(), "Fetched remote listing");
                assets
                    .into_iter()
                    .map(|asset| asset.into_record(now))
                    .collect()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Remote listing failed, using local index only");
                Vec::new()
            }
        };

        Self::merge(remote, local)
    }
}
