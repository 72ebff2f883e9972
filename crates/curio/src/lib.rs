//! Curio - media asset registry.
//!
//! Curio keeps a locally persisted index of media assets (images, documents)
//! whose binaries live in a remote content-delivery store, and serves a
//! browsable view of each collection without a remote round-trip on every read.
//!
//! # Features
//!
//! - **Cached reads**: collection views are cached for a fixed freshness window
//!   and invalidated by every successful write
//! - **Reconciliation**: the remote listing and the local index are merged into
//!   one deduplicated, newest-first view, with the remote store authoritative
//! - **Coordinated writes**: uploads precede index appends; index removals
//!   precede best-effort remote deletes; staged files are always cleaned up
//! - **Per-collection locking**: concurrent writers never lose updates
//!
//! # Architecture
//!
//! - `curio_error` - Error types
//! - `curio_core` - Records, collection names, remote value types, clocks
//! - `curio_storage` - Remote asset stores and the persisted JSON index
//! - `curio_cache` - Time-bounded view cache
//!
//! This crate ties them together behind [`AssetRegistry`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod artifact;
mod config;
mod coordinator;
pub mod observability;
mod reconcile;
mod registry;
mod resolve;
mod response;

use std::sync::Arc;

/// A computed collection view, shared between the cache and readers.
pub type CollectionView = Arc<Vec<AssetRecord>>;

pub use artifact::TempArtifact;
pub use config::{CollectionConfig, DocumentsConfig, RegistryConfig, RemoteConfig};
pub use coordinator::{CollectionLocks, DeletionOutcome, MutationCoordinator, RemoteCleanup};
pub use reconcile::ReconciliationEngine;
pub use registry::AssetRegistry;
pub use resolve::{MatchKind, Resolution, extract_remote_id, remote_id_for, resolve_identifier};
pub use response::ApiResponse;

pub use curio_cache::{TtlCache, TtlCacheConfig};
pub use curio_core::{
    AssetMetadata, AssetRecord, Clock, CollectionName, FilePayload, ManualClock, ResourceKind,
    SystemClock, UploadedAsset,
};
pub use curio_error::{CurioError, CurioErrorKind, CurioResult};
pub use curio_storage::{
    AssetIndex, DirectoryAssetStore, InMemoryAssetStore, JsonFileIndex, RemoteAssetStore,
};
