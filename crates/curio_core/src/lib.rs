//! Core data types for the Curio media asset registry.
//!
//! This crate provides the record model shared by the index, the cache and the
//! reconciliation logic, plus the value types exchanged with a remote asset store.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod clock;
mod collection;
mod record;
mod remote;
mod resource_kind;

pub use clock::{Clock, ManualClock, SystemClock};
pub use collection::CollectionName;
pub use record::{AssetMetadata, AssetRecord, RESERVED_KEYS};
pub use remote::{FilePayload, ListOptions, RemoteAsset, UploadOptions, UploadedAsset};
pub use resource_kind::ResourceKind;
