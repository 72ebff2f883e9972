//! Storage for the Curio asset registry.
//!
//! Two very different kinds of storage live here:
//!
//! - **Remote asset stores** ([`RemoteAssetStore`]) host the media binaries and hand
//!   back public URLs. The registry treats them as an opaque capability.
//! - **The persisted index** ([`AssetIndex`]) is the registry's own durable, ordered
//!   record of every asset in a collection, one JSON file per collection.
//!
//! # Example
//!
//! ```rust
//! use curio_core::{CollectionName, AssetRecord, SystemClock};
//! use curio_storage::{AssetIndex, JsonFileIndex};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let index = JsonFileIndex::new("/tmp/curio-index", Arc::new(SystemClock))?;
//! let gallery = CollectionName::new("gallery")?;
//!
//! let mut records = index.load(&gallery).await?;
//! records.push(AssetRecord::new("https://cdn.example.com/a.png", None, 1));
//! index.save(&gallery, &records).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod directory;
mod index;
mod memory;
mod remote;

pub use curio_error::{StorageError, StorageErrorKind, UpstreamError, UpstreamErrorKind};
pub use directory::DirectoryAssetStore;
pub use index::{AssetIndex, INDEX_VERSION, JsonFileIndex};
pub use memory::InMemoryAssetStore;
pub use remote::RemoteAssetStore;
