//! Collection view caching with a fixed freshness window.
//!
//! This crate keeps the most recently computed view of each collection so that
//! reads inside the freshness window skip both the index file and the remote
//! listing.

#![warn(missing_docs)]

mod cache;

pub use cache::{CacheLookup, TtlCache, TtlCacheConfig, TtlCacheConfigBuilder};
