//! TTL cache implementation.

use curio_core::Clock;
use derive_getters::Getters;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Configuration for the collection cache.
#[derive(
    Debug, Clone, Serialize, Deserialize, Getters, derive_setters::Setters, derive_builder::Builder,
)]
#[setters(prefix = "with_")]
pub struct TtlCacheConfig {
    /// Freshness window in seconds, measured from the last `set`
    #[serde(default = "default_ttl")]
    #[builder(default = "default_ttl()")]
    ttl_secs: u64,

    /// Whether caching is enabled
    #[serde(default = "default_enabled")]
    #[builder(default = "default_enabled()")]
    enabled: bool,
}

fn default_ttl() -> u64 {
    60
}

fn default_enabled() -> bool {
    true
}

impl Default for TtlCacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl(),
            enabled: default_enabled(),
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    stored_at: Instant,
}

/// Result of a cache lookup: the stored value and whether it is still fresh.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct CacheLookup<V> {
    value: V,
    fresh: bool,
}

impl<V> CacheLookup<V> {
    /// Take the value, discarding freshness.
    pub fn into_value(self) -> V {
        self.value
    }
}

/// Process-wide cache of derived values keyed by collection name.
///
/// The cache never recomputes anything itself. On a miss or a stale hit the
/// caller recomputes and calls [`set`](Self::set). Writers call
/// [`invalidate`](Self::invalidate) before acknowledging a write so the next
/// read recomputes.
///
/// # Example
///
/// ```
/// use curio_cache::{TtlCache, TtlCacheConfig};
/// use curio_core::ManualClock;
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// let clock = Arc::new(ManualClock::new(0));
/// let cache = TtlCache::new(TtlCacheConfig::default(), clock.clone());
///
/// cache.set("gallery", vec!["a"]);
/// assert!(*cache.get("gallery").unwrap().fresh());
///
/// clock.advance(Duration::from_secs(60));
/// assert!(!*cache.get("gallery").unwrap().fresh());
/// ```
#[derive(Debug)]
pub struct TtlCache<V> {
    config: TtlCacheConfig,
    clock: Arc<dyn Clock>,
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
    generations: RwLock<HashMap<String, u64>>,
}

impl<V: Clone> TtlCache<V> {
    /// Create a new cache.
    pub fn new(config: TtlCacheConfig, clock: Arc<dyn Clock>) -> Self {
        tracing::debug!(
            ttl_secs = config.ttl_secs,
            enabled = config.enabled,
            "Creating new TtlCache"
        );
        Self {
            config,
            clock,
            entries: RwLock::new(HashMap::new()),
            generations: RwLock::new(HashMap::new()),
        }
    }

    /// The freshness window.
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.config.ttl_secs)
    }

    /// Look up a key.
    ///
    /// Returns `None` if nothing is stored or caching is disabled. Stale entries
    /// are returned with `fresh == false` until replaced or invalidated.
    #[tracing::instrument(skip(self))]
    pub fn get(&self, key: &str) -> Option<CacheLookup<V>> {
        if !self.config.enabled {
            tracing::debug!("Cache disabled, returning None");
            return None;
        }

        let entries = self.entries.read();
        let entry = entries.get(key)?;
        let age = self.clock.now().saturating_duration_since(entry.stored_at);
        let fresh = age < self.window();

        tracing::debug!(?age, fresh, "Cache hit");
        Some(CacheLookup {
            value: entry.value.clone(),
            fresh,
        })
    }

    /// Look up a key, ignoring stale entries.
    pub fn get_fresh(&self, key: &str) -> Option<V> {
        self.get(key)
            .filter(|lookup| lookup.fresh)
            .map(CacheLookup::into_value)
    }

    /// Store a freshly computed value, restarting its freshness window.
    #[tracing::instrument(skip(self, value))]
    pub fn set(&self, key: &str, value: V) {
        if !self.config.enabled {
            tracing::debug!("Cache disabled, skipping set");
            return;
        }

        let entry = CacheEntry {
            value,
            stored_at: self.clock.now(),
        };
        self.entries.write().insert(key.to_string(), entry);
    }

    /// Current invalidation generation of a key.
    ///
    /// Take a ticket before computing a value and store it with
    /// [`set_if_current`](Self::set_if_current): if an invalidation happened in
    /// between, the value was computed from data a writer has since replaced.
    pub fn ticket(&self, key: &str) -> u64 {
        self.generations.read().get(key).copied().unwrap_or(0)
    }

    /// Store a value only if `key` has not been invalidated since `ticket` was taken.
    ///
    /// Returns whether the value was stored.
    #[tracing::instrument(skip(self, value))]
    pub fn set_if_current(&self, key: &str, value: V, ticket: u64) -> bool {
        if !self.config.enabled {
            return false;
        }

        // Holding the generation lock keeps `invalidate` out until the value is in.
        let generations = self.generations.read();
        if generations.get(key).copied().unwrap_or(0) != ticket {
            tracing::debug!("Invalidated while computing, discarding value");
            return false;
        }
        let entry = CacheEntry {
            value,
            stored_at: self.clock.now(),
        };
        self.entries.write().insert(key.to_string(), entry);
        true
    }

    /// Drop a key so the next read recomputes. Returns whether anything was stored.
    #[tracing::instrument(skip(self))]
    pub fn invalidate(&self, key: &str) -> bool {
        *self.generations.write().entry(key.to_string()).or_insert(0) += 1;
        let removed = self.entries.write().remove(key).is_some();
        tracing::debug!(removed, "Invalidated cache entry");
        removed
    }

    /// Clear all cache entries.
    pub fn clear(&self) {
        let mut entries = self.entries.write();
        let count = entries.len();
        entries.clear();
        tracing::info!(cleared = count, "Cleared cache");
    }

    /// Get number of cached entries, stale ones included.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Check if cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
