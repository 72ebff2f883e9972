//! Tests for the collection view cache.

use curio_cache::{TtlCache, TtlCacheConfig, TtlCacheConfigBuilder};
use curio_core::ManualClock;
use std::sync::Arc;
use std::time::Duration;

fn cache_with_clock(config: TtlCacheConfig) -> (TtlCache<Vec<&'static str>>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(0));
    (TtlCache::new(config, clock.clone()), clock)
}

#[test]
fn test_fresh_within_window() {
    let (cache, clock) = cache_with_clock(TtlCacheConfig::default());
    cache.set("gallery", vec!["a", "b"]);

    clock.advance(Duration::from_secs(59));
    let lookup = cache.get("gallery").unwrap();
    assert!(*lookup.fresh());
    assert_eq!(lookup.value(), &vec!["a", "b"]);
    assert_eq!(cache.get_fresh("gallery"), Some(vec!["a", "b"]));
}

#[test]
fn test_stale_at_window_boundary() {
    let (cache, clock) = cache_with_clock(TtlCacheConfig::default());
    cache.set("gallery", vec!["a"]);

    clock.advance(Duration::from_secs(60));
    let lookup = cache.get("gallery").unwrap();
    assert!(!*lookup.fresh());
    assert_eq!(lookup.into_value(), vec!["a"]);
    assert_eq!(cache.get_fresh("gallery"), None);
}

#[test]
fn test_set_restarts_window() {
    let (cache, clock) = cache_with_clock(TtlCacheConfig::default());
    cache.set("gallery", vec!["a"]);
    clock.advance(Duration::from_secs(45));
    cache.set("gallery", vec!["b"]);
    clock.advance(Duration::from_secs(45));

    assert_eq!(cache.get_fresh("gallery"), Some(vec!["b"]));
}

#[test]
fn test_keys_are_independent() {
    let (cache, _clock) = cache_with_clock(TtlCacheConfig::default());
    cache.set("gallery", vec!["g"]);
    cache.set("projects", vec!["p"]);

    assert!(cache.invalidate("gallery"));
    assert_eq!(cache.get("gallery"), None);
    assert_eq!(cache.get_fresh("projects"), Some(vec!["p"]));
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_invalidate_missing_key() {
    let (cache, _clock) = cache_with_clock(TtlCacheConfig::default());
    assert!(!cache.invalidate("gallery"));
    assert!(cache.is_empty());
}

#[test]
fn test_ticket_rejects_value_computed_before_invalidation() {
    let (cache, _clock) = cache_with_clock(TtlCacheConfig::default());

    let ticket = cache.ticket("gallery");
    cache.invalidate("gallery");

    assert!(!cache.set_if_current("gallery", vec!["stale"], ticket));
    assert_eq!(cache.get("gallery"), None);

    let ticket = cache.ticket("gallery");
    assert!(cache.set_if_current("gallery", vec!["current"], ticket));
    assert_eq!(cache.get_fresh("gallery"), Some(vec!["current"]));
}

#[test]
fn test_disabled_cache_stores_nothing() {
    let config = TtlCacheConfigBuilder::default()
        .enabled(false)
        .build()
        .unwrap();
    let (cache, _clock) = cache_with_clock(config);

    cache.set("gallery", vec!["a"]);
    assert!(!cache.set_if_current("gallery", vec!["a"], 0));
    assert_eq!(cache.get("gallery"), None);
    assert!(cache.is_empty());
}

#[test]
fn test_config_builder_and_setters() {
    let built = TtlCacheConfigBuilder::default().build().unwrap();
    assert_eq!(*built.ttl_secs(), 60);
    assert!(*built.enabled());

    let config = TtlCacheConfig::default().with_ttl_secs(5);
    let (cache, clock) = cache_with_clock(config);
    assert_eq!(cache.window(), Duration::from_secs(5));

    cache.set("gallery", vec!["a"]);
    clock.advance(Duration::from_secs(5));
    assert_eq!(cache.get_fresh("gallery"), None);
}

#[test]
fn test_clear() {
    let (cache, _clock) = cache_with_clock(TtlCacheConfig::default());
    cache.set("gallery", vec!["a"]);
    cache.set("projects", vec!["b"]);
    cache.clear();
    assert!(cache.is_empty());
}
