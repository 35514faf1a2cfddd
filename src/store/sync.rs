//! Cache Synchronizer Module
//!
//! Keeps the derived cache index in step with the primary store.
//!
//! A view set is only accepted when it was computed from the partition
//! version currently in the store and nothing newer is cached. Writer
//! refreshes and reader fills both go through that check, so a slow
//! reader never overwrites a newer writer and a deleted partition never
//! reappears in the cache.

use std::sync::Arc;

use tracing::debug;

use crate::store::index::{DerivedCacheIndex, KeyViews};
use crate::store::primary::{PartitionSnapshot, PrimaryStore};
use crate::store::record::WeatherRecord;
use crate::store::stats::StatsRecorder;

// == Cache Synchronizer ==
#[derive(Debug)]
pub struct CacheSynchronizer {
    index: Arc<dyn DerivedCacheIndex>,
    /// Recent-N limits kept in the index, sorted
    limits: Vec<usize>,
    stats: Arc<StatsRecorder>,
}

impl CacheSynchronizer {
    // == Constructor ==
    pub fn new(
        index: Arc<dyn DerivedCacheIndex>,
        limits: &[usize],
        stats: Arc<StatsRecorder>,
    ) -> Self {
        let mut limits = limits.to_vec();
        limits.sort_unstable();
        limits.dedup();

        Self {
            index,
            limits,
            stats,
        }
    }

    /// Returns true if recent views for `limit` are kept in the index.
    pub fn is_cached_limit(&self, limit: usize) -> bool {
        self.limits.binary_search(&limit).is_ok()
    }

    pub fn limits(&self) -> &[usize] {
        &self.limits
    }

    // == Refresh ==
    /// Recomputes and publishes every view for `key` from a just-written snapshot.
    ///
    /// Returns false if a newer write already superseded `snapshot`.
    pub fn refresh(&self, store: &PrimaryStore, key: &str, snapshot: &PartitionSnapshot) -> bool {
        let views = KeyViews::compute(snapshot, &self.limits);
        let published = self.publish(store, key, views);
        if published {
            debug!(key, version = snapshot.version, "Cache views refreshed");
        } else {
            debug!(key, version = snapshot.version, "Cache refresh superseded");
        }
        published
    }

    // == Lookup Latest ==
    /// Returns the newest record for `key`, cache first.
    pub fn lookup_latest(&self, store: &PrimaryStore, key: &str) -> Option<WeatherRecord> {
        if let Some(views) = self.index.get(key) {
            self.stats.record_hit();
            return views.latest().cloned();
        }

        self.stats.record_miss();
        debug!(key, "Cache miss for latest view");
        self.fill(store, key)
            .and_then(|views| views.latest().cloned())
    }

    // == Lookup Recent ==
    /// Returns up to `limit` newest records for `key`.
    ///
    /// Cached limits are served from the index and filled on miss; any other
    /// limit is computed from the store and not cached.
    pub fn lookup_recent(
        &self,
        store: &PrimaryStore,
        key: &str,
        limit: usize,
    ) -> Vec<WeatherRecord> {
        if !self.is_cached_limit(limit) {
            self.stats.record_miss();
            return store
                .snapshot(key)
                .map(|snapshot| snapshot.recent(limit).to_vec())
                .unwrap_or_default();
        }

        if let Some(views) = self.index.get(key) {
            if let Some(records) = views.recent(limit) {
                self.stats.record_hit();
                return records.to_vec();
            }
        }

        self.stats.record_miss();
        debug!(key, limit, "Cache miss for recent view");
        self.fill(store, key)
            .and_then(|views| views.recent(limit).map(<[WeatherRecord]>::to_vec))
            .unwrap_or_default()
    }

    // == Evict All ==
    /// Drops every cached view. The primary store is untouched.
    pub fn evict_all(&self) -> usize {
        let evicted = self.index.evict_all();
        self.stats.record_cache_evictions(evicted);
        evicted
    }

    // == Evict Key ==
    /// Drops every cached view for `key`.
    pub fn evict_key(&self, key: &str) -> bool {
        let evicted = self.index.evict_key(key);
        if evicted {
            self.stats.record_cache_evictions(1);
        }
        evicted
    }

    /// Number of keys with cached views.
    pub fn cached_keys(&self) -> usize {
        self.index.len()
    }

    /// Computes views from the current partition and tries to cache them.
    ///
    /// The computed views are returned whether or not they were published.
    fn fill(&self, store: &PrimaryStore, key: &str) -> Option<KeyViews> {
        let snapshot = store.snapshot(key)?;
        let views = KeyViews::compute(&snapshot, &self.limits);
        self.publish(store, key, views.clone());
        Some(views)
    }

    fn publish(&self, store: &PrimaryStore, key: &str, views: KeyViews) -> bool {
        let version = views.version();
        let accept = |existing: Option<&KeyViews>| {
            let newer_than_cached = existing.map_or(true, |cached| cached.version() < version);
            newer_than_cached && store.version(key) == Some(version)
        };

        let published = self.index.publish_if(key, Arc::new(views), &accept);
        if published {
            self.stats.record_refresh();
        }
        published
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::index::InMemoryViewIndex;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn record_at(offset_secs: i64) -> WeatherRecord {
        let at = base_time() + Duration::seconds(offset_secs);
        WeatherRecord::new("10001", at, at)
    }

    fn setup() -> (PrimaryStore, CacheSynchronizer, Arc<StatsRecorder>) {
        let stats = Arc::new(StatsRecorder::new());
        let sync = CacheSynchronizer::new(
            Arc::new(InMemoryViewIndex::new()),
            &[10, 5, 5],
            Arc::clone(&stats),
        );
        (PrimaryStore::new(100), sync, stats)
    }

    #[test]
    fn test_limits_sorted_and_deduped() {
        let (_, sync, _) = setup();
        assert_eq!(sync.limits(), &[5, 10]);
        assert!(sync.is_cached_limit(5));
        assert!(!sync.is_cached_limit(7));
    }

    #[test]
    fn test_refresh_then_hit() {
        let (store, sync, stats) = setup();

        let outcome = store.put(record_at(0));
        assert!(sync.refresh(&store, "10001", &outcome.snapshot));

        let latest = sync.lookup_latest(&store, "10001").unwrap();
        assert_eq!(latest.id, outcome.record.id);
        assert_eq!(stats.snapshot().hits, 1);
        assert_eq!(stats.snapshot().misses, 0);
    }

    #[test]
    fn test_stale_refresh_is_rejected() {
        let (store, sync, _) = setup();

        let first = store.put(record_at(0));
        let second = store.put(record_at(1));

        assert!(sync.refresh(&store, "10001", &second.snapshot));
        assert!(!sync.refresh(&store, "10001", &first.snapshot));

        let latest = sync.lookup_latest(&store, "10001").unwrap();
        assert_eq!(latest.id, second.record.id);
    }

    #[test]
    fn test_refresh_after_remove_is_rejected() {
        let (store, sync, _) = setup();

        let outcome = store.put(record_at(0));
        store.remove("10001");

        assert!(!sync.refresh(&store, "10001", &outcome.snapshot));
        assert_eq!(sync.cached_keys(), 0);
    }

    #[test]
    fn test_miss_fills_cache() {
        let (store, sync, stats) = setup();

        for offset in 0..12 {
            store.put(record_at(offset));
        }

        let recent = sync.lookup_recent(&store, "10001", 5);
        assert_eq!(recent.len(), 5);
        assert_eq!(sync.cached_keys(), 1);

        let again = sync.lookup_recent(&store, "10001", 10);
        assert_eq!(again.len(), 10);

        let stats = stats.snapshot();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 1);
    }

    #[test]
    fn test_uncached_limit_is_not_cached() {
        let (store, sync, _) = setup();

        for offset in 0..4 {
            store.put(record_at(offset));
        }

        let recent = sync.lookup_recent(&store, "10001", 3);
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].fetched_at, base_time() + Duration::seconds(3));
        assert_eq!(sync.cached_keys(), 0);
    }

    #[test]
    fn test_unknown_key_is_empty_and_not_cached() {
        let (store, sync, _) = setup();

        assert!(sync.lookup_latest(&store, "99999").is_none());
        assert!(sync.lookup_recent(&store, "99999", 5).is_empty());
        assert_eq!(sync.cached_keys(), 0);
    }

    #[test]
    fn test_evict_key_and_all() {
        let (store, sync, stats) = setup();

        let a = store.put(WeatherRecord::new("10001", base_time(), base_time()));
        let b = store.put(WeatherRecord::new("60601", base_time(), base_time()));
        sync.refresh(&store, "10001", &a.snapshot);
        sync.refresh(&store, "60601", &b.snapshot);

        assert!(sync.evict_key("10001"));
        assert_eq!(sync.cached_keys(), 1);
        assert_eq!(sync.evict_all(), 1);
        assert_eq!(sync.cached_keys(), 0);
        assert_eq!(stats.snapshot().cache_evictions, 2);

        // Primary data survives cache eviction
        assert_eq!(store.len("10001"), 1);
    }
}
