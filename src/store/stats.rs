//! Cache Statistics Module
//!
//! Tracks read-cache effectiveness and store housekeeping counters.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Cache Stats ==
/// Point-in-time statistics snapshot.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Reads answered from cached views
    pub hits: u64,
    /// Reads recomputed from the primary store
    pub misses: u64,
    /// View sets published into the index
    pub refreshes: u64,
    /// Cached view sets removed by clear operations
    pub cache_evictions: u64,
    /// Records truncated by the per-location capacity
    pub capacity_drops: u64,
    /// Locations currently held
    pub total_partitions: usize,
    /// Records currently held across all locations
    pub total_records: usize,
    /// Locations with cached views
    pub cached_keys: usize,
}

impl CacheStats {
    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no reads have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

// == Stats Recorder ==
/// Lock-free counters shared by the store and its synchronizer.
#[derive(Debug, Default)]
pub struct StatsRecorder {
    hits: AtomicU64,
    misses: AtomicU64,
    refreshes: AtomicU64,
    cache_evictions: AtomicU64,
    capacity_drops: AtomicU64,
}

impl StatsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_refresh(&self) {
        self.refreshes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_evictions(&self, count: usize) {
        self.cache_evictions
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn record_capacity_drops(&self, count: usize) {
        self.capacity_drops
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    // == Snapshot ==
    /// Copies the counters; sizes are left for the caller to fill in.
    pub fn snapshot(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            refreshes: self.refreshes.load(Ordering::Relaxed),
            cache_evictions: self.cache_evictions.load(Ordering::Relaxed),
            capacity_drops: self.capacity_drops.load(Ordering::Relaxed),
            ..CacheStats::default()
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = StatsRecorder::new().snapshot();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.refreshes, 0);
        assert_eq!(stats.cache_evictions, 0);
        assert_eq!(stats.capacity_drops, 0);
    }

    #[test]
    fn test_hit_rate_no_requests() {
        let stats = CacheStats::default();
        assert_eq!(stats.hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let recorder = StatsRecorder::new();
        recorder.record_hit();
        recorder.record_hit();
        recorder.record_hit();
        recorder.record_miss();
        assert_eq!(recorder.snapshot().hit_rate(), 0.75);
    }

    #[test]
    fn test_record_counts() {
        let recorder = StatsRecorder::new();
        recorder.record_refresh();
        recorder.record_cache_evictions(3);
        recorder.record_capacity_drops(2);
        recorder.record_capacity_drops(0);

        let stats = recorder.snapshot();
        assert_eq!(stats.refreshes, 1);
        assert_eq!(stats.cache_evictions, 3);
        assert_eq!(stats.capacity_drops, 2);
    }
}
