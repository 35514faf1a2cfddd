//! Weather Record Store Module
//!
//! Public contract over the primary store and its synchronized read cache.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{Result, StoreError};
use crate::store::index::{DerivedCacheIndex, InMemoryViewIndex};
use crate::store::primary::PrimaryStore;
use crate::store::record::WeatherRecord;
use crate::store::stats::{CacheStats, StatsRecorder};
use crate::store::sync::CacheSynchronizer;
use crate::store::{CACHED_LIMITS, MAX_RETAINED};

// == Weather Record Store ==
/// Bounded per-location weather history with a cache of common read views.
///
/// Every operation takes `&self`; share it behind an `Arc`.
#[derive(Debug)]
pub struct WeatherRecordStore {
    primary: PrimaryStore,
    sync: CacheSynchronizer,
    stats: Arc<StatsRecorder>,
}

impl WeatherRecordStore {
    // == Constructors ==
    /// Creates a store with default capacity and cached limits.
    pub fn new() -> Self {
        Self::with_capacity(MAX_RETAINED, &CACHED_LIMITS)
    }

    /// Creates a store keeping `max_retained` records per location and
    /// caching recent views for each of `cached_limits`.
    ///
    /// # Panics
    /// Panics if `max_retained` is zero.
    pub fn with_capacity(max_retained: usize, cached_limits: &[usize]) -> Self {
        Self::with_index(
            max_retained,
            cached_limits,
            Arc::new(InMemoryViewIndex::new()),
        )
    }

    /// Creates a store driving a caller-supplied cache index.
    pub fn with_index(
        max_retained: usize,
        cached_limits: &[usize],
        index: Arc<dyn DerivedCacheIndex>,
    ) -> Self {
        let stats = Arc::new(StatsRecorder::new());
        Self {
            primary: PrimaryStore::new(max_retained),
            sync: CacheSynchronizer::new(index, cached_limits, Arc::clone(&stats)),
            stats,
        }
    }

    /// Creates a store from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::with_capacity(config.max_retained, &config.cached_limits)
    }

    // == Save ==
    /// Stores a record and refreshes the cached views for its location.
    ///
    /// Returns the stored record with its id assigned. The views are
    /// republished before this returns.
    pub fn save(&self, mut record: WeatherRecord) -> Result<WeatherRecord> {
        let trimmed = partition_key(&record.location);
        if trimmed.is_empty() {
            warn!("Rejected record without location");
            return Err(StoreError::MissingLocation);
        }
        if trimmed.len() != record.location.len() {
            record.location = trimmed.to_string();
        }

        let outcome = self.primary.put(record);
        let location = outcome.record.location.as_str();
        if outcome.dropped > 0 {
            self.stats.record_capacity_drops(outcome.dropped);
            debug!(
                location,
                dropped = outcome.dropped,
                "Dropped oldest records over capacity"
            );
        }

        self.sync.refresh(&self.primary, location, &outcome.snapshot);
        debug!(
            location,
            id = outcome.record.id.map(|id| id.0),
            "Saved weather record"
        );

        Ok(outcome.record)
    }

    // == Find Most Recent ==
    /// Returns the newest record for `zip`, or `None` if nothing is stored.
    pub fn find_most_recent_by_zip(&self, zip: &str) -> Option<WeatherRecord> {
        self.sync.lookup_latest(&self.primary, partition_key(zip))
    }

    // == Find Recent ==
    /// Returns up to `limit` newest records for `zip`, newest first.
    pub fn find_recent_by_zip(&self, zip: &str, limit: usize) -> Vec<WeatherRecord> {
        if limit == 0 {
            return Vec::new();
        }
        self.sync.lookup_recent(&self.primary, partition_key(zip), limit)
    }

    // == Find By Range ==
    /// Returns records for `zip` fetched within `[start, end]`, newest first.
    ///
    /// Always scans the primary store.
    pub fn find_by_location_zip_and_fetched_at_between(
        &self,
        zip: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<WeatherRecord>> {
        if start > end {
            return Err(StoreError::InvalidRange { start, end });
        }
        Ok(self.primary.range_query(partition_key(zip), start, end))
    }

    // == Clear Cache ==
    /// Evicts every cached view. Stored records are kept.
    pub fn clear_cache(&self) {
        let evicted = self.sync.evict_all();
        info!(evicted, "Cleared weather cache");
    }

    // == Clear Cache For Zip ==
    /// Evicts the cached views for `zip` and deletes its stored records.
    pub fn clear_cache_for_zip(&self, zip: &str) {
        let zip = partition_key(zip);
        let removed = self.primary.remove(zip);
        self.sync.evict_key(zip);
        info!(zip, removed, "Cleared weather cache and records for location");
    }

    // == History ==
    /// Returns the full ordered partition for `zip`, bypassing the cache.
    pub fn history(&self, zip: &str) -> Vec<WeatherRecord> {
        self.primary.get(partition_key(zip))
    }

    // == Stats ==
    /// Returns current statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.snapshot();
        stats.total_partitions = self.primary.partition_count();
        stats.total_records = self.primary.total_records();
        stats.cached_keys = self.sync.cached_keys();
        stats
    }

    /// Recent-N limits served from the cache.
    pub fn cached_limits(&self) -> &[usize] {
        self.sync.limits()
    }

    pub fn max_retained(&self) -> usize {
        self.primary.max_retained()
    }
}

/// Locations are keyed without surrounding whitespace.
fn partition_key(location: &str) -> &str {
    location.trim()
}

impl Default for WeatherRecordStore {
    fn default() -> Self {
        Self::new()
    }
}
