//! Derived Cache Index Module
//!
//! Keyed table of precomputed read views that mirror the primary store.

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::store::primary::PartitionSnapshot;
use crate::store::record::WeatherRecord;

// == Key Views ==
/// Every cached view for one location, computed from a single partition version.
///
/// Published as a whole, so `latest` and each recent-N always agree.
#[derive(Debug, Clone)]
pub struct KeyViews {
    version: u64,
    latest: Option<WeatherRecord>,
    recent: BTreeMap<usize, Arc<[WeatherRecord]>>,
}

impl KeyViews {
    // == Constructor ==
    /// Computes the latest view and one recent view per limit.
    pub fn compute(snapshot: &PartitionSnapshot, limits: &[usize]) -> Self {
        let recent: BTreeMap<usize, Arc<[WeatherRecord]>> = limits
            .iter()
            .map(|&limit| (limit, Arc::from(snapshot.recent(limit))))
            .collect();

        Self {
            version: snapshot.version,
            latest: snapshot.latest().cloned(),
            recent,
        }
    }

    /// Partition version these views were computed from.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn latest(&self) -> Option<&WeatherRecord> {
        self.latest.as_ref()
    }

    /// Cached recent view for `limit`, if that limit is cached.
    pub fn recent(&self, limit: usize) -> Option<&[WeatherRecord]> {
        self.recent.get(&limit).map(|records| &records[..])
    }
}

// == Derived Cache Index ==
/// Pluggable key -> views map driven by the cache synchronizer.
pub trait DerivedCacheIndex: Send + Sync + Debug {
    /// Returns the cached views for `key`.
    fn get(&self, key: &str) -> Option<Arc<KeyViews>>;

    /// Atomically publishes `views` for `key` if `accept` approves the current entry.
    ///
    /// `accept` runs while the entry is locked and receives the views being replaced.
    /// Returns true when `views` was stored.
    fn publish_if(
        &self,
        key: &str,
        views: Arc<KeyViews>,
        accept: &dyn Fn(Option<&KeyViews>) -> bool,
    ) -> bool;

    /// Removes all views for `key`. Returns true if anything was cached.
    fn evict_key(&self, key: &str) -> bool;

    /// Removes every cached view. Returns the number of keys evicted.
    fn evict_all(&self) -> usize;

    /// Number of keys with cached views.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// == In-Memory View Index ==
/// Default index backed by a concurrent hash map.
#[derive(Debug, Default)]
pub struct InMemoryViewIndex {
    views: DashMap<String, Arc<KeyViews>>,
}

impl InMemoryViewIndex {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DerivedCacheIndex for InMemoryViewIndex {
    fn get(&self, key: &str) -> Option<Arc<KeyViews>> {
        self.views.get(key).map(|views| Arc::clone(views.value()))
    }

    fn publish_if(
        &self,
        key: &str,
        views: Arc<KeyViews>,
        accept: &dyn Fn(Option<&KeyViews>) -> bool,
    ) -> bool {
        match self.views.entry(key.to_string()) {
            Entry::Occupied(mut entry) => {
                if !accept(Some(entry.get())) {
                    return false;
                }
                entry.insert(views);
                true
            }
            Entry::Vacant(entry) => {
                if !accept(None) {
                    return false;
                }
                entry.insert(views);
                true
            }
        }
    }

    fn evict_key(&self, key: &str) -> bool {
        self.views.remove(key).is_some()
    }

    fn evict_all(&self) -> usize {
        let count = self.views.len();
        self.views.clear();
        count
    }

    fn len(&self) -> usize {
        self.views.len()
    }
}
