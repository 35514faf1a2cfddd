//! Primary Store Module
//!
//! Authoritative per-location record history, bounded and ordered newest-first.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};

use crate::store::record::{IdGenerator, WeatherRecord};

// == Partition Snapshot ==
/// Immutable view of one partition at a given version.
///
/// Records are ordered by `fetched_at` descending.
#[derive(Debug, Clone)]
pub struct PartitionSnapshot {
    /// Store-wide version stamped by the put that produced this snapshot
    pub version: u64,
    /// Retained records, newest first
    pub records: Arc<[WeatherRecord]>,
}

impl Default for PartitionSnapshot {
    fn default() -> Self {
        Self {
            version: 0,
            records: Arc::from(Vec::new()),
        }
    }
}

impl PartitionSnapshot {
    pub fn latest(&self) -> Option<&WeatherRecord> {
        self.records.first()
    }

    pub fn recent(&self, limit: usize) -> &[WeatherRecord] {
        &self.records[..limit.min(self.records.len())]
    }
}

// == Put Outcome ==
/// Result of a single put.
#[derive(Debug, Clone)]
pub struct PutOutcome {
    /// The stored record, with its id filled in
    pub record: WeatherRecord,
    /// Partition contents right after this put
    pub snapshot: PartitionSnapshot,
    /// Records truncated by the capacity limit
    pub dropped: usize,
}

// == Partition ==
/// One location's records.
///
/// `write_gate` serializes puts so read-modify-sort-trim never interleaves;
/// `current` is only held long enough to clone or swap the snapshot.
#[derive(Debug, Default)]
struct Partition {
    write_gate: Mutex<()>,
    current: RwLock<PartitionSnapshot>,
}

impl Partition {
    fn snapshot(&self) -> PartitionSnapshot {
        self.current.read().clone()
    }
}

// == Primary Store ==
/// Capacity-bounded, recency-ordered record storage keyed by location.
#[derive(Debug)]
pub struct PrimaryStore {
    /// Location -> partition
    partitions: DashMap<String, Arc<Partition>>,
    /// Source of ids for records saved without one
    ids: IdGenerator,
    /// Store-wide version counter, never reused
    versions: AtomicU64,
    /// Maximum records kept per partition
    max_retained: usize,
}

impl PrimaryStore {
    // == Constructor ==
    /// Creates an empty store keeping at most `max_retained` records per location.
    ///
    /// # Panics
    /// Panics if `max_retained` is zero.
    pub fn new(max_retained: usize) -> Self {
        assert!(max_retained > 0, "max_retained must be at least 1");
        Self {
            partitions: DashMap::new(),
            ids: IdGenerator::new(),
            versions: AtomicU64::new(0),
            max_retained,
        }
    }

    // == Put ==
    /// Stores a record in its location's partition.
    ///
    /// Assigns an id when absent, replaces any record with the same id,
    /// re-sorts by `fetched_at` descending and truncates to capacity.
    pub fn put(&self, mut record: WeatherRecord) -> PutOutcome {
        let id = match record.id {
            Some(id) => {
                self.ids.observe(id);
                id
            }
            None => {
                let id = self.ids.next_id();
                record.id = Some(id);
                id
            }
        };

        // Clone the Arc out so the map shard is released before we lock the partition
        let partition = Arc::clone(
            self.partitions
                .entry(record.location.clone())
                .or_default()
                .value(),
        );

        let _gate = partition.write_gate.lock();
        let previous = partition.snapshot();

        let mut records: Vec<WeatherRecord> = previous
            .records
            .iter()
            .filter(|existing| existing.id != Some(id))
            .cloned()
            .collect();
        records.push(record.clone());
        // Stable sort keeps insertion order among equal timestamps
        records.sort_by(|a, b| b.fetched_at.cmp(&a.fetched_at));

        let dropped = records.len().saturating_sub(self.max_retained);
        records.truncate(self.max_retained);

        let snapshot = PartitionSnapshot {
            version: self.versions.fetch_add(1, Ordering::SeqCst) + 1,
            records: records.into(),
        };
        *partition.current.write() = snapshot.clone();

        PutOutcome {
            record,
            snapshot,
            dropped,
        }
    }

    // == Get ==
    /// Returns the ordered partition for `key`, or an empty list.
    pub fn get(&self, key: &str) -> Vec<WeatherRecord> {
        self.snapshot(key)
            .map(|snapshot| snapshot.records.to_vec())
            .unwrap_or_default()
    }

    /// Returns the current snapshot for `key`, if the partition exists.
    pub fn snapshot(&self, key: &str) -> Option<PartitionSnapshot> {
        let partition = self.partitions.get(key).map(|p| Arc::clone(p.value()))?;
        Some(partition.snapshot())
    }

    /// Returns the version of the partition currently mapped to `key`.
    pub fn version(&self, key: &str) -> Option<u64> {
        let partition = self.partitions.get(key).map(|p| Arc::clone(p.value()))?;
        let version = partition.current.read().version;
        Some(version)
    }

    // == Remove ==
    /// Deletes the whole partition. Returns the number of records removed.
    pub fn remove(&self, key: &str) -> usize {
        self.partitions
            .remove(key)
            .map(|(_, partition)| partition.snapshot().records.len())
            .unwrap_or(0)
    }

    // == Range Query ==
    /// Returns records whose `fetched_at` lies in `[start, end]`, newest first.
    ///
    /// Linear scan of the current partition contents.
    pub fn range_query(
        &self,
        key: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<WeatherRecord> {
        let Some(snapshot) = self.snapshot(key) else {
            return Vec::new();
        };

        snapshot
            .records
            .iter()
            .filter(|record| record.fetched_at >= start && record.fetched_at <= end)
            .cloned()
            .collect()
    }

    // == Length ==
    /// Returns the number of records held for `key`.
    pub fn len(&self, key: &str) -> usize {
        self.snapshot(key)
            .map(|snapshot| snapshot.records.len())
            .unwrap_or(0)
    }

    /// Returns true if no partition holds any record.
    pub fn is_empty(&self) -> bool {
        self.total_records() == 0
    }

    /// Number of known locations.
    pub fn partition_count(&self) -> usize {
        self.partitions.len()
    }

    /// Sum of records across all partitions.
    pub fn total_records(&self) -> usize {
        let partitions: Vec<Arc<Partition>> = self
            .partitions
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        partitions.iter().map(|p| p.snapshot().records.len()).sum()
    }

    pub fn max_retained(&self) -> usize {
        self.max_retained
    }
}
