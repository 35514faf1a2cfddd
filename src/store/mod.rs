//! Store Module
//!
//! In-memory weather record storage with a synchronized read cache.

mod index;
mod primary;
mod record;
mod stats;
mod sync;
mod weather_store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use index::{DerivedCacheIndex, InMemoryViewIndex, KeyViews};
pub use primary::{PartitionSnapshot, PrimaryStore, PutOutcome};
pub use record::{IdGenerator, RecordId, WeatherRecord};
pub use stats::{CacheStats, StatsRecorder};
pub use sync::CacheSynchronizer;
pub use weather_store::WeatherRecordStore;

// == Public Constants ==
/// Maximum records retained per location
pub const MAX_RETAINED: usize = 100;

/// Recent-N limits kept precomputed in the cache
pub const CACHED_LIMITS: [usize; 2] = [5, 10];
