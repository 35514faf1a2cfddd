//! Weather Record Module
//!
//! Defines a single weather observation and the id generator used by the store.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// == Record Id ==
/// Opaque record identifier, unique for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// == Weather Record ==
/// One weather observation for a location.
///
/// The measurement fields are carried as-is; the store only looks at
/// `id`, `location` and `fetched_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherRecord {
    /// Assigned by the store when absent
    #[serde(default)]
    pub id: Option<RecordId>,
    /// Partition key, usually a postal code
    pub location: String,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub humidity: Option<f64>,
    #[serde(default)]
    pub wind_speed: Option<f64>,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub pressure: Option<f64>,
    #[serde(default)]
    pub visibility: Option<f64>,
    #[serde(default)]
    pub uv_index: Option<f64>,
    /// When the observation was taken, as reported by the source
    pub recorded_at: DateTime<Utc>,
    /// When the record was ingested; sort and eviction key
    #[serde(default = "Utc::now")]
    pub fetched_at: DateTime<Utc>,
    #[serde(default)]
    pub data_source: Option<String>,
}

impl WeatherRecord {
    // == Constructor ==
    /// Creates a record with no id and no measurements.
    pub fn new(
        location: impl Into<String>,
        recorded_at: DateTime<Utc>,
        fetched_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: None,
            location: location.into(),
            temperature: None,
            humidity: None,
            wind_speed: None,
            condition: None,
            pressure: None,
            visibility: None,
            uv_index: None,
            recorded_at,
            fetched_at,
            data_source: None,
        }
    }

    /// Sets an explicit id.
    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(RecordId(id));
        self
    }

    /// Sets temperature and condition.
    pub fn with_conditions(mut self, temperature: f64, condition: impl Into<String>) -> Self {
        self.temperature = Some(temperature);
        self.condition = Some(condition.into());
        self
    }

    /// Sets the provenance tag.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.data_source = Some(source.into());
        self
    }
}

// == Id Generator ==
/// Monotonic id source.
#[derive(Debug)]
pub struct IdGenerator {
    next: AtomicU64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    /// Returns a fresh id, never equal to one already issued or observed.
    pub fn next_id(&self) -> RecordId {
        RecordId(self.next.fetch_add(1, Ordering::Relaxed))
    }

    /// Records a caller-supplied id so later generated ids skip past it.
    pub fn observe(&self, id: RecordId) {
        self.next
            .fetch_max(id.0.saturating_add(1), Ordering::Relaxed);
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
