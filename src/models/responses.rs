//! Response DTOs for the weather store API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::store::{CacheStats, WeatherRecord};

/// Response body for GET /records/:zip/latest
#[derive(Debug, Clone, Serialize)]
pub struct LatestResponse {
    /// The requested location
    pub location: String,
    /// Newest record, or null when none is stored
    pub record: Option<WeatherRecord>,
}

impl LatestResponse {
    pub fn new(location: impl Into<String>, record: Option<WeatherRecord>) -> Self {
        Self {
            location: location.into(),
            record,
        }
    }
}

/// Response body for the recent and range endpoints
#[derive(Debug, Clone, Serialize)]
pub struct RecordsResponse {
    /// The requested location
    pub location: String,
    /// Number of records returned
    pub count: usize,
    /// Records, newest first
    pub records: Vec<WeatherRecord>,
}

impl RecordsResponse {
    pub fn new(location: impl Into<String>, records: Vec<WeatherRecord>) -> Self {
        Self {
            location: location.into(),
            count: records.len(),
            records,
        }
    }
}

/// Response body for the clear endpoints (DELETE /cache, DELETE /cache/:zip)
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    /// Success message
    pub message: String,
    /// The cleared location, absent for a full clear
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl ClearResponse {
    /// Creates a response for a full cache clear
    pub fn all() -> Self {
        Self {
            message: "Cache cleared".to_string(),
            location: None,
        }
    }

    /// Creates a response for a single-location clear
    pub fn location(location: impl Into<String>) -> Self {
        let location = location.into();
        Self {
            message: format!("Cache and records for '{}' cleared", location),
            location: Some(location),
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: CacheStats,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl StatsResponse {
    /// Creates a new StatsResponse from store statistics
    pub fn new(stats: CacheStats) -> Self {
        let hit_rate = stats.hit_rate();
        Self { stats, hit_rate }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
