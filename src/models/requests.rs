//! Request DTOs for the weather store API
//!
//! Defines query parameters and bodies for incoming HTTP requests.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::store::WeatherRecord;

/// Request body for saving a record (POST /records)
///
/// The record itself; `id` and `fetchedAt` may be omitted.
pub type SaveRecordRequest = WeatherRecord;

/// Default number of records returned by the recent endpoint
pub const DEFAULT_RECENT_LIMIT: usize = 10;

/// Query parameters for GET /records/:zip/recent
#[derive(Debug, Clone, Deserialize)]
pub struct RecentQuery {
    /// Maximum number of records to return
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    DEFAULT_RECENT_LIMIT
}

/// Query parameters for GET /records/:zip/range
#[derive(Debug, Clone, Deserialize)]
pub struct RangeQuery {
    /// Inclusive lower bound on `fetchedAt` (RFC 3339)
    pub start: DateTime<Utc>,
    /// Inclusive upper bound on `fetchedAt` (RFC 3339)
    pub end: DateTime<Utc>,
}
