//! API Handlers
//!
//! HTTP request handlers forwarding to the weather record store.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::error::Result;
use crate::models::{
    ClearResponse, HealthResponse, LatestResponse, RangeQuery, RecentQuery, RecordsResponse,
    SaveRecordRequest, StatsResponse,
};
use crate::store::{WeatherRecord, WeatherRecordStore};

/// Application state shared across all handlers.
///
/// The store synchronizes internally, so no outer lock is needed.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<WeatherRecordStore>,
}

impl AppState {
    /// Creates a new AppState with the given store.
    pub fn new(store: WeatherRecordStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self::new(WeatherRecordStore::from_config(config))
    }
}

/// Handler for POST /records
pub async fn save_handler(
    State(state): State<AppState>,
    Json(req): Json<SaveRecordRequest>,
) -> Result<Json<WeatherRecord>> {
    let stored = state.store.save(req)?;
    Ok(Json(stored))
}

/// Handler for GET /records/:zip/latest
pub async fn latest_handler(
    State(state): State<AppState>,
    Path(zip): Path<String>,
) -> Json<LatestResponse> {
    let record = state.store.find_most_recent_by_zip(&zip);
    Json(LatestResponse::new(zip, record))
}

/// Handler for GET /records/:zip/recent?limit=N
pub async fn recent_handler(
    State(state): State<AppState>,
    Path(zip): Path<String>,
    Query(query): Query<RecentQuery>,
) -> Json<RecordsResponse> {
    let records = state.store.find_recent_by_zip(&zip, query.limit);
    Json(RecordsResponse::new(zip, records))
}

/// Handler for GET /records/:zip/range?start=..&end=..
pub async fn range_handler(
    State(state): State<AppState>,
    Path(zip): Path<String>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<RecordsResponse>> {
    let records =
        state
            .store
            .find_by_location_zip_and_fetched_at_between(&zip, query.start, query.end)?;
    Ok(Json(RecordsResponse::new(zip, records)))
}

/// Handler for DELETE /cache
pub async fn clear_cache_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    state.store.clear_cache();
    Json(ClearResponse::all())
}

/// Handler for DELETE /cache/:zip
///
/// Also deletes the stored records for the location.
pub async fn clear_zip_handler(
    State(state): State<AppState>,
    Path(zip): Path<String>,
) -> Json<ClearResponse> {
    state.store.clear_cache_for_zip(&zip);
    Json(ClearResponse::location(zip))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::new(state.store.stats()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
