//! API Routes
//!
//! Configures the Axum router with all weather store endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clear_cache_handler, clear_zip_handler, health_handler, latest_handler, range_handler,
    recent_handler, save_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `POST /records` - Save a weather record
/// - `GET /records/:zip/latest` - Newest record for a location
/// - `GET /records/:zip/recent` - Newest N records for a location
/// - `GET /records/:zip/range` - Records fetched within a time range
/// - `DELETE /cache` - Clear all cached views
/// - `DELETE /cache/:zip` - Clear cached views and records for a location
/// - `GET /stats` - Store statistics
/// - `GET /health` - Health check endpoint
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/records", post(save_handler))
        .route("/records/:zip/latest", get(latest_handler))
        .route("/records/:zip/recent", get(recent_handler))
        .route("/records/:zip/range", get(range_handler))
        .route("/cache", delete(clear_cache_handler))
        .route("/cache/:zip", delete(clear_zip_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
