//! API Module
//!
//! HTTP handlers and routing for the weather store query adapter.
//!
//! # Endpoints
//! - `POST /records` - Save a weather record
//! - `GET /records/:zip/latest` - Newest record for a location
//! - `GET /records/:zip/recent` - Newest N records for a location
//! - `GET /records/:zip/range` - Records fetched within a time range
//! - `DELETE /cache` - Clear all cached views
//! - `DELETE /cache/:zip` - Clear cached views and records for a location
//! - `GET /stats` - Store statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
