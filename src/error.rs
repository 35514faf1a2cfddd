//! Error types for the weather store
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde_json::json;
use thiserror::Error;

// == Store Error Enum ==
/// Unified error type for the weather store.
///
/// Missing data is never an error: lookups return empty results instead.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Record was submitted without a location key
    #[error("Record location is required")]
    MissingLocation,

    /// Range query bounds are inverted
    #[error("Invalid range: start {start} is after end {end}")]
    InvalidRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

// == IntoResponse Implementation ==
impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        let status = match &self {
            StoreError::MissingLocation | StoreError::InvalidRange { .. } => {
                StatusCode::BAD_REQUEST
            }
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the weather store.
pub type Result<T> = std::result::Result<T, StoreError>;
