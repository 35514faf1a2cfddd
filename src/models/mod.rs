//! Request and Response models for the weather store API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{RangeQuery, RecentQuery, SaveRecordRequest, DEFAULT_RECENT_LIMIT};
pub use responses::{
    ClearResponse, HealthResponse, LatestResponse, RecordsResponse, StatsResponse,
};
