//! Weather Store - An in-memory weather record store
//!
//! Keeps a bounded, recency-ordered history per location and a derived read
//! cache (latest record, recent-N records) that stays in step with it.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod store;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use store::{WeatherRecord, WeatherRecordStore};
pub use tasks::{spawn_ingest_task, WeatherProvider};
