//! Background Tasks Module
//!
//! Contains background tasks that run periodically alongside the store.
//!
//! # Tasks
//! - Ingestion: Fetches observations from a provider and saves them
//!
//! The server binary does not start ingestion; embedders supply a
//! `WeatherProvider` and call `spawn_ingest_task` themselves.

mod ingest;

pub use ingest::{ingest_once, spawn_ingest_task, IngestReport, WeatherProvider};
