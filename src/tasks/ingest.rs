//! Ingestion Task
//!
//! Background task that periodically fetches observations from a weather
//! provider and saves them into the store.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::store::{WeatherRecord, WeatherRecordStore};

/// Source of weather observations, typically an HTTP weather API client.
///
/// Provider failures are reported through `anyhow::Error` and never reach the store.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Provenance name, used for logging
    fn name(&self) -> &str;

    /// Fetches the current observation for a postal code.
    async fn fetch(&self, zip: &str) -> anyhow::Result<WeatherRecord>;
}

/// Outcome of one ingestion pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Records saved to the store
    pub saved: usize,
    /// Fetches or saves that failed
    pub failed: usize,
}

/// Fetches every zip once and saves the successful results.
pub async fn ingest_once(
    store: &WeatherRecordStore,
    provider: &dyn WeatherProvider,
    zips: &[String],
) -> IngestReport {
    let mut report = IngestReport::default();

    for zip in zips {
        let record = match provider.fetch(zip).await {
            Ok(record) => record,
            Err(e) => {
                warn!(provider = provider.name(), zip = %zip, error = %e, "Weather fetch failed");
                report.failed += 1;
                continue;
            }
        };

        match store.save(record) {
            Ok(stored) => {
                debug!(zip = %zip, id = stored.id.map(|id| id.0), "Ingested weather record");
                report.saved += 1;
            }
            Err(e) => {
                warn!(provider = provider.name(), zip = %zip, error = %e, "Provider returned an unsavable record");
                report.failed += 1;
            }
        }
    }

    report
}

/// Spawns a background task that ingests `zips` from `provider` every interval.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let store = Arc::new(WeatherRecordStore::new());
/// let handle = spawn_ingest_task(store.clone(), provider, vec!["10001".into()], 600);
/// // Later, during shutdown:
/// handle.abort();
/// ```
pub fn spawn_ingest_task(
    store: Arc<WeatherRecordStore>,
    provider: Arc<dyn WeatherProvider>,
    zips: Vec<String>,
    interval_secs: u64,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            provider = provider.name(),
            locations = zips.len(),
            "Starting ingestion task with interval of {} seconds",
            interval_secs
        );

        let mut ticker = tokio::time::interval(interval);
        loop {
            // First tick completes immediately
            ticker.tick().await;

            let report = ingest_once(&store, provider.as_ref(), &zips).await;

            if report.failed > 0 {
                warn!(
                    saved = report.saved,
                    failed = report.failed,
                    "Ingestion pass finished with failures"
                );
            } else {
                debug!(saved = report.saved, "Ingestion pass finished");
            }
        }
    })
}
