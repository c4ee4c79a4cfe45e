//! Process a single page locally.

use catalog_sync_core::Cursor;
use catalog_sync_worker::config::WorkerConfig;
use catalog_sync_worker::sync::{DriverAction, LiveSyncEngine};
use tracing::info;

/// Process the page at `offset` and queue the next offset.
///
/// Behaves exactly like one push to the worker, including publishing.
///
/// # Errors
///
/// Returns an error if configuration is invalid, the page cannot be
/// fetched, or the next offset cannot be published.
pub async fn one_page(offset: u64) -> Result<(), Box<dyn std::error::Error>> {
    let config = WorkerConfig::from_env()?;
    let engine = LiveSyncEngine::from_config(&config)?;

    match engine.run_invocation(Cursor::new(offset)).await? {
        DriverAction::Advanced { next, report } => {
            info!(
                next = %next,
                created = report.created(),
                skipped = report.skipped(),
                media_failures = report.media_failures(),
                "Page processed"
            );
        }
        DriverAction::Finished { at, notified } => {
            info!(offset = %at, notified, "Catalog exhausted");
        }
        DriverAction::Stalled { error, .. } => return Err(error.into()),
    }

    Ok(())
}
