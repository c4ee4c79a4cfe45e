//! In-process back-fill without the queue.

use catalog_sync_core::Cursor;
use catalog_sync_worker::catalogiq::CatalogClient;
use catalog_sync_worker::config::{CatalogConfig, NotifyConfig, ShopifyConfig, SyncSettings};
use catalog_sync_worker::services::{PublishError, SendGridNotifier};
use catalog_sync_worker::shopify::AdminClient;
use catalog_sync_worker::sync::{DriverAction, OffsetPublisher, SyncEngine};
use tracing::info;

/// Publisher that only logs; the loop below advances the cursor itself.
struct InProcessCursor;

impl OffsetPublisher for InProcessCursor {
    async fn publish_offset(&self, cursor: Cursor) -> Result<(), PublishError> {
        tracing::debug!(next = %cursor, "Next offset kept in-process");
        Ok(())
    }
}

/// Process pages from `offset` until the catalog is exhausted.
///
/// With `max_pages` set, stops after that many pages and sends no
/// completion email.
///
/// # Errors
///
/// Returns an error if configuration is invalid or a page cannot be
/// fetched.
pub async fn until_complete(
    offset: u64,
    max_pages: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let settings = SyncSettings::from_env()?;
    let engine = SyncEngine::new(
        CatalogClient::new(&CatalogConfig::from_env()?)?,
        AdminClient::new(&ShopifyConfig::from_env()?)?,
        InProcessCursor,
        SendGridNotifier::new(&NotifyConfig::from_env()?)?,
        &settings,
    );

    let mut cursor = Cursor::new(offset);
    let mut pages = 0_u64;
    let mut created = 0_usize;
    let mut skipped = 0_usize;

    loop {
        if max_pages.is_some_and(|max| pages >= max) {
            info!(pages, created, skipped, next = %cursor, "Page limit reached");
            return Ok(());
        }

        match engine.run_invocation(cursor).await? {
            DriverAction::Advanced { next, report } => {
                pages += 1;
                created += report.created();
                skipped += report.skipped();
                info!(
                    page = %report.cursor,
                    created = report.created(),
                    skipped = report.skipped(),
                    "Page processed"
                );
                cursor = next;
            }
            DriverAction::Finished { at, notified } => {
                info!(
                    pages,
                    created,
                    skipped,
                    final_offset = %at,
                    notified,
                    "Back-fill complete"
                );
                return Ok(());
            }
            DriverAction::Stalled { at, error } => {
                tracing::error!(offset = %at, "Back-fill stopped; resume with --offset {at}");
                return Err(error.into());
            }
        }
    }
}
