//! What an invocation does once its page has been processed.

use catalog_sync_core::Cursor;
use tracing::instrument;

use crate::catalogiq::CatalogError;
use crate::services::{CompletionReport, PublishError};

use super::{
    CatalogSource, CompletionNotifier, OffsetPublisher, PageReport, PageResult, ProductStore,
    SyncEngine,
};

/// Final state of one invocation.
#[derive(Debug)]
pub enum DriverAction {
    /// The page was processed and `next` is queued.
    Advanced { next: Cursor, report: PageReport },

    /// The catalog is exhausted. `notified` is false if the completion
    /// email could not be sent.
    Finished { at: Cursor, notified: bool },

    /// The page could not be fetched; the cursor stays where it was.
    Stalled { at: Cursor, error: CatalogError },
}

impl<C, S, P, N> SyncEngine<C, S, P, N>
where
    C: CatalogSource,
    S: ProductStore,
    P: OffsetPublisher,
    N: CompletionNotifier,
{
    /// Process the page at `cursor` and act on how it ended.
    ///
    /// # Errors
    ///
    /// Returns `PublishError` if the next cursor could not be queued.
    pub async fn run_invocation(&self, cursor: Cursor) -> Result<DriverAction, PublishError> {
        let result = self.sync_page(cursor).await?;
        Ok(self.conclude(result).await)
    }

    /// Act on a page result.
    ///
    /// `Continued` needs nothing more since the next cursor is already
    /// published. `Completed` sends the completion email once and publishes
    /// nothing. A failed notification is logged and does not fail the
    /// invocation. `FetchFailed` is handed back so the caller can report it.
    #[instrument(skip(self, result), fields(offset = %result.cursor()))]
    pub async fn conclude(&self, result: PageResult) -> DriverAction {
        match result {
            PageResult::Continued { next, report } => DriverAction::Advanced { next, report },
            PageResult::Completed { at } => {
                let report = CompletionReport {
                    store: self.store.store_domain().to_string(),
                    final_offset: at,
                    finished_at: chrono::Utc::now(),
                };

                let notified = match self.notifier.notify_complete(&report).await {
                    Ok(()) => {
                        tracing::info!("Sync complete, notification sent");
                        true
                    }
                    Err(error) => {
                        tracing::error!(error = %error, "Sync complete, notification failed");
                        false
                    }
                };

                DriverAction::Finished { at, notified }
            }
            PageResult::FetchFailed { at, error } => DriverAction::Stalled { at, error },
        }
    }
}
