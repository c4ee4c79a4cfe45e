//! Bounded polling of deferred `productSet` operations.

use std::time::Duration;

use catalog_sync_core::{OperationGid, OperationStatus, PolledOperation};
use thiserror::Error;
use tracing::instrument;

use crate::shopify::ShopifyError;

use super::ProductStore;

/// Errors that can occur while waiting on an operation.
#[derive(Debug, Error)]
pub enum PollError {
    /// A status query failed outright.
    #[error("operation status query failed: {0}")]
    Query(#[source] ShopifyError),

    /// The attempt budget ran out before the operation completed.
    #[error(
        "operation {operation_id} not complete after {attempts} attempts (last status: {})",
        .last_status.as_ref().map_or("none", OperationStatus::as_str)
    )]
    Timeout {
        operation_id: OperationGid,
        attempts: u32,
        last_status: Option<OperationStatus>,
    },
}

/// Fixed-interval poller with an attempt budget.
#[derive(Debug, Clone, Copy)]
pub struct OperationPoller {
    interval: Duration,
    max_attempts: u32,
}

impl Default for OperationPoller {
    fn default() -> Self {
        Self::new(Duration::from_secs(2), 150)
    }
}

impl OperationPoller {
    /// A budget of zero attempts is treated as one.
    #[must_use]
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts: max_attempts.max(1),
        }
    }

    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Query `operation_id` until it reports `COMPLETE`.
    ///
    /// A completed operation is returned as observed; whether it actually
    /// produced a product is for the caller to decide. Rate limited queries
    /// wait out the advertised delay and count against the budget.
    ///
    /// Dropping the returned future cancels the poll.
    ///
    /// # Errors
    ///
    /// Returns `PollError::Timeout` once the budget is spent, or
    /// `PollError::Query` if a status query fails for any other reason.
    #[instrument(skip(self, store), fields(operation_id = %operation_id))]
    pub async fn wait<S: ProductStore>(
        &self,
        store: &S,
        operation_id: &OperationGid,
    ) -> Result<PolledOperation, PollError> {
        let mut last_status = None;

        for attempt in 1..=self.max_attempts {
            let delay = match store.operation_status(operation_id).await {
                Ok(polled) if polled.status.is_terminal() => {
                    tracing::debug!(attempt, "Operation complete");
                    return Ok(polled);
                }
                Ok(polled) => {
                    tracing::debug!(attempt, status = %polled.status, "Operation pending");
                    last_status = Some(polled.status);
                    self.interval
                }
                Err(ShopifyError::RateLimited(secs)) => {
                    tracing::warn!(attempt, retry_after = secs, "Status query rate limited");
                    Duration::from_secs(secs).max(self.interval)
                }
                Err(e) => return Err(PollError::Query(e)),
            };

            if attempt < self.max_attempts {
                tokio::time::sleep(delay).await;
            }
        }

        Err(PollError::Timeout {
            operation_id: operation_id.clone(),
            attempts: self.max_attempts,
            last_status,
        })
    }
}
