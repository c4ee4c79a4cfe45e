//! Processing of a single catalog page.

use catalog_sync_core::{Cursor, ProductGid, ProductMapper, SourceProduct};
use serde_json::Value;
use tracing::instrument;

use crate::services::PublishError;
use crate::shopify::{IMAGE_ALT, MAIN_IMAGE_ALT};

use super::{
    CatalogSource, CompletionNotifier, CreatedProduct, MediaOutcome, OffsetPublisher,
    PageReport, PageResult, ProductStore, RecordError, RecordOutcome, SkippedRecord, SyncEngine,
};

impl<C, S, P, N> SyncEngine<C, S, P, N>
where
    C: CatalogSource,
    S: ProductStore,
    P: OffsetPublisher,
    N: CompletionNotifier,
{
    /// Process the page at `cursor` and publish the next cursor.
    ///
    /// Records are handled one at a time. A record that fails to map,
    /// submit or complete is skipped and the rest of the page continues.
    /// An empty page publishes nothing.
    ///
    /// # Errors
    ///
    /// Returns `PublishError` if the page was processed but the next cursor
    /// could not be published.
    #[instrument(skip(self), fields(offset = %cursor, store = %self.store.store_domain()))]
    pub async fn sync_page(&self, cursor: Cursor) -> Result<PageResult, PublishError> {
        let offset = self.record_offset(cursor);

        let records = match self.catalog.fetch_page(offset, self.page_size).await {
            Ok(records) => records,
            Err(error) => {
                tracing::error!(error = %error, "Failed to fetch catalog page");
                return Ok(PageResult::FetchFailed { at: cursor, error });
            }
        };

        if records.is_empty() {
            tracing::info!("Catalog exhausted");
            return Ok(PageResult::Completed { at: cursor });
        }

        tracing::info!(records = records.len(), "Fetched catalog page");

        let mut outcomes = Vec::with_capacity(records.len());
        for (position, record) in (offset..).zip(records) {
            outcomes.push(self.sync_record(position, record).await);
        }

        let report = PageReport {
            cursor,
            records: outcomes,
        };

        let next = cursor.next();
        if let Err(error) = self.publisher.publish_offset(next).await {
            tracing::error!(
                error = %error,
                next = %next,
                created = report.created(),
                "Failed to publish next offset"
            );
            return Err(error);
        }

        tracing::info!(
            next = %next,
            created = report.created(),
            skipped = report.skipped(),
            "Page complete"
        );

        Ok(PageResult::Continued { next, report })
    }

    #[instrument(skip(self, record), fields(sku = tracing::field::Empty))]
    async fn sync_record(&self, position: u64, record: Value) -> RecordOutcome {
        match self.create_product(position, record).await {
            Ok(created) => RecordOutcome::Created(created),
            Err(error) => {
                tracing::warn!(error = %error, "Skipping record");
                RecordOutcome::Skipped(SkippedRecord { position, error })
            }
        }
    }

    async fn create_product(
        &self,
        position: u64,
        record: Value,
    ) -> Result<CreatedProduct, RecordError> {
        let mut product = ProductMapper::decode(record)?;
        record_first_sku(&product);

        let dropped = product.truncate_variants(self.max_variants);
        if dropped > 0 {
            tracing::warn!(dropped, kept = self.max_variants, "Truncated variants");
        }

        let input = self.mapper.map(&product)?;

        let operation_id = self
            .store
            .submit_product(&input)
            .await
            .map_err(RecordError::Submission)?;

        let polled = self.poller.wait(&self.store, &operation_id).await?;

        let Some(product_id) = polled.product_id.clone() else {
            return Err(RecordError::OperationFailed {
                operation_id,
                errors: polled.error_summary(),
            });
        };

        if !polled.user_errors.is_empty() {
            tracing::warn!(
                product_id = %product_id,
                errors = %polled.error_summary(),
                "Product created with user errors"
            );
        }

        tracing::info!(
            product_id = %product_id,
            title = %input.title,
            variants = input.variants.len(),
            "Created product"
        );

        let media = self.attach_media(&product_id, &product).await;

        Ok(CreatedProduct {
            position,
            title: input.title,
            product_id,
            variant_count: input.variants.len(),
            media,
        })
    }

    /// Attach the main image, then each additional image.
    ///
    /// Image entries without a URL are skipped.
    async fn attach_media(
        &self,
        product_id: &ProductGid,
        product: &SourceProduct,
    ) -> Vec<MediaOutcome> {
        let images = product
            .main_image
            .iter()
            .map(|url| (url.as_str(), MAIN_IMAGE_ALT))
            .chain(
                product
                    .images
                    .iter()
                    .filter_map(|image| image.url.as_deref())
                    .map(|url| (url, IMAGE_ALT)),
            );

        let mut outcomes = Vec::new();
        for (url, alt) in images {
            let outcome = match self.store.attach_image(product_id, url, alt).await {
                Ok(()) => MediaOutcome::Attached {
                    url: url.to_string(),
                    alt,
                },
                Err(error) => {
                    tracing::warn!(
                        product_id = %product_id,
                        url,
                        alt,
                        error = %error,
                        "Failed to attach image"
                    );
                    MediaOutcome::Failed {
                        url: url.to_string(),
                        alt,
                        error,
                    }
                }
            };
            outcomes.push(outcome);
        }
        outcomes
    }
}

fn record_first_sku(product: &SourceProduct) {
    if let Some(sku) = product
        .variants
        .iter()
        .flatten()
        .find_map(|v| v.default_code.as_deref())
    {
        tracing::Span::current().record("sku", sku);
    }
}
