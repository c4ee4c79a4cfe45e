//! The catalog sync: one page per invocation.
//!
//! [`SyncEngine`] walks one page of CatalogIQ records through the mapper,
//! the asynchronous `productSet` mutation, the operation poller and media
//! attachment, then publishes the next offset. When the catalog runs dry it
//! sends the completion email instead.
//!
//! The four external services are reached through the traits below and
//! handed to the engine at construction, so the engine itself holds no
//! global state and can be driven against in-memory fakes.

use std::future::Future;

use catalog_sync_core::{
    Cursor, OperationGid, PolledOperation, ProductGid, ProductMapper, ProductSetInput,
};

use crate::catalogiq::{CatalogClient, CatalogError};
use crate::config::{SyncSettings, WorkerConfig};
use crate::services::{
    CompletionReport, NotifyError, PubSubPublisher, PublishError, SendGridNotifier,
};
use crate::shopify::{AdminClient, ShopifyError};

mod driver;
mod outcome;
mod page;
mod poller;

pub use driver::DriverAction;
pub use outcome::{
    CreatedProduct, MediaOutcome, PageReport, PageResult, RecordError, RecordOutcome,
    SkippedRecord,
};
pub use poller::{OperationPoller, PollError};

/// Source of raw catalog records.
pub trait CatalogSource: Send + Sync {
    /// Fetch up to `limit` records starting at record `offset`.
    fn fetch_page(
        &self,
        offset: u64,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<serde_json::Value>, CatalogError>> + Send;
}

/// Storefront the mapped products are created in.
pub trait ProductStore: Send + Sync {
    /// Shop the products land in, for reporting.
    fn store_domain(&self) -> &str;

    /// Submit a product and return the deferred operation handle.
    fn submit_product(
        &self,
        input: &ProductSetInput,
    ) -> impl Future<Output = Result<OperationGid, ShopifyError>> + Send;

    /// Read the current state of a deferred operation.
    fn operation_status(
        &self,
        id: &OperationGid,
    ) -> impl Future<Output = Result<PolledOperation, ShopifyError>> + Send;

    /// Attach one image to a created product.
    fn attach_image(
        &self,
        product_id: &ProductGid,
        url: &str,
        alt: &str,
    ) -> impl Future<Output = Result<(), ShopifyError>> + Send;
}

/// Queue the next offset message goes to.
pub trait OffsetPublisher: Send + Sync {
    fn publish_offset(
        &self,
        cursor: Cursor,
    ) -> impl Future<Output = Result<(), PublishError>> + Send;
}

/// Receiver of the end-of-catalog signal.
pub trait CompletionNotifier: Send + Sync {
    fn notify_complete(
        &self,
        report: &CompletionReport,
    ) -> impl Future<Output = Result<(), NotifyError>> + Send;
}

impl CatalogSource for CatalogClient {
    async fn fetch_page(
        &self,
        offset: u64,
        limit: u32,
    ) -> Result<Vec<serde_json::Value>, CatalogError> {
        self.fetch_products(offset, limit).await
    }
}

impl ProductStore for AdminClient {
    fn store_domain(&self) -> &str {
        self.store()
    }

    async fn submit_product(&self, input: &ProductSetInput) -> Result<OperationGid, ShopifyError> {
        self.product_set(input).await
    }

    async fn operation_status(&self, id: &OperationGid) -> Result<PolledOperation, ShopifyError> {
        self.product_operation(id).await
    }

    async fn attach_image(
        &self,
        product_id: &ProductGid,
        url: &str,
        alt: &str,
    ) -> Result<(), ShopifyError> {
        self.create_image_media(product_id, url, alt).await
    }
}

impl OffsetPublisher for PubSubPublisher {
    async fn publish_offset(&self, cursor: Cursor) -> Result<(), PublishError> {
        Self::publish_offset(self, cursor).await.map(|_| ())
    }
}

impl CompletionNotifier for SendGridNotifier {
    async fn notify_complete(&self, report: &CompletionReport) -> Result<(), NotifyError> {
        self.send_completion(report).await
    }
}

/// Errors that can occur while wiring up the live engine.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("CatalogIQ client: {0}")]
    Catalog(#[from] CatalogError),
    #[error("Shopify client: {0}")]
    Shopify(#[from] ShopifyError),
    #[error("SendGrid client: {0}")]
    Notify(#[from] NotifyError),
}

/// Engine wired to the real services.
pub type LiveSyncEngine =
    SyncEngine<CatalogClient, AdminClient, PubSubPublisher, SendGridNotifier>;

/// Drives pages of the catalog into the storefront.
pub struct SyncEngine<C, S, P, N> {
    catalog: C,
    store: S,
    publisher: P,
    notifier: N,
    mapper: ProductMapper,
    poller: OperationPoller,
    page_size: u32,
    max_variants: usize,
}

impl<C, S, P, N> SyncEngine<C, S, P, N>
where
    C: CatalogSource,
    S: ProductStore,
    P: OffsetPublisher,
    N: CompletionNotifier,
{
    /// Assemble an engine from its collaborators.
    pub fn new(catalog: C, store: S, publisher: P, notifier: N, settings: &SyncSettings) -> Self {
        Self {
            catalog,
            store,
            publisher,
            notifier,
            mapper: ProductMapper::new(settings.vendor.clone()),
            poller: OperationPoller::new(settings.poll_interval, settings.poll_max_attempts),
            page_size: settings.page_size.max(1),
            max_variants: settings.max_variants,
        }
    }

    /// Record offset of the first record on the page at `cursor`.
    ///
    /// The cursor counts pages; with the default page size of one it is the
    /// record offset itself.
    #[must_use]
    pub fn record_offset(&self, cursor: Cursor) -> u64 {
        cursor.offset().saturating_mul(u64::from(self.page_size))
    }
}

impl LiveSyncEngine {
    /// Build the engine from worker configuration.
    ///
    /// # Errors
    ///
    /// Returns `StartupError` if any client cannot be constructed.
    pub fn from_config(config: &WorkerConfig) -> Result<Self, StartupError> {
        Ok(Self::new(
            CatalogClient::new(&config.catalog)?,
            AdminClient::new(&config.shopify)?,
            PubSubPublisher::new(&config.pubsub),
            SendGridNotifier::new(&config.notify)?,
            &config.sync,
        ))
    }
}
