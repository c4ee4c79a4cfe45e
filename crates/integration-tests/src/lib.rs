//! Integration tests for the catalog sync.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p catalog-sync-integration-tests
//! ```
//!
//! The sync engine is driven against in-memory stand-ins for CatalogIQ,
//! Shopify, Pub/Sub and SendGrid. Each fake is cheap to clone and clones
//! share state, so a test keeps one handle and gives the other to the
//! engine.

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use catalog_sync_core::{
    Cursor, OperationGid, OperationStatus, OperationUserError, PolledOperation, ProductGid,
    ProductSetInput,
};
use catalog_sync_worker::catalogiq::CatalogError;
use catalog_sync_worker::config::SyncSettings;
use catalog_sync_worker::services::{CompletionReport, NotifyError, PublishError};
use catalog_sync_worker::shopify::ShopifyError;
use catalog_sync_worker::sync::{
    CatalogSource, CompletionNotifier, OffsetPublisher, ProductStore, SyncEngine,
};
use serde_json::{Value, json};

/// Engine wired to the fakes below.
pub type TestEngine = SyncEngine<FakeCatalog, FakeStore, RecordingPublisher, RecordingNotifier>;

/// Settings with a poll interval short enough for tests.
#[must_use]
pub fn fast_settings() -> SyncSettings {
    SyncSettings {
        poll_interval: Duration::from_millis(1),
        poll_max_attempts: 5,
        ..SyncSettings::default()
    }
}

/// Handles to every fake, kept by the test after the engine is built.
#[derive(Clone, Default)]
pub struct Harness {
    pub catalog: FakeCatalog,
    pub store: FakeStore,
    pub publisher: RecordingPublisher,
    pub notifier: RecordingNotifier,
}

impl Harness {
    #[must_use]
    pub fn with_records(records: Vec<Value>) -> Self {
        Self {
            catalog: FakeCatalog::with_records(records),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn engine(&self) -> TestEngine {
        self.engine_with(&fast_settings())
    }

    #[must_use]
    pub fn engine_with(&self, settings: &SyncSettings) -> TestEngine {
        SyncEngine::new(
            self.catalog.clone(),
            self.store.clone(),
            self.publisher.clone(),
            self.notifier.clone(),
            settings,
        )
    }
}

// =============================================================================
// Fixtures
// =============================================================================

/// A catalog record with one variant per `(sku, size)` pair.
#[must_use]
pub fn sized_product(name: &str, variants: &[(&str, &str)]) -> Value {
    let variants: Vec<Value> = variants
        .iter()
        .map(|(sku, size)| {
            json!({
                "default_code": sku,
                "attributes": [{"name": "Size", "value": size}]
            })
        })
        .collect();

    json!({
        "name": name,
        "description_sale": format!("<p>{name}</p>"),
        "main_image": false,
        "images": [],
        "attributes": [],
        "variants": variants
    })
}

// =============================================================================
// CatalogIQ
// =============================================================================

#[derive(Default)]
struct CatalogState {
    records: Vec<Value>,
    fail_status: Option<u16>,
    requests: Vec<(u64, u32)>,
}

/// Catalog served from memory, sliced by offset and limit.
#[derive(Clone, Default)]
pub struct FakeCatalog {
    state: Arc<Mutex<CatalogState>>,
}

impl FakeCatalog {
    #[must_use]
    pub fn with_records(records: Vec<Value>) -> Self {
        let catalog = Self::default();
        catalog.state.lock().unwrap().records = records;
        catalog
    }

    /// Answer every request with `status`.
    pub fn fail_with(&self, status: u16) {
        self.state.lock().unwrap().fail_status = Some(status);
    }

    /// `(offset, limit)` of every request made.
    #[must_use]
    pub fn requests(&self) -> Vec<(u64, u32)> {
        self.state.lock().unwrap().requests.clone()
    }
}

impl CatalogSource for FakeCatalog {
    async fn fetch_page(&self, offset: u64, limit: u32) -> Result<Vec<Value>, CatalogError> {
        let mut state = self.state.lock().unwrap();
        state.requests.push((offset, limit));

        if let Some(status) = state.fail_status {
            return Err(CatalogError::Status {
                status,
                body: "Internal Server Error".to_string(),
            });
        }

        let start = usize::try_from(offset).unwrap_or(usize::MAX);
        Ok(state
            .records
            .iter()
            .skip(start)
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }
}

// =============================================================================
// Shopify
// =============================================================================

struct StoreState {
    submitted: Vec<ProductSetInput>,
    polls: HashMap<OperationGid, u32>,
    complete_after: u32,
    complete_without_product: bool,
    rejected_titles: HashSet<String>,
    failing_images: HashSet<String>,
    images: Vec<(ProductGid, String, String)>,
}

impl Default for StoreState {
    fn default() -> Self {
        Self {
            submitted: Vec::new(),
            polls: HashMap::new(),
            complete_after: 1,
            complete_without_product: false,
            rejected_titles: HashSet::new(),
            failing_images: HashSet::new(),
            images: Vec::new(),
        }
    }
}

/// Storefront that completes operations after a set number of polls.
///
/// The n-th submitted product becomes operation `n` and product `n`.
#[derive(Clone, Default)]
pub struct FakeStore {
    state: Arc<Mutex<StoreState>>,
}

impl FakeStore {
    /// Report `COMPLETE` on the `polls`-th status query of each operation.
    pub fn complete_after(&self, polls: u32) {
        self.state.lock().unwrap().complete_after = polls;
    }

    /// Never report `COMPLETE`.
    pub fn never_complete(&self) {
        self.complete_after(u32::MAX);
    }

    /// Complete operations without a product, as Shopify does when the
    /// input was rejected during processing.
    pub fn complete_without_product(&self) {
        self.state.lock().unwrap().complete_without_product = true;
    }

    /// Reject `productSet` for products with this title.
    pub fn reject_title(&self, title: &str) {
        self.state
            .lock()
            .unwrap()
            .rejected_titles
            .insert(title.to_string());
    }

    /// Fail media creation for this image URL.
    pub fn fail_image(&self, url: &str) {
        self.state
            .lock()
            .unwrap()
            .failing_images
            .insert(url.to_string());
    }

    #[must_use]
    pub fn submitted(&self) -> Vec<ProductSetInput> {
        self.state.lock().unwrap().submitted.clone()
    }

    /// `(product, url, alt)` of every image attached.
    #[must_use]
    pub fn images(&self) -> Vec<(ProductGid, String, String)> {
        self.state.lock().unwrap().images.clone()
    }

    /// Status queries made against the n-th operation (1-based).
    #[must_use]
    pub fn polls_for(&self, n: usize) -> u32 {
        let id = operation_gid(n);
        self.state
            .lock()
            .unwrap()
            .polls
            .get(&id)
            .copied()
            .unwrap_or(0)
    }
}

fn operation_gid(n: usize) -> OperationGid {
    OperationGid::new(format!("gid://shopify/ProductSetOperation/{n}"))
}

fn product_gid(operation: &OperationGid) -> ProductGid {
    let n = operation.numeric_id().unwrap_or(0);
    ProductGid::new(format!("gid://shopify/Product/{n}"))
}

impl ProductStore for FakeStore {
    fn store_domain(&self) -> &str {
        "acme.myshopify.com"
    }

    async fn submit_product(&self, input: &ProductSetInput) -> Result<OperationGid, ShopifyError> {
        let mut state = self.state.lock().unwrap();
        if state.rejected_titles.contains(&input.title) {
            return Err(ShopifyError::UserError(
                "title: Title has already been taken".to_string(),
            ));
        }
        state.submitted.push(input.clone());
        Ok(operation_gid(state.submitted.len()))
    }

    async fn operation_status(&self, id: &OperationGid) -> Result<PolledOperation, ShopifyError> {
        let mut state = self.state.lock().unwrap();
        let complete_after = state.complete_after;
        let without_product = state.complete_without_product;

        let polls = state.polls.entry(id.clone()).or_insert(0);
        *polls += 1;

        if *polls < complete_after {
            return Ok(PolledOperation {
                status: OperationStatus::Active,
                product_id: None,
                user_errors: vec![],
            });
        }

        Ok(if without_product {
            PolledOperation {
                status: OperationStatus::Complete,
                product_id: None,
                user_errors: vec![OperationUserError {
                    code: Some("INVALID_VARIANT".to_string()),
                    field: Some(vec!["input".to_string(), "variants".to_string()]),
                    message: "Variant is invalid".to_string(),
                }],
            }
        } else {
            PolledOperation {
                status: OperationStatus::Complete,
                product_id: Some(product_gid(id)),
                user_errors: vec![],
            }
        })
    }

    async fn attach_image(
        &self,
        product_id: &ProductGid,
        url: &str,
        alt: &str,
    ) -> Result<(), ShopifyError> {
        let mut state = self.state.lock().unwrap();
        if state.failing_images.contains(url) {
            return Err(ShopifyError::UserError(
                "originalSource: Image URL is invalid".to_string(),
            ));
        }
        state
            .images
            .push((product_id.clone(), url.to_string(), alt.to_string()));
        Ok(())
    }
}

// =============================================================================
// Pub/Sub
// =============================================================================

#[derive(Default)]
struct PublisherState {
    published: Vec<Cursor>,
    fail: bool,
}

/// Publisher that records cursors instead of sending them.
#[derive(Clone, Default)]
pub struct RecordingPublisher {
    state: Arc<Mutex<PublisherState>>,
}

impl RecordingPublisher {
    pub fn fail(&self) {
        self.state.lock().unwrap().fail = true;
    }

    #[must_use]
    pub fn published(&self) -> Vec<Cursor> {
        self.state.lock().unwrap().published.clone()
    }
}

impl OffsetPublisher for RecordingPublisher {
    async fn publish_offset(&self, cursor: Cursor) -> Result<(), PublishError> {
        let mut state = self.state.lock().unwrap();
        if state.fail {
            return Err(PublishError::Rejected {
                status: 403,
                body: "PERMISSION_DENIED".to_string(),
            });
        }
        state.published.push(cursor);
        Ok(())
    }
}

// =============================================================================
// SendGrid
// =============================================================================

#[derive(Default)]
struct NotifierState {
    reports: Vec<CompletionReport>,
    fail: bool,
}

/// Notifier that records completion reports.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    state: Arc<Mutex<NotifierState>>,
}

impl RecordingNotifier {
    pub fn fail(&self) {
        self.state.lock().unwrap().fail = true;
    }

    #[must_use]
    pub fn reports(&self) -> Vec<CompletionReport> {
        self.state.lock().unwrap().reports.clone()
    }
}

impl CompletionNotifier for RecordingNotifier {
    async fn notify_complete(&self, report: &CompletionReport) -> Result<(), NotifyError> {
        let mut state = self.state.lock().unwrap();
        // The attempt is recorded even when it fails
        state.reports.push(report.clone());
        if state.fail {
            return Err(NotifyError::Rejected {
                status: 401,
                body: "authorization grant is invalid".to_string(),
            });
        }
        Ok(())
    }
}
