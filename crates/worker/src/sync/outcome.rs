//! Result types for one page of the sync.
//!
//! A record or image that fails does not fail the page, so those failures
//! are carried as values rather than propagated.

use catalog_sync_core::{Cursor, MappingError, OperationGid, ProductGid};
use thiserror::Error;

use crate::catalogiq::CatalogError;
use crate::shopify::ShopifyError;

use super::PollError;

/// Why a single record was skipped.
#[derive(Debug, Error)]
pub enum RecordError {
    /// The record could not be decoded or mapped.
    #[error(transparent)]
    Mapping(#[from] MappingError),

    /// `productSet` was rejected.
    #[error("product submission failed: {0}")]
    Submission(#[source] ShopifyError),

    /// Waiting on the operation failed or timed out.
    #[error(transparent)]
    Poll(#[from] PollError),

    /// The operation completed without creating a product.
    #[error("operation {operation_id} completed without a product: {errors}")]
    OperationFailed {
        operation_id: OperationGid,
        errors: String,
    },
}

/// Result of attaching one image.
#[derive(Debug)]
pub enum MediaOutcome {
    Attached {
        url: String,
        alt: &'static str,
    },
    Failed {
        url: String,
        alt: &'static str,
        error: ShopifyError,
    },
}

impl MediaOutcome {
    #[must_use]
    pub const fn is_attached(&self) -> bool {
        matches!(self, Self::Attached { .. })
    }
}

/// A record that made it into the store.
#[derive(Debug)]
pub struct CreatedProduct {
    /// Record offset within the catalog.
    pub position: u64,
    pub title: String,
    pub product_id: ProductGid,
    pub variant_count: usize,
    /// Main image first, then additional images in catalog order.
    pub media: Vec<MediaOutcome>,
}

impl CreatedProduct {
    /// Number of images that failed to attach.
    #[must_use]
    pub fn media_failures(&self) -> usize {
        self.media.iter().filter(|m| !m.is_attached()).count()
    }
}

/// A record that was logged and passed over.
#[derive(Debug)]
pub struct SkippedRecord {
    /// Record offset within the catalog.
    pub position: u64,
    pub error: RecordError,
}

#[derive(Debug)]
pub enum RecordOutcome {
    Created(CreatedProduct),
    Skipped(SkippedRecord),
}

impl RecordOutcome {
    #[must_use]
    pub const fn position(&self) -> u64 {
        match self {
            Self::Created(created) => created.position,
            Self::Skipped(skipped) => skipped.position,
        }
    }

    #[must_use]
    pub const fn created(&self) -> Option<&CreatedProduct> {
        match self {
            Self::Created(created) => Some(created),
            Self::Skipped(_) => None,
        }
    }

    #[must_use]
    pub const fn skipped(&self) -> Option<&SkippedRecord> {
        match self {
            Self::Created(_) => None,
            Self::Skipped(skipped) => Some(skipped),
        }
    }
}

/// Everything that happened to the records on one page.
#[derive(Debug)]
pub struct PageReport {
    pub cursor: Cursor,
    pub records: Vec<RecordOutcome>,
}

impl PageReport {
    #[must_use]
    pub fn created(&self) -> usize {
        self.records.iter().filter_map(RecordOutcome::created).count()
    }

    #[must_use]
    pub fn skipped(&self) -> usize {
        self.records.iter().filter_map(RecordOutcome::skipped).count()
    }

    /// Images that failed to attach across all created products.
    #[must_use]
    pub fn media_failures(&self) -> usize {
        self.records
            .iter()
            .filter_map(RecordOutcome::created)
            .map(CreatedProduct::media_failures)
            .sum()
    }
}

/// How a page ended.
#[derive(Debug)]
pub enum PageResult {
    /// Records were processed and `next` has been published.
    Continued { next: Cursor, report: PageReport },

    /// The page at `at` was empty; the catalog is exhausted.
    Completed { at: Cursor },

    /// The page could not be fetched; nothing was published.
    FetchFailed { at: Cursor, error: CatalogError },
}

impl PageResult {
    /// Cursor this page was fetched at.
    #[must_use]
    pub const fn cursor(&self) -> Cursor {
        match self {
            Self::Continued { report, .. } => report.cursor,
            Self::Completed { at } | Self::FetchFailed { at, .. } => *at,
        }
    }
}
