//! Catalog Sync Core - Shared types and the catalog field mapper.
//!
//! This crate provides the pieces of the CatalogIQ to Shopify sync that
//! do not touch the network:
//! - `worker` - Pub/Sub triggered sync service
//! - `cli` - Local drivers and dry-run tools
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no queue access. This keeps the mapping rules testable in
//! isolation and usable from any binary.
//!
//! # Modules
//!
//! - [`types`] - Source records, `productSet` payloads, operation state, cursor messages
//! - [`mapping`] - Source product to `ProductSetInput` conversion

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod mapping;
pub mod types;

pub use mapping::{DEFAULT_VENDOR, MappingError, ProductMapper, map_product};
pub use types::*;
