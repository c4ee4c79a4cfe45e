//! Catalog sync worker library.
//!
//! Moves products from the CatalogIQ catalog into a Shopify store one page
//! at a time. Each page is triggered by a Pub/Sub push carrying the offset
//! to process; the worker publishes the next offset when it is done and
//! sends a completion email once the catalog is exhausted.
//!
//! # Security
//!
//! This crate holds a Shopify Admin API token with product write access,
//! a CatalogIQ API key and a SendGrid API key.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalogiq;
pub mod config;
pub mod error;
pub mod routes;
pub mod services;
pub mod shopify;
pub mod state;
pub mod sync;
