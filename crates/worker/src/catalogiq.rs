//! CatalogIQ API client.
//!
//! # API Reference
//!
//! - Base URL: `https://catalogiq.app/api/v1`
//! - Authentication: `Catalogiq-Api-Key: <key>` header
//! - Pagination: `limit` / `offset` query parameters
//!
//! Records are returned undecoded so a single malformed product fails only
//! that product, not the page it arrived in.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;

use crate::config::CatalogConfig;

/// Header carrying the API key.
const API_KEY_HEADER: &str = "Catalogiq-Api-Key";

/// Errors that can occur when fetching from CatalogIQ.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("API error: {status} - {body}")]
    Status { status: u16, body: String },

    /// Failed to parse the page envelope.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Building the client failed.
    #[error("Client setup failed: {0}")]
    Setup(String),
}

/// Page envelope returned by `GET /products`.
#[derive(Debug, Deserialize)]
struct ProductPage {
    #[serde(default)]
    results: Vec<serde_json::Value>,
}

/// CatalogIQ API client.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    products_url: String,
}

impl CatalogClient {
    /// Create a new CatalogIQ client.
    ///
    /// # Errors
    ///
    /// Returns error if the API key is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let mut headers = HeaderMap::new();

        let mut key = HeaderValue::from_str(config.api_key.expose_secret())
            .map_err(|e| CatalogError::Setup(format!("Invalid API key format: {e}")))?;
        key.set_sensitive(true);
        headers.insert(API_KEY_HEADER, key);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| CatalogError::Setup(e.to_string()))?;

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client,
                products_url: format!("{}/products", config.base_url),
            }),
        })
    }

    /// URL of the products listing.
    #[must_use]
    pub fn products_url(&self) -> &str {
        &self.inner.products_url
    }

    /// Fetch up to `limit` raw product records starting at record `offset`.
    ///
    /// An empty page means the catalog is exhausted.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Status` for any non-200 response, or a
    /// transport/parse error.
    #[instrument(skip(self))]
    pub async fn fetch_products(
        &self,
        offset: u64,
        limit: u32,
    ) -> Result<Vec<serde_json::Value>, CatalogError> {
        let response = self
            .inner
            .client
            .get(&self.inner.products_url)
            .query(&[("limit", u64::from(limit)), ("offset", offset)])
            .send()
            .await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        parse_page(&bytes)
    }
}

fn parse_page(bytes: &[u8]) -> Result<Vec<serde_json::Value>, CatalogError> {
    let page: ProductPage = serde_json::from_slice(bytes)
        .map_err(|e| CatalogError::Parse(format!("Failed to parse product page: {e}")))?;
    Ok(page.results)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    #[test]
    fn test_products_url() {
        let client = CatalogClient::new(&CatalogConfig {
            base_url: "https://catalogiq.app/api/v1".to_string(),
            api_key: SecretString::from("ciq_7Hs9kQ2mXv4pLw8R"),
        })
        .unwrap();
        assert_eq!(client.products_url(), "https://catalogiq.app/api/v1/products");
    }

    #[test]
    fn test_parse_page_keeps_records_raw() {
        let records =
            parse_page(br#"{"count": 2, "results": [{"name": "A"}, {"bogus": true}]}"#).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_parse_empty_page() {
        assert!(parse_page(br#"{"results": []}"#).unwrap().is_empty());
    }

    #[test]
    fn test_parse_page_rejects_non_json() {
        assert!(matches!(
            parse_page(b"<html>502 Bad Gateway</html>"),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn test_status_error_display() {
        let err = CatalogError::Status {
            status: 500,
            body: "Internal Server Error".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 500 - Internal Server Error");
    }
}
