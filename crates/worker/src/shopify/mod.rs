//! Shopify Admin API client (HIGH PRIVILEGE).
//!
//! # Security
//!
//! **This module holds the Shopify Admin API access token.** The token can
//! create and modify products across the whole store.
//!
//! # Architecture
//!
//! - Operations implement `graphql_client::GraphQLQuery` so requests and
//!   responses are typed end to end
//! - Direct API calls to Shopify (no local state)
//! - Only the calls the sync needs: `productSet`, `productOperation`,
//!   `productCreateMedia`
//!
//! # Example
//!
//! ```rust,ignore
//! use catalog_sync_worker::shopify::AdminClient;
//!
//! let client = AdminClient::new(&config.shopify)?;
//!
//! let operation_id = client.product_set(&input).await?;
//! let polled = client.product_operation(&operation_id).await?;
//! ```

mod admin;

pub use admin::{AdminClient, IMAGE_ALT, MAIN_IMAGE_ALT};

use thiserror::Error;

/// Errors that can occur when interacting with Shopify Admin API.
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// GraphQL query returned errors.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// Non-success HTTP status without a GraphQL body.
    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    /// Rate limited by Shopify.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Authentication/authorization failed.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// User error from mutation (e.g., invalid input).
    #[error("User error: {0}")]
    UserError(String),

    /// The response lacked a payload the operation always returns.
    #[error("Missing {0} in response")]
    MissingPayload(&'static str),

    /// Building the client failed.
    #[error("Client setup failed: {0}")]
    Setup(String),
}

/// A GraphQL error returned by the Shopify Admin API.
#[derive(Debug, Clone)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Source locations in the query.
    pub locations: Vec<GraphQLErrorLocation>,
    /// Path to the error in the response.
    pub path: Vec<String>,
}

/// Location in a GraphQL query where an error occurred.
#[derive(Debug, Clone)]
pub struct GraphQLErrorLocation {
    /// Line number (1-indexed).
    pub line: i64,
    /// Column number (1-indexed).
    pub column: i64,
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    errors
        .iter()
        .map(|e| e.message.clone())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graphql_error_formatting() {
        let errors = vec![
            GraphQLError {
                message: "Field 'productSet' doesn't exist".to_string(),
                locations: vec![],
                path: vec![],
            },
            GraphQLError {
                message: "Invalid ID".to_string(),
                locations: vec![],
                path: vec![],
            },
        ];
        let err = ShopifyError::GraphQL(errors);
        assert_eq!(
            err.to_string(),
            "GraphQL errors: Field 'productSet' doesn't exist; Invalid ID"
        );
    }

    #[test]
    fn test_rate_limited_error() {
        let err = ShopifyError::RateLimited(2);
        assert_eq!(err.to_string(), "Rate limited, retry after 2 seconds");
    }

    #[test]
    fn test_missing_payload_error() {
        let err = ShopifyError::MissingPayload("productSetOperation");
        assert_eq!(err.to_string(), "Missing productSetOperation in response");
    }
}
