//! Shopify Admin API GraphQL client with access-token authentication.
//!
//! This module provides a type-safe client for the handful of Admin API
//! operations the catalog sync performs.

use std::sync::Arc;

use graphql_client::GraphQLQuery;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;

use crate::config::ShopifyConfig;

use super::{GraphQLError, GraphQLErrorLocation, ShopifyError};

mod media;
mod products;
pub mod queries;

/// Back-off used when a 429 carries no usable `Retry-After`.
const DEFAULT_RETRY_AFTER_SECS: u64 = 2;

pub use media::{IMAGE_ALT, MAIN_IMAGE_ALT};

/// Shopify Admin API GraphQL client.
///
/// Cheap to clone; clones share one connection pool.
///
/// # Security
///
/// The access token has HIGH PRIVILEGE access to the store.
#[derive(Clone)]
pub struct AdminClient {
    inner: Arc<AdminClientInner>,
}

struct AdminClientInner {
    client: reqwest::Client,
    endpoint: String,
    store: String,
}

impl AdminClient {
    /// Create a new Admin API client.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::Setup` if the token is not a valid header value
    /// or the HTTP client fails to build.
    pub fn new(config: &ShopifyConfig) -> Result<Self, ShopifyError> {
        let mut headers = HeaderMap::new();

        let mut token = HeaderValue::from_str(config.access_token.expose_secret())
            .map_err(|e| ShopifyError::Setup(format!("Invalid access token format: {e}")))?;
        token.set_sensitive(true);
        headers.insert("X-Shopify-Access-Token", token);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| ShopifyError::Setup(e.to_string()))?;

        let endpoint = format!(
            "https://{}/admin/api/{}/graphql.json",
            config.store, config.api_version
        );

        Ok(Self {
            inner: Arc::new(AdminClientInner {
                client,
                endpoint,
                store: config.store.clone(),
            }),
        })
    }

    /// Get the store domain.
    #[must_use]
    pub fn store(&self) -> &str {
        &self.inner.store
    }

    /// Get the GraphQL endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.inner.endpoint
    }

    // =========================================================================
    // GraphQL Execution
    // =========================================================================

    /// Execute a GraphQL operation.
    async fn execute<Q: GraphQLQuery>(
        &self,
        variables: Q::Variables,
    ) -> Result<Q::ResponseData, ShopifyError>
    where
        Q::ResponseData: DeserializeOwned,
    {
        let body = Q::build_query(variables);

        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .json(&body)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let headers = response.headers().clone();
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &headers, body));
        }

        let graphql_response: graphql_client::Response<Q::ResponseData> = response.json().await?;
        into_data(graphql_response)
    }
}

/// Map a non-2xx Admin API response to an error.
fn status_error(status: reqwest::StatusCode, headers: &HeaderMap, body: String) -> ShopifyError {
    match status {
        reqwest::StatusCode::TOO_MANY_REQUESTS => ShopifyError::RateLimited(retry_after(headers)),
        reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
            ShopifyError::Unauthorized("Invalid or under-scoped access token".to_string())
        }
        _ => ShopifyError::Status {
            status: status.as_u16(),
            body,
        },
    }
}

/// Whole seconds from `Retry-After`, which Shopify sends fractional ("2.0").
fn retry_after(headers: &HeaderMap) -> u64 {
    headers
        .get("Retry-After")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().split('.').next())
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
}

/// Split a GraphQL envelope into data or a `ShopifyError::GraphQL`.
fn into_data<T>(response: graphql_client::Response<T>) -> Result<T, ShopifyError> {
    if let Some(errors) = response.errors
        && !errors.is_empty()
    {
        let converted_errors: Vec<GraphQLError> = errors
            .into_iter()
            .map(|e| GraphQLError {
                message: e.message,
                locations: e
                    .locations
                    .unwrap_or_default()
                    .into_iter()
                    .map(|l| GraphQLErrorLocation {
                        line: i64::from(l.line),
                        column: i64::from(l.column),
                    })
                    .collect(),
                path: e
                    .path
                    .unwrap_or_default()
                    .iter()
                    .map(ToString::to_string)
                    .collect(),
            })
            .collect();
        return Err(ShopifyError::GraphQL(converted_errors));
    }

    response.data.ok_or_else(|| {
        ShopifyError::GraphQL(vec![GraphQLError {
            message: "No data in response".to_string(),
            locations: vec![],
            path: vec![],
        }])
    })
}

/// Format `{field, message}` user errors the way they are logged.
fn join_user_errors<'a>(
    errors: impl IntoIterator<Item = (Option<&'a Vec<String>>, &'a str)>,
) -> String {
    errors
        .into_iter()
        .map(|(field, message)| {
            let field = field.map_or_else(String::new, |f| f.join("."));
            format!("{field}: {message}")
        })
        .collect::<Vec<_>>()
        .join("; ")
}
