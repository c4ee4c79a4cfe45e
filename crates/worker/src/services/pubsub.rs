//! Google Cloud Pub/Sub publisher for offset messages.
//!
//! Publishing the next offset is what re-triggers the worker, so this is
//! the only piece of state the sync keeps between invocations.
//!
//! # API Reference
//!
//! - `POST {endpoint}/v1/projects/{project}/topics/{topic}:publish`
//! - Body: `{"messages": [{"data": "<base64>"}]}`
//! - Auth: OAuth bearer token, either configured or fetched from the GCE
//!   metadata server (Cloud Run / Cloud Functions default service account)

use std::sync::Arc;

use base64::{Engine, engine::general_purpose::STANDARD};
use catalog_sync_core::Cursor;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use crate::config::PubSubConfig;

const METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";

/// Errors that can occur when publishing an offset.
#[derive(Debug, Error)]
pub enum PublishError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Pub/Sub rejected the publish.
    #[error("Pub/Sub error: {status} - {body}")]
    Rejected { status: u16, body: String },

    /// No access token could be obtained.
    #[error("Token error: {0}")]
    Token(String),

    /// Encoding the message failed.
    #[error("Encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
struct PublishRequest {
    messages: [PubsubMessage; 1],
}

#[derive(Debug, Serialize)]
struct PubsubMessage {
    data: String,
}

#[derive(Debug, Deserialize)]
struct PublishResponse {
    #[serde(default, rename = "messageIds")]
    message_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct MetadataToken {
    access_token: String,
}

/// Publishes offset messages to one Pub/Sub topic.
#[derive(Clone)]
pub struct PubSubPublisher {
    inner: Arc<PubSubPublisherInner>,
}

struct PubSubPublisherInner {
    client: reqwest::Client,
    publish_url: String,
    topic_path: String,
    access_token: Option<SecretString>,
}

impl PubSubPublisher {
    /// Create a publisher for the configured topic.
    #[must_use]
    pub fn new(config: &PubSubConfig) -> Self {
        let topic_path = config.topic_path();

        Self {
            inner: Arc::new(PubSubPublisherInner {
                client: reqwest::Client::new(),
                publish_url: format!("{}/v1/{topic_path}:publish", config.endpoint),
                topic_path,
                access_token: config.access_token.clone(),
            }),
        }
    }

    /// Topic the publisher writes to.
    #[must_use]
    pub fn topic_path(&self) -> &str {
        &self.inner.topic_path
    }

    /// Publish `{"offset": "<n>"}` for the given cursor.
    ///
    /// Returns the Pub/Sub message ID.
    ///
    /// # Errors
    ///
    /// Returns error if no token is available or Pub/Sub rejects the request.
    #[instrument(skip(self), fields(topic = %self.inner.topic_path, offset = %cursor))]
    pub async fn publish_offset(&self, cursor: Cursor) -> Result<String, PublishError> {
        let body = encode_offset(cursor)?;
        let token = self.access_token().await?;

        let response = self
            .inner
            .client
            .post(&self.inner.publish_url)
            .bearer_auth(token.expose_secret())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PublishError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let published: PublishResponse = response.json().await?;
        let message_id = published.message_ids.into_iter().next().unwrap_or_default();
        tracing::info!(message_id = %message_id, "Published next offset");
        Ok(message_id)
    }

    async fn access_token(&self) -> Result<SecretString, PublishError> {
        if let Some(token) = &self.inner.access_token {
            return Ok(token.clone());
        }

        let response = self
            .inner
            .client
            .get(METADATA_TOKEN_URL)
            .header("Metadata-Flavor", "Google")
            .send()
            .await
            .map_err(|e| PublishError::Token(format!("metadata server unreachable: {e}")))?;

        if !response.status().is_success() {
            return Err(PublishError::Token(format!(
                "metadata server returned {}",
                response.status()
            )));
        }

        let token: MetadataToken = response.json().await?;
        Ok(SecretString::from(token.access_token))
    }
}

fn encode_offset(cursor: Cursor) -> Result<PublishRequest, PublishError> {
    let payload = cursor.to_message_bytes()?;
    Ok(PublishRequest {
        messages: [PubsubMessage {
            data: STANDARD.encode(payload),
        }],
    })
}
