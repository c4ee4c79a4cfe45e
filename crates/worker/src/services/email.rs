//! Completion email sent through SendGrid.
//!
//! Renders Askama HTML and plain-text templates and posts them to the
//! SendGrid v3 `mail/send` endpoint.

use std::sync::Arc;

use askama::Template;
use catalog_sync_core::Cursor;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Serialize;
use thiserror::Error;
use tracing::instrument;

use crate::config::NotifyConfig;

const SENDGRID_SEND_URL: &str = "https://api.sendgrid.com/v3/mail/send";

/// Subject line of the completion email.
pub const COMPLETION_SUBJECT: &str = "Brand Completed";

/// HTML template for the completion email.
#[derive(Template)]
#[template(path = "email/sync_complete.html")]
struct SyncCompleteHtml<'a> {
    store: &'a str,
    final_offset: u64,
    finished_at: &'a str,
}

/// Plain text template for the completion email.
#[derive(Template)]
#[template(path = "email/sync_complete.txt")]
struct SyncCompleteText<'a> {
    store: &'a str,
    final_offset: u64,
    finished_at: &'a str,
}

/// Errors that can occur when sending the completion email.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// SendGrid rejected the message.
    #[error("SendGrid error: {status} - {body}")]
    Rejected { status: u16, body: String },

    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    /// Building the client failed.
    #[error("Client setup failed: {0}")]
    Setup(String),
}

/// Facts reported in the completion email.
#[derive(Debug, Clone)]
pub struct CompletionReport {
    pub store: String,
    /// Cursor at which the catalog came back empty.
    pub final_offset: Cursor,
    pub finished_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize)]
struct MailSend<'a> {
    personalizations: [Personalization<'a>; 1],
    from: Address<'a>,
    subject: &'a str,
    content: [Content; 2],
}

#[derive(Debug, Serialize)]
struct Personalization<'a> {
    to: [Address<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Address<'a> {
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct Content {
    #[serde(rename = "type")]
    kind: &'static str,
    value: String,
}

/// SendGrid backed completion notifier.
#[derive(Clone)]
pub struct SendGridNotifier {
    inner: Arc<SendGridNotifierInner>,
}

struct SendGridNotifierInner {
    client: reqwest::Client,
    send_url: String,
    from_address: String,
    to_address: String,
}

impl SendGridNotifier {
    /// Create a new notifier from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the API key is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &NotifyConfig) -> Result<Self, NotifyError> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_key.expose_secret()))
            .map_err(|e| NotifyError::Setup(format!("Invalid API key format: {e}")))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| NotifyError::Setup(e.to_string()))?;

        Ok(Self {
            inner: Arc::new(SendGridNotifierInner {
                client,
                send_url: SENDGRID_SEND_URL.to_string(),
                from_address: config.from_address.clone(),
                to_address: config.to_address.clone(),
            }),
        })
    }

    /// Send the "sync complete" email.
    ///
    /// # Errors
    ///
    /// Returns error if rendering fails or SendGrid does not accept the mail.
    #[instrument(skip(self, report), fields(final_offset = %report.final_offset))]
    pub async fn send_completion(&self, report: &CompletionReport) -> Result<(), NotifyError> {
        let body = self.build_message(report)?;

        let response = self
            .inner
            .client
            .post(&self.inner.send_url)
            .json(&body)
            .send()
            .await?;

        // SendGrid answers 202 Accepted on success
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!(to = %self.inner.to_address, subject = %COMPLETION_SUBJECT, "Email sent successfully");
        Ok(())
    }

    fn build_message<'a>(&'a self, report: &'a CompletionReport) -> Result<MailSend<'a>, NotifyError> {
        let finished_at = report.finished_at.to_rfc3339();
        let final_offset = report.final_offset.offset();

        let html = SyncCompleteHtml {
            store: &report.store,
            final_offset,
            finished_at: &finished_at,
        }
        .render()?;
        let text = SyncCompleteText {
            store: &report.store,
            final_offset,
            finished_at: &finished_at,
        }
        .render()?;

        Ok(MailSend {
            personalizations: [Personalization {
                to: [Address {
                    email: &self.inner.to_address,
                }],
            }],
            from: Address {
                email: &self.inner.from_address,
            },
            subject: COMPLETION_SUBJECT,
            // text/plain must precede text/html
            content: [
                Content {
                    kind: "text/plain",
                    value: text,
                },
                Content {
                    kind: "text/html",
                    value: html,
                },
            ],
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use chrono::TimeZone;
    use secrecy::SecretString;

    use super::*;

    fn notifier() -> SendGridNotifier {
        SendGridNotifier::new(&NotifyConfig {
            api_key: SecretString::from("SG.k3y.Zx8q"),
            from_address: "info@catalogiq.app".to_string(),
            to_address: "notify@catalogiq.app".to_string(),
        })
        .unwrap()
    }

    fn report() -> CompletionReport {
        CompletionReport {
            store: "acme.myshopify.com".to_string(),
            final_offset: Cursor::new(412),
            finished_at: chrono::Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_message_shape() {
        let notifier = notifier();
        let report = report();
        let message = notifier.build_message(&report).unwrap();
        let json = serde_json::to_value(&message).unwrap();

        assert_eq!(json["subject"], "Brand Completed");
        assert_eq!(json["from"]["email"], "info@catalogiq.app");
        assert_eq!(json["personalizations"][0]["to"][0]["email"], "notify@catalogiq.app");
        assert_eq!(json["content"][0]["type"], "text/plain");
        assert_eq!(json["content"][1]["type"], "text/html");
    }

    #[test]
    fn test_templates_render_report() {
        let notifier = notifier();
        let report = report();
        let message = notifier.build_message(&report).unwrap();

        let [text, html] = &message.content;
        assert!(text.value.contains("acme.myshopify.com"));
        assert!(text.value.contains("412"));
        assert!(html.value.contains("2026-10-16T09:30:00+00:00"));
    }
}
