//! Pub/Sub push endpoint.
//!
//! Each push carries one offset message. The handler runs one invocation
//! of the sync and answers 2xx only when Pub/Sub should consider the
//! message handled.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use base64::{Engine, engine::general_purpose::STANDARD};
use catalog_sync_core::Cursor;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::state::AppState;
use crate::sync::{
    CatalogSource, CompletionNotifier, DriverAction, OffsetPublisher, ProductStore,
};

/// Push request body sent by a Pub/Sub push subscription.
#[derive(Debug, Deserialize)]
pub struct PushEnvelope {
    pub message: PushMessage,
    #[serde(default)]
    pub subscription: Option<String>,
}

/// The message inside a push request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushMessage {
    /// Base64 encoded `{"offset": "<n>"}`.
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub message_id: Option<String>,
}

impl PushEnvelope {
    /// Decode the cursor carried by this push.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` if the data is absent, not base64, or
    /// not an offset message.
    pub fn cursor(&self) -> Result<Cursor, AppError> {
        let data = self
            .message
            .data
            .as_deref()
            .ok_or_else(|| AppError::BadRequest("missing message.data".to_string()))?;

        let bytes = STANDARD
            .decode(data)
            .map_err(|e| AppError::BadRequest(format!("message.data is not base64: {e}")))?;

        Cursor::from_message_bytes(&bytes).map_err(|e| AppError::BadRequest(e.to_string()))
    }
}

/// Response body describing what the invocation did.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum InvocationSummary {
    Advanced {
        offset: u64,
        next: u64,
        created: usize,
        skipped: usize,
        media_failures: usize,
    },
    Finished {
        offset: u64,
        notified: bool,
    },
}

/// `POST /` - run one invocation for the pushed offset.
///
/// A fetch failure or a failed publish answers 503 so Pub/Sub redelivers
/// the same offset.
///
/// # Errors
///
/// Returns `AppError` for malformed pushes and for invocations that must be
/// retried.
#[tracing::instrument(
    skip_all,
    fields(message_id = tracing::field::Empty, offset = tracing::field::Empty)
)]
pub async fn handle_push<C, S, P, N>(
    State(state): State<AppState<C, S, P, N>>,
    payload: Result<Json<PushEnvelope>, JsonRejection>,
) -> Result<Json<InvocationSummary>, AppError>
where
    C: CatalogSource,
    S: ProductStore,
    P: OffsetPublisher,
    N: CompletionNotifier,
{
    let Json(envelope) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let span = tracing::Span::current();
    if let Some(id) = &envelope.message.message_id {
        span.record("message_id", id.as_str());
    }

    let cursor = envelope.cursor()?;
    span.record("offset", cursor.offset());

    let summary = match state.engine().run_invocation(cursor).await? {
        DriverAction::Advanced { next, report } => InvocationSummary::Advanced {
            offset: cursor.offset(),
            next: next.offset(),
            created: report.created(),
            skipped: report.skipped(),
            media_failures: report.media_failures(),
        },
        DriverAction::Finished { at, notified } => InvocationSummary::Finished {
            offset: at.offset(),
            notified,
        },
        DriverAction::Stalled { error, .. } => return Err(AppError::Fetch(error)),
    };

    Ok(Json(summary))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn envelope(data: Option<&str>) -> PushEnvelope {
        serde_json::from_value(json!({
            "message": {
                "data": data,
                "messageId": "2070443601311540",
                "publishTime": "2026-10-16T09:30:00.000Z"
            },
            "subscription": "projects/catalogiq/subscriptions/offsets-push"
        }))
        .unwrap()
    }

    #[test]
    fn test_cursor_from_push() {
        let data = STANDARD.encode(br#"{"offset":"17"}"#);
        let envelope = envelope(Some(&data));
        assert_eq!(envelope.cursor().unwrap(), Cursor::new(17));
        assert_eq!(
            envelope.message.message_id.as_deref(),
            Some("2070443601311540")
        );
    }

    #[test]
    fn test_missing_data_is_bad_request() {
        assert!(matches!(
            envelope(None).cursor(),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_non_base64_is_bad_request() {
        assert!(matches!(
            envelope(Some("not base64!")).cursor(),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_bad_offset_is_bad_request() {
        let data = STANDARD.encode(br#"{"offset":"twelve"}"#);
        assert!(matches!(
            envelope(Some(&data)).cursor(),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_summary_shape() {
        let summary = InvocationSummary::Finished {
            offset: 40,
            notified: true,
        };
        assert_eq!(
            serde_json::to_value(&summary).unwrap(),
            json!({"action": "finished", "offset": 40, "notified": true})
        );
    }
}
