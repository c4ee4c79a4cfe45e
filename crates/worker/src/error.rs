//! Unified error handling for the worker.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::catalogiq::CatalogError;
use crate::services::PublishError;

/// Application-level error type for the push endpoint.
///
/// Pub/Sub redelivers any push that is not answered with a 2xx, so the
/// status code decides whether a page is retried.
#[derive(Debug, Error)]
pub enum AppError {
    /// The push body or its offset message could not be decoded.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The catalog page could not be fetched.
    #[error("Catalog error: {0}")]
    Fetch(#[from] CatalogError),

    /// The next offset could not be queued.
    #[error("Publish error: {0}")]
    Publish(#[from] PublishError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log server errors with Sentry
        if matches!(self, Self::Fetch(_) | Self::Publish(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Sync invocation failed"
            );
        }

        let status = match &self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Fetch(_) | Self::Publish(_) => StatusCode::SERVICE_UNAVAILABLE,
        };

        // Don't expose upstream error bodies to the caller
        let message = match &self {
            Self::BadRequest(_) => self.to_string(),
            Self::Fetch(_) => "Catalog unavailable".to_string(),
            Self::Publish(_) => "Queue unavailable".to_string(),
        };

        (status, message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::BadRequest("missing message.data".to_string());
        assert_eq!(err.to_string(), "Bad request: missing message.data");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Fetch(CatalogError::Status {
                status: 500,
                body: String::new(),
            })),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            get_status(AppError::Publish(PublishError::Token(
                "metadata server unreachable".to_string()
            ))),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
