//! HTTP route handlers for the worker.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! POST /                       - Pub/Sub push: process one catalog page
//! ```

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;
use crate::sync::{CatalogSource, CompletionNotifier, OffsetPublisher, ProductStore};

pub mod push;

/// Build the worker router.
pub fn routes<C, S, P, N>(state: AppState<C, S, P, N>) -> Router
where
    C: CatalogSource + 'static,
    S: ProductStore + 'static,
    P: OffsetPublisher + 'static,
    N: CompletionNotifier + 'static,
{
    Router::new()
        .route("/health", get(health))
        .route("/", post(push::handle_push::<C, S, P, N>))
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}
