//! Application state shared across handlers.

use std::sync::Arc;

use crate::sync::SyncEngine;

/// Application state shared across all handlers.
///
/// Generic over the engine's collaborators so the router can be exercised
/// against in-memory services.
pub struct AppState<C, S, P, N> {
    inner: Arc<AppStateInner<C, S, P, N>>,
}

struct AppStateInner<C, S, P, N> {
    engine: SyncEngine<C, S, P, N>,
}

/// State wired to the real services.
pub type LiveAppState = AppState<
    crate::catalogiq::CatalogClient,
    crate::shopify::AdminClient,
    crate::services::PubSubPublisher,
    crate::services::SendGridNotifier,
>;

impl<C, S, P, N> AppState<C, S, P, N> {
    #[must_use]
    pub fn new(engine: SyncEngine<C, S, P, N>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { engine }),
        }
    }

    #[must_use]
    pub fn engine(&self) -> &SyncEngine<C, S, P, N> {
        &self.inner.engine
    }
}

impl<C, S, P, N> Clone for AppState<C, S, P, N> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
