//! Cache store extractor

use crate::error::ApiError;
use crate::storage::KeyValueStore;
use crate::AppState;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use std::sync::Arc;

/// The cache store, if it passed the startup liveness check.
///
/// Put it before any path extractor: an unavailable cache must answer 500
/// whatever the key or value looks like.
pub struct CacheStore(pub Arc<dyn KeyValueStore>);

#[async_trait]
impl FromRequestParts<AppState> for CacheStore {
    type Rejection = ApiError;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        state
            .cache
            .store()
            .cloned()
            .map(CacheStore)
            .ok_or(ApiError::CacheUnavailable)
    }
}
