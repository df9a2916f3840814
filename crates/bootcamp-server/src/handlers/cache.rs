//! Cache handlers

use crate::error::ApiError;
use crate::extractors::{CacheStore, TextPath};
use axum::Json;
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Serialize)]
pub struct CacheEntryResponse {
    key: String,
    value: String,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    status: &'static str,
}

pub async fn get(
    CacheStore(store): CacheStore,
    mut params: TextPath,
) -> Result<Json<CacheEntryResponse>, ApiError> {
    let key = params.take("key");

    match store.get(&key).await {
        Ok(Some(value)) => Ok(Json(CacheEntryResponse { key, value })),
        Ok(None) => {
            debug!("Cache miss: {}", key);
            Err(ApiError::NotFound("Key not found"))
        }
        Err(e) => Err(ApiError::Store(e.to_string())),
    }
}

pub async fn set(
    CacheStore(store): CacheStore,
    mut params: TextPath,
) -> Result<Json<StatusResponse>, ApiError> {
    let key = params.take("key");
    let value = params.take("value");

    store
        .set(&key, &value)
        .await
        .map_err(|e| ApiError::Store(e.to_string()))?;

    debug!("Cache set: {}", key);
    Ok(Json(StatusResponse { status: "ok" }))
}
