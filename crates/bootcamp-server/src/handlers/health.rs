//! Greeting and health handlers

use crate::AppState;
use axum::{extract::State, Json};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct GreetingResponse {
    message: &'static str,
}

pub async fn root() -> Json<GreetingResponse> {
    Json(GreetingResponse {
        message: "Hello from Bootcamp Day 3",
    })
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    cache: &'static str,
    database: &'static str,
}

/// Reports the startup cache availability and whether the database answers.
/// Does not re-check the cache.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let cache = if state.cache.is_available() {
        "available"
    } else {
        "unavailable"
    };

    let database = match state.db.ping().await {
        Ok(()) => "ok",
        Err(e) => {
            tracing::warn!("Database health check failed: {:#}", e);
            "error"
        }
    };

    Json(HealthResponse {
        status: "ok",
        cache,
        database,
    })
}
