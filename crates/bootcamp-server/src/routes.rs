//! HTTP router

use crate::error::ApiError;
use crate::handlers;
use crate::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root).fallback(method_not_allowed))
        .route("/health", get(handlers::health).fallback(method_not_allowed))
        .route(
            "/cache/:key",
            get(handlers::cache::get).fallback(method_not_allowed),
        )
        .route(
            "/cache/:key/:value",
            post(handlers::cache::set).fallback(method_not_allowed),
        )
        // One pattern for both methods: POST takes the note text, GET the id
        .route(
            "/note/:note",
            get(handlers::notes::get)
                .post(handlers::notes::create)
                .fallback(method_not_allowed),
        )
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn not_found() -> ApiError {
    ApiError::NotFound("Not Found")
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
