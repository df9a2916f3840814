//! API error type
//!
//! Every failure leaves the service as `{"detail": "..."}` with the matching
//! status code.

use axum::{
    extract::rejection::PathRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Redis not available")]
    CacheUnavailable,

    #[error("{0}")]
    NotFound(&'static str),

    /// Cache operation failed; the store's message is returned to the caller.
    #[error("{0}")]
    Store(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("Method Not Allowed")]
    MethodNotAllowed,

    /// Anything else. Logged, never echoed.
    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::CacheUnavailable | ApiError::Store(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::InvalidInput(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Internal(e) => error!("Request failed: {:#}", e),
            ApiError::Store(message) => error!("Cache store error: {}", message),
            _ => {}
        }

        let body = Json(ErrorBody {
            detail: self.to_string(),
        });
        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::CacheUnavailable.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::NotFound("Key not found").status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Store("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::InvalidInput("bad".into()).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::MethodNotAllowed.status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
    }

    #[test]
    fn test_internal_errors_are_not_echoed() {
        let err = ApiError::from(anyhow::anyhow!("password authentication failed"));
        assert_eq!(err.to_string(), "Internal Server Error");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_detail_messages() {
        assert_eq!(ApiError::CacheUnavailable.to_string(), "Redis not available");
        assert_eq!(ApiError::NotFound("Note not found").to_string(), "Note not found");
        assert_eq!(ApiError::Store("READONLY".into()).to_string(), "READONLY");
    }
}
