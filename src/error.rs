//! Error types
//!
//! Each layer gets its own enum; [`ApiError`] converts into an HTTP
//! response so handlers can use `?` directly.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;

/// Failure of the underlying tick wait
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("tick source failed: {0}")]
pub struct TickError(pub String);

/// Errors surfaced by the timer host
#[derive(Debug, Error)]
pub enum TimerError {
    /// The stopwatch task has already exited (host torn down)
    #[error("timer task is no longer running")]
    HostGone,
}

/// Errors surfaced by the vitals store
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("vital entry {0} not found")]
    NotFound(u64),

    #[error("store lock poisoned")]
    Poisoned,
}

/// Errors returned from HTTP handlers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Timer(#[from] TimerError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Store(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Timer(TimerError::HostGone) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Store(StoreError::Poisoned) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        });

        (status, Json(body)).into_response()
    }
}
