//! Error types for tsr-sc
//!
//! **[SC-ERR-010]** Error taxonomy and HTTP mapping
//!
//! Per-row enrichment failure is deliberately not represented here: it is
//! swallowed at the row level by the reader and never surfaces as a
//! top-level error.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Search coordination error
#[derive(Debug, Error)]
pub enum SearchError {
    /// Bad caller arguments, rejected before any write (400)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Unknown session id on read (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// No webhook endpoint resolved; session marked failed (502)
    #[error("No webhook endpoint configured for '{0}'")]
    ConfigurationMissing(String),

    /// Transport error or non-success webhook response; session marked failed (502)
    #[error("Webhook dispatch failed: {0}")]
    DispatchFailed(String),

    /// Durable-store failure (500)
    #[error("Storage error: {0}")]
    Storage(#[from] tsr_common::Error),
}

impl IntoResponse for SearchError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            SearchError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, "INVALID_INPUT", msg),
            SearchError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            SearchError::ConfigurationMissing(ref name) => (
                StatusCode::BAD_GATEWAY,
                "CONFIGURATION_MISSING",
                format!("No webhook endpoint configured for '{}'", name),
            ),
            SearchError::DispatchFailed(msg) => (StatusCode::BAD_GATEWAY, "DISPATCH_FAILED", msg),
            SearchError::Storage(ref err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "STORAGE_ERROR",
                err.to_string(),
            ),
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, SearchError>;
