//! Error types for pearl-analyzer
//!
//! Maps pipeline errors onto HTTP status codes with a JSON error body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Conflict (409) - e.g., analysis already running
    #[error("Conflict: {0}")]
    Conflict(String),

    /// CSV export error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Pipeline error
    #[error(transparent)]
    Common(#[from] pearl_common::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        use pearl_common::Error as E;

        let (status, error_code, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg),
            ApiError::Csv(ref err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "CSV_ERROR",
                err.to_string(),
            ),
            ApiError::Common(ref err) => {
                let (status, code) = match err {
                    E::InvalidInput(_) => (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_INPUT"),
                    E::EmptyCorpus => (StatusCode::CONFLICT, "EMPTY_CORPUS"),
                    E::ExternalService(_) => (StatusCode::BAD_GATEWAY, "EXTERNAL_SERVICE_ERROR"),
                    E::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR"),
                    E::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
                };
                (status, code, err.to_string())
            }
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
pub type ApiResult<T> = Result<T, ApiError>;
