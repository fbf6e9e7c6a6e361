//! Shared API error type for the Mutuo server.

use axum::{
    extract::Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// API error type mapping to HTTP status codes.
///
/// Upstream failures (the model API or the ConvAI API answering non-2xx) map
/// to 502: the step degrades, the page stays up. Empty-result conditions are
/// never errors — handlers encode them as informational response fields.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid input: {0}")]
    BadRequest(String),
    #[error("upstream call failed: {0}")]
    UpstreamFailed(String),
    #[error("internal server error: {0}")]
    InternalServerError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::UpstreamFailed(msg) => (StatusCode::BAD_GATEWAY, msg),
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

impl From<mutuo_convai::ConvaiError> for ApiError {
    fn from(e: mutuo_convai::ConvaiError) -> Self {
        ApiError::UpstreamFailed(e.to_string())
    }
}

impl From<mutuo_rag::RagError> for ApiError {
    fn from(e: mutuo_rag::RagError) -> Self {
        ApiError::UpstreamFailed(e.to_string())
    }
}
