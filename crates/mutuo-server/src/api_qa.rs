//! Question-answering API handler.

use crate::{api::ApiError, AppState};
use axum::{extract::Extension, Json};
use mutuo_rag::format_citations;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Request body for a question.
#[derive(Debug, Deserialize)]
pub struct QaRequest {
    pub question: String,
}

/// Response body for an answered question.
#[derive(Debug, Serialize, Deserialize)]
pub struct QaResponse {
    pub question: String,
    pub answer: String,
    /// Display lines, one per source document. Empty when no sources were
    /// retrieved.
    pub sources: Vec<String>,
}

/// Handler for `POST /api/qa`.
pub async fn qa_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<QaRequest>,
) -> Result<Json<QaResponse>, ApiError> {
    let question = payload.question.trim().to_string();
    if question.is_empty() {
        return Err(ApiError::BadRequest("question must not be empty".into()));
    }

    tracing::info!(question = %question, "answering question");
    let result = state.qa.answer(&question).await?;

    Ok(Json(QaResponse {
        question,
        answer: result.answer,
        sources: format_citations(&result.sources),
    }))
}
