//! Transcript fetch and contact-extraction API handlers.
//!
//! The fetched transcript is returned to the page and held there; the
//! extraction endpoint takes it back as request state. The server keeps no
//! per-page session state, so extraction stays a pure function of its input.

use crate::{api::ApiError, AppState};
use axum::{extract::Extension, Json};
use mutuo_convai::{extract_contacts, ExtractionOutcome};
use mutuo_types::TranscriptTurn;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Informational message when the agent has no conversations yet.
const NO_CONVERSATION_MESSAGE: &str = "Nessuna conversazione trovata.";

/// Informational message when a transcript holds no user turns.
const NO_USER_MESSAGES_MESSAGE: &str =
    "Nessun messaggio utente trovato per l'analisi dei contatti.";

/// Response body for the latest-conversation fetch.
#[derive(Debug, Serialize, Deserialize)]
pub struct LatestConversationResponse {
    /// `None` when the agent has no conversations; see `message`.
    #[serde(rename = "conversationId")]
    pub conversation_id: Option<String>,
    #[serde(default)]
    pub transcript: Vec<TranscriptTurn>,
    /// Informational note for empty results. Not an error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Request body for contact extraction: the transcript the page fetched.
#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    pub transcript: Vec<TranscriptTurn>,
}

/// Response body for contact extraction.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExtractResponse {
    /// The model's raw labeled-field text, rendered verbatim by the page.
    /// `None` when the transcript had no user messages; see `message`.
    #[serde(rename = "contactInfo")]
    pub contact_info: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Handler for `GET /api/conversation/latest`.
///
/// Two one-shot upstream calls (list, then details). Upstream failure on
/// either is a 502 for this step only; an empty conversation list is a 200
/// with an informational message.
pub async fn latest_conversation_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<LatestConversationResponse>, ApiError> {
    match state.convai.latest_conversation().await? {
        Some(details) => {
            tracing::info!(
                conversation_id = %details.conversation_id,
                turns = details.transcript.len(),
                "fetched latest conversation"
            );
            Ok(Json(LatestConversationResponse {
                conversation_id: Some(details.conversation_id),
                transcript: details.transcript,
                message: None,
            }))
        }
        None => {
            tracing::info!("agent has no conversations yet");
            Ok(Json(LatestConversationResponse {
                conversation_id: None,
                transcript: Vec::new(),
                message: Some(NO_CONVERSATION_MESSAGE.to_string()),
            }))
        }
    }
}

/// Handler for `POST /api/extract`.
pub async fn extract_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<ExtractRequest>,
) -> Result<Json<ExtractResponse>, ApiError> {
    match extract_contacts(&state.llm, &payload.transcript).await? {
        ExtractionOutcome::Contacts(contact_info) => Ok(Json(ExtractResponse {
            contact_info: Some(contact_info),
            message: None,
        })),
        ExtractionOutcome::NoUserMessages => Ok(Json(ExtractResponse {
            contact_info: None,
            message: Some(NO_USER_MESSAGES_MESSAGE.to_string()),
        })),
    }
}
