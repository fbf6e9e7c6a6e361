//! Mutuo server library logic.

pub mod api;
pub mod api_conversation;
pub mod api_qa;
pub mod config;
pub mod pages;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Extension, Json, Router,
};
use mutuo_convai::ConvaiClient;
use mutuo_llm::ChatClient;
use mutuo_rag::QaPipeline;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Maximum request body size (1 MiB). Transcripts are small; anything larger
/// is not a legitimate request.
const MAX_REQUEST_BODY_BYTES: usize = 1024 * 1024;

/// Application state shared across all request handlers.
///
/// Everything here is immutable after startup: the page never stores
/// per-session state on the server.
pub struct AppState {
    /// Question-answering pipeline over the loaded vector index.
    pub qa: QaPipeline,
    /// Conversation-history client for the voice agent.
    pub convai: ConvaiClient,
    /// Chat-model client for the extraction pass.
    pub llm: ChatClient,
    /// Agent id injected into the widget pages.
    pub agent_id: String,
}

/// Health check handler.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::index_page_handler))
        .route("/widget", get(pages::widget_page_handler))
        .route("/health", get(health))
        .route("/api/qa", post(api_qa::qa_handler))
        .route(
            "/api/conversation/latest",
            get(api_conversation::latest_conversation_handler),
        )
        .route("/api/extract", post(api_conversation::extract_handler))
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(Extension(Arc::new(state)))
}
