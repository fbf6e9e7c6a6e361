//! Client for an OpenAI-compatible model API.
//!
//! Covers the two endpoints this application needs: chat completions (answer
//! synthesis and transcript analysis) and embeddings (question/document
//! vectors). Calls are one-shot: a non-2xx status is surfaced as an error at
//! the call site and nothing is retried.
//!
//! The API base URL is configurable so tests can point the client at a local
//! mock server.

pub mod chat;
pub mod config;
pub mod embeddings;
pub mod error;

pub use chat::{ChatClient, ChatMessage};
pub use config::OpenAiConfig;
pub use error::LlmError;
