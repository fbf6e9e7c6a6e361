use serde::{Deserialize, Serialize};
use std::fmt;

/// Default OpenAI API endpoint.
pub const DEFAULT_API_BASE: &str = "https://api.openai.com";

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_chat_model() -> String {
    "gpt-4o".to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_temperature() -> f32 {
    0.1
}

#[derive(Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// Base URL of the API, without a trailing slash.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(skip_serializing)]
    #[serde(default)]
    pub api_key: String,
    /// Model used for chat completions. Default: "gpt-4o".
    #[serde(default = "default_chat_model")]
    pub chat_model: String,
    /// Model used for embeddings. Default: "text-embedding-3-small".
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
    /// Sampling temperature for chat completions. Default: 0.1.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            api_key: String::new(),
            chat_model: default_chat_model(),
            embedding_model: default_embedding_model(),
            temperature: default_temperature(),
        }
    }
}

impl fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_base", &self.api_base)
            .field("api_key", &"[REDACTED]")
            .field("chat_model", &self.chat_model)
            .field("embedding_model", &self.embedding_model)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }
}
