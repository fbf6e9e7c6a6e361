use serde::{Deserialize, Serialize};
use std::fmt;

/// Default ElevenLabs API endpoint.
pub const DEFAULT_API_BASE: &str = "https://api.elevenlabs.io";

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ConvaiConfig {
    /// Base URL of the API, without a trailing slash. Tests point this at a
    /// local mock server.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(skip_serializing)]
    #[serde(default)]
    pub api_key: String,
    /// The ConvAI agent to talk to.
    #[serde(default)]
    pub agent_id: String,
}

impl Default for ConvaiConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            api_key: String::new(),
            agent_id: String::new(),
        }
    }
}

impl fmt::Debug for ConvaiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConvaiConfig")
            .field("api_base", &self.api_base)
            .field("api_key", &"[REDACTED]")
            .field("agent_id", &self.agent_id)
            .finish()
    }
}

impl ConvaiConfig {
    pub fn new(
        api_key: impl Into<String>,
        agent_id: impl Into<String>,
    ) -> Self {
        Self {
            api_base: default_api_base(),
            api_key: api_key.into(),
            agent_id: agent_id.into(),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Whether requests should carry the `xi-api-key` header.
    pub fn requires_auth(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// WebSocket URL for a live conversation with the configured agent.
    ///
    /// Derived from `api_base` so tests can run against a local `ws://` mock.
    pub fn conversation_ws_url(&self) -> String {
        let ws_base = if let Some(rest) = self.api_base.strip_prefix("https://") {
            format!("wss://{}", rest)
        } else if let Some(rest) = self.api_base.strip_prefix("http://") {
            format!("ws://{}", rest)
        } else {
            self.api_base.clone()
        };
        format!("{}/v1/convai/conversation?agent_id={}", ws_base, self.agent_id)
    }
}
