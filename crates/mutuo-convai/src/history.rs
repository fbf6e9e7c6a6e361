//! Conversation-history REST client.
//!
//! Two one-shot GETs against the ConvAI API: list the most recent conversation
//! for an agent (`page_size=1`), then fetch that conversation's details to get
//! the transcript. No retries; a non-2xx status is surfaced per call and an
//! empty conversation list is an informational `None`, not an error.

use crate::config::ConvaiConfig;
use crate::error::ConvaiError;
use mutuo_types::TranscriptTurn;
use serde::Deserialize;

/// Header carrying the ElevenLabs API key.
const API_KEY_HEADER: &str = "xi-api-key";

#[derive(Debug, Deserialize)]
struct ConversationList {
    #[serde(default)]
    conversations: Vec<ConversationSummary>,
}

#[derive(Debug, Deserialize)]
struct ConversationSummary {
    conversation_id: String,
}

/// Details of one conversation, as returned by the detail endpoint.
///
/// The upstream object carries many more fields (analysis, metadata, audio
/// availability); only what this application reads is modeled.
#[derive(Debug, Clone, Deserialize)]
pub struct ConversationDetails {
    pub conversation_id: String,
    #[serde(default)]
    pub transcript: Vec<TranscriptTurn>,
}

/// Client for the conversation-history endpoints.
#[derive(Debug, Clone)]
pub struct ConvaiClient {
    http: reqwest::Client,
    config: ConvaiConfig,
}

impl ConvaiClient {
    pub fn new(config: ConvaiConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Returns the id of the most recent conversation for the configured
    /// agent, or `None` when the agent has no conversations yet.
    pub async fn latest_conversation_id(&self) -> Result<Option<String>, ConvaiError> {
        let url = format!("{}/v1/convai/conversations", self.config.api_base);
        let response = self
            .http
            .get(&url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .query(&[
                ("agent_id", self.config.agent_id.as_str()),
                ("page_size", "1"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ConvaiError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let list: ConversationList = response.json().await?;
        Ok(list
            .conversations
            .into_iter()
            .next()
            .map(|summary| summary.conversation_id))
    }

    /// Fetches the full details (including the transcript) of a conversation.
    pub async fn conversation_details(
        &self,
        conversation_id: &str,
    ) -> Result<ConversationDetails, ConvaiError> {
        let url = format!(
            "{}/v1/convai/conversations/{}",
            self.config.api_base, conversation_id
        );
        let response = self
            .http
            .get(&url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ConvaiError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }

    /// Convenience composition: the most recent conversation's details, or
    /// `None` when there is no conversation to fetch.
    pub async fn latest_conversation(&self) -> Result<Option<ConversationDetails>, ConvaiError> {
        match self.latest_conversation_id().await? {
            Some(id) => Ok(Some(self.conversation_details(&id).await?)),
            None => Ok(None),
        }
    }
}
