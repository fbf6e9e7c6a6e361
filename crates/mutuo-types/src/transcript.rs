//! Conversation transcript types.
//!
//! A transcript is an ordered list of turns as returned by the ConvAI
//! conversation-detail endpoint. Turns are consumed read-only; this
//! application never produces or mutates them.

use serde::{Deserialize, Serialize};

/// The author of a transcript turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The human caller.
    User,
    /// The voice agent.
    Agent,
    /// Any role string this application does not recognize.
    #[serde(other)]
    Unknown,
}

impl Role {
    /// Returns `true` for turns authored by the human caller.
    pub fn is_user(self) -> bool {
        matches!(self, Role::User)
    }

    /// Returns the display label for this role, capitalized for rendering.
    pub fn label(self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Agent => "Agent",
            Role::Unknown => "Unknown",
        }
    }
}

/// One turn of a voice conversation.
///
/// Field names match the upstream API payload
/// (`{role, message, time_in_call_secs}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptTurn {
    /// Who spoke.
    pub role: Role,
    /// What was said (transcribed text).
    #[serde(default)]
    pub message: String,
    /// Offset of the turn from the start of the call, in seconds.
    #[serde(default)]
    pub time_in_call_secs: f64,
}

impl TranscriptTurn {
    pub fn new(role: Role, message: impl Into<String>, time_in_call_secs: f64) -> Self {
        Self {
            role,
            message: message.into(),
            time_in_call_secs,
        }
    }
}
