//! ElevenLabs Conversational AI integration.
//!
//! Three concerns live here:
//!
//! - [`history`] — REST client for the conversation-history endpoints: find the
//!   most recent conversation for an agent and fetch its transcript.
//! - [`extract`] — second-pass analysis of a fetched transcript: filter the
//!   user's turns and ask the chat model for contact details and a structured
//!   summary.
//! - [`session`] — a live voice session over the ConvAI WebSocket protocol,
//!   with a pluggable [`audio::AudioInterface`] and console-friendly event
//!   callbacks. Teardown is an explicit end signal observed cooperatively by
//!   the session loop, not a signal handler mutating shared state.
//!
//! The conversational engine itself (speech handling, dialogue, synthesis) is
//! entirely the hosted service's; this crate only sequences calls to it.

pub mod audio;
pub mod config;
pub mod error;
pub mod extract;
pub mod history;
pub mod session;

pub use audio::{AudioInterface, SAMPLE_RATE};
pub use config::ConvaiConfig;
pub use error::ConvaiError;
pub use extract::{extract_contacts, user_transcript_text, ExtractionOutcome};
pub use history::{ConvaiClient, ConversationDetails};
pub use session::{Conversation, ConversationCallbacks, SessionEnder, SessionHandle};
