//! Live conversation session over the ConvAI WebSocket protocol.
//!
//! The session task multiplexes three inputs with `tokio::select!`: frames
//! from the socket, microphone chunks from the audio interface, and an
//! explicit end signal. Ending a session is cooperative — callers hold a
//! [`SessionHandle`] and call [`end`](SessionHandle::end); nothing mutates
//! session state from a signal handler.
//!
//! Transport failures are returned to the caller as-is; there is no
//! reconnection logic.

use crate::audio::{self, AudioInterface};
use crate::config::ConvaiConfig;
use crate::error::ConvaiError;
use futures_util::{Sink, SinkExt, StreamExt};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::Message;

// ---------------------------------------------------------------------------
// Protocol events
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ServerEvent {
    ConversationInitiationMetadata {
        conversation_initiation_metadata_event: InitiationMetadata,
    },
    Audio {
        audio_event: AudioEvent,
    },
    AgentResponse {
        agent_response_event: AgentResponseEvent,
    },
    AgentResponseCorrection {
        agent_response_correction_event: AgentResponseCorrectionEvent,
    },
    UserTranscript {
        user_transcription_event: UserTranscriptEvent,
    },
    Ping {
        ping_event: PingEvent,
    },
    Interruption,
    /// Any event type this client does not handle (vad_score, internal
    /// tentative responses, ...). Ignored.
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct InitiationMetadata {
    conversation_id: String,
}

#[derive(Debug, Deserialize)]
struct AudioEvent {
    audio_base_64: String,
}

#[derive(Debug, Deserialize)]
struct AgentResponseEvent {
    agent_response: String,
}

#[derive(Debug, Deserialize)]
struct AgentResponseCorrectionEvent {
    original_agent_response: String,
    corrected_agent_response: String,
}

#[derive(Debug, Deserialize)]
struct UserTranscriptEvent {
    user_transcript: String,
}

#[derive(Debug, Deserialize)]
struct PingEvent {
    event_id: u64,
    #[serde(default)]
    ping_ms: Option<u64>,
}

// ---------------------------------------------------------------------------
// Callbacks
// ---------------------------------------------------------------------------

type TextCallback = Box<dyn Fn(&str) + Send + Sync>;
type CorrectionCallback = Box<dyn Fn(&str, &str) + Send + Sync>;
type LatencyCallback = Box<dyn Fn(u64) + Send + Sync>;

/// Observer hooks for session events. Every slot is optional.
#[derive(Default)]
pub struct ConversationCallbacks {
    agent_response: Option<TextCallback>,
    agent_response_correction: Option<CorrectionCallback>,
    user_transcript: Option<TextCallback>,
    latency: Option<LatencyCallback>,
}

impl ConversationCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called with each finalized agent response.
    pub fn on_agent_response(mut self, f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.agent_response = Some(Box::new(f));
        self
    }

    /// Called when the agent revises an earlier response (original, corrected).
    pub fn on_agent_response_correction(
        mut self,
        f: impl Fn(&str, &str) + Send + Sync + 'static,
    ) -> Self {
        self.agent_response_correction = Some(Box::new(f));
        self
    }

    /// Called with each transcribed user utterance.
    pub fn on_user_transcript(mut self, f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.user_transcript = Some(Box::new(f));
        self
    }

    /// Called with the round-trip latency reported by ping events, in ms.
    pub fn on_latency(mut self, f: impl Fn(u64) + Send + Sync + 'static) -> Self {
        self.latency = Some(Box::new(f));
        self
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Entry point for starting a live conversation.
pub struct Conversation;

/// Handle to a running session.
///
/// Dropping the handle (and every [`SessionEnder`] cloned from it) without
/// calling [`wait`](Self::wait) ends the session: the loop observes the
/// closed end channel and performs the same orderly socket close as an
/// explicit [`end`](Self::end).
pub struct SessionHandle {
    end_tx: watch::Sender<bool>,
    task: JoinHandle<Result<Option<String>, ConvaiError>>,
}

/// Clonable hook for ending a session from another task, e.g. a signal
/// handler running alongside [`SessionHandle::wait`].
#[derive(Clone)]
pub struct SessionEnder {
    end_tx: watch::Sender<bool>,
}

impl SessionEnder {
    /// Requests an orderly end of the session. Idempotent.
    pub fn end(&self) {
        let _ = self.end_tx.send(true);
    }
}

impl SessionHandle {
    /// Requests an orderly end of the session. Idempotent.
    pub fn end(&self) {
        let _ = self.end_tx.send(true);
    }

    /// Detachable ender that outlives the handle.
    pub fn ender(&self) -> SessionEnder {
        SessionEnder {
            end_tx: self.end_tx.clone(),
        }
    }

    /// Waits for the session to finish and returns the conversation id
    /// reported by the initiation metadata, if any was received.
    pub async fn wait(self) -> Result<Option<String>, ConvaiError> {
        let SessionHandle { end_tx, task } = self;
        let result = task
            .await
            .map_err(|e| ConvaiError::Session(format!("session task failed: {}", e)))?;
        // Keep the end sender alive until the task has finished so the loop
        // never observes a dropped channel mid-session.
        drop(end_tx);
        result
    }
}

impl Conversation {
    /// Connects to the agent and starts the session task.
    ///
    /// The audio interface's capture side is started before the task spawns;
    /// its chunks flow into `user_audio_chunk` messages, and agent `audio`
    /// events flow back into playback.
    pub async fn start(
        config: ConvaiConfig,
        mut audio_interface: Box<dyn AudioInterface>,
        callbacks: ConversationCallbacks,
    ) -> Result<SessionHandle, ConvaiError> {
        let url = config.conversation_ws_url();
        let mut request = url
            .into_client_request()
            .map_err(ConvaiError::WebSocket)?;
        if config.requires_auth() {
            let value = HeaderValue::from_str(&config.api_key)
                .map_err(|_| ConvaiError::Session("API key is not a valid header value".into()))?;
            request.headers_mut().insert("xi-api-key", value);
        }

        let (socket, _response) = tokio_tungstenite::connect_async(request).await?;
        tracing::info!(agent_id = %config.agent_id, "conversation socket connected");

        let (mic_tx, mic_rx) = mpsc::unbounded_channel();
        audio_interface.start(mic_tx)?;

        let (end_tx, end_rx) = watch::channel(false);
        let task = tokio::spawn(run_session(socket, audio_interface, callbacks, mic_rx, end_rx));

        Ok(SessionHandle { end_tx, task })
    }
}

async fn run_session(
    socket: tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    >,
    mut audio_interface: Box<dyn AudioInterface>,
    callbacks: ConversationCallbacks,
    mut mic_rx: mpsc::UnboundedReceiver<Vec<i16>>,
    mut end_rx: watch::Receiver<bool>,
) -> Result<Option<String>, ConvaiError> {
    let (mut sink, mut stream) = socket.split();
    let mut conversation_id: Option<String> = None;
    let mut mic_open = true;

    loop {
        tokio::select! {
            changed = end_rx.changed() => {
                // An explicit end request, or every handle is gone. Either
                // way, close the socket in an orderly fashion.
                if changed.is_err() || *end_rx.borrow() {
                    tracing::info!("session end requested, closing socket");
                    let _ = sink.send(Message::Close(None)).await;
                    break;
                }
            }
            chunk = mic_rx.recv(), if mic_open => {
                match chunk {
                    Some(pcm) => {
                        let message = json!({
                            "user_audio_chunk": audio::pcm_to_base64(&pcm),
                        });
                        sink.send(Message::text(message.to_string())).await?;
                    }
                    None => {
                        // Capture stopped; keep serving socket events.
                        mic_open = false;
                    }
                }
            }
            frame = stream.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        handle_event(
                            &text,
                            &mut sink,
                            &mut audio_interface,
                            &callbacks,
                            &mut conversation_id,
                        )
                        .await?;
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        tracing::info!("conversation socket closed by server");
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        audio_interface.stop();
                        return Err(e.into());
                    }
                }
            }
        }
    }

    audio_interface.stop();
    Ok(conversation_id)
}

async fn handle_event(
    text: &str,
    sink: &mut (impl Sink<Message, Error = tokio_tungstenite::tungstenite::Error> + Unpin),
    audio_interface: &mut Box<dyn AudioInterface>,
    callbacks: &ConversationCallbacks,
    conversation_id: &mut Option<String>,
) -> Result<(), ConvaiError> {
    let event: ServerEvent = serde_json::from_str(text)?;
    match event {
        ServerEvent::ConversationInitiationMetadata {
            conversation_initiation_metadata_event: metadata,
        } => {
            tracing::info!(conversation_id = %metadata.conversation_id, "session initiated");
            *conversation_id = Some(metadata.conversation_id);
        }
        ServerEvent::Audio { audio_event } => {
            let pcm = audio::base64_to_pcm(&audio_event.audio_base_64)?;
            audio_interface.play(&pcm);
        }
        ServerEvent::AgentResponse {
            agent_response_event,
        } => {
            if let Some(cb) = &callbacks.agent_response {
                cb(agent_response_event.agent_response.trim());
            }
        }
        ServerEvent::AgentResponseCorrection {
            agent_response_correction_event: correction,
        } => {
            if let Some(cb) = &callbacks.agent_response_correction {
                cb(
                    correction.original_agent_response.trim(),
                    correction.corrected_agent_response.trim(),
                );
            }
        }
        ServerEvent::UserTranscript {
            user_transcription_event,
        } => {
            if let Some(cb) = &callbacks.user_transcript {
                cb(user_transcription_event.user_transcript.trim());
            }
        }
        ServerEvent::Ping { ping_event } => {
            let pong = json!({"type": "pong", "event_id": ping_event.event_id});
            sink.send(Message::text(pong.to_string())).await?;
            if let (Some(cb), Some(ms)) = (&callbacks.latency, ping_event.ping_ms) {
                cb(ms);
            }
        }
        ServerEvent::Interruption => {
            audio_interface.stop_playback();
        }
        ServerEvent::Other => {}
    }
    Ok(())
}
