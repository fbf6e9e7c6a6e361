//! Terminal voice agent — talk to the mortgage assistant from the shell.
//!
//! Connects the default microphone and speakers to a live ConvAI session.
//! Transcripts stream to stdout as the conversation progresses; Ctrl+C asks
//! the session to end and the conversation id is printed on exit.

mod audio;

use audio::DefaultAudioInterface;
use mutuo_convai::{ConvaiConfig, Conversation, ConversationCallbacks};
use tracing_subscriber::EnvFilter;

fn resolve_agent_id() -> Option<String> {
    if let Some(agent_id) = std::env::args()
        .nth(1)
        .filter(|value| !value.trim().is_empty())
    {
        return Some(agent_id);
    }

    std::env::var("MUTUO_AGENT_ID")
        .ok()
        .filter(|value| !value.trim().is_empty())
}

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let agent_id = resolve_agent_id()
        .expect("no agent id — pass it as the first argument or set MUTUO_AGENT_ID");

    // Public agents work without a key; private ones need it for the
    // xi-api-key handshake header.
    let api_key = std::env::var("ELEVENLABS_API_KEY").unwrap_or_default();
    let config = ConvaiConfig::new(api_key, agent_id);

    let callbacks = ConversationCallbacks::new()
        .on_agent_response(|text| println!("Agent: {}", text))
        .on_agent_response_correction(|original, corrected| {
            println!("Agent: {} -> {}", original, corrected)
        })
        .on_user_transcript(|text| println!("User: {}", text));

    let handle = Conversation::start(config, Box::new(DefaultAudioInterface::new()), callbacks)
        .await
        .expect("failed to start conversation");

    println!("Conversation started. Press Ctrl+C to end.");

    let ender = handle.ender();
    let signal_task = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ender.end();
        }
    });

    match handle.wait().await {
        Ok(Some(conversation_id)) => println!("Conversation ID: {}", conversation_id),
        Ok(None) => println!("Conversation ended before an id was assigned."),
        Err(e) => eprintln!("Conversation failed: {}", e),
    }

    signal_task.abort();
}
