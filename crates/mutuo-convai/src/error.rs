use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvaiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("ConvAI API returned status {status}: {body}")]
    Api {
        status: u16,
        body: String,
    },

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("malformed ConvAI event: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("audio interface error: {0}")]
    Audio(String),

    #[error("session error: {0}")]
    Session(String),
}
