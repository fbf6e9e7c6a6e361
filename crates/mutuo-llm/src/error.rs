use thiserror::Error;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("model API returned status {status}: {body}")]
    Api {
        status: u16,
        body: String,
    },

    #[error("model API response is missing {0}")]
    MalformedResponse(&'static str),
}
