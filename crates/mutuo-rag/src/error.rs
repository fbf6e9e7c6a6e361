use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RagError {
    /// The index directory does not exist. Fatal precondition: the caller
    /// must run ingestion first.
    #[error("vector index not found at {0:?} — run mutuo-ingest first")]
    IndexNotFound(PathBuf),

    #[error("failed to read index file: {0}")]
    IndexRead(#[from] std::io::Error),

    #[error("failed to parse index file: {0}")]
    IndexParse(#[from] serde_json::Error),

    #[error("index is empty")]
    EmptyIndex,

    #[error("model call failed: {0}")]
    Llm(#[from] mutuo_llm::LlmError),
}
