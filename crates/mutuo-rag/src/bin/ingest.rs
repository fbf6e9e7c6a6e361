//! Index ingestion binary.
//!
//! Reads every `.txt`/`.md` file under a docs directory, chunks it, embeds the
//! chunks through the model API, and writes `index.json` into the index
//! directory. Usage:
//!
//! ```text
//! mutuo-ingest [docs_dir] [index_dir]
//! ```
//!
//! Defaults: `docs/` and `vectordb/`, overridable via `MUTUO_DOCS_DIR` and
//! `MUTUO_INDEX_DIR`. Requires `OPENAI_API_KEY` in the environment.

use mutuo_llm::{ChatClient, OpenAiConfig};
use mutuo_rag::ingest::chunk_document;
use mutuo_rag::{IndexedChunk, VectorIndex};
use mutuo_types::SourceRef;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Embedding batch size per API request.
const BATCH_SIZE: usize = 64;

fn resolve_dir(arg_index: usize, env_var: &str, default: &str) -> PathBuf {
    if let Some(path) = std::env::args().nth(arg_index).filter(|v| !v.trim().is_empty()) {
        return PathBuf::from(path);
    }
    if let Ok(path) = std::env::var(env_var) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }
    PathBuf::from(default)
}

/// Collects ingestable files (`.txt`, `.md`) directly under `docs_dir`,
/// sorted by name for a stable index.
fn collect_documents(docs_dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(docs_dir)? {
        let path = entry?.path();
        let extension = path.extension().and_then(|e| e.to_str());
        if path.is_file() && matches!(extension, Some("txt") | Some("md")) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let docs_dir = resolve_dir(1, "MUTUO_DOCS_DIR", "docs");
    let index_dir = resolve_dir(2, "MUTUO_INDEX_DIR", "vectordb");

    let api_key = std::env::var("OPENAI_API_KEY")
        .expect("OPENAI_API_KEY is not set — ingestion cannot embed without it");
    let llm = ChatClient::new(OpenAiConfig::new(api_key));

    let files = collect_documents(&docs_dir)
        .unwrap_or_else(|e| panic!("failed to read docs directory {:?}: {}", docs_dir, e));
    if files.is_empty() {
        tracing::warn!(path = %docs_dir.display(), "no .txt or .md documents found, nothing to ingest");
        return;
    }

    // Chunk everything first so embedding can run in fixed-size batches
    // across document boundaries.
    let mut texts: Vec<String> = Vec::new();
    let mut sources: Vec<SourceRef> = Vec::new();
    for file in &files {
        let contents = std::fs::read_to_string(file)
            .unwrap_or_else(|e| panic!("failed to read {:?}: {}", file, e));
        let chunks = chunk_document(&contents);
        tracing::info!(file = %file.display(), chunks = chunks.len(), "chunked document");
        for chunk in chunks {
            sources.push(
                SourceRef::new(file.display().to_string()).with_start_index(chunk.start_index),
            );
            texts.push(chunk.text);
        }
    }

    let mut embeddings: Vec<Vec<f32>> = Vec::with_capacity(texts.len());
    for batch in texts.chunks(BATCH_SIZE) {
        let vectors = llm
            .embed(batch)
            .await
            .expect("embedding request failed — check OPENAI_API_KEY and connectivity");
        embeddings.extend(vectors);
    }

    let chunks: Vec<IndexedChunk> = texts
        .into_iter()
        .zip(embeddings)
        .zip(sources)
        .map(|((text, embedding), source)| IndexedChunk {
            text,
            embedding,
            source,
        })
        .collect();

    let index = VectorIndex::from_chunks(chunks);
    let path = index
        .save(&index_dir)
        .unwrap_or_else(|e| panic!("failed to write index to {:?}: {}", index_dir, e));
    tracing::info!(path = %path.display(), chunks = index.len(), "index written");
}
