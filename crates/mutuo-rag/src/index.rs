//! On-disk vector index: load, save, and brute-force nearest-neighbor search.
//!
//! The index is a single `index.json` file inside the index directory, holding
//! every embedded chunk with its text, vector, and source metadata. Corpora
//! here are document sets in the hundreds of chunks, so an exhaustive cosine
//! scan is the right tool; there is no approximate-index structure to persist
//! or invalidate.

use crate::error::RagError;
use mutuo_types::SourceRef;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name of the index inside the index directory.
pub const INDEX_FILE: &str = "index.json";

/// One embedded chunk of a source document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexedChunk {
    /// Chunk body text, stuffed verbatim into QA prompts.
    pub text: String,
    /// Model embedding vector.
    pub embedding: Vec<f32>,
    /// Where the chunk came from.
    #[serde(flatten)]
    pub source: SourceRef,
}

/// An in-memory vector index loaded from disk.
#[derive(Debug, Clone)]
pub struct VectorIndex {
    chunks: Vec<IndexedChunk>,
}

impl VectorIndex {
    /// Builds an index from already-embedded chunks (ingestion and tests).
    pub fn from_chunks(chunks: Vec<IndexedChunk>) -> Self {
        Self { chunks }
    }

    /// Loads the index from `dir`.
    ///
    /// A missing directory is [`RagError::IndexNotFound`]; the caller treats
    /// it as a fatal precondition and halts before serving anything.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, RagError> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(RagError::IndexNotFound(dir.to_path_buf()));
        }
        let contents = std::fs::read_to_string(dir.join(INDEX_FILE))?;
        let chunks: Vec<IndexedChunk> = serde_json::from_str(&contents)?;
        tracing::info!(path = %dir.display(), chunks = chunks.len(), "vector index loaded");
        Ok(Self { chunks })
    }

    /// Writes the index into `dir`, creating the directory if needed.
    pub fn save(&self, dir: impl AsRef<Path>) -> Result<PathBuf, RagError> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let path = dir.join(INDEX_FILE);
        std::fs::write(&path, serde_json::to_vec(&self.chunks)?)?;
        Ok(path)
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Returns the `k` chunks nearest to `query` by cosine similarity,
    /// most similar first.
    pub fn search(&self, query: &[f32], k: usize) -> Vec<&IndexedChunk> {
        let mut scored: Vec<(f32, &IndexedChunk)> = self
            .chunks
            .iter()
            .map(|chunk| (cosine_similarity(query, &chunk.embedding), chunk))
            .collect();
        // Descending by similarity; ties keep index order for determinism.
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.into_iter().take(k).map(|(_, chunk)| chunk).collect()
    }
}

/// Calculates the cosine similarity between two vectors.
///
/// Mismatched lengths and zero vectors score 0.0 rather than erroring; a
/// degenerate chunk should rank last, not break retrieval.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot_product / (norm_a * norm_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(text: &str, embedding: Vec<f32>) -> IndexedChunk {
        IndexedChunk {
            text: text.to_string(),
            embedding,
            source: SourceRef::new(format!("docs/{}.txt", text)),
        }
    }

    #[test]
    fn cosine_similarity_basics() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]), 1.0);
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]), -1.0);
        // Degenerate inputs score zero instead of erroring.
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn search_ranks_by_similarity() {
        let index = VectorIndex::from_chunks(vec![
            chunk("ortogonale", vec![0.0, 1.0]),
            chunk("vicino", vec![0.9, 0.1]),
            chunk("esatto", vec![1.0, 0.0]),
        ]);

        let results = index.search(&[1.0, 0.0], 2);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].text, "esatto");
        assert_eq!(results[1].text, "vicino");
    }

    #[test]
    fn search_caps_at_index_size() {
        let index = VectorIndex::from_chunks(vec![chunk("solo", vec![1.0])]);
        assert_eq!(index.search(&[1.0], 4).len(), 1);
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let index = VectorIndex::from_chunks(vec![IndexedChunk {
            text: "contenuto".to_string(),
            embedding: vec![0.5, 0.5],
            source: SourceRef::new("docs/guida.pdf").with_page(3).with_start_index(120),
        }]);
        index.save(dir.path()).unwrap();

        let loaded = VectorIndex::load(dir.path()).unwrap();
        assert_eq!(loaded.len(), 1);
        let results = loaded.search(&[0.5, 0.5], 1);
        assert_eq!(results[0].source.page, Some(3));
        assert_eq!(results[0].source.start_index, Some(120));
    }

    #[test]
    fn missing_directory_is_index_not_found() {
        let err = VectorIndex::load("/nonexistent/vectordb").unwrap_err();
        assert!(matches!(err, RagError::IndexNotFound(_)));
    }
}
