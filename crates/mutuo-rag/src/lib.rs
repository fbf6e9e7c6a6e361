//! Retrieval-augmented question answering over a pre-built vector index.
//!
//! The index is a plain JSON file of embedded text chunks living in a local
//! directory; it must already exist when the application starts (built by the
//! `mutuo-ingest` binary). Answering a question embeds it, retrieves the
//! nearest chunks by cosine similarity, stuffs every retrieved chunk's full
//! text into a chat prompt, and returns the model's answer together with the
//! source references of the chunks used.

pub mod citation;
pub mod error;
pub mod index;
pub mod ingest;
pub mod qa;

pub use citation::format_citations;
pub use error::RagError;
pub use index::{IndexedChunk, VectorIndex};
pub use qa::{QaPipeline, QaResult};
