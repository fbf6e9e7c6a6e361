//! Shared types for the Mutuo assistant.
//!
//! This crate provides the domain types used across the Mutuo crates:
//! conversation transcripts produced by the hosted voice agent, and source
//! references carried by retrieval results for citation display.
//!
//! No crate in the workspace depends on anything *except* `mutuo-types` for
//! cross-cutting type definitions. This keeps the dependency graph clean and
//! prevents circular dependencies.

pub mod citation;
pub mod transcript;

pub use citation::SourceRef;
pub use transcript::{Role, TranscriptTurn};
