//! Document chunking for ingestion.
//!
//! Plain-text sources are split into character-bounded chunks on paragraph
//! boundaries, keeping the character offset of each chunk so citations can
//! point back into the document. Page numbers only exist for paginated
//! sources, which this ingester does not produce; `page` is left unset.

/// Target maximum chunk size, in characters.
pub const MAX_CHUNK_CHARS: usize = 1000;

/// A chunk of text plus its character offset within the source document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentChunk {
    pub text: String,
    pub start_index: u32,
}

/// Splits a document into chunks of at most [`MAX_CHUNK_CHARS`] characters.
///
/// Paragraphs (blank-line separated) are packed greedily; a single paragraph
/// longer than the limit becomes its own oversized chunk rather than being
/// split mid-sentence. Blank documents yield no chunks.
pub fn chunk_document(text: &str) -> Vec<DocumentChunk> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_start: u32 = 0;
    let mut offset: u32 = 0;

    for paragraph in text.split("\n\n") {
        let trimmed = paragraph.trim();
        let paragraph_chars = paragraph.chars().count() as u32 + 2; // separator included
        if trimmed.is_empty() {
            offset += paragraph_chars;
            continue;
        }

        if !current.is_empty()
            && current.chars().count() + trimmed.chars().count() + 2 > MAX_CHUNK_CHARS
        {
            chunks.push(DocumentChunk {
                text: std::mem::take(&mut current),
                start_index: current_start,
            });
        }
        if current.is_empty() {
            current_start = offset;
        } else {
            current.push_str("\n\n");
        }
        current.push_str(trimmed);
        offset += paragraph_chars;
    }

    if !current.is_empty() {
        chunks.push(DocumentChunk {
            text: current,
            start_index: current_start,
        });
    }
    chunks
}
