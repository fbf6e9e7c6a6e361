//! Source reference metadata carried by retrieval results.

use serde::{Deserialize, Serialize};

/// Where a retrieved chunk came from.
///
/// `page` and `start_index` are optional because plain-text sources have no
/// page numbering and some ingestion paths do not record offsets. A value of
/// `0` is treated as "not renderable" by the citation formatter, matching the
/// upstream metadata convention where zero means unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    /// Source document path as recorded at ingestion time. May contain
    /// Windows-style backslashes; display code normalizes them.
    pub source: String,
    /// 1-based page number within the source, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Character offset of the chunk within the source, if recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_index: Option<u32>,
}

impl SourceRef {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            page: None,
            start_index: None,
        }
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_start_index(mut self, start_index: u32) -> Self {
        self.start_index = Some(start_index);
        self
    }
}
