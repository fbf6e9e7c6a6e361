//! The retrieval-QA pipeline: embed, retrieve, stuff, synthesize.

use crate::error::RagError;
use crate::index::VectorIndex;
use mutuo_llm::{ChatClient, ChatMessage};
use mutuo_types::SourceRef;

/// How many chunks are retrieved and stuffed into the prompt.
const DEFAULT_TOP_K: usize = 4;

/// System instruction for answer synthesis. The retrieved chunks are appended
/// beneath it in full ("stuff" strategy — no summarization or map/reduce).
const QA_SYSTEM_PROMPT: &str = "\
Sei un assistente esperto di mutui e finanziamenti. Rispondi alla domanda \
dell'utente usando esclusivamente le informazioni contenute nei documenti \
forniti. Se i documenti non contengono la risposta, dillo chiaramente.";

/// An answer and the sources used to produce it.
#[derive(Debug, Clone)]
pub struct QaResult {
    pub answer: String,
    pub sources: Vec<SourceRef>,
}

/// Question-answering pipeline over a loaded index.
#[derive(Debug, Clone)]
pub struct QaPipeline {
    index: VectorIndex,
    llm: ChatClient,
    top_k: usize,
}

impl QaPipeline {
    pub fn new(index: VectorIndex, llm: ChatClient) -> Self {
        Self {
            index,
            llm,
            top_k: DEFAULT_TOP_K,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Answers a free-text question.
    ///
    /// Two upstream calls in sequence: one embedding request for the question,
    /// one chat completion with the retrieved chunks stuffed into the prompt.
    /// Either failing fails the whole answer; there are no retries.
    pub async fn answer(&self, question: &str) -> Result<QaResult, RagError> {
        if self.index.is_empty() {
            return Err(RagError::EmptyIndex);
        }

        let query = self.llm.embed_one(question).await?;
        let retrieved = self.index.search(&query, self.top_k);

        let context = retrieved
            .iter()
            .map(|chunk| chunk.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n---\n\n");
        let prompt = format!("Documenti:\n{}\n\nDomanda: {}", context, question);

        let answer = self
            .llm
            .complete(&[ChatMessage::system(QA_SYSTEM_PROMPT), ChatMessage::user(prompt)])
            .await?;

        let sources = retrieved
            .into_iter()
            .map(|chunk| chunk.source.clone())
            .collect();
        Ok(QaResult { answer, sources })
    }
}
