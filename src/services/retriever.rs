//! Query-time retrieval policy

use std::sync::Arc;
use tracing::{debug, instrument};

use crate::infrastructure::vector::VectorIndex;

/// Default number of chunks returned per question
pub const DEFAULT_TOP_K: usize = 3;

/// Top-k retrieval over the active index
///
/// Returned chunks are safe to splice into a prompt: control characters
/// other than newline and tab are stripped, and chunks left empty are
/// dropped.
pub struct Retriever {
    index: Arc<VectorIndex>,
    default_top_k: usize,
}

impl Retriever {
    /// Create a retriever over `index`
    pub fn new(index: Arc<VectorIndex>, default_top_k: usize) -> Self {
        Self {
            index,
            default_top_k,
        }
    }

    /// The index queries run against
    pub fn index(&self) -> &Arc<VectorIndex> {
        &self.index
    }

    /// Chunk count used when a question gives none
    pub const fn default_top_k(&self) -> usize {
        self.default_top_k
    }

    /// Retrieve up to `top_k` chunks for `question`, most similar first
    #[instrument(skip(self, question))]
    pub async fn retrieve(&self, question: &str, top_k: Option<usize>) -> Vec<String> {
        let top_k = top_k.unwrap_or(self.default_top_k);
        let chunks: Vec<String> = self
            .index
            .query(question, top_k)
            .await
            .into_iter()
            .filter_map(|chunk| sanitize(&chunk))
            .collect();

        debug!(returned = chunks.len(), "retrieved context chunks");
        chunks
    }

    /// Retrieved chunks joined by a single space
    pub async fn retrieve_context(&self, question: &str) -> String {
        self.retrieve(question, None).await.join(" ")
    }
}

/// Strip control characters except `\n` and `\t`; `None` if nothing is left
pub fn sanitize(chunk: &str) -> Option<String> {
    let cleaned: String = chunk
        .chars()
        .filter(|c| !c.is_control() || matches!(c, '\n' | '\t'))
        .collect();

    (!cleaned.trim().is_empty()).then_some(cleaned)
}
