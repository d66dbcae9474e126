//! Embedding service port for semantic vector generation.
//!
//! The vector index holds exactly one implementation of this trait for its
//! whole lifetime, so chunks and queries always land in the same space.

use async_trait::async_trait;

use crate::domain::errors::RagResult;

/// Trait for embedding providers (built-in or remote).
#[async_trait]
pub trait EmbeddingService: Send + Sync {
    /// Provider name (e.g., "hashing", "openai").
    ///
    /// Persisted with each index generation; together with
    /// [`dimensions`](Self::dimensions) it identifies the embedding space.
    fn name(&self) -> &str;

    /// Embedding dimension for this provider/model.
    fn dimensions(&self) -> usize;

    /// Generate an embedding for a single text.
    async fn embed(&self, text: &str) -> RagResult<Vec<f32>>;

    /// Generate embeddings for multiple texts, preserving input order.
    async fn embed_batch(&self, texts: &[String]) -> RagResult<Vec<Vec<f32>>>;

    /// Identity string stored alongside persisted vectors.
    fn identity(&self) -> String {
        format!("{}:{}", self.name(), self.dimensions())
    }
}
