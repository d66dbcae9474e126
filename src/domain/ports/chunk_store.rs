//! Persistence port for index generations.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::RagResult;
use crate::domain::models::DocumentChunk;

/// A chunk together with its embedding, as persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredChunk {
    /// The chunk
    pub chunk: DocumentChunk,

    /// Its embedding vector
    pub embedding: Vec<f32>,
}

/// A complete persisted index generation.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredGeneration {
    /// Generation id
    pub id: Uuid,

    /// Identity of the embedder that produced the vectors
    pub embedder: String,

    /// Chunks in id order
    pub chunks: Vec<StoredChunk>,
}

/// Backing store for the single active index generation.
///
/// Implementations must make [`replace_all`](Self::replace_all) atomic: a
/// reader sees the old generation or the new one, never a mix.
#[async_trait]
pub trait ChunkStore: Send + Sync {
    /// Create the schema if needed.
    async fn initialize(&self) -> RagResult<()>;

    /// Load the persisted generation, if any.
    async fn load(&self) -> RagResult<Option<StoredGeneration>>;

    /// Replace whatever is stored with `generation`.
    async fn replace_all(&self, generation: &StoredGeneration) -> RagResult<()>;

    /// Remove the stored generation.
    async fn clear(&self) -> RagResult<()>;
}
