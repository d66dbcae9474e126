//! Embedding service implementations
//!
//! - `HashEmbedder`: the vector index's built-in embedding function
//! - `OpenAiEmbeddingService`: external OpenAI-compatible embedding model

pub mod hash_embedder;
pub mod openai;

pub use hash_embedder::HashEmbedder;
pub use openai::OpenAiEmbeddingService;
