//! Port trait definitions (Hexagonal Architecture)
//!
//! Async trait interfaces that infrastructure adapters implement:
//! - `EmbeddingService`: text to vectors
//! - `GenerationBackend`: prompt to completion, per credential
//! - `ChunkStore`: persistence of the active index generation
//! - `TextExtractor`: uploaded file to plain text

pub mod chunk_store;
pub mod embedding;
pub mod generation_backend;
pub mod text_extractor;

pub use chunk_store::{ChunkStore, StoredChunk, StoredGeneration};
pub use embedding::EmbeddingService;
pub use generation_backend::GenerationBackend;
pub use text_extractor::TextExtractor;
