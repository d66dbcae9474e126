//! pdf-rag - question answering over a single document
//!
//! Indexes the text of one document and answers natural-language questions
//! about it: overlapping word chunks, a vector index, top-k retrieval and a
//! Gemini generation call that fails over across a pool of API keys.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Models, errors and port traits
//! - **Infrastructure Layer** (`infrastructure`): Chunking, vector index,
//!   embedders, persistence, Gemini client, configuration and logging
//! - **Service Layer** (`services`): Retrieval, key rotation, prompt
//!   composition and the [`RagService`] facade
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```no_run
//! use pdf_rag::{ConfigLoader, RagService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ConfigLoader::load()?;
//!     let service = RagService::from_config(&config).await?;
//!
//!     service.index_document("Paris is the capital of France.").await?;
//!     println!("{}", service.ask("What is the capital of France?").await);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{RagError, RagResult};
pub use domain::models::{
    ApiCredential, ChunkingConfig, Config, DocumentChunk, GenerationOutcome, QueryKind,
    ScoredChunk,
};
pub use domain::ports::{ChunkStore, EmbeddingService, GenerationBackend, TextExtractor};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use infrastructure::credentials::CredentialPool;
pub use infrastructure::vector::{IndexMode, VectorIndex, WordChunker};
pub use services::{AnswerComposer, KeyRotatingClient, RagService, Retriever};
