//! Domain models: chunks, configuration, credentials and generation outcomes

pub mod chunk;
pub mod config;
pub mod credential;
pub mod generation;

pub use chunk::{ChunkingConfig, DocumentChunk, ScoredChunk};
pub use config::{
    Config, CredentialsConfig, EmbeddingApiConfig, EmbeddingMode, GenerationConfig, IndexConfig,
    RetrievalConfig,
};
pub use credential::ApiCredential;
pub use generation::{
    GenerationOutcome, QueryKind, ALL_CREDENTIALS_EXHAUSTED_MESSAGE, NO_CREDENTIALS_MESSAGE,
    TIMEOUT_MESSAGE,
};
