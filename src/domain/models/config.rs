//! Application configuration model

use serde::{Deserialize, Serialize};

use super::chunk::ChunkingConfig;
use crate::infrastructure::logging::LogConfig;

/// Main configuration structure for pdf-rag
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Generation backend credentials
    #[serde(default)]
    pub credentials: CredentialsConfig,

    /// Generation backend and key rotation settings
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Word-window chunking
    #[serde(default)]
    pub chunking: ChunkingConfig,

    /// Retrieval defaults
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Vector index settings
    #[serde(default)]
    pub index: IndexConfig,

    /// External embedding API (used when `index.mode` is `external`)
    #[serde(default)]
    pub embedding_api: EmbeddingApiConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LogConfig,
}

/// API keys for the generation backend
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CredentialsConfig {
    /// Keys in failover order
    #[serde(default)]
    pub api_keys: Vec<String>,
}

/// Generation backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GenerationConfig {
    /// Base URL of the Gemini API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model name, without the `models/` prefix
    #[serde(default = "default_model")]
    pub model: String,

    /// Wall-clock deadline for a single backend call
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Pause between failover attempts
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,

    /// Interval after which failed keys become selectable again
    #[serde(default = "default_failure_reset_secs")]
    pub failure_reset_secs: u64,

    /// Transport-level timeout; bounds abandoned calls that outlive the deadline
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_model() -> String {
    "gemini-1.5-pro".to_string()
}

const fn default_timeout_secs() -> u64 {
    15
}

const fn default_backoff_ms() -> u64 {
    1_000
}

const fn default_failure_reset_secs() -> u64 {
    3_600
}

const fn default_http_timeout_secs() -> u64 {
    120
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
            backoff_ms: default_backoff_ms(),
            failure_reset_secs: default_failure_reset_secs(),
            http_timeout_secs: default_http_timeout_secs(),
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RetrievalConfig {
    /// Number of chunks returned per question
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

const fn default_top_k() -> usize {
    3
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
        }
    }
}

/// Which embedder the vector index uses for both chunks and queries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingMode {
    /// The index's built-in hashing embedder
    #[default]
    Internal,

    /// An external embedding model behind an HTTP API
    External,
}

/// Vector index configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct IndexConfig {
    /// Embedding strategy, fixed for the life of the index
    #[serde(default)]
    pub mode: EmbeddingMode,

    /// Dimensions of the built-in embedder
    #[serde(default = "default_dimensions")]
    pub dimensions: usize,

    /// `SQLite` file holding the last indexed document (None keeps it in memory)
    #[serde(default = "default_persist_path")]
    pub persist_path: Option<String>,
}

const fn default_dimensions() -> usize {
    384
}

#[allow(clippy::unnecessary_wraps)]
fn default_persist_path() -> Option<String> {
    Some(".pdf-rag/index.db".to_string())
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            mode: EmbeddingMode::default(),
            dimensions: default_dimensions(),
            persist_path: default_persist_path(),
        }
    }
}

/// OpenAI-compatible embedding API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EmbeddingApiConfig {
    /// API key. Falls back to `OPENAI_API_KEY`.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL, including the version segment
    #[serde(default = "default_embedding_base_url")]
    pub base_url: String,

    /// Embedding model
    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// Expected embedding dimension
    #[serde(default = "default_embedding_dimension")]
    pub dimension: usize,

    /// Request timeout in seconds
    #[serde(default = "default_embedding_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum texts per request
    #[serde(default = "default_embedding_batch_size")]
    pub max_batch_size: usize,
}

fn default_embedding_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

const fn default_embedding_dimension() -> usize {
    1536
}

const fn default_embedding_timeout_secs() -> u64 {
    30
}

const fn default_embedding_batch_size() -> usize {
    256
}

impl Default for EmbeddingApiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_embedding_base_url(),
            model: default_embedding_model(),
            dimension: default_embedding_dimension(),
            timeout_secs: default_embedding_timeout_secs(),
            max_batch_size: default_embedding_batch_size(),
        }
    }
}
