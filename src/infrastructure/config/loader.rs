//! Hierarchical configuration loading and validation

use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use std::path::Path;
use thiserror::Error;

use crate::domain::models::{Config, EmbeddingMode};
use crate::infrastructure::logging::logger::parse_log_level;

/// Numbered key variables checked when no keys are configured
pub const NUMBERED_KEY_VARS: [&str; 5] = [
    "GOOGLE_API_KEY_1",
    "GOOGLE_API_KEY_2",
    "GOOGLE_API_KEY_3",
    "GOOGLE_API_KEY_4",
    "GOOGLE_API_KEY_5",
];

/// Single key variable used when no numbered key is set
pub const SINGLE_KEY_VAR: &str = "GOOGLE_API_KEY";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Chunk size zero or overlap not below it
    #[error("Invalid chunking: chunk_size ({0}) must be positive and greater than chunk_overlap ({1})")]
    InvalidChunking(usize, usize),

    /// `retrieval.top_k` is zero
    #[error("Invalid top_k: {0}. Must be at least 1")]
    InvalidTopK(usize),

    /// Per-call generation deadline is zero
    #[error("Invalid generation timeout: {0}s. Must be at least 1")]
    InvalidTimeout(u64),

    /// HTTP transport timeout shorter than the per-call deadline
    #[error(
        "Invalid http_timeout_secs ({0}): must not be shorter than generation timeout_secs ({1})"
    )]
    InvalidHttpTimeout(u64, u64),

    /// Unknown log level name
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    /// Empty generation model
    #[error("Model name cannot be empty")]
    EmptyModel,

    /// Empty generation base URL
    #[error("Base URL cannot be empty")]
    EmptyBaseUrl,

    /// Built-in embedder with zero dimensions
    #[error("Invalid index dimensions: {0}. Must be at least 1")]
    InvalidDimensions(usize),

    /// Any other invalid setting
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .pdf-rag/config.yaml (project config)
    /// 3. .pdf-rag/local.yaml (project local overrides, optional)
    /// 4. Environment variables (PDF_RAG_* prefix, highest priority)
    ///
    /// API keys fall back to the `GOOGLE_API_KEY*` variables when none are
    /// configured.
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(".pdf-rag/config.yaml"))
            .merge(Yaml::file(".pdf-rag/local.yaml"))
            .merge(Env::prefixed("PDF_RAG_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::finish(config)
    }

    /// Load configuration from a specific file, still honoring env overrides
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path))
            .merge(Env::prefixed("PDF_RAG_").split("__"))
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.display()))?;

        Self::finish(config)
    }

    fn finish(mut config: Config) -> Result<Config> {
        config.credentials.api_keys = Self::resolve_api_keys(&config.credentials.api_keys);
        Self::validate(&config)?;
        Ok(config)
    }

    /// Configured keys, or the keys found in the environment
    ///
    /// Blank entries are dropped. With no configured keys, the non-empty
    /// `GOOGLE_API_KEY_1`..`GOOGLE_API_KEY_5` are used in order; if none is
    /// set, a lone `GOOGLE_API_KEY`.
    pub fn resolve_api_keys(configured: &[String]) -> Vec<String> {
        let configured: Vec<String> = configured
            .iter()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .collect();
        if !configured.is_empty() {
            return configured;
        }

        let numbered: Vec<String> = NUMBERED_KEY_VARS
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .collect();
        if !numbered.is_empty() {
            return numbered;
        }

        std::env::var(SINGLE_KEY_VAR)
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .into_iter()
            .collect()
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let chunking = &config.chunking;
        if chunking.validate().is_err() {
            return Err(ConfigError::InvalidChunking(
                chunking.chunk_size,
                chunking.chunk_overlap,
            ));
        }

        if config.retrieval.top_k == 0 {
            return Err(ConfigError::InvalidTopK(config.retrieval.top_k));
        }

        let generation = &config.generation;
        if generation.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout(generation.timeout_secs));
        }

        if generation.http_timeout_secs < generation.timeout_secs {
            return Err(ConfigError::InvalidHttpTimeout(
                generation.http_timeout_secs,
                generation.timeout_secs,
            ));
        }

        if generation.model.trim().is_empty() {
            return Err(ConfigError::EmptyModel);
        }

        if generation.base_url.trim().is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }

        if config.index.dimensions == 0 {
            return Err(ConfigError::InvalidDimensions(config.index.dimensions));
        }

        if config.index.persist_path.as_deref().is_some_and(|p| p.trim().is_empty()) {
            return Err(ConfigError::ValidationFailed(
                "index.persist_path cannot be empty; omit it for an in-memory index".to_string(),
            ));
        }

        if config.index.mode == EmbeddingMode::External {
            let api = &config.embedding_api;
            if api.model.trim().is_empty() {
                return Err(ConfigError::EmptyModel);
            }
            if api.base_url.trim().is_empty() {
                return Err(ConfigError::EmptyBaseUrl);
            }
            if api.dimension == 0 {
                return Err(ConfigError::InvalidDimensions(api.dimension));
            }
            if api.max_batch_size == 0 {
                return Err(ConfigError::ValidationFailed(
                    "embedding_api.max_batch_size must be at least 1".to_string(),
                ));
            }
        }

        if parse_log_level(&config.logging.level).is_err() {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        Ok(())
    }
}
