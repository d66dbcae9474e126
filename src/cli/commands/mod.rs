//! CLI command implementations.

pub mod ask;
pub mod chat;
pub mod index;
pub mod status;

use anyhow::{Context, Result};
use std::path::Path;

use crate::domain::models::Config;
use crate::infrastructure::config::ConfigLoader;
use crate::services::RagService;

/// Load configuration from `path`, or from the project `.pdf-rag/` directory
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    }
}

/// Build the production service for `config`
pub async fn build_service(config: &Config) -> Result<RagService> {
    RagService::from_config(config)
        .await
        .context("Failed to initialize the RAG pipeline")
}
