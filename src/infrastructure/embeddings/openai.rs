//! OpenAI-compatible embedding service.
//!
//! Used when the index runs in external mode. Talks to any `/embeddings`
//! endpoint that follows the OpenAI request/response shape.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::errors::{RagError, RagResult};
use crate::domain::models::EmbeddingApiConfig;
use crate::domain::ports::EmbeddingService;

/// External embedding service over HTTP.
pub struct OpenAiEmbeddingService {
    config: EmbeddingApiConfig,
    client: reqwest::Client,
}

impl OpenAiEmbeddingService {
    /// Build the HTTP client; rejects a zero batch size
    pub fn new(config: EmbeddingApiConfig) -> RagResult<Self> {
        if config.max_batch_size == 0 {
            return Err(RagError::InvalidConfiguration(
                "embedding_api.max_batch_size must be greater than 0".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RagError::InvalidConfiguration(format!("HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    fn api_key(&self) -> RagResult<String> {
        self.config
            .api_key
            .clone()
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .ok_or_else(|| {
                RagError::InvalidConfiguration(
                    "Embedding API key not set. Set OPENAI_API_KEY or embedding_api.api_key."
                        .to_string(),
                )
            })
    }

    async fn call_embeddings_api(&self, texts: Vec<String>) -> RagResult<Vec<Vec<f32>>> {
        let api_key = self.api_key()?;
        let url = format!("{}/embeddings", self.config.base_url);
        let expected = texts.len();

        let request_body = EmbeddingsRequest {
            model: self.config.model.clone(),
            input: texts,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| RagError::EmbeddingFailed(format!("Embedding API request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read response body".to_string());
            return Err(RagError::EmbeddingFailed(format!(
                "Embedding API returned {status}: {body}"
            )));
        }

        let result: EmbeddingsResponse = response.json().await.map_err(|e| {
            RagError::EmbeddingFailed(format!("Failed to parse embedding response: {e}"))
        })?;

        // Sort by index to maintain input order
        let mut data = result.data;
        data.sort_by_key(|d| d.index);

        if data.len() != expected {
            return Err(RagError::EmbeddingFailed(format!(
                "Embedding API returned {} vectors for {expected} inputs",
                data.len()
            )));
        }

        let vectors: Vec<Vec<f32>> = data.into_iter().map(|d| d.embedding).collect();
        if let Some(bad) = vectors.iter().find(|v| v.len() != self.config.dimension) {
            return Err(RagError::EmbeddingFailed(format!(
                "Embedding dimension {} does not match configured {}",
                bad.len(),
                self.config.dimension
            )));
        }

        Ok(vectors)
    }
}

#[async_trait]
impl EmbeddingService for OpenAiEmbeddingService {
    fn name(&self) -> &str {
        &self.config.model
    }

    fn dimensions(&self) -> usize {
        self.config.dimension
    }

    async fn embed(&self, text: &str) -> RagResult<Vec<f32>> {
        let results = self.call_embeddings_api(vec![text.to_string()]).await?;
        results
            .into_iter()
            .next()
            .ok_or_else(|| RagError::EmbeddingFailed("Empty embedding response".to_string()))
    }

    async fn embed_batch(&self, texts: &[String]) -> RagResult<Vec<Vec<f32>>> {
        let mut all_vectors = Vec::with_capacity(texts.len());

        for batch in texts.chunks(self.config.max_batch_size) {
            let vectors = self.call_embeddings_api(batch.to_vec()).await?;
            all_vectors.extend(vectors);
        }

        Ok(all_vectors)
    }
}

// -- OpenAI API request/response types --

#[derive(Debug, Serialize)]
struct EmbeddingsRequest {
    model: String,
    input: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}
