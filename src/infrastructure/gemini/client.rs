//! Gemini `generateContent` HTTP client
//!
//! Stateless with respect to credentials: the key arrives with every call,
//! so the key-rotating client can switch keys without rebuilding anything.

use async_trait::async_trait;
use reqwest::{Client as ReqwestClient, Response};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use super::errors::GeminiApiError;
use super::types::{GenerateContentRequest, GenerateContentResponse};
use crate::domain::models::{ApiCredential, GenerationConfig};
use crate::domain::ports::GenerationBackend;

/// Configuration for the Gemini HTTP client
#[derive(Debug, Clone)]
pub struct GeminiClientConfig {
    /// Base URL for the Gemini API
    pub base_url: String,

    /// Model name, e.g. `gemini-1.5-pro`
    pub model: String,

    /// Transport timeout in seconds
    pub timeout_secs: u64,
}

impl Default for GeminiClientConfig {
    fn default() -> Self {
        Self::from(&GenerationConfig::default())
    }
}

impl From<&GenerationConfig> for GeminiClientConfig {
    fn from(config: &GenerationConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            timeout_secs: config.http_timeout_secs,
        }
    }
}

/// Gemini `generateContent` backend
///
/// Holds no key of its own: every call is made with the credential the
/// key-rotating client picked, so one pooled HTTP client serves every key.
pub struct GeminiBackend {
    http_client: ReqwestClient,
    endpoint: String,
    model: String,
}

impl GeminiBackend {
    /// Create a new Gemini backend
    pub fn new(config: GeminiClientConfig) -> Result<Self, GeminiApiError> {
        info!(
            base_url = %config.base_url,
            model = %config.model,
            timeout_secs = config.timeout_secs,
            "initializing Gemini client"
        );

        let http_client = ReqwestClient::builder()
            .pool_max_idle_per_host(10)
            .timeout(Duration::from_secs(config.timeout_secs))
            .tcp_nodelay(true)
            .build()?;

        let endpoint = format!(
            "{}/v1beta/models/{}:generateContent",
            config.base_url.trim_end_matches('/'),
            config.model
        );

        Ok(Self {
            http_client,
            endpoint,
            model: config.model,
        })
    }

    /// Model this backend talks to
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send `prompt` with `credential` and return the raw candidate text
    #[instrument(skip(self, credential, prompt), fields(model = %self.model, key = %credential))]
    pub async fn generate_content(
        &self,
        credential: &ApiCredential,
        prompt: &str,
    ) -> Result<String, GeminiApiError> {
        debug!(url = %self.endpoint, "POST generateContent");

        let response = self
            .http_client
            .post(&self.endpoint)
            .header("x-goog-api-key", credential.expose())
            .json(&GenerateContentRequest::from_prompt(prompt))
            .send()
            .await?;

        let body = Self::handle_response(response).await?;

        if let Some(usage) = body.usage_metadata {
            debug!(
                prompt_tokens = usage.prompt_token_count,
                output_tokens = usage.candidates_token_count,
                "generateContent succeeded"
            );
        }

        body.text().ok_or(GeminiApiError::EmptyResponse)
    }

    async fn handle_response(response: Response) -> Result<GenerateContentResponse, GeminiApiError> {
        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());
            warn!(%status, "Gemini API error");
            return Err(GeminiApiError::from_status(status, body));
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl GenerationBackend for GeminiBackend {
    async fn generate(&self, credential: &ApiCredential, prompt: &str) -> anyhow::Result<String> {
        Ok(self.generate_content(credential, prompt).await?)
    }
}
