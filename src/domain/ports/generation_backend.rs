//! Generation backend port.

use async_trait::async_trait;

use crate::domain::models::ApiCredential;

/// A text-generation service addressed by an API credential.
///
/// Any error counts as a failure of the credential used for the call; the
/// key-rotating client decides what happens next.
#[async_trait]
pub trait GenerationBackend: Send + Sync + 'static {
    /// Generate a completion for `prompt` using `credential`.
    async fn generate(&self, credential: &ApiCredential, prompt: &str) -> anyhow::Result<String>;
}
