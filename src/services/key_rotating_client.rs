//! Key-rotating client for the generation backend
//!
//! Wraps a [`GenerationBackend`] with credential failover, a per-call
//! deadline and a fixed backoff between attempts. Every failure mode ends
//! as a [`GenerationOutcome`]; nothing is raised to the caller.

use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, instrument, warn};

use crate::domain::models::{GenerationConfig, GenerationOutcome};
use crate::domain::ports::GenerationBackend;
use crate::infrastructure::credentials::CredentialPool;

/// Default deadline for a single backend call
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(15);

/// Default pause between failover attempts
pub const DEFAULT_BACKOFF: Duration = Duration::from_secs(1);

/// Generation client that fails over across a [`CredentialPool`]
pub struct KeyRotatingClient {
    pool: Arc<CredentialPool>,
    backend: Arc<dyn GenerationBackend>,
    call_timeout: Duration,
    backoff: Duration,
}

impl KeyRotatingClient {
    /// Create a client with the default deadline and backoff
    pub fn new(pool: Arc<CredentialPool>, backend: Arc<dyn GenerationBackend>) -> Self {
        Self {
            pool,
            backend,
            call_timeout: DEFAULT_CALL_TIMEOUT,
            backoff: DEFAULT_BACKOFF,
        }
    }

    /// Create a client using the deadline and backoff from `config`
    pub fn from_config(
        pool: Arc<CredentialPool>,
        backend: Arc<dyn GenerationBackend>,
        config: &GenerationConfig,
    ) -> Self {
        Self::new(pool, backend)
            .with_timeout(Duration::from_secs(config.timeout_secs))
            .with_backoff(Duration::from_millis(config.backoff_ms))
    }

    /// Set the per-call deadline
    #[must_use]
    pub const fn with_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    /// Set the pause between attempts
    #[must_use]
    pub const fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Shared credential pool
    pub fn pool(&self) -> &Arc<CredentialPool> {
        &self.pool
    }

    /// Generate a completion for `prompt`
    ///
    /// Makes at most one attempt per configured key. Each attempt runs the
    /// backend on its own task under the call deadline; a late response from
    /// an abandoned attempt is dropped. Failed keys are marked in the pool
    /// and the next working key is tried after the backoff.
    ///
    /// # Returns
    /// * `Success` - trimmed backend text
    /// * `NoCredentialsConfigured` - the pool is empty
    /// * `Timeout` - the final attempt exceeded the deadline
    /// * `AllCredentialsExhausted` - every attempt failed otherwise
    #[instrument(skip(self, prompt), fields(prompt_len = prompt.len()))]
    pub async fn generate(&self, prompt: &str) -> GenerationOutcome {
        if self.pool.is_empty() {
            warn!("no API keys configured");
            return GenerationOutcome::NoCredentialsConfigured;
        }

        let max_attempts = self.pool.len();
        let mut last_timed_out = false;

        for attempt in 1..=max_attempts {
            let Some(credential) = self.pool.get_working_credential() else {
                return GenerationOutcome::NoCredentialsConfigured;
            };

            let backend = Arc::clone(&self.backend);
            let task_credential = credential.clone();
            let task_prompt = prompt.to_string();
            let handle = tokio::spawn(async move {
                backend.generate(&task_credential, &task_prompt).await
            });

            // Dropping the handle on timeout detaches the task
            match tokio::time::timeout(self.call_timeout, handle).await {
                Ok(Ok(Ok(text))) => {
                    info!(attempt, key = %credential, "generation succeeded");
                    return GenerationOutcome::Success(text.trim().to_string());
                }
                Ok(Ok(Err(err))) => {
                    error!(attempt, key = %credential, error = %err, "generation failed");
                    last_timed_out = false;
                }
                Ok(Err(join_err)) => {
                    error!(attempt, key = %credential, error = %join_err, "generation task aborted");
                    last_timed_out = false;
                }
                Err(_) => {
                    error!(
                        attempt,
                        key = %credential,
                        timeout_ms = u64::try_from(self.call_timeout.as_millis()).unwrap_or(u64::MAX),
                        "generation timed out"
                    );
                    last_timed_out = true;
                }
            }

            self.pool.mark_failed(&credential);

            if attempt < max_attempts {
                tokio::time::sleep(self.backoff).await;
            }
        }

        if last_timed_out {
            GenerationOutcome::Timeout
        } else {
            GenerationOutcome::AllCredentialsExhausted
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::ApiCredential;
    use async_trait::async_trait;

    struct Echo;

    #[async_trait]
    impl GenerationBackend for Echo {
        async fn generate(&self, credential: &ApiCredential, prompt: &str) -> anyhow::Result<String> {
            Ok(format!("  {}:{prompt}\n", credential.expose()))
        }
    }

    struct Panics;

    #[async_trait]
    impl GenerationBackend for Panics {
        async fn generate(&self, _: &ApiCredential, _: &str) -> anyhow::Result<String> {
            panic!("backend bug")
        }
    }

    #[tokio::test]
    async fn test_empty_pool_short_circuits() {
        let client = KeyRotatingClient::new(
            Arc::new(CredentialPool::from_keys(Vec::<String>::new())),
            Arc::new(Echo),
        );
        assert_eq!(
            client.generate("hi").await,
            GenerationOutcome::NoCredentialsConfigured
        );
    }

    #[tokio::test]
    async fn test_success_is_trimmed() {
        let client = KeyRotatingClient::new(
            Arc::new(CredentialPool::from_keys(["key-a"])),
            Arc::new(Echo),
        );
        assert_eq!(
            client.generate("ping").await,
            GenerationOutcome::Success("key-a:ping".to_string())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_task_panic_counts_as_failure() {
        let client = KeyRotatingClient::new(
            Arc::new(CredentialPool::from_keys(["key-a", "key-b"])),
            Arc::new(Panics),
        );
        assert_eq!(
            client.generate("ping").await,
            GenerationOutcome::AllCredentialsExhausted
        );
    }

    #[test]
    fn test_from_config() {
        let client = KeyRotatingClient::from_config(
            Arc::new(CredentialPool::from_keys(["key-a"])),
            Arc::new(Echo),
            &GenerationConfig {
                timeout_secs: 7,
                backoff_ms: 250,
                ..Default::default()
            },
        );
        assert_eq!(client.call_timeout, Duration::from_secs(7));
        assert_eq!(client.backoff, Duration::from_millis(250));
        assert_eq!(client.pool().len(), 1);
    }
}
