//! Common test utilities for integration tests
//!
//! Scripted generation backends, temporary index paths and config builders
//! shared across the integration test files.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use tempfile::TempDir;

use pdf_rag::domain::models::{ApiCredential, Config};
use pdf_rag::GenerationBackend;

/// What the scripted backend does for a given key
#[derive(Debug, Clone)]
pub enum Behavior {
    /// Answer immediately
    Reply(String),
    /// Fail immediately
    Fail(String),
    /// Answer after the given delay
    Hang(Duration),
}

/// Generation backend whose behavior is scripted per API key
///
/// Records every key it is called with, in call order. Prompts are recorded
/// too so tests can inspect what the composer sent.
pub struct ScriptedBackend {
    behaviors: HashMap<String, Behavior>,
    fallback: Behavior,
    calls: Mutex<Vec<String>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    /// A backend that answers `reply` for every key
    pub fn replying(reply: &str) -> Self {
        Self {
            behaviors: HashMap::new(),
            fallback: Behavior::Reply(reply.to_string()),
            calls: Mutex::new(Vec::new()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// A backend that fails for every key
    pub fn failing() -> Self {
        Self {
            fallback: Behavior::Fail("backend unavailable".to_string()),
            ..Self::replying("")
        }
    }

    /// Override the behavior for one key
    pub fn with(mut self, key: &str, behavior: Behavior) -> Self {
        self.behaviors.insert(key.to_string(), behavior);
        self
    }

    /// Keys used, in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Prompts received, in call order
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerationBackend for ScriptedBackend {
    async fn generate(&self, credential: &ApiCredential, prompt: &str) -> anyhow::Result<String> {
        self.calls.lock().unwrap().push(credential.expose().to_string());
        self.prompts.lock().unwrap().push(prompt.to_string());

        let behavior = self
            .behaviors
            .get(credential.expose())
            .unwrap_or(&self.fallback)
            .clone();

        match behavior {
            Behavior::Reply(text) => Ok(text),
            Behavior::Fail(reason) => anyhow::bail!(reason),
            Behavior::Hang(delay) => {
                tokio::time::sleep(delay).await;
                Ok(format!("late answer from {}", credential.expose()))
            }
        }
    }
}

/// Create a temporary directory for test isolation
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Path for an index database inside a fresh temporary directory
pub fn temp_index_path() -> (TempDir, PathBuf) {
    let dir = temp_dir();
    let path = dir.path().join("index").join("index.db");
    (dir, path)
}

/// Config with small chunks, fast failover and the given keys
///
/// `persist_path` of `None` keeps the index in memory.
pub fn test_config(keys: &[&str], persist_path: Option<&PathBuf>) -> Config {
    let mut config = Config::default();
    config.credentials.api_keys = keys.iter().map(ToString::to_string).collect();
    config.chunking.chunk_size = 8;
    config.chunking.chunk_overlap = 2;
    config.generation.backoff_ms = 10;
    config.index.persist_path = persist_path.map(|p| p.display().to_string());
    config
}

/// Setup test logging
///
/// Call at the start of a test that should print pipeline logs.
pub fn setup_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
