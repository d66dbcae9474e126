//! RAG (Retrieval-Augmented Generation) service
//!
//! The facade the presentation layer talks to. Indexes one document at a
//! time and answers questions about it: retrieval, prompt composition and
//! the key-rotating generation call.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument};

use super::answer_composer::AnswerComposer;
use super::key_rotating_client::KeyRotatingClient;
use super::retriever::{sanitize, Retriever};
use crate::domain::errors::{RagError, RagResult};
use crate::domain::models::{ApiCredential, Config, EmbeddingMode, ScoredChunk};
use crate::domain::ports::{ChunkStore, GenerationBackend, TextExtractor};
use crate::infrastructure::credentials::CredentialPool;
use crate::infrastructure::embeddings::{HashEmbedder, OpenAiEmbeddingService};
use crate::infrastructure::gemini::{GeminiBackend, GeminiClientConfig};
use crate::infrastructure::vector::{IndexMode, IndexStats, SqliteChunkStore, VectorIndex, WordChunker};

/// An answer plus the chunks it was grounded on
#[derive(Debug, Clone)]
pub struct Answer {
    /// Answer text, or the user-facing failure message
    pub text: String,
    /// Retrieved chunks, closest first
    pub sources: Vec<ScoredChunk>,
}

/// RAG service for single-document question answering
pub struct RagService {
    chunker: WordChunker,
    retriever: Retriever,
    composer: AnswerComposer,
    client: Arc<KeyRotatingClient>,
}

impl RagService {
    /// Assemble a service from its parts
    pub fn new(
        chunker: WordChunker,
        index: Arc<VectorIndex>,
        client: Arc<KeyRotatingClient>,
        default_top_k: usize,
    ) -> Self {
        Self {
            chunker,
            retriever: Retriever::new(index, default_top_k),
            composer: AnswerComposer::new(Arc::clone(&client)),
            client,
        }
    }

    /// Build the production service: Gemini backend, configured index mode
    /// and the persistent store when `index.persist_path` is set
    pub async fn from_config(config: &Config) -> RagResult<Self> {
        let backend = GeminiBackend::new(GeminiClientConfig::from(&config.generation))
            .map_err(|e| RagError::InvalidConfiguration(format!("Gemini client: {e}")))?;
        Self::from_config_with_backend(config, Arc::new(backend)).await
    }

    /// Build the service from `config` around a caller-supplied backend
    pub async fn from_config_with_backend(
        config: &Config,
        backend: Arc<dyn GenerationBackend>,
    ) -> RagResult<Self> {
        let chunker = WordChunker::with_config(config.chunking)?;

        let mode = match config.index.mode {
            EmbeddingMode::Internal => IndexMode::Internal(HashEmbedder::new(config.index.dimensions)?),
            EmbeddingMode::External => IndexMode::External(Arc::new(OpenAiEmbeddingService::new(
                config.embedding_api.clone(),
            )?)),
        };

        let index = match &config.index.persist_path {
            Some(path) => {
                let store: Arc<dyn ChunkStore> = Arc::new(SqliteChunkStore::open(path).await?);
                VectorIndex::open(mode, store).await?
            }
            None => VectorIndex::new(mode),
        };

        let pool = CredentialPool::new(
            config
                .credentials
                .api_keys
                .iter()
                .map(|key| ApiCredential::new(key.as_str()))
                .collect(),
            Duration::from_secs(config.generation.failure_reset_secs),
        );
        let client = KeyRotatingClient::from_config(Arc::new(pool), backend, &config.generation);

        Ok(Self::new(
            chunker,
            Arc::new(index),
            Arc::new(client),
            config.retrieval.top_k,
        ))
    }

    /// The vector index behind this service
    pub fn index(&self) -> &Arc<VectorIndex> {
        self.retriever.index()
    }

    /// The key-rotating client behind this service
    pub fn client(&self) -> &Arc<KeyRotatingClient> {
        &self.client
    }

    /// Replace the indexed document with `text`
    ///
    /// Empty text clears the index and reports zero chunks.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of chunks now indexed
    /// * `Err(RagError::IndexUnavailable)` - Store or embedder failure
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    pub async fn index_document(&self, text: &str) -> RagResult<usize> {
        let chunks = self.chunker.chunk_document(text);

        if chunks.is_empty() {
            info!("document has no text; clearing index");
            self.index().reset().await?;
            return Ok(0);
        }

        let report = self.index().index_chunks(chunks).await?;
        info!(
            generation = %report.generation_id,
            chunks = report.chunk_count,
            "document indexed"
        );
        Ok(report.chunk_count)
    }

    /// Extract `path` with `extractor` and index the result
    ///
    /// A file with no extractable text clears the index, like an empty document.
    pub async fn index_file(&self, path: &Path, extractor: &dyn TextExtractor) -> RagResult<usize> {
        let text = extractor.extract(path).await?.unwrap_or_default();
        self.index_document(&text).await
    }

    /// Answer `question` from the indexed document
    ///
    /// Never fails: generation problems come back as their user-facing message.
    #[instrument(skip(self, question))]
    pub async fn ask(&self, question: &str) -> String {
        let context = self.retriever.retrieve_context(question).await;
        self.composer.answer(question, &context).await
    }

    /// Answer `question` with up to `top_k` chunks, returning the chunks used
    pub async fn ask_with_sources(&self, question: &str, top_k: Option<usize>) -> Answer {
        let top_k = top_k.unwrap_or_else(|| self.retriever.default_top_k());
        let sources = self.index().query_scored(question, top_k).await;
        let context = sources
            .iter()
            .filter_map(|source| sanitize(&source.text))
            .collect::<Vec<_>>()
            .join(" ");

        Answer {
            text: self.composer.answer(question, &context).await,
            sources,
        }
    }

    /// Current index statistics
    pub async fn stats(&self) -> IndexStats {
        self.index().stats().await
    }
}
