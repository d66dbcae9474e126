//! Vector index for the single active document
//!
//! Holds one index generation in memory, optionally mirrored to a
//! [`ChunkStore`], and answers cosine-similarity queries against it.

use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::domain::errors::{RagError, RagResult};
use crate::domain::models::{DocumentChunk, ScoredChunk};
use crate::domain::ports::{ChunkStore, EmbeddingService, StoredChunk, StoredGeneration};
use crate::infrastructure::embeddings::HashEmbedder;

/// Embedding strategy of an index, fixed at construction
///
/// Chunks and queries are always embedded by the same strategy; an index
/// never mixes vectors from two embedding spaces.
pub enum IndexMode {
    /// The index embeds text with its own hashing embedder
    Internal(HashEmbedder),

    /// Vectors come from an external embedding model
    External(Arc<dyn EmbeddingService>),
}

impl IndexMode {
    fn embedder(&self) -> &dyn EmbeddingService {
        match self {
            Self::Internal(embedder) => embedder,
            Self::External(service) => service.as_ref(),
        }
    }

    /// Short label for logs and status output
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Internal(_) => "internal",
            Self::External(_) => "external",
        }
    }
}

/// Summary of a completed indexing run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexReport {
    /// Id of the generation now being served
    pub generation_id: Uuid,

    /// Number of chunks in it
    pub chunk_count: usize,
}

/// Snapshot of the index state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexStats {
    /// Active generation, `None` when the index is empty
    pub generation_id: Option<Uuid>,

    /// Number of chunks served
    pub chunk_count: usize,

    /// Identity of the embedder (`name:dimensions`)
    pub embedder: String,

    /// `internal` or `external`
    pub mode: &'static str,

    /// Whether generations are persisted
    pub persistent: bool,
}

/// Vector index for semantic search over one document
pub struct VectorIndex {
    mode: IndexMode,
    store: Option<Arc<dyn ChunkStore>>,
    current: RwLock<Arc<StoredGeneration>>,
    writer: Mutex<()>,
}

impl VectorIndex {
    /// Create an in-memory index
    pub fn new(mode: IndexMode) -> Self {
        let empty = Self::empty_generation(&mode);
        Self {
            mode,
            store: None,
            current: RwLock::new(Arc::new(empty)),
            writer: Mutex::new(()),
        }
    }

    /// Create an index backed by `store`
    ///
    /// Initializes the store schema and reloads the last persisted generation
    /// when it was produced by the same embedder. A generation from a
    /// different embedder is discarded.
    ///
    /// # Returns
    /// * `Ok(Self)` - Index ready to serve
    /// * `Err(RagError::IndexUnavailable)` - Store could not be initialized or read
    pub async fn open(mode: IndexMode, store: Arc<dyn ChunkStore>) -> RagResult<Self> {
        store.initialize().await.map_err(into_unavailable)?;

        let identity = mode.embedder().identity();
        let current = match store.load().await.map_err(into_unavailable)? {
            Some(stored) if stored.embedder == identity => {
                info!(
                    generation = %stored.id,
                    chunks = stored.chunks.len(),
                    embedder = %identity,
                    "restored persisted index generation"
                );
                stored
            }
            Some(stored) => {
                warn!(
                    stored_embedder = %stored.embedder,
                    active_embedder = %identity,
                    "persisted index was built with a different embedder; discarding it"
                );
                store.clear().await.map_err(into_unavailable)?;
                Self::empty_generation(&mode)
            }
            None => Self::empty_generation(&mode),
        };

        Ok(Self {
            mode,
            store: Some(store),
            current: RwLock::new(Arc::new(current)),
            writer: Mutex::new(()),
        })
    }

    fn empty_generation(mode: &IndexMode) -> StoredGeneration {
        StoredGeneration {
            id: Uuid::nil(),
            embedder: mode.embedder().identity(),
            chunks: Vec::new(),
        }
    }

    /// The strategy this index was built with
    pub const fn mode(&self) -> &IndexMode {
        &self.mode
    }

    /// Clear all stored chunks
    #[instrument(skip(self))]
    pub async fn reset(&self) -> RagResult<()> {
        let _guard = self.writer.lock().await;

        // Memory follows the store: a failed clear keeps the old generation
        if let Some(store) = &self.store {
            store.clear().await.map_err(into_unavailable)?;
        }

        *self.current.write().await = Arc::new(Self::empty_generation(&self.mode));

        debug!("index reset");
        Ok(())
    }

    /// Index plain chunk strings, embedding them with the index's embedder
    ///
    /// Chunks get ids `0..n` in sequence order and replace the previous
    /// generation wholesale.
    pub async fn index(&self, chunks: Vec<String>) -> RagResult<IndexReport> {
        let chunks = chunks
            .into_iter()
            .enumerate()
            .map(|(id, text)| DocumentChunk::from_text(id, text))
            .collect();
        self.index_chunks(chunks).await
    }

    /// Index chunks produced by the chunker, keeping their word spans
    #[instrument(skip(self, chunks), fields(chunk_count = chunks.len(), mode = self.mode.label()))]
    pub async fn index_chunks(&self, chunks: Vec<DocumentChunk>) -> RagResult<IndexReport> {
        if chunks.is_empty() {
            return Err(RagError::EmptyInput);
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let embeddings = self
            .mode
            .embedder()
            .embed_batch(&texts)
            .await
            .map_err(|e| RagError::IndexUnavailable(format!("cannot embed chunks: {e}")))?;

        if embeddings.len() != chunks.len() {
            return Err(RagError::IndexUnavailable(format!(
                "embedder returned {} vectors for {} chunks",
                embeddings.len(),
                chunks.len()
            )));
        }

        let entries = chunks
            .into_iter()
            .zip(embeddings)
            .enumerate()
            .map(|(id, (chunk, embedding))| StoredChunk {
                chunk: DocumentChunk { id, ..chunk },
                embedding,
            })
            .collect();

        self.commit(entries).await
    }

    /// Index chunks whose embeddings were computed by the caller
    ///
    /// Only valid in [`IndexMode::External`]; the vectors must come from the
    /// same model the index uses for queries.
    pub async fn index_with_embeddings(
        &self,
        chunks: Vec<(String, Vec<f32>)>,
    ) -> RagResult<IndexReport> {
        if matches!(self.mode, IndexMode::Internal(_)) {
            return Err(RagError::InvalidConfiguration(
                "precomputed embeddings require an index in external mode".to_string(),
            ));
        }
        if chunks.is_empty() {
            return Err(RagError::EmptyInput);
        }

        let dimensions = self.mode.embedder().dimensions();
        if let Some((_, bad)) = chunks.iter().find(|(_, v)| v.len() != dimensions) {
            return Err(RagError::InvalidConfiguration(format!(
                "embedding has {} dimensions, index expects {dimensions}",
                bad.len()
            )));
        }

        let entries = chunks
            .into_iter()
            .enumerate()
            .map(|(id, (text, embedding))| StoredChunk {
                chunk: DocumentChunk::from_text(id, text),
                embedding,
            })
            .collect();

        self.commit(entries).await
    }

    /// Build, persist and swap in a new generation
    async fn commit(&self, entries: Vec<StoredChunk>) -> RagResult<IndexReport> {
        let _guard = self.writer.lock().await;

        let generation = StoredGeneration {
            id: Uuid::new_v4(),
            embedder: self.mode.embedder().identity(),
            chunks: entries,
        };

        if let Some(store) = &self.store {
            store
                .replace_all(&generation)
                .await
                .map_err(into_unavailable)?;
        }

        let report = IndexReport {
            generation_id: generation.id,
            chunk_count: generation.chunks.len(),
        };

        *self.current.write().await = Arc::new(generation);

        info!(
            generation = %report.generation_id,
            chunks = report.chunk_count,
            "indexed document"
        );

        Ok(report)
    }

    /// Return up to `top_k` chunk texts, most similar first
    pub async fn query(&self, text: &str, top_k: usize) -> Vec<String> {
        self.query_scored(text, top_k)
            .await
            .into_iter()
            .map(|scored| scored.text)
            .collect()
    }

    /// Return up to `top_k` chunks with their cosine distances
    ///
    /// Never fails: an empty index, blank query or embedding failure yields
    /// an empty result.
    #[instrument(skip(self, text))]
    pub async fn query_scored(&self, text: &str, top_k: usize) -> Vec<ScoredChunk> {
        if top_k == 0 || text.trim().is_empty() {
            return Vec::new();
        }

        let generation = Arc::clone(&*self.current.read().await);
        if generation.chunks.is_empty() {
            debug!("query against empty index");
            return Vec::new();
        }

        let query_embedding = match self.mode.embedder().embed(text).await {
            Ok(embedding) => embedding,
            Err(err) => {
                warn!(error = %err, "query embedding failed; returning no context");
                return Vec::new();
            }
        };

        let mut results: Vec<ScoredChunk> = generation
            .chunks
            .iter()
            .map(|stored| ScoredChunk {
                id: stored.chunk.id,
                text: stored.chunk.text.clone(),
                distance: cosine_distance(&query_embedding, &stored.embedding),
            })
            .collect();

        results.sort_by(|a, b| a.distance.total_cmp(&b.distance).then(a.id.cmp(&b.id)));
        results.truncate(top_k);

        debug!(
            generation = %generation.id,
            returned = results.len(),
            "query served"
        );

        results
    }

    /// Current index statistics
    pub async fn stats(&self) -> IndexStats {
        let generation = Arc::clone(&*self.current.read().await);
        IndexStats {
            generation_id: (!generation.id.is_nil()).then_some(generation.id),
            chunk_count: generation.chunks.len(),
            embedder: generation.embedder.clone(),
            mode: self.mode.label(),
            persistent: self.store.is_some(),
        }
    }
}

fn into_unavailable(err: RagError) -> RagError {
    match err {
        RagError::IndexUnavailable(_) => err,
        other => RagError::IndexUnavailable(other.to_string()),
    }
}

/// Calculate cosine distance between two vectors
///
/// Mismatched lengths and zero vectors are maximally distant.
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return f32::MAX;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let mag_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let mag_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if mag_a == 0.0 || mag_b == 0.0 {
        return f32::MAX;
    }

    1.0 - (dot / (mag_a * mag_b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    fn internal_index() -> VectorIndex {
        VectorIndex::new(IndexMode::Internal(HashEmbedder::default()))
    }

    /// Embeds by keyword: axis 0 for "cat", axis 1 for "dog", axis 2 otherwise
    struct KeywordEmbedder;

    #[async_trait]
    impl EmbeddingService for KeywordEmbedder {
        fn name(&self) -> &str {
            "keyword"
        }

        fn dimensions(&self) -> usize {
            3
        }

        async fn embed(&self, text: &str) -> RagResult<Vec<f32>> {
            if text.contains("fail") {
                return Err(RagError::EmbeddingFailed("refused".to_string()));
            }
            Ok(if text.contains("cat") {
                vec![1.0, 0.0, 0.0]
            } else if text.contains("dog") {
                vec![0.0, 1.0, 0.0]
            } else {
                vec![0.0, 0.0, 1.0]
            })
        }

        async fn embed_batch(&self, texts: &[String]) -> RagResult<Vec<Vec<f32>>> {
            let mut out = Vec::new();
            for text in texts {
                out.push(self.embed(text).await?);
            }
            Ok(out)
        }
    }

    fn external_index() -> VectorIndex {
        VectorIndex::new(IndexMode::External(Arc::new(KeywordEmbedder)))
    }

    #[test]
    fn test_cosine_distance() {
        assert!(cosine_distance(&[1.0, 0.0], &[1.0, 0.0]).abs() < 1e-6);
        assert!((cosine_distance(&[1.0, 0.0], &[0.0, 1.0]) - 1.0).abs() < 1e-6);
        assert_eq!(cosine_distance(&[1.0], &[1.0, 0.0]), f32::MAX);
        assert_eq!(cosine_distance(&[0.0, 0.0], &[1.0, 0.0]), f32::MAX);
    }

    #[tokio::test]
    async fn test_index_empty_input() {
        let index = internal_index();
        let result = index.index(Vec::new()).await;
        assert!(matches!(result, Err(RagError::EmptyInput)));
    }

    #[tokio::test]
    async fn test_query_empty_index() {
        let index = internal_index();
        assert!(index.query("anything", 3).await.is_empty());
    }

    #[tokio::test]
    async fn test_capital_of_france() {
        let index = internal_index();
        index
            .index(vec![
                "Paris is the capital of France.".to_string(),
                "Lyon is a city in France.".to_string(),
            ])
            .await
            .unwrap();

        let results = index.query("What is the capital of France?", 1).await;
        assert_eq!(results, vec!["Paris is the capital of France.".to_string()]);
    }

    #[tokio::test]
    async fn test_query_orders_by_distance_and_truncates() {
        let index = external_index();
        index
            .index(vec![
                "a dog".to_string(),
                "a cat".to_string(),
                "a bird".to_string(),
            ])
            .await
            .unwrap();

        let scored = index.query_scored("my cat", 2).await;
        assert_eq!(scored.len(), 2);
        assert_eq!(scored[0].id, 1);
        assert_eq!(scored[0].text, "a cat");
        assert!(scored[0].distance <= scored[1].distance);
    }

    #[tokio::test]
    async fn test_top_k_larger_than_index() {
        let index = external_index();
        index.index(vec!["a cat".to_string()]).await.unwrap();
        assert_eq!(index.query("cat", 10).await.len(), 1);
        assert!(index.query("cat", 0).await.is_empty());
    }

    #[tokio::test]
    async fn test_reindex_replaces_chunks() {
        let index = external_index();
        index
            .index(vec!["a cat".to_string(), "a dog".to_string()])
            .await
            .unwrap();
        let report = index.index(vec!["a bird".to_string()]).await.unwrap();

        assert_eq!(report.chunk_count, 1);
        assert_eq!(index.query("cat", 5).await, vec!["a bird".to_string()]);
    }

    #[tokio::test]
    async fn test_reset_clears_index() {
        let index = internal_index();
        index.index(vec!["some text".to_string()]).await.unwrap();
        index.reset().await.unwrap();

        assert!(index.query("some text", 3).await.is_empty());
        assert_eq!(index.stats().await.generation_id, None);
    }

    /// In-memory store whose `clear` always fails
    #[derive(Default)]
    struct StuckStore {
        stored: std::sync::Mutex<Option<StoredGeneration>>,
    }

    #[async_trait]
    impl ChunkStore for StuckStore {
        async fn initialize(&self) -> RagResult<()> {
            Ok(())
        }

        async fn load(&self) -> RagResult<Option<StoredGeneration>> {
            Ok(self.stored.lock().unwrap().clone())
        }

        async fn replace_all(&self, generation: &StoredGeneration) -> RagResult<()> {
            *self.stored.lock().unwrap() = Some(generation.clone());
            Ok(())
        }

        async fn clear(&self) -> RagResult<()> {
            Err(RagError::IndexUnavailable("disk gone".to_string()))
        }
    }

    #[tokio::test]
    async fn test_failed_reset_keeps_memory_and_store_in_sync() {
        let store = Arc::new(StuckStore::default());
        let index = VectorIndex::open(
            IndexMode::Internal(HashEmbedder::default()),
            Arc::clone(&store) as Arc<dyn ChunkStore>,
        )
        .await
        .unwrap();
        let report = index.index(vec!["kept text".to_string()]).await.unwrap();

        let result = index.reset().await;

        assert!(matches!(result, Err(RagError::IndexUnavailable(_))));
        let stats = index.stats().await;
        assert_eq!(stats.chunk_count, 1);
        assert_eq!(stats.generation_id, Some(report.generation_id));
        assert_eq!(index.query("kept text", 1).await, vec!["kept text".to_string()]);
        let persisted = store.load().await.unwrap().unwrap();
        assert_eq!(persisted.id, report.generation_id);
    }

    #[tokio::test]
    async fn test_embedding_failure_at_index_time_is_unavailable() {
        let index = external_index();
        let result = index.index(vec!["please fail".to_string()]).await;
        assert!(matches!(result, Err(RagError::IndexUnavailable(_))));
    }

    #[tokio::test]
    async fn test_embedding_failure_at_query_time_is_empty() {
        let index = external_index();
        index.index(vec!["a cat".to_string()]).await.unwrap();
        assert!(index.query("fail please", 3).await.is_empty());
    }

    #[tokio::test]
    async fn test_precomputed_embeddings_rejected_in_internal_mode() {
        let index = internal_index();
        let result = index
            .index_with_embeddings(vec![("text".to_string(), vec![0.0; 384])])
            .await;
        assert!(matches!(result, Err(RagError::InvalidConfiguration(_))));
    }

    #[tokio::test]
    async fn test_precomputed_embeddings_in_external_mode() {
        let index = external_index();
        index
            .index_with_embeddings(vec![
                ("first".to_string(), vec![0.0, 1.0, 0.0]),
                ("second".to_string(), vec![1.0, 0.0, 0.0]),
            ])
            .await
            .unwrap();

        assert_eq!(index.query("cat", 1).await, vec!["second".to_string()]);
    }

    #[tokio::test]
    async fn test_precomputed_dimension_mismatch() {
        let index = external_index();
        let result = index
            .index_with_embeddings(vec![("text".to_string(), vec![1.0])])
            .await;
        assert!(matches!(result, Err(RagError::InvalidConfiguration(_))));
    }

    #[tokio::test]
    async fn test_stats() {
        let index = internal_index();
        let report = index
            .index(vec!["one".to_string(), "two".to_string()])
            .await
            .unwrap();

        let stats = index.stats().await;
        assert_eq!(stats.generation_id, Some(report.generation_id));
        assert_eq!(stats.chunk_count, 2);
        assert_eq!(stats.embedder, "hashing:384");
        assert_eq!(stats.mode, "internal");
        assert!(!stats.persistent);
    }
}
