//! Word-window text chunking
//!
//! Splits document text on whitespace and emits overlapping windows of words.

use crate::domain::errors::RagResult;
use crate::domain::models::{ChunkingConfig, DocumentChunk};

/// Overlapping word-window chunker
///
/// Windows hold `chunk_size` words and start `chunk_size - chunk_overlap`
/// words apart. The trailing windows may be shorter than `chunk_size`.
#[derive(Debug, Clone, Copy)]
pub struct WordChunker {
    config: ChunkingConfig,
}

impl WordChunker {
    /// Create a new chunker with default configuration
    pub fn new() -> Self {
        Self {
            config: ChunkingConfig::default(),
        }
    }

    /// Create a new chunker with custom configuration
    ///
    /// Fails with `InvalidConfiguration` when the overlap is not smaller than
    /// the chunk size.
    pub fn with_config(config: ChunkingConfig) -> RagResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Active configuration
    pub const fn config(&self) -> ChunkingConfig {
        self.config
    }

    /// Chunk text into plain strings
    pub fn chunk(&self, text: &str) -> Vec<String> {
        self.chunk_document(text)
            .into_iter()
            .map(|chunk| chunk.text)
            .collect()
    }

    /// Chunk text, keeping ids and word spans
    pub fn chunk_document(&self, text: &str) -> Vec<DocumentChunk> {
        let words: Vec<&str> = text.split_whitespace().collect();
        if words.is_empty() {
            return Vec::new();
        }

        let step = self.config.step();

        (0..words.len())
            .step_by(step)
            .enumerate()
            .map(|(id, start)| {
                let end = (start + self.config.chunk_size).min(words.len());
                DocumentChunk::new(id, words[start..end].join(" "), start, end)
            })
            .collect()
    }
}

impl Default for WordChunker {
    fn default() -> Self {
        Self::new()
    }
}

/// Chunk `text` with explicit parameters
pub fn chunk(text: &str, chunk_size: usize, overlap: usize) -> RagResult<Vec<String>> {
    let chunker = WordChunker::with_config(ChunkingConfig::new(chunk_size, overlap)?)?;
    Ok(chunker.chunk(text))
}
