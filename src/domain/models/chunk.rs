//! Document chunk domain models
//!
//! Models for splitting a document into overlapping word windows and for the
//! ranked results that come back out of the vector index.

use serde::{Deserialize, Serialize};

use crate::domain::errors::{RagError, RagResult};

/// Configuration for word-window chunking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ChunkingConfig {
    /// Number of words per chunk
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Number of words shared by consecutive chunks
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
}

const fn default_chunk_size() -> usize {
    1000
}

const fn default_chunk_overlap() -> usize {
    100
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
        }
    }
}

impl ChunkingConfig {
    /// Create a configuration, validating it immediately
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> RagResult<Self> {
        let config = Self {
            chunk_size,
            chunk_overlap,
        };
        config.validate()?;
        Ok(config)
    }

    /// Distance in words between the starts of consecutive chunks
    ///
    /// Zero for a configuration that fails [`Self::validate`].
    pub const fn step(&self) -> usize {
        self.chunk_size.saturating_sub(self.chunk_overlap)
    }

    /// Validate the chunking configuration
    ///
    /// An overlap that is not strictly smaller than the chunk size would give
    /// a non-positive step, so it is rejected rather than clamped.
    pub fn validate(&self) -> RagResult<()> {
        if self.chunk_size == 0 {
            return Err(RagError::InvalidConfiguration(
                "chunk_size must be greater than 0".to_string(),
            ));
        }

        if self.chunk_overlap >= self.chunk_size {
            return Err(RagError::InvalidConfiguration(format!(
                "chunk_overlap ({}) must be less than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }

        Ok(())
    }
}

/// A window of words taken from the indexed document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentChunk {
    /// Position of the chunk within its index generation (0-based)
    pub id: usize,

    /// The chunk text, words joined by single spaces
    pub text: String,

    /// Word offset of the first word in the source document
    pub word_start: Option<usize>,

    /// Word offset one past the last word in the source document
    pub word_end: Option<usize>,
}

impl DocumentChunk {
    /// Create a chunk with a known word span
    pub fn new(id: usize, text: String, word_start: usize, word_end: usize) -> Self {
        Self {
            id,
            text,
            word_start: Some(word_start),
            word_end: Some(word_end),
        }
    }

    /// Create a chunk from a bare string whose origin is unknown
    pub fn from_text(id: usize, text: String) -> Self {
        Self {
            id,
            text,
            word_start: None,
            word_end: None,
        }
    }

    /// Number of words covered by this chunk
    pub fn word_count(&self) -> usize {
        match (self.word_start, self.word_end) {
            (Some(start), Some(end)) => end - start,
            _ => self.text.split_whitespace().count(),
        }
    }

    /// Get a preview of the content (first 100 chars)
    pub fn preview(&self) -> String {
        if self.text.chars().count() <= 100 {
            self.text.clone()
        } else {
            let head: String = self.text.chars().take(100).collect();
            format!("{head}...")
        }
    }
}

/// A chunk returned from a similarity query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredChunk {
    /// Chunk id within the generation that answered the query
    pub id: usize,

    /// Chunk text
    pub text: String,

    /// Cosine distance to the query (0 = identical direction)
    pub distance: f32,
}

impl ScoredChunk {
    /// Cosine similarity corresponding to the stored distance
    pub fn similarity(&self) -> f32 {
        1.0 - self.distance
    }
}
