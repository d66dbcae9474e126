//! Built-in hashing embedder
//!
//! Maps each lowercase alphanumeric term to a bucket with FNV-1a and counts
//! occurrences, then L2-normalizes. No model download, no network; it is the
//! vector index's internal embedding function.

use async_trait::async_trait;

use crate::domain::errors::{RagError, RagResult};
use crate::domain::ports::EmbeddingService;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Deterministic term-hashing embedder
#[derive(Debug, Clone, Copy)]
pub struct HashEmbedder {
    dimensions: usize,
}

impl HashEmbedder {
    /// Create an embedder producing `dimensions`-wide vectors
    pub fn new(dimensions: usize) -> RagResult<Self> {
        if dimensions == 0 {
            return Err(RagError::InvalidConfiguration(
                "embedding dimensions must be greater than 0".to_string(),
            ));
        }
        Ok(Self { dimensions })
    }

    /// Embed synchronously; the async trait methods delegate here
    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0_f32; self.dimensions];

        for term in terms(text) {
            let bucket = bucket_for(&term, self.dimensions);
            vector[bucket] += 1.0;
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut vector {
                *value /= norm;
            }
        }

        vector
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self { dimensions: 384 }
    }
}

/// Lowercased alphanumeric terms of `text`
fn terms(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|term| !term.is_empty())
        .map(str::to_lowercase)
}

#[allow(clippy::cast_possible_truncation)]
fn bucket_for(term: &str, dimensions: usize) -> usize {
    let hash = term.bytes().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
    });
    (hash % dimensions as u64) as usize
}

#[async_trait]
impl EmbeddingService for HashEmbedder {
    fn name(&self) -> &str {
        "hashing"
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed(&self, text: &str) -> RagResult<Vec<f32>> {
        Ok(self.embed_text(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> RagResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|text| self.embed_text(text)).collect())
    }
}
