//! Domain errors for the pdf-rag pipeline.

use thiserror::Error;

/// Errors raised by the indexing side of the pipeline.
///
/// Generation failures are not represented here: they never escape the
/// key-rotating client and surface as [`GenerationOutcome`] values instead.
///
/// [`GenerationOutcome`]: crate::domain::models::GenerationOutcome
#[derive(Debug, Error)]
pub enum RagError {
    /// Bad parameters or a mode mismatch; raised at construction
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// No chunks were supplied
    #[error("Nothing to index: input is empty")]
    EmptyInput,

    /// Backing store or embedder failed while indexing
    #[error("Vector index unavailable: {0}")]
    IndexUnavailable(String),

    /// The embedding service rejected the input
    #[error("Embedding failed: {0}")]
    EmbeddingFailed(String),

    /// The file could not be turned into text
    #[error("Text extraction failed: {0}")]
    ExtractionFailed(String),
}

/// Result alias for pipeline operations
pub type RagResult<T> = Result<T, RagError>;

impl RagError {
    /// Returns true if the error points at operator misconfiguration rather
    /// than at the document being processed.
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Self::InvalidConfiguration(_) | Self::IndexUnavailable(_))
    }
}

impl From<sqlx::Error> for RagError {
    fn from(err: sqlx::Error) -> Self {
        Self::IndexUnavailable(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_errors() {
        assert!(RagError::InvalidConfiguration("x".to_string()).is_configuration_error());
        assert!(RagError::IndexUnavailable("x".to_string()).is_configuration_error());
        assert!(!RagError::EmptyInput.is_configuration_error());
        assert!(!RagError::ExtractionFailed("x".to_string()).is_configuration_error());
        assert!(!RagError::EmbeddingFailed("x".to_string()).is_configuration_error());
    }

    #[test]
    fn test_sqlx_error_maps_to_index_unavailable() {
        let err: RagError = sqlx::Error::PoolClosed.into();
        assert!(matches!(err, RagError::IndexUnavailable(_)));
    }
}
