//! Text extraction port.

use async_trait::async_trait;
use std::path::Path;

use crate::domain::errors::RagResult;

/// Turns an uploaded file into plain text.
///
/// `Ok(None)` means the file held no extractable text; callers treat it as
/// "nothing to index". Unreadable files fail with `ExtractionFailed`.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Extract the text of the file at `path`
    async fn extract(&self, path: &Path) -> RagResult<Option<String>>;
}
