//! Plain-text file extractor

use async_trait::async_trait;
use std::path::Path;
use tracing::{debug, instrument};

use super::paged_text::PagedText;
use crate::domain::errors::{RagError, RagResult};
use crate::domain::ports::TextExtractor;

const FORM_FEED: char = '\u{c}';

/// Reads UTF-8 text files, such as `pdftotext` output
///
/// Form feeds are treated as page breaks, so multi-page dumps are assembled
/// with page headers.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

impl PlainTextExtractor {
    /// Create a plain-text extractor
    pub const fn new() -> Self {
        Self
    }

    /// Extract from an in-memory string
    pub fn extract_str(content: &str) -> Option<String> {
        if content.contains(FORM_FEED) {
            let mut pages: Vec<&str> = content.split(FORM_FEED).collect();
            // pdftotext ends every page, including the last, with a form feed
            if pages.last().is_some_and(|p| p.trim().is_empty()) {
                pages.pop();
            }
            return pages.into_iter().map(str::trim).collect::<PagedText>().assemble();
        }

        let trimmed = content.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

#[async_trait]
impl TextExtractor for PlainTextExtractor {
    #[instrument(skip(self), fields(path = %path.display()))]
    async fn extract(&self, path: &Path) -> RagResult<Option<String>> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            RagError::ExtractionFailed(format!("cannot read {}: {e}", path.display()))
        })?;

        let content = String::from_utf8(bytes).map_err(|e| {
            RagError::ExtractionFailed(format!("{} is not UTF-8 text: {e}", path.display()))
        })?;

        let text = Self::extract_str(&content);
        debug!(
            chars = text.as_ref().map_or(0, String::len),
            "extracted document text"
        );
        Ok(text)
    }
}
