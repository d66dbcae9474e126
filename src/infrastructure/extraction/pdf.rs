//! PDF text extractor
//!
//! Reads the document with `lopdf` and extracts each page on its own, so one
//! broken page costs only that page. Pages are assembled with [`PagedText`].

use async_trait::async_trait;
use lopdf::Document;
use std::fmt::Display;
use std::path::Path;
use tracing::{debug, instrument};

use super::paged_text::PagedText;
use crate::domain::errors::{RagError, RagResult};
use crate::domain::ports::TextExtractor;

/// Extracts the text layer of PDF files page by page
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    /// Create a PDF extractor
    pub const fn new() -> Self {
        Self
    }

    /// Extract text from an in-memory PDF
    ///
    /// Fails with `ExtractionFailed` when the bytes are not a readable PDF.
    pub fn extract_bytes(bytes: &[u8]) -> RagResult<Option<String>> {
        let document = Document::load_mem(bytes)
            .map_err(|e| RagError::ExtractionFailed(format!("not a readable PDF: {e}")))?;

        let page_numbers: Vec<u32> = document.get_pages().into_keys().collect();
        debug!(pages = page_numbers.len(), "loaded PDF");

        Ok(assemble_pages(
            page_numbers
                .iter()
                .map(|page_number| document.extract_text(&[*page_number])),
        ))
    }
}

/// Collect per-page extraction results; failed pages are logged and skipped
fn assemble_pages<E: Display>(
    pages: impl IntoIterator<Item = Result<String, E>>,
) -> Option<String> {
    let mut paged = PagedText::new();
    for page in pages {
        match page {
            Ok(text) => paged.push_page(text.trim()),
            Err(err) => paged.push_failed(err.to_string()),
        }
    }
    paged.assemble()
}

#[async_trait]
impl TextExtractor for PdfTextExtractor {
    #[instrument(skip(self), fields(path = %path.display()))]
    async fn extract(&self, path: &Path) -> RagResult<Option<String>> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            RagError::ExtractionFailed(format!("cannot read {}: {e}", path.display()))
        })?;

        let text = tokio::task::spawn_blocking(move || Self::extract_bytes(&bytes))
            .await
            .map_err(|e| RagError::ExtractionFailed(format!("PDF extraction aborted: {e}")))??;

        debug!(
            chars = text.as_ref().map_or(0, String::len),
            "extracted PDF text"
        );
        Ok(text)
    }
}
