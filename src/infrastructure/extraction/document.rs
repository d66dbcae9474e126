//! Extractor selection by file extension

use async_trait::async_trait;
use std::path::Path;

use super::pdf::PdfTextExtractor;
use super::plain_text::PlainTextExtractor;
use crate::domain::errors::RagResult;
use crate::domain::ports::TextExtractor;

/// Routes `.pdf` files to [`PdfTextExtractor`] and everything else to
/// [`PlainTextExtractor`]
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentExtractor {
    pdf: PdfTextExtractor,
    plain: PlainTextExtractor,
}

impl DocumentExtractor {
    /// Create an extractor covering PDF and plain-text files
    pub const fn new() -> Self {
        Self {
            pdf: PdfTextExtractor::new(),
            plain: PlainTextExtractor::new(),
        }
    }

    /// The extractor that handles `path`
    pub fn for_path(&self, path: &Path) -> &dyn TextExtractor {
        let is_pdf = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));

        if is_pdf {
            &self.pdf
        } else {
            &self.plain
        }
    }
}

#[async_trait]
impl TextExtractor for DocumentExtractor {
    async fn extract(&self, path: &Path) -> RagResult<Option<String>> {
        self.for_path(path).extract(path).await
    }
}
