//! Page-by-page document text assembly

use tracing::error;

/// Page header inserted before each page's text
fn page_header(page_number: usize) -> String {
    format!("\n=== Page {page_number} ===\n")
}

#[derive(Debug, Clone)]
enum Page {
    Text(String),
    Failed(String),
}

/// Text of a multi-page document, gathered one page at a time
///
/// Pages are numbered from 1 in the order they are pushed, including pages
/// that failed or held no text.
#[derive(Debug, Clone, Default)]
pub struct PagedText {
    pages: Vec<Page>,
}

impl PagedText {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the extracted text of the next page
    pub fn push_page(&mut self, text: impl Into<String>) {
        self.pages.push(Page::Text(text.into()));
    }

    /// Record that the next page could not be extracted
    pub fn push_failed(&mut self, reason: impl Into<String>) {
        self.pages.push(Page::Failed(reason.into()));
    }

    /// Number of pages pushed so far
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Join the pages under `=== Page N ===` headers
    ///
    /// Failed pages are logged and skipped, empty pages contribute nothing,
    /// and the result is trimmed. `None` when no text remains.
    pub fn assemble(&self) -> Option<String> {
        let mut text = String::new();

        for (index, page) in self.pages.iter().enumerate() {
            let page_number = index + 1;
            match page {
                Page::Text(page_text) if !page_text.is_empty() => {
                    text.push_str(&page_header(page_number));
                    text.push_str(page_text);
                }
                Page::Text(_) => {}
                Page::Failed(reason) => {
                    error!(page = page_number, %reason, "error extracting text from page");
                }
            }
        }

        let trimmed = text.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

impl<S: Into<String>> FromIterator<S> for PagedText {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut paged = Self::new();
        for page in iter {
            paged.push_page(page);
        }
        paged
    }
}
