//! Text extractors turning uploaded files into indexable text

pub mod document;
pub mod paged_text;
pub mod pdf;
pub mod plain_text;

pub use document::DocumentExtractor;
pub use paged_text::PagedText;
pub use pdf::PdfTextExtractor;
pub use plain_text::PlainTextExtractor;
