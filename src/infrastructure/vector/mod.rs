//! Vector infrastructure components
//!
//! Word chunking, the single-document vector index, and its `SQLite`
//! persistence.

pub mod chunker;
pub mod sqlite_store;
pub mod vector_store;

pub use chunker::WordChunker;
pub use sqlite_store::SqliteChunkStore;
pub use vector_store::{cosine_distance, IndexMode, IndexReport, IndexStats, VectorIndex};
