//! Domain layer for pdf-rag
//!
//! Core models, errors, and the port traits infrastructure adapters implement.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{RagError, RagResult};
