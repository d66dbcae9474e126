//! Infrastructure layer module
//!
//! This module contains all infrastructure adapters and external integrations:
//! - Configuration management
//! - Credential pool for the generation backend
//! - Embedding services (built-in hashing, OpenAI-compatible HTTP)
//! - Text extraction
//! - Gemini API client
//! - Logging infrastructure
//! - Chunking, vector index and `SQLite` persistence
//!
//! Infrastructure implementations satisfy the port traits defined in the domain layer.

pub mod config;
pub mod credentials;
pub mod embeddings;
pub mod extraction;
pub mod gemini;
pub mod logging;
pub mod vector;
