//! Google Gemini generation backend

pub mod client;
pub mod errors;
pub mod types;

pub use client::{GeminiBackend, GeminiClientConfig};
pub use errors::GeminiApiError;
pub use types::{GenerateContentRequest, GenerateContentResponse};
