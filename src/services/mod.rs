//! Service layer
//!
//! Query-time policy and orchestration on top of the infrastructure:
//! retrieval, key-rotating generation, prompt composition and the RAG facade.

pub mod answer_composer;
pub mod key_rotating_client;
pub mod rag_service;
pub mod retriever;

pub use answer_composer::{build_prompt, classify, AnswerComposer, SMALL_TALK_PHRASES};
pub use key_rotating_client::KeyRotatingClient;
pub use rag_service::{Answer, RagService};
pub use retriever::{Retriever, DEFAULT_TOP_K};
