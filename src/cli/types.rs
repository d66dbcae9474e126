//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "pdf-rag")]
#[command(about = "Ask questions about a document with retrieval-augmented generation", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Load configuration from this YAML file instead of .pdf-rag/
    #[arg(short, long, global = true, env = "PDF_RAG_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract, chunk and index a document, replacing the previous one
    Index(IndexArgs),

    /// Answer a question about the indexed document
    Ask(AskArgs),

    /// Index a document, then answer questions read from stdin
    Chat(ChatArgs),

    /// Show the indexed document and configuration summary
    Status,
}

/// Arguments for `index`
#[derive(Args, Debug, Clone)]
pub struct IndexArgs {
    /// PDF or text file to index
    pub file: PathBuf,
}

/// Arguments for `ask`
#[derive(Args, Debug, Clone)]
pub struct AskArgs {
    /// The question to answer
    pub question: String,

    /// Number of chunks to retrieve
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,

    /// Index this file before answering
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Show the retrieved chunks and their distances
    #[arg(short, long)]
    pub verbose: bool,
}

/// Arguments for `chat`
#[derive(Args, Debug, Clone)]
pub struct ChatArgs {
    /// PDF or text file to index before the session starts
    pub file: PathBuf,
}
