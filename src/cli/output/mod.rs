//! CLI output formatting module
//!
//! Spinners for long-running steps and styled terminal text.

pub mod progress;

pub use progress::{create_spinner, create_spinner_with_message, ProgressBarExt};
