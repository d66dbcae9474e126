//! Command-line front end
//!
//! Thin wiring over [`RagService`](crate::services::RagService): argument
//! parsing, configuration loading and terminal output.

pub mod commands;
pub mod output;
pub mod types;

pub use types::{AskArgs, ChatArgs, Cli, Commands, IndexArgs};

use console::style;

/// Print a command failure and exit with a non-zero status
pub fn handle_error(err: &anyhow::Error, json: bool) -> ! {
    if json {
        let chain: Vec<String> = err.chain().map(ToString::to_string).collect();
        println!(
            "{}",
            serde_json::json!({ "error": err.to_string(), "causes": chain })
        );
    } else {
        eprintln!("{} {err}", style("Error:").red().bold());
        for cause in err.chain().skip(1) {
            eprintln!("  {} {cause}", style("caused by:").dim());
        }
    }
    std::process::exit(1)
}
