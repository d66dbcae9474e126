//! `pdf-rag chat` command

use anyhow::{Context, Result};
use console::style;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::cli::output::{create_spinner_with_message, ProgressBarExt};
use crate::cli::types::ChatArgs;
use crate::infrastructure::extraction::DocumentExtractor;
use crate::services::RagService;

/// Handle the chat command
///
/// Indexes the file once, then answers one question per stdin line until
/// EOF or `exit`.
pub async fn execute(service: &RagService, args: ChatArgs, json: bool) -> Result<()> {
    let spinner = create_spinner_with_message(!json, format!("Indexing {}", args.file.display()));
    let chunks = service
        .index_file(&args.file, &DocumentExtractor::new())
        .await
        .with_context(|| format!("Failed to index {}", args.file.display()))?;
    spinner.finish_success(format!("Indexed {chunks} chunks. Ask away; `exit` to quit."));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        if !json {
            eprint!("{} ", style(">").green().bold());
            std::io::stderr().flush().ok();
        }

        let Some(line) = lines.next_line().await.context("Failed to read stdin")? else {
            break;
        };
        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if question.eq_ignore_ascii_case("exit") {
            break;
        }

        let answer = service.ask(question).await;
        if json {
            println!(
                "{}",
                serde_json::json!({ "question": question, "answer": answer })
            );
        } else {
            println!("{answer}\n");
        }
    }

    Ok(())
}
