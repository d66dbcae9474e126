//! `pdf-rag ask` command

use anyhow::{Context, Result};
use console::style;

use crate::cli::output::{create_spinner_with_message, ProgressBarExt};
use crate::cli::types::AskArgs;
use crate::infrastructure::extraction::DocumentExtractor;
use crate::services::RagService;

/// Handle the ask command
pub async fn execute(service: &RagService, args: AskArgs, json: bool) -> Result<()> {
    if let Some(file) = &args.file {
        let spinner = create_spinner_with_message(!json, format!("Indexing {}", file.display()));
        let chunks = service
            .index_file(file, &DocumentExtractor::new())
            .await
            .with_context(|| format!("Failed to index {}", file.display()))?;
        spinner.finish_success(format!("Indexed {chunks} chunks"));
    }

    let spinner = create_spinner_with_message(!json, "Thinking...");
    let answer = service.ask_with_sources(&args.question, args.top_k).await;
    spinner.finish_and_clear();

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "question": args.question,
                "answer": answer.text,
                "sources": answer.sources,
            }))?
        );
        return Ok(());
    }

    println!("{}", answer.text);

    if args.verbose {
        println!();
        if answer.sources.is_empty() {
            println!("{}", style("No chunks retrieved.").dim());
        }
        for source in &answer.sources {
            println!(
                "{} {}",
                style(format!("[chunk {} · distance {:.3}]", source.id, source.distance)).cyan(),
                preview(&source.text)
            );
        }
    }

    Ok(())
}

fn preview(text: &str) -> String {
    const MAX_CHARS: usize = 120;
    if text.chars().count() <= MAX_CHARS {
        text.to_string()
    } else {
        let head: String = text.chars().take(MAX_CHARS).collect();
        format!("{head}...")
    }
}
