//! `pdf-rag index` command

use anyhow::{Context, Result};
use console::style;

use crate::cli::output::{create_spinner_with_message, ProgressBarExt};
use crate::cli::types::IndexArgs;
use crate::infrastructure::extraction::DocumentExtractor;
use crate::services::RagService;

/// Handle the index command
pub async fn execute(service: &RagService, args: IndexArgs, json: bool) -> Result<()> {
    let spinner = create_spinner_with_message(!json, format!("Indexing {}", args.file.display()));

    let chunk_count = match service.index_file(&args.file, &DocumentExtractor::new()).await {
        Ok(count) => count,
        Err(err) => {
            spinner.finish_error("Indexing failed");
            return Err(err).with_context(|| format!("Failed to index {}", args.file.display()));
        }
    };
    let stats = service.stats().await;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "file": args.file.display().to_string(),
                "chunks": chunk_count,
                "generation_id": stats.generation_id,
                "embedder": stats.embedder,
            }))?
        );
    } else if chunk_count == 0 {
        spinner.finish_error("No text found; the index is now empty");
    } else {
        spinner.finish_success(format!(
            "Indexed {} chunk{} from {}",
            style(chunk_count).bold(),
            if chunk_count == 1 { "" } else { "s" },
            args.file.display()
        ));
    }

    Ok(())
}
