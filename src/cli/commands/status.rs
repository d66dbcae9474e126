//! `pdf-rag status` command

use anyhow::Result;
use console::style;

use crate::domain::models::Config;
use crate::services::RagService;

/// Handle the status command
pub async fn execute(service: &RagService, config: &Config, json: bool) -> Result<()> {
    let stats = service.stats().await;
    let key_count = service.client().pool().len();

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "generation_id": stats.generation_id,
                "chunks": stats.chunk_count,
                "embedder": stats.embedder,
                "mode": stats.mode,
                "persistent": stats.persistent,
                "persist_path": config.index.persist_path,
                "model": config.generation.model,
                "api_keys": key_count,
                "chunk_size": config.chunking.chunk_size,
                "chunk_overlap": config.chunking.chunk_overlap,
                "top_k": config.retrieval.top_k,
            }))?
        );
        return Ok(());
    }

    println!("{}", style("Index").bold().underlined());
    match stats.generation_id {
        Some(id) => println!("  generation  {id}"),
        None => println!("  generation  {}", style("(empty)").dim()),
    }
    println!("  chunks      {}", stats.chunk_count);
    println!("  embedder    {} ({})", stats.embedder, stats.mode);
    println!(
        "  storage     {}",
        config.index.persist_path.as_deref().unwrap_or("in memory")
    );

    println!("{}", style("Generation").bold().underlined());
    println!("  model       {}", config.generation.model);
    let keys = if key_count == 0 {
        style("none configured".to_string()).red().to_string()
    } else {
        key_count.to_string()
    };
    println!("  api keys    {keys}");
    println!(
        "  chunking    {} words, {} overlap, top {}",
        config.chunking.chunk_size, config.chunking.chunk_overlap, config.retrieval.top_k
    );

    Ok(())
}
