//! pdf-rag CLI entry point.

use anyhow::Result;
use clap::Parser;

use pdf_rag::cli::commands::{self, ask, chat, index, status};
use pdf_rag::cli::{Cli, Commands};
use pdf_rag::infrastructure::logging::LoggerImpl;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(&cli).await {
        pdf_rag::cli::handle_error(&err, cli.json);
    }
}

async fn run(cli: &Cli) -> Result<()> {
    let config = commands::load_config(cli.config.as_deref())?;
    let _logger = LoggerImpl::init(&config.logging)?;
    let service = commands::build_service(&config).await?;

    match &cli.command {
        Commands::Index(args) => index::execute(&service, args.clone(), cli.json).await,
        Commands::Ask(args) => ask::execute(&service, args.clone(), cli.json).await,
        Commands::Chat(args) => chat::execute(&service, args.clone(), cli.json).await,
        Commands::Status => status::execute(&service, &config, cli.json).await,
    }
}
