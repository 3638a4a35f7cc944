//! Board Game Helper server
//!
//! Upload a rulebook PDF, then ask questions about it over HTTP.

use anyhow::Context;
use clap::Parser;
use helper_core::{config::AppConfig, logging};
use helper_knowledge::KnowledgeService;
use helper_server::{create_app, AppState};
use std::path::PathBuf;

/// Board Game Helper - question answering over uploaded rulebooks
#[derive(Parser, Debug)]
#[command(name = "boardgame-helper")]
#[command(about = "Question answering over uploaded board game rulebooks", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(short, long, env = "HELPER_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    no_color: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    let mut config = AppConfig::load_from(cli.config.as_deref())?.with_overrides(
        cli.host,
        cli.port,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );
    if cli.json_logs {
        config.logging.json = true;
    }

    logging::init_logging(
        config.logging.level.as_deref(),
        !config.logging.color,
        config.logging.json,
    )?;

    config.validate()?;

    tracing::info!("Board Game Helper starting");
    tracing::debug!("Config file: {:?}", config.config_file);
    tracing::debug!("LLM: {} ({})", config.llm.provider, config.llm.model);
    tracing::debug!(
        "Embeddings: {} ({}, {} dims)",
        config.embedding.provider,
        config.embedding.model,
        config.embedding.dimensions
    );
    tracing::debug!(
        "Chunking: {} chars, {} overlap, {:?}",
        config.chunking.chunk_size,
        config.chunking.chunk_overlap,
        config.chunking.strategy
    );

    if config.requires_api_key() && config.api_key.is_none() {
        tracing::warn!(
            "{} is not set; upload and chat requests will fail until it is",
            helper_core::config::API_KEY_ENV
        );
    }

    let service = KnowledgeService::from_config(&config)?;
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let app = create_app(AppState::new(config, service));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Listening on http://{}", addr);

    let result = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    match &result {
        Ok(_) => tracing::info!("Server stopped"),
        Err(e) => tracing::error!("Server failed: {}", e),
    }

    Ok(result?)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
