//! Strictly Arena - Unified CLI
//!
//! Game server, terminal client, and history viewer.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use strictly_arena::{
    Acceptor, ClientConfig, JsonResultStore, MatchRegistry, RelayExit, ResultLog, ServerConfig,
};
use tracing::{info, instrument};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            config,
            host,
            port,
            history,
        } => run_server(config, host, port, history).await,
        Command::Connect { config, addr } => run_client(config, addr).await,
        Command::History { path } => show_history(path).await,
    }
}

/// Run the game server until the process is killed
#[instrument(skip_all)]
async fn run_server(
    config_path: Option<std::path::PathBuf>,
    host: Option<String>,
    port: Option<u16>,
    history: Option<std::path::PathBuf>,
) -> Result<()> {
    initialize_tracing("info,strictly_arena=debug");

    info!("Starting Tic Tac Toe server");

    let config = match config_path {
        Some(path) => ServerConfig::from_file(path)?,
        None => ServerConfig::default(),
    }
    .with_overrides(host, port, history);

    let results = ResultLog::new(JsonResultStore::new(config.history_path()));
    let acceptor = Acceptor::bind(&config, MatchRegistry::new(), results)
        .await
        .with_context(|| format!("failed to listen on {}", config.bind_addr()))?;

    info!(addr = %acceptor.local_addr()?, "Server started");
    acceptor.run().await;

    Ok(())
}

/// Run the terminal client relay
#[instrument]
async fn run_client(config_path: Option<std::path::PathBuf>, addr: Option<String>) -> Result<()> {
    // Keep the terminal clean; logs only when asked for.
    initialize_tracing("warn");

    let config = match config_path {
        Some(path) => ClientConfig::from_file(path)?,
        None => ClientConfig::default(),
    }
    .with_override(addr);
    let addr = config.server_addr();

    println!("Starting Tic Tac Toe client...");
    let exit = strictly_arena::connect(addr)
        .await
        .with_context(|| format!("failed to connect to {addr}"))?;

    if exit == RelayExit::ServerClosed {
        println!("Connection closed by server");
    }
    Ok(())
}

/// Print the persisted result history
#[instrument]
async fn show_history(path: std::path::PathBuf) -> Result<()> {
    initialize_tracing("warn");

    let entries = JsonResultStore::new(&path).load().await?;
    if entries.is_empty() {
        println!("No matches recorded in {}", path.display());
    }
    for entry in entries {
        println!(
            "{}  {} (X) vs {} (O)  winner: {}",
            entry.game_id(),
            entry.player1(),
            entry.player2(),
            entry.winner()
        );
        print!("{}", entry.board());
    }
    Ok(())
}

fn initialize_tracing(default_filter: &str) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
