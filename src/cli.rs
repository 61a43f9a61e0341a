//! Command-line interface for strictly_arena.

use clap::{Parser, Subcommand};

/// Strictly Arena - two-player tic-tac-toe over TCP
#[derive(Parser, Debug)]
#[command(name = "strictly_arena")]
#[command(about = "Two-player tic-tac-toe server and terminal client", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the game server
    Serve {
        /// Path to a TOML config file
        #[arg(short, long)]
        config: Option<std::path::PathBuf>,

        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Result history file (overrides config)
        #[arg(long)]
        history: Option<std::path::PathBuf>,
    },

    /// Connect to a server and play from the terminal
    Connect {
        /// Path to a TOML config file
        #[arg(short, long)]
        config: Option<std::path::PathBuf>,

        /// Server address (overrides config)
        #[arg(short, long)]
        addr: Option<String>,
    },

    /// Print the results recorded in a history file
    History {
        /// Result history file
        #[arg(long, default_value = "history.json")]
        path: std::path::PathBuf,
    },
}
