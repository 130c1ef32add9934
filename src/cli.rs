//! Command-line interface for strictly_othello.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Strictly Othello - terminal client for an Othello server with a computer opponent
#[derive(Parser, Debug)]
#[command(name = "strictly_othello")]
#[command(about = "Play Othello against a server-side AI", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the client configuration file
    #[arg(short, long, global = true, default_value = "strictly_othello.toml")]
    pub config: PathBuf,

    /// Game server URL, overrides the configuration file
    #[arg(long, global = true, env = "OTHELLO_SERVER_URL")]
    pub server_url: Option<String>,

    /// Subcommand to run; defaults to `play`
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the terminal UI client
    Play {
        /// Log file path, overrides the configuration file
        #[arg(long)]
        log_file: Option<PathBuf>,
    },

    /// Fetch the board once, print it, and exit
    Check,
}
