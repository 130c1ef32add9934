//! Strictly Othello - terminal client
//!
//! Plays Othello against an AI hosted on a remote game server.

#![warn(missing_docs)]

mod cli;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use strictly_othello::{BoardView, ClientConfig, GameApi, LegalMoveSet, RestGameClient};
use tracing::{error, info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Command::Check) => run_check(&cli.config, cli.server_url).await,
        Some(Command::Play { log_file }) => run_play(&cli.config, cli.server_url, log_file).await,
        None => run_play(&cli.config, cli.server_url, None).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(path: &std::path::Path, server_url: Option<String>) -> Result<ClientConfig> {
    let config = ClientConfig::load(path).context("Failed to load configuration")?;
    Ok(match server_url {
        Some(url) => config.with_server_url(url),
        None => config,
    })
}

/// Run the terminal UI.
async fn run_play(
    config_path: &std::path::Path,
    server_url: Option<String>,
    log_file: Option<std::path::PathBuf>,
) -> Result<()> {
    let mut config = load_config(config_path, server_url)?;
    if let Some(log_file) = log_file {
        config = config.with_log_file(log_file);
    }
    strictly_othello::tui::run_tui(config).await
}

/// Fetch the board once and print it.
async fn run_check(config_path: &std::path::Path, server_url: Option<String>) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,strictly_othello=debug")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(config_path, server_url)?;
    check_server(&config).await
}

#[instrument(skip(config), fields(server_url = %config.server_url()))]
async fn check_server(config: &ClientConfig) -> Result<()> {
    info!("Checking game server");
    let client = RestGameClient::new(config.server_url().clone(), config.request_timeout())?;

    let snapshot = client.fetch_board().await.map_err(|e| {
        error!(error = %e, "Failed to fetch board");
        e
    })?;

    let legal = if snapshot.is_human_turn() {
        let coords = client.fetch_legal_moves().await?;
        Some(LegalMoveSet::new(snapshot.current_mover(), coords))
    } else {
        None
    };

    println!("{}", BoardView::build(&snapshot, legal.as_ref()));
    Ok(())
}
