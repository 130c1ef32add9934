//! Terminal UI for Strictly Othello

#![warn(missing_docs)]

mod app;
mod input;
mod ui;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;
use tracing::{error, info, instrument, warn};
use tracing_subscriber::EnvFilter;

use crate::api::RestGameClient;
use crate::config::ClientConfig;
use crate::controller::{Command, GameController, GameEvent};
use app::App;

const FRAME_POLL: Duration = Duration::from_millis(50);

/// Run the TUI client
pub async fn run_tui(config: ClientConfig) -> Result<()> {
    // Log to a file so output does not interfere with the terminal
    let log_file = std::fs::File::create(config.log_file())?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,strictly_othello=debug")),
        )
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .try_init();

    info!(server_url = %config.server_url(), "Starting Strictly Othello TUI");

    let client = RestGameClient::new(config.server_url().clone(), config.request_timeout())?;
    let (controller, mut event_rx) = GameController::new(Arc::new(client), config.timing());
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let controller_task = tokio::spawn(controller.run(command_rx));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut event_rx, &command_tx).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if command_tx.send(Command::Quit).is_err() {
        warn!("Controller already stopped");
    }
    if let Err(e) = controller_task.await {
        error!(error = %e, "Controller task failed");
    }

    if let Err(err) = &res {
        error!(error = ?err, "Game loop error");
        eprintln!("Error: {:?}", err);
    }

    res
}

/// Draws, drains controller events, and forwards key presses until quit.
#[instrument(skip_all)]
async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    event_rx: &mut mpsc::UnboundedReceiver<GameEvent>,
    command_tx: &mpsc::UnboundedSender<Command>,
) -> Result<()> {
    let mut app = App::new();

    loop {
        while let Ok(event) = event_rx.try_recv() {
            app.handle_event(event);
        }

        terminal.draw(|f| ui::draw(f, &app))?;

        if event::poll(FRAME_POLL)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && let Some(command) = input::handle_key(&mut app, key.code)
        {
            let quit = command == Command::Quit;
            if command_tx.send(command).is_err() {
                warn!("Controller stopped, leaving");
                return Ok(());
            }
            if quit {
                info!("User quit");
                return Ok(());
            }
        }

        tokio::task::yield_now().await;
    }
}
