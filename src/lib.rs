//! Strictly Othello library - client for a server-hosted Othello game
//!
//! The server owns the rules, the AI, and the game state. This crate keeps a
//! read-only copy of that state in sync, lets the human submit moves, and
//! orchestrates the server's asynchronous AI turns.
//!
//! # Architecture
//!
//! - **Game**: board, snapshot, and task value types
//! - **Api**: the [`GameApi`] seam and its REST implementation
//! - **Store**: the single last-known snapshot, guarded by an epoch
//! - **Render**: pure snapshot-to-view projection
//! - **Controller**: move submission, AI-turn state machine, reset
//! - **Tui**: ratatui front end
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use strictly_othello::{ClientConfig, GameController, RestGameClient};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ClientConfig::default();
//! let client = RestGameClient::new(config.server_url().clone(), config.request_timeout())?;
//! let (mut controller, _events) = GameController::new(Arc::new(client), config.timing());
//! controller.attach().await;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod api;
mod config;
pub mod controller;
mod error;
pub mod game;
mod render;
mod store;
pub mod tui;

// Crate-level exports - Configuration
pub use config::ClientConfig;

// Crate-level exports - Errors
pub use error::{ClientError, ClientErrorKind};

// Crate-level exports - Server access
pub use api::{AiStart, GameApi, MoveVerdict, RestGameClient};

// Crate-level exports - State
pub use store::{Resync, SnapshotStore};

// Crate-level exports - Rendering
pub use render::{BoardView, CellView, StatusMessage};

// Crate-level exports - Controller
pub use controller::{
    AiPhase, AiTurnOutcome, ClickOutcome, Command, GameController, GameEvent, IgnoreReason,
    Notice, TurnTiming,
};

// Crate-level exports - Game types
pub use game::{
    BOARD_SIZE, Board, CELL_COUNT, Cell, Coord, GameSnapshot, LegalMoveSet, Mover, Outcome, Step,
    TaskId, TaskState,
};
