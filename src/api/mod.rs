//! Game server contract.
//!
//! The server owns the rules and the AI. The client consumes six calls:
//! board fetch, legal-move fetch, move submission, AI-turn start, AI-task
//! poll and reset. [`GameApi`] is the seam the controller talks through;
//! [`RestGameClient`] implements it over HTTP.

mod http;
pub mod wire;

pub use http::RestGameClient;

use crate::error::ClientError;
use crate::game::{Coord, GameSnapshot, TaskId, TaskState};

/// Server verdict on a submitted move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveVerdict {
    /// Applied; the server state changed.
    Accepted,
    /// Refused; the server state is unchanged.
    Rejected {
        /// Reason given by the server, if any.
        reason: Option<String>,
    },
}

/// Immediate answer to an AI-turn start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AiStart {
    /// The AI had no legal move and made none.
    Passed,
    /// The AI is computing; poll this task.
    Task(TaskId),
}

/// Calls the controller makes against the game server.
#[async_trait::async_trait]
pub trait GameApi: Send + Sync {
    /// Reads the current authoritative state.
    async fn fetch_board(&self) -> Result<GameSnapshot, ClientError>;

    /// Reads the current mover's legal coordinates.
    async fn fetch_legal_moves(&self) -> Result<Vec<Coord>, ClientError>;

    /// Submits a human move.
    async fn submit_move(&self, coord: Coord) -> Result<MoveVerdict, ClientError>;

    /// Asks the server to start computing the AI's move.
    async fn start_ai_turn(&self) -> Result<AiStart, ClientError>;

    /// Reads the state of an AI task.
    async fn poll_ai_task(&self, task: &TaskId) -> Result<TaskState, ClientError>;

    /// Starts a fresh game.
    async fn reset(&self) -> Result<(), ClientError>;
}
