//! Messages between the controller and the front end.

use derive_more::Display;

use crate::game::Coord;
use crate::render::BoardView;

/// User-facing notification. The front end shows these as blocking modals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Notice {
    /// The server refused the submitted move.
    #[display("Invalid move.")]
    InvalidMove,
    /// The AI had no legal move.
    #[display("AI passed. It's your turn.")]
    AiPassed,
    /// The human has no legal move; the AI moves again.
    #[display("No moves available. Passing turn.")]
    HumanMustPass,
    /// The AI task ended in failure.
    #[display("An error occurred during the AI's turn.")]
    AiTaskFailed,
    /// The AI task did not finish before its deadline.
    #[display("The AI stopped responding.")]
    AiStalled,
    /// Polling the AI task failed at the transport level.
    #[display("Lost contact with the server while the AI was thinking.")]
    ConnectionLost,
    /// A move could not be delivered to the server.
    #[display("Could not reach the server.")]
    ServerUnreachable,
}

/// Messages sent from the controller to the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// The board was rebuilt.
    BoardRendered(BoardView),
    /// Show or hide the thinking overlay.
    Thinking(bool),
    /// Show a notification.
    Notice(Notice),
}

/// Input sent from the UI to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// The user activated a cell.
    Click(Coord),
    /// The user activated the reset control.
    Reset,
    /// The user wants to leave.
    Quit,
}
