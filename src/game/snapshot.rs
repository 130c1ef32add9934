//! Authoritative game state as reported by the server.

use derive_more::Display;
use tracing::instrument;

use super::board::{Board, CELL_COUNT};
use crate::error::ClientError;

/// Whichever side is entitled to act next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Mover {
    /// The local player, who plays black.
    #[display("Human")]
    Human,
    /// The server-hosted opponent, who plays white.
    #[display("AI")]
    Ai,
}

impl Mover {
    /// Decodes the server's `current_player` field (`1` black, `-1` white).
    #[track_caller]
    pub fn from_wire(value: i8) -> Result<Self, ClientError> {
        match value {
            1 => Ok(Mover::Human),
            -1 => Ok(Mover::Ai),
            other => Err(ClientError::protocol(format!(
                "Unknown current_player value {}",
                other
            ))),
        }
    }
}

/// Final result of a finished game, from the human's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Black finished with more stones.
    Win,
    /// White finished with more stones.
    Loss,
    /// Equal stone counts.
    Draw,
}

impl Outcome {
    /// Compares final stone counts.
    pub fn from_counts(black: u32, white: u32) -> Self {
        match black.cmp(&white) {
            std::cmp::Ordering::Greater => Outcome::Win,
            std::cmp::Ordering::Less => Outcome::Loss,
            std::cmp::Ordering::Equal => Outcome::Draw,
        }
    }
}

/// Last-known authoritative state. Replaced wholesale on every resync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    board: Board,
    black_count: u32,
    white_count: u32,
    current_mover: Mover,
    game_over: bool,
}

impl GameSnapshot {
    /// Creates a snapshot, rejecting stone counts that cannot fit on the board.
    #[instrument(skip(board))]
    pub fn new(
        board: Board,
        black_count: u32,
        white_count: u32,
        current_mover: Mover,
        game_over: bool,
    ) -> Result<Self, ClientError> {
        if black_count as usize + white_count as usize > CELL_COUNT {
            return Err(ClientError::protocol(format!(
                "Stone counts {} + {} exceed {} cells",
                black_count, white_count, CELL_COUNT
            )));
        }
        Ok(Self {
            board,
            black_count,
            white_count,
            current_mover,
            game_over,
        })
    }

    /// The board matrix.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Number of black stones.
    pub fn black_count(&self) -> u32 {
        self.black_count
    }

    /// Number of white stones.
    pub fn white_count(&self) -> u32 {
        self.white_count
    }

    /// Side to move.
    pub fn current_mover(&self) -> Mover {
        self.current_mover
    }

    /// Whether the game has ended.
    pub fn game_over(&self) -> bool {
        self.game_over
    }

    /// True when the human may act: it is their turn and the game is live.
    pub fn is_human_turn(&self) -> bool {
        !self.game_over && self.current_mover == Mover::Human
    }

    /// True when the AI should be asked to move.
    pub fn is_ai_turn(&self) -> bool {
        !self.game_over && self.current_mover == Mover::Ai
    }

    /// Final result, once the game is over.
    pub fn outcome(&self) -> Option<Outcome> {
        self.game_over
            .then(|| Outcome::from_counts(self.black_count, self.white_count))
    }
}
