//! Move submitter: gates clicks and hands accepted moves to the AI turn.

use tracing::{debug, error, info, instrument, warn};

use super::GameController;
use super::ai_turn::AiPhase;
use super::events::{GameEvent, Notice};
use crate::api::MoveVerdict;
use crate::game::Coord;

/// Why a click was dropped without contacting the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// No snapshot has been fetched yet.
    NoSnapshot,
    /// The game is over.
    GameOver,
    /// It is not the human's turn.
    NotHumanTurn,
    /// An AI turn is still running.
    AiTurnActive,
    /// The cell holds a stone.
    Occupied,
    /// The cell is not in the last rendered legal-move set.
    NotLegal,
}

/// Result of a cell click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Dropped locally; no request was made.
    Ignored(IgnoreReason),
    /// The server refused the move; nothing was resynced.
    Rejected,
    /// The move was applied, resynced, and an AI turn was scheduled.
    Accepted {
        /// Number of the AI turn that was spawned, if one could be.
        ai_turn: Option<u64>,
    },
    /// The submission never reached a verdict.
    Failed,
}

impl GameController {
    /// Checks whether a click on `coord` may be submitted.
    pub fn gate_click(&self, coord: Coord) -> Result<(), IgnoreReason> {
        let snapshot = self.snapshot().ok_or(IgnoreReason::NoSnapshot)?;
        if snapshot.game_over() {
            return Err(IgnoreReason::GameOver);
        }
        if !snapshot.is_human_turn() {
            return Err(IgnoreReason::NotHumanTurn);
        }
        if self.is_ai_turn_active() {
            return Err(IgnoreReason::AiTurnActive);
        }
        if !snapshot.board().get(coord).is_empty() {
            return Err(IgnoreReason::Occupied);
        }
        let legal = self.legal_moves().ok_or(IgnoreReason::NotLegal)?;
        if legal.mover() != Some(snapshot.current_mover()) || !legal.contains(coord) {
            return Err(IgnoreReason::NotLegal);
        }
        Ok(())
    }

    /// Handles a click on `coord`.
    ///
    /// Only a legal, empty cell on the human's turn produces a request. On
    /// acceptance the board is resynced and rendered before the AI turn is
    /// spawned; on rejection nothing local changes.
    #[instrument(skip(self), fields(coord = %coord))]
    pub async fn click(&mut self, coord: Coord) -> ClickOutcome {
        // A turn that already reported Idle has rendered its final board and
        // is only returning; let it finish rather than drop the click.
        if self.phase() == AiPhase::Idle && self.is_ai_turn_active() {
            debug!("AI turn finishing, waiting before gating click");
            self.wait_for_ai_turn().await;
        }

        if let Err(reason) = self.gate_click(coord) {
            debug!(?reason, "Click ignored");
            return ClickOutcome::Ignored(reason);
        }

        let verdict = match self.ctx.api().submit_move(coord).await {
            Ok(verdict) => verdict,
            Err(e) => {
                error!(error = %e, "Failed to make move");
                self.ctx.emit(GameEvent::Notice(Notice::ServerUnreachable));
                return ClickOutcome::Failed;
            }
        };

        match verdict {
            MoveVerdict::Rejected { reason } => {
                warn!(?reason, "Server rejected move");
                self.ctx.emit(GameEvent::Notice(Notice::InvalidMove));
                ClickOutcome::Rejected
            }
            MoveVerdict::Accepted => {
                info!("Move accepted, resyncing before AI turn");
                self.refresh().await;
                let ai_turn = match self.start_ai_turn() {
                    Ok(number) => Some(number),
                    Err(e) => {
                        warn!(error = %e, "Could not schedule AI turn");
                        None
                    }
                };
                ClickOutcome::Accepted { ai_turn }
            }
        }
    }
}
