//! Lifecycle controller: first attach and reset.

use tracing::{info, instrument, warn};

use super::GameController;
use super::events::GameEvent;

impl GameController {
    /// Initial synchronisation. If the server says the AI is to move, its
    /// turn starts right away so a restarted client picks the game back up.
    #[instrument(skip(self))]
    pub async fn attach(&mut self) {
        info!("Attaching to game");
        self.refresh().await;

        if self.snapshot().is_some_and(|s| s.is_ai_turn() && !s.game_over()) {
            info!("AI to move on attach, resuming its turn");
            if let Err(e) = self.start_ai_turn() {
                warn!(error = %e, "Could not resume AI turn");
            }
        }
    }

    /// Starts a fresh game.
    ///
    /// Any running AI turn is cancelled and awaited first, then the store's
    /// epoch moves on so nothing fetched for the old game can land on the
    /// new one.
    #[instrument(skip(self))]
    pub async fn reset(&mut self) {
        info!("Resetting game");

        if let Some(outcome) = self.cancel_ai_turn().await {
            info!(?outcome, "AI turn stopped for reset");
            self.ctx.emit(GameEvent::Thinking(false));
        }
        self.ctx.store().advance_epoch();

        if let Err(e) = self.ctx.api().reset().await {
            warn!(error = %e, "Reset request failed");
            return;
        }

        self.refresh().await;
    }
}
