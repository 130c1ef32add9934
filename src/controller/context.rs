//! State shared between the controller and its AI-turn task.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use derive_new::new;
use tokio::sync::{mpsc, watch};
use tracing::{debug, instrument, warn};

use super::ai_turn::AiPhase;
use super::events::GameEvent;
use crate::api::GameApi;
use crate::game::{GameSnapshot, LegalMoveSet};
use crate::render::BoardView;
use crate::store::SnapshotStore;

/// Fixed delays that pace the AI-turn protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, new)]
pub struct TurnTiming {
    /// Interval between AI-task polls.
    pub poll_interval: Duration,
    /// Pause before each AI-turn start, so the previous render settles.
    pub turn_delay: Duration,
    /// How long one AI task may stay unresolved before the turn is abandoned.
    pub task_deadline: Duration,
}

impl Default for TurnTiming {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(2000),
            turn_delay: Duration::from_millis(100),
            task_deadline: Duration::from_secs(120),
        }
    }
}

/// The single explicit state object of the client.
pub(crate) struct ControllerContext {
    api: Arc<dyn GameApi>,
    store: SnapshotStore,
    legal: Mutex<Option<LegalMoveSet>>,
    events: mpsc::UnboundedSender<GameEvent>,
    phase: watch::Sender<AiPhase>,
    timing: TurnTiming,
}

impl ControllerContext {
    pub(crate) fn new(
        api: Arc<dyn GameApi>,
        events: mpsc::UnboundedSender<GameEvent>,
        timing: TurnTiming,
    ) -> Self {
        Self {
            api,
            store: SnapshotStore::new(),
            legal: Mutex::new(None),
            events,
            phase: watch::Sender::new(AiPhase::Idle),
            timing,
        }
    }

    pub(crate) fn api(&self) -> &dyn GameApi {
        self.api.as_ref()
    }

    pub(crate) fn store(&self) -> &SnapshotStore {
        &self.store
    }

    pub(crate) fn timing(&self) -> TurnTiming {
        self.timing
    }

    pub(crate) fn phase(&self) -> AiPhase {
        *self.phase.borrow()
    }

    pub(crate) fn set_phase(&self, phase: AiPhase) {
        let previous = self.phase.send_replace(phase);
        if previous != phase {
            debug!(from = ?previous, to = ?phase, "AI turn phase");
        }
    }

    pub(crate) fn emit(&self, event: GameEvent) {
        if self.events.send(event).is_err() {
            debug!("Event receiver dropped");
        }
    }

    fn legal_slot(&self) -> MutexGuard<'_, Option<LegalMoveSet>> {
        self.legal.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Legal-move set of the most recent render, if it fetched one.
    pub(crate) fn legal_moves(&self) -> Option<LegalMoveSet> {
        self.legal_slot().clone()
    }

    /// Rebuilds the whole board view from the current snapshot, then, on
    /// the human's turn, annotates it with freshly fetched legal moves.
    ///
    /// The previous legal-move set is discarded first, whatever happens.
    #[instrument(skip(self))]
    pub(crate) async fn render(&self) -> Option<BoardView> {
        *self.legal_slot() = None;

        let Some(snapshot) = self.store.snapshot() else {
            debug!("Nothing to render yet");
            return None;
        };

        let view = BoardView::build(&snapshot, None);
        self.emit(GameEvent::BoardRendered(view.clone()));

        if snapshot.is_human_turn() {
            self.annotate(&snapshot).await.or(Some(view))
        } else {
            Some(view)
        }
    }

    /// Legal-move provider: fetches the mover's legal coordinates and
    /// overlays them on a fresh build of `snapshot`.
    #[instrument(skip_all)]
    async fn annotate(&self, snapshot: &GameSnapshot) -> Option<BoardView> {
        let coords = match self.api.fetch_legal_moves().await {
            Ok(coords) => coords,
            Err(e) => {
                warn!(error = %e, "Failed to fetch legal moves");
                return None;
            }
        };

        let legal = LegalMoveSet::new(snapshot.current_mover(), coords);
        debug!(count = legal.len(), "Annotating legal moves");
        let view = BoardView::build(snapshot, Some(&legal));
        *self.legal_slot() = Some(legal);
        self.emit(GameEvent::BoardRendered(view.clone()));
        Some(view)
    }
}
