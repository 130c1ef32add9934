//! Turn and task orchestration for the client.
//!
//! [`GameController`] owns the shared [`ControllerContext`](context) and at
//! most one running AI turn. Every state-mutating action follows the same
//! order: server call, resync, render. The front end talks to it either by
//! calling its methods directly or by feeding [`Command`]s into
//! [`GameController::run`].

mod ai_turn;
mod context;
mod events;
mod lifecycle;
mod submit;

pub use ai_turn::{AiPhase, AiTurnOutcome};
pub use context::TurnTiming;
pub use events::{Command, GameEvent, Notice};
pub use submit::{ClickOutcome, IgnoreReason};

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, warn};

use crate::api::GameApi;
use crate::error::{ClientError, ClientErrorKind};
use crate::game::{GameSnapshot, LegalMoveSet};
use ai_turn::AiTurn;
use context::ControllerContext;

/// The one AI turn allowed to run at a time.
#[derive(Debug)]
struct ActiveTurn {
    number: u64,
    cancel: CancellationToken,
    handle: JoinHandle<AiTurnOutcome>,
}

/// Client-side game controller.
pub struct GameController {
    ctx: Arc<ControllerContext>,
    active: Option<ActiveTurn>,
    turns_started: u64,
}

impl GameController {
    /// Creates a controller and the receiver its UI events arrive on.
    #[instrument(skip(api))]
    pub fn new(
        api: Arc<dyn GameApi>,
        timing: TurnTiming,
    ) -> (Self, mpsc::UnboundedReceiver<GameEvent>) {
        info!("Creating game controller");
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let controller = Self {
            ctx: Arc::new(ControllerContext::new(api, event_tx, timing)),
            active: None,
            turns_started: 0,
        };
        (controller, event_rx)
    }

    /// Copy of the last-known snapshot.
    pub fn snapshot(&self) -> Option<GameSnapshot> {
        self.ctx.store().snapshot()
    }

    /// Legal-move set of the most recent render.
    pub fn legal_moves(&self) -> Option<LegalMoveSet> {
        self.ctx.legal_moves()
    }

    /// Current phase of the AI-turn state machine.
    pub fn phase(&self) -> AiPhase {
        self.ctx.phase()
    }

    /// Number of AI turns started so far.
    pub fn turns_started(&self) -> u64 {
        self.turns_started
    }

    /// True while an AI turn task is still running.
    pub fn is_ai_turn_active(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|turn| !turn.handle.is_finished())
    }

    /// Resyncs and re-renders. Failures are logged and leave the snapshot stale.
    #[instrument(skip(self))]
    pub async fn refresh(&self) {
        if self.ctx.store().resync(self.ctx.api()).await.applied().is_some() {
            self.ctx.render().await;
        }
    }

    /// Spawns an AI turn. Refused while another one is still running.
    #[instrument(skip(self))]
    pub fn start_ai_turn(&mut self) -> Result<u64, ClientError> {
        if let Some(turn) = &self.active
            && !turn.handle.is_finished()
        {
            warn!(active = turn.number, "AI turn already running");
            return Err(ClientError::new(
                ClientErrorKind::Busy,
                format!("AI turn {} is still running", turn.number),
            ));
        }

        self.turns_started += 1;
        let number = self.turns_started;
        let cancel = CancellationToken::new();
        self.ctx.set_phase(AiPhase::Starting);
        let turn = AiTurn::new(Arc::clone(&self.ctx), cancel.clone());
        let handle = tokio::spawn(turn.run());
        info!(number, "AI turn spawned");

        self.active = Some(ActiveTurn {
            number,
            cancel,
            handle,
        });
        Ok(number)
    }

    /// Waits for the running AI turn, if any, and returns how it ended.
    #[instrument(skip(self))]
    pub async fn wait_for_ai_turn(&mut self) -> Option<AiTurnOutcome> {
        let turn = self.active.take()?;
        match turn.handle.await {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                error!(number = turn.number, error = %e, "AI turn task died");
                self.ctx.set_phase(AiPhase::Idle);
                None
            }
        }
    }

    /// Cancels the running AI turn and waits for it to stop.
    #[instrument(skip(self))]
    pub async fn cancel_ai_turn(&mut self) -> Option<AiTurnOutcome> {
        let turn = self.active.as_ref()?;
        info!(number = turn.number, "Cancelling AI turn");
        turn.cancel.cancel();
        self.wait_for_ai_turn().await
    }

    /// Processes UI commands until `Quit` arrives or the channel closes.
    #[instrument(skip_all)]
    pub async fn run(mut self, mut commands: mpsc::UnboundedReceiver<Command>) {
        info!("Controller loop started");
        self.attach().await;

        while let Some(command) = commands.recv().await {
            match command {
                Command::Click(coord) => {
                    self.click(coord).await;
                }
                Command::Reset => self.reset().await,
                Command::Quit => {
                    info!("Quit requested");
                    break;
                }
            }
        }

        self.cancel_ai_turn().await;
        info!("Controller loop stopped");
    }
}
