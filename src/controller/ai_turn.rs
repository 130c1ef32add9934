//! AI turn orchestration.
//!
//! One AI turn is a small state machine:
//!
//! ```text
//! Idle -> Starting -> Polling -> Resolving -> Idle
//!            ^                       |
//!            +---- human must pass --+
//! ```
//!
//! `Starting` waits the turn delay and asks the server to begin computing.
//! An immediate pass skips polling entirely. `Polling` queries the task at a
//! fixed interval until it reaches a terminal state, the deadline expires, or
//! the turn is cancelled. `Resolving` resyncs and either hands control back
//! to the human or loops back to `Starting` when the human has no reply.

use std::future::Future;
use std::sync::Arc;

use derive_more::Display;
use tokio::time::{Instant, MissedTickBehavior, interval_at, sleep, sleep_until};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use super::context::ControllerContext;
use super::events::{GameEvent, Notice};
use crate::api::AiStart;
use crate::error::{ClientError, ClientErrorKind};
use crate::game::{CELL_COUNT, TaskId, TaskState};
use crate::store::Resync;

/// Upper bound on AI moves in one must-pass chain. A real game cannot
/// exceed the number of cells.
const MAX_CHAIN_MOVES: usize = CELL_COUNT;

/// Observable phase of the AI-turn state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum AiPhase {
    /// No AI turn in progress.
    Idle,
    /// Waiting to start, or starting, an AI computation.
    Starting,
    /// Waiting for an AI task to finish.
    Polling,
    /// Applying a finished AI task.
    Resolving,
}

/// How a finished AI task leaves the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TaskResolution {
    /// The AI moved and the human has a reply.
    HumanToMove,
    /// The AI moved and the human has no reply.
    HumanMustPass,
    /// The task failed on the server.
    Failed,
}

/// Running state of the AI-turn state machine. `Idle` is the absence of a
/// turn, so it has no variant here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum AiTurnState {
    /// About to request an AI computation.
    Starting,
    /// Waiting on `task_id`.
    Polling {
        /// Task being polled.
        task_id: TaskId,
    },
    /// Applying a terminal task state.
    Resolving(TaskResolution),
}

impl AiTurnState {
    /// Phase tag of this state.
    pub(crate) fn phase(&self) -> AiPhase {
        match self {
            AiTurnState::Starting => AiPhase::Starting,
            AiTurnState::Polling { .. } => AiPhase::Polling,
            AiTurnState::Resolving(_) => AiPhase::Resolving,
        }
    }
}

/// How an AI turn ended.
#[derive(Debug, Clone)]
pub enum AiTurnOutcome {
    /// Control is back with the human.
    HumanToMove {
        /// AI moves made during this turn, including must-pass repeats.
        ai_moves: usize,
    },
    /// The AI had no legal move; control is back with the human.
    AiPassed {
        /// AI moves made before the pass.
        ai_moves: usize,
    },
    /// The game ended during a must-pass chain.
    GameOver {
        /// AI moves made during this turn.
        ai_moves: usize,
    },
    /// The server reported the task as failed.
    TaskFailed {
        /// AI moves completed before the failure.
        ai_moves: usize,
    },
    /// The turn was abandoned: transport or protocol failure, deadline
    /// expiry, or cancellation.
    Aborted(ClientError),
}

impl AiTurnOutcome {
    /// True if the turn ended by cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, AiTurnOutcome::Aborted(e) if e.is_cancelled())
    }
}

enum Transition {
    Next(AiTurnState),
    Done(AiTurnOutcome),
}

/// Drives one AI turn from `Starting` back to `Idle`.
pub(crate) struct AiTurn {
    ctx: Arc<ControllerContext>,
    cancel: CancellationToken,
    epoch: u64,
    ai_moves: usize,
    overlay: bool,
}

impl AiTurn {
    /// Creates a turn bound to the store's current epoch.
    pub(crate) fn new(ctx: Arc<ControllerContext>, cancel: CancellationToken) -> Self {
        let epoch = ctx.store().epoch();
        Self {
            ctx,
            cancel,
            epoch,
            ai_moves: 0,
            overlay: false,
        }
    }

    /// Runs the state machine to completion.
    #[instrument(skip(self), fields(epoch = self.epoch))]
    pub(crate) async fn run(mut self) -> AiTurnOutcome {
        info!("AI turn started");
        let mut state = AiTurnState::Starting;

        let outcome = loop {
            self.ctx.set_phase(state.phase());
            let transition = match state {
                AiTurnState::Starting => self.start().await,
                AiTurnState::Polling { task_id } => self.poll(task_id).await,
                AiTurnState::Resolving(resolution) => self.resolve(resolution).await,
            };
            match transition {
                Transition::Next(next) => state = next,
                Transition::Done(outcome) => break outcome,
            }
        };

        self.hide_overlay();
        self.ctx.set_phase(AiPhase::Idle);
        info!(?outcome, "AI turn finished");
        outcome
    }

    fn show_overlay(&mut self) {
        if !self.overlay {
            self.overlay = true;
            self.ctx.emit(GameEvent::Thinking(true));
        }
    }

    fn hide_overlay(&mut self) {
        if self.overlay {
            self.overlay = false;
            self.ctx.emit(GameEvent::Thinking(false));
        }
    }

    /// Awaits `fut` unless the turn is cancelled first.
    async fn guarded<F: Future>(&self, fut: F) -> Result<F::Output, ClientError> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(ClientError::cancelled()),
            output = fut => Ok(output),
        }
    }

    fn abort(&self, err: ClientError) -> Transition {
        Transition::Done(AiTurnOutcome::Aborted(err))
    }

    /// Resyncs in this turn's epoch and re-renders if the snapshot applied.
    async fn resync_and_render(&self) -> Result<Resync, ClientError> {
        let resync = self
            .guarded(
                self.ctx
                    .store()
                    .resync_in_epoch(self.ctx.api(), self.epoch),
            )
            .await?;
        match resync {
            Resync::Discarded => Err(ClientError::cancelled()),
            Resync::Applied(_) => {
                self.guarded(self.ctx.render()).await?;
                Ok(resync)
            }
            Resync::Failed => Ok(resync),
        }
    }

    #[instrument(skip(self))]
    async fn start(&mut self) -> Transition {
        let delay = self.ctx.timing().turn_delay;
        if let Err(e) = self.guarded(sleep(delay)).await {
            return self.abort(e);
        }

        let start = match self.guarded(self.ctx.api().start_ai_turn()).await {
            Ok(Ok(start)) => start,
            Ok(Err(e)) => {
                warn!(error = %e, "Failed to start AI turn");
                return self.abort(e);
            }
            Err(e) => return self.abort(e),
        };

        match start {
            AiStart::Passed => {
                info!("AI passed");
                self.hide_overlay();
                self.ctx.emit(GameEvent::Notice(Notice::AiPassed));
                if let Err(e) = self.resync_and_render().await {
                    return self.abort(e);
                }
                Transition::Done(AiTurnOutcome::AiPassed {
                    ai_moves: self.ai_moves,
                })
            }
            AiStart::Task(task_id) => {
                debug!(task_id = %task_id, "AI task created");
                self.show_overlay();
                Transition::Next(AiTurnState::Polling { task_id })
            }
        }
    }

    /// Polls until the task is terminal. The interval lives only inside this
    /// call, so every exit from `Polling` stops the timer.
    #[instrument(skip(self), fields(task_id = %task_id))]
    async fn poll(&mut self, task_id: TaskId) -> Transition {
        let ctx = Arc::clone(&self.ctx);
        let cancel = self.cancel.clone();
        let timing = ctx.timing();
        let deadline = Instant::now() + timing.task_deadline;
        let mut ticker = interval_at(Instant::now() + timing.poll_interval, timing.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut polls = 0usize;
        loop {
            let api = ctx.api();
            let polled = tokio::select! {
                biased;
                _ = cancel.cancelled() => return self.abort(ClientError::cancelled()),
                _ = sleep_until(deadline) => {
                    warn!(polls, "AI task missed its deadline");
                    self.hide_overlay();
                    ctx.emit(GameEvent::Notice(Notice::AiStalled));
                    return self.abort(ClientError::new(
                        ClientErrorKind::Stalled,
                        format!("AI task {} unresolved after {:?}", task_id, timing.task_deadline),
                    ));
                }
                polled = async {
                    ticker.tick().await;
                    api.poll_ai_task(&task_id).await
                } => polled,
            };
            polls += 1;

            match polled {
                Ok(TaskState::Pending) => {
                    debug!(polls, "AI task still pending");
                }
                Ok(TaskState::Success { player_must_pass }) => {
                    debug!(polls, player_must_pass, "AI task succeeded");
                    let resolution = if player_must_pass {
                        TaskResolution::HumanMustPass
                    } else {
                        TaskResolution::HumanToMove
                    };
                    return Transition::Next(AiTurnState::Resolving(resolution));
                }
                Ok(TaskState::Failure) => {
                    debug!(polls, "AI task failed");
                    return Transition::Next(AiTurnState::Resolving(TaskResolution::Failed));
                }
                Err(e) => {
                    error!(error = %e, "Polling error");
                    self.hide_overlay();
                    ctx.emit(GameEvent::Notice(Notice::ConnectionLost));
                    return self.abort(e);
                }
            }
        }
    }

    #[instrument(skip(self))]
    async fn resolve(&mut self, resolution: TaskResolution) -> Transition {
        match resolution {
            TaskResolution::HumanToMove => {
                self.ai_moves += 1;
                self.hide_overlay();
                if let Err(e) = self.resync_and_render().await {
                    return self.abort(e);
                }
                Transition::Done(AiTurnOutcome::HumanToMove {
                    ai_moves: self.ai_moves,
                })
            }
            TaskResolution::HumanMustPass => {
                self.ai_moves += 1;
                let resync = match self.resync_and_render().await {
                    Ok(resync) => resync,
                    Err(e) => return self.abort(e),
                };

                if resync.applied().is_some_and(|s| s.game_over()) {
                    info!(ai_moves = self.ai_moves, "Game ended during must-pass chain");
                    return Transition::Done(AiTurnOutcome::GameOver {
                        ai_moves: self.ai_moves,
                    });
                }
                if self.ai_moves >= MAX_CHAIN_MOVES {
                    error!(ai_moves = self.ai_moves, "Must-pass chain exceeded board size");
                    return self.abort(ClientError::protocol(format!(
                        "Server kept reporting must-pass after {} AI moves",
                        self.ai_moves
                    )));
                }

                info!(ai_moves = self.ai_moves, "Human must pass, AI moves again");
                self.ctx.emit(GameEvent::Notice(Notice::HumanMustPass));
                Transition::Next(AiTurnState::Starting)
            }
            TaskResolution::Failed => {
                self.hide_overlay();
                self.ctx.emit(GameEvent::Notice(Notice::AiTaskFailed));
                Transition::Done(AiTurnOutcome::TaskFailed {
                    ai_moves: self.ai_moves,
                })
            }
        }
    }
}
