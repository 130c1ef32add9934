//! Controller behaviour against a scripted game server.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use strictly_othello::{
    AiPhase, AiStart, AiTurnOutcome, Board, CELL_COUNT, Cell, ClickOutcome, ClientError,
    ClientErrorKind, Coord, GameApi, GameController, GameEvent, GameSnapshot, IgnoreReason, Mover,
    MoveVerdict, Notice, StatusMessage, TaskId, TaskState, TurnTiming,
};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::Instant;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    FetchBoard,
    FetchLegal,
    Submit(Coord),
    StartAi,
    Poll(String),
    Reset,
}

#[derive(Default)]
struct Script {
    boards: VecDeque<GameSnapshot>,
    legal: Vec<Coord>,
    verdicts: VecDeque<Result<MoveVerdict, ClientError>>,
    starts: VecDeque<Result<AiStart, ClientError>>,
    polls: VecDeque<Result<TaskState, ClientError>>,
    failing_boards: usize,
    calls: Vec<(Call, Instant)>,
}

/// Fake server. Each board fetch takes the next scripted board; the last
/// one sticks. Unscripted polls stay pending. Every call is stamped with
/// the (paused) clock.
#[derive(Default)]
struct ScriptedApi {
    script: Mutex<Script>,
}

impl ScriptedApi {
    fn new(boards: impl IntoIterator<Item = GameSnapshot>) -> Self {
        let api = Self::default();
        api.script.lock().unwrap().boards = boards.into_iter().collect();
        api
    }

    fn with_legal(self, legal: impl IntoIterator<Item = Coord>) -> Self {
        self.script.lock().unwrap().legal = legal.into_iter().collect();
        self
    }

    fn with_verdict(self, verdict: Result<MoveVerdict, ClientError>) -> Self {
        self.script.lock().unwrap().verdicts.push_back(verdict);
        self
    }

    fn with_start(self, start: Result<AiStart, ClientError>) -> Self {
        self.script.lock().unwrap().starts.push_back(start);
        self
    }

    fn with_poll(self, poll: Result<TaskState, ClientError>) -> Self {
        self.script.lock().unwrap().polls.push_back(poll);
        self
    }

    /// Makes the next board fetch fail with a transport error.
    fn fail_next_board(&self) {
        self.script.lock().unwrap().failing_boards += 1;
    }

    fn calls(&self) -> Vec<Call> {
        self.timed_calls().into_iter().map(|(call, _)| call).collect()
    }

    fn timed_calls(&self) -> Vec<(Call, Instant)> {
        self.script.lock().unwrap().calls.clone()
    }

    fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| pred(c)).count()
    }

    fn record(&self, call: Call) {
        self.script.lock().unwrap().calls.push((call, Instant::now()));
    }
}

#[async_trait::async_trait]
impl GameApi for ScriptedApi {
    async fn fetch_board(&self) -> Result<GameSnapshot, ClientError> {
        self.record(Call::FetchBoard);
        let mut script = self.script.lock().unwrap();
        if script.failing_boards > 0 {
            script.failing_boards -= 1;
            return Err(ClientError::transport("board fetch failed"));
        }
        let board = if script.boards.len() > 1 {
            script.boards.pop_front()
        } else {
            script.boards.front().cloned()
        };
        board.ok_or_else(|| ClientError::transport("no board scripted"))
    }

    async fn fetch_legal_moves(&self) -> Result<Vec<Coord>, ClientError> {
        self.record(Call::FetchLegal);
        Ok(self.script.lock().unwrap().legal.clone())
    }

    async fn submit_move(&self, coord: Coord) -> Result<MoveVerdict, ClientError> {
        self.record(Call::Submit(coord));
        self.script
            .lock()
            .unwrap()
            .verdicts
            .pop_front()
            .unwrap_or(Ok(MoveVerdict::Accepted))
    }

    async fn start_ai_turn(&self) -> Result<AiStart, ClientError> {
        self.record(Call::StartAi);
        self.script
            .lock()
            .unwrap()
            .starts
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::transport("no AI start scripted")))
    }

    async fn poll_ai_task(&self, task: &TaskId) -> Result<TaskState, ClientError> {
        self.record(Call::Poll(task.as_str().to_string()));
        self.script
            .lock()
            .unwrap()
            .polls
            .pop_front()
            .unwrap_or(Ok(TaskState::Pending))
    }

    async fn reset(&self) -> Result<(), ClientError> {
        self.record(Call::Reset);
        Ok(())
    }
}

fn coord(x: u8, y: u8) -> Coord {
    Coord::new(x, y).unwrap()
}

fn snapshot(board: Board, mover: Mover, game_over: bool) -> GameSnapshot {
    let black = board.count(Cell::Black) as u32;
    let white = board.count(Cell::White) as u32;
    GameSnapshot::new(board, black, white, mover, game_over).unwrap()
}

fn opening(mover: Mover) -> GameSnapshot {
    snapshot(Board::opening(), mover, false)
}

/// Opening after black plays (2, 3).
fn after_human_move(mover: Mover) -> GameSnapshot {
    let mut board = Board::opening();
    board.set(coord(2, 3), Cell::Black);
    board.set(coord(3, 3), Cell::Black);
    snapshot(board, mover, false)
}

/// Position after white replies at (2, 2).
fn after_ai_move(mover: Mover) -> GameSnapshot {
    let mut board = after_human_move(mover).board().clone();
    board.set(coord(2, 2), Cell::White);
    board.set(coord(3, 3), Cell::White);
    snapshot(board, mover, false)
}

fn opening_moves() -> [Coord; 4] {
    [coord(2, 3), coord(3, 2), coord(4, 5), coord(5, 4)]
}

fn task(id: &str) -> Result<AiStart, ClientError> {
    Ok(AiStart::Task(TaskId::from(id)))
}

fn success(player_must_pass: bool) -> Result<TaskState, ClientError> {
    Ok(TaskState::Success { player_must_pass })
}

fn drain(rx: &mut UnboundedReceiver<GameEvent>) -> Vec<GameEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

fn notices(events: &[GameEvent]) -> Vec<Notice> {
    events
        .iter()
        .filter_map(|e| match e {
            GameEvent::Notice(n) => Some(*n),
            _ => None,
        })
        .collect()
}

fn overlay(events: &[GameEvent]) -> Vec<bool> {
    events
        .iter()
        .filter_map(|e| match e {
            GameEvent::Thinking(t) => Some(*t),
            _ => None,
        })
        .collect()
}

fn controller(api: &Arc<ScriptedApi>) -> (GameController, UnboundedReceiver<GameEvent>) {
    GameController::new(api.clone(), TurnTiming::default())
}

#[tokio::test(start_paused = true)]
async fn test_human_turn_renders_status_and_every_marker() {
    let api = Arc::new(ScriptedApi::new([opening(Mover::Human)]).with_legal(opening_moves()));
    let (mut controller, mut events) = controller(&api);

    controller.attach().await;

    let views: Vec<_> = drain(&mut events)
        .into_iter()
        .filter_map(|e| match e {
            GameEvent::BoardRendered(view) => Some(view),
            _ => None,
        })
        .collect();
    // A plain build, then the annotated one.
    assert_eq!(views.len(), 2);
    let annotated = views.last().unwrap();
    assert_eq!(annotated.status(), StatusMessage::YourTurn);
    assert_eq!(annotated.markers().collect::<Vec<_>>(), opening_moves().to_vec());
    assert_eq!(controller.turns_started(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_human_move_then_ai_reply() {
    let api = Arc::new(
        ScriptedApi::new([
            opening(Mover::Human),
            after_human_move(Mover::Ai),
            after_ai_move(Mover::Human),
        ])
        .with_legal(opening_moves())
        .with_start(task("t1"))
        .with_poll(Ok(TaskState::Pending))
        .with_poll(success(false)),
    );
    let (mut controller, mut events) = controller(&api);

    controller.attach().await;
    assert!(controller.legal_moves().unwrap().contains(coord(2, 3)));

    let outcome = controller.click(coord(2, 3)).await;
    assert_eq!(outcome, ClickOutcome::Accepted { ai_turn: Some(1) });

    let turn = controller.wait_for_ai_turn().await.unwrap();
    assert!(matches!(turn, AiTurnOutcome::HumanToMove { ai_moves: 1 }));

    assert_eq!(
        api.calls(),
        vec![
            Call::FetchBoard,
            Call::FetchLegal,
            Call::Submit(coord(2, 3)),
            Call::FetchBoard,
            Call::StartAi,
            Call::Poll("t1".into()),
            Call::Poll("t1".into()),
            Call::FetchBoard,
            Call::FetchLegal,
        ]
    );

    let events = drain(&mut events);
    assert!(notices(&events).is_empty());
    assert_eq!(overlay(&events), vec![true, false]);
    assert_eq!(controller.snapshot().unwrap(), after_ai_move(Mover::Human));
    assert_eq!(controller.phase(), AiPhase::Idle);
    assert!(controller.legal_moves().is_some());
}

#[tokio::test(start_paused = true)]
async fn test_ai_pass_skips_polling() {
    let api = Arc::new(
        ScriptedApi::new([
            opening(Mover::Human),
            after_human_move(Mover::Ai),
            after_human_move(Mover::Human),
        ])
        .with_legal(opening_moves())
        .with_start(Ok(AiStart::Passed)),
    );
    let (mut controller, mut events) = controller(&api);

    controller.attach().await;
    controller.click(coord(2, 3)).await;
    let turn = controller.wait_for_ai_turn().await.unwrap();

    assert!(matches!(turn, AiTurnOutcome::AiPassed { ai_moves: 0 }));
    assert_eq!(api.count(|c| matches!(c, Call::Poll(_))), 0);
    // Attach, post-move, post-pass.
    assert_eq!(api.count(|c| *c == Call::FetchBoard), 3);

    let events = drain(&mut events);
    assert_eq!(notices(&events), vec![Notice::AiPassed]);
    assert!(overlay(&events).is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_human_must_pass_repeats_ai_turn() {
    let api = Arc::new(
        ScriptedApi::new([
            opening(Mover::Human),
            after_human_move(Mover::Ai),
            after_ai_move(Mover::Ai),
            after_ai_move(Mover::Human),
        ])
        .with_legal(opening_moves())
        .with_start(task("t1"))
        .with_start(task("t2"))
        .with_poll(success(true))
        .with_poll(success(false)),
    );
    let (mut controller, mut events) = controller(&api);

    controller.attach().await;
    controller.click(coord(2, 3)).await;
    let turn = controller.wait_for_ai_turn().await.unwrap();

    assert!(matches!(turn, AiTurnOutcome::HumanToMove { ai_moves: 2 }));
    assert_eq!(api.count(|c| *c == Call::StartAi), 2);
    assert_eq!(api.count(|c| *c == Call::Poll("t2".into())), 1);

    // The must-pass result is resynced, then the next start waits out the
    // turn delay. No legal-move fetch happens in between.
    let calls = api.timed_calls();
    let resolved = calls
        .iter()
        .rposition(|(c, _)| *c == Call::Poll("t1".into()))
        .unwrap();
    let next: Vec<Call> = calls[resolved..resolved + 3]
        .iter()
        .map(|(c, _)| c.clone())
        .collect();
    assert_eq!(
        next,
        vec![Call::Poll("t1".into()), Call::FetchBoard, Call::StartAi]
    );
    assert_eq!(calls[resolved + 1].1, calls[resolved].1);
    assert_eq!(
        calls[resolved + 2].1 - calls[resolved].1,
        TurnTiming::default().turn_delay
    );

    let events = drain(&mut events);
    assert_eq!(notices(&events), vec![Notice::HumanMustPass]);
    // The overlay stays up across the whole chain.
    assert_eq!(overlay(&events), vec![true, false]);
}

#[tokio::test(start_paused = true)]
async fn test_failed_task_reports_error_without_resync() {
    let api = Arc::new(
        ScriptedApi::new([opening(Mover::Human), after_human_move(Mover::Ai)])
            .with_legal(opening_moves())
            .with_start(task("t1"))
            .with_poll(Ok(TaskState::Failure)),
    );
    let (mut controller, mut events) = controller(&api);

    controller.attach().await;
    controller.click(coord(2, 3)).await;
    let turn = controller.wait_for_ai_turn().await.unwrap();

    assert!(matches!(turn, AiTurnOutcome::TaskFailed { ai_moves: 0 }));
    assert_eq!(api.calls().last(), Some(&Call::Poll("t1".into())));

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(api.count(|c| matches!(c, Call::Poll(_))), 1);

    let events = drain(&mut events);
    assert_eq!(notices(&events), vec![Notice::AiTaskFailed]);
    assert_eq!(overlay(&events), vec![true, false]);
    assert_eq!(controller.phase(), AiPhase::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_rejected_move_changes_nothing() {
    let api = Arc::new(
        ScriptedApi::new([opening(Mover::Human)])
            .with_legal(opening_moves())
            .with_verdict(Ok(MoveVerdict::Rejected {
                reason: Some("Invalid move".into()),
            })),
    );
    let (mut controller, mut events) = controller(&api);

    controller.attach().await;
    let before = controller.snapshot();
    let outcome = controller.click(coord(2, 3)).await;

    assert_eq!(outcome, ClickOutcome::Rejected);
    assert_eq!(api.calls().last(), Some(&Call::Submit(coord(2, 3))));
    assert_eq!(controller.snapshot(), before);
    assert_eq!(controller.turns_started(), 0);
    assert_eq!(notices(&drain(&mut events)), vec![Notice::InvalidMove]);
}

#[tokio::test(start_paused = true)]
async fn test_clicks_off_the_legal_set_never_reach_server() {
    // The server lists an occupied cell; the client still refuses it.
    let api = Arc::new(
        ScriptedApi::new([opening(Mover::Human)]).with_legal([coord(2, 3), coord(3, 3)]),
    );
    let (mut controller, _events) = controller(&api);

    assert_eq!(
        controller.click(coord(2, 3)).await,
        ClickOutcome::Ignored(IgnoreReason::NoSnapshot)
    );

    controller.attach().await;
    assert_eq!(
        controller.click(coord(0, 0)).await,
        ClickOutcome::Ignored(IgnoreReason::NotLegal)
    );
    assert_eq!(
        controller.click(coord(3, 3)).await,
        ClickOutcome::Ignored(IgnoreReason::Occupied)
    );
    assert_eq!(api.count(|c| matches!(c, Call::Submit(_))), 0);
}

#[tokio::test(start_paused = true)]
async fn test_clicks_ignored_on_ai_turn_and_game_over() {
    let api = Arc::new(
        ScriptedApi::new([
            opening(Mover::Ai),
            snapshot(Board::opening(), Mover::Human, true),
        ])
        .with_legal(opening_moves()),
    );
    let (mut controller, _events) = controller(&api);
    controller.refresh().await;

    assert_eq!(
        controller.click(coord(2, 3)).await,
        ClickOutcome::Ignored(IgnoreReason::NotHumanTurn)
    );
    // No legal-move fetch happens while the AI is to move.
    assert!(controller.legal_moves().is_none());

    controller.refresh().await;
    assert_eq!(
        controller.click(coord(2, 3)).await,
        ClickOutcome::Ignored(IgnoreReason::GameOver)
    );
    assert_eq!(api.count(|c| matches!(c, Call::Submit(_))), 0);
}

#[tokio::test(start_paused = true)]
async fn test_game_over_stops_must_pass_chain() {
    let mut full = Board::opening();
    for c in Coord::all() {
        full.set(c, Cell::Black);
    }
    let api = Arc::new(
        ScriptedApi::new([
            opening(Mover::Human),
            after_human_move(Mover::Ai),
            snapshot(full, Mover::Human, true),
        ])
        .with_legal(opening_moves())
        .with_start(task("t1"))
        .with_poll(success(true)),
    );
    let (mut controller, mut events) = controller(&api);

    controller.attach().await;
    controller.click(coord(2, 3)).await;
    let turn = controller.wait_for_ai_turn().await.unwrap();

    assert!(matches!(turn, AiTurnOutcome::GameOver { ai_moves: 1 }));
    assert_eq!(api.count(|c| *c == Call::StartAi), 1);

    let events = drain(&mut events);
    assert!(notices(&events).is_empty());
    assert_eq!(overlay(&events), vec![true, false]);
    assert!(controller.snapshot().unwrap().game_over());
}

#[tokio::test(start_paused = true)]
async fn test_endless_must_pass_chain_is_cut_off() {
    // Every task claims the human must pass, yet the game never ends.
    let api = (0..CELL_COUNT + 4).fold(ScriptedApi::new([opening(Mover::Ai)]), |api, _| {
        api.with_start(task("chain")).with_poll(success(true))
    });
    let api = Arc::new(api);
    let (mut controller, mut events) = controller(&api);

    controller.attach().await;
    let turn = controller.wait_for_ai_turn().await.unwrap();

    match turn {
        AiTurnOutcome::Aborted(e) => assert_eq!(e.kind, ClientErrorKind::Protocol),
        other => panic!("expected protocol error, got {:?}", other),
    }
    assert_eq!(api.count(|c| *c == Call::StartAi), CELL_COUNT);
    assert_eq!(api.count(|c| matches!(c, Call::Poll(_))), CELL_COUNT);

    let events = drain(&mut events);
    assert_eq!(notices(&events).len(), CELL_COUNT - 1);
    assert!(notices(&events).iter().all(|n| *n == Notice::HumanMustPass));
    assert_eq!(overlay(&events), vec![true, false]);
    assert_eq!(controller.phase(), AiPhase::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_failed_refresh_keeps_stale_board() {
    let api = Arc::new(ScriptedApi::new([opening(Mover::Human)]).with_legal(opening_moves()));
    let (mut controller, mut events) = controller(&api);

    controller.attach().await;
    drain(&mut events);
    let before = controller.snapshot();

    api.fail_next_board();
    controller.refresh().await;

    assert_eq!(controller.snapshot(), before);
    // Nothing is rendered, so the last legal set stays in place.
    assert!(drain(&mut events).is_empty());
    assert!(controller.legal_moves().unwrap().contains(coord(2, 3)));
    assert_eq!(api.count(|c| *c == Call::FetchBoard), 2);
    assert_eq!(api.count(|c| *c == Call::FetchLegal), 1);

    // The next successful fetch renders again.
    controller.refresh().await;
    assert!(drain(&mut events)
        .iter()
        .any(|e| matches!(e, GameEvent::BoardRendered(_))));
}

#[tokio::test(start_paused = true)]
async fn test_stalled_task_hits_deadline() {
    let timing = TurnTiming::new(
        Duration::from_secs(2),
        Duration::from_millis(100),
        Duration::from_secs(10),
    );
    let api = Arc::new(ScriptedApi::new([opening(Mover::Ai)]).with_start(task("slow")));
    let (mut controller, mut events) = GameController::new(api.clone(), timing);

    controller.attach().await;
    let turn = controller.wait_for_ai_turn().await.unwrap();

    match turn {
        AiTurnOutcome::Aborted(e) => assert_eq!(e.kind, ClientErrorKind::Stalled),
        other => panic!("expected stall, got {:?}", other),
    }
    let polls = api.count(|c| matches!(c, Call::Poll(_)));
    assert!((4..=5).contains(&polls), "polled {} times", polls);

    let events = drain(&mut events);
    assert_eq!(notices(&events), vec![Notice::AiStalled]);
    assert_eq!(overlay(&events), vec![true, false]);
}

#[tokio::test(start_paused = true)]
async fn test_poll_transport_failure_ends_turn() {
    let api = Arc::new(
        ScriptedApi::new([opening(Mover::Ai)])
            .with_start(task("t1"))
            .with_poll(Err(ClientError::transport("connection reset"))),
    );
    let (mut controller, mut events) = controller(&api);

    controller.attach().await;
    let turn = controller.wait_for_ai_turn().await.unwrap();

    match turn {
        AiTurnOutcome::Aborted(e) => assert_eq!(e.kind, ClientErrorKind::Transport),
        other => panic!("expected transport failure, got {:?}", other),
    }
    assert_eq!(api.count(|c| matches!(c, Call::Poll(_))), 1);
    assert_eq!(notices(&drain(&mut events)), vec![Notice::ConnectionLost]);
}

#[tokio::test(start_paused = true)]
async fn test_submit_transport_failure_is_reported() {
    let api = Arc::new(
        ScriptedApi::new([opening(Mover::Human)])
            .with_legal(opening_moves())
            .with_verdict(Err(ClientError::transport("connection refused"))),
    );
    let (mut controller, mut events) = controller(&api);

    controller.attach().await;
    assert_eq!(controller.click(coord(2, 3)).await, ClickOutcome::Failed);
    assert_eq!(controller.turns_started(), 0);
    assert_eq!(notices(&drain(&mut events)), vec![Notice::ServerUnreachable]);
}

#[tokio::test(start_paused = true)]
async fn test_reset_cancels_polling_turn() {
    let api = Arc::new(
        ScriptedApi::new([opening(Mover::Ai), opening(Mover::Human)]).with_start(task("t1")),
    );
    let (mut controller, mut events) = controller(&api);

    controller.attach().await;
    assert_eq!(controller.turns_started(), 1);

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(controller.phase(), AiPhase::Polling);
    assert!(controller.is_ai_turn_active());

    controller.reset().await;
    assert!(!controller.is_ai_turn_active());
    assert_eq!(controller.phase(), AiPhase::Idle);
    assert_eq!(controller.snapshot().unwrap(), opening(Mover::Human));

    let polls = api.count(|c| matches!(c, Call::Poll(_)));
    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(api.count(|c| matches!(c, Call::Poll(_))), polls);

    let calls = api.calls();
    let reset_at = calls.iter().position(|c| *c == Call::Reset).unwrap();
    assert_eq!(calls[reset_at + 1], Call::FetchBoard);

    let events = drain(&mut events);
    assert_eq!(overlay(&events).last(), Some(&false));
    assert!(notices(&events).is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_only_one_ai_turn_at_a_time() {
    let api = Arc::new(ScriptedApi::new([opening(Mover::Ai)]).with_start(task("t1")));
    let (mut controller, _events) = controller(&api);
    controller.refresh().await;

    assert_eq!(controller.start_ai_turn().unwrap(), 1);
    let err = controller.start_ai_turn().unwrap_err();
    assert_eq!(err.kind, ClientErrorKind::Busy);

    let outcome = controller.cancel_ai_turn().await.unwrap();
    assert!(outcome.is_cancelled());
    assert_eq!(controller.start_ai_turn().unwrap(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_click_right_after_ai_reply_is_accepted() {
    let api = Arc::new(
        ScriptedApi::new([
            opening(Mover::Human),
            after_human_move(Mover::Ai),
            after_ai_move(Mover::Human),
            after_ai_move(Mover::Ai),
        ])
        .with_legal(opening_moves())
        .with_start(task("t1"))
        .with_poll(success(false)),
    );
    let (mut controller, mut events) = controller(&api);

    controller.attach().await;
    controller.click(coord(2, 3)).await;
    assert_eq!(controller.phase(), AiPhase::Starting);
    drain(&mut events);

    // React to the annotated board without joining the turn first.
    while let Some(event) = events.recv().await {
        if let GameEvent::BoardRendered(view) = event
            && view.markers().next().is_some()
        {
            break;
        }
    }

    let outcome = controller.click(coord(3, 2)).await;
    assert_eq!(outcome, ClickOutcome::Accepted { ai_turn: Some(2) });
    assert_eq!(controller.phase(), AiPhase::Starting);
    assert_eq!(api.count(|c| matches!(c, Call::Submit(_))), 2);
}

#[tokio::test(start_paused = true)]
async fn test_attach_resumes_ai_turn() {
    let api = Arc::new(
        ScriptedApi::new([opening(Mover::Ai), after_ai_move(Mover::Human)])
            .with_legal(opening_moves())
            .with_start(task("t1"))
            .with_poll(success(false)),
    );
    let (mut controller, _events) = controller(&api);

    controller.attach().await;
    assert!(controller.is_ai_turn_active());
    let turn = controller.wait_for_ai_turn().await.unwrap();
    assert!(matches!(turn, AiTurnOutcome::HumanToMove { ai_moves: 1 }));
    assert!(controller.snapshot().unwrap().is_human_turn());
}

#[tokio::test(start_paused = true)]
async fn test_run_loop_processes_commands() {
    let api = Arc::new(ScriptedApi::new([opening(Mover::Human)]).with_legal(opening_moves()));
    let (controller, mut events) = controller(&api);
    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();

    let handle = tokio::spawn(controller.run(rx));
    tx.send(strictly_othello::Command::Click(coord(0, 0))).unwrap();
    tx.send(strictly_othello::Command::Reset).unwrap();
    tx.send(strictly_othello::Command::Quit).unwrap();
    handle.await.unwrap();

    assert_eq!(api.count(|c| matches!(c, Call::Submit(_))), 0);
    assert_eq!(api.count(|c| *c == Call::Reset), 1);
    assert!(drain(&mut events)
        .iter()
        .any(|e| matches!(e, GameEvent::BoardRendered(_))));
}
