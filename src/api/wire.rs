//! JSON bodies exchanged with the game server.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ClientError;
use crate::game::{Board, Coord, GameSnapshot, Mover, TaskId, TaskState};

use super::AiStart;

/// `GET /board` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardResponse {
    /// 8×8 cell values, `board[x][y]`.
    pub board: Vec<Vec<i8>>,
    /// `1` when black (human) moves next, `-1` for white (AI).
    pub current_player: i8,
    /// Black stone count.
    pub black: u32,
    /// White stone count.
    pub white: u32,
    /// Whether the game has ended.
    pub game_over: bool,
}

impl TryFrom<BoardResponse> for GameSnapshot {
    type Error = ClientError;

    fn try_from(resp: BoardResponse) -> Result<Self, Self::Error> {
        let board = Board::from_wire(&resp.board)?;
        let mover = Mover::from_wire(resp.current_player)?;
        GameSnapshot::new(board, resp.black, resp.white, mover, resp.game_over)
    }
}

impl From<&GameSnapshot> for BoardResponse {
    fn from(snapshot: &GameSnapshot) -> Self {
        Self {
            board: snapshot.board().to_wire(),
            current_player: match snapshot.current_mover() {
                Mover::Human => 1,
                Mover::Ai => -1,
            },
            black: snapshot.black_count(),
            white: snapshot.white_count(),
            game_over: snapshot.game_over(),
        }
    }
}

/// `GET /legal_moves` response.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LegalMovesResponse {
    /// `[x, y]` pairs.
    pub moves: Vec<(i32, i32)>,
}

impl LegalMovesResponse {
    /// Converts to coordinates, dropping pairs that fall off the board.
    pub fn into_coords(self) -> Vec<Coord> {
        self.moves
            .into_iter()
            .filter_map(|(x, y)| {
                let coord = u8::try_from(x)
                    .ok()
                    .zip(u8::try_from(y).ok())
                    .and_then(|(x, y)| Coord::new(x, y));
                if coord.is_none() {
                    warn!(x, y, "Server listed a legal move off the board");
                }
                coord
            })
            .collect()
    }
}

/// `POST /make_move` request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    /// Row.
    pub x: u8,
    /// Column.
    pub y: u8,
}

impl From<Coord> for MoveRequest {
    fn from(coord: Coord) -> Self {
        Self {
            x: coord.x(),
            y: coord.y(),
        }
    }
}

/// `POST /make_move` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveResponse {
    /// Whether the server applied the move.
    pub success: bool,
    /// Rejection reason, when the server gives one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// `POST /start_ai_move` response.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StartAiResponse {
    /// The AI had no legal move; the turn passed back to the human.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub pass: bool,
    /// Handle for polling the AI computation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
}

impl TryFrom<StartAiResponse> for AiStart {
    type Error = ClientError;

    fn try_from(resp: StartAiResponse) -> Result<Self, Self::Error> {
        if resp.pass {
            return Ok(AiStart::Passed);
        }
        resp.task_id
            .map(|id| AiStart::Task(TaskId::from(id)))
            .ok_or_else(|| ClientError::protocol("start_ai_move returned neither pass nor task_id"))
    }
}

/// `GET /get_ai_result/{task_id}` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStatusResponse {
    /// Task queue state string (`PENDING`, `SUCCESS`, `FAILURE`, ...).
    pub state: String,
    /// Present on success when the human has no reply.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub player_must_pass: bool,
}

impl From<TaskStatusResponse> for TaskState {
    fn from(resp: TaskStatusResponse) -> Self {
        TaskState::from_wire(&resp.state, resp.player_must_pass)
    }
}

/// `POST /reset` response.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResetResponse {
    /// Acknowledgement flag; absent is treated as success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
}
