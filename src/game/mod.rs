//! Client-side game domain types.

mod board;
mod snapshot;
mod task;

pub use board::{BOARD_SIZE, Board, CELL_COUNT, Cell, Coord, Step};
pub use snapshot::{GameSnapshot, Mover, Outcome};
pub use task::{LegalMoveSet, TaskId, TaskState};
