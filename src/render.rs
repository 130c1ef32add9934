//! Board renderer: projects a snapshot and legal-move set into a view.
//!
//! Every render rebuilds all 64 cells from scratch. Nothing is diffed
//! against the previous view, so stale markers cannot survive a render.

use std::fmt;

use derive_more::Display;

use crate::game::{
    BOARD_SIZE, CELL_COUNT, Cell, Coord, GameSnapshot, LegalMoveSet, Mover, Outcome,
};

/// Status line shown above the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum StatusMessage {
    /// Human to move.
    #[display("Your Turn")]
    YourTurn,
    /// AI to move.
    #[display("AI's Turn")]
    AiTurn,
    /// Game over, black ahead.
    #[display("You Win!")]
    Win,
    /// Game over, white ahead.
    #[display("You Lose.")]
    Loss,
    /// Game over, level.
    #[display("Draw!")]
    Draw,
}

impl StatusMessage {
    /// Derives the status from the game-over flag, the counts and the mover.
    pub fn derive(game_over: bool, black: u32, white: u32, mover: Mover) -> Self {
        if game_over {
            return match Outcome::from_counts(black, white) {
                Outcome::Win => StatusMessage::Win,
                Outcome::Loss => StatusMessage::Loss,
                Outcome::Draw => StatusMessage::Draw,
            };
        }
        match mover {
            Mover::Human => StatusMessage::YourTurn,
            Mover::Ai => StatusMessage::AiTurn,
        }
    }
}

/// One rendered cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellView {
    /// Stone on the cell.
    pub stone: Cell,
    /// Whether the cell carries a legal-move marker.
    pub marker: bool,
}

/// Complete visual state of the board area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView {
    cells: [CellView; CELL_COUNT],
    black_count: u32,
    white_count: u32,
    status: StatusMessage,
}

impl BoardView {
    /// Builds the view for `snapshot`, overlaying `legal` markers on empty
    /// cells only.
    pub fn build(snapshot: &GameSnapshot, legal: Option<&LegalMoveSet>) -> Self {
        let mut cells = [CellView::default(); CELL_COUNT];
        for coord in Coord::all() {
            cells[coord.index()].stone = snapshot.board().get(coord);
        }

        if let Some(legal) = legal {
            for coord in legal.iter() {
                let cell = &mut cells[coord.index()];
                if cell.stone.is_empty() {
                    cell.marker = true;
                }
            }
        }

        Self {
            cells,
            black_count: snapshot.black_count(),
            white_count: snapshot.white_count(),
            status: StatusMessage::derive(
                snapshot.game_over(),
                snapshot.black_count(),
                snapshot.white_count(),
                snapshot.current_mover(),
            ),
        }
    }

    /// Rendered cell at `coord`.
    pub fn cell(&self, coord: Coord) -> CellView {
        self.cells[coord.index()]
    }

    /// Coordinates carrying a marker, row-major.
    pub fn markers(&self) -> impl Iterator<Item = Coord> + '_ {
        Coord::all().filter(|coord| self.cells[coord.index()].marker)
    }

    /// Black counter.
    pub fn black_count(&self) -> u32 {
        self.black_count
    }

    /// White counter.
    pub fn white_count(&self) -> u32 {
        self.white_count
    }

    /// Status line.
    pub fn status(&self) -> StatusMessage {
        self.status
    }
}

impl fmt::Display for BoardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  ")?;
        for y in 0..BOARD_SIZE {
            write!(f, " {}", y)?;
        }
        writeln!(f)?;
        for x in 0..BOARD_SIZE {
            write!(f, "{} ", x)?;
            for y in 0..BOARD_SIZE {
                let view = self.cells[x * BOARD_SIZE + y];
                let symbol = match (view.stone, view.marker) {
                    (Cell::Black, _) => '●',
                    (Cell::White, _) => '○',
                    (Cell::Empty, true) => '·',
                    (Cell::Empty, false) => '.',
                };
                write!(f, " {}", symbol)?;
            }
            writeln!(f)?;
        }
        writeln!(f, "Black {}  White {}", self.black_count, self.white_count)?;
        write!(f, "{}", self.status)
    }
}
