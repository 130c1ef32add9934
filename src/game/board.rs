//! Board geometry and cell values.

use derive_more::Display;
use tracing::instrument;

use crate::error::ClientError;

/// Side length of the board.
pub const BOARD_SIZE: usize = 8;

/// Total number of cells on the board.
pub const CELL_COUNT: usize = BOARD_SIZE * BOARD_SIZE;

/// Contents of a single board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, strum::EnumIter)]
pub enum Cell {
    /// No stone.
    #[default]
    Empty,
    /// Black stone (the human's colour).
    Black,
    /// White stone (the AI's colour).
    White,
}

impl Cell {
    /// Returns true if no stone occupies the cell.
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    /// Wire encoding used by the game server.
    pub fn to_wire(self) -> i8 {
        match self {
            Cell::Empty => 0,
            Cell::Black => 1,
            Cell::White => -1,
        }
    }
}

impl TryFrom<i8> for Cell {
    type Error = ClientError;

    #[track_caller]
    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Cell::Empty),
            1 => Ok(Cell::Black),
            -1 => Ok(Cell::White),
            other => Err(ClientError::protocol(format!("Unknown cell value {}", other))),
        }
    }
}

/// Direction for moving a cursor across the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Towards row 0.
    Up,
    /// Towards row 7.
    Down,
    /// Towards column 0.
    Left,
    /// Towards column 7.
    Right,
}

/// A board coordinate. `x` is the row, `y` the column, both in `0..8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
#[display("({}, {})", x, y)]
pub struct Coord {
    x: u8,
    y: u8,
}

impl Coord {
    /// Creates a coordinate, or `None` if it lies off the board.
    pub fn new(x: u8, y: u8) -> Option<Self> {
        ((x as usize) < BOARD_SIZE && (y as usize) < BOARD_SIZE).then_some(Self { x, y })
    }

    /// Row index.
    pub fn x(self) -> u8 {
        self.x
    }

    /// Column index.
    pub fn y(self) -> u8 {
        self.y
    }

    /// Row-major index in `0..64`.
    pub fn index(self) -> usize {
        self.x as usize * BOARD_SIZE + self.y as usize
    }

    /// Inverse of [`Coord::index`].
    pub fn from_index(index: usize) -> Option<Self> {
        if index >= CELL_COUNT {
            return None;
        }
        Some(Self {
            x: (index / BOARD_SIZE) as u8,
            y: (index % BOARD_SIZE) as u8,
        })
    }

    /// All 64 coordinates in row-major order.
    pub fn all() -> impl Iterator<Item = Coord> {
        (0..CELL_COUNT).filter_map(Coord::from_index)
    }

    /// Moves one cell in `step`, staying put at the edge.
    pub fn step(self, step: Step) -> Self {
        let (x, y) = match step {
            Step::Up => (self.x.saturating_sub(1), self.y),
            Step::Down => (self.x + 1, self.y),
            Step::Left => (self.x, self.y.saturating_sub(1)),
            Step::Right => (self.x, self.y + 1),
        };
        Coord::new(x, y).unwrap_or(self)
    }
}

impl Default for Coord {
    fn default() -> Self {
        Self { x: 0, y: 0 }
    }
}

/// 8×8 board of cells, indexed `[x][y]`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Board {
    cells: [[Cell; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes the server's nested-list representation.
    #[instrument(skip(rows))]
    pub fn from_wire(rows: &[Vec<i8>]) -> Result<Self, ClientError> {
        if rows.len() != BOARD_SIZE {
            return Err(ClientError::protocol(format!(
                "Board has {} rows, expected {}",
                rows.len(),
                BOARD_SIZE
            )));
        }

        let mut board = Self::new();
        for (x, row) in rows.iter().enumerate() {
            if row.len() != BOARD_SIZE {
                return Err(ClientError::protocol(format!(
                    "Board row {} has {} cells, expected {}",
                    x,
                    row.len(),
                    BOARD_SIZE
                )));
            }
            for (y, value) in row.iter().enumerate() {
                board.cells[x][y] = Cell::try_from(*value)?;
            }
        }
        Ok(board)
    }

    /// Encodes the board the way the server sends it.
    pub fn to_wire(&self) -> Vec<Vec<i8>> {
        self.cells
            .iter()
            .map(|row| row.iter().map(|cell| cell.to_wire()).collect())
            .collect()
    }

    /// Gets the cell at `coord`.
    pub fn get(&self, coord: Coord) -> Cell {
        self.cells[coord.x as usize][coord.y as usize]
    }

    /// Sets the cell at `coord`.
    pub fn set(&mut self, coord: Coord, cell: Cell) {
        self.cells[coord.x as usize][coord.y as usize] = cell;
    }

    /// Counts stones of the given colour.
    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().flatten().filter(|c| **c == cell).count()
    }

    /// Standard opening position.
    pub fn opening() -> Self {
        let mut board = Self::new();
        let mid = (BOARD_SIZE / 2) as u8;
        let place = |board: &mut Board, x: u8, y: u8, cell: Cell| {
            if let Some(coord) = Coord::new(x, y) {
                board.set(coord, cell);
            }
        };
        place(&mut board, mid - 1, mid - 1, Cell::White);
        place(&mut board, mid, mid, Cell::White);
        place(&mut board, mid - 1, mid, Cell::Black);
        place(&mut board, mid, mid - 1, Cell::Black);
        board
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_cell_wire_values_roundtrip() {
        for cell in Cell::iter() {
            assert_eq!(Cell::try_from(cell.to_wire()).unwrap(), cell);
        }
        assert!(Cell::try_from(2).is_err());
    }

    #[test]
    fn test_coord_bounds() {
        assert!(Coord::new(7, 7).is_some());
        assert!(Coord::new(8, 0).is_none());
        assert!(Coord::new(0, 8).is_none());
    }

    #[test]
    fn test_coord_index_is_row_major() {
        let coord = Coord::new(2, 5).unwrap();
        assert_eq!(coord.index(), 21);
        assert_eq!(Coord::from_index(21), Some(coord));
        assert_eq!(Coord::from_index(64), None);
        assert_eq!(Coord::all().count(), CELL_COUNT);
    }

    #[test]
    fn test_step_stops_at_edges() {
        let corner = Coord::new(0, 0).unwrap();
        assert_eq!(corner.step(Step::Up), corner);
        assert_eq!(corner.step(Step::Left), corner);
        assert_eq!(corner.step(Step::Down), Coord::new(1, 0).unwrap());

        let far = Coord::new(7, 7).unwrap();
        assert_eq!(far.step(Step::Down), far);
        assert_eq!(far.step(Step::Right), far);
    }

    #[test]
    fn test_opening_position() {
        let board = Board::opening();
        assert_eq!(board.count(Cell::Black), 2);
        assert_eq!(board.count(Cell::White), 2);
        assert_eq!(board.get(Coord::new(3, 4).unwrap()), Cell::Black);
        assert_eq!(board.get(Coord::new(3, 3).unwrap()), Cell::White);
    }

    #[test]
    fn test_from_wire_rejects_wrong_shape() {
        let short = vec![vec![0i8; 8]; 7];
        assert!(Board::from_wire(&short).is_err());

        let mut ragged = vec![vec![0i8; 8]; 8];
        ragged[3].pop();
        assert!(Board::from_wire(&ragged).is_err());
    }

    #[test]
    fn test_from_wire_matches_to_wire() {
        let board = Board::opening();
        assert_eq!(Board::from_wire(&board.to_wire()).unwrap(), board);
    }
}
