//! AI task handles and legal-move sets.

use std::collections::BTreeSet;

use derive_more::{Display, From};

use super::board::Coord;
use super::snapshot::Mover;

/// Opaque identifier of a server-side AI task.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, From)]
pub struct TaskId(String);

impl TaskId {
    /// The raw token, for building request paths.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Progress of an AI task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskState {
    /// Not finished yet.
    Pending,
    /// The AI moved.
    Success {
        /// The resulting position leaves the human without a legal move.
        player_must_pass: bool,
    },
    /// The computation failed on the server.
    Failure,
}

impl TaskState {
    /// Decodes the server's state string. Anything that is neither
    /// `SUCCESS` nor `FAILURE` is still in flight.
    pub fn from_wire(state: &str, player_must_pass: bool) -> Self {
        match state {
            "SUCCESS" => TaskState::Success { player_must_pass },
            "FAILURE" => TaskState::Failure,
            _ => TaskState::Pending,
        }
    }
}

/// Coordinates the mover may play, valid only for the mover it was fetched for.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LegalMoveSet {
    mover: Option<Mover>,
    coords: BTreeSet<Coord>,
}

impl LegalMoveSet {
    /// Creates a set for `mover`.
    pub fn new(mover: Mover, coords: impl IntoIterator<Item = Coord>) -> Self {
        Self {
            mover: Some(mover),
            coords: coords.into_iter().collect(),
        }
    }

    /// Side this set was fetched for.
    pub fn mover(&self) -> Option<Mover> {
        self.mover
    }

    /// Whether `coord` is listed.
    pub fn contains(&self, coord: Coord) -> bool {
        self.coords.contains(&coord)
    }

    /// Listed coordinates in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = Coord> + '_ {
        self.coords.iter().copied()
    }

    /// Number of listed coordinates.
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    /// True if nothing is listed.
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }
}
