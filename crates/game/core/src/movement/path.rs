use crate::env::Board;
use crate::grid::Coordinate;

use super::MovementRules;

/// A tile sequence with no tiles was offered as a path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("a path needs at least one tile")]
pub struct EmptyPath;

/// Ordered tiles from start (inclusive) to goal (inclusive). Never empty.
///
/// Serializes as a plain list of coordinates; deserializing an empty list
/// fails with [`EmptyPath`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "Vec<Coordinate>", into = "Vec<Coordinate>")
)]
pub struct Path {
    tiles: Vec<Coordinate>,
}

impl Path {
    /// Wraps a tile sequence, or returns `None` if it is empty.
    pub fn new(tiles: Vec<Coordinate>) -> Option<Self> {
        (!tiles.is_empty()).then_some(Self { tiles })
    }

    /// Path that never leaves its start tile.
    pub fn single(start: Coordinate) -> Self {
        Self { tiles: vec![start] }
    }

    pub fn tiles(&self) -> &[Coordinate] {
        &self.tiles
    }

    /// Movement cost of the whole path: one action point per step.
    pub fn steps(&self) -> u32 {
        u32::try_from(self.tiles.len().saturating_sub(1)).unwrap_or(u32::MAX)
    }

    pub fn start(&self) -> Coordinate {
        self.tiles[0]
    }

    pub fn goal(&self) -> Coordinate {
        self.tiles[self.tiles.len() - 1]
    }
}

impl TryFrom<Vec<Coordinate>> for Path {
    type Error = EmptyPath;

    fn try_from(tiles: Vec<Coordinate>) -> Result<Self, Self::Error> {
        Self::new(tiles).ok_or(EmptyPath)
    }
}

impl From<Path> for Vec<Coordinate> {
    fn from(path: Path) -> Self {
        path.tiles
    }
}

/// Computes paths between two cells of a board.
///
/// Returning `None` is the ordinary "no path found" outcome (goal walled off,
/// goal terrain not allowed), not a failure. Implementations must be
/// deterministic: identical inputs always yield the identical path.
pub trait PathPlanner {
    fn plan(
        &self,
        board: &Board,
        start: Coordinate,
        goal: Coordinate,
        rules: &MovementRules,
    ) -> Option<Path>;
}
