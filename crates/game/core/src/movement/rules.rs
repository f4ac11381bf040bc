use std::collections::BTreeSet;

use crate::config::RulesConfig;
use crate::env::{Board, TerrainKind};
use crate::grid::{Coordinate, DistanceMetric};

/// Constraint set a single planning query runs under.
///
/// Built fresh for every query (the blocking set depends on where the other
/// units stand right now) and never mutated afterwards: the builder methods
/// consume `self`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MovementRules {
    allowed_terrain: BTreeSet<TerrainKind>,
    blocking: BTreeSet<Coordinate>,
    use_diagonals: bool,
}

impl MovementRules {
    pub fn new<I>(allowed_terrain: I) -> Self
    where
        I: IntoIterator<Item = TerrainKind>,
    {
        Self {
            allowed_terrain: allowed_terrain.into_iter().collect(),
            blocking: BTreeSet::new(),
            use_diagonals: false,
        }
    }

    /// Rules matching the match-wide terrain and diagonal settings.
    pub fn from_config(config: &RulesConfig) -> Self {
        Self::new(config.walkable_terrain.iter().copied()).with_diagonals(config.use_diagonals)
    }

    /// Cells occupied by characters. Impassable except as the goal.
    #[must_use]
    pub fn with_blocking<I>(mut self, blocking: I) -> Self
    where
        I: IntoIterator<Item = Coordinate>,
    {
        self.blocking.extend(blocking);
        self
    }

    #[must_use]
    pub fn with_diagonals(mut self, use_diagonals: bool) -> Self {
        self.use_diagonals = use_diagonals;
        self
    }

    pub fn allowed_terrain(&self) -> &BTreeSet<TerrainKind> {
        &self.allowed_terrain
    }

    pub fn blocking(&self) -> &BTreeSet<Coordinate> {
        &self.blocking
    }

    pub fn use_diagonals(&self) -> bool {
        self.use_diagonals
    }

    pub fn metric(&self) -> DistanceMetric {
        DistanceMetric::for_diagonals(self.use_diagonals)
    }

    pub fn allows_terrain(&self, terrain: TerrainKind) -> bool {
        self.allowed_terrain.contains(&terrain)
    }

    pub fn is_blocking(&self, coord: Coordinate) -> bool {
        self.blocking.contains(&coord)
    }

    /// Whether a unit heading for `goal` may stand on `coord`.
    pub fn can_enter(&self, board: &Board, coord: Coordinate, goal: Coordinate) -> bool {
        let Some(terrain) = board.terrain(coord) else {
            return false;
        };
        self.allows_terrain(terrain) && (coord == goal || !self.is_blocking(coord))
    }

    /// Whether a single step `from -> to` is legal.
    ///
    /// Diagonal steps may not cut corners: both orthogonal corner cells must
    /// be enterable and every edge on both L-shaped routes must be open.
    pub fn can_step(
        &self,
        board: &Board,
        from: Coordinate,
        to: Coordinate,
        goal: Coordinate,
    ) -> bool {
        if !self.can_enter(board, to, goal) {
            return false;
        }

        match (from.x.abs_diff(to.x), from.y.abs_diff(to.y)) {
            (1, 0) | (0, 1) => !board.edge_blocks(from, to),
            (1, 1) if self.use_diagonals => {
                let corner_a = Coordinate::new(to.x, from.y);
                let corner_b = Coordinate::new(from.x, to.y);
                [corner_a, corner_b].into_iter().all(|corner| {
                    self.can_enter(board, corner, goal)
                        && !board.edge_blocks(from, corner)
                        && !board.edge_blocks(corner, to)
                })
            }
            _ => false,
        }
    }
}

impl Default for MovementRules {
    fn default() -> Self {
        Self::from_config(&RulesConfig::default())
    }
}
