//! Queued actions and their per-tick progress.

use std::collections::VecDeque;

use tactics_core::{Coordinate, CostLabel, Path, PathSplit, UnitId};

/// A planned move: the full route and its split by the unit's action points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovePlan {
    pub path: Path,
    pub split: PathSplit,
}

impl MovePlan {
    pub fn cost(&self) -> CostLabel {
        self.split.cost()
    }

    /// Where the unit ends up if the move runs to completion this turn.
    pub fn destination(&self) -> Coordinate {
        self.split.reachable_end()
    }
}

/// The single action a session is currently executing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    /// Tiles still to walk, in order. Each tick commits the front tile.
    Move {
        unit: UnitId,
        remaining: VecDeque<Coordinate>,
    },
    Attack {
        attacker: UnitId,
        target: UnitId,
    },
}

impl PendingAction {
    /// Unit performing the action.
    pub fn unit(&self) -> UnitId {
        match self {
            Self::Move { unit, .. } => *unit,
            Self::Attack { attacker, .. } => *attacker,
        }
    }
}

/// What one call to `on_tick` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing was queued.
    Idle,
    /// A step was committed and more remain.
    Advanced,
    /// The action finished.
    Completed,
    /// The next step turned out to be illegal; the action was dropped and
    /// everything committed so far stays.
    Interrupted,
}
