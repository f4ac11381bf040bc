//! Events published by a match session.

use serde::{Deserialize, Serialize};
use tactics_core::{AttackResult, Coordinate, PrecisionReport, TeamId, UnitId};

/// What an aborted action was doing when it stopped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbortedAction {
    /// A move stopped at `at`; the `skipped` tiles were never walked.
    Move { at: Coordinate, skipped: usize },
    /// A queued attack was withdrawn before it resolved.
    Attack { target: UnitId },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    MatchStarted {
        teams: Vec<TeamId>,
        units: usize,
    },

    TurnStarted {
        round: u32,
        team: TeamId,
    },

    /// One tile of movement was committed.
    UnitMoved {
        unit: UnitId,
        from: Coordinate,
        to: Coordinate,
        action_points_left: u32,
    },

    AttackResolved {
        attacker: UnitId,
        target: UnitId,
        precision: PrecisionReport,
        result: AttackResult,
        /// Health actually removed from the target.
        dealt: u32,
    },

    /// The attack was refused before any roll (out of range, no ammo, ...).
    AttackRejected {
        attacker: UnitId,
        target: UnitId,
        reason: String,
    },

    UnitDied {
        unit: UnitId,
        /// `None` when the damage came from the environment.
        killer: Option<UnitId>,
    },

    ActionAborted {
        unit: UnitId,
        action: AbortedAction,
    },

    MatchEnded {
        winner: Option<TeamId>,
        rounds: u32,
    },
}
