//! Errors surfaced by the match session.
//!
//! A rejected request leaves the session exactly as it was. Roster problems
//! found by `on_build` are validation errors; everything else is recoverable
//! and the caller may issue a different request.

use tactics_core::error::{ErrorSeverity, GameError};
use tactics_core::{BehaviorId, Coordinate, OutOfRangeAttack, TeamId, UnitError, UnitId};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SessionError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("session is not built; call on_build first")]
    NotBuilt,

    #[error("session was already built")]
    AlreadyBuilt,

    #[error("match is over")]
    MatchFinished,

    #[error("roster is empty")]
    EmptyRoster,

    #[error("a match needs at least two teams")]
    NotEnoughTeams,

    #[error("unknown unit {0}")]
    UnknownUnit(UnitId),

    #[error("unit {unit} carries unknown weapon '{weapon}'")]
    UnknownWeapon { unit: UnitId, weapon: String },

    #[error("unit {unit} uses unknown behavior {behavior:?}")]
    UnknownBehavior { unit: UnitId, behavior: BehaviorId },

    #[error("unit {unit} cannot stand at {position}")]
    InvalidPlacement { unit: UnitId, position: Coordinate },

    #[error("it is {active}'s turn, not {requested}'s")]
    WrongTeam { active: TeamId, requested: TeamId },

    #[error("unit {0} is dead")]
    UnitDead(UnitId),

    #[error("unit {0} cannot target its own team")]
    FriendlyTarget(UnitId),

    #[error("another action is still in progress")]
    ActionInProgress,

    #[error("no action in progress")]
    NoActionInProgress,

    #[error("no path from {from} to {to}")]
    NoPath { from: Coordinate, to: Coordinate },

    #[error("tile {0} is occupied")]
    TileOccupied(Coordinate),

    #[error("unit {0} is already there")]
    AlreadyThere(UnitId),

    #[error(transparent)]
    OutOfRange(#[from] OutOfRangeAttack),

    #[error(transparent)]
    Unit(#[from] UnitError),
}

impl GameError for SessionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::OutOfRange(error) => error.severity(),
            Self::Unit(error) => error.severity(),
            Self::EmptyRoster
            | Self::NotEnoughTeams
            | Self::UnknownWeapon { .. }
            | Self::UnknownBehavior { .. }
            | Self::InvalidPlacement { .. } => ErrorSeverity::Validation,
            _ => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotBuilt => "SESSION_NOT_BUILT",
            Self::AlreadyBuilt => "SESSION_ALREADY_BUILT",
            Self::MatchFinished => "SESSION_MATCH_FINISHED",
            Self::EmptyRoster => "SESSION_EMPTY_ROSTER",
            Self::NotEnoughTeams => "SESSION_NOT_ENOUGH_TEAMS",
            Self::UnknownUnit(_) => "SESSION_UNKNOWN_UNIT",
            Self::UnknownWeapon { .. } => "SESSION_UNKNOWN_WEAPON",
            Self::UnknownBehavior { .. } => "SESSION_UNKNOWN_BEHAVIOR",
            Self::InvalidPlacement { .. } => "SESSION_INVALID_PLACEMENT",
            Self::WrongTeam { .. } => "SESSION_WRONG_TEAM",
            Self::UnitDead(_) => "SESSION_UNIT_DEAD",
            Self::FriendlyTarget(_) => "SESSION_FRIENDLY_TARGET",
            Self::ActionInProgress => "SESSION_ACTION_IN_PROGRESS",
            Self::NoActionInProgress => "SESSION_NO_ACTION_IN_PROGRESS",
            Self::NoPath { .. } => "SESSION_NO_PATH",
            Self::TileOccupied(_) => "SESSION_TILE_OCCUPIED",
            Self::AlreadyThere(_) => "SESSION_ALREADY_THERE",
            Self::OutOfRange(error) => error.error_code(),
            Self::Unit(error) => error.error_code(),
        }
    }
}
