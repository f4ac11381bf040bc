//! Deterministic tactical rules shared by the runtime and offline tools.
//!
//! `tactics-core` owns the canonical rules of grid combat: coordinate grids
//! and boards, movement rules and path planning, action-point path splitting,
//! cover-based precision, damage resolution and AI target selection. Every
//! API here is pure; state changes happen in the runtime's match session.
pub mod combat;
pub mod config;
pub mod env;
pub mod error;
pub mod grid;
pub mod movement;
pub mod state;
pub mod targeting;

pub use combat::{
    Affinities, AmmoRequirement, AppliedCover, AttackOutcome, AttackRange, AttackResult,
    AttackSeeds, CoverTable, CoverType, DamageModifiers, DamagePolicy, DamageRange, DamageRoll,
    DamageType, DamageTypes, OutOfRangeAttack, PrecisionReport, PrecisionRequest, WeaponData,
    WeaponError, apply_affinities, check_hit, check_range, resolve_attack, resolve_precision,
    roll_damage,
};
pub use config::RulesConfig;
pub use env::{
    AnchorId, Board, BoardError, Edge, EdgeAxis, EdgeKey, PcgRng, RngOracle, RollContext,
    TerrainKind, Tile, compute_seed, edge_key,
};
pub use error::{ErrorSeverity, GameError};
pub use grid::{Coordinate, DistanceMetric, Grid, GridBounds, GridError};
pub use movement::{
    AStarPlanner, CostLabel, EmptyPath, MovementRules, Path, PathPlanner, PathSplit, RangeClass,
    SplitError, split_path,
};
pub use state::{
    DamageApplied, LifeState, ResourceMeter, TeamId, TurnState, Unit, UnitError, UnitId,
};
pub use targeting::{BehaviorId, TargetPriority, UnitBehavior, select_target};
