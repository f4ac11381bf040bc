//! Mutable match state: units and turn bookkeeping.
//!
//! Each unit's health and action points are owned by that unit and mutated
//! only while it (or its attacker) is resolving an action.
mod common;
mod turn;
mod unit;

pub use common::{ResourceMeter, TeamId, UnitId};
pub use turn::TurnState;
pub use unit::{DamageApplied, LifeState, Unit, UnitError};
