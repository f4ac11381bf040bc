//! Range legality, cover and precision.

use crate::env::Board;
use crate::error::{ErrorSeverity, GameError};
use crate::grid::{Coordinate, DistanceMetric};

use super::cover::CoverTable;
use super::weapon::{AttackRange, WeaponData};

/// Upper bound of any hit chance, in percent.
pub const MAX_PRECISION: u32 = 100;

/// The weapon cannot reach the target. The attack must not be attempted.
///
/// Distinct from a 0% hit chance: callers use it to tell "will miss" apart
/// from "cannot attack".
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OutOfRangeAttack {
    #[error("melee weapon needs an adjacent target (distance {distance})")]
    MeleeNotAdjacent { distance: u32 },

    #[error("target at distance {distance} is beyond reach {reach}")]
    BeyondReach { distance: u32, reach: u32 },
}

impl GameError for OutOfRangeAttack {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MeleeNotAdjacent { .. } => "ATTACK_MELEE_NOT_ADJACENT",
            Self::BeyondReach { .. } => "ATTACK_BEYOND_REACH",
        }
    }
}

/// Inputs of a single precision query.
#[derive(Clone, Copy, Debug)]
pub struct PrecisionRequest<'a> {
    pub attacker: Coordinate,
    pub target: Coordinate,
    /// Attacker's base accuracy before distance and cover.
    pub base_precision: u32,
    pub weapon: &'a WeaponData,
    pub metric: DistanceMetric,
}

/// Cover that shielded the target.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AppliedCover {
    pub name: String,
    pub protection: u32,
}

/// Breakdown of a legal attack's hit chance.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrecisionReport {
    /// Final hit chance in `[0, 100]`.
    pub chance: u32,
    pub distance: u32,
    pub distance_malus: u32,
    pub cover: Option<AppliedCover>,
}

/// Checks whether a weapon reaches `distance` tiles.
///
/// # Errors
///
/// Returns [`OutOfRangeAttack`] if it does not.
pub fn check_range(range: AttackRange, distance: u32) -> Result<(), OutOfRangeAttack> {
    match range {
        AttackRange::Melee if distance != 1 => Err(OutOfRangeAttack::MeleeNotAdjacent { distance }),
        AttackRange::Ranged { tiles } if distance > tiles => Err(OutOfRangeAttack::BeyondReach {
            distance,
            reach: tiles,
        }),
        _ => Ok(()),
    }
}

/// Computes the hit chance of an attack.
///
/// # Formula
///
/// ```text
/// chance = base - malus_per_tile * distance - cover_protection
/// clamped to [0, 100]
/// ```
///
/// Range legality is checked before anything else. Cover applies when the
/// target's tile terrain is covered by a configured cover type.
///
/// # Errors
///
/// Returns [`OutOfRangeAttack`] if the weapon cannot reach the target.
pub fn resolve_precision(
    request: &PrecisionRequest<'_>,
    board: &Board,
    covers: &CoverTable,
) -> Result<PrecisionReport, OutOfRangeAttack> {
    let distance = request.metric.distance(request.attacker, request.target);
    check_range(request.weapon.range, distance)?;

    let distance_malus = request
        .weapon
        .precision_malus_per_tile
        .saturating_mul(distance);

    let cover = board
        .terrain(request.target)
        .and_then(|terrain| covers.lookup(terrain))
        .map(|cover| AppliedCover {
            name: cover.name.clone(),
            protection: cover.protection,
        });
    let protection = cover.as_ref().map_or(0, |cover| cover.protection);

    let raw = i64::from(request.base_precision) - i64::from(distance_malus) - i64::from(protection);
    let chance = raw.clamp(0, i64::from(MAX_PRECISION)) as u32;

    Ok(PrecisionReport {
        chance,
        distance,
        distance_malus,
        cover,
    })
}

/// Whether a percentile roll in `[0, 100)` lands against `chance`.
pub fn check_hit(chance: u32, roll: u32) -> bool {
    roll < chance
}
