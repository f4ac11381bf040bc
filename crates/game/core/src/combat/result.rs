//! Attack resolution: hit roll followed by damage roll.

use crate::env::{RngOracle, RollContext, compute_seed};

use super::damage::{Affinities, DamageModifiers, apply_affinities, roll_damage};
use super::precision::check_hit;
use super::weapon::WeaponData;

/// Outcome of an attack attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttackOutcome {
    Miss,
    Hit,
}

/// Damage produced by a landed hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageRoll {
    /// Uniform roll within the weapon's damage range.
    pub base: u32,
    /// Damage after resistances and weaknesses.
    pub adjusted: u32,
}

/// Result of a combat resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackResult {
    pub outcome: AttackOutcome,
    /// Hit chance the roll was checked against.
    pub chance: u32,
    /// Percentile roll in `[0, 100)`.
    pub roll: u32,
    /// Damage (None if miss).
    pub damage: Option<DamageRoll>,
}

/// Seeds for the two rolls of one attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttackSeeds {
    pub hit: u64,
    pub damage: u64,
}

impl AttackSeeds {
    pub fn derive(match_seed: u64, nonce: u64, attacker: u32) -> Self {
        Self {
            hit: compute_seed(match_seed, nonce, attacker, RollContext::Hit),
            damage: compute_seed(match_seed, nonce, attacker, RollContext::Damage),
        }
    }
}

/// Resolve a complete attack sequence (hit check + damage calculation).
///
/// `chance` comes from [`resolve_precision`](super::resolve_precision); the
/// attack must already be known to be in range.
pub fn resolve_attack(
    chance: u32,
    weapon: &WeaponData,
    affinities: &Affinities,
    modifiers: &DamageModifiers,
    rng: &(impl RngOracle + ?Sized),
    seeds: AttackSeeds,
) -> AttackResult {
    let roll = rng.roll_percent(seeds.hit);
    if !check_hit(chance, roll) {
        return AttackResult {
            outcome: AttackOutcome::Miss,
            chance,
            roll,
            damage: None,
        };
    }

    let base = roll_damage(weapon.damage, rng, seeds.damage);
    let adjusted = apply_affinities(base, weapon.damage_types, affinities, modifiers);

    AttackResult {
        outcome: AttackOutcome::Hit,
        chance,
        roll,
        damage: Some(DamageRoll { base, adjusted }),
    }
}
