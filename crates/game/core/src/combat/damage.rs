//! Damage rolls and resistance/weakness adjustment.

use crate::env::RngOracle;

use super::weapon::{DamageRange, DamageType, DamageTypes};

/// How a damage instance tagged with several types meets resistances.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DamagePolicy {
    /// The whole instance is adjusted once: any resisted type reduces all of
    /// it, any weak type increases all of it.
    #[default]
    WholeInstance,
    /// The instance is split evenly across its types and each share is
    /// adjusted by its own type only.
    PerType,
}

/// Percentages and policy used when adjusting damage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageModifiers {
    pub resistance_percent: u32,
    pub weakness_percent: u32,
    pub policy: DamagePolicy,
}

/// Damage types a unit resists or is weak to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Affinities {
    pub resistances: DamageTypes,
    pub weaknesses: DamageTypes,
}

impl Affinities {
    pub fn new(resistances: DamageTypes, weaknesses: DamageTypes) -> Self {
        Self {
            resistances,
            weaknesses,
        }
    }
}

/// Rolls base damage uniformly in `[min, max]`.
pub fn roll_damage(range: DamageRange, rng: &(impl RngOracle + ?Sized), seed: u64) -> u32 {
    rng.range(seed, range.min, range.max)
}

/// Adjusts rolled damage for the target's affinities.
///
/// # Formula
///
/// ```text
/// percent = 100 - resistance% (if resisted) + weakness% (if weak)
/// adjusted = floor(amount * max(percent, 0) / 100)
/// ```
///
/// Under [`DamagePolicy::PerType`] the amount is first divided evenly across
/// the weapon's types (the remainder goes to the earliest types) and each
/// share is adjusted separately. Untyped damage is never adjusted.
pub fn apply_affinities(
    amount: u32,
    damage_types: DamageTypes,
    affinities: &Affinities,
    modifiers: &DamageModifiers,
) -> u32 {
    if damage_types.is_empty() {
        return amount;
    }

    match modifiers.policy {
        DamagePolicy::WholeInstance => scale(
            amount,
            damage_types.intersects(affinities.resistances),
            damage_types.intersects(affinities.weaknesses),
            modifiers,
        ),
        DamagePolicy::PerType => {
            let count = damage_types.count();
            let share = amount / count;
            let remainder = amount % count;
            damage_types
                .types()
                .enumerate()
                .map(|(index, damage_type)| {
                    let portion = share + u32::from((index as u32) < remainder);
                    scale_for(portion, damage_type, affinities, modifiers)
                })
                .sum()
        }
    }
}

fn scale_for(
    amount: u32,
    damage_type: DamageType,
    affinities: &Affinities,
    modifiers: &DamageModifiers,
) -> u32 {
    scale(
        amount,
        affinities.resistances.has(damage_type),
        affinities.weaknesses.has(damage_type),
        modifiers,
    )
}

fn scale(amount: u32, resisted: bool, weak: bool, modifiers: &DamageModifiers) -> u32 {
    let mut percent: i64 = 100;
    if resisted {
        percent -= i64::from(modifiers.resistance_percent);
    }
    if weak {
        percent += i64::from(modifiers.weakness_percent);
    }
    let adjusted = i64::from(amount) * percent.max(0) / 100;
    u32::try_from(adjusted).unwrap_or(u32::MAX)
}
