//! Weapon stat blocks.
//!
//! Weapons are loaded once and shared read-only by every unit that carries
//! them; units refer to a weapon by name.

use crate::error::{ErrorSeverity, GameError};

/// Damage type for resistances and weaknesses.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DamageType {
    /// Blades, bullets, blunt force.
    Physical,
    Fire,
    Cold,
    Lightning,
    Poison,
    Arcane,
}

impl DamageType {
    pub const fn flag(self) -> DamageTypes {
        match self {
            Self::Physical => DamageTypes::PHYSICAL,
            Self::Fire => DamageTypes::FIRE,
            Self::Cold => DamageTypes::COLD,
            Self::Lightning => DamageTypes::LIGHTNING,
            Self::Poison => DamageTypes::POISON,
            Self::Arcane => DamageTypes::ARCANE,
        }
    }
}

bitflags::bitflags! {
    /// Set of damage types a weapon deals, or a unit resists.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct DamageTypes: u8 {
        const PHYSICAL = 1 << 0;
        const FIRE = 1 << 1;
        const COLD = 1 << 2;
        const LIGHTNING = 1 << 3;
        const POISON = 1 << 4;
        const ARCANE = 1 << 5;
    }
}

impl DamageTypes {
    pub fn has(self, damage_type: DamageType) -> bool {
        self.contains(damage_type.flag())
    }

    /// Member types in declaration order of [`DamageType`].
    pub fn types(self) -> impl Iterator<Item = DamageType> {
        use strum::IntoEnumIterator;
        DamageType::iter().filter(move |damage_type| self.has(*damage_type))
    }

    pub fn count(self) -> u32 {
        self.bits().count_ones()
    }
}

impl FromIterator<DamageType> for DamageTypes {
    fn from_iter<I: IntoIterator<Item = DamageType>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::empty(), |set, damage_type| set | damage_type.flag())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WeaponError {
    #[error("damage range [{min}, {max}] is inverted")]
    InvertedDamageRange { min: u32, max: u32 },

    #[error("weapon '{0}' has a ranged reach of zero tiles")]
    ZeroReach(String),
}

impl GameError for WeaponError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InvertedDamageRange { .. } => "WEAPON_INVERTED_DAMAGE_RANGE",
            Self::ZeroReach(_) => "WEAPON_ZERO_REACH",
        }
    }
}

/// Inclusive damage range `[min, max]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageRange {
    pub min: u32,
    pub max: u32,
}

impl DamageRange {
    /// # Errors
    ///
    /// Returns [`WeaponError::InvertedDamageRange`] if `min > max`.
    pub const fn new(min: u32, max: u32) -> Result<Self, WeaponError> {
        if min > max {
            return Err(WeaponError::InvertedDamageRange { min, max });
        }
        Ok(Self { min, max })
    }

    pub const fn fixed(amount: u32) -> Self {
        Self {
            min: amount,
            max: amount,
        }
    }

    pub const fn contains(&self, amount: u32) -> bool {
        amount >= self.min && amount <= self.max
    }
}

/// How far a weapon reaches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttackRange {
    /// Target must stand on an adjacent tile.
    Melee,
    /// Target must be within `tiles` of the attacker.
    Ranged { tiles: u32 },
    /// Anything the attacker can see is in range, regardless of distance.
    AnythingInView,
}

/// Ammunition drawn from the attacker's pouch on every attack attempt.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AmmoRequirement {
    pub kind: String,
    pub per_attack: u32,
}

/// Immutable combat stats of a weapon.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeaponData {
    pub name: String,
    pub damage: DamageRange,
    pub damage_types: DamageTypes,
    pub range: AttackRange,
    /// Precision lost per tile of distance to the target.
    pub precision_malus_per_tile: u32,
    pub ammo: Option<AmmoRequirement>,
}

impl WeaponData {
    pub fn new(name: impl Into<String>, damage: DamageRange, range: AttackRange) -> Self {
        Self {
            name: name.into(),
            damage,
            damage_types: DamageTypes::empty(),
            range,
            precision_malus_per_tile: 0,
            ammo: None,
        }
    }

    #[must_use]
    pub fn with_damage_types(mut self, damage_types: DamageTypes) -> Self {
        self.damage_types = damage_types;
        self
    }

    #[must_use]
    pub fn with_precision_malus(mut self, per_tile: u32) -> Self {
        self.precision_malus_per_tile = per_tile;
        self
    }

    #[must_use]
    pub fn with_ammo(mut self, kind: impl Into<String>, per_attack: u32) -> Self {
        self.ammo = Some(AmmoRequirement {
            kind: kind.into(),
            per_attack,
        });
        self
    }

    /// Checks invariants that a deserialized stat block may violate.
    ///
    /// # Errors
    ///
    /// - [`WeaponError::InvertedDamageRange`] if `damage.min > damage.max`
    /// - [`WeaponError::ZeroReach`] for a ranged weapon with zero reach
    pub fn validate(&self) -> Result<(), WeaponError> {
        DamageRange::new(self.damage.min, self.damage.max)?;
        if self.range == (AttackRange::Ranged { tiles: 0 }) {
            return Err(WeaponError::ZeroReach(self.name.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damage_type_sets_iterate_in_declaration_order() {
        let set: DamageTypes = [DamageType::Poison, DamageType::Physical].into_iter().collect();
        assert_eq!(
            set.types().collect::<Vec<_>>(),
            vec![DamageType::Physical, DamageType::Poison]
        );
        assert_eq!(set.count(), 2);
        assert!(set.has(DamageType::Poison));
        assert!(!set.has(DamageType::Fire));
    }

    #[test]
    fn damage_type_parses_case_insensitively() {
        assert_eq!("fire".parse::<DamageType>(), Ok(DamageType::Fire));
        assert_eq!("LIGHTNING".parse::<DamageType>(), Ok(DamageType::Lightning));
        assert!("plasma".parse::<DamageType>().is_err());
    }

    #[test]
    fn inverted_ranges_are_rejected() {
        assert_eq!(
            DamageRange::new(5, 2),
            Err(WeaponError::InvertedDamageRange { min: 5, max: 2 })
        );
        let weapon = WeaponData::new(
            "bent rifle",
            DamageRange { min: 9, max: 3 },
            AttackRange::Ranged { tiles: 6 },
        );
        assert!(weapon.validate().is_err());
    }

    #[test]
    fn zero_reach_ranged_weapon_is_rejected() {
        let weapon = WeaponData::new(
            "stub",
            DamageRange::fixed(1),
            AttackRange::Ranged { tiles: 0 },
        );
        assert_eq!(weapon.validate(), Err(WeaponError::ZeroReach("stub".into())));
    }
}
