use std::collections::BTreeSet;

use crate::combat::{DamageModifiers, DamagePolicy};
use crate::env::TerrainKind;
use crate::grid::DistanceMetric;

/// Tunable rule parameters shared by every unit in a match.
///
/// Missing fields in a rules file fall back to [`RulesConfig::default`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RulesConfig {
    /// Precision a unit starts from when its own accuracy is not specified.
    pub base_precision: u32,

    /// Whether units may step diagonally. Also selects the distance metric
    /// used for weapon reach and precision malus.
    pub use_diagonals: bool,

    /// Terrain a unit may walk on.
    pub walkable_terrain: BTreeSet<TerrainKind>,

    /// Percentage of damage removed by a matching resistance.
    pub resistance_percent: u32,

    /// Percentage of damage added by a matching weakness.
    pub weakness_percent: u32,

    pub damage_policy: DamagePolicy,

    /// Action points spent by one attack.
    pub attack_cost: u32,

    /// Budget restored to each unit when its team's turn starts.
    pub action_points_per_turn: u32,
}

impl RulesConfig {
    pub const DEFAULT_BASE_PRECISION: u32 = 90;
    pub const DEFAULT_RESISTANCE_PERCENT: u32 = 50;
    pub const DEFAULT_WEAKNESS_PERCENT: u32 = 50;
    pub const DEFAULT_ATTACK_COST: u32 = 1;
    pub const DEFAULT_ACTION_POINTS: u32 = 4;

    pub fn new() -> Self {
        Self {
            base_precision: Self::DEFAULT_BASE_PRECISION,
            use_diagonals: false,
            walkable_terrain: [
                TerrainKind::Floor,
                TerrainKind::Grass,
                TerrainKind::Road,
                TerrainKind::Forest,
                TerrainKind::Rubble,
            ]
            .into_iter()
            .collect(),
            resistance_percent: Self::DEFAULT_RESISTANCE_PERCENT,
            weakness_percent: Self::DEFAULT_WEAKNESS_PERCENT,
            damage_policy: DamagePolicy::default(),
            attack_cost: Self::DEFAULT_ATTACK_COST,
            action_points_per_turn: Self::DEFAULT_ACTION_POINTS,
        }
    }

    pub fn metric(&self) -> DistanceMetric {
        DistanceMetric::for_diagonals(self.use_diagonals)
    }

    pub fn damage_modifiers(&self) -> DamageModifiers {
        DamageModifiers {
            resistance_percent: self.resistance_percent,
            weakness_percent: self.weakness_percent,
            policy: self.damage_policy,
        }
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self::new()
    }
}
