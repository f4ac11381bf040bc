//! Roster loader: the units on the board when a match starts.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::Deserialize;
use tactics_core::{Affinities, BehaviorId, Coordinate, RulesConfig, TeamId, Unit, UnitId};

use crate::loaders::weapons::parse_damage_types;
use crate::loaders::{LoadResult, in_file, read_file};

#[derive(Debug, Clone, Deserialize)]
struct RosterSpec {
    units: Vec<UnitSpec>,
}

#[derive(Debug, Clone, Deserialize)]
struct UnitSpec {
    id: u32,
    team: u8,
    position: (i32, i32),
    health: u32,
    weapon: String,
    /// Falls back to the rules' base precision.
    #[serde(default)]
    accuracy: Option<u32>,
    #[serde(default)]
    behavior: Option<u16>,
    #[serde(default)]
    resistances: Vec<String>,
    #[serde(default)]
    weaknesses: Vec<String>,
    #[serde(default)]
    ammo: BTreeMap<String, u32>,
}

/// Loader for starting rosters from RON files.
///
/// Units receive the per-turn action-point budget from the rules. Weapon and
/// behavior names are resolved when the match is built, not here.
pub struct RosterLoader;

impl RosterLoader {
    pub fn parse(content: &str, rules: &RulesConfig) -> LoadResult<Vec<Unit>> {
        let roster: RosterSpec = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse roster RON: {}", e))?;

        let mut ids = BTreeSet::new();
        let mut positions = BTreeSet::new();
        let mut units = Vec::with_capacity(roster.units.len());
        for spec in roster.units {
            let position = Coordinate::from(spec.position);
            anyhow::ensure!(ids.insert(spec.id), "duplicate unit id {}", spec.id);
            anyhow::ensure!(
                positions.insert(position),
                "unit {} shares position {} with another unit",
                spec.id,
                position
            );
            anyhow::ensure!(spec.health > 0, "unit {} starts with no health", spec.id);

            let affinities = Affinities::new(
                parse_damage_types(&spec.resistances)?,
                parse_damage_types(&spec.weaknesses)?,
            );

            let mut unit = Unit::new(
                UnitId(spec.id),
                TeamId(spec.team),
                position,
                spec.health,
                rules.action_points_per_turn,
                spec.weapon,
            )
            .with_accuracy(spec.accuracy.unwrap_or(rules.base_precision))
            .with_affinities(affinities);
            if let Some(behavior) = spec.behavior {
                unit = unit.with_behavior(BehaviorId(behavior));
            }
            for (kind, rounds) in spec.ammo {
                unit = unit.with_ammo(kind, rounds);
            }
            units.push(unit);
        }

        Ok(units)
    }

    pub fn load(path: &Path, rules: &RulesConfig) -> LoadResult<Vec<Unit>> {
        let content = read_file(path)?;
        in_file(path, Self::parse(&content, rules))
    }
}

#[cfg(test)]
mod tests {
    use tactics_core::DamageTypes;

    use super::*;

    #[test]
    fn builds_units_with_rule_defaults() {
        let rules = RulesConfig::default();
        let units = RosterLoader::parse(
            r#"(units: [
                (id: 1, team: 0, position: (1, 2), health: 12, weapon: "rifle",
                 behavior: Some(3), resistances: ["fire"], ammo: {"rifle_rounds": 6}),
                (id: 2, team: 1, position: (5, 2), health: 9, weapon: "claws", accuracy: Some(70)),
            ])"#,
            &rules,
        )
        .unwrap();

        let trooper = &units[0];
        assert_eq!(trooper.position, Coordinate::new(1, 2));
        assert_eq!(trooper.accuracy, rules.base_precision);
        assert_eq!(trooper.action_points(), rules.action_points_per_turn);
        assert_eq!(trooper.behavior, Some(BehaviorId(3)));
        assert_eq!(trooper.affinities.resistances, DamageTypes::FIRE);
        assert_eq!(trooper.ammo("rifle_rounds"), 6);

        let beast = &units[1];
        assert_eq!(beast.team, TeamId(1));
        assert_eq!(beast.accuracy, 70);
        assert!(beast.behavior.is_none());
    }

    #[test]
    fn rejects_clashing_units() {
        let rules = RulesConfig::default();
        let same_id = r#"(units: [
            (id: 1, team: 0, position: (0, 0), health: 5, weapon: "a"),
            (id: 1, team: 1, position: (1, 0), health: 5, weapon: "a"),
        ])"#;
        let same_tile = r#"(units: [
            (id: 1, team: 0, position: (0, 0), health: 5, weapon: "a"),
            (id: 2, team: 1, position: (0, 0), health: 5, weapon: "a"),
        ])"#;

        assert!(RosterLoader::parse(same_id, &rules).is_err());
        assert!(RosterLoader::parse(same_tile, &rules).is_err());
    }

    #[test]
    fn rejects_unknown_affinity() {
        let rules = RulesConfig::default();
        let roster = r#"(units: [
            (id: 1, team: 0, position: (0, 0), health: 5, weapon: "a", weaknesses: ["holy"]),
        ])"#;
        assert!(RosterLoader::parse(roster, &rules).is_err());
    }
}
