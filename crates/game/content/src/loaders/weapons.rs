//! Weapon catalog loader.

use std::collections::BTreeSet;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use tactics_core::{AmmoRequirement, AttackRange, DamageRange, DamageType, DamageTypes, WeaponData};

use crate::loaders::{LoadResult, in_file, read_file};

#[derive(Debug, Clone, Deserialize)]
struct WeaponCatalogSpec {
    weapons: Vec<WeaponSpec>,
}

#[derive(Debug, Clone, Deserialize)]
struct WeaponSpec {
    name: String,
    damage: (u32, u32),
    #[serde(default)]
    damage_types: Vec<String>,
    range: AttackRange,
    #[serde(default)]
    precision_malus_per_tile: u32,
    #[serde(default)]
    ammo: Option<AmmoRequirement>,
}

/// Parses damage type names (`"fire"`, `"Physical"`) into a set.
pub(crate) fn parse_damage_types(names: &[String]) -> LoadResult<DamageTypes> {
    names
        .iter()
        .map(|name| {
            DamageType::from_str(name)
                .map_err(|_| anyhow::anyhow!("unknown damage type '{}'", name))
        })
        .collect()
}

/// Loader for weapon catalogs from RON files.
pub struct WeaponLoader;

impl WeaponLoader {
    pub fn parse(content: &str) -> LoadResult<Vec<WeaponData>> {
        let catalog: WeaponCatalogSpec = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse weapon catalog RON: {}", e))?;

        let mut names = BTreeSet::new();
        let mut weapons = Vec::with_capacity(catalog.weapons.len());
        for spec in catalog.weapons {
            anyhow::ensure!(
                names.insert(spec.name.clone()),
                "duplicate weapon '{}'",
                spec.name
            );

            let (min, max) = spec.damage;
            let damage = DamageRange::new(min, max)
                .map_err(|e| anyhow::anyhow!("weapon '{}': {}", spec.name, e))?;
            let damage_types = parse_damage_types(&spec.damage_types)
                .map_err(|e| e.context(format!("weapon '{}'", spec.name)))?;

            let weapon = WeaponData {
                name: spec.name,
                damage,
                damage_types,
                range: spec.range,
                precision_malus_per_tile: spec.precision_malus_per_tile,
                ammo: spec.ammo,
            };
            weapon.validate()?;
            weapons.push(weapon);
        }

        Ok(weapons)
    }

    pub fn load(path: &Path) -> LoadResult<Vec<WeaponData>> {
        let content = read_file(path)?;
        in_file(path, Self::parse(&content))
    }
}
