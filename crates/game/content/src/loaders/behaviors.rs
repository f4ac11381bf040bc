//! Unit behavior loader.

use std::collections::BTreeSet;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use tactics_core::{BehaviorId, TargetPriority, UnitBehavior};

use crate::loaders::{LoadResult, in_file, read_file};

#[derive(Debug, Clone, Deserialize)]
struct BehaviorCatalogSpec {
    behaviors: Vec<BehaviorSpec>,
}

#[derive(Debug, Clone, Deserialize)]
struct BehaviorSpec {
    id: u16,
    name: String,
    /// `closest`, `furthest`, `lowest_health` or `highest_health`.
    priority: String,
}

/// Loader for AI behaviors from RON files.
pub struct BehaviorLoader;

impl BehaviorLoader {
    pub fn parse(content: &str) -> LoadResult<Vec<UnitBehavior>> {
        let catalog: BehaviorCatalogSpec = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse behavior catalog RON: {}", e))?;

        let mut ids = BTreeSet::new();
        catalog
            .behaviors
            .into_iter()
            .map(|spec| -> LoadResult<UnitBehavior> {
                anyhow::ensure!(ids.insert(spec.id), "duplicate behavior id {}", spec.id);
                let priority = TargetPriority::from_str(&spec.priority).map_err(|_| {
                    anyhow::anyhow!(
                        "behavior '{}': unknown target priority '{}'",
                        spec.name,
                        spec.priority
                    )
                })?;
                Ok(UnitBehavior::new(BehaviorId(spec.id), spec.name, priority))
            })
            .collect()
    }

    pub fn load(path: &Path) -> LoadResult<Vec<UnitBehavior>> {
        let content = read_file(path)?;
        in_file(path, Self::parse(&content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_priorities() {
        let behaviors = BehaviorLoader::parse(
            r#"(behaviors: [
                (id: 1, name: "Brawler", priority: "closest"),
                (id: 2, name: "Executioner", priority: "lowest_health"),
            ])"#,
        )
        .unwrap();

        assert_eq!(behaviors[0].priority, TargetPriority::Closest);
        assert_eq!(behaviors[1].priority, TargetPriority::LowestHealth);
        assert_eq!(behaviors[1].id, BehaviorId(2));
    }

    #[test]
    fn unknown_priority_is_a_load_error() {
        let error =
            BehaviorLoader::parse(r#"(behaviors: [(id: 1, name: "Odd", priority: "random")])"#)
                .unwrap_err();
        assert!(error.to_string().contains("random"));
    }

    #[test]
    fn rejects_duplicate_ids() {
        assert!(
            BehaviorLoader::parse(
                r#"(behaviors: [
                    (id: 1, name: "A", priority: "closest"),
                    (id: 1, name: "B", priority: "furthest"),
                ])"#
            )
            .is_err()
        );
    }
}
