//! Rules configuration loader.

use std::path::Path;

use tactics_core::RulesConfig;

use crate::loaders::{LoadResult, in_file, read_file};

/// Loader for rule tunables from TOML files.
///
/// Every field is optional; missing fields take their documented defaults.
pub struct ConfigLoader;

impl ConfigLoader {
    pub fn parse(content: &str) -> LoadResult<RulesConfig> {
        let config: RulesConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse rules TOML: {}", e))?;

        anyhow::ensure!(
            !config.walkable_terrain.is_empty(),
            "rules leave no walkable terrain"
        );
        anyhow::ensure!(
            config.action_points_per_turn > 0,
            "action_points_per_turn must be positive"
        );

        Ok(config)
    }

    pub fn load(path: &Path) -> LoadResult<RulesConfig> {
        let content = read_file(path)?;
        in_file(path, Self::parse(&content))
    }
}
