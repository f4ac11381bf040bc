//! Content factory for assembling a match from a data directory.

use std::path::{Path, PathBuf};

use tactics_core::{Board, CoverTable, RulesConfig, Unit, UnitBehavior, WeaponData};

use crate::bundle::MatchContent;
use crate::loaders::{
    BehaviorLoader, BoardLoader, ConfigLoader, CoverLoader, LoadResult, RosterLoader,
    WeaponLoader,
};

/// Content factory that loads all match content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── rules.toml      (optional, defaults apply when absent)
/// ├── board.ron
/// ├── weapons.ron
/// ├── covers.ron
/// ├── behaviors.ron
/// └── roster.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub const RULES_FILE: &'static str = "rules.toml";
    pub const BOARD_FILE: &'static str = "board.ron";
    pub const WEAPONS_FILE: &'static str = "weapons.ron";
    pub const COVERS_FILE: &'static str = "covers.ron";
    pub const BEHAVIORS_FILE: &'static str = "behaviors.ron";
    pub const ROSTER_FILE: &'static str = "roster.ron";

    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load rules from `rules.toml`, or the defaults if the file is absent.
    pub fn load_rules(&self) -> LoadResult<RulesConfig> {
        let path = self.data_dir.join(Self::RULES_FILE);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no rules file, using defaults");
            return Ok(RulesConfig::default());
        }
        ConfigLoader::load(&path)
    }

    pub fn load_board(&self) -> LoadResult<Board> {
        BoardLoader::load(&self.data_dir.join(Self::BOARD_FILE))
    }

    pub fn load_weapons(&self) -> LoadResult<Vec<WeaponData>> {
        WeaponLoader::load(&self.data_dir.join(Self::WEAPONS_FILE))
    }

    pub fn load_covers(&self) -> LoadResult<CoverTable> {
        CoverLoader::load(&self.data_dir.join(Self::COVERS_FILE))
    }

    pub fn load_behaviors(&self) -> LoadResult<Vec<UnitBehavior>> {
        BehaviorLoader::load(&self.data_dir.join(Self::BEHAVIORS_FILE))
    }

    /// Load the starting roster; units take their action points from `rules`.
    pub fn load_roster(&self, rules: &RulesConfig) -> LoadResult<Vec<Unit>> {
        RosterLoader::load(&self.data_dir.join(Self::ROSTER_FILE), rules)
    }

    /// Load every content file of the directory.
    pub fn load_all(&self) -> LoadResult<MatchContent> {
        let rules = self.load_rules()?;
        let roster = self.load_roster(&rules)?;
        let content = MatchContent {
            board: self.load_board()?,
            weapons: self.load_weapons()?,
            covers: self.load_covers()?,
            behaviors: self.load_behaviors()?,
            roster,
            rules,
        };

        tracing::info!(
            dir = %self.data_dir.display(),
            units = content.roster.len(),
            weapons = content.weapons.len(),
            covers = content.covers.len(),
            "content loaded"
        );
        Ok(content)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
