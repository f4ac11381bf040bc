//! Cover types: terrain that shields whoever stands on it.

use std::collections::BTreeSet;

use crate::env::TerrainKind;

/// Maps a set of terrain kinds to a protection percentage.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CoverType {
    pub name: String,
    pub covering_terrain: BTreeSet<TerrainKind>,
    /// Precision subtracted from attacks against a unit in this cover.
    pub protection: u32,
    /// Presentation-only feedback sprite. Never read by the rules.
    #[cfg_attr(feature = "serde", serde(default))]
    pub feedback_sprite: Option<String>,
}

impl CoverType {
    pub fn new<I>(name: impl Into<String>, covering_terrain: I, protection: u32) -> Self
    where
        I: IntoIterator<Item = TerrainKind>,
    {
        Self {
            name: name.into(),
            covering_terrain: covering_terrain.into_iter().collect(),
            protection,
            feedback_sprite: None,
        }
    }

    pub fn covers(&self, terrain: TerrainKind) -> bool {
        self.covering_terrain.contains(&terrain)
    }
}

/// Configured cover types in priority order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CoverTable {
    types: Vec<CoverType>,
}

impl CoverTable {
    pub fn new(types: Vec<CoverType>) -> Self {
        Self { types }
    }

    /// First cover type, in table order, that covers `terrain`.
    pub fn lookup(&self, terrain: TerrainKind) -> Option<&CoverType> {
        self.types.iter().find(|cover| cover.covers(terrain))
    }

    pub fn iter(&self) -> impl Iterator<Item = &CoverType> {
        self.types.iter()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
