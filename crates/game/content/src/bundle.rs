//! Everything a match needs before its first turn.

use tactics_core::{Board, CoverTable, RulesConfig, Unit, UnitBehavior, WeaponData};

/// Static content plus the starting roster of one match.
#[derive(Clone, Debug, Default)]
pub struct MatchContent {
    pub rules: RulesConfig,
    pub board: Board,
    pub weapons: Vec<WeaponData>,
    pub covers: CoverTable,
    pub behaviors: Vec<UnitBehavior>,
    pub roster: Vec<Unit>,
}

impl MatchContent {
    pub fn weapon(&self, name: &str) -> Option<&WeaponData> {
        self.weapons.iter().find(|weapon| weapon.name == name)
    }
}
