use std::collections::BTreeMap;

use crate::combat::{Affinities, AmmoRequirement};
use crate::error::{ErrorSeverity, GameError};
use crate::grid::Coordinate;
use crate::targeting::BehaviorId;

use super::{ResourceMeter, TeamId, UnitId};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnitError {
    #[error("unit {0} is dead")]
    Dead(UnitId),

    #[error("needs {required} action points, has {available}")]
    InsufficientActionPoints { required: u32, available: u32 },

    #[error("needs {required} '{kind}' ammo, has {available}")]
    InsufficientAmmo {
        kind: String,
        required: u32,
        available: u32,
    },
}

impl GameError for UnitError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Dead(_) => "UNIT_DEAD",
            Self::InsufficientActionPoints { .. } => "UNIT_INSUFFICIENT_ACTION_POINTS",
            Self::InsufficientAmmo { .. } => "UNIT_INSUFFICIENT_AMMO",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LifeState {
    #[default]
    Alive,
    Dead,
}

/// What a call to [`Unit::apply_damage`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageApplied {
    /// Health actually removed (never more than the unit had).
    pub dealt: u32,
    pub remaining: u32,
    /// True only on the call that took the unit from alive to dead.
    pub died: bool,
}

/// A combatant on the board.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Unit {
    pub id: UnitId,
    pub team: TeamId,
    pub position: Coordinate,
    /// Base precision before distance and cover.
    pub accuracy: u32,
    pub affinities: Affinities,
    /// Name of the carried weapon in the match's weapon catalog.
    pub weapon: String,
    pub behavior: Option<BehaviorId>,
    health: ResourceMeter,
    action_points: ResourceMeter,
    ammo: BTreeMap<String, u32>,
    life: LifeState,
}

impl Unit {
    pub fn new(
        id: UnitId,
        team: TeamId,
        position: Coordinate,
        max_health: u32,
        action_points_per_turn: u32,
        weapon: impl Into<String>,
    ) -> Self {
        let health = ResourceMeter::full(max_health);
        Self {
            id,
            team,
            position,
            accuracy: 0,
            affinities: Affinities::default(),
            weapon: weapon.into(),
            behavior: None,
            life: if health.is_empty() {
                LifeState::Dead
            } else {
                LifeState::Alive
            },
            health,
            action_points: ResourceMeter::full(action_points_per_turn),
            ammo: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_accuracy(mut self, accuracy: u32) -> Self {
        self.accuracy = accuracy;
        self
    }

    #[must_use]
    pub fn with_affinities(mut self, affinities: Affinities) -> Self {
        self.affinities = affinities;
        self
    }

    #[must_use]
    pub fn with_behavior(mut self, behavior: BehaviorId) -> Self {
        self.behavior = Some(behavior);
        self
    }

    #[must_use]
    pub fn with_ammo(mut self, kind: impl Into<String>, rounds: u32) -> Self {
        self.ammo.insert(kind.into(), rounds);
        self
    }

    /// Starts the unit wounded. A unit starting at zero health is dead.
    #[must_use]
    pub fn with_health(mut self, current: u32) -> Self {
        self.health = ResourceMeter::new(current, self.health.maximum);
        self.life = if self.health.is_empty() {
            LifeState::Dead
        } else {
            LifeState::Alive
        };
        self
    }

    pub fn health(&self) -> u32 {
        self.health.current
    }

    pub fn max_health(&self) -> u32 {
        self.health.maximum
    }

    pub fn action_points(&self) -> u32 {
        self.action_points.current
    }

    pub fn action_points_per_turn(&self) -> u32 {
        self.action_points.maximum
    }

    pub fn life(&self) -> LifeState {
        self.life
    }

    pub fn is_alive(&self) -> bool {
        self.life == LifeState::Alive
    }

    pub fn ammo(&self, kind: &str) -> u32 {
        self.ammo.get(kind).copied().unwrap_or(0)
    }

    /// Removes health, saturating at zero.
    ///
    /// The death transition is reported exactly once; damage to a dead unit
    /// changes nothing.
    pub fn apply_damage(&mut self, amount: u32) -> DamageApplied {
        if !self.is_alive() {
            return DamageApplied {
                dealt: 0,
                remaining: self.health.current,
                died: false,
            };
        }

        let dealt = amount.min(self.health.current);
        self.health.current -= dealt;
        let died = self.health.is_empty();
        if died {
            self.life = LifeState::Dead;
        }

        DamageApplied {
            dealt,
            remaining: self.health.current,
            died,
        }
    }

    /// # Errors
    ///
    /// Returns [`UnitError::InsufficientActionPoints`] without spending anything
    /// if the budget is too small, or [`UnitError::Dead`] for a dead unit.
    pub fn spend_action_points(&mut self, cost: u32) -> Result<(), UnitError> {
        if !self.is_alive() {
            return Err(UnitError::Dead(self.id));
        }
        if cost > self.action_points.current {
            return Err(UnitError::InsufficientActionPoints {
                required: cost,
                available: self.action_points.current,
            });
        }
        self.action_points.current -= cost;
        Ok(())
    }

    /// Restores the per-turn budget at the start of the unit's team turn.
    pub fn refresh_action_points(&mut self) {
        self.action_points.refill();
    }

    pub fn has_ammo(&self, requirement: &AmmoRequirement) -> bool {
        self.ammo(&requirement.kind) >= requirement.per_attack
    }

    /// # Errors
    ///
    /// Returns [`UnitError::InsufficientAmmo`] without consuming anything if
    /// the pouch holds too little.
    pub fn consume_ammo(&mut self, requirement: &AmmoRequirement) -> Result<(), UnitError> {
        let available = self.ammo(&requirement.kind);
        if available < requirement.per_attack {
            return Err(UnitError::InsufficientAmmo {
                kind: requirement.kind.clone(),
                required: requirement.per_attack,
                available,
            });
        }
        self.ammo
            .insert(requirement.kind.clone(), available - requirement.per_attack);
        Ok(())
    }
}
