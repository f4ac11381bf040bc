//! Match session: the only place where match state changes.
//!
//! A session is driven by two explicit hooks. [`MatchSession::on_build`]
//! validates the content and opens the first team turn; [`MatchSession::on_tick`]
//! advances the queued action by one step. Requests (`queue_move`,
//! `queue_attack`) only queue work, and at most one action is in flight at a
//! time. Every state change is published on the session's own [`EventBus`].
mod action;

pub use action::{MovePlan, PendingAction, TickOutcome};

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use tactics_content::MatchContent;
use tactics_core::{
    AStarPlanner, AttackSeeds, BehaviorId, Board, Coordinate, CoverTable, DamageApplied,
    MovementRules, PathPlanner, PcgRng, PrecisionReport, PrecisionRequest, RulesConfig, TeamId,
    TurnState, Unit, UnitBehavior, UnitError, UnitId, WeaponData, resolve_attack,
    resolve_precision, split_path,
};
use tokio::sync::broadcast;

use crate::error::{Result, SessionError};
use crate::events::{AbortedAction, EventBus, GameEvent, Topic};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Content loaded, `on_build` not yet called.
    Setup,
    Running,
    /// One team is left standing.
    Finished,
}

pub struct MatchSession {
    rules: RulesConfig,
    base_movement: MovementRules,
    board: Board,
    weapons: BTreeMap<String, WeaponData>,
    covers: CoverTable,
    behaviors: BTreeMap<BehaviorId, UnitBehavior>,
    units: Vec<Unit>,
    teams: Vec<TeamId>,
    turn: TurnState,
    seed: u64,
    rng: PcgRng,
    planner: Box<dyn PathPlanner + Send + Sync>,
    pending: Option<PendingAction>,
    phase: SessionPhase,
    bus: EventBus,
}

impl MatchSession {
    /// Takes ownership of the match content. Nothing is validated until
    /// [`on_build`](Self::on_build).
    pub fn new(content: MatchContent, seed: u64) -> Self {
        let MatchContent {
            rules,
            board,
            weapons,
            covers,
            behaviors,
            roster,
        } = content;

        Self {
            base_movement: MovementRules::from_config(&rules),
            rules,
            board,
            weapons: weapons
                .into_iter()
                .map(|weapon| (weapon.name.clone(), weapon))
                .collect(),
            covers,
            behaviors: behaviors
                .into_iter()
                .map(|behavior| (behavior.id, behavior))
                .collect(),
            units: roster,
            teams: Vec::new(),
            turn: TurnState::default(),
            seed,
            rng: PcgRng,
            planner: Box::new(AStarPlanner::new()),
            pending: None,
            phase: SessionPhase::Setup,
            bus: EventBus::new(),
        }
    }

    /// Replaces the default A* planner.
    #[must_use]
    pub fn with_planner(mut self, planner: impl PathPlanner + Send + Sync + 'static) -> Self {
        self.planner = Box::new(planner);
        self
    }

    // ------------------------------------------------------------------
    // Lifecycle hooks
    // ------------------------------------------------------------------

    /// Validates the roster against the content and opens the first turn.
    ///
    /// The lowest team id moves first.
    ///
    /// # Errors
    ///
    /// Validation errors for unknown weapons or behaviors, units placed off
    /// the board, on unwalkable terrain or on top of each other, and rosters
    /// with fewer than two living teams.
    pub fn on_build(&mut self) -> Result<()> {
        if self.phase != SessionPhase::Setup {
            return Err(SessionError::AlreadyBuilt);
        }
        if self.units.is_empty() {
            return Err(SessionError::EmptyRoster);
        }

        let mut occupied = BTreeSet::new();
        for unit in &self.units {
            if !self.weapons.contains_key(&unit.weapon) {
                return Err(SessionError::UnknownWeapon {
                    unit: unit.id,
                    weapon: unit.weapon.clone(),
                });
            }
            if let Some(behavior) = unit.behavior {
                if !self.behaviors.contains_key(&behavior) {
                    return Err(SessionError::UnknownBehavior {
                        unit: unit.id,
                        behavior,
                    });
                }
            }
            let walkable = self
                .board
                .terrain(unit.position)
                .is_some_and(|terrain| self.base_movement.allows_terrain(terrain));
            if !walkable || !occupied.insert(unit.position) {
                return Err(SessionError::InvalidPlacement {
                    unit: unit.id,
                    position: unit.position,
                });
            }
        }

        let teams: BTreeSet<TeamId> = self
            .units
            .iter()
            .filter(|unit| unit.is_alive())
            .map(|unit| unit.team)
            .collect();
        if teams.len() < 2 {
            return Err(SessionError::NotEnoughTeams);
        }
        self.teams = teams.into_iter().collect();
        self.turn = TurnState::new(self.teams[0]);
        self.phase = SessionPhase::Running;

        tracing::info!(
            seed = self.seed,
            teams = self.teams.len(),
            units = self.units.len(),
            "match started"
        );
        self.bus.publish(GameEvent::MatchStarted {
            teams: self.teams.clone(),
            units: self.units.len(),
        });
        self.start_team_turn();
        Ok(())
    }

    /// Advances the queued action by one step: one tile of movement, or the
    /// whole attack.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotBuilt`] / [`SessionError::MatchFinished`] outside a
    /// running match, or the reason a queued attack could no longer be made.
    pub fn on_tick(&mut self) -> Result<TickOutcome> {
        self.ensure_running()?;
        let Some(action) = self.pending.take() else {
            return Ok(TickOutcome::Idle);
        };

        match action {
            PendingAction::Move { unit, remaining } => self.tick_move(unit, remaining),
            PendingAction::Attack { attacker, target } => self.tick_attack(attacker, target),
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Plans a route for `unit` to `goal` under the current occupancy.
    ///
    /// `Ok(None)` means no path exists. Other units block every tile except
    /// the goal itself, so a plan may end on an occupied tile.
    pub fn plan_move(&self, unit: UnitId, goal: Coordinate) -> Result<Option<MovePlan>> {
        let mover = self.living_unit(unit)?;
        let rules = self.movement_rules_for(unit);

        let plan = self
            .planner
            .plan(&self.board, mover.position, goal, &rules)
            .map(|path| {
                let split = split_path(&path, mover.action_points());
                MovePlan { path, split }
            });

        tracing::debug!(
            unit = %unit,
            from = %mover.position,
            to = %goal,
            cost = ?plan.as_ref().map(MovePlan::cost),
            "move planned"
        );
        Ok(plan)
    }

    /// Hit chance of `attacker` against `target`, with its breakdown.
    ///
    /// # Errors
    ///
    /// [`SessionError::OutOfRange`] when the weapon cannot reach. This is
    /// distinct from a legal attack with a 0% chance.
    pub fn preview_attack(&self, attacker: UnitId, target: UnitId) -> Result<PrecisionReport> {
        let shooter = self.living_unit(attacker)?;
        let victim = self.living_unit(target)?;
        if shooter.team == victim.team {
            return Err(SessionError::FriendlyTarget(target));
        }

        let request = PrecisionRequest {
            attacker: shooter.position,
            target: victim.position,
            base_precision: shooter.accuracy,
            weapon: self.weapon_of(shooter)?,
            metric: self.rules.metric(),
        };
        Ok(resolve_precision(&request, &self.board, &self.covers)?)
    }

    /// [`preview_attack`](Self::preview_attack) plus the attacker's action
    /// point and ammunition budget.
    pub fn check_attack(&self, attacker: UnitId, target: UnitId) -> Result<PrecisionReport> {
        let report = self.preview_attack(attacker, target)?;
        let shooter = self.living_unit(attacker)?;

        let cost = self.rules.attack_cost;
        if shooter.action_points() < cost {
            return Err(UnitError::InsufficientActionPoints {
                required: cost,
                available: shooter.action_points(),
            }
            .into());
        }
        if let Some(ammo) = &self.weapon_of(shooter)?.ammo {
            if !shooter.has_ammo(ammo) {
                return Err(UnitError::InsufficientAmmo {
                    kind: ammo.kind.clone(),
                    required: ammo.per_attack,
                    available: shooter.ammo(&ammo.kind),
                }
                .into());
            }
        }
        Ok(report)
    }

    /// Team left standing, if exactly one remains.
    pub fn winner(&self) -> Option<TeamId> {
        let mut standing = self
            .units
            .iter()
            .filter(|unit| unit.is_alive())
            .map(|unit| unit.team);
        let first = standing.next()?;
        standing.all(|team| team == first).then_some(first)
    }

    /// Movement rules for `unit`: match terrain rules, with every other
    /// living unit's tile blocking.
    pub fn movement_rules_for(&self, unit: UnitId) -> MovementRules {
        let blocking = self
            .units
            .iter()
            .filter(|other| other.id != unit && other.is_alive())
            .map(|other| other.position);
        self.base_movement.clone().with_blocking(blocking)
    }

    // ------------------------------------------------------------------
    // Requests
    // ------------------------------------------------------------------

    /// Queues a move of `unit` toward `goal`.
    ///
    /// Only the affordable prefix is queued; the returned plan shows the
    /// overflow the unit could not pay for.
    pub fn queue_move(&mut self, unit: UnitId, goal: Coordinate) -> Result<MovePlan> {
        let mover = self.ensure_can_act(unit)?;
        let start = mover.position;
        let action_points = mover.action_points();

        if start == goal {
            return Err(SessionError::AlreadyThere(unit));
        }
        if self.occupant(goal).is_some() {
            return Err(SessionError::TileOccupied(goal));
        }
        if action_points == 0 {
            return Err(UnitError::InsufficientActionPoints {
                required: 1,
                available: 0,
            }
            .into());
        }

        let plan = self
            .plan_move(unit, goal)?
            .ok_or(SessionError::NoPath { from: start, to: goal })?;
        let remaining: VecDeque<Coordinate> =
            plan.split.affordable().iter().skip(1).copied().collect();

        tracing::debug!(
            unit = %unit,
            steps = remaining.len(),
            cost = %plan.cost(),
            "move queued"
        );
        self.pending = Some(PendingAction::Move { unit, remaining });
        Ok(plan)
    }

    /// Queues an attack. Legality, action points and ammunition are checked
    /// now and again when the attack resolves.
    ///
    /// A refused attack is published as [`GameEvent::AttackRejected`].
    pub fn queue_attack(&mut self, attacker: UnitId, target: UnitId) -> Result<PrecisionReport> {
        self.ensure_can_act(attacker)?;

        let report = match self.check_attack(attacker, target) {
            Ok(report) => report,
            Err(error) => {
                self.reject_attack(attacker, target, &error);
                return Err(error);
            }
        };

        tracing::debug!(attacker = %attacker, target = %target, chance = report.chance, "attack queued");
        self.pending = Some(PendingAction::Attack { attacker, target });
        Ok(report)
    }

    /// Stops the action in progress. Tiles already walked and points already
    /// spent stay as they are.
    pub fn abort_action(&mut self) -> Result<AbortedAction> {
        let action = self
            .pending
            .take()
            .ok_or(SessionError::NoActionInProgress)?;

        let unit = action.unit();
        let aborted = match action {
            PendingAction::Move { unit, remaining } => AbortedAction::Move {
                at: self
                    .unit(unit)
                    .map(|mover| mover.position)
                    .ok_or(SessionError::UnknownUnit(unit))?,
                skipped: remaining.len(),
            },
            PendingAction::Attack { target, .. } => AbortedAction::Attack { target },
        };

        tracing::debug!(unit = %unit, action = ?aborted, "action aborted");
        self.bus.publish(GameEvent::ActionAborted {
            unit,
            action: aborted.clone(),
        });
        Ok(aborted)
    }

    /// Damage from outside any attack (hazards, scripted effects). No roll
    /// and no resistances; allowed while an action is in flight, which then
    /// sees the new state when it next ticks.
    pub fn apply_environment_damage(&mut self, unit: UnitId, amount: u32) -> Result<DamageApplied> {
        self.ensure_running()?;
        let index = self.index_of(unit)?;
        let applied = self.units[index].apply_damage(amount);

        tracing::debug!(
            unit = %unit,
            dealt = applied.dealt,
            remaining = applied.remaining,
            "environment damage"
        );
        if applied.died {
            self.unit_died(unit, None);
        }
        Ok(applied)
    }

    /// Hands the turn to the next team with living units and restores their
    /// action points. Wrapping around to the first team completes a round.
    pub fn end_turn(&mut self) -> Result<TeamId> {
        self.ensure_running()?;
        if self.pending.is_some() {
            return Err(SessionError::ActionInProgress);
        }

        let count = self.teams.len();
        let current = self
            .teams
            .iter()
            .position(|team| *team == self.turn.active_team)
            .unwrap_or(0);
        let next = (current + 1..=current + count)
            .find(|index| self.team_alive(self.teams[index % count]))
            .ok_or(SessionError::MatchFinished)?;

        if next >= count {
            self.turn.round += 1;
        }
        self.turn.active_team = self.teams[next % count];
        self.start_team_turn();
        Ok(self.turn.active_team)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase == SessionPhase::Finished
    }

    pub fn rules(&self) -> &RulesConfig {
        &self.rules
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn covers(&self) -> &CoverTable {
        &self.covers
    }

    pub fn turn(&self) -> &TurnState {
        &self.turn
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn pending_action(&self) -> Option<&PendingAction> {
        self.pending.as_ref()
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.iter().find(|unit| unit.id == id)
    }

    /// Living unit standing on `coord`.
    pub fn occupant(&self, coord: Coordinate) -> Option<&Unit> {
        self.units
            .iter()
            .find(|unit| unit.is_alive() && unit.position == coord)
    }

    /// Living units hostile to `unit`, in roster order.
    pub fn living_enemies(&self, unit: UnitId) -> impl Iterator<Item = &Unit> {
        let team = self.unit(unit).map(|asker| asker.team);
        self.units
            .iter()
            .filter(move |other| other.is_alive() && Some(other.team) != team)
    }

    /// Living units of the team whose turn it is, in roster order.
    pub fn active_units(&self) -> Vec<UnitId> {
        self.units
            .iter()
            .filter(|unit| unit.is_alive() && unit.team == self.turn.active_team)
            .map(|unit| unit.id)
            .collect()
    }

    pub fn weapon(&self, name: &str) -> Option<&WeaponData> {
        self.weapons.get(name)
    }

    pub fn weapon_of(&self, unit: &Unit) -> Result<&WeaponData> {
        self.weapons
            .get(&unit.weapon)
            .ok_or_else(|| SessionError::UnknownWeapon {
                unit: unit.id,
                weapon: unit.weapon.clone(),
            })
    }

    pub fn behavior_of(&self, unit: &Unit) -> Option<&UnitBehavior> {
        unit.behavior.and_then(|id| self.behaviors.get(&id))
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<GameEvent> {
        self.bus.subscribe(topic)
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn ensure_running(&self) -> Result<()> {
        match self.phase {
            SessionPhase::Setup => Err(SessionError::NotBuilt),
            SessionPhase::Running => Ok(()),
            SessionPhase::Finished => Err(SessionError::MatchFinished),
        }
    }

    fn ensure_can_act(&self, unit: UnitId) -> Result<&Unit> {
        self.ensure_running()?;
        if self.pending.is_some() {
            return Err(SessionError::ActionInProgress);
        }
        let actor = self.living_unit(unit)?;
        if actor.team != self.turn.active_team {
            return Err(SessionError::WrongTeam {
                active: self.turn.active_team,
                requested: actor.team,
            });
        }
        Ok(actor)
    }

    fn living_unit(&self, id: UnitId) -> Result<&Unit> {
        let unit = self.unit(id).ok_or(SessionError::UnknownUnit(id))?;
        if !unit.is_alive() {
            return Err(SessionError::UnitDead(id));
        }
        Ok(unit)
    }

    fn index_of(&self, id: UnitId) -> Result<usize> {
        self.units
            .iter()
            .position(|unit| unit.id == id)
            .ok_or(SessionError::UnknownUnit(id))
    }

    fn team_alive(&self, team: TeamId) -> bool {
        self.units
            .iter()
            .any(|unit| unit.team == team && unit.is_alive())
    }

    fn start_team_turn(&mut self) {
        let team = self.turn.active_team;
        for unit in self
            .units
            .iter_mut()
            .filter(|unit| unit.team == team && unit.is_alive())
        {
            unit.refresh_action_points();
        }

        tracing::info!(round = self.turn.round, team = %team, "turn started");
        self.bus.publish(GameEvent::TurnStarted {
            round: self.turn.round,
            team,
        });
    }

    fn tick_move(&mut self, unit: UnitId, mut remaining: VecDeque<Coordinate>) -> Result<TickOutcome> {
        let Some(next) = remaining.pop_front() else {
            return Ok(TickOutcome::Completed);
        };
        let index = self.index_of(unit)?;
        let from = self.units[index].position;
        let goal = remaining.back().copied().unwrap_or(next);

        let rules = self.movement_rules_for(unit);
        let legal = self.units[index].is_alive()
            && self.occupant(next).is_none()
            && rules.can_step(&self.board, from, next, goal);
        if !legal || self.units[index].spend_action_points(1).is_err() {
            let aborted = AbortedAction::Move {
                at: from,
                skipped: remaining.len() + 1,
            };
            tracing::warn!(unit = %unit, from = %from, to = %next, "move interrupted");
            self.bus.publish(GameEvent::ActionAborted {
                unit,
                action: aborted,
            });
            return Ok(TickOutcome::Interrupted);
        }

        let mover = &mut self.units[index];
        mover.position = next;
        let action_points_left = mover.action_points();

        tracing::debug!(unit = %unit, from = %from, to = %next, action_points_left, "unit moved");
        self.bus.publish(GameEvent::UnitMoved {
            unit,
            from,
            to: next,
            action_points_left,
        });

        if remaining.is_empty() {
            Ok(TickOutcome::Completed)
        } else {
            self.pending = Some(PendingAction::Move { unit, remaining });
            Ok(TickOutcome::Advanced)
        }
    }

    fn tick_attack(&mut self, attacker: UnitId, target: UnitId) -> Result<TickOutcome> {
        let precision = match self.check_attack(attacker, target) {
            Ok(report) => report,
            Err(error) => {
                self.reject_attack(attacker, target, &error);
                return Err(error);
            }
        };

        let shooter = self.index_of(attacker)?;
        let victim = self.index_of(target)?;
        let weapon = self.weapon_of(&self.units[shooter])?.clone();

        self.units[shooter].spend_action_points(self.rules.attack_cost)?;
        if let Some(ammo) = &weapon.ammo {
            self.units[shooter].consume_ammo(ammo)?;
        }

        let nonce = self.turn.next_nonce();
        let seeds = AttackSeeds::derive(self.seed, nonce, attacker.0);
        let result = resolve_attack(
            precision.chance,
            &weapon,
            &self.units[victim].affinities,
            &self.rules.damage_modifiers(),
            &self.rng,
            seeds,
        );
        let applied = result
            .damage
            .map(|damage| self.units[victim].apply_damage(damage.adjusted));
        let dealt = applied.map_or(0, |applied| applied.dealt);

        tracing::debug!(
            attacker = %attacker,
            target = %target,
            chance = result.chance,
            roll = result.roll,
            outcome = ?result.outcome,
            dealt,
            "attack resolved"
        );
        self.bus.publish(GameEvent::AttackResolved {
            attacker,
            target,
            precision,
            result,
            dealt,
        });

        if applied.is_some_and(|applied| applied.died) {
            self.unit_died(target, Some(attacker));
        }

        Ok(TickOutcome::Completed)
    }

    fn reject_attack(&self, attacker: UnitId, target: UnitId, error: &SessionError) {
        tracing::debug!(attacker = %attacker, target = %target, %error, "attack rejected");
        self.bus.publish(GameEvent::AttackRejected {
            attacker,
            target,
            reason: error.to_string(),
        });
    }

    fn unit_died(&mut self, unit: UnitId, killer: Option<UnitId>) {
        tracing::info!(unit = %unit, killer = ?killer, "unit died");
        self.bus.publish(GameEvent::UnitDied { unit, killer });
        self.check_match_end();
    }

    fn check_match_end(&mut self) {
        let Some(winner) = self.winner() else {
            return;
        };
        self.phase = SessionPhase::Finished;
        self.pending = None;

        tracing::info!(winner = %winner, rounds = self.turn.round, "match ended");
        self.bus.publish(GameEvent::MatchEnded {
            winner: Some(winner),
            rounds: self.turn.round,
        });
    }
}
