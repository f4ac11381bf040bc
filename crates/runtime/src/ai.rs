//! Turn driver for AI-controlled units.
//!
//! [`decide`] is a pure read of the session; [`run_ai_turn`] turns decisions
//! into queued actions and ticks them to completion until the unit has
//! nothing useful left to do.

use tactics_core::{Coordinate, TargetPriority, UnitId, check_range, select_target};

use crate::error::{Result, SessionError};
use crate::session::{MatchSession, TickOutcome};

/// Upper bound on actions per unit turn, in case attacks cost nothing.
pub const MAX_ACTIONS_PER_TURN: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiDecision {
    Attack { target: UnitId },
    /// Walk to `goal`, the first affordable tile on the way to the target
    /// from which the weapon reaches it (or as far as the budget allows).
    Advance { goal: Coordinate },
    Idle,
}

/// Chooses the next action for `unit`.
///
/// The target is picked among living enemies with the unit's behavior
/// (closest first when it has none). A legal, affordable attack wins;
/// otherwise the unit advances along its path toward the target, stopping
/// before the target's own tile.
pub fn decide(session: &MatchSession, unit: UnitId) -> Result<AiDecision> {
    let actor = session.unit(unit).ok_or(SessionError::UnknownUnit(unit))?;
    if !actor.is_alive() {
        return Ok(AiDecision::Idle);
    }

    let priority = session
        .behavior_of(actor)
        .map_or(TargetPriority::default(), |behavior| behavior.priority);
    let Some(target) = select_target(actor, session.living_enemies(unit), priority) else {
        tracing::debug!(unit = %unit, "no target left");
        return Ok(AiDecision::Idle);
    };

    match session.check_attack(unit, target.id) {
        Ok(report) => {
            tracing::debug!(unit = %unit, target = %target.id, chance = report.chance, %priority, "ai attacks");
            return Ok(AiDecision::Attack { target: target.id });
        }
        Err(SessionError::OutOfRange(_)) => {}
        Err(error) => {
            tracing::debug!(unit = %unit, target = %target.id, %error, "ai cannot attack");
            return Ok(AiDecision::Idle);
        }
    }

    if actor.action_points() == 0 {
        return Ok(AiDecision::Idle);
    }
    let Some(plan) = session.plan_move(unit, target.position)? else {
        tracing::debug!(unit = %unit, target = %target.id, "no route to target");
        return Ok(AiDecision::Idle);
    };

    let reach = session.weapon_of(actor)?.range;
    let metric = session.rules().metric();
    let mut goal = None;
    for &tile in plan.split.affordable().iter().skip(1) {
        if tile == target.position {
            break;
        }
        goal = Some(tile);
        if check_range(reach, metric.distance(tile, target.position)).is_ok() {
            break;
        }
    }

    Ok(match goal {
        Some(goal) => {
            tracing::debug!(unit = %unit, target = %target.id, goal = %goal, "ai advances");
            AiDecision::Advance { goal }
        }
        None => AiDecision::Idle,
    })
}

/// Plays `unit`'s whole turn: decide, queue, tick until done, repeat.
///
/// Returns the decisions carried out, in order.
pub fn run_ai_turn(session: &mut MatchSession, unit: UnitId) -> Result<Vec<AiDecision>> {
    let mut taken = Vec::new();

    while taken.len() < MAX_ACTIONS_PER_TURN && !session.is_finished() {
        let decision = decide(session, unit)?;
        match decision {
            AiDecision::Idle => break,
            AiDecision::Attack { target } => {
                session.queue_attack(unit, target)?;
            }
            AiDecision::Advance { goal } => {
                session.queue_move(unit, goal)?;
            }
        }
        taken.push(decision);

        let outcome = loop {
            match session.on_tick()? {
                TickOutcome::Advanced => continue,
                outcome => break outcome,
            }
        };
        if outcome == TickOutcome::Interrupted {
            break;
        }
    }

    Ok(taken)
}
