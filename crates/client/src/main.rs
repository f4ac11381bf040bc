//! Headless skirmish simulator.
//!
//! Loads a content directory, builds a match and lets the AI play both sides
//! until one team is wiped out or the round limit is reached. Everything is
//! reported through `tracing`; set `RUST_LOG=debug` to follow every step.
//!
//! ```bash
//! SIM_DATA_DIR=data/skirmish SIM_SEED=7 cargo run -p tactics-sim
//! ```
mod config;

use std::collections::HashMap;

use anyhow::{Context, Result};
use tactics_content::ContentFactory;
use tactics_core::{AttackOutcome, GameError};
use tactics_runtime::{GameEvent, MatchSession, Topic, run_ai_turn};
use tokio::sync::broadcast::Receiver;

use crate::config::SimConfig;

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = SimConfig::from_env();
    tracing::info!(dir = %config.data_dir.display(), seed = config.seed, "loading skirmish");

    let content = ContentFactory::new(&config.data_dir)
        .load_all()
        .with_context(|| format!("loading content from {}", config.data_dir.display()))?;

    let mut session = MatchSession::new(content, config.seed);
    let mut feed = session.bus().subscribe_multiple(&[Topic::Combat]);
    session.on_build()?;

    while !session.is_finished() && session.turn().round < config.max_rounds {
        for unit in session.active_units() {
            if session.is_finished() {
                break;
            }
            if let Err(error) = run_ai_turn(&mut session, unit) {
                let severity = error.severity();
                if !severity.is_recoverable() {
                    return Err(error).context("ai turn failed");
                }
                tracing::warn!(
                    unit = %unit,
                    code = error.error_code(),
                    severity = severity.as_str(),
                    %error,
                    "ai turn cut short"
                );
            }
            narrate(&session, &mut feed);
        }
        if !session.is_finished() {
            session.end_turn()?;
        }
    }

    report(&session);
    Ok(())
}

/// Logs combat events since the last call.
fn narrate(session: &MatchSession, feed: &mut HashMap<Topic, Receiver<GameEvent>>) {
    for rx in feed.values_mut() {
        while let Ok(event) = rx.try_recv() {
            match event {
                GameEvent::AttackResolved {
                    attacker,
                    target,
                    precision,
                    result,
                    dealt,
                } => {
                    let cover = precision.cover.map(|cover| cover.name);
                    match result.outcome {
                        AttackOutcome::Hit => tracing::info!(
                            round = session.turn().round,
                            "{attacker} hits {target} for {dealt} ({}% chance, cover {:?})",
                            result.chance,
                            cover
                        ),
                        AttackOutcome::Miss => tracing::info!(
                            round = session.turn().round,
                            "{attacker} misses {target} ({}% chance, rolled {})",
                            result.chance,
                            result.roll
                        ),
                    }
                }
                GameEvent::UnitDied {
                    unit,
                    killer: Some(killer),
                } => {
                    tracing::info!("{unit} falls to {killer}");
                }
                GameEvent::UnitDied { unit, killer: None } => {
                    tracing::info!("{unit} dies");
                }
                other => tracing::debug!(event = ?other, "combat event"),
            }
        }
    }
}

fn report(session: &MatchSession) {
    match session.winner() {
        Some(team) => tracing::info!(rounds = session.turn().round, "{team} wins"),
        None => tracing::info!(rounds = session.turn().round, "round limit reached, draw"),
    }

    for unit in session.units() {
        tracing::info!(
            "{} ({}) at {}: {}/{} health{}",
            unit.id,
            unit.team,
            unit.position,
            unit.health(),
            unit.max_health(),
            if unit.is_alive() { "" } else { ", dead" }
        );
    }
}
