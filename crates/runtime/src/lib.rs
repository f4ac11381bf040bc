//! Match orchestration for the tactical rules engine.
//!
//! This crate owns everything that changes during a match. Consumers build a
//! [`MatchSession`] from loaded content, drive it through its explicit hooks,
//! and subscribe to its event bus for presentation.
//!
//! Modules are organized by responsibility:
//! - [`session`] hosts the match state and its action queue
//! - [`events`] provides the session-scoped, topic-based event bus
//! - [`ai`] decides and plays turns for AI-controlled units
pub mod ai;
pub mod error;
pub mod events;
pub mod session;

pub use ai::{AiDecision, decide, run_ai_turn};
pub use error::{Result, SessionError};
pub use events::{AbortedAction, EventBus, GameEvent, Topic};
pub use session::{MatchSession, MovePlan, PendingAction, SessionPhase, TickOutcome};
