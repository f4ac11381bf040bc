//! Topic-based event bus owned by a match session.
//!
//! Presentation and tooling subscribe to the topics they render; the session
//! publishes as it resolves actions. There is no process-wide hub: two
//! sessions never see each other's events.

mod bus;
mod types;

pub use bus::{EventBus, Topic};
pub use types::{AbortedAction, GameEvent};
