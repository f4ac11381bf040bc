//! Topic-based event bus implementation.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::types::GameEvent;

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Unit positions changing
    Movement,
    /// Attacks and deaths
    Combat,
    /// Match and turn lifecycle, aborted actions
    Turn,
}

impl Topic {
    pub const ALL: [Topic; 3] = [Topic::Movement, Topic::Combat, Topic::Turn];
}

impl GameEvent {
    pub fn topic(&self) -> Topic {
        match self {
            GameEvent::UnitMoved { .. } => Topic::Movement,
            GameEvent::AttackResolved { .. }
            | GameEvent::AttackRejected { .. }
            | GameEvent::UnitDied { .. } => Topic::Combat,
            GameEvent::MatchStarted { .. }
            | GameEvent::TurnStarted { .. }
            | GameEvent::ActionAborted { .. }
            | GameEvent::MatchEnded { .. } => Topic::Turn,
        }
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Channels are created up front and never change,
/// so clones share them without locking.
pub struct EventBus {
    channels: Arc<HashMap<Topic, broadcast::Sender<GameEvent>>>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let channels = Topic::ALL
            .into_iter()
            .map(|topic| (topic, broadcast::channel(capacity).0))
            .collect();

        Self {
            channels: Arc::new(channels),
        }
    }

    /// Publish an event to its corresponding topic.
    ///
    /// Best-effort: with nobody subscribed the event is dropped, and a slow
    /// subscriber loses the oldest events once its buffer is full.
    pub fn publish(&self, event: GameEvent) {
        let topic = event.topic();
        if let Some(tx) = self.channels.get(&topic) {
            if tx.send(event).is_err() {
                // No subscribers for this topic - this is normal, not an error
                tracing::trace!("No subscribers for topic {:?}", topic);
            }
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    /// Synchronous callers drain it with `try_recv`.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<GameEvent> {
        match self.channels.get(&topic) {
            Some(tx) => tx.subscribe(),
            // Every topic is created in `with_capacity`; a closed receiver is
            // the harmless fallback.
            None => broadcast::channel(1).1,
        }
    }

    /// Subscribe to multiple topics
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<GameEvent>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            channels: Arc::clone(&self.channels),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use tactics_core::{Coordinate, TeamId, UnitId};
    use tokio::sync::broadcast::error::TryRecvError;

    use super::*;

    fn moved() -> GameEvent {
        GameEvent::UnitMoved {
            unit: UnitId(1),
            from: Coordinate::new(0, 0),
            to: Coordinate::new(0, 1),
            action_points_left: 3,
        }
    }

    #[test]
    fn routes_events_by_topic() {
        let bus = EventBus::new();
        let mut movement = bus.subscribe(Topic::Movement);
        let mut turn = bus.subscribe(Topic::Turn);

        bus.publish(moved());
        bus.publish(GameEvent::TurnStarted {
            round: 0,
            team: TeamId(1),
        });

        assert_eq!(movement.try_recv().unwrap(), moved());
        assert!(matches!(movement.try_recv(), Err(TryRecvError::Empty)));
        assert!(matches!(turn.try_recv().unwrap(), GameEvent::TurnStarted { .. }));
    }

    #[test]
    fn publishing_without_subscribers_is_fine() {
        let bus = EventBus::new();
        bus.publish(moved());

        let mut late = bus.subscribe(Topic::Movement);
        assert!(matches!(late.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn clones_share_channels() {
        let bus = EventBus::new();
        let mut rx = bus.clone().subscribe(Topic::Movement);
        bus.publish(moved());
        assert!(rx.try_recv().is_ok());
    }
}
