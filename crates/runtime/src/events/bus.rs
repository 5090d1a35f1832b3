//! Topic-based event bus implementation.

use pot_core::{GameWarning, RoundSnapshot};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::types::GameFinished;

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Per-round state snapshots
    Round,
    /// Recovered errors reported by the engine
    Warning,
    /// Game lifecycle
    Game,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    RoundCompleted(Box<RoundSnapshot>),
    Warning(GameWarning),
    GameFinished(GameFinished),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::RoundCompleted(_) => Topic::Round,
            Event::Warning(_) => Topic::Warning,
            Event::GameFinished(_) => Topic::Game,
        }
    }
}

/// Topic-based event bus
///
/// Publishing is best-effort: events sent while a topic has no subscribers
/// are dropped, and slow subscribers observe `RecvError::Lagged`.
#[derive(Clone)]
pub struct EventBus {
    round: broadcast::Sender<Event>,
    warning: broadcast::Sender<Event>,
    game: broadcast::Sender<Event>,
}

impl EventBus {
    pub const DEFAULT_CAPACITY: usize = 100;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Creates a bus with `capacity` buffered events per topic.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            round: broadcast::channel(capacity).0,
            warning: broadcast::channel(capacity).0,
            game: broadcast::channel(capacity).0,
        }
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Round => &self.round,
            Topic::Warning => &self.warning,
            Topic::Game => &self.game,
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.sender(topic).send(event).is_err() {
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.sender(topic).subscribe()
    }

    pub fn subscribe_multiple(&self, topics: &[Topic]) -> Vec<(Topic, broadcast::Receiver<Event>)> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
