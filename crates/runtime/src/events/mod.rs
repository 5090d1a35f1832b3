//! Topic-based event bus for runtime events.
//!
//! Events are published to specific topics, and consumers subscribe only to
//! the topics they need. [`EventBusObserver`] bridges the engine's observer
//! callbacks onto the bus.

mod bus;
mod observer;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use observer::EventBusObserver;
pub use types::GameFinished;
