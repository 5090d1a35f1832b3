//! Async orchestration for the shared-pot game.
//!
//! This crate drives the deterministic [`pot_core::GameEngine`] with
//! asynchronous decision providers. Consumers embed [`Runtime`] to compile the
//! round topology, run the game, subscribe to events, and read the summary.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides the topic-based event bus and the engine observer
//! - [`scenario`] loads game setups from RON files
//! - [`workers`] collects provider decisions and tracks their metrics
pub mod api;
pub mod events;
pub mod runtime;
pub mod scenario;

mod workers;

pub use api::{
    DecisionProvider, DecisionRequest, FixedDecisionProvider, FnDecisionProvider,
    ProviderRegistry, Result, RuntimeError, ScriptedDecisionProvider,
};
pub use events::{Event, EventBus, EventBusObserver, GameFinished, Topic};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
pub use scenario::{PlayerSpec, Scenario, ScenarioError, Strategy, StrategyProvider};
pub use workers::{DecisionMetrics, MetricsSnapshot};
