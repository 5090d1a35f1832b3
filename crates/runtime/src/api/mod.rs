//! Public runtime API surface.
//!
//! This module gathers the types exposed to consumers of the runtime crate so
//! other layers can stay focused on orchestration and workers.

pub mod errors;
pub mod providers;
pub mod registry;

pub use errors::{Result, RuntimeError};
pub use providers::{
    DecisionProvider, DecisionRequest, FixedDecisionProvider, FnDecisionProvider,
    ScriptedDecisionProvider,
};
pub use registry::ProviderRegistry;
