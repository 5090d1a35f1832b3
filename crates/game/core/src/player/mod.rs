//! Player identities and their decision-making configuration.
//!
//! Players are immutable once constructed and owned by the
//! [`PlayerRegistry`]; the engine only ever borrows them.
mod prompt;
mod registry;

pub use prompt::{PromptContext, PromptError, PromptSlot, PromptTemplate};
pub use registry::{PlayerRegistry, RegistryError};

use std::fmt;
use std::sync::Arc;

/// Unique player identifier. Must be positive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for PlayerId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// A registered participant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    id: PlayerId,
    name: String,
    profile: String,
    prompt: Arc<PromptTemplate>,
}

impl Player {
    /// Creates a player named `Player_<id>`.
    pub fn new(
        id: impl Into<PlayerId>,
        profile: impl Into<String>,
        prompt: Arc<PromptTemplate>,
    ) -> Self {
        let id = id.into();
        Self {
            id,
            name: format!("Player_{}", id),
            profile: profile.into(),
            prompt,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Behavioral description handed to the decision provider.
    pub fn profile(&self) -> &str {
        &self.profile
    }

    pub fn prompt(&self) -> &PromptTemplate {
        &self.prompt
    }
}
