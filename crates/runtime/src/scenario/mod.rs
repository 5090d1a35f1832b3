//! Scenario files: game parameters, a shared prompt, and scripted players.
//!
//! Scenarios are written in RON:
//!
//! ```ron
//! (
//!     game: (game_pot: 100, iterations: 8),
//!     prompt: "Pot: {game_pot}. Stages left: {stages_left}.\n{previous_decisions}",
//!     players: [
//!         (id: 1, profile: "cautious", strategy: Fixed(5)),
//!         (id: 2, name: Some("Greedy"), profile: "greedy", strategy: ShareOfPot(0.5)),
//!     ],
//! )
//! ```

mod strategy;

pub use strategy::{Strategy, StrategyProvider};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use pot_core::{GameConfig, Player, PlayerId, PromptTemplate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::{ProviderRegistry, Result, RuntimeError};
use crate::runtime::{Runtime, RuntimeBuilder};

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to read scenario file {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse scenario: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

impl From<ScenarioError> for RuntimeError {
    fn from(err: ScenarioError) -> Self {
        RuntimeError::InvalidConfig(err.to_string())
    }
}

/// One scripted player.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerSpec {
    pub id: PlayerId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub profile: String,
    pub strategy: Strategy,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub game: GameConfig,
    /// Template shared by every player.
    pub prompt: PromptTemplate,
    pub players: Vec<PlayerSpec>,
}

impl Scenario {
    pub fn from_ron_str(source: &str) -> std::result::Result<Self, ScenarioError> {
        Ok(ron::from_str(source)?)
    }

    /// Loads a scenario from a RON file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ScenarioError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let scenario = Self::from_ron_str(&source)?;

        tracing::info!(
            path = %path.display(),
            players = scenario.players.len(),
            "loaded scenario"
        );
        Ok(scenario)
    }

    /// Builds the players, all sharing the scenario prompt.
    pub fn players(&self) -> Vec<Player> {
        let prompt = Arc::new(self.prompt.clone());
        self.players
            .iter()
            .map(|spec| {
                let player = Player::new(spec.id, spec.profile.clone(), Arc::clone(&prompt));
                match &spec.name {
                    Some(name) => player.with_name(name.clone()),
                    None => player,
                }
            })
            .collect()
    }

    /// Binds every player to its scripted strategy.
    pub fn providers(&self) -> ProviderRegistry {
        let mut registry = ProviderRegistry::new();
        for spec in &self.players {
            registry.bind(spec.id, StrategyProvider::new(spec.strategy.clone()));
        }
        registry
    }

    /// Runtime builder preloaded with this scenario's game, players and
    /// providers.
    pub fn runtime_builder(&self) -> RuntimeBuilder {
        Runtime::builder()
            .game_config(self.game.clone())
            .players(self.players())
            .providers(self.providers())
    }
}
