use crate::Amount;

/// Initial parameters for a single game run.
///
/// `game_pot` and `iterations` are expected to be positive; the engine does not
/// guard against a caller handing it a degenerate configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameConfig {
    /// Pot at the start of the first round.
    pub game_pot: Amount,
    /// Round limit. The game stops once `stage_number >= iterations`.
    pub iterations: u32,
    /// Stage number announced by the first supervisor step.
    #[cfg_attr(feature = "serde", serde(default = "GameConfig::default_stage_number"))]
    pub stage_number: u32,
}

impl GameConfig {
    pub const DEFAULT_GAME_POT: Amount = 100;
    pub const DEFAULT_ITERATIONS: u32 = 8;
    pub const DEFAULT_STAGE_NUMBER: u32 = 1;

    pub fn new(game_pot: Amount, iterations: u32) -> Self {
        Self {
            game_pot,
            iterations,
            stage_number: Self::DEFAULT_STAGE_NUMBER,
        }
    }

    pub fn with_stage_number(mut self, stage_number: u32) -> Self {
        self.stage_number = stage_number;
        self
    }

    #[cfg(feature = "serde")]
    fn default_stage_number() -> u32 {
        Self::DEFAULT_STAGE_NUMBER
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_GAME_POT, Self::DEFAULT_ITERATIONS)
    }
}
