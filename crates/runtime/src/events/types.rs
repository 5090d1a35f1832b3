//! Event payloads that are not already core types.

use pot_core::{Amount, EndCondition};
use serde::{Deserialize, Serialize};

/// Published once when the continuation predicate stops the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameFinished {
    pub end_condition: EndCondition,
    pub rounds_played: u32,
    pub total_claimed: Amount,
    pub final_pot: Amount,
}
