//! Scripted decision strategies usable from scenario files.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use pot_core::Amount;
use serde::{Deserialize, Serialize};

use crate::api::{DecisionProvider, DecisionRequest, Result};

/// How a scripted player answers its decision prompt.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Strategy {
    /// Claims the same amount every round.
    Fixed(Amount),
    /// Claims each listed amount in turn, then keeps repeating the last one.
    Sequence(Vec<Amount>),
    /// Claims `floor(game_pot * share / num_players)`.
    ShareOfPot(f64),
    /// Answers with arbitrary text, repeating the last entry.
    Raw(Vec<String>),
}

/// [`DecisionProvider`] that plays a [`Strategy`].
#[derive(Debug)]
pub struct StrategyProvider {
    strategy: Strategy,
    round: AtomicUsize,
}

impl StrategyProvider {
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            round: AtomicUsize::new(0),
        }
    }

    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    fn answer(&self, request: &DecisionRequest) -> String {
        let round = self.round.fetch_add(1, Ordering::Relaxed);
        match &self.strategy {
            Strategy::Fixed(claim) => claim.to_string(),
            Strategy::Sequence(claims) => nth_or_last(claims, round)
                .copied()
                .unwrap_or(0)
                .to_string(),
            Strategy::ShareOfPot(share) => {
                let players = request.context.num_players.max(1) as f64;
                let claim = (request.context.game_pot as f64 * share / players).floor();
                (claim as Amount).to_string()
            }
            Strategy::Raw(answers) => nth_or_last(answers, round).cloned().unwrap_or_default(),
        }
    }
}

fn nth_or_last<T>(items: &[T], n: usize) -> Option<&T> {
    items.get(n).or_else(|| items.last())
}

#[async_trait]
impl DecisionProvider for StrategyProvider {
    async fn decide(&self, request: &DecisionRequest) -> Result<String> {
        Ok(self.answer(request))
    }
}

impl From<Strategy> for StrategyProvider {
    fn from(strategy: Strategy) -> Self {
        Self::new(strategy)
    }
}
