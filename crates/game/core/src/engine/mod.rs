//! Round sequencing and the phase machine.
//!
//! The [`GameEngine`] is the only writer of [`RoundState`] and
//! [`GameStatistics`]. It exposes one method per step of the fixed round
//! (supervisor, one decision per player, aggregator, continuation check) and
//! refuses any call that does not match the current [`Phase`]. Decision text
//! is supplied by the caller, so the engine stays synchronous and
//! deterministic while the runtime decides how providers are invoked.

mod errors;
mod observer;
mod phase;
mod steps;
mod topology;

pub use errors::{EngineError, GameWarning, Recovered, StepResult};
pub use observer::{GameObserver, NoopObserver, RoundReport, RoundSnapshot};
pub use phase::{Phase, Signal};
pub use steps::{end_condition, parse_claim};
pub use topology::{Node, Topology};

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::Amount;
use crate::config::GameConfig;
use crate::player::{Player, PlayerId, PlayerRegistry, PromptContext};
use crate::state::RoundState;
use crate::stats::{GameStatistics, GameSummary};

use steps::Decision;

pub struct GameEngine {
    registry: Arc<PlayerRegistry>,
    state: RoundState,
    stats: GameStatistics,
    topology: Option<Topology>,
    phase: Phase,
    /// Stage announced by the current round's supervisor step.
    round_stage: u32,
    decided: BTreeSet<PlayerId>,
    round_claims: Vec<(PlayerId, Amount)>,
    aggregated: bool,
    observer: Arc<dyn GameObserver>,
}

impl GameEngine {
    pub fn new(registry: Arc<PlayerRegistry>, config: &GameConfig) -> Self {
        Self {
            registry,
            state: RoundState::new(config),
            stats: GameStatistics::new(config.game_pot),
            topology: None,
            phase: Phase::Start,
            round_stage: config.stage_number,
            decided: BTreeSet::new(),
            round_claims: Vec::new(),
            aggregated: false,
            observer: Arc::new(NoopObserver),
        }
    }

    /// Validates `players` into a registry and creates an engine over it.
    pub fn from_players(players: Vec<Player>, config: &GameConfig) -> Result<Self, EngineError> {
        let registry = PlayerRegistry::new(players)?;
        Ok(Self::new(Arc::new(registry), config))
    }

    pub fn with_observer(mut self, observer: Arc<dyn GameObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Finalizes the round topology. Must be called before [`Self::begin`].
    pub fn compile(&mut self) -> Result<&Topology, EngineError> {
        self.expect_phase(Phase::Start)?;
        Ok(&*self.topology.insert(Topology::compile(&self.registry)))
    }

    pub fn is_compiled(&self) -> bool {
        self.topology.is_some()
    }

    pub fn topology(&self) -> Result<&Topology, EngineError> {
        self.topology.as_ref().ok_or(EngineError::TopologyNotCompiled)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn statistics(&self) -> &GameStatistics {
        &self.stats
    }

    pub fn registry(&self) -> &PlayerRegistry {
        &self.registry
    }

    pub fn is_finished(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Leaves [`Phase::Start`]; fails if the topology was never compiled.
    pub fn begin(&mut self) -> Result<(), EngineError> {
        self.topology()?;
        self.transition(Signal::Begin)
    }

    /// Supervisor step: announces the stage and counts the round.
    pub fn run_supervisor(&mut self) -> Result<(), EngineError> {
        self.expect_phase(Phase::Supervisor)?;

        let update = steps::supervisor(&self.state);
        self.stats.record_round_started();
        self.state.apply(update);

        self.round_stage = self.state.stage_number();
        self.decided.clear();
        self.round_claims.clear();
        self.aggregated = false;

        self.transition(Signal::Announced)
    }

    /// Players that still owe a decision this round, in registry order.
    pub fn pending_players(&self) -> Vec<PlayerId> {
        if self.phase != Phase::Players {
            return Vec::new();
        }
        self.registry
            .ids()
            .filter(|id| !self.decided.contains(id))
            .collect()
    }

    /// Slot values for `player`'s prompt, built from the current snapshot.
    pub fn prompt_context(&self, player: PlayerId) -> Result<PromptContext, EngineError> {
        let entry = self.player(player)?;
        Ok(PromptContext {
            num_players: self.registry.len(),
            game_pot: self.state.game_pot(),
            stages_left: self.state.stages_left(),
            profile: entry.profile().to_string(),
            previous_decisions: self.state.render_previous_decisions(&self.registry, player),
        })
    }

    /// Renders `player`'s prompt from the current snapshot.
    ///
    /// Only valid while decisions are being collected. Prompts for every
    /// player should be rendered before any decision of the round is
    /// recorded; the history view only ever contains earlier rounds anyway,
    /// since it excludes the acting player and the runtime snapshots once.
    pub fn decision_prompt(&self, player: PlayerId) -> Result<String, EngineError> {
        self.expect_phase(Phase::Players)?;
        let ctx = self.prompt_context(player)?;
        Ok(self.player(player)?.prompt().render(&ctx))
    }

    /// Player decision step for raw provider output.
    pub fn record_decision(&mut self, player: PlayerId, raw: &str) -> StepResult<Amount> {
        self.check_decision(player)?;
        let outcome = steps::decision(self.player(player)?, raw);
        self.commit_decision(player, outcome)
    }

    /// Player decision step when the provider itself failed.
    pub fn record_provider_failure(
        &mut self,
        player: PlayerId,
        reason: impl Into<String>,
    ) -> StepResult<Amount> {
        self.check_decision(player)?;
        let outcome = steps::provider_failure(self.player(player)?, reason.into());
        self.commit_decision(player, outcome)
    }

    /// Aggregator step. Never fails on bad claim data; only on misuse.
    pub fn run_aggregator(&mut self) -> StepResult<Amount> {
        self.expect_phase(Phase::Aggregator)?;
        if self.aggregated {
            return Err(EngineError::InvalidTransition {
                phase: self.phase,
                signal: Signal::AllDecided,
            });
        }

        let player_count = self.topology()?.player_count();
        let (aggregation, warning) = steps::aggregate(&self.state, player_count).into_parts();

        self.stats
            .record_aggregation(aggregation.round_total, aggregation.next_pot);
        self.state.apply(aggregation.update);
        self.aggregated = true;

        Ok(self.report(aggregation.round_total, warning))
    }

    /// Continuation predicate, evaluated after the aggregator step.
    ///
    /// Returns `true` if another round follows. On `false` the statistics are
    /// marked complete and the engine enters [`Phase::Terminal`].
    pub fn evaluate_continuation(&mut self) -> Result<bool, EngineError> {
        self.expect_phase(Phase::Aggregator)?;
        if !self.aggregated {
            return Err(EngineError::InvalidTransition {
                phase: self.phase,
                signal: Signal::Continue,
            });
        }

        let end = steps::end_condition(&self.state);
        match end {
            None => self.transition(Signal::Continue)?,
            Some(condition) => {
                self.stats.record_completion(condition);
                self.transition(Signal::Stop)?;
            }
        }

        let snapshot = RoundSnapshot {
            report: RoundReport {
                stage: self.round_stage,
                claims: self.round_claims.clone(),
                round_total: self.state.players_pot(),
                game_pot: self.state.game_pot(),
                end_condition: end,
            },
            state: self.state.clone(),
        };
        self.observer.on_round(&snapshot);

        Ok(end.is_none())
    }

    /// Aggregator step followed by the continuation predicate.
    pub fn finish_round(&mut self) -> Result<RoundReport, EngineError> {
        let round_total = self.run_aggregator()?.into_parts().0;
        let continuing = self.evaluate_continuation()?;
        Ok(RoundReport {
            stage: self.round_stage,
            claims: self.round_claims.clone(),
            round_total,
            game_pot: self.state.game_pot(),
            end_condition: (!continuing).then(|| self.stats.end_condition()),
        })
    }

    /// Plays one full round, asking `decide` for each player's raw decision.
    ///
    /// All prompts are rendered from the post-supervisor snapshot before any
    /// decision is recorded.
    pub fn play_round<F>(&mut self, decide: &mut F) -> Result<RoundReport, EngineError>
    where
        F: FnMut(&Player, &str) -> String,
    {
        self.run_supervisor()?;

        let prompts = self
            .registry
            .ids()
            .map(|id| self.decision_prompt(id).map(|prompt| (id, prompt)))
            .collect::<Result<Vec<_>, _>>()?;

        let registry = Arc::clone(&self.registry);
        for (id, prompt) in prompts {
            let player = registry
                .get(id)
                .ok_or(EngineError::UnknownPlayer { player: id })?;
            let raw = decide(player, &prompt);
            self.record_decision(id, &raw)?;
        }

        self.finish_round()
    }

    /// Runs rounds until the continuation predicate stops the game.
    pub fn run_with<F>(&mut self, mut decide: F) -> Result<&GameStatistics, EngineError>
    where
        F: FnMut(&Player, &str) -> String,
    {
        if self.phase == Phase::Start {
            self.begin()?;
        }
        while !self.is_finished() {
            self.play_round(&mut decide)?;
        }
        Ok(&self.stats)
    }

    /// End-of-game summary.
    ///
    /// Before completion this reports [`GameWarning::IncompleteGame`] to the
    /// observer and returns the status placeholder.
    pub fn summary(&self) -> GameSummary {
        if !self.stats.game_completed() {
            self.observer.on_warning(&GameWarning::IncompleteGame);
        }
        self.stats.compute_summary()
    }

    fn player(&self, id: PlayerId) -> Result<&Player, EngineError> {
        self.registry
            .get(id)
            .ok_or(EngineError::UnknownPlayer { player: id })
    }

    fn check_decision(&self, player: PlayerId) -> Result<(), EngineError> {
        self.expect_phase(Phase::Players)?;
        self.player(player)?;
        if self.decided.contains(&player) {
            return Err(EngineError::DuplicateDecision {
                player,
                stage: self.round_stage,
            });
        }
        Ok(())
    }

    fn commit_decision(
        &mut self,
        player: PlayerId,
        outcome: Recovered<Decision>,
    ) -> StepResult<Amount> {
        let (decision, warning) = outcome.into_parts();

        self.stats.record_claim(player, decision.claim);
        self.state.apply(decision.update);
        self.decided.insert(player);
        self.round_claims.push((player, decision.claim));

        if self.decided.len() == self.topology()?.player_count() {
            self.transition(Signal::AllDecided)?;
        }

        Ok(self.report(decision.claim, warning))
    }

    fn report<T>(&self, value: T, warning: Option<GameWarning>) -> Recovered<T> {
        match warning {
            Some(warning) => {
                self.observer.on_warning(&warning);
                Recovered::with_default(value, warning)
            }
            None => Recovered::ok(value),
        }
    }

    fn expect_phase(&self, expected: Phase) -> Result<(), EngineError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(EngineError::PhaseMismatch {
                expected,
                actual: self.phase,
            })
        }
    }

    fn transition(&mut self, signal: Signal) -> Result<(), EngineError> {
        self.phase = self.phase.next(signal)?;
        Ok(())
    }
}
