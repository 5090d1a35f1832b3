//! High-level runtime orchestrator.
//!
//! The runtime owns the engine, resolves a decision provider per player, and
//! exposes a builder-based API for clients to drive a game to completion.

use std::sync::Arc;

use tokio::sync::broadcast;

use pot_core::{
    GameConfig, GameEngine, GameStatistics, GameSummary, GameWarning, Phase, Player, PlayerId,
    PlayerRegistry, RoundReport, Topology,
};

use crate::api::{DecisionProvider, DecisionRequest, ProviderRegistry, Result, RuntimeError};
use crate::events::{Event, EventBus, EventBusObserver, GameFinished, Topic};
use crate::workers::{DecisionJob, DecisionMetrics, MetricsSnapshot, collect_decisions};

/// Runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub game_config: GameConfig,
    /// Buffered events per event-bus topic.
    pub event_buffer_size: usize,
    /// Invoke providers of one round concurrently instead of one by one.
    pub concurrent_decisions: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            game_config: GameConfig::default(),
            event_buffer_size: EventBus::DEFAULT_CAPACITY,
            concurrent_decisions: true,
        }
    }
}

/// Drives one game run.
pub struct Runtime {
    config: RuntimeConfig,
    engine: GameEngine,
    providers: ProviderRegistry,
    bus: EventBus,
    metrics: Arc<DecisionMetrics>,
}

impl Runtime {
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    pub fn statistics(&self) -> &GameStatistics {
        self.engine.statistics()
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.bus.subscribe(topic)
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Finalizes the round topology. Must be called before [`Self::run`].
    pub fn compile(&mut self) -> Result<&Topology> {
        let topology = self.engine.compile()?;
        tracing::info!(%topology, "compiled round topology");
        Ok(topology)
    }

    pub fn is_finished(&self) -> bool {
        self.engine.is_finished()
    }

    /// Plays rounds until the game ends and returns the final statistics.
    ///
    /// # Errors
    ///
    /// Fails with `EngineError::TopologyNotCompiled` if [`Self::compile`] was
    /// not called. Provider errors and unparseable answers do not fail the run.
    pub async fn run(&mut self) -> Result<&GameStatistics> {
        if self.engine.phase() == Phase::Start {
            self.engine.begin()?;
            tracing::info!(
                players = self.engine.registry().len(),
                game_pot = self.engine.state().game_pot(),
                iterations = self.engine.state().iterations(),
                "game started"
            );
        }
        while !self.engine.is_finished() {
            self.play_round().await?;
        }
        Ok(self.engine.statistics())
    }

    /// Plays a single round: supervisor, all player decisions, aggregator.
    pub async fn play_round(&mut self) -> Result<RoundReport> {
        match self.engine.phase() {
            Phase::Start => self.engine.begin()?,
            Phase::Terminal => return Err(RuntimeError::GameFinished),
            _ => {}
        }

        self.engine.run_supervisor()?;
        tracing::debug!(stage = self.engine.state().stage_number(), "supervisor step");

        let jobs = self.decision_jobs()?;
        let outcomes =
            collect_decisions(jobs, self.config.concurrent_decisions, &self.metrics).await;

        for outcome in outcomes {
            let recorded = match outcome.answer {
                Ok(raw) => self.engine.record_decision(outcome.player, &raw)?,
                Err(err) => self
                    .engine
                    .record_provider_failure(outcome.player, err.to_string())?,
            };
            if let Some(GameWarning::InvalidDecision { .. }) = recorded.warning() {
                self.metrics.record_parse_failure();
            }
            tracing::debug!(
                player = %outcome.player,
                claim = recorded.value(),
                "decision recorded"
            );
        }

        let report = self.engine.finish_round()?;
        if let Some(end_condition) = report.end_condition {
            let stats = self.engine.statistics();
            tracing::info!(
                %end_condition,
                rounds = stats.rounds_played(),
                final_pot = stats.final_pot(),
                "game finished"
            );
            self.bus.publish(Event::GameFinished(GameFinished {
                end_condition,
                rounds_played: stats.rounds_played(),
                total_claimed: stats.total_claimed(),
                final_pot: stats.final_pot(),
            }));
        }
        Ok(report)
    }

    /// End-of-game summary; a placeholder (and a warning) before completion.
    pub fn summary(&self) -> GameSummary {
        self.engine.summary()
    }

    fn decision_jobs(&self) -> Result<Vec<DecisionJob>> {
        self.engine
            .registry()
            .iter()
            .map(|player| {
                let id = player.id();
                Ok(DecisionJob {
                    request: DecisionRequest {
                        player: id,
                        name: player.name().to_string(),
                        prompt: self.engine.decision_prompt(id)?,
                        context: self.engine.prompt_context(id)?,
                    },
                    provider: self.providers.get_for_player(id)?,
                })
            })
            .collect()
    }
}

/// Builder for [`Runtime`].
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    players: Vec<Player>,
    providers: ProviderRegistry,
    bus: Option<EventBus>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            players: Vec::new(),
            providers: ProviderRegistry::new(),
            bus: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn game_config(mut self, game_config: GameConfig) -> Self {
        self.config.game_config = game_config;
        self
    }

    pub fn event_buffer_size(mut self, size: usize) -> Self {
        self.config.event_buffer_size = size;
        self
    }

    pub fn concurrent_decisions(mut self, concurrent: bool) -> Self {
        self.config.concurrent_decisions = concurrent;
        self
    }

    pub fn player(mut self, player: Player) -> Self {
        self.players.push(player);
        self
    }

    pub fn players(mut self, players: impl IntoIterator<Item = Player>) -> Self {
        self.players.extend(players);
        self
    }

    /// Adds `player` and binds it to `provider` in one call.
    pub fn player_with(
        mut self,
        player: Player,
        provider: impl DecisionProvider + 'static,
    ) -> Self {
        self.providers.bind(player.id(), provider);
        self.players.push(player);
        self
    }

    pub fn provider(
        mut self,
        player: impl Into<PlayerId>,
        provider: impl DecisionProvider + 'static,
    ) -> Self {
        self.providers.bind(player.into(), provider);
        self
    }

    /// Provider for players without an explicit binding.
    pub fn default_provider(mut self, provider: impl DecisionProvider + 'static) -> Self {
        self.providers.set_default(provider);
        self
    }

    pub fn providers(mut self, providers: ProviderRegistry) -> Self {
        self.providers = providers;
        self
    }

    /// Publish onto an existing bus instead of creating one.
    pub fn event_bus(mut self, bus: EventBus) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Validates the player list and provider bindings.
    ///
    /// The topology is left uncompiled; call [`Runtime::compile`] before
    /// running.
    pub fn build(self) -> Result<Runtime> {
        let registry = PlayerRegistry::new(self.players)?;
        for id in registry.ids() {
            self.providers.get_for_player(id)?;
        }

        let bus = self
            .bus
            .unwrap_or_else(|| EventBus::with_capacity(self.config.event_buffer_size));
        let engine = GameEngine::new(Arc::new(registry), &self.config.game_config)
            .with_observer(Arc::new(EventBusObserver::new(bus.clone())));

        Ok(Runtime {
            config: self.config,
            engine,
            providers: self.providers,
            bus,
            metrics: Arc::new(DecisionMetrics::new()),
        })
    }
}
