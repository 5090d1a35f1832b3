use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use pot_core::{
    EndCondition, EngineError, GameConfig, GameWarning, Player, PlayerId, PromptTemplate,
    RegistryError,
};
use pot_runtime::{
    DecisionProvider, DecisionRequest, Event, FixedDecisionProvider, FnDecisionProvider,
    Runtime, RuntimeBuilder, RuntimeError, Scenario, ScriptedDecisionProvider, Topic,
};

const PROMPT: &str = "You are one of {num_players} players sharing a pot of {game_pot}. \
                      {stages_left} stages remain.\n{profile}\n{previous_decisions}";

fn player(id: u32) -> Player {
    let template = Arc::new(PromptTemplate::new(PROMPT).unwrap());
    Player::new(id, format!("profile {id}"), template)
}

async fn play(builder: RuntimeBuilder) -> Runtime {
    let mut runtime = builder.build().unwrap();
    runtime.compile().unwrap();
    runtime.run().await.unwrap();
    runtime
}

fn drain(rx: &mut tokio::sync::broadcast::Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// Answers after a fixed delay and records every request it receives.
struct SlowProvider {
    delay: Duration,
    answer: String,
    seen: Arc<Mutex<Vec<DecisionRequest>>>,
}

impl SlowProvider {
    fn new(delay_ms: u64, answer: &str) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            answer: answer.to_string(),
            seen: Arc::default(),
        }
    }
}

#[async_trait]
impl DecisionProvider for SlowProvider {
    async fn decide(&self, request: &DecisionRequest) -> pot_runtime::Result<String> {
        tokio::time::sleep(self.delay).await;
        self.seen.lock().unwrap().push(request.clone());
        Ok(self.answer.clone())
    }
}

#[tokio::test]
async fn single_player_claiming_everything_depletes_pot() {
    let runtime = play(
        Runtime::builder()
            .game_config(GameConfig::new(100, 1))
            .player_with(player(1), FixedDecisionProvider::new("100")),
    )
    .await;

    let stats = runtime.statistics();
    assert_eq!(stats.rounds_played(), 1);
    assert_eq!(stats.final_pot(), 0);
    assert_eq!(stats.total_claimed(), 100);
    assert_eq!(stats.end_condition(), EndCondition::PotDepleted);
    assert_eq!(runtime.engine().state().game_pot(), 0);
}

#[tokio::test]
async fn zero_claims_double_the_pot_every_round() {
    let runtime = play(
        Runtime::builder()
            .game_config(GameConfig::new(100, 8).with_stage_number(0))
            .default_provider(FixedDecisionProvider::new("0"))
            .players([player(1), player(2)]),
    )
    .await;

    let stats = runtime.statistics();
    assert_eq!(stats.rounds_played(), 8);
    assert_eq!(stats.end_condition(), EndCondition::MaxIterations);
    assert_eq!(stats.final_pot(), 25_600);
    assert_eq!(stats.total_claimed(), 0);
}

#[tokio::test]
async fn zero_claims_from_stage_one_stop_one_round_earlier() {
    let runtime = play(
        Runtime::builder()
            .game_config(GameConfig::new(100, 8))
            .default_provider(FixedDecisionProvider::new("0"))
            .players([player(1), player(2)]),
    )
    .await;

    let stats = runtime.statistics();
    assert_eq!(stats.rounds_played(), 7);
    assert_eq!(stats.final_pot(), 12_800);
    assert_eq!(stats.end_condition(), EndCondition::MaxIterations);
}

#[tokio::test]
async fn unparseable_decision_is_recovered_and_reported() {
    let mut runtime = Runtime::builder()
        .game_config(GameConfig::new(100, 4))
        .player_with(player(1), FixedDecisionProvider::new("N/A"))
        .player_with(player(2), FixedDecisionProvider::new("10"))
        .build()
        .unwrap();
    let mut warnings = runtime.subscribe(Topic::Warning);
    runtime.compile().unwrap();
    runtime.run().await.unwrap();

    let stats = runtime.statistics();
    assert!(stats.game_completed());
    assert!(stats.player_claims()[&PlayerId(1)].iter().all(|&claim| claim == 0));
    assert_eq!(stats.total_claimed(), 10 * i64::from(stats.rounds_played()));

    let events = drain(&mut warnings);
    assert_eq!(events.len(), stats.rounds_played() as usize);
    assert!(events.iter().all(|event| matches!(
        event,
        Event::Warning(GameWarning::InvalidDecision { player: PlayerId(1), raw, .. }) if raw == "N/A"
    )));
    assert_eq!(runtime.metrics().parse_failures, u64::from(stats.rounds_played()));
}

#[tokio::test]
async fn duplicate_player_ids_fail_before_any_round() {
    let err = Runtime::builder()
        .default_provider(FixedDecisionProvider::new("1"))
        .players([player(1), player(1)])
        .build()
        .err()
        .unwrap();

    assert!(matches!(
        err,
        RuntimeError::Engine(EngineError::Registry(RegistryError::DuplicateId {
            id: PlayerId(1)
        }))
    ));
}

#[tokio::test]
async fn empty_player_list_is_rejected() {
    let err = Runtime::builder()
        .default_provider(FixedDecisionProvider::new("1"))
        .build()
        .err()
        .unwrap();
    assert!(matches!(
        err,
        RuntimeError::Engine(EngineError::Registry(RegistryError::Empty))
    ));
}

#[tokio::test]
async fn unbound_player_is_rejected() {
    let err = Runtime::builder()
        .player_with(player(1), FixedDecisionProvider::new("1"))
        .player(player(2))
        .build()
        .err()
        .unwrap();
    assert!(matches!(
        err,
        RuntimeError::ProviderNotSet { player: PlayerId(2) }
    ));
}

#[tokio::test]
async fn running_without_compiling_fails() {
    let mut runtime = Runtime::builder()
        .default_provider(FixedDecisionProvider::new("1"))
        .player(player(1))
        .build()
        .unwrap();

    assert!(matches!(
        runtime.run().await,
        Err(RuntimeError::Engine(EngineError::TopologyNotCompiled))
    ));
    assert_eq!(runtime.statistics().rounds_played(), 0);
}

#[tokio::test]
async fn stage_advances_by_one_each_round() {
    let mut runtime = Runtime::builder()
        .game_config(GameConfig::new(1_000, 6))
        .default_provider(FixedDecisionProvider::new("3"))
        .players([player(1), player(2), player(3)])
        .build()
        .unwrap();
    runtime.compile().unwrap();

    let mut rounds = 0;
    while !runtime.is_finished() {
        let report = runtime.play_round().await.unwrap();
        rounds += 1;
        assert_eq!(report.stage, rounds);
        assert_eq!(runtime.engine().state().stage_number(), 1 + rounds);
        assert_eq!(report.claims.len(), 3);
    }

    assert!(rounds <= 6);
    assert!(matches!(
        runtime.play_round().await,
        Err(RuntimeError::GameFinished)
    ));
}

#[tokio::test]
async fn total_claimed_matches_round_totals() {
    let runtime = play(
        Runtime::builder()
            .game_config(GameConfig::new(500, 6))
            .player_with(player(1), ScriptedDecisionProvider::new(["10", "oops", "30"]))
            .player_with(player(2), ScriptedDecisionProvider::new(["5", "15"])),
    )
    .await;

    let stats = runtime.statistics();
    assert_eq!(stats.total_claimed(), stats.round_totals().iter().sum::<i64>());
    assert_eq!(stats.round_totals()[..2], [15, 15]);
    assert_eq!(stats.pot_history()[0], 500);
    assert_eq!(stats.pot_history().len(), stats.rounds_played() as usize + 1);
}

#[tokio::test]
async fn depletion_wins_when_both_conditions_hold() {
    let runtime = play(
        Runtime::builder()
            .game_config(GameConfig::new(100, 2))
            .default_provider(FixedDecisionProvider::new("60"))
            .players([player(1), player(2)]),
    )
    .await;

    // Stage reaches the limit in the same round the pot goes negative.
    assert_eq!(runtime.engine().state().stage_number(), 2);
    assert_eq!(runtime.statistics().final_pot(), -40);
    assert_eq!(
        runtime.statistics().end_condition(),
        EndCondition::PotDepleted
    );
}

#[tokio::test]
async fn summary_is_idempotent_after_completion() {
    let runtime = play(
        Runtime::builder()
            .game_config(GameConfig::new(100, 5))
            .player_with(player(1), ScriptedDecisionProvider::new(["10", "20", "5"]))
            .player_with(player(2), FixedDecisionProvider::new("7")),
    )
    .await;

    let first = runtime.summary();
    let second = runtime.summary();
    assert_eq!(first, second);

    let report = first.report().unwrap();
    assert_eq!(report.rounds_played, runtime.statistics().rounds_played());
    assert_eq!(report.player_statistics[&PlayerId(2)].std_claim, 0.0);
    assert_eq!(
        report.average_claimed_per_round,
        report.total_claimed as f64 / f64::from(report.rounds_played)
    );
}

#[tokio::test]
async fn premature_summary_warns_through_the_bus() {
    let mut runtime = Runtime::builder()
        .default_provider(FixedDecisionProvider::new("1"))
        .player(player(1))
        .build()
        .unwrap();
    let mut warnings = runtime.subscribe(Topic::Warning);
    runtime.compile().unwrap();

    assert!(runtime.summary().is_pending());
    assert!(matches!(
        drain(&mut warnings).as_slice(),
        [Event::Warning(GameWarning::IncompleteGame)]
    ));
}

#[tokio::test]
async fn provider_errors_count_as_zero_claims() {
    let runtime = play(
        Runtime::builder()
            .game_config(GameConfig::new(100, 3))
            .player_with(
                player(1),
                FnDecisionProvider::new(|_: &DecisionRequest| {
                    Err(RuntimeError::Provider("model unavailable".into()))
                }),
            )
            .player_with(player(2), FixedDecisionProvider::new("10")),
    )
    .await;

    let stats = runtime.statistics();
    assert!(stats.game_completed());
    assert!(stats.player_claims()[&PlayerId(1)].iter().all(|&claim| claim == 0));

    let metrics = runtime.metrics();
    assert_eq!(metrics.provider_failures, u64::from(stats.rounds_played()));
    assert_eq!(metrics.invocations, 2 * u64::from(stats.rounds_played()));
    assert_eq!(metrics.parse_failures, 0);
}

#[tokio::test]
async fn panicking_provider_counts_as_zero_claims() {
    for concurrent in [true, false] {
        let mut runtime = Runtime::builder()
            .game_config(GameConfig::new(100, 3))
            .concurrent_decisions(concurrent)
            .player_with(
                player(1),
                FnDecisionProvider::new(|_: &DecisionRequest| -> pot_runtime::Result<String> {
                    panic!("provider crashed")
                }),
            )
            .player_with(player(2), FixedDecisionProvider::new("10"))
            .build()
            .unwrap();
        let mut warnings = runtime.subscribe(Topic::Warning);
        runtime.compile().unwrap();
        runtime.run().await.unwrap();

        assert!(runtime.is_finished());
        let stats = runtime.statistics();
        assert!(stats.game_completed());
        assert_eq!(stats.rounds_played(), 2);
        assert_eq!(stats.player_claims()[&PlayerId(1)], [0, 0]);
        assert_eq!(stats.player_claims()[&PlayerId(2)], [10, 10]);

        let failed = drain(&mut warnings)
            .into_iter()
            .filter(|event| {
                matches!(
                    event,
                    Event::Warning(GameWarning::ProviderFailed { player: PlayerId(1), .. })
                )
            })
            .count();
        assert_eq!(failed, 2);
        assert_eq!(runtime.metrics().provider_failures, 2);
    }
}

#[tokio::test]
async fn round_and_game_events_are_published() {
    let mut runtime = Runtime::builder()
        .game_config(GameConfig::new(100, 4))
        .default_provider(FixedDecisionProvider::new("5"))
        .players([player(1), player(2)])
        .build()
        .unwrap();
    let mut rounds = runtime.subscribe(Topic::Round);
    let mut games = runtime.subscribe(Topic::Game);
    runtime.compile().unwrap();
    runtime.run().await.unwrap();

    let snapshots = drain(&mut rounds);
    assert_eq!(snapshots.len(), runtime.statistics().rounds_played() as usize);
    match snapshots.last() {
        Some(Event::RoundCompleted(snapshot)) => {
            assert!(snapshot.report.is_final());
            assert_eq!(&snapshot.state, runtime.engine().state());
        }
        other => panic!("unexpected event: {other:?}"),
    }

    match drain(&mut games).as_slice() {
        [Event::GameFinished(finished)] => {
            assert_eq!(finished.end_condition, EndCondition::MaxIterations);
            assert_eq!(finished.final_pot, runtime.statistics().final_pot());
        }
        other => panic!("unexpected events: {other:?}"),
    }
}

#[tokio::test]
async fn prompts_use_the_post_supervisor_snapshot() {
    let first = SlowProvider::new(0, "7");
    let second = SlowProvider::new(0, "9");
    let seen_by_first = Arc::clone(&first.seen);

    play(
        Runtime::builder()
            .game_config(GameConfig::new(100, 3))
            .player_with(player(1), first)
            .player_with(player(2), second),
    )
    .await;

    let seen = seen_by_first.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].context.game_pot, 100);
    assert_eq!(seen[0].context.stages_left, 2);
    assert_eq!(seen[0].context.previous_decisions, "Player 2: []");
    assert_eq!(seen[1].context.game_pot, 168);
    assert_eq!(seen[1].context.previous_decisions, "Player 2: [9]");
    assert!(seen[1].prompt.ends_with("profile 1\nPlayer 2: [9]"));
}

#[tokio::test]
async fn concurrent_and_sequential_runs_agree() {
    async fn run(concurrent: bool) -> Runtime {
        play(
            Runtime::builder()
                .game_config(GameConfig::new(1_000, 5))
                .concurrent_decisions(concurrent)
                .player_with(player(1), SlowProvider::new(20, "40"))
                .player_with(player(2), SlowProvider::new(0, "25"))
                .player_with(player(3), SlowProvider::new(5, "x")),
        )
        .await
    }

    let concurrent = run(true).await;
    let sequential = run(false).await;

    assert_eq!(concurrent.engine().state(), sequential.engine().state());
    assert_eq!(concurrent.statistics(), sequential.statistics());

    let messages = concurrent.engine().state().messages();
    assert_eq!(&messages[..4], ["---- Stage 1 ----", "40", "25", "0"]);
}

#[tokio::test]
async fn scenario_file_drives_a_full_game() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"(
            game: (game_pot: 100, iterations: 4),
            prompt: "pot={{game_pot}} players={{num_players}}",
            players: [
                (id: 1, profile: "fair", strategy: ShareOfPot(0.5)),
                (id: 2, name: Some("Mirror"), profile: "fair", strategy: ShareOfPot(0.5)),
            ],
        )"#
    )
    .unwrap();

    let scenario = Scenario::load_from_file(file.path()).unwrap();
    let runtime = play(scenario.runtime_builder().concurrent_decisions(false)).await;

    let stats = runtime.statistics();
    assert_eq!(stats.rounds_played(), 3);
    assert_eq!(stats.total_claimed(), 150);
    assert_eq!(stats.final_pot(), 100);
    assert_eq!(stats.end_condition(), EndCondition::MaxIterations);
    assert_eq!(runtime.engine().registry().get(PlayerId(2)).unwrap().name(), "Mirror");
}

#[tokio::test]
async fn malformed_scenario_is_invalid_config() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"(game: (game_pot: 100), players: [])").unwrap();

    assert!(matches!(
        Scenario::load_from_file(file.path()),
        Err(RuntimeError::InvalidConfig(_))
    ));
}
