//! Command-line entry point: plays one scripted game and prints the results.
mod config;
mod logging;
mod report;

use anyhow::{Context, Result};
use config::ClientConfig;
use pot_runtime::Scenario;

const DEFAULT_SCENARIO: &str = include_str!("../scenarios/default.ron");

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = ClientConfig::from_env();
    logging::setup_logging(&config)?;

    let scenario = match &config.scenario {
        Some(path) => Scenario::load_from_file(path)
            .with_context(|| format!("Failed to load scenario: {}", path.display()))?,
        None => Scenario::from_ron_str(DEFAULT_SCENARIO).context("Invalid built-in scenario")?,
    };

    let mut runtime = scenario
        .runtime_builder()
        .concurrent_decisions(config.concurrent_decisions)
        .event_buffer_size(config.event_buffer)
        .build()?;
    runtime.compile()?;
    runtime.run().await?;

    let summary = runtime.summary();
    println!("{}", report::render_history(runtime.statistics()));
    println!("{}", report::render_summary(&summary));
    tracing::info!(metrics = ?runtime.metrics(), "decision metrics");

    if let Some(path) = &config.report_json {
        report::write_json(path, &summary)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_scenario_is_valid() {
        let scenario = Scenario::from_ron_str(DEFAULT_SCENARIO).unwrap();
        assert_eq!(scenario.players.len(), 3);
        assert!(scenario.runtime_builder().build().is_ok());
    }
}
