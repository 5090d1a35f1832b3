//! Text and JSON rendering of game results.
use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use pot_core::{GameStatistics, GameSummary};

const BAR_WIDTH: usize = 40;

/// Per-round table of claims and pot with a bar for the pot size.
pub fn render_history(stats: &GameStatistics) -> String {
    let pots = stats.pot_history();
    let largest = pots.iter().map(|pot| pot.unsigned_abs()).max().unwrap_or(0).max(1);

    let mut out = String::new();
    let _ = writeln!(out, "{:>5}  {:>10}  {:>12}", "round", "claimed", "pot");
    for (round, &pot) in pots.iter().enumerate() {
        let claimed = match round {
            0 => "-".to_string(),
            n => stats
                .round_totals()
                .get(n - 1)
                .map(|total| total.to_string())
                .unwrap_or_default(),
        };
        let width = bar_width(pot, largest);
        let _ = writeln!(
            out,
            "{:>5}  {:>10}  {:>12}  {}",
            round,
            claimed,
            pot,
            "#".repeat(width)
        );
    }
    out
}

/// Bar length for `pot`, scaled so that `largest` fills [`BAR_WIDTH`].
fn bar_width(pot: i64, largest: u64) -> usize {
    let scaled = u128::from(pot.max(0).unsigned_abs()) * BAR_WIDTH as u128 / u128::from(largest);
    usize::try_from(scaled).unwrap_or(BAR_WIDTH)
}

/// Human-readable summary, or the pending status.
pub fn render_summary(summary: &GameSummary) -> String {
    let report = match summary {
        GameSummary::Pending { status } => return status.clone(),
        GameSummary::Completed(report) => report,
    };

    let mut out = String::new();
    let _ = writeln!(out, "Game over: {}", report.end_condition);
    let _ = writeln!(out, "Rounds played:       {}", report.rounds_played);
    let _ = writeln!(out, "Total claimed:       {}", report.total_claimed);
    let _ = writeln!(out, "Average per round:   {:.2}", report.average_claimed_per_round);
    let _ = writeln!(out, "Final pot:           {}", report.final_pot);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{:>6}  {:>8}  {:>8}  {:>6}  {:>6}  {:>7}  decisions",
        "player", "total", "mean", "min", "max", "std"
    );
    for (player, stats) in &report.player_statistics {
        let _ = writeln!(
            out,
            "{:>6}  {:>8}  {:>8.2}  {:>6}  {:>6}  {:>7.2}  {:?}",
            player.to_string(),
            stats.total_claimed,
            stats.average_claim,
            stats.min_claim,
            stats.max_claim,
            stats.std_claim,
            stats.decisions_by_round
        );
    }
    out
}

pub fn write_json(path: &Path, summary: &GameSummary) -> Result<()> {
    let json = serde_json::to_string_pretty(summary).context("Failed to serialize summary")?;
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write report: {}", path.display()))?;
    tracing::info!("Summary written to {}", path.display());
    Ok(())
}
