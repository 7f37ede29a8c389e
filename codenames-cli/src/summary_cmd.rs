//! Summary command - headline numbers for a recorded game

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use codenames_tournament::{GameRecorder, GameSummary, JsonDirSink};

#[derive(Args)]
pub struct SummaryArgs {
    /// Game id to summarize
    #[arg(long)]
    pub game_id: u64,

    /// Directory holding the game logs
    #[arg(long, value_name = "DIR", default_value = "game_logs")]
    pub log_dir: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: SummaryArgs) -> Result<()> {
    let summary = load_summary(&args)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", format_summary(&summary));
    }
    Ok(())
}

fn load_summary(args: &SummaryArgs) -> Result<GameSummary> {
    let recorder = GameRecorder::new(JsonDirSink::open(&args.log_dir)?);
    recorder
        .game_summary(args.game_id)
        .with_context(|| format!("Failed to summarize game {} in {}", args.game_id, args.log_dir.display()))
}

fn format_summary(summary: &GameSummary) -> String {
    let winner = summary.winner.map_or_else(|| "none".to_string(), |t| t.to_string());
    let reason = summary.reason.map_or_else(|| "unfinished".to_string(), |r| r.to_string());
    let clues: Vec<String> = summary
        .clues_given
        .iter()
        .map(|c| format!("{}: {} {}", c.team, c.word, c.count))
        .collect();

    let mut out = String::new();
    out.push_str(&format!("=== Game {} ===\n", summary.game_id));
    out.push_str(&format!("Team A: {}\n", summary.team_a_model));
    out.push_str(&format!("Team B: {}\n", summary.team_b_model));
    out.push_str(&format!("Winner: {} ({})\n", winner, reason));
    out.push_str(&format!("Turns: {} ({} forfeited)\n", summary.total_turns, summary.forfeits));
    out.push_str(&format!("Duration: {:.1}s\n", summary.duration_seconds));
    out.push_str(&format!("Guesses: {} made, {} correct\n", summary.guesses_made, summary.correct_guesses));
    out.push_str("Clues:\n");
    for clue in clues {
        out.push_str(&format!("  {}\n", clue));
    }
    out
}
