//! Match command - play games between two models
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_models(), build_match_config(), play_match(), report_results()
//! - Level 3: create_progress(), game_line()
//! - Level 4: formatting utilities

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};

use codenames_core::scripted::KeyAgentFactory;
use codenames_core::{AgentFactory, GameResult, TeamConfig, WordList};
use codenames_llm::{LlmAgentFactory, RetryPolicy};
use codenames_tournament::{GameRecorder, JsonDirSink, MatchConfig, MatchRunner, MatchStatistics, TeamMatchStats};

use crate::models::ModelRegistry;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct MatchArgs {
    /// Model label for Team A (opens every game)
    #[arg(long, default_value = "gpt4")]
    pub team_a: String,

    /// Model label for Team B
    #[arg(long, default_value = "gemini")]
    pub team_b: String,

    /// Number of games to play
    #[arg(long, default_value = "3")]
    pub games: u32,

    /// Maximum turns per game
    #[arg(long, default_value = "20")]
    pub max_turns: u32,

    /// JSON file of model configs (default: built-in gpt4, gpt3, gemini, claude)
    #[arg(long, value_name = "FILE")]
    pub models: Option<PathBuf>,

    /// Word list file, one word per line
    #[arg(long, value_name = "FILE")]
    pub words: Option<PathBuf>,

    /// Directory for per-game JSON logs
    #[arg(long, value_name = "DIR", default_value = "game_logs")]
    pub log_dir: PathBuf,

    /// Attempts per model call before giving up
    #[arg(long, default_value = "5")]
    pub max_attempts: u32,

    /// Play with offline agents instead of calling any model
    #[arg(long)]
    pub dry_run: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run match command
///
/// 1. Resolve both team configs
/// 2. Play the games, recording each one
/// 3. Report aggregate results
pub fn run(args: MatchArgs, seed: Option<u64>) -> Result<()> {
    let (team_a, team_b) = load_models(&args)?;
    let config = build_match_config(&args, seed)?;

    tracing::info!(
        "Starting match: {} ({}) vs {} ({}), {} games",
        team_a.display_name(),
        team_a.model_name,
        team_b.display_name(),
        team_b.model_name,
        args.games
    );

    let stats = if args.dry_run {
        play_match(KeyAgentFactory, &team_a, &team_b, config, &args)?
    } else {
        let retry = RetryPolicy {
            max_attempts: args.max_attempts,
            ..RetryPolicy::default()
        };
        play_match(LlmAgentFactory::new(retry), &team_a, &team_b, config, &args)?
    };

    report_results(&stats, &args);
    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn load_models(args: &MatchArgs) -> Result<(TeamConfig, TeamConfig)> {
    let registry = match &args.models {
        Some(path) => ModelRegistry::load(path)?,
        None => ModelRegistry::builtin(),
    };
    Ok((registry.get(&args.team_a)?.clone(), registry.get(&args.team_b)?.clone()))
}

fn build_match_config(args: &MatchArgs, seed: Option<u64>) -> Result<MatchConfig> {
    let words = match &args.words {
        Some(path) => WordList::load(path).with_context(|| format!("Failed to load word list: {}", path.display()))?,
        None => WordList::default(),
    };

    let mut config = MatchConfig::default().with_max_turns(args.max_turns).with_words(words);
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }
    Ok(config)
}

/// Play all games with a progress bar
fn play_match<F: AgentFactory>(
    factory: F,
    team_a: &TeamConfig,
    team_b: &TeamConfig,
    config: MatchConfig,
    args: &MatchArgs,
) -> Result<MatchStatistics> {
    let sink = JsonDirSink::new(&args.log_dir)
        .with_context(|| format!("Failed to open log directory: {}", args.log_dir.display()))?;
    let mut runner = MatchRunner::new(factory, GameRecorder::new(sink), config);

    let progress = create_progress(args.games as u64, args.json);
    let stats = runner
        .run_matchup_with_progress(team_a, team_b, args.games, |game_id, result| {
            progress.inc(1);
            progress.set_message(game_line(game_id, result));
        })
        .context("Match aborted")?;
    progress.finish_and_clear();

    tracing::info!("Game logs written to {}", args.log_dir.display());
    Ok(stats)
}

fn report_results(stats: &MatchStatistics, args: &MatchArgs) {
    if args.json {
        print_json_results(stats);
    } else {
        print_text_results(stats);
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn create_progress(total_games: u64, hidden: bool) -> ProgressBar {
    if hidden {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(total_games);
    match ProgressStyle::default_bar().template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} games ({msg})") {
        Ok(style) => pb.set_style(style.progress_chars("=>-")),
        Err(e) => tracing::warn!("Invalid progress bar template: {}", e),
    }
    pb
}

fn game_line(game_id: u64, result: &GameResult) -> String {
    match result.winner {
        Some(team) => format!("game {}: {} won in {} turns", game_id, team, result.turn_count),
        None => format!("game {}: no winner after {} turns", game_id, result.turn_count),
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Print results as JSON
fn print_json_results(stats: &MatchStatistics) {
    #[derive(serde::Serialize)]
    struct JsonTeam<'a> {
        model: &'a str,
        games_played: u32,
        wins: u32,
        win_rate: f64,
        total_correct: u32,
        total_incorrect: u32,
        average_words_per_clue: f64,
    }

    #[derive(serde::Serialize)]
    struct JsonOutput<'a> {
        games_played: u32,
        no_winner: u32,
        avg_turns: f64,
        team_a: JsonTeam<'a>,
        team_b: JsonTeam<'a>,
    }

    fn team(t: &TeamMatchStats) -> JsonTeam<'_> {
        JsonTeam {
            model: &t.model,
            games_played: t.games_played,
            wins: t.wins,
            win_rate: t.win_rate(),
            total_correct: t.total_correct,
            total_incorrect: t.total_incorrect,
            average_words_per_clue: t.average_words_per_clue(),
        }
    }

    let output = JsonOutput {
        games_played: stats.games_played,
        no_winner: stats.no_winner,
        avg_turns: stats.avg_turns,
        team_a: team(&stats.team_a),
        team_b: team(&stats.team_b),
    };

    if let Ok(json) = serde_json::to_string_pretty(&output) {
        println!("{}", json);
    }
}

/// Print results as text
fn print_text_results(stats: &MatchStatistics) {
    println!("\n=== Match Results ===");
    println!("Games played: {}", stats.games_played);
    println!("No winner:    {}", stats.no_winner);
    println!("Avg turns:    {:.1}", stats.avg_turns);

    for (name, team) in [("TEAM A", &stats.team_a), ("TEAM B", &stats.team_b)] {
        println!("\n{} ({}):", name, team.model);
        println!("Wins: {}/{}", team.wins, team.games_played);
        println!("Win Rate: {:.2}%", team.win_rate() * 100.0);
        println!("Correct guesses: {}", team.total_correct);
        println!("Incorrect guesses: {}", team.total_incorrect);
        println!("Average words per clue: {:.2}", team.average_words_per_clue());
    }
}

// ============================================================================
// TESTS
// ============================================================================
