//! Codenames CLI - Command-line interface
//!
//! Commands:
//! - match: Play a matchup between two models
//! - summary: Summarize a recorded game
//! - board: Deal and print a board with its key

mod board_cmd;
mod match_cmd;
mod models;
mod summary_cmd;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "codenames")]
#[command(about = "Codenames 2v2 benchmark for language models")]
struct Cli {
    /// Random seed for reproducible boards
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Debug-level logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play games between two models
    Match(match_cmd::MatchArgs),
    /// Summarize a recorded game
    Summary(summary_cmd::SummaryArgs),
    /// Deal a board and print it with its key
    Board(board_cmd::BoardArgs),
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Match(args) => match_cmd::run(args, cli.seed),
        Commands::Summary(args) => summary_cmd::run(args),
        Commands::Board(args) => board_cmd::run(args, cli.seed),
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(std::io::stderr)
        .init();
}
