//! Match play - multiple games between two team configs
//!
//! Level 2 - Phase-level implementation

use serde::Serialize;
use thiserror::Error;

use codenames_core::{AgentError, AgentFactory, BoardError, EngineError, GameResult, Team, TeamConfig, TeamStats};

use crate::config::MatchConfig;
use crate::game_runner::GameRunner;
use crate::recorder::{GameRecorder, LogSink, RecorderError};

#[derive(Debug, Error)]
pub enum MatchError {
    #[error("board generation failed: {0}")]
    Board(#[from] BoardError),

    #[error("could not create agents for {team}: {source}")]
    AgentSetup {
        team: Team,
        #[source]
        source: AgentError,
    },

    #[error("game {game_id} aborted: {source}")]
    Engine {
        game_id: u64,
        #[source]
        source: EngineError,
    },

    #[error("recorder error: {0}")]
    Recorder(#[from] RecorderError),
}

/// Aggregate results for one side of a matchup
#[derive(Clone, Debug, Default, Serialize)]
pub struct TeamMatchStats {
    /// Model name
    pub model: String,
    pub games_played: u32,
    pub wins: u32,
    pub total_correct: u32,
    pub total_incorrect: u32,
    /// Words-per-clue of each game, in order
    pub words_per_clue: Vec<f64>,
}

impl TeamMatchStats {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }

    /// Fold one game's tallies in
    pub fn record(&mut self, stats: &TeamStats) {
        self.games_played += 1;
        if stats.won {
            self.wins += 1;
        }
        self.total_correct += stats.correct_guesses;
        self.total_incorrect += stats.incorrect_guesses;
        self.words_per_clue.push(stats.words_per_clue());
    }

    pub fn win_rate(&self) -> f64 {
        if self.games_played == 0 {
            0.0
        } else {
            self.wins as f64 / self.games_played as f64
        }
    }

    /// Mean of the per-game ratios (not total correct over total clues)
    pub fn average_words_per_clue(&self) -> f64 {
        if self.words_per_clue.is_empty() {
            0.0
        } else {
            self.words_per_clue.iter().sum::<f64>() / self.words_per_clue.len() as f64
        }
    }
}

/// Result of a matchup (multiple games)
#[derive(Clone, Debug, Default, Serialize)]
pub struct MatchStatistics {
    pub team_a: TeamMatchStats,
    pub team_b: TeamMatchStats,
    pub games_played: u32,
    /// Games that hit the turn cap
    pub no_winner: u32,
    /// Average turns per game
    pub avg_turns: f64,
}

impl MatchStatistics {
    pub fn new(team_a_model: &str, team_b_model: &str) -> Self {
        Self {
            team_a: TeamMatchStats::new(team_a_model),
            team_b: TeamMatchStats::new(team_b_model),
            ..Default::default()
        }
    }

    pub fn record(&mut self, result: &GameResult) {
        let total_turns = self.avg_turns * self.games_played as f64 + result.turn_count as f64;
        self.games_played += 1;
        self.avg_turns = total_turns / self.games_played as f64;

        if result.winner.is_none() {
            self.no_winner += 1;
        }
        self.team_a.record(&result.team_a);
        self.team_b.record(&result.team_b);
    }

    pub fn team(&self, team: Team) -> &TeamMatchStats {
        match team {
            Team::A => &self.team_a,
            Team::B => &self.team_b,
        }
    }
}

/// Runs matchups with agents from a factory, recording every game
pub struct MatchRunner<F: AgentFactory, S: LogSink> {
    factory: F,
    recorder: GameRecorder<S>,
    config: MatchConfig,
}

impl<F: AgentFactory, S: LogSink> MatchRunner<F, S> {
    pub fn new(factory: F, recorder: GameRecorder<S>, config: MatchConfig) -> Self {
        Self {
            factory,
            recorder,
            config,
        }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn recorder(&self) -> &GameRecorder<S> {
        &self.recorder
    }

    /// Play `num_games` sequential games (Level 2 phase)
    pub fn run_matchup(
        &mut self,
        team_a: &TeamConfig,
        team_b: &TeamConfig,
        num_games: u32,
    ) -> Result<MatchStatistics, MatchError> {
        self.run_matchup_with_progress(team_a, team_b, num_games, |_, _| {})
    }

    /// As [`run_matchup`](Self::run_matchup), calling `on_game` after each finished game
    pub fn run_matchup_with_progress(
        &mut self,
        team_a: &TeamConfig,
        team_b: &TeamConfig,
        num_games: u32,
        mut on_game: impl FnMut(u64, &GameResult),
    ) -> Result<MatchStatistics, MatchError> {
        let mut stats = MatchStatistics::new(&team_a.model_name, &team_b.model_name);
        let runner = GameRunner::new(&self.factory, &self.config);

        tracing::info!(
            "Matchup: {} vs {}, {} games",
            team_a.display_name(),
            team_b.display_name(),
            num_games
        );

        for game_id in 0..num_games as u64 {
            let result = runner.play_game(game_id, team_a, team_b, &mut self.recorder)?;
            stats.record(&result);
            on_game(game_id, &result);
        }

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(correct: u32, incorrect: u32, clues: u32, won: bool) -> TeamStats {
        TeamStats {
            correct_guesses: correct,
            incorrect_guesses: incorrect,
            clues_given: clues,
            won,
        }
    }

    #[test]
    fn test_mean_of_ratios() {
        let mut team = TeamMatchStats::new("m");
        team.record(&stats(2, 1, 4, true));
        team.record(&stats(3, 0, 3, false));

        // (0.5 + 1.0) / 2, where total ratio would be 5/7
        assert!((team.average_words_per_clue() - 0.75).abs() < 1e-9);
        assert!((team.win_rate() - 0.5).abs() < 1e-9);
        assert_eq!(team.total_correct, 5);
        assert_eq!(team.total_incorrect, 1);
    }

    #[test]
    fn test_zero_clues_counts_as_zero() {
        let mut team = TeamMatchStats::new("m");
        team.record(&stats(0, 0, 0, false));
        team.record(&stats(2, 0, 1, true));
        assert!((team.average_words_per_clue() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_stats() {
        let team = TeamMatchStats::new("m");
        assert_eq!(team.win_rate(), 0.0);
        assert_eq!(team.average_words_per_clue(), 0.0);
    }
}
