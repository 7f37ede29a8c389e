//! Game recorder - append-only per-game logs
//!
//! Level 4 - Utilities
//!
//! A recorder holds at most one open game. Turns are appended as they are
//! played; `end_game` stamps the outcome and hands the finished log to a
//! [`LogSink`]. Stored logs carry enough detail to rebuild the engine's
//! [`GameResult`] exactly.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use codenames_core::{Board, BoardSetup, EndReason, GameResult, Team, TeamStats, TurnRecord, WordAssignment};

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum RecorderError {
    #[error("no game in progress")]
    NoActiveGame,

    #[error("game {0} is still in progress")]
    GameInProgress(u64),

    #[error("no log found for game {0}")]
    NotFound(u64),

    #[error("game {0} has no recorded outcome")]
    Incomplete(u64),

    #[error("log directory {0} does not exist")]
    MissingDir(PathBuf),

    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed game log: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// LOG TYPES
// ============================================================================

/// One played turn as stored
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurnLog {
    #[serde(flatten)]
    pub record: TurnRecord,
    pub model_name: String,
    pub correct_guesses: Vec<String>,
    /// The team's unguessed words after the turn
    pub remaining_team_words: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

/// A turn lost to an unusable clue
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ForfeitLog {
    pub turn_number: u32,
    pub team: Team,
    pub model_name: String,
    pub reason: String,
    pub timestamp: DateTime<Utc>,
}

/// Complete record of one game
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameLog {
    pub game_id: u64,
    pub team_a_model: String,
    pub team_b_model: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub initial_board: Board,
    #[serde(flatten)]
    pub assignment: WordAssignment,
    pub turns: Vec<TurnLog>,
    #[serde(default)]
    pub forfeits: Vec<ForfeitLog>,
    pub winner: Option<Team>,
    pub reason: Option<EndReason>,
}

impl GameLog {
    /// Rebuild the engine's result from the stored turns
    pub fn game_result(&self) -> Result<GameResult, RecorderError> {
        let reason = self.reason.ok_or(RecorderError::Incomplete(self.game_id))?;

        let stats_for = |team: Team| {
            let turns = self.turns.iter().filter(|t| t.record.team == team);
            let mut stats = TeamStats {
                won: self.winner == Some(team),
                ..TeamStats::default()
            };
            for turn in turns {
                stats.clues_given += 1;
                stats.correct_guesses += turn.record.correct_count();
                stats.incorrect_guesses += turn.record.incorrect_count();
            }
            stats
        };

        let turn_count = self
            .turns
            .iter()
            .map(|t| t.record.turn_number)
            .chain(self.forfeits.iter().map(|f| f.turn_number))
            .max()
            .unwrap_or(0);

        Ok(GameResult {
            winner: self.winner,
            reason,
            turn_count,
            team_a: stats_for(Team::A),
            team_b: stats_for(Team::B),
            turns: self.turns.iter().map(|t| t.record.clone()).collect(),
        })
    }

    pub fn duration_seconds(&self) -> f64 {
        self.ended_at
            .map(|end| (end - self.started_at).num_milliseconds() as f64 / 1000.0)
            .unwrap_or(0.0)
    }

    pub fn summary(&self) -> GameSummary {
        GameSummary {
            game_id: self.game_id,
            team_a_model: self.team_a_model.clone(),
            team_b_model: self.team_b_model.clone(),
            winner: self.winner,
            total_turns: self.turns.len() as u32,
            forfeits: self.forfeits.len() as u32,
            duration_seconds: self.duration_seconds(),
            clues_given: self
                .turns
                .iter()
                .map(|t| GivenClue {
                    team: t.record.team,
                    word: t.record.clue_word.clone(),
                    count: t.record.clue_count,
                })
                .collect(),
            guesses_made: self.turns.iter().map(|t| t.record.guesses.len() as u32).sum(),
            correct_guesses: self.turns.iter().map(|t| t.correct_guesses.len() as u32).sum(),
            reason: self.reason,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GivenClue {
    pub team: Team,
    pub word: String,
    pub count: u32,
}

/// Headline numbers for one stored game
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSummary {
    pub game_id: u64,
    pub team_a_model: String,
    pub team_b_model: String,
    pub winner: Option<Team>,
    /// Turns with a clue (forfeits excluded)
    pub total_turns: u32,
    pub forfeits: u32,
    pub duration_seconds: f64,
    pub clues_given: Vec<GivenClue>,
    pub guesses_made: u32,
    pub correct_guesses: u32,
    pub reason: Option<EndReason>,
}

// ============================================================================
// SINKS
// ============================================================================

/// Durable storage for finished game logs, keyed by game id
pub trait LogSink {
    fn store(&mut self, log: &GameLog) -> Result<(), RecorderError>;
    fn load(&self, game_id: u64) -> Result<GameLog, RecorderError>;
}

/// Writes `<dir>/game_<id>.json`
#[derive(Clone, Debug)]
pub struct JsonDirSink {
    dir: PathBuf,
}

impl JsonDirSink {
    /// Create the directory if needed
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, RecorderError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| RecorderError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    /// Open an existing directory for reading; never creates it
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, RecorderError> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(RecorderError::MissingDir(dir));
        }
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, game_id: u64) -> PathBuf {
        self.dir.join(format!("game_{}.json", game_id))
    }
}

impl LogSink for JsonDirSink {
    fn store(&mut self, log: &GameLog) -> Result<(), RecorderError> {
        let path = self.path_for(log.game_id);
        let json = serde_json::to_string_pretty(log)?;
        fs::write(&path, json).map_err(|source| RecorderError::Io { path: path.clone(), source })?;
        tracing::debug!("Saved game log to {}", path.display());
        Ok(())
    }

    fn load(&self, game_id: u64) -> Result<GameLog, RecorderError> {
        let path = self.path_for(game_id);
        if !path.exists() {
            return Err(RecorderError::NotFound(game_id));
        }
        let text = fs::read_to_string(&path).map_err(|source| RecorderError::Io { path, source })?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Keeps logs in memory
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    logs: FxHashMap<u64, GameLog>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.logs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.logs.is_empty()
    }
}

impl LogSink for MemorySink {
    fn store(&mut self, log: &GameLog) -> Result<(), RecorderError> {
        self.logs.insert(log.game_id, log.clone());
        Ok(())
    }

    fn load(&self, game_id: u64) -> Result<GameLog, RecorderError> {
        self.logs.get(&game_id).cloned().ok_or(RecorderError::NotFound(game_id))
    }
}

// ============================================================================
// RECORDER
// ============================================================================

/// Records one game at a time into a sink
#[derive(Debug)]
pub struct GameRecorder<S: LogSink> {
    sink: S,
    current: Option<GameLog>,
}

impl<S: LogSink> GameRecorder<S> {
    pub fn new(sink: S) -> Self {
        Self { sink, current: None }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn is_recording(&self) -> bool {
        self.current.is_some()
    }

    pub fn start_game(
        &mut self,
        game_id: u64,
        team_a_model: &str,
        team_b_model: &str,
        setup: &BoardSetup,
    ) -> Result<(), RecorderError> {
        if let Some(open) = &self.current {
            return Err(RecorderError::GameInProgress(open.game_id));
        }

        tracing::info!("Starting game {}: {} vs {}", game_id, team_a_model, team_b_model);
        tracing::info!("Initial board: {}", setup.board.words().join(", "));
        tracing::debug!("Team A words: {}", setup.assignment.team_a_words.join(", "));
        tracing::debug!("Team B words: {}", setup.assignment.team_b_words.join(", "));
        tracing::debug!("Assassin word: {}", setup.assignment.assassin);

        self.current = Some(GameLog {
            game_id,
            team_a_model: team_a_model.to_string(),
            team_b_model: team_b_model.to_string(),
            started_at: Utc::now(),
            ended_at: None,
            initial_board: setup.board.clone(),
            assignment: setup.assignment.clone(),
            turns: Vec::new(),
            forfeits: Vec::new(),
            winner: None,
            reason: None,
        });
        Ok(())
    }

    pub fn log_turn(
        &mut self,
        record: &TurnRecord,
        model_name: &str,
        remaining_team_words: &[String],
    ) -> Result<(), RecorderError> {
        let game = self.current.as_mut().ok_or(RecorderError::NoActiveGame)?;

        let correct_guesses: Vec<String> = record.correct_guesses().into_iter().map(str::to_string).collect();
        tracing::info!(
            "Turn {} - {} ({}): clue '{} {}', guesses [{}], correct [{}]",
            record.turn_number,
            record.team,
            model_name,
            record.clue_word,
            record.clue_count,
            record.guesses.join(", "),
            correct_guesses.join(", ")
        );

        game.turns.push(TurnLog {
            record: record.clone(),
            model_name: model_name.to_string(),
            correct_guesses,
            remaining_team_words: remaining_team_words.to_vec(),
            timestamp: Utc::now(),
        });
        Ok(())
    }

    pub fn log_forfeit(
        &mut self,
        turn_number: u32,
        team: Team,
        model_name: &str,
        reason: &str,
    ) -> Result<(), RecorderError> {
        let game = self.current.as_mut().ok_or(RecorderError::NoActiveGame)?;
        game.forfeits.push(ForfeitLog {
            turn_number,
            team,
            model_name: model_name.to_string(),
            reason: reason.to_string(),
            timestamp: Utc::now(),
        });
        Ok(())
    }

    /// Stamp the outcome, persist the log and close the session
    pub fn end_game(&mut self, winner: Option<Team>, reason: EndReason) -> Result<GameLog, RecorderError> {
        let mut game = self.current.take().ok_or(RecorderError::NoActiveGame)?;
        game.winner = winner;
        game.reason = Some(reason);
        game.ended_at = Some(Utc::now());

        tracing::info!(
            "Game {} ended: {} ({})",
            game.game_id,
            winner.map_or_else(|| "no winner".to_string(), |t| t.to_string()),
            reason
        );

        self.sink.store(&game)?;
        Ok(game)
    }

    /// Drop the open game without persisting it
    pub fn abandon_game(&mut self) -> Option<GameLog> {
        let game = self.current.take();
        if let Some(game) = &game {
            tracing::warn!("Abandoning game {} after {} turns", game.game_id, game.turns.len());
        }
        game
    }

    pub fn game_summary(&self, game_id: u64) -> Result<GameSummary, RecorderError> {
        Ok(self.sink.load(game_id)?.summary())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codenames_core::{rng_from_seed, GuessOutcome, WordList};

    fn setup() -> BoardSetup {
        BoardSetup::generate(&WordList::default(), &mut rng_from_seed(Some(9))).unwrap()
    }

    fn record(turn_number: u32, team: Team, guesses: &[(&str, GuessOutcome)]) -> TurnRecord {
        TurnRecord {
            turn_number,
            team,
            clue_word: "hint".to_string(),
            clue_count: 2,
            guesses: guesses.iter().map(|(g, _)| g.to_string()).collect(),
            outcomes: guesses.iter().map(|(_, o)| *o).collect(),
        }
    }

    #[test]
    fn test_requires_open_game() {
        let mut recorder = GameRecorder::new(MemorySink::new());
        let turn = record(1, Team::A, &[]);

        assert!(matches!(recorder.log_turn(&turn, "m", &[]), Err(RecorderError::NoActiveGame)));
        assert!(matches!(recorder.end_game(None, EndReason::TurnLimit), Err(RecorderError::NoActiveGame)));
        assert!(matches!(recorder.log_forfeit(1, Team::A, "m", "x"), Err(RecorderError::NoActiveGame)));
    }

    #[test]
    fn test_one_game_at_a_time() {
        let mut recorder = GameRecorder::new(MemorySink::new());
        recorder.start_game(1, "a", "b", &setup()).unwrap();
        assert!(matches!(recorder.start_game(2, "a", "b", &setup()), Err(RecorderError::GameInProgress(1))));

        assert!(recorder.abandon_game().is_some());
        assert!(!recorder.is_recording());
        assert!(recorder.sink().is_empty());
        recorder.start_game(2, "a", "b", &setup()).unwrap();
    }

    #[test]
    fn test_summary_counts() {
        let mut recorder = GameRecorder::new(MemorySink::new());
        recorder.start_game(4, "gpt-4", "gemini-pro", &setup()).unwrap();
        recorder
            .log_turn(
                &record(1, Team::A, &[("a", GuessOutcome::TeamWord), ("b", GuessOutcome::Neutral)]),
                "gpt-4",
                &[],
            )
            .unwrap();
        recorder.log_forfeit(2, Team::B, "gemini-pro", "invalid clue format").unwrap();
        recorder
            .log_turn(&record(3, Team::A, &[("c", GuessOutcome::Assassin)]), "gpt-4", &[])
            .unwrap();
        let log = recorder.end_game(Some(Team::B), EndReason::Assassin).unwrap();
        assert!(log.ended_at.is_some());

        let summary = recorder.game_summary(4).unwrap();
        assert_eq!(summary.total_turns, 2);
        assert_eq!(summary.forfeits, 1);
        assert_eq!(summary.guesses_made, 3);
        assert_eq!(summary.correct_guesses, 1);
        assert_eq!(summary.clues_given.len(), 2);
        assert_eq!(summary.winner, Some(Team::B));
        assert_eq!(summary.reason, Some(EndReason::Assassin));
        assert!(summary.duration_seconds >= 0.0);

        let result = log.game_result().unwrap();
        assert_eq!(result.turn_count, 3);
        assert_eq!(result.team_a.clues_given, 2);
        assert_eq!(result.team_a.incorrect_guesses, 2);
        assert_eq!(result.team_b.clues_given, 0);
        assert!(result.team_b.won);
    }

    #[test]
    fn test_missing_summary() {
        let recorder = GameRecorder::new(MemorySink::new());
        assert!(matches!(recorder.game_summary(7), Err(RecorderError::NotFound(7))));
    }

    #[test]
    fn test_open_leaves_missing_dir_alone() {
        let root = tempfile::tempdir().unwrap();
        let missing = root.path().join("game_logz");

        assert!(matches!(JsonDirSink::open(&missing), Err(RecorderError::MissingDir(_))));
        assert!(!missing.exists());

        let sink = JsonDirSink::open(root.path()).unwrap();
        assert!(matches!(sink.load(0), Err(RecorderError::NotFound(0))));
    }

    #[test]
    fn test_log_json_shape() {
        let mut recorder = GameRecorder::new(MemorySink::new());
        recorder.start_game(0, "a", "b", &setup()).unwrap();
        recorder
            .log_turn(&record(1, Team::A, &[("x", GuessOutcome::OpponentWord)]), "a", &["y".to_string()])
            .unwrap();
        let log = recorder.end_game(None, EndReason::TurnLimit).unwrap();

        let json = serde_json::to_value(&log).unwrap();
        assert_eq!(json["turns"][0]["clue_word"], "hint");
        assert_eq!(json["turns"][0]["outcomes"][0], "opponent word");
        assert_eq!(json["turns"][0]["remaining_team_words"][0], "y");
        assert_eq!(json["initial_board"].as_array().unwrap().len(), 25);
        assert_eq!(json["team_a_words"].as_array().unwrap().len(), 9);
        assert_eq!(json["reason"], "turn_limit");

        let back: GameLog = serde_json::from_value(json).unwrap();
        assert_eq!(back, log);
    }
}
