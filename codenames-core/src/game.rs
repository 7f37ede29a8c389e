//! Game state and the turn state machine

use std::fmt;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::agent::{AgentError, Role, TeamAgents};
use crate::board::{Board, BoardSetup};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Turns played before the game is called with no winner
pub const DEFAULT_MAX_TURNS: u32 = 20;

// ============================================================================
// CORE TYPES
// ============================================================================

/// Team identity. Team A always opens.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    A = 0,
    B = 1,
}

impl Team {
    pub const ALL: [Team; 2] = [Team::A, Team::B];

    pub fn opponent(self) -> Self {
        match self {
            Team::A => Team::B,
            Team::B => Team::A,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Team::A => f.write_str("Team A"),
            Team::B => f.write_str("Team B"),
        }
    }
}

/// What a single guess turned out to be
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GuessOutcome {
    #[serde(rename = "team word")]
    TeamWord,
    #[serde(rename = "opponent word")]
    OpponentWord,
    #[serde(rename = "neutral")]
    Neutral,
    #[serde(rename = "assassin")]
    Assassin,
}

impl GuessOutcome {
    pub fn is_correct(self) -> bool {
        self == GuessOutcome::TeamWord
    }

    pub fn label(self) -> &'static str {
        match self {
            GuessOutcome::TeamWord => "team word",
            GuessOutcome::OpponentWord => "opponent word",
            GuessOutcome::Neutral => "neutral",
            GuessOutcome::Assassin => "assassin",
        }
    }
}

impl fmt::Display for GuessOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A codemaster's clue
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clue {
    pub word: String,
    pub count: u32,
}

impl Clue {
    pub fn new(word: impl Into<String>, count: u32) -> Self {
        Self {
            word: word.into(),
            count,
        }
    }
}

impl fmt::Display for Clue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.word, self.count)
    }
}

/// One completed turn. Never modified after it is appended to the history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub turn_number: u32,
    pub team: Team,
    pub clue_word: String,
    pub clue_count: u32,
    pub guesses: Vec<String>,
    /// Parallel to `guesses`
    pub outcomes: Vec<GuessOutcome>,
}

impl TurnRecord {
    fn new(turn_number: u32, team: Team, clue: &Clue) -> Self {
        Self {
            turn_number,
            team,
            clue_word: clue.word.clone(),
            clue_count: clue.count,
            guesses: Vec::new(),
            outcomes: Vec::new(),
        }
    }

    fn push(&mut self, guess: String, outcome: GuessOutcome) {
        self.guesses.push(guess);
        self.outcomes.push(outcome);
    }

    pub fn correct_guesses(&self) -> Vec<&str> {
        self.guesses
            .iter()
            .zip(&self.outcomes)
            .filter(|(_, outcome)| outcome.is_correct())
            .map(|(guess, _)| guess.as_str())
            .collect()
    }

    pub fn correct_count(&self) -> u32 {
        self.outcomes.iter().filter(|o| o.is_correct()).count() as u32
    }

    pub fn incorrect_count(&self) -> u32 {
        self.outcomes.len() as u32 - self.correct_count()
    }
}

/// Why a game stopped
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    AllWordsFound,
    Assassin,
    TurnLimit,
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndReason::AllWordsFound => f.write_str("found all their words"),
            EndReason::Assassin => f.write_str("opponent hit the assassin"),
            EndReason::TurnLimit => f.write_str("turn limit reached"),
        }
    }
}

/// Per-team tallies for one game
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamStats {
    pub correct_guesses: u32,
    pub incorrect_guesses: u32,
    pub clues_given: u32,
    pub won: bool,
}

impl TeamStats {
    /// Correct guesses per clue; 0 when the team never gave a clue
    pub fn words_per_clue(&self) -> f64 {
        if self.clues_given == 0 {
            0.0
        } else {
            self.correct_guesses as f64 / self.clues_given as f64
        }
    }
}

/// Final result of one game
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    pub winner: Option<Team>,
    pub reason: EndReason,
    /// Turns started, forfeits included
    pub turn_count: u32,
    pub team_a: TeamStats,
    pub team_b: TeamStats,
    pub turns: Vec<TurnRecord>,
}

impl GameResult {
    pub fn stats(&self, team: Team) -> &TeamStats {
        match team {
            Team::A => &self.team_a,
            Team::B => &self.team_b,
        }
    }

    pub fn clues(&self) -> Vec<(Team, &str, u32)> {
        self.turns
            .iter()
            .map(|t| (t.team, t.clue_word.as_str(), t.clue_count))
            .collect()
    }
}

// ============================================================================
// GAME STATE
// ============================================================================

/// Mutable record of one game in progress.
///
/// Only the engine writes to it; agents receive a shared reference.
#[derive(Clone, Debug)]
pub struct GameState {
    board: Board,
    guessed_words: FxHashSet<String>,
    current_turn_guesses: Vec<String>,
    guesses_remaining: u32,
    past_turns: Vec<TurnRecord>,
    current_team: Team,
    team_words: [Vec<String>; 2],
    neutral_words: Vec<String>,
    assassin: String,
    turn_number: u32,
}

impl GameState {
    pub fn new(setup: &BoardSetup) -> Self {
        let assignment = &setup.assignment;
        Self {
            board: setup.board.clone(),
            guessed_words: FxHashSet::default(),
            current_turn_guesses: Vec::new(),
            guesses_remaining: 0,
            past_turns: Vec::new(),
            current_team: Team::A,
            team_words: [
                assignment.team_a_words.clone(),
                assignment.team_b_words.clone(),
            ],
            neutral_words: assignment.neutral_words.clone(),
            assassin: assignment.assassin.clone(),
            turn_number: 0,
        }
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn guessed_words(&self) -> &FxHashSet<String> {
        &self.guessed_words
    }

    pub fn is_guessed(&self, word: &str) -> bool {
        self.guessed_words.contains(word)
    }

    pub fn current_turn_guesses(&self) -> &[String] {
        &self.current_turn_guesses
    }

    pub fn guesses_remaining(&self) -> u32 {
        self.guesses_remaining
    }

    pub fn past_turns(&self) -> &[TurnRecord] {
        &self.past_turns
    }

    pub fn current_team(&self) -> Team {
        self.current_team
    }

    /// Words a team still has to find
    pub fn team_words(&self, team: Team) -> &[String] {
        &self.team_words[team.index()]
    }

    pub fn neutral_words(&self) -> &[String] {
        &self.neutral_words
    }

    pub fn assassin(&self) -> &str {
        &self.assassin
    }

    /// Number of the turn in progress (or last played), starting at 1
    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    /// Unguessed board words in board order
    pub fn available_words(&self) -> Vec<String> {
        self.board
            .words()
            .iter()
            .filter(|w| !self.guessed_words.contains(*w))
            .cloned()
            .collect()
    }

    /// Words a team has found so far, across all turns
    pub fn found_words(&self, team: Team) -> Vec<&str> {
        self.past_turns
            .iter()
            .filter(|t| t.team == team)
            .flat_map(|t| t.correct_guesses())
            .collect()
    }

    // ========================================================================
    // MUTATION (engine only)
    // ========================================================================

    fn begin_turn(&mut self, team: Team) {
        self.turn_number += 1;
        self.current_team = team;
        self.current_turn_guesses.clear();
        self.guesses_remaining = 0;
    }

    fn end_turn(&mut self, team: Team) {
        self.current_team = team.opponent();
        self.guesses_remaining = 0;
    }

    /// Remove a guessed word from play and classify it.
    ///
    /// Precedence: own word, assassin, opponent word, neutral.
    fn reveal(&mut self, team: Team, word: &str) -> GuessOutcome {
        self.guessed_words.insert(word.to_string());
        self.current_turn_guesses.push(word.to_string());

        let own = &mut self.team_words[team.index()];
        if let Some(pos) = own.iter().position(|w| w == word) {
            own.remove(pos);
            return GuessOutcome::TeamWord;
        }

        if word == self.assassin {
            return GuessOutcome::Assassin;
        }

        let opponent = &mut self.team_words[team.opponent().index()];
        if let Some(pos) = opponent.iter().position(|w| w == word) {
            opponent.remove(pos);
            return GuessOutcome::OpponentWord;
        }

        self.neutral_words.retain(|w| w != word);
        GuessOutcome::Neutral
    }
}

// ============================================================================
// ENGINE
// ============================================================================

/// Engine limits
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Hard ceiling on turns, forfeits included
    pub max_turns: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_turns: DEFAULT_MAX_TURNS,
        }
    }
}

impl EngineConfig {
    pub fn with_max_turns(max_turns: u32) -> Self {
        Self { max_turns }
    }
}

/// Where the state machine stands between turns
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    TurnStart(Team),
    GameOver {
        winner: Option<Team>,
        reason: EndReason,
    },
}

/// What happened during one call to [`GameEngine::play_turn`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TurnEvent {
    /// A clue was given and guessed on
    Played(TurnRecord),
    /// No usable clue; the team lost its turn
    Forfeited {
        turn_number: u32,
        team: Team,
        reason: String,
    },
    /// The game ended before a clue was requested
    Ended {
        winner: Option<Team>,
        reason: EndReason,
    },
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("{team} {role} failed: {source}")]
    AgentFailure {
        team: Team,
        role: Role,
        #[source]
        source: AgentError,
    },

    #[error("game is already over")]
    GameOver,
}

enum ClueAttempt {
    Given(Clue),
    Forfeit(String),
}

/// Drives one game from the opening turn to a terminal outcome
pub struct GameEngine {
    state: GameState,
    agents: [TeamAgents; 2],
    config: EngineConfig,
    stats: [TeamStats; 2],
    phase: Phase,
}

impl GameEngine {
    pub fn new(setup: &BoardSetup, team_a: TeamAgents, team_b: TeamAgents, config: EngineConfig) -> Self {
        Self {
            state: GameState::new(setup),
            agents: [team_a, team_b],
            config,
            stats: [TeamStats::default(), TeamStats::default()],
            phase: Phase::TurnStart(Team::A),
        }
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, Phase::GameOver { .. })
    }

    pub fn stats(&self, team: Team) -> &TeamStats {
        &self.stats[team.index()]
    }

    /// Final result, once the game is over
    pub fn result(&self) -> Option<GameResult> {
        let Phase::GameOver { winner, reason } = self.phase else {
            return None;
        };

        let stats_for = |team: Team| TeamStats {
            won: winner == Some(team),
            ..self.stats[team.index()].clone()
        };

        Some(GameResult {
            winner,
            reason,
            turn_count: self.state.turn_number,
            team_a: stats_for(Team::A),
            team_b: stats_for(Team::B),
            turns: self.state.past_turns.clone(),
        })
    }

    // ========================================================================
    // TURN LOOP
    // ========================================================================

    /// Play the game to completion
    pub fn play(&mut self) -> Result<GameResult, EngineError> {
        while !self.is_over() {
            self.play_turn()?;
        }
        self.result().ok_or(EngineError::GameOver)
    }

    /// Advance from one turn start to the next (or to game over)
    pub fn play_turn(&mut self) -> Result<TurnEvent, EngineError> {
        let team = match self.phase {
            Phase::TurnStart(team) => team,
            Phase::GameOver { .. } => return Err(EngineError::GameOver),
        };

        if self.state.team_words(team).is_empty() {
            return Ok(self.finish(Some(team), EndReason::AllWordsFound));
        }
        if self.state.turn_number >= self.config.max_turns {
            return Ok(self.finish(None, EndReason::TurnLimit));
        }

        self.state.begin_turn(team);
        let turn_number = self.state.turn_number;
        tracing::info!(
            "=== {}'s turn (turn {}) - {} words left ===",
            team,
            turn_number,
            self.state.team_words(team).len()
        );

        let clue = match self.request_clue(team)? {
            ClueAttempt::Given(clue) => clue,
            ClueAttempt::Forfeit(reason) => {
                tracing::warn!("{} forfeits turn {}: {}", team, turn_number, reason);
                self.pass_turn(team);
                return Ok(TurnEvent::Forfeited {
                    turn_number,
                    team,
                    reason,
                });
            }
        };

        tracing::info!("{} clue: {}", team, clue);
        self.stats[team.index()].clues_given += 1;
        let record = self.run_guessing(team, turn_number, &clue)?;

        tracing::debug!("Board after turn {}:\n{}", turn_number, self.state.board.render(&self.state.guessed_words));

        if !self.is_over() {
            self.pass_turn(team);
        }
        Ok(TurnEvent::Played(record))
    }

    fn pass_turn(&mut self, team: Team) {
        self.state.end_turn(team);
        self.phase = Phase::TurnStart(team.opponent());
    }

    /// Guess until the budget runs out or a non-team word ends the turn
    fn run_guessing(&mut self, team: Team, turn_number: u32, clue: &Clue) -> Result<TurnRecord, EngineError> {
        let mut record = TurnRecord::new(turn_number, team, clue);
        // One bonus guess beyond the clue count
        self.state.guesses_remaining = clue.count.saturating_add(1);

        while self.state.guesses_remaining > 0 {
            let Some(guess) = self.request_guess(team, clue)? else {
                break;
            };

            let outcome = self.state.reveal(team, &guess);
            tracing::info!("{} guesses '{}': {}", team, guess, outcome);
            record.push(guess, outcome);

            let stats = &mut self.stats[team.index()];
            match outcome {
                GuessOutcome::TeamWord => {
                    stats.correct_guesses += 1;
                    if self.state.team_words(team).is_empty() {
                        self.finish(Some(team), EndReason::AllWordsFound);
                        break;
                    }
                    self.state.guesses_remaining -= 1;
                }
                GuessOutcome::Assassin => {
                    stats.incorrect_guesses += 1;
                    self.finish(Some(team.opponent()), EndReason::Assassin);
                    break;
                }
                GuessOutcome::OpponentWord | GuessOutcome::Neutral => {
                    stats.incorrect_guesses += 1;
                    break;
                }
            }
        }

        self.state.guesses_remaining = 0;
        self.state.past_turns.push(record.clone());
        Ok(record)
    }

    fn request_clue(&mut self, team: Team) -> Result<ClueAttempt, EngineError> {
        let state = &self.state;
        let codemaster = &mut self.agents[team.index()].codemaster;

        let clue = match codemaster.give_clue(
            team,
            state.team_words(team),
            state.neutral_words(),
            state.team_words(team.opponent()),
            state.assassin(),
            state,
        ) {
            Ok(clue) => clue,
            Err(err) if err.is_fatal() => {
                return Err(EngineError::AgentFailure {
                    team,
                    role: Role::Codemaster,
                    source: err,
                })
            }
            Err(err) => return Ok(ClueAttempt::Forfeit(err.to_string())),
        };

        if clue.word.trim().is_empty() {
            return Ok(ClueAttempt::Forfeit("empty clue word".to_string()));
        }
        if let Some(word) = board_conflict(&clue.word, &state.board) {
            tracing::warn!("{} clue '{}' overlaps board word '{}'", team, clue.word, word);
        }

        Ok(ClueAttempt::Given(clue))
    }

    /// Ask the guesser, substituting the first available word for anything illegal
    fn request_guess(&mut self, team: Team, clue: &Clue) -> Result<Option<String>, EngineError> {
        let available = self.state.available_words();
        let Some(fallback) = available.first().cloned() else {
            return Ok(None);
        };

        let guesser = &mut self.agents[team.index()].guesser;
        match guesser.make_guess(team, &available, clue, &self.state) {
            Ok(guess) if available.contains(&guess) => Ok(Some(guess)),
            Ok(guess) => {
                tracing::warn!("{} guessed '{}' which is not available, using '{}'", team, guess, fallback);
                Ok(Some(fallback))
            }
            Err(err) if err.is_fatal() => Err(EngineError::AgentFailure {
                team,
                role: Role::Guesser,
                source: err,
            }),
            Err(err) => {
                tracing::warn!("{} guesser failed ({}), using '{}'", team, err, fallback);
                Ok(Some(fallback))
            }
        }
    }

    fn finish(&mut self, winner: Option<Team>, reason: EndReason) -> TurnEvent {
        self.phase = Phase::GameOver { winner, reason };
        match winner {
            Some(team) => tracing::info!("{} wins: {}", team, reason),
            None => tracing::info!("No winner: {}", reason),
        }
        TurnEvent::Ended { winner, reason }
    }
}

/// Board word that the clue contains or is contained in (case-insensitive)
pub fn board_conflict<'a>(clue: &str, board: &'a Board) -> Option<&'a str> {
    let clue = clue.trim().to_lowercase();
    board
        .words()
        .iter()
        .find(|word| {
            let word = word.to_lowercase();
            clue.contains(&word) || word.contains(&clue)
        })
        .map(String::as_str)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, WordAssignment};
    use crate::scripted::{ScriptedCodemaster, ScriptedGuesser};

    /// a0..a8 for team A, b0..b7 for team B, n0..n6 neutral, "x" assassin
    fn fixed_setup() -> BoardSetup {
        let team_a: Vec<String> = (0..9).map(|i| format!("a{}", i)).collect();
        let team_b: Vec<String> = (0..8).map(|i| format!("b{}", i)).collect();
        let neutral: Vec<String> = (0..7).map(|i| format!("n{}", i)).collect();
        let mut words = team_a.clone();
        words.extend(team_b.clone());
        words.extend(neutral.clone());
        words.push("x".to_string());

        BoardSetup::new(
            Board::from_words(words).unwrap(),
            WordAssignment {
                team_a_words: team_a,
                team_b_words: team_b,
                neutral_words: neutral,
                assassin: "x".to_string(),
            },
        )
        .unwrap()
    }

    fn team(clues: Vec<Clue>, guesses: &[&str]) -> TeamAgents {
        TeamAgents {
            codemaster: Box::new(ScriptedCodemaster::new(clues)),
            guesser: Box::new(ScriptedGuesser::new(guesses.iter().copied())),
        }
    }

    fn engine(team_a: TeamAgents, team_b: TeamAgents) -> GameEngine {
        GameEngine::new(&fixed_setup(), team_a, team_b, EngineConfig::default())
    }

    #[test]
    fn test_assassin_ends_game_instantly() {
        let mut game = engine(
            team(vec![Clue::new("risky", 2)], &["x"]),
            team(vec![Clue::new("never", 1)], &[]),
        );

        let result = game.play().unwrap();
        assert_eq!(result.winner, Some(Team::B));
        assert_eq!(result.reason, EndReason::Assassin);
        assert_eq!(result.team_a.correct_guesses, 0);
        assert_eq!(result.team_a.incorrect_guesses, 1);
        assert_eq!(result.turns.len(), 1);
        assert!(result.team_b.won);
        assert!(!result.team_a.won);
    }

    #[test]
    fn test_opponent_word_ends_turn_after_one_guess() {
        let mut game = engine(
            team(vec![Clue::new("clue", 2)], &["b0", "a0", "a1"]),
            team(vec![Clue::new("other", 1)], &["b1", "b2"]),
        );

        let event = game.play_turn().unwrap();
        let TurnEvent::Played(record) = event else {
            panic!("expected a played turn, got {:?}", event);
        };
        assert_eq!(record.guesses, vec!["b0"]);
        assert_eq!(record.outcomes, vec![GuessOutcome::OpponentWord]);
        assert_eq!(game.state().guesses_remaining(), 0);
        assert_eq!(game.phase(), Phase::TurnStart(Team::B));
        assert!(!game.state().team_words(Team::B).contains(&"b0".to_string()));
    }

    #[test]
    fn test_neutral_word_ends_turn() {
        let mut game = engine(
            team(vec![Clue::new("clue", 3)], &["a0", "n0", "a1"]),
            team(vec![], &[]),
        );

        let TurnEvent::Played(record) = game.play_turn().unwrap() else {
            panic!("expected a played turn");
        };
        assert_eq!(record.outcomes, vec![GuessOutcome::TeamWord, GuessOutcome::Neutral]);
        assert_eq!(game.stats(Team::A).correct_guesses, 1);
        assert_eq!(game.stats(Team::A).incorrect_guesses, 1);
        assert!(!game.state().neutral_words().contains(&"n0".to_string()));
    }

    #[test]
    fn test_bonus_guess_budget() {
        // Clue count 1 allows two correct guesses, never a third
        let mut game = engine(
            team(vec![Clue::new("clue", 1)], &["a0", "a1", "a2"]),
            team(vec![], &[]),
        );

        let TurnEvent::Played(record) = game.play_turn().unwrap() else {
            panic!("expected a played turn");
        };
        assert_eq!(record.guesses, vec!["a0", "a1"]);
        assert_eq!(game.state().guessed_words().len(), 2);
    }

    #[test]
    fn test_exhaustion_win_mid_turn() {
        let a_words: Vec<String> = (0..9).map(|i| format!("a{}", i)).collect();
        let guesses: Vec<&str> = a_words.iter().map(String::as_str).collect();
        let mut game = engine(
            team(vec![Clue::new("everything", 20)], &guesses),
            team(vec![], &[]),
        );

        let result = game.play().unwrap();
        assert_eq!(result.winner, Some(Team::A));
        assert_eq!(result.reason, EndReason::AllWordsFound);
        assert_eq!(result.turns.len(), 1);
        assert_eq!(result.turns[0].guesses.len(), 9);
        assert_eq!(result.team_a.correct_guesses, 9);
    }

    #[test]
    fn test_exhaustion_checked_at_turn_start() {
        // Team A guesses every B word, handing B the win at B's turn start
        let mut clues = Vec::new();
        let mut guesses = Vec::new();
        for i in 0..8 {
            clues.push(Clue::new("oops", 0));
            guesses.push(format!("b{}", i));
        }
        let guess_refs: Vec<&str> = guesses.iter().map(String::as_str).collect();
        // B gives a clue and hits a neutral word each turn
        let b_clues = vec![Clue::new("pass", 0); 8];
        let b_guesses: Vec<String> = (0..7).map(|i| format!("n{}", i)).collect();
        let b_refs: Vec<&str> = b_guesses.iter().map(String::as_str).collect();

        let mut game = engine(team(clues, &guess_refs), team(b_clues, &b_refs));
        let result = game.play().unwrap();

        assert_eq!(result.winner, Some(Team::B));
        assert_eq!(result.reason, EndReason::AllWordsFound);
        assert_eq!(result.team_b.correct_guesses, 0);
        assert_eq!(result.turns.last().unwrap().team, Team::A);
    }

    #[test]
    fn test_forfeit_switches_team_without_history() {
        let mut codemaster = ScriptedCodemaster::new(vec![]);
        codemaster.push_error(AgentError::InvalidClueFormat("no number".to_string()));
        let team_a = TeamAgents {
            codemaster: Box::new(codemaster),
            guesser: Box::new(ScriptedGuesser::new(["a0"])),
        };
        let mut game = engine(team_a, team(vec![Clue::new("b", 0)], &["b0"]));

        let event = game.play_turn().unwrap();
        assert!(matches!(event, TurnEvent::Forfeited { turn_number: 1, team: Team::A, .. }));
        assert!(game.state().past_turns().is_empty());
        assert_eq!(game.phase(), Phase::TurnStart(Team::B));
        assert_eq!(game.stats(Team::A).clues_given, 0);
    }

    #[test]
    fn test_current_team_names_next_actor() {
        let mut codemaster = ScriptedCodemaster::new(vec![]);
        codemaster.push_error(AgentError::Unavailable("timeout".to_string()));
        let team_b = TeamAgents {
            codemaster: Box::new(codemaster),
            guesser: Box::new(ScriptedGuesser::new(Vec::<String>::new())),
        };
        let mut game = engine(team(vec![Clue::new("clue", 1)], &["n0"]), team_b);
        assert_eq!(game.state().current_team(), Team::A);

        assert!(matches!(game.play_turn().unwrap(), TurnEvent::Played(_)));
        assert_eq!(game.state().current_team(), Team::B);

        assert!(matches!(game.play_turn().unwrap(), TurnEvent::Forfeited { team: Team::B, .. }));
        assert_eq!(game.state().current_team(), Team::A);
        assert_eq!(game.phase(), Phase::TurnStart(Team::A));
    }

    #[test]
    fn test_blank_clue_word_forfeits() {
        let mut game = engine(
            team(vec![Clue::new("  ", 2)], &["a0"]),
            team(vec![Clue::new("b", 0)], &["b0"]),
        );

        let event = game.play_turn().unwrap();
        assert!(matches!(event, TurnEvent::Forfeited { turn_number: 1, team: Team::A, .. }));
        assert_eq!(game.stats(Team::A).clues_given, 0);
        assert!(game.state().guessed_words().is_empty());
        assert!(game.state().past_turns().is_empty());
    }

    #[test]
    fn test_clue_overlapping_board_word_is_accepted() {
        let mut game = engine(
            team(vec![Clue::new("A0s", 1)], &["a0", "n0"]),
            team(vec![], &[]),
        );

        let TurnEvent::Played(record) = game.play_turn().unwrap() else {
            panic!("expected a played turn");
        };
        assert_eq!(record.clue_word, "A0s");
        assert_eq!(record.guesses, vec!["a0", "n0"]);
        assert_eq!(game.stats(Team::A).clues_given, 1);
    }

    #[test]
    fn test_unavailable_guesser_falls_back_to_first_available() {
        // An empty guess script answers Unavailable
        let mut game = engine(team(vec![Clue::new("clue", 0)], &[]), team(vec![], &[]));

        let TurnEvent::Played(record) = game.play_turn().unwrap() else {
            panic!("expected a played turn");
        };
        assert_eq!(record.guesses, vec!["a0"]);
        assert_eq!(record.outcomes, vec![GuessOutcome::TeamWord]);
        assert_eq!(game.state().current_team(), Team::B);
    }

    #[test]
    fn test_turn_limit_yields_no_winner() {
        let mut game = GameEngine::new(
            &fixed_setup(),
            team(vec![], &[]),
            team(vec![], &[]),
            EngineConfig::with_max_turns(6),
        );

        let result = game.play().unwrap();
        assert_eq!(result.winner, None);
        assert_eq!(result.reason, EndReason::TurnLimit);
        assert_eq!(result.turn_count, 6);
        assert!(!result.team_a.won && !result.team_b.won);
        assert_eq!(result.team_a.words_per_clue(), 0.0);
    }

    #[test]
    fn test_illegal_guess_falls_back_to_first_available() {
        let mut game = engine(
            team(vec![Clue::new("clue", 0)], &["not-on-board"]),
            team(vec![], &[]),
        );

        let TurnEvent::Played(record) = game.play_turn().unwrap() else {
            panic!("expected a played turn");
        };
        assert_eq!(record.guesses, vec!["a0"]);
        assert_eq!(record.outcomes, vec![GuessOutcome::TeamWord]);
    }

    #[test]
    fn test_already_guessed_word_is_replaced() {
        let mut game = engine(
            team(vec![Clue::new("c", 1), Clue::new("c", 0)], &["a0", "n0", "a0"]),
            team(vec![Clue::new("d", 0)], &["b0"]),
        );
        game.play_turn().unwrap();
        game.play_turn().unwrap();
        let TurnEvent::Played(record) = game.play_turn().unwrap() else {
            panic!("expected a played turn");
        };
        // a0 is gone, the first available word is a1
        assert_eq!(record.guesses, vec!["a1"]);
    }

    #[test]
    fn test_fatal_agent_error_propagates() {
        let mut codemaster = ScriptedCodemaster::new(vec![]);
        codemaster.push_error(AgentError::Fatal("bad credentials".to_string()));
        let team_a = TeamAgents {
            codemaster: Box::new(codemaster),
            guesser: Box::new(ScriptedGuesser::new(Vec::<String>::new())),
        };
        let mut game = engine(team_a, team(vec![], &[]));

        let err = game.play().unwrap_err();
        assert!(matches!(
            err,
            EngineError::AgentFailure { team: Team::A, role: Role::Codemaster, .. }
        ));
    }

    #[test]
    fn test_play_turn_after_game_over_errors() {
        let mut game = engine(team(vec![Clue::new("c", 0)], &["x"]), team(vec![], &[]));
        game.play().unwrap();
        assert!(matches!(game.play_turn(), Err(EngineError::GameOver)));
    }

    #[test]
    fn test_guessed_words_grow_monotonically() {
        let mut game = engine(
            team(vec![Clue::new("c", 2); 10], &["a0", "a1", "n0", "a2", "b0", "a3", "a4", "a5", "n1"]),
            team(vec![Clue::new("d", 1); 10], &["b1", "n2", "b2", "b3", "n3", "b4"]),
        );

        let mut previous = FxHashSet::default();
        let mut seen_guesses = Vec::new();
        while !game.is_over() {
            if let TurnEvent::Played(record) = game.play_turn().unwrap() {
                seen_guesses.extend(record.guesses.clone());
            }
            let current = game.state().guessed_words().clone();
            assert!(previous.is_subset(&current));
            previous = current;
        }

        let unique: FxHashSet<&String> = seen_guesses.iter().collect();
        assert_eq!(unique.len(), seen_guesses.len(), "a word was guessed twice");
    }

    #[test]
    fn test_words_removed_per_turn() {
        // k correct guesses then a miss removes k + 1 words
        let mut game = engine(
            team(vec![Clue::new("c", 3)], &["a0", "a1", "b0"]),
            team(vec![], &[]),
        );
        game.play_turn().unwrap();
        assert_eq!(game.state().guessed_words().len(), 3);

        // budget exhaustion after k correct guesses removes k words
        let mut game = engine(
            team(vec![Clue::new("c", 2)], &["a0", "a1", "a2", "a3"]),
            team(vec![], &[]),
        );
        game.play_turn().unwrap();
        assert_eq!(game.state().guessed_words().len(), 3);
    }

    #[test]
    fn test_board_conflict() {
        let board = fixed_setup().board;
        assert_eq!(board_conflict("A0s", &board), Some("a0"));
        assert_eq!(board_conflict("zebra", &board), None);
    }

    #[test]
    fn test_words_per_clue() {
        let stats = TeamStats {
            correct_guesses: 3,
            incorrect_guesses: 1,
            clues_given: 2,
            won: false,
        };
        assert_eq!(stats.words_per_clue(), 1.5);
        assert_eq!(TeamStats::default().words_per_clue(), 0.0);
    }

    #[test]
    fn test_outcome_serialization_labels() {
        let json = serde_json::to_string(&GuessOutcome::OpponentWord).unwrap();
        assert_eq!(json, "\"opponent word\"");
        let json = serde_json::to_string(&EndReason::AllWordsFound).unwrap();
        assert_eq!(json, "\"all_words_found\"");
    }
}
