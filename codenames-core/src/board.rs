//! Word lists, board generation and word assignment

use std::fmt;
use std::path::Path;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game::Team;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Number of words on a board
pub const BOARD_SIZE: usize = 25;

/// Words per rendered row
pub const BOARD_COLUMNS: usize = 5;

/// Team A opens the game and gets one extra word
pub const TEAM_A_WORD_COUNT: usize = 9;
pub const TEAM_B_WORD_COUNT: usize = 8;
pub const NEUTRAL_WORD_COUNT: usize = 7;

const DEFAULT_WORDS: &str = include_str!("../words/default.txt");

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("word list has {found} unique words, a board needs 25")]
    InsufficientWords { found: usize },

    #[error("board must hold 25 unique words, got {found}")]
    InvalidBoard { found: usize },

    #[error("word assignment does not partition the board: {0}")]
    InvalidAssignment(String),

    #[error("failed to read word list {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// ============================================================================
// WORD LIST
// ============================================================================

/// Candidate words a board is drawn from
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordList {
    words: Vec<String>,
}

impl WordList {
    /// Parse one word per line.
    ///
    /// Blank lines and `#` comments are skipped, words are trimmed and
    /// lowercased, and duplicates are dropped keeping the first occurrence.
    pub fn parse(text: &str) -> Self {
        let mut seen = FxHashSet::default();
        let words = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_lowercase)
            .filter(|word| seen.insert(word.clone()))
            .collect();

        Self { words }
    }

    /// Load a word list from a text file
    pub fn load(path: &Path) -> Result<Self, BoardError> {
        let text = std::fs::read_to_string(path).map_err(|source| BoardError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self::parse(&text))
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for WordList {
    /// The built-in word list
    fn default() -> Self {
        Self::parse(DEFAULT_WORDS)
    }
}

impl<S: Into<String>> FromIterator<S> for WordList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let text: Vec<String> = iter.into_iter().map(Into::into).collect();
        Self::parse(&text.join("\n"))
    }
}

// ============================================================================
// BOARD
// ============================================================================

/// The 25 words in play, fixed for one game
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    words: Vec<String>,
}

impl Board {
    /// Build a board from explicit words (must be 25 unique words)
    pub fn from_words(words: Vec<String>) -> Result<Self, BoardError> {
        let unique: FxHashSet<&str> = words.iter().map(String::as_str).collect();
        if words.len() != BOARD_SIZE || unique.len() != BOARD_SIZE {
            return Err(BoardError::InvalidBoard { found: unique.len() });
        }
        Ok(Self { words })
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.iter().any(|w| w == word)
    }

    /// Render the board as a 5x5 grid, guessed words in brackets
    pub fn render(&self, guessed: &FxHashSet<String>) -> String {
        self.words
            .chunks(BOARD_COLUMNS)
            .map(|row| {
                row.iter()
                    .map(|word| {
                        if guessed.contains(word) {
                            format!("[{}]", word)
                        } else {
                            word.clone()
                        }
                    })
                    .collect::<Vec<_>>()
                    .join(" | ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&FxHashSet::default()))
    }
}

// ============================================================================
// WORD ASSIGNMENT
// ============================================================================

/// Partition of a board into team, neutral and assassin words
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordAssignment {
    pub team_a_words: Vec<String>,
    pub team_b_words: Vec<String>,
    pub neutral_words: Vec<String>,
    pub assassin: String,
}

impl WordAssignment {
    /// Words belonging to a team
    pub fn team_words(&self, team: Team) -> &[String] {
        match team {
            Team::A => &self.team_a_words,
            Team::B => &self.team_b_words,
        }
    }

    /// Check that the four sets are disjoint and cover the board exactly
    pub fn validate(&self, board: &Board) -> Result<(), BoardError> {
        let mut seen = FxHashSet::default();
        let all = self
            .team_a_words
            .iter()
            .chain(&self.team_b_words)
            .chain(&self.neutral_words)
            .chain(std::iter::once(&self.assassin));

        for word in all {
            if !board.contains(word) {
                return Err(BoardError::InvalidAssignment(format!(
                    "'{}' is not on the board",
                    word
                )));
            }
            if !seen.insert(word.as_str()) {
                return Err(BoardError::InvalidAssignment(format!(
                    "'{}' is assigned twice",
                    word
                )));
            }
        }

        if seen.len() != BOARD_SIZE {
            return Err(BoardError::InvalidAssignment(format!(
                "{} of {} board words assigned",
                seen.len(),
                BOARD_SIZE
            )));
        }
        Ok(())
    }
}

/// A board together with its key card
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSetup {
    pub board: Board,
    pub assignment: WordAssignment,
}

impl BoardSetup {
    /// Pair a board with an assignment, rejecting anything that is not an exact partition
    pub fn new(board: Board, assignment: WordAssignment) -> Result<Self, BoardError> {
        assignment.validate(&board)?;
        Ok(Self { board, assignment })
    }

    /// Draw a fresh board and split it
    pub fn generate<R: Rng + ?Sized>(words: &WordList, rng: &mut R) -> Result<Self, BoardError> {
        let board = generate_board(words, rng)?;
        let assignment = split_words(&board, rng);
        Ok(Self { board, assignment })
    }
}

// ============================================================================
// GENERATION
// ============================================================================

/// Draw 25 words without replacement
pub fn generate_board<R: Rng + ?Sized>(words: &WordList, rng: &mut R) -> Result<Board, BoardError> {
    if words.len() < BOARD_SIZE {
        return Err(BoardError::InsufficientWords { found: words.len() });
    }

    let chosen = words
        .words()
        .choose_multiple(rng, BOARD_SIZE)
        .cloned()
        .collect();

    Ok(Board { words: chosen })
}

/// Shuffle the board and slice it 9 / 8 / 7 / 1
pub fn split_words<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> WordAssignment {
    let mut shuffled = board.words().to_vec();
    shuffled.shuffle(rng);

    // The last word is the assassin, the rest is sliced front to back
    let assassin = shuffled.pop().unwrap_or_default();
    let neutral_words = shuffled.split_off(TEAM_A_WORD_COUNT + TEAM_B_WORD_COUNT);
    let team_b_words = shuffled.split_off(TEAM_A_WORD_COUNT);

    WordAssignment {
        team_a_words: shuffled,
        team_b_words,
        neutral_words,
        assassin,
    }
}

/// Create RNG from seed or from OS entropy
pub fn rng_from_seed(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn numbered_words(n: usize) -> WordList {
        (0..n).map(|i| format!("word{}", i)).collect()
    }

    #[test]
    fn test_parse_filters_and_dedups() {
        let list = WordList::parse("Apple\n  banana \n\n# comment\napple\nCherry\n");
        assert_eq!(list.words(), ["apple", "banana", "cherry"]);
    }

    #[test]
    fn test_default_list_is_large_enough() {
        let list = WordList::default();
        assert!(list.len() >= BOARD_SIZE);
        let unique: FxHashSet<_> = list.words().iter().collect();
        assert_eq!(unique.len(), list.len());
    }

    #[test]
    fn test_insufficient_words() {
        let mut rng = rng_from_seed(Some(1));
        let err = generate_board(&numbered_words(24), &mut rng).unwrap_err();
        assert!(matches!(err, BoardError::InsufficientWords { found: 24 }));
    }

    #[test]
    fn test_duplicates_do_not_count_toward_board_size() {
        let mut words: Vec<String> = (0..20).map(|i| format!("w{}", i)).collect();
        words.extend((0..10).map(|i| format!("w{}", i)));
        let list: WordList = words.into_iter().collect();
        let mut rng = rng_from_seed(Some(1));
        assert!(generate_board(&list, &mut rng).is_err());
    }

    #[test]
    fn test_generation_is_deterministic_with_seed() {
        let words = WordList::default();
        let a = BoardSetup::generate(&words, &mut rng_from_seed(Some(7))).unwrap();
        let b = BoardSetup::generate(&words, &mut rng_from_seed(Some(7))).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_split_sizes() {
        let mut rng = rng_from_seed(Some(3));
        let board = generate_board(&numbered_words(40), &mut rng).unwrap();
        let assignment = split_words(&board, &mut rng);
        assert_eq!(assignment.team_a_words.len(), TEAM_A_WORD_COUNT);
        assert_eq!(assignment.team_b_words.len(), TEAM_B_WORD_COUNT);
        assert_eq!(assignment.neutral_words.len(), NEUTRAL_WORD_COUNT);
    }

    #[test]
    fn test_board_rejects_duplicates() {
        let mut words: Vec<String> = (0..24).map(|i| format!("w{}", i)).collect();
        words.push("w0".to_string());
        assert!(Board::from_words(words).is_err());
    }

    #[test]
    fn test_validate_rejects_overlap() {
        let mut rng = rng_from_seed(Some(5));
        let board = generate_board(&numbered_words(30), &mut rng).unwrap();
        let mut assignment = split_words(&board, &mut rng);
        assignment.neutral_words[0] = assignment.team_a_words[0].clone();
        assert!(assignment.validate(&board).is_err());
    }

    #[test]
    fn test_render_marks_guessed_words() {
        let words: Vec<String> = (0..25).map(|i| format!("w{}", i)).collect();
        let board = Board::from_words(words).unwrap();
        let mut guessed = FxHashSet::default();
        guessed.insert("w6".to_string());

        let rendered = board.render(&guessed);
        let rows: Vec<&str> = rendered.lines().collect();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[1], "w5 | [w6] | w7 | w8 | w9");
    }

    proptest! {
        #[test]
        fn prop_partition_is_exact(seed in any::<u64>(), extra in 0usize..50) {
            let words = numbered_words(BOARD_SIZE + extra);
            let mut rng = rng_from_seed(Some(seed));
            let setup = BoardSetup::generate(&words, &mut rng).unwrap();

            prop_assert!(setup.assignment.validate(&setup.board).is_ok());

            let mut union: Vec<&String> = setup.assignment.team_a_words.iter()
                .chain(&setup.assignment.team_b_words)
                .chain(&setup.assignment.neutral_words)
                .chain(std::iter::once(&setup.assignment.assassin))
                .collect();
            union.sort();
            let mut board: Vec<&String> = setup.board.words().iter().collect();
            board.sort();
            prop_assert_eq!(union, board);
        }
    }
}
