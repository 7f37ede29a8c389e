//! Prompt text for the codemaster and guesser roles

use codenames_core::{Clue, GameState, Team, TurnRecord};

pub const CODEMASTER_SYSTEM_PROMPT: &str = "\
You are playing as the Codemaster in Codenames. Your role is to give clues that will help your team \
guess specific words while avoiding the opponent's words, neutral words, and especially the assassin word.

Rules for giving clues:
1. Your clue must be a single word, followed by a number
2. The number indicates how many words on the board relate to your clue
3. You cannot use any word (or part of a word) that appears on the board
4. You cannot use proper nouns or made-up words
5. Think strategically about connecting multiple words with a single clue
6. Choose carefully to avoid words that might lead to the opponent's words or the assassin

You must respond in this exact format:
[single word clue]
[number]

Example response:
fruit
2";

pub const GUESSER_SYSTEM_PROMPT: &str = "\
You are playing as the Guesser in Codenames. Your role is to interpret your Codemaster's clues and \
identify the words on the board that they are trying to help you find.

Rules for guessing:
1. You can only guess words that are currently visible on the board
2. You should try to find connections between the clue and potential target words
3. Consider the number provided with the clue - it indicates how many words relate to the clue
4. Learn from past guesses to better understand your Codemaster's style
5. Be cautious about words that led to incorrect guesses with similar past clues

You must respond with exactly one word from the board that you think matches the clue.";

/// `Turn 3 - Team A: Clue 'fruit 2' → Guesses: apple (team word), pear (neutral)`
pub fn history_line(turn: &TurnRecord) -> String {
    let guesses: Vec<String> = turn
        .guesses
        .iter()
        .zip(&turn.outcomes)
        .map(|(guess, outcome)| format!("{} ({})", guess, outcome))
        .collect();
    format!(
        "Turn {} - {}: Clue '{} {}' → Guesses: {}",
        turn.turn_number,
        turn.team,
        turn.clue_word,
        turn.clue_count,
        guesses.join(", ")
    )
}

pub fn game_history(state: &GameState) -> String {
    if state.past_turns().is_empty() {
        return "No turns played yet".to_string();
    }
    state.past_turns().iter().map(history_line).collect::<Vec<_>>().join("\n")
}

pub fn codemaster_prompt(
    team: Team,
    own_words: &[String],
    neutral_words: &[String],
    opponent_words: &[String],
    assassin: &str,
    state: &GameState,
) -> String {
    format!(
        "You are the Codemaster for {team}. Here is the current game state:

Your team's remaining words to guess: {own}
Opponent's words (avoid these): {opponent}
Neutral words (avoid these): {neutral}
Assassin word (CRITICAL to avoid): {assassin}

Game History:
{history}

Your team has {left} words left to guess.

Give a strategic clue to help your team identify as many remaining words as possible while avoiding \
the opponent's words and especially the assassin.
Consider the past guesses when choosing your clue.

Remember:
1. Choose words that could connect multiple of your team's words
2. Avoid any connection to the assassin word
3. Consider the risk/reward of giving clues for multiple words
4. Consider how previous guesses might inform your clue choice

Provide your clue in the specified format.",
        team = team,
        own = own_words.join(", "),
        opponent = opponent_words.join(", "),
        neutral = neutral_words.join(", "),
        assassin = assassin,
        history = game_history(state),
        left = own_words.len(),
    )
}

pub fn guesser_prompt(team: Team, available_words: &[String], clue: &Clue, state: &GameState) -> String {
    format!(
        "You are the Guesser for {team}.

Current Board State:
{board}

Your Codemaster's clue is: {word} {count}
This means there are {count} words on the board related to '{word}'

Game History:
{history}

Your team has found these words so far: {found}

Already guessed words this turn: {this_turn}
Remaining guesses for this clue: {remaining}

Based on:
1. The current clue
2. The number of words it applies to
3. The board state
4. Past clues and guesses
5. Words your team has already found

Choose one unguessed word from the board that you think your Codemaster is trying to help you identify.",
        team = team,
        board = available_words.join(", "),
        word = clue.word,
        count = clue.count,
        history = game_history(state),
        found = state.found_words(team).join(", "),
        this_turn = state.current_turn_guesses().join(", "),
        remaining = state.guesses_remaining(),
    )
}
