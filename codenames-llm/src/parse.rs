//! Reading model output back into clues and guesses

use codenames_core::{AgentError, Clue};

/// Trim quotes and punctuation; a leading minus sign is kept
fn strip_decoration(token: &str) -> &str {
    token.trim_matches(|c: char| !(c.is_alphanumeric() || c == '-'))
}

/// Parse a `word\ncount` (or `word count`) reply.
///
/// The word must be a single non-numeric token; the count must be a
/// non-negative integer. Quotes and trailing punctuation are ignored.
pub fn parse_clue(text: &str) -> Result<Clue, AgentError> {
    let tokens: Vec<&str> = text
        .lines()
        .flat_map(str::split_whitespace)
        .map(strip_decoration)
        .filter(|t| !t.is_empty())
        .collect();

    let [word, count] = tokens.as_slice() else {
        return Err(AgentError::InvalidClueFormat(format!(
            "expected a word and a number, got {:?}",
            text.trim()
        )));
    };

    if word.parse::<i64>().is_ok() {
        return Err(AgentError::InvalidClueFormat(format!("clue word '{}' is a number", word)));
    }
    let count = count
        .parse::<u32>()
        .map_err(|_| AgentError::InvalidClueFormat(format!("clue count '{}' is not a non-negative integer", count)))?;

    Ok(Clue::new(word.to_lowercase(), count))
}

/// Match a guesser reply against the available words, ignoring case.
///
/// The whole reply is tried first (for multi-word board entries), then its
/// first token.
pub fn normalize_guess(text: &str, available_words: &[String]) -> Option<String> {
    let line = text.lines().map(str::trim).find(|l| !l.is_empty())?;

    let candidates = [
        strip_decoration(line),
        line.split_whitespace().next().map(strip_decoration).unwrap_or_default(),
    ];

    candidates.iter().find_map(|candidate| {
        available_words
            .iter()
            .find(|w| w.eq_ignore_ascii_case(candidate))
            .cloned()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_two_line_clue() {
        assert_eq!(parse_clue("fruit\n2").unwrap(), Clue::new("fruit", 2));
        assert_eq!(parse_clue("\n  Ocean \n\n 3 \n").unwrap(), Clue::new("ocean", 3));
    }

    #[test]
    fn test_single_line_and_decorated_clue() {
        assert_eq!(parse_clue("fruit 2").unwrap(), Clue::new("fruit", 2));
        assert_eq!(parse_clue("\"Fruit\",\n2.").unwrap(), Clue::new("fruit", 2));
        assert_eq!(parse_clue("space\n0").unwrap(), Clue::new("space", 0));
    }

    #[test]
    fn test_malformed_clues() {
        for text in ["", "fruit", "fruit\ntwo", "fruit salad\n2", "3\n2", "fruit\n-1", "fruit\n2\nextra"] {
            let err = parse_clue(text).unwrap_err();
            assert!(matches!(err, AgentError::InvalidClueFormat(_)), "{:?}", text);
        }
    }

    #[test]
    fn test_normalize_guess() {
        let available = words(&["apple", "ice cream", "bank"]);

        assert_eq!(normalize_guess("APPLE", &available).as_deref(), Some("apple"));
        assert_eq!(normalize_guess("  bank.\n", &available).as_deref(), Some("bank"));
        assert_eq!(normalize_guess("Ice Cream", &available).as_deref(), Some("ice cream"));
        assert_eq!(normalize_guess("apple because it is red", &available).as_deref(), Some("apple"));
        assert_eq!(normalize_guess("banana", &available), None);
        assert_eq!(normalize_guess("", &available), None);
    }
}
