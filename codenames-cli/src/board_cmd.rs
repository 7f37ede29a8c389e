//! Board command - deal a board and show its key

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use rustc_hash::FxHashSet;

use codenames_core::{rng_from_seed, BoardSetup, WordList};

#[derive(Args)]
pub struct BoardArgs {
    /// Word list file, one word per line
    #[arg(long, value_name = "FILE")]
    pub words: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: BoardArgs, seed: Option<u64>) -> Result<()> {
    let words = match &args.words {
        Some(path) => WordList::load(path).with_context(|| format!("Failed to load word list: {}", path.display()))?,
        None => WordList::default(),
    };
    let setup = BoardSetup::generate(&words, &mut rng_from_seed(seed)).context("Failed to deal board")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&setup)?);
    } else {
        print!("{}", format_setup(&setup));
    }
    Ok(())
}

fn format_setup(setup: &BoardSetup) -> String {
    let key = &setup.assignment;
    format!(
        "{}\n\nTeam A:   {}\nTeam B:   {}\nNeutral:  {}\nAssassin: {}\n",
        setup.board.render(&FxHashSet::default()),
        key.team_a_words.join(", "),
        key.team_b_words.join(", "),
        key.neutral_words.join(", "),
        key.assassin
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_setup_lists_key() {
        let setup = BoardSetup::generate(&WordList::default(), &mut rng_from_seed(Some(1))).unwrap();
        let text = format_setup(&setup);

        assert!(text.contains(&format!("Assassin: {}", setup.assignment.assassin)));
        for word in setup.board.words() {
            assert!(text.contains(word.as_str()));
        }
    }
}
