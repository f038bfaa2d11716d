//! Opening guesses used before any feedback exists.

use crate::error::{Error, Result};
use crate::feedback::ScoringRule;
use crate::ranker;
use crate::word::{Dictionary, Word};

/// Opening words that score well against common dictionaries.
pub const DEFAULT_OPENING_WORDS: [&str; 8] = [
    "crane", "slate", "adieu", "raise", "trace", "crate", "stare", "irate",
];

/// A fixed, ordered list of recommended first guesses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpeningBook {
    words: Vec<Word>,
}

impl Default for OpeningBook {
    fn default() -> Self {
        Self {
            words: DEFAULT_OPENING_WORDS
                .iter()
                .filter_map(|w| Word::parse(w).ok())
                .collect(),
        }
    }
}

impl OpeningBook {
    pub fn new(words: Vec<Word>) -> Result<Self> {
        if words.is_empty() {
            return Err(Error::invalid_input("opening book is empty"));
        }
        Ok(Self { words })
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }
}

/// How the first guess of a session is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpeningStrategy {
    /// Take the opening book in its stored order without scoring.
    #[default]
    StaticBook,
    /// Rank the opening book against the full dictionary.
    RankBook,
    /// Rank every dictionary word against the full dictionary.
    FullDictionary,
}

impl std::str::FromStr for OpeningStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "static" | "static-book" | "book" => Ok(OpeningStrategy::StaticBook),
            "rank-book" | "ranked" => Ok(OpeningStrategy::RankBook),
            "full" | "full-dictionary" | "dictionary" => Ok(OpeningStrategy::FullDictionary),
            other => Err(Error::invalid_input(format!(
                "unknown opening strategy {:?}",
                other
            ))),
        }
    }
}

impl OpeningStrategy {
    /// Opening guesses, best first.
    pub fn suggestions(
        self,
        book: &OpeningBook,
        dictionary: &Dictionary,
        rule: ScoringRule,
    ) -> Result<Vec<Word>> {
        let ranked = match self {
            OpeningStrategy::StaticBook => return Ok(book.words().to_vec()),
            OpeningStrategy::RankBook => ranker::rank(book.words(), dictionary, rule)?,
            OpeningStrategy::FullDictionary => ranker::rank(dictionary, dictionary, rule)?,
        };
        Ok(ranked.into_iter().map(|s| s.word).collect())
    }
}
