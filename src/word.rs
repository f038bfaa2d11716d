//! Validated five-letter words and the shared dictionary.

use crate::error::{Error, Result};
use crate::WORD_LENGTH;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// A five-letter lowercase ASCII word.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Word([u8; WORD_LENGTH]);

impl Word {
    /// Parse a word, lowercasing ASCII input.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.len() != WORD_LENGTH {
            return Err(Error::invalid_input(format!(
                "word {:?} must be exactly {} letters",
                s, WORD_LENGTH
            )));
        }
        let mut bytes = [0u8; WORD_LENGTH];
        for (slot, b) in bytes.iter_mut().zip(s.bytes()) {
            if !b.is_ascii_alphabetic() {
                return Err(Error::invalid_input(format!(
                    "word {:?} contains a non-letter",
                    s
                )));
            }
            *slot = b.to_ascii_lowercase();
        }
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; WORD_LENGTH] {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        // Only ASCII letters are ever stored.
        std::str::from_utf8(&self.0).unwrap_or_default()
    }

    /// Whether `letter` occurs anywhere in the word.
    pub fn contains(&self, letter: u8) -> bool {
        self.0.contains(&letter)
    }

    pub fn to_uppercase(&self) -> String {
        self.as_str().to_ascii_uppercase()
    }
}

impl FromStr for Word {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Word({:?})", self.as_str())
    }
}

impl PartialEq<&str> for Word {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

/// An ordered list of unique words, never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dictionary {
    words: Vec<Word>,
}

impl Dictionary {
    /// Build a dictionary from raw strings. Later duplicates are dropped.
    pub fn from_words<I, S>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for raw in words {
            let word = Word::parse(raw.as_ref())?;
            if seen.insert(word) {
                out.push(word);
            } else {
                log::debug!("dropping duplicate dictionary word {}", word);
            }
        }
        if out.is_empty() {
            return Err(Error::invalid_input("dictionary is empty"));
        }
        Ok(Self { words: out })
    }

    /// Parse newline- or comma-separated text, skipping blank entries.
    pub fn parse(text: &str) -> Result<Self> {
        Self::from_words(
            text.split(|c| c == '\n' || c == ',')
                .map(str::trim)
                .filter(|s| !s.is_empty()),
        )
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn contains(&self, word: &Word) -> bool {
        self.words.contains(word)
    }
}

impl std::ops::Deref for Dictionary {
    type Target = [Word];

    fn deref(&self) -> &[Word] {
        &self.words
    }
}

/// Parse a list of string literals, for tests and fixtures.
pub fn words<S: AsRef<str>>(raw: &[S]) -> Result<Vec<Word>> {
    raw.iter().map(|s| Word::parse(s.as_ref())).collect()
}
