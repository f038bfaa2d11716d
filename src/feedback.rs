//! Feedback calculation for guesses.
//!
//! This module computes the per-position hit/present/miss pattern for a guess
//! against a target word, under either the reference or the canonical scoring rule.

use crate::error::{Error, Result};
use crate::word::Word;
use crate::WORD_LENGTH;

/// Feedback for a single letter position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feedback {
    /// Correct letter in correct position (green)
    Hit,
    /// Letter occurs elsewhere in the target (yellow)
    Present,
    /// Letter absent (gray)
    Miss,
}

impl Feedback {
    /// Convert to a character for display
    pub fn to_char(self) -> char {
        match self {
            Feedback::Hit => '🟩',
            Feedback::Present => '🟨',
            Feedback::Miss => '⬛',
        }
    }

    /// Parse from a character (g=green, y=yellow, b=black/gray)
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'g' | '2' => Some(Feedback::Hit),
            'y' | '1' => Some(Feedback::Present),
            'b' | 'x' | '0' => Some(Feedback::Miss),
            _ => None,
        }
    }

    /// Parse a color or result name as used by web front-ends and the checking endpoint.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "green" | "correct" | "hit" => Some(Feedback::Hit),
            "yellow" | "present" => Some(Feedback::Present),
            "black" | "gray" | "grey" | "absent" | "miss" => Some(Feedback::Miss),
            _ => None,
        }
    }
}

/// How repeated letters in a guess are credited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScoringRule {
    /// A non-hit letter is `Present` whenever the target contains it at all.
    /// Repeated guess letters can be credited more often than the target holds them.
    #[default]
    Reference,
    /// Hits reserve their letters first; presents consume what is left.
    Canonical,
}

impl std::str::FromStr for ScoringRule {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "reference" | "naive" => Ok(ScoringRule::Reference),
            "canonical" | "standard" => Ok(ScoringRule::Canonical),
            other => Err(Error::invalid_input(format!("unknown scoring rule {:?}", other))),
        }
    }
}

/// A complete feedback pattern for a 5-letter guess.
/// Encoded as a single u8 value (0-242).
/// Each position can be 0 (miss), 1 (present), or 2 (hit).
/// Pattern = p0 + 3*p1 + 9*p2 + 27*p3 + 81*p4
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FeedbackPattern(u8);

impl FeedbackPattern {
    /// The pattern indicating all hits (winning)
    pub const ALL_HIT: Self = Self(2 + 2 * 3 + 2 * 9 + 2 * 27 + 2 * 81); // 242

    /// The pattern indicating no letter matched at all
    pub const ALL_MISS: Self = Self(0);

    /// Total number of possible patterns (3^5)
    pub const NUM_PATTERNS: usize = 243;

    /// Create a new pattern from individual feedback values
    pub fn new(feedbacks: [Feedback; WORD_LENGTH]) -> Self {
        let mut pattern: u8 = 0;
        let mut multiplier: u8 = 1;
        for fb in feedbacks {
            let value = match fb {
                Feedback::Miss => 0,
                Feedback::Present => 1,
                Feedback::Hit => 2,
            };
            pattern += value * multiplier;
            multiplier *= 3;
        }
        Self(pattern)
    }

    /// Dense index in `0..NUM_PATTERNS`, for histogram buckets.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Calculate the feedback pattern for `guess` against `target`.
    pub fn calculate(guess: &Word, target: &Word, rule: ScoringRule) -> Self {
        match rule {
            ScoringRule::Reference => Self::calculate_reference(guess, target),
            ScoringRule::Canonical => Self::calculate_canonical(guess, target),
        }
    }

    fn calculate_reference(guess: &Word, target: &Word) -> Self {
        let guess_bytes = guess.as_bytes();
        let target_bytes = target.as_bytes();

        let mut feedback = [Feedback::Miss; WORD_LENGTH];

        for i in 0..WORD_LENGTH {
            if guess_bytes[i] == target_bytes[i] {
                feedback[i] = Feedback::Hit;
            }
        }

        for i in 0..WORD_LENGTH {
            if feedback[i] != Feedback::Hit && target.contains(guess_bytes[i]) {
                feedback[i] = Feedback::Present;
            }
        }

        Self::new(feedback)
    }

    fn calculate_canonical(guess: &Word, target: &Word) -> Self {
        let guess_bytes = guess.as_bytes();
        let target_bytes = target.as_bytes();

        let mut feedback = [Feedback::Miss; WORD_LENGTH];
        let mut target_remaining = [0u8; 26];

        for i in 0..WORD_LENGTH {
            if guess_bytes[i] == target_bytes[i] {
                feedback[i] = Feedback::Hit;
            } else {
                let idx = (target_bytes[i] - b'a') as usize;
                target_remaining[idx] += 1;
            }
        }

        for i in 0..WORD_LENGTH {
            if feedback[i] != Feedback::Hit {
                let idx = (guess_bytes[i] - b'a') as usize;
                if target_remaining[idx] > 0 {
                    feedback[i] = Feedback::Present;
                    target_remaining[idx] -= 1;
                }
            }
        }

        Self::new(feedback)
    }

    /// Convert pattern to array of feedbacks
    pub fn to_feedbacks(self) -> [Feedback; WORD_LENGTH] {
        let mut pattern = self.0;
        let mut feedbacks = [Feedback::Miss; WORD_LENGTH];
        for feedback in feedbacks.iter_mut() {
            *feedback = match pattern % 3 {
                0 => Feedback::Miss,
                1 => Feedback::Present,
                _ => Feedback::Hit,
            };
            pattern /= 3;
        }
        feedbacks
    }

    /// Check if this pattern represents a win (all hits)
    pub fn is_win(self) -> bool {
        self == Self::ALL_HIT
    }

    pub fn hits(self) -> usize {
        self.to_feedbacks()
            .iter()
            .filter(|&&f| f == Feedback::Hit)
            .count()
    }

    /// Parse a pattern from a string like "gybbb" or "21000", or from five
    /// whitespace/comma separated color names like "green yellow black black black".
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let named: Vec<&str> = s
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|t| !t.is_empty())
            .collect();
        let feedbacks: Option<Vec<Feedback>> = if named.len() == WORD_LENGTH {
            named
                .iter()
                .map(|n| {
                    let mut chars = n.chars();
                    match (chars.next(), chars.next()) {
                        (Some(c), None) => Feedback::from_char(c),
                        _ => Feedback::from_name(n),
                    }
                })
                .collect()
        } else if s.chars().count() == WORD_LENGTH {
            s.chars().map(Feedback::from_char).collect()
        } else {
            None
        };
        let feedbacks = feedbacks
            .ok_or_else(|| Error::invalid_input(format!("invalid feedback pattern {:?}", s)))?;
        let arr: [Feedback; WORD_LENGTH] = feedbacks
            .try_into()
            .map_err(|_| Error::invalid_input(format!("invalid feedback pattern {:?}", s)))?;
        Ok(Self::new(arr))
    }

    /// Display as emoji string
    pub fn to_emoji_string(self) -> String {
        self.to_feedbacks().iter().map(|f| f.to_char()).collect()
    }
}

impl From<[Feedback; WORD_LENGTH]> for FeedbackPattern {
    fn from(feedbacks: [Feedback; WORD_LENGTH]) -> Self {
        Self::new(feedbacks)
    }
}

impl std::fmt::Display for FeedbackPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_emoji_string())
    }
}

/// Score `guess` against `target`.
pub fn evaluate(guess: &Word, target: &Word, rule: ScoringRule) -> FeedbackPattern {
    FeedbackPattern::calculate(guess, target, rule)
}
