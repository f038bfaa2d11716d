//! Observations and candidate filtering.

use crate::feedback::{FeedbackPattern, ScoringRule};
use crate::word::Word;

/// One completed round: the word guessed and the feedback received for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Observation {
    pub guess: Word,
    pub pattern: FeedbackPattern,
}

impl Observation {
    pub fn new(guess: Word, pattern: FeedbackPattern) -> Self {
        Self { guess, pattern }
    }

    /// Whether this observation could have been produced if `target` were the answer.
    pub fn allows(&self, target: &Word, rule: ScoringRule) -> bool {
        FeedbackPattern::calculate(&self.guess, target, rule) == self.pattern
    }
}

/// Append-only record of a solving session's observations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    observations: Vec<Observation>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, observation: Observation) {
        self.observations.push(observation);
    }

    pub fn clear(&mut self) {
        self.observations.clear();
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn last(&self) -> Option<&Observation> {
        self.observations.last()
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Observation> {
        self.observations.iter()
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a Observation;
    type IntoIter = std::slice::Iter<'a, Observation>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Words of `dictionary` consistent with every observation, in dictionary order.
///
/// An empty result means the observations contradict each other (or the scoring rule
/// disagrees with whoever produced them).
pub fn filter(dictionary: &[Word], history: &[Observation], rule: ScoringRule) -> Vec<Word> {
    dictionary
        .iter()
        .filter(|word| history.iter().all(|obs| obs.allows(word, rule)))
        .copied()
        .collect()
}
