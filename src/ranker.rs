//! Ranking guesses by expected information gain.

use crate::entropy;
use crate::error::{Error, Result};
use crate::feedback::ScoringRule;
use crate::word::Word;
use rayon::prelude::*;
use std::collections::HashSet;

/// Result of analyzing a potential guess
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredWord {
    pub word: Word,
    pub entropy: f64,
    pub expected_remaining: f64,
    pub is_candidate: bool,
}

/// Score every word in `words` against `candidates`, highest entropy first.
///
/// Equal scores keep the relative order they had in `words`.
pub fn rank(words: &[Word], candidates: &[Word], rule: ScoringRule) -> Result<Vec<ScoredWord>> {
    if words.is_empty() {
        return Err(Error::invalid_input("cannot rank an empty guess list"));
    }
    if candidates.is_empty() {
        return Err(Error::invalid_input("cannot rank against an empty candidate set"));
    }

    let possible: HashSet<&Word> = candidates.iter().collect();
    let mut analyses: Vec<ScoredWord> = words
        .par_iter()
        .map(|word| {
            let entropy = entropy::score(word, candidates, rule);
            ScoredWord {
                word: *word,
                entropy,
                expected_remaining: entropy::expected_remaining(candidates.len(), entropy),
                is_candidate: possible.contains(word),
            }
        })
        .collect();

    // `sort_by` is stable, so ties stay in input order.
    analyses.sort_by(|a, b| b.entropy.total_cmp(&a.entropy));
    Ok(analyses)
}

/// The single highest-entropy word, ties broken by first occurrence in `words`.
pub fn best_single(words: &[Word], candidates: &[Word], rule: ScoringRule) -> Result<ScoredWord> {
    rank(words, candidates, rule)?
        .into_iter()
        .next()
        .ok_or_else(|| Error::invalid_input("cannot rank an empty guess list"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::word::words;

    #[test]
    fn rejects_empty_inputs() {
        let c = words(&["crane"]).unwrap();
        assert!(matches!(
            rank(&[], &c, ScoringRule::Reference),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            rank(&c, &[], ScoringRule::Reference),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn ties_keep_input_order() {
        // None of these share letters with the candidates, so every score is 0.
        let guesses = words(&["zzzzz", "yyyyy", "xxxxx", "wwwww"]).unwrap();
        let c = words(&["crane", "slate"]).unwrap();
        let ranked = rank(&guesses, &c, ScoringRule::Reference).unwrap();
        let order: Vec<Word> = ranked.iter().map(|s| s.word).collect();
        assert_eq!(order, guesses);

        let best = best_single(&guesses, &c, ScoringRule::Reference).unwrap();
        assert_eq!(best.word, "zzzzz");
    }

    #[test]
    fn flags_candidates() {
        let c = words(&["crane", "slate"]).unwrap();
        let guesses = words(&["crane", "zzzzz"]).unwrap();
        let ranked = rank(&guesses, &c, ScoringRule::Reference).unwrap();
        assert!(ranked[0].is_candidate);
        assert_eq!(ranked[0].word, "crane");
        assert!(!ranked[1].is_candidate);
    }
}
