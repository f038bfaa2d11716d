//! Shannon entropy of the feedback distribution a guess induces.
//!
//! The answer is assumed uniformly distributed over the candidate set, so a guess
//! that splits the candidates into many small pattern buckets carries more
//! information than one that leaves most of them sharing a pattern.

use crate::feedback::{FeedbackPattern, ScoringRule};
use crate::word::Word;

/// Count how many candidates fall into each feedback pattern for `guess`.
pub fn pattern_counts(
    guess: &Word,
    candidates: &[Word],
    rule: ScoringRule,
) -> [u32; FeedbackPattern::NUM_PATTERNS] {
    let mut counts = [0u32; FeedbackPattern::NUM_PATTERNS];
    for answer in candidates {
        let pattern = FeedbackPattern::calculate(guess, answer, rule);
        counts[pattern.index()] += 1;
    }
    counts
}

/// Entropy in bits of the pattern distribution `guess` induces over `candidates`.
///
/// Returns 0 for fewer than two candidates. Callers should not score against an empty set.
pub fn score(guess: &Word, candidates: &[Word], rule: ScoringRule) -> f64 {
    let n = candidates.len() as f64;
    if n <= 1.0 {
        return 0.0;
    }

    let mut entropy = 0.0;
    for &count in &pattern_counts(guess, candidates, rule) {
        if count > 0 {
            let p = count as f64 / n;
            entropy -= p * p.log2();
        }
    }

    entropy
}

/// Expected size of the candidate set after guessing a word with `entropy` bits.
pub fn expected_remaining(candidates: usize, entropy: f64) -> f64 {
    candidates as f64 / 2_f64.powf(entropy)
}
