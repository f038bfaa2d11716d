//! The oracle boundary: whatever actually knows the target word.
//!
//! The engine never talks to a network itself. Callers implement [`Oracle`] on top of
//! their transport and can use [`parse_response`] to decode the checking endpoint's
//! JSON payload into a [`FeedbackPattern`].

use crate::feedback::{Feedback, FeedbackPattern, ScoringRule};
use crate::word::{Dictionary, Word};
use crate::WORD_LENGTH;
use serde::Deserialize;
use std::sync::Arc;

/// Why an oracle could not score a guess.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OracleError {
    /// The guess was refused, e.g. it is not in the oracle's own word list.
    #[error("guess '{word}' rejected: {reason}")]
    Validation { word: Word, reason: String },

    /// The exchange failed before a usable answer arrived. Safe to retry.
    #[error("transport failure: {0}")]
    Transport(String),
}

/// Something that scores guesses against a hidden target.
pub trait Oracle {
    fn submit_guess(&mut self, word: Word) -> Result<FeedbackPattern, OracleError>;
}

impl<F> Oracle for F
where
    F: FnMut(Word) -> Result<FeedbackPattern, OracleError>,
{
    fn submit_guess(&mut self, word: Word) -> Result<FeedbackPattern, OracleError> {
        self(word)
    }
}

/// An oracle that knows its target, for offline solving and benchmarking.
#[derive(Debug, Clone)]
pub struct LocalOracle {
    target: Word,
    rule: ScoringRule,
    accepted: Option<Arc<Dictionary>>,
}

impl LocalOracle {
    pub fn new(target: Word, rule: ScoringRule) -> Self {
        Self {
            target,
            rule,
            accepted: None,
        }
    }

    /// Reject guesses that are not in `dictionary`, like a hosted game would.
    pub fn with_accepted_words(mut self, dictionary: Arc<Dictionary>) -> Self {
        self.accepted = Some(dictionary);
        self
    }
}

impl Oracle for LocalOracle {
    fn submit_guess(&mut self, word: Word) -> Result<FeedbackPattern, OracleError> {
        if let Some(accepted) = &self.accepted {
            if !accepted.contains(&word) {
                return Err(OracleError::Validation {
                    word,
                    reason: "not in word list".to_string(),
                });
            }
        }
        Ok(FeedbackPattern::calculate(&word, &self.target, self.rule))
    }
}

/// One entry of the checking endpoint's response.
#[derive(Debug, Clone, Deserialize)]
pub struct SlotResult {
    pub slot: usize,
    pub guess: String,
    pub result: String,
}

/// Decode the checking endpoint's JSON reply for `guess`.
///
/// Expects `[{"slot": 0, "guess": "c", "result": "correct"}, ...]` with one entry per
/// position. Anything else is reported as a transport failure, so a malformed reply is
/// never folded into the history.
pub fn parse_response(guess: Word, body: &str) -> Result<FeedbackPattern, OracleError> {
    let slots: Vec<SlotResult> = serde_json::from_str(body)
        .map_err(|e| OracleError::Transport(format!("malformed response: {}", e)))?;
    pattern_from_slots(guess, &slots)
}

/// Assemble a pattern from decoded slot results.
pub fn pattern_from_slots(
    guess: Word,
    slots: &[SlotResult],
) -> Result<FeedbackPattern, OracleError> {
    if slots.len() != WORD_LENGTH {
        return Err(OracleError::Transport(format!(
            "expected {} slots, got {}",
            WORD_LENGTH,
            slots.len()
        )));
    }

    let mut feedback: [Option<Feedback>; WORD_LENGTH] = [None; WORD_LENGTH];
    for entry in slots {
        let slot = feedback.get_mut(entry.slot).ok_or_else(|| {
            OracleError::Transport(format!("slot {} out of range", entry.slot))
        })?;
        if slot.is_some() {
            return Err(OracleError::Transport(format!(
                "slot {} reported twice",
                entry.slot
            )));
        }
        let expected = guess.as_bytes()[entry.slot];
        if !entry.guess.eq_ignore_ascii_case(&(expected as char).to_string()) {
            return Err(OracleError::Transport(format!(
                "slot {} echoed {:?}, expected {:?}",
                entry.slot,
                entry.guess,
                expected as char
            )));
        }
        *slot = Some(Feedback::from_name(&entry.result).ok_or_else(|| {
            OracleError::Transport(format!("unknown result {:?}", entry.result))
        })?);
    }

    let mut out = [Feedback::Miss; WORD_LENGTH];
    for (dst, src) in out.iter_mut().zip(feedback) {
        // Five distinct in-range slots were checked above.
        *dst = src.unwrap_or(Feedback::Miss);
    }
    Ok(FeedbackPattern::new(out))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(s: &str) -> Word {
        Word::parse(s).unwrap()
    }

    #[test]
    fn parses_endpoint_reply() {
        let body = r#"[
            {"slot": 0, "guess": "c", "result": "absent"},
            {"slot": 1, "guess": "r", "result": "correct"},
            {"slot": 2, "guess": "a", "result": "present"},
            {"slot": 3, "guess": "n", "result": "absent"},
            {"slot": 4, "guess": "e", "result": "correct"}
        ]"#;
        let pattern = parse_response(word("crane"), body).unwrap();
        assert_eq!(
            pattern.to_feedbacks(),
            [
                Feedback::Miss,
                Feedback::Hit,
                Feedback::Present,
                Feedback::Miss,
                Feedback::Hit
            ]
        );
    }

    #[test]
    fn slots_may_arrive_out_of_order() {
        let body = r#"[
            {"slot": 4, "guess": "e", "result": "correct"},
            {"slot": 3, "guess": "n", "result": "correct"},
            {"slot": 2, "guess": "a", "result": "correct"},
            {"slot": 1, "guess": "r", "result": "correct"},
            {"slot": 0, "guess": "c", "result": "correct"}
        ]"#;
        assert!(parse_response(word("crane"), body).unwrap().is_win());
    }

    #[test]
    fn malformed_replies_are_transport_errors() {
        let g = word("crane");
        for body in [
            "null",
            "not json",
            r#"[{"slot": 0, "guess": "c", "result": "correct"}]"#,
            r#"[
                {"slot": 0, "guess": "c", "result": "correct"},
                {"slot": 0, "guess": "c", "result": "correct"},
                {"slot": 2, "guess": "a", "result": "correct"},
                {"slot": 3, "guess": "n", "result": "correct"},
                {"slot": 4, "guess": "e", "result": "correct"}
            ]"#,
            r#"[
                {"slot": 0, "guess": "x", "result": "correct"},
                {"slot": 1, "guess": "r", "result": "correct"},
                {"slot": 2, "guess": "a", "result": "correct"},
                {"slot": 3, "guess": "n", "result": "correct"},
                {"slot": 4, "guess": "e", "result": "correct"}
            ]"#,
            r#"[
                {"slot": 0, "guess": "c", "result": "purple"},
                {"slot": 1, "guess": "r", "result": "correct"},
                {"slot": 2, "guess": "a", "result": "correct"},
                {"slot": 3, "guess": "n", "result": "correct"},
                {"slot": 4, "guess": "e", "result": "correct"}
            ]"#,
        ] {
            assert!(
                matches!(parse_response(g, body), Err(OracleError::Transport(_))),
                "accepted {}",
                body
            );
        }
    }

    #[test]
    fn local_oracle_validates_guesses() {
        let dict = Arc::new(Dictionary::parse("crane\nslate").unwrap());
        let mut oracle =
            LocalOracle::new(word("slate"), ScoringRule::Reference).with_accepted_words(dict);
        assert!(oracle.submit_guess(word("slate")).unwrap().is_win());
        assert!(matches!(
            oracle.submit_guess(word("zzzzz")),
            Err(OracleError::Validation { .. })
        ));
    }
}
