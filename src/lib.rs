//! # Wordle Entropy
//!
//! An inference engine for five-letter word guessing games.
//!
//! Given a dictionary and the feedback received so far, the engine keeps the set of
//! words still consistent with every observation and recommends the guess whose
//! feedback is expected to carry the most information (maximum entropy).
//!
//! The scoring components ([`feedback`], [`filter`], [`entropy`], [`ranker`]) are pure
//! functions. [`session::Session`] runs the solving loop against an external
//! [`oracle::Oracle`].

pub mod benchmark;
pub mod config;
pub mod entropy;
pub mod error;
pub mod feedback;
pub mod filter;
pub mod logging;
pub mod opening;
pub mod oracle;
pub mod ranker;
pub mod session;
pub mod word;

pub use config::SolverConfig;
pub use error::{Error, Result};
pub use feedback::{evaluate, Feedback, FeedbackPattern, ScoringRule};
pub use filter::{filter, History, Observation};
pub use opening::{OpeningBook, OpeningStrategy};
pub use oracle::{LocalOracle, Oracle, OracleError};
pub use ranker::{best_single, rank, ScoredWord};
pub use session::{CancelToken, Session, SessionState};
pub use word::{Dictionary, Word};

/// Word length for Wordle
pub const WORD_LENGTH: usize = 5;

/// Load the embedded default dictionary
pub fn load_dictionary() -> Result<Dictionary> {
    Dictionary::parse(include_str!("../dictionary/dictionary.txt"))
}
