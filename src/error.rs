//! Error types surfaced by the engine and the solving loop.

use crate::oracle::OracleError;

/// Errors returned by the engine.
///
/// An empty candidate set is not an error: the solving loop reports it as
/// [`SessionState::Stuck`](crate::session::SessionState::Stuck).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A word, word list or pattern supplied by the caller is malformed.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The oracle refused or failed to score a guess.
    #[error("oracle failure: {0}")]
    Oracle(#[from] OracleError),

    /// The operation is not allowed in the session's current state.
    #[error("operation `{operation}` not allowed while session is {state}")]
    InvalidState {
        operation: &'static str,
        state: &'static str,
    },
}

impl Error {
    pub(crate) fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }

    /// Whether retrying the same round may succeed.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::Oracle(OracleError::Transport(_)))
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
