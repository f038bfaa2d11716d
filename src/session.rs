//! The solving loop.
//!
//! A [`Session`] owns the history of one game and walks the states
//! `Idle -> AwaitingFeedback -> (Solved | Exhausted | Stuck)`, folding each oracle
//! reply into the history before choosing the next guess. Scoring happens inline
//! between receiving a reply and proposing the next guess; it never suspends.
//!
//! Only a successfully decoded pattern extends the history. A rejected guess is
//! replaced without consuming an attempt, and a transport failure leaves the session
//! waiting on the same guess so the caller can retry.

use crate::config::SolverConfig;
use crate::error::{Error, Result};
use crate::feedback::FeedbackPattern;
use crate::filter::{self, History, Observation};
use crate::opening::OpeningBook;
use crate::oracle::{Oracle, OracleError};
use crate::ranker::{self, ScoredWord};
use crate::word::{Dictionary, Word};
use log::{debug, info, warn};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;

/// Where a session currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No guess proposed yet.
    Idle,
    /// `guess` is waiting for the oracle's verdict.
    AwaitingFeedback { guess: Word },
    /// The oracle reported all hits for `word`.
    Solved { word: Word, attempts: usize },
    /// The attempt budget ran out without a win.
    Exhausted { attempts: usize },
    /// No dictionary word is consistent with the observations, or every
    /// remaining candidate was rejected by the oracle.
    Stuck { attempts: usize },
    /// The caller gave up while a guess was pending.
    Cancelled { attempts: usize },
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::AwaitingFeedback { .. } => "awaiting feedback",
            SessionState::Solved { .. } => "solved",
            SessionState::Exhausted { .. } => "exhausted",
            SessionState::Stuck { .. } => "stuck",
            SessionState::Cancelled { .. } => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(
            self,
            SessionState::Idle | SessionState::AwaitingFeedback { .. }
        )
    }

    pub fn is_solved(&self) -> bool {
        matches!(self, SessionState::Solved { .. })
    }
}

/// Shared flag used to abandon a cancellable run.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// One game against one hidden target.
#[derive(Debug, Clone)]
pub struct Session {
    dictionary: Arc<Dictionary>,
    book: OpeningBook,
    config: SolverConfig,
    history: History,
    candidates: Vec<Word>,
    rejected: HashSet<Word>,
    opening: Option<Vec<Word>>,
    state: SessionState,
}

impl Session {
    pub fn new(dictionary: Arc<Dictionary>, config: SolverConfig) -> Self {
        Self {
            candidates: dictionary.to_vec(),
            dictionary,
            book: OpeningBook::default(),
            config,
            history: History::new(),
            rejected: HashSet::new(),
            opening: None,
            state: SessionState::Idle,
        }
    }

    pub fn with_opening_book(mut self, book: OpeningBook) -> Self {
        self.book = book;
        self.opening = None;
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn candidates(&self) -> &[Word] {
        &self.candidates
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn attempts(&self) -> usize {
        self.history.len()
    }

    /// The guess waiting on the oracle, if any.
    pub fn pending_guess(&self) -> Option<Word> {
        match self.state {
            SessionState::AwaitingFeedback { guess } => Some(guess),
            _ => None,
        }
    }

    fn invalid_state(&self, operation: &'static str) -> Error {
        Error::InvalidState {
            operation,
            state: self.state.name(),
        }
    }

    /// Pick the opening guess and start waiting for feedback.
    pub fn start(&mut self) -> Result<Word> {
        if self.state != SessionState::Idle {
            return Err(self.invalid_state("start"));
        }
        match self.next_guess()? {
            Some(guess) => {
                debug!("opening with {}", guess);
                self.state = SessionState::AwaitingFeedback { guess };
                Ok(guess)
            }
            None => Err(Error::invalid_input("no usable opening guess")),
        }
    }

    /// Replace the pending guess with one chosen by the caller.
    pub fn choose_guess(&mut self, guess: Word) -> Result<()> {
        match self.state {
            SessionState::Idle | SessionState::AwaitingFeedback { .. } => {
                self.state = SessionState::AwaitingFeedback { guess };
                Ok(())
            }
            _ => Err(self.invalid_state("choose_guess")),
        }
    }

    /// Record the oracle's pattern for the pending guess and move on.
    pub fn record_feedback(&mut self, pattern: FeedbackPattern) -> Result<SessionState> {
        let guess = self
            .pending_guess()
            .ok_or_else(|| self.invalid_state("record_feedback"))?;

        self.history.push(Observation::new(guess, pattern));
        self.candidates = filter::filter(
            &self.dictionary,
            self.history.observations(),
            self.config.scoring_rule,
        );
        let attempts = self.history.len();
        debug!(
            "attempt {}: {} {} -> {} candidates",
            attempts,
            guess,
            pattern,
            self.candidates.len()
        );

        self.state = if pattern.is_win() {
            SessionState::Solved {
                word: guess,
                attempts,
            }
        } else if self.candidates.is_empty() {
            SessionState::Stuck { attempts }
        } else if attempts >= self.config.max_attempts {
            SessionState::Exhausted { attempts }
        } else {
            match self.next_guess()? {
                Some(next) => SessionState::AwaitingFeedback { guess: next },
                None => SessionState::Stuck { attempts },
            }
        };
        self.log_terminal();
        Ok(self.state)
    }

    /// Play `guess` (replacing any pending proposal) and record its pattern in one step.
    pub fn observe(&mut self, guess: Word, pattern: FeedbackPattern) -> Result<SessionState> {
        self.choose_guess(guess)?;
        self.record_feedback(pattern)
    }

    /// The oracle refused the pending guess: pick another without using an attempt.
    pub fn reject_guess(&mut self) -> Result<SessionState> {
        let guess = self
            .pending_guess()
            .ok_or_else(|| self.invalid_state("reject_guess"))?;
        self.rejected.insert(guess);
        self.state = match self.next_guess()? {
            Some(next) => {
                debug!("{} rejected, trying {}", guess, next);
                SessionState::AwaitingFeedback { guess: next }
            }
            None => SessionState::Stuck {
                attempts: self.history.len(),
            },
        };
        self.log_terminal();
        Ok(self.state)
    }

    /// Fold an oracle reply into the session.
    ///
    /// Transport failures are returned as errors and leave the session untouched.
    pub fn handle_reply(
        &mut self,
        reply: Result<FeedbackPattern, OracleError>,
    ) -> Result<SessionState> {
        match reply {
            Ok(pattern) => self.record_feedback(pattern),
            Err(OracleError::Validation { word, reason }) => {
                warn!("oracle rejected {}: {}", word, reason);
                self.reject_guess()
            }
            Err(e) => {
                warn!("oracle unavailable: {}", e);
                Err(e.into())
            }
        }
    }

    /// Abandon the session. History is left as it is.
    pub fn cancel(&mut self) {
        if !self.state.is_terminal() {
            info!("session cancelled after {} attempts", self.history.len());
            self.state = SessionState::Cancelled {
                attempts: self.history.len(),
            };
        }
    }

    /// Forget all observations and return to `Idle`.
    pub fn reset(&mut self) {
        self.history.clear();
        self.candidates = self.dictionary.to_vec();
        self.rejected.clear();
        self.state = SessionState::Idle;
    }

    /// Remaining candidates that may still be guessed, ranked against the candidate set.
    pub fn ranked_candidates(&self) -> Result<Vec<ScoredWord>> {
        let pool = self.guessable();
        ranker::rank(&pool, &self.candidates, self.config.scoring_rule)
    }

    fn guessable(&self) -> Vec<Word> {
        self.candidates
            .iter()
            .filter(|w| !self.rejected.contains(*w))
            .copied()
            .collect()
    }

    fn next_guess(&mut self) -> Result<Option<Word>> {
        if self.history.is_empty() {
            if self.opening.is_none() {
                self.opening = Some(self.config.opening.suggestions(
                    &self.book,
                    &self.dictionary,
                    self.config.scoring_rule,
                )?);
            }
            let opening = self
                .opening
                .iter()
                .flatten()
                .find(|w| !self.rejected.contains(*w));
            if let Some(&word) = opening {
                return Ok(Some(word));
            }
        }

        let pool = self.guessable();
        match pool.len() {
            0 => Ok(None),
            1 => Ok(Some(pool[0])),
            _ => {
                let best = ranker::best_single(&pool, &self.candidates, self.config.scoring_rule)?;
                debug!(
                    "best guess {} ({:.3} bits, {:.1} expected remaining)",
                    best.word, best.entropy, best.expected_remaining
                );
                Ok(Some(best.word))
            }
        }
    }

    fn log_terminal(&self) {
        match self.state {
            SessionState::Solved { word, attempts } => {
                info!("solved: {} in {} attempts", word, attempts)
            }
            SessionState::Exhausted { attempts } => {
                info!("no solution within {} attempts", attempts)
            }
            SessionState::Stuck { attempts } => {
                info!("no consistent candidates after {} attempts", attempts)
            }
            _ => {}
        }
    }

    fn apply_reply(
        &mut self,
        reply: Result<FeedbackPattern, OracleError>,
        failures: &mut u32,
    ) -> Result<()> {
        match reply {
            Err(OracleError::Transport(msg)) if *failures < self.config.transport_retries => {
                *failures += 1;
                warn!(
                    "transport failure ({}/{}), retrying: {}",
                    failures, self.config.transport_retries, msg
                );
                Ok(())
            }
            reply => {
                *failures = 0;
                self.handle_reply(reply).map(|_| ())
            }
        }
    }

    /// Drive the session to a terminal state, calling `oracle` in the current thread.
    pub fn solve<O: Oracle + ?Sized>(&mut self, oracle: &mut O) -> Result<SessionState> {
        if self.state == SessionState::Idle {
            self.start()?;
        }
        let mut failures = 0;
        while let SessionState::AwaitingFeedback { guess } = self.state {
            let reply = oracle.submit_guess(guess);
            self.apply_reply(reply, &mut failures)?;
        }
        Ok(self.state)
    }

    /// Like [`solve`](Self::solve), but the oracle runs on its own thread so that
    /// `cancel` can end the session while a guess is still in flight.
    ///
    /// On cancellation the pending oracle call is abandoned, not awaited.
    pub fn run_cancellable<O>(&mut self, oracle: O, cancel: &CancelToken) -> Result<SessionState>
    where
        O: Oracle + Send + 'static,
    {
        if self.state == SessionState::Idle {
            self.start()?;
        }

        let (request_tx, request_rx) = mpsc::channel::<Word>();
        let (reply_tx, reply_rx) = mpsc::channel();
        let worker = thread::spawn(move || {
            let mut oracle = oracle;
            for guess in request_rx {
                if reply_tx.send(oracle.submit_guess(guess)).is_err() {
                    break;
                }
            }
        });

        let mut failures = 0;
        while let SessionState::AwaitingFeedback { guess } = self.state {
            if cancel.is_cancelled() {
                self.cancel();
                break;
            }
            request_tx
                .send(guess)
                .map_err(|_| OracleError::Transport("oracle worker stopped".to_string()))?;
            let reply = loop {
                if cancel.is_cancelled() {
                    self.cancel();
                    return Ok(self.state);
                }
                match reply_rx.recv_timeout(self.config.poll_interval) {
                    Ok(reply) => break reply,
                    Err(RecvTimeoutError::Timeout) => continue,
                    Err(RecvTimeoutError::Disconnected) => {
                        return Err(
                            OracleError::Transport("oracle worker stopped".to_string()).into()
                        );
                    }
                }
            };
            self.apply_reply(reply, &mut failures)?;
        }

        drop(request_tx);
        if worker.join().is_err() {
            warn!("oracle worker panicked");
        }
        Ok(self.state)
    }
}
