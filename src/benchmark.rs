//! Offline evaluation: solve every dictionary word and tally the guess counts.

use crate::config::SolverConfig;
use crate::error::Result;
use crate::oracle::LocalOracle;
use crate::session::{Session, SessionState};
use crate::word::{Dictionary, Word};
use rayon::prelude::*;
use std::sync::Arc;

/// Outcome counts for a full-dictionary run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    /// `(attempts, games solved in that many attempts)`, ascending.
    pub distribution: Vec<(usize, usize)>,
    /// Targets not solved within the attempt budget (exhausted or stuck).
    pub failures: Vec<Word>,
}

impl Report {
    pub fn solved(&self) -> usize {
        self.distribution.iter().map(|(_, c)| c).sum()
    }

    pub fn total(&self) -> usize {
        self.solved() + self.failures.len()
    }

    /// Mean attempts over solved games.
    pub fn average(&self) -> f64 {
        let solved = self.solved();
        if solved == 0 {
            return 0.0;
        }
        let guesses: usize = self.distribution.iter().map(|(g, c)| g * c).sum();
        guesses as f64 / solved as f64
    }
}

/// Play one game against `target` with a fresh session.
pub fn solve_for_target(
    dictionary: &Arc<Dictionary>,
    config: &SolverConfig,
    target: Word,
) -> Result<(SessionState, Session)> {
    let mut session = Session::new(Arc::clone(dictionary), config.clone());
    let mut oracle = LocalOracle::new(target, config.scoring_rule);
    let state = session.solve(&mut oracle)?;
    Ok((state, session))
}

/// Solve every word of `dictionary` in parallel.
pub fn run(dictionary: &Arc<Dictionary>, config: &SolverConfig) -> Result<Report> {
    let outcomes: Vec<(Word, SessionState)> = dictionary
        .par_iter()
        .map(|&target| {
            solve_for_target(dictionary, config, target).map(|(state, _)| (target, state))
        })
        .collect::<Result<_>>()?;

    let mut counts = vec![0usize; config.max_attempts + 1];
    let mut failures = Vec::new();
    for (target, state) in outcomes {
        match state {
            SessionState::Solved { attempts, .. } => counts[attempts] += 1,
            _ => failures.push(target),
        }
    }

    Ok(Report {
        distribution: counts
            .into_iter()
            .enumerate()
            .filter(|(_, count)| *count > 0)
            .collect(),
        failures,
    })
}
