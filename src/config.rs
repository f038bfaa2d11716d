//! Solver configuration and environment overrides.
//!
//! Recognised variables: `WORDLE_MAX_ATTEMPTS`, `WORDLE_OPENING`, `WORDLE_SCORING`,
//! `WORDLE_TRANSPORT_RETRIES`, and `RAYON_NUM_THREADS` for the scoring pool.

use crate::error::{Error, Result};
use crate::feedback::ScoringRule;
use crate::opening::OpeningStrategy;
use std::time::Duration;

/// Attempts allowed by the standard game.
pub const DEFAULT_MAX_ATTEMPTS: usize = 6;

/// Knobs for a solving session.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverConfig {
    pub max_attempts: usize,
    pub opening: OpeningStrategy,
    pub scoring_rule: ScoringRule,
    /// Extra attempts at the same round after a transport failure.
    pub transport_retries: u32,
    /// How often a cancellable run checks for cancellation while waiting on the oracle.
    pub poll_interval: Duration,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            opening: OpeningStrategy::default(),
            scoring_rule: ScoringRule::default(),
            transport_retries: 0,
            poll_interval: Duration::from_millis(20),
        }
    }
}

impl SolverConfig {
    /// Defaults overridden by any `WORDLE_*` variables that are set.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(v) = lookup("WORDLE_MAX_ATTEMPTS") {
            let n = v.trim().parse().map_err(|_| {
                Error::invalid_input(format!("WORDLE_MAX_ATTEMPTS={:?} is not a number", v))
            })?;
            config = config.with_max_attempts(n)?;
        }
        if let Some(v) = lookup("WORDLE_OPENING") {
            config.opening = v.trim().parse()?;
        }
        if let Some(v) = lookup("WORDLE_SCORING") {
            config.scoring_rule = v.trim().parse()?;
        }
        if let Some(v) = lookup("WORDLE_TRANSPORT_RETRIES") {
            config.transport_retries = v.trim().parse().map_err(|_| {
                Error::invalid_input(format!("WORDLE_TRANSPORT_RETRIES={:?} is not a number", v))
            })?;
        }
        Ok(config)
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Result<Self> {
        if max_attempts == 0 {
            return Err(Error::invalid_input("max attempts must be at least 1"));
        }
        self.max_attempts = max_attempts;
        Ok(self)
    }

    pub fn with_opening(mut self, opening: OpeningStrategy) -> Self {
        self.opening = opening;
        self
    }

    pub fn with_scoring_rule(mut self, rule: ScoringRule) -> Self {
        self.scoring_rule = rule;
        self
    }

    pub fn with_transport_retries(mut self, retries: u32) -> Self {
        self.transport_retries = retries;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

/// Read `RAYON_NUM_THREADS` and build the global scoring pool.
/// Tolerates an already-initialized pool. Returns the thread count in use.
pub fn init_rayon_threads() -> usize {
    let requested = std::env::var("RAYON_NUM_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0);
    if let Err(e) = rayon::ThreadPoolBuilder::new()
        .num_threads(requested)
        .build_global()
    {
        log::debug!("rayon pool already initialized: {}", e);
    }
    let threads = rayon::current_num_threads();
    log::info!("rayon threads: {}", threads);
    threads
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_env() {
        let config = SolverConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, SolverConfig::default());
        assert_eq!(config.max_attempts, 6);
    }

    #[test]
    fn reads_overrides() {
        let config = SolverConfig::from_lookup(lookup(&[
            ("WORDLE_MAX_ATTEMPTS", "8"),
            ("WORDLE_OPENING", "full"),
            ("WORDLE_SCORING", "canonical"),
            ("WORDLE_TRANSPORT_RETRIES", "3"),
        ]))
        .unwrap();
        assert_eq!(config.max_attempts, 8);
        assert_eq!(config.opening, OpeningStrategy::FullDictionary);
        assert_eq!(config.scoring_rule, ScoringRule::Canonical);
        assert_eq!(config.transport_retries, 3);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(SolverConfig::from_lookup(lookup(&[("WORDLE_MAX_ATTEMPTS", "0")])).is_err());
        assert!(SolverConfig::from_lookup(lookup(&[("WORDLE_MAX_ATTEMPTS", "six")])).is_err());
        assert!(SolverConfig::from_lookup(lookup(&[("WORDLE_SCORING", "fuzzy")])).is_err());
    }
}
