use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use wordle_entropy::entropy;
use wordle_entropy::{
    evaluate, CancelToken, Dictionary, Error, FeedbackPattern, LocalOracle, OpeningBook,
    OpeningStrategy, Oracle, OracleError, ScoringRule, Session, SessionState, SolverConfig, Word,
};

const RULE: ScoringRule = ScoringRule::Reference;

fn w(s: &str) -> Word {
    Word::parse(s).unwrap()
}

fn dict(words: &[&str]) -> Arc<Dictionary> {
    Arc::new(Dictionary::from_words(words).unwrap())
}

#[test]
fn test_single_candidate_is_guessed_next() {
    let mut session = Session::new(dict(&["crane", "slate", "adieu"]), SolverConfig::default());
    let pattern = evaluate(&w("crane"), &w("slate"), RULE);
    let state = session.observe(w("crane"), pattern).unwrap();

    assert_eq!(session.candidates(), &[w("slate")]);
    assert_eq!(
        state,
        SessionState::AwaitingFeedback { guess: w("slate") }
    );
    assert_eq!(entropy::score(&w("slate"), session.candidates(), RULE), 0.0);
}

#[test]
fn test_exhausted_after_max_attempts() {
    let mut session = Session::new(dict(&["crane", "slate", "adieu"]), SolverConfig::default());
    let target = w("crane");
    let guesses = ["quick", "jumpy", "fjord", "vowel", "blimp", "glyph"];
    for (i, guess) in guesses.iter().enumerate() {
        let guess = w(guess);
        let state = session.observe(guess, evaluate(&guess, &target, RULE)).unwrap();
        if i + 1 < guesses.len() {
            assert!(matches!(state, SessionState::AwaitingFeedback { .. }));
        } else {
            assert_eq!(state, SessionState::Exhausted { attempts: 6 });
        }
    }
    assert_eq!(session.history().len(), 6);
    assert!(session.observe(target, FeedbackPattern::ALL_HIT).is_err());
}

#[test]
fn test_attempt_budget_is_configurable() {
    let config = SolverConfig::default().with_max_attempts(2).unwrap();
    let mut session = Session::new(dict(&["crane", "slate", "adieu"]), config);
    let target = w("crane");
    for guess in ["quick", "jumpy"] {
        let guess = w(guess);
        session
            .observe(guess, evaluate(&guess, &target, RULE))
            .unwrap();
    }
    assert_eq!(session.state(), SessionState::Exhausted { attempts: 2 });
    assert!(SolverConfig::default().with_max_attempts(0).is_err());
}

#[test]
fn test_contradiction_is_stuck() {
    let mut session = Session::new(dict(&["crane", "slate"]), SolverConfig::default());
    let state = session
        .observe(w("crane"), FeedbackPattern::ALL_MISS)
        .unwrap();
    assert_eq!(state, SessionState::Stuck { attempts: 1 });
    assert!(session.candidates().is_empty());
}

#[test]
fn test_rejected_guess_is_replaced() {
    let dictionary = dict(&["crane", "slate", "adieu", "trace"]);
    let accepted = dict(&["slate", "adieu", "trace"]);
    let mut session = Session::new(dictionary, SolverConfig::default());
    let mut oracle = LocalOracle::new(w("trace"), RULE).with_accepted_words(accepted);

    let state = session.solve(&mut oracle).unwrap();

    assert!(state.is_solved());
    assert_eq!(session.history().observations()[0].guess, w("slate"));
    assert!(session.history().iter().all(|o| o.guess != w("crane")));
}

#[test]
fn test_everything_rejected_is_stuck() {
    let mut session = Session::new(dict(&["crane", "slate"]), SolverConfig::default());
    let mut oracle = LocalOracle::new(w("crane"), RULE).with_accepted_words(dict(&["fuzzy"]));
    let state = session.solve(&mut oracle).unwrap();
    assert_eq!(state, SessionState::Stuck { attempts: 0 });
    assert!(session.history().is_empty());
}

#[test]
fn test_transport_failures_are_retried() {
    let target = w("slate");
    let mut remaining_failures = 2;
    let mut oracle = |guess: Word| {
        if remaining_failures > 0 {
            remaining_failures -= 1;
            return Err(OracleError::Transport("connection reset".to_string()));
        }
        Ok(evaluate(&guess, &target, RULE))
    };

    let config = SolverConfig::default().with_transport_retries(2);
    let mut session = Session::new(dict(&["crane", "slate", "adieu"]), config);
    assert!(session.solve(&mut oracle).unwrap().is_solved());
}

#[test]
fn test_transport_failure_surfaces_and_resumes() {
    let mut session = Session::new(dict(&["crane", "slate", "adieu"]), SolverConfig::default());
    let mut broken = |_guess: Word| -> Result<FeedbackPattern, OracleError> {
        Err(OracleError::Transport("timeout".to_string()))
    };

    let err = session.solve(&mut broken).unwrap_err();
    assert!(matches!(err, Error::Oracle(OracleError::Transport(_))));
    assert!(err.is_recoverable());
    assert!(session.history().is_empty());
    assert_eq!(session.pending_guess(), Some(w("crane")));

    let mut oracle = LocalOracle::new(w("adieu"), RULE);
    assert_eq!(
        session.solve(&mut oracle).unwrap(),
        SessionState::Solved {
            word: w("adieu"),
            attempts: 2
        }
    );
}

#[test]
fn test_cancel_while_awaiting_feedback() {
    let mut session = Session::new(dict(&["crane", "slate", "adieu"]), SolverConfig::default());
    let stalled = |_guess: Word| -> Result<FeedbackPattern, OracleError> {
        thread::sleep(Duration::from_secs(3600));
        Ok(FeedbackPattern::ALL_HIT)
    };

    let cancel = CancelToken::new();
    let trigger = cancel.clone();
    thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        trigger.cancel();
    });

    let start = Instant::now();
    let state = session.run_cancellable(stalled, &cancel).unwrap();

    assert_eq!(state, SessionState::Cancelled { attempts: 0 });
    assert!(start.elapsed() < Duration::from_secs(10));
    assert!(session.history().is_empty());
}

#[test]
fn test_cancel_before_run() {
    let mut session = Session::new(dict(&["crane", "slate"]), SolverConfig::default());
    let cancel = CancelToken::new();
    cancel.cancel();
    let state = session
        .run_cancellable(LocalOracle::new(w("slate"), RULE), &cancel)
        .unwrap();
    assert_eq!(state, SessionState::Cancelled { attempts: 0 });
}

#[test]
fn test_run_cancellable_solves() {
    let mut session = Session::new(dict(&["crane", "slate", "adieu"]), SolverConfig::default());
    let state = session
        .run_cancellable(LocalOracle::new(w("slate"), RULE), &CancelToken::new())
        .unwrap();
    assert_eq!(
        state,
        SessionState::Solved {
            word: w("slate"),
            attempts: 2
        }
    );
}

#[test]
fn test_opening_strategies() {
    let dictionary = dict(&["crane", "slate", "adieu", "trace", "fuzzy"]);
    let book = OpeningBook::new(vec![w("fuzzy"), w("slate")]).unwrap();

    let mut session = Session::new(dictionary.clone(), SolverConfig::default())
        .with_opening_book(book.clone());
    assert_eq!(session.start().unwrap(), w("fuzzy"));

    let config = SolverConfig::default().with_opening(OpeningStrategy::RankBook);
    let mut session = Session::new(dictionary.clone(), config).with_opening_book(book);
    assert_eq!(session.start().unwrap(), w("slate"));

    let config = SolverConfig::default().with_opening(OpeningStrategy::FullDictionary);
    let mut session = Session::new(dictionary.clone(), config);
    let opening = session.start().unwrap();
    let best = wordle_entropy::best_single(&dictionary, &dictionary, RULE).unwrap();
    assert_eq!(opening, best.word);
}

#[test]
fn test_ranked_candidates_skip_rejected_words() {
    let dictionary = dict(&[
        "crane", "slate", "trace", "crate", "raise", "arise", "stare", "roast", "toast", "beast",
    ]);
    let mut session = Session::new(dictionary, SolverConfig::default());
    session.choose_guess(w("fuzzy")).unwrap();
    let state = session
        .record_feedback(evaluate(&w("fuzzy"), &w("trace"), RULE))
        .unwrap();
    assert_eq!(session.history().len(), 1);

    let rejected = match state {
        SessionState::AwaitingFeedback { guess } => guess,
        other => panic!("unexpected state {:?}", other),
    };
    session.reject_guess().unwrap();

    let ranked = session.ranked_candidates().unwrap();
    assert_eq!(ranked.len(), session.candidates().len() - 1);
    assert!(ranked.iter().all(|s| s.word != rejected));
    for pair in ranked.windows(2) {
        assert!(pair[0].entropy >= pair[1].entropy);
    }
}

#[test]
fn test_run_cancellable_handles_rejection_and_transport_failure() {
    let dictionary = dict(&["crane", "slate", "adieu", "trace"]);
    let mut local = LocalOracle::new(w("trace"), RULE)
        .with_accepted_words(dict(&["slate", "adieu", "trace"]));
    let mut failed = false;
    let oracle = move |guess: Word| {
        if !failed {
            failed = true;
            return Err(OracleError::Transport("connection reset".to_string()));
        }
        local.submit_guess(guess)
    };

    let config = SolverConfig::default().with_transport_retries(1);
    let mut session = Session::new(dictionary, config);
    let state = session.run_cancellable(oracle, &CancelToken::new()).unwrap();

    assert_eq!(
        state,
        SessionState::Solved {
            word: w("trace"),
            attempts: 2
        }
    );
    assert_eq!(session.history().observations()[0].guess, w("slate"));
}
