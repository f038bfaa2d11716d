//! Wordle Entropy CLI
//!
//! Interactive command-line interface for the entropy-based solver.

use clap::{ArgEnum, Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use wordle_entropy::{
    benchmark, config, load_dictionary, logging, rank, CancelToken, Dictionary, FeedbackPattern,
    LocalOracle, OpeningBook, OpeningStrategy, ScoredWord, ScoringRule, Session, SessionState,
    SolverConfig, Word,
};

const BANNER_TEXT: &str = include_str!("text/banner.txt");

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Read the dictionary from a newline- or comma-separated file instead of the built-in list.
    #[clap(long)]
    dictionary: Option<PathBuf>,

    /// How the first guess is chosen. Defaults to `WORDLE_OPENING` or the static book.
    #[clap(long, arg_enum)]
    opening: Option<Opening>,

    /// How repeated letters are scored. Defaults to `WORDLE_SCORING` or the reference rule.
    #[clap(long, arg_enum)]
    scoring: Option<Scoring>,

    /// Attempts allowed per game. Defaults to `WORDLE_MAX_ATTEMPTS` or 6.
    #[clap(long)]
    max_attempts: Option<usize>,

    /// Enable debug logging.
    #[clap(short, long)]
    debug: bool,

    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the best opening guesses.
    Suggest {
        #[clap(short = 'n', long, default_value = "5")]
        top: usize,
    },
    /// Solve for a known target word.
    Solve {
        target: String,

        /// Give up if the game is not finished after this many milliseconds.
        #[clap(long)]
        timeout_ms: Option<u64>,
    },
    /// Solve every dictionary word and report the guess distribution.
    Bench,
}

#[derive(ArgEnum, Debug, Clone, Copy)]
enum Opening {
    /// Use the opening book as-is.
    Book,
    /// Rank the opening book against the dictionary.
    RankBook,
    /// Rank the whole dictionary (slow).
    Full,
}

#[derive(ArgEnum, Debug, Clone, Copy)]
enum Scoring {
    /// A letter is present whenever the target contains it.
    Reference,
    /// Repeated letters are only credited as often as the target holds them.
    Canonical,
}

struct Spinner {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Spinner {
    fn new(message: &'static str) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let running_clone = running.clone();
        let handle = thread::spawn(move || {
            let frames = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
            let mut i = 0;
            while running_clone.load(Ordering::Relaxed) {
                print!("\r{} {}", frames[i % frames.len()], message);
                let _ = io::stdout().flush();
                thread::sleep(Duration::from_millis(80));
                i += 1;
            }
            print!("\r{}\r", " ".repeat(message.len() + 3));
            let _ = io::stdout().flush();
        });
        Self {
            running,
            handle: Some(handle),
        }
    }

    fn stop(mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
    }
}

fn print_banner() {
    for line in BANNER_TEXT.lines().take(6) {
        println!("{}", line);
    }
}

fn print_help() {
    println!("{}", BANNER_TEXT);
}

fn print_ranking(title: &str, ranked: &[ScoredWord]) {
    println!();
    println!("{} ({}):", title, ranked.len());
    println!(
        "{:>4} {:>8} {:>8} {:>12} Possible?",
        "#", "Word", "Entropy", "Exp. Remain"
    );
    println!("{}", "-".repeat(50));
    for (i, analysis) in ranked.iter().enumerate() {
        println!(
            "{:>4} {:>8} {:>8.3} {:>12.1} {}",
            i + 1,
            analysis.word.to_uppercase(),
            analysis.entropy,
            analysis.expected_remaining,
            if analysis.is_candidate { "✓" } else { "" }
        );
    }
    println!();
}

/// Opening suggestions with scores, regardless of how the session itself opens.
fn opening_ranking(
    dictionary: &Dictionary,
    config: &SolverConfig,
) -> wordle_entropy::Result<Vec<ScoredWord>> {
    match config.opening {
        OpeningStrategy::FullDictionary => rank(dictionary, dictionary, config.scoring_rule),
        _ => rank(OpeningBook::default().words(), dictionary, config.scoring_rule),
    }
}

fn top_suggestions(session: &Session, n: usize) -> wordle_entropy::Result<Vec<ScoredWord>> {
    let mut ranked = if session.history().is_empty() {
        opening_ranking(session.dictionary(), session.config())?
    } else {
        session.ranked_candidates()?
    };
    ranked.truncate(n);
    Ok(ranked)
}

fn print_game(session: &Session) {
    for (i, obs) in session.history().iter().enumerate() {
        println!(
            "Guess {}: {} → {}",
            i + 1,
            obs.guess.to_uppercase(),
            obs.pattern
        );
    }
    println!();
    match session.state() {
        SessionState::Solved { attempts, .. } => println!("✓ Solved in {} guesses!", attempts),
        SessionState::Exhausted { attempts } => {
            println!("✗ Failed to solve within {} guesses.", attempts)
        }
        SessionState::Stuck { .. } => println!("✗ No dictionary word matches the feedback."),
        SessionState::Cancelled { .. } => println!("✗ Gave up before finishing."),
        _ => {}
    }
}

fn solve_target(
    dictionary: &Arc<Dictionary>,
    config: &SolverConfig,
    target: Word,
    timeout: Option<Duration>,
) -> wordle_entropy::Result<Session> {
    let mut session = Session::new(Arc::clone(dictionary), config.clone());
    let oracle = LocalOracle::new(target, config.scoring_rule);
    let cancel = CancelToken::new();
    if let Some(timeout) = timeout {
        let watchdog = cancel.clone();
        thread::spawn(move || {
            thread::sleep(timeout);
            watchdog.cancel();
        });
    }
    session.run_cancellable(oracle, &cancel)?;
    Ok(session)
}

fn run_bench(dictionary: &Arc<Dictionary>, config: &SolverConfig) -> wordle_entropy::Result<()> {
    println!();
    println!("Running benchmark on all {} words...", dictionary.len());

    let spinner = Spinner::new("Computing...");
    let start = std::time::Instant::now();
    let report = benchmark::run(dictionary, config);
    let elapsed = start.elapsed();
    spinner.stop();
    let report = report?;

    let total = report.total().max(1);
    println!("Results:");
    println!("{}", "=".repeat(40));
    println!();
    println!("Guess distribution:");
    for (guesses, count) in &report.distribution {
        let pct = *count as f64 / total as f64 * 100.0;
        let bar = "█".repeat((*count * 40 / total).max(1));
        println!("  {} guesses: {:>5} ({:>5.1}%) {}", guesses, count, pct, bar);
    }
    println!();
    println!("Average guesses: {:.3}", report.average());
    println!("Total words: {}", report.total());
    println!("Time elapsed: {:.2?}", elapsed);

    if report.failures.is_empty() {
        println!("✓ All words solved within {} guesses!", config.max_attempts);
    } else {
        println!(
            "Words not solved in {} guesses: {}",
            config.max_attempts,
            report.failures.len()
        );
    }
    println!();
    Ok(())
}

fn run_interactive(dictionary: Arc<Dictionary>, config: SolverConfig) {
    print_banner();

    println!("Loaded {} words.", dictionary.len());
    println!();

    let mut session = Session::new(Arc::clone(&dictionary), config.clone());
    println!("Type 'help' for commands or 'suggest' to get started.");
    println!();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("> ");
        let _ = stdout.flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                eprintln!("Failed to read input: {}", e);
                break;
            }
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.is_empty() {
            continue;
        }

        match parts[0].to_lowercase().as_str() {
            "help" | "h" | "?" => {
                print_help();
            }
            "quit" | "exit" | "q" => {
                println!("Goodbye!");
                break;
            }
            "suggest" | "s" | "best" => match top_suggestions(&session, 1) {
                Ok(top) if !top.is_empty() => {
                    let analysis = &top[0];
                    println!();
                    println!("Best guess: {} ", analysis.word.to_uppercase());
                    println!("  Entropy: {:.3} bits", analysis.entropy);
                    println!(
                        "  Expected remaining: {:.1} words",
                        analysis.expected_remaining
                    );
                    if analysis.is_candidate {
                        println!("  ✓ This word is a possible answer");
                    } else {
                        println!("  ✗ This word is NOT a possible answer");
                    }
                    println!();
                    println!("Remaining possibilities: {}", session.candidates().len());
                    println!();
                }
                _ => {
                    println!("No possible words remaining. Use 'reset' to start over.");
                }
            },
            "top" | "t" => {
                let n: usize = parts.get(1).and_then(|s| s.parse().ok()).unwrap_or(5);
                match top_suggestions(&session, n) {
                    Ok(top) if !top.is_empty() => print_ranking("Top guesses", &top),
                    _ => println!("No possible words remaining."),
                }
            }
            "feedback" | "f" | "fb" => {
                if parts.len() < 3 {
                    println!("Usage: feedback <word> <pattern>");
                    println!("Example: feedback crane gybbb");
                    continue;
                }

                let word = match Word::parse(parts[1]) {
                    Ok(word) => word,
                    Err(e) => {
                        println!("{}", e);
                        continue;
                    }
                };
                let pattern_str = parts[2..].join(" ");
                let pattern = match FeedbackPattern::parse(&pattern_str) {
                    Ok(pattern) => pattern,
                    Err(_) => {
                        println!("Invalid pattern: {}", pattern_str);
                        println!("Use g=green, y=yellow, b=black (5 characters)");
                        continue;
                    }
                };

                let prev_count = session.candidates().len();
                let state = match session.observe(word, pattern) {
                    Ok(state) => state,
                    Err(e) => {
                        println!("{}", e);
                        println!("Use 'reset' to start over.");
                        continue;
                    }
                };
                let new_count = session.candidates().len();

                println!();
                println!("Guess: {}", word.to_uppercase());
                println!("Feedback: {}", pattern);
                println!(
                    "Eliminated {} words ({} → {})",
                    prev_count.saturating_sub(new_count),
                    prev_count,
                    new_count
                );

                match state {
                    SessionState::Solved { .. } => {
                        println!();
                        println!("🎉 Congratulations! You solved it!");
                    }
                    SessionState::Stuck { .. } => {
                        println!();
                        println!("⚠️  No words match this feedback pattern!");
                        println!("This might indicate an error. Use 'reset' to start over.");
                    }
                    SessionState::Exhausted { attempts } => {
                        println!();
                        println!("Out of attempts after {} guesses.", attempts);
                    }
                    SessionState::AwaitingFeedback { guess } => {
                        if new_count <= 10 {
                            println!();
                            println!(
                                "Remaining words: {:?}",
                                session
                                    .candidates()
                                    .iter()
                                    .map(|w| w.to_uppercase())
                                    .collect::<Vec<_>>()
                            );
                        }
                        println!("Next suggestion: {}", guess.to_uppercase());
                    }
                    _ => {}
                }
                println!();
            }
            "remaining" | "r" | "left" => {
                let remaining = session.candidates();
                println!();
                println!("Remaining possibilities: {}", remaining.len());
                if remaining.len() <= 20 {
                    for (i, word) in remaining.iter().enumerate() {
                        if i > 0 && i % 10 == 0 {
                            println!();
                        }
                        print!("{:>8}", word.to_uppercase());
                    }
                    println!();
                }
                println!();
            }
            "solve" => {
                if parts.len() < 2 {
                    println!("Usage: solve <target_word>");
                    continue;
                }

                let target = match Word::parse(parts[1]) {
                    Ok(target) => target,
                    Err(e) => {
                        println!("{}", e);
                        continue;
                    }
                };

                println!();
                println!("Solving for: {}", target.to_uppercase());
                println!();

                match solve_target(&dictionary, &config, target, None) {
                    Ok(game) => print_game(&game),
                    Err(e) => println!("Solver failed: {}", e),
                }
                println!();
            }
            "benchmark" | "bench" => {
                if let Err(e) = run_bench(&dictionary, &config) {
                    println!("Benchmark failed: {}", e);
                }
            }
            "reset" => {
                session.reset();
                println!(
                    "Reset to initial state. {} words available.",
                    session.candidates().len()
                );
            }
            _ => {
                println!("Unknown command: {}", parts[0]);
                println!("Type 'help' for available commands.");
            }
        }
    }
}

fn build_config(args: &Args) -> wordle_entropy::Result<SolverConfig> {
    let mut config = SolverConfig::from_env()?;
    if let Some(n) = args.max_attempts {
        config = config.with_max_attempts(n)?;
    }
    if let Some(opening) = args.opening {
        config = config.with_opening(match opening {
            Opening::Book => OpeningStrategy::StaticBook,
            Opening::RankBook => OpeningStrategy::RankBook,
            Opening::Full => OpeningStrategy::FullDictionary,
        });
    }
    if let Some(scoring) = args.scoring {
        config = config.with_scoring_rule(match scoring {
            Scoring::Reference => ScoringRule::Reference,
            Scoring::Canonical => ScoringRule::Canonical,
        });
    }
    Ok(config)
}

fn try_main(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = build_config(&args)?;
    config::init_rayon_threads();

    let dictionary = match &args.dictionary {
        Some(path) => Dictionary::parse(&std::fs::read_to_string(path)?)?,
        None => load_dictionary()?,
    };
    log::debug!("loaded {} words", dictionary.len());
    let dictionary = Arc::new(dictionary);

    match args.command {
        None => run_interactive(dictionary, config),
        Some(Command::Suggest { top }) => {
            let mut ranked = opening_ranking(&dictionary, &config)?;
            ranked.truncate(top);
            print_ranking("Best opening guesses", &ranked);
        }
        Some(Command::Solve { target, timeout_ms }) => {
            let target = Word::parse(&target)?;
            println!("Solving for: {}", target.to_uppercase());
            println!();
            let game = solve_target(
                &dictionary,
                &config,
                target,
                timeout_ms.map(Duration::from_millis),
            )?;
            print_game(&game);
        }
        Some(Command::Bench) => run_bench(&dictionary, &config)?,
    }
    Ok(())
}

fn main() {
    let args = Args::parse();
    logging::init_logger(args.debug);

    if let Err(e) = try_main(args) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
