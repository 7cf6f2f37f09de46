use std::fmt;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use quiz_core::Clock;
use quiz_core::model::{AnswerChoice, Category, QuestionBank, QuizSettings};
use services::{QuizLoopService, SelectionPolicy, StatsService};
use storage::repository::Storage;

mod bank;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidMode { raw: String },
    InvalidCount { raw: String },
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidMode { raw } => write!(f, "invalid --mode value: {raw}"),
            ArgsError::InvalidCount { raw } => write!(f, "invalid --count value: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- quiz  [--bank <file>] [--db <sqlite_url>]");
    eprintln!("                            [--mode random|category|weak|unanswered]");
    eprintln!("                            [--category <label>] [--count <n>]");
    eprintln!("  cargo run -p app -- stats [--bank <file>] [--db <sqlite_url>]");
    eprintln!("  cargo run -p app -- categories [--bank <file>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --bank quiz.csv");
    eprintln!("  --db sqlite:quiz.sqlite3");
    eprintln!("  --mode random");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_DB_URL, QUIZ_BANK");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Quiz,
    Stats,
    Categories,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "quiz" => Some(Self::Quiz),
            "stats" => Some(Self::Stats),
            "categories" => Some(Self::Categories),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Random,
    Category,
    Weak,
    Unanswered,
}

impl Mode {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "random" => Some(Self::Random),
            "category" => Some(Self::Category),
            "weak" => Some(Self::Weak),
            "unanswered" => Some(Self::Unanswered),
            _ => None,
        }
    }
}

struct Args {
    db_url: String,
    bank_path: String,
    mode: Mode,
    category: Option<String>,
    count: Option<u32>,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("QUIZ_DB_URL")
            .ok()
            .map_or_else(|| "sqlite://quiz.sqlite3".into(), normalize_sqlite_url);
        let mut bank_path = std::env::var("QUIZ_BANK")
            .ok()
            .unwrap_or_else(|| "quiz.csv".into());
        let mut mode = Mode::Random;
        let mut category = None;
        let mut count = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--bank" => {
                    bank_path = require_value(args, "--bank")?;
                }
                "--mode" => {
                    let value = require_value(args, "--mode")?;
                    mode = Mode::from_arg(&value).ok_or(ArgsError::InvalidMode { raw: value })?;
                }
                "--category" => {
                    category = Some(require_value(args, "--category")?);
                }
                "--count" => {
                    let value = require_value(args, "--count")?;
                    let parsed: u32 = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidCount { raw: value.clone() })?;
                    if parsed == 0 {
                        return Err(ArgsError::InvalidCount { raw: value });
                    }
                    count = Some(parsed);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            bank_path,
            mode,
            category,
            count,
        })
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

/// Prompt once and read one trimmed line; `None` on end of input.
fn read_line(prompt: &str) -> io::Result<Option<String>> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut buf = String::new();
    if io::stdin().read_line(&mut buf)? == 0 {
        return Ok(None);
    }
    Ok(Some(buf.trim().to_string()))
}

fn prompt_category(bank: &QuestionBank) -> io::Result<Option<Category>> {
    let categories = bank.categories();
    if categories.is_empty() {
        return Ok(None);
    }

    println!("Select a category:");
    for (index, category) in categories.iter().enumerate() {
        println!("  {}. {}", index + 1, category);
    }
    loop {
        match read_line("Category number: ")? {
            None => return Ok(None),
            Some(input) => {
                if let Ok(n) = input.parse::<usize>() {
                    if (1..=categories.len()).contains(&n) {
                        return Ok(Some(categories[n - 1].clone()));
                    }
                }
                println!("Enter a number between 1 and {}.", categories.len());
            }
        }
    }
}

fn empty_message(policy: &SelectionPolicy) -> &'static str {
    match policy {
        SelectionPolicy::Weak => "No weak questions yet. Answer some questions first!",
        SelectionPolicy::Unanswered => "Every question has been answered at least once.",
        SelectionPolicy::Random | SelectionPolicy::Category(_) => {
            "No questions matched the selection."
        }
    }
}

async fn run_quiz(
    service: &QuizLoopService,
    bank: &QuestionBank,
    policy: &SelectionPolicy,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = service.start(bank, policy).await?;
    if session.total() == 0 {
        println!("{}", empty_message(policy));
        return Ok(());
    }

    loop {
        while !session.is_complete() {
            let Some(question) = session.current_question().cloned() else {
                break;
            };

            println!();
            println!(
                "Question {} / {}",
                session.current_index() + 1,
                session.total()
            );
            println!("Category: {}", question.category());
            println!("{}", question.prompt());

            let answer = loop {
                match read_line("Answer [t]rue / [f]alse (q to quit): ")? {
                    None => return Ok(()),
                    Some(input) => match input.to_ascii_lowercase().as_str() {
                        "t" | "true" => break AnswerChoice::True,
                        "f" | "false" => break AnswerChoice::False,
                        "q" | "quit" => {
                            println!("Session abandoned.");
                            return Ok(());
                        }
                        _ => println!("Please answer t or f."),
                    },
                }
            };

            let outcome = service.answer_current(&mut session, answer).await?;
            if outcome.submission.was_correct {
                println!("Correct!");
            } else {
                println!("Wrong.");
            }
            println!("Your answer:    {}", outcome.submission.answer);
            println!("Correct answer: {}", question.correct_answer());
            if let Some(accuracy) = outcome.record.accuracy() {
                println!(
                    "Lifetime accuracy for this question: {:.0}% ({} / {})",
                    accuracy * 100.0,
                    outcome.record.correct,
                    outcome.record.total()
                );
            }
            if let Some(explanation) = question.explanation() {
                println!("Explanation: {explanation}");
            }

            if read_line("Press Enter for the next question...")?.is_none() {
                return Ok(());
            }
            service.advance(&mut session)?;
        }

        println!();
        println!(
            "Session complete: score {} / {}",
            session.score(),
            session.total()
        );

        match read_line("Try again with a fresh selection? [y/N]: ")? {
            Some(input) if input.eq_ignore_ascii_case("y") => {
                service.restart(&mut session, bank, policy).await?;
                if session.total() == 0 {
                    println!("{}", empty_message(policy));
                    return Ok(());
                }
            }
            _ => return Ok(()),
        }
    }
}

async fn print_stats(
    stats: &StatsService,
    bank: &QuestionBank,
) -> Result<(), Box<dyn std::error::Error>> {
    let overall = stats.overall().await?;
    println!(
        "Overall accuracy: {}% ({} / {})",
        overall.rate, overall.correct, overall.total
    );

    let coverage = stats.coverage(bank).await?;
    println!(
        "Coverage: {} of {} questions answered",
        coverage.answered, coverage.total
    );

    println!();
    println!("By category:");
    for entry in stats.by_category(bank).await? {
        let rate = entry
            .rate
            .map_or_else(|| "--".to_string(), |rate| format!("{rate}%"));
        println!(
            "  {}: {} ({} / {}), answered {} of {} questions",
            entry.category,
            rate,
            entry.correct,
            entry.total,
            entry.coverage.answered,
            entry.coverage.total
        );
    }
    Ok(())
}

fn print_categories(bank: &QuestionBank) {
    for category in bank.categories() {
        match category.chapter() {
            Some(chapter) => println!("  [{chapter}] {}", category.title()),
            None => println!("      {}", category.as_str()),
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // Default behavior: run a quiz when no subcommand is provided.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Quiz,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Quiz,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            io::Error::new(io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let loaded = bank::load_bank(Path::new(&parsed.bank_path))?;

    if cmd == Command::Categories {
        print_categories(&loaded);
        return Ok(());
    }

    // Open + migrate SQLite at startup. Keep this in the binary glue so
    // core/services stay pure.
    prepare_sqlite_file(&parsed.db_url)?;
    let storage = Storage::sqlite(&parsed.db_url).await?;

    match cmd {
        Command::Quiz => {
            let policy = match parsed.mode {
                Mode::Random => SelectionPolicy::Random,
                Mode::Weak => SelectionPolicy::Weak,
                Mode::Unanswered => SelectionPolicy::Unanswered,
                Mode::Category => {
                    let category = match parsed.category {
                        Some(label) => Category::new(label)?,
                        None => match prompt_category(&loaded)? {
                            Some(category) => category,
                            None => return Ok(()),
                        },
                    };
                    SelectionPolicy::Category(category)
                }
            };

            let mut service =
                QuizLoopService::new(Clock::default_clock(), Arc::clone(&storage.ledger));
            if let Some(count) = parsed.count {
                service = service.with_settings(QuizSettings::new(count)?);
            }

            run_quiz(&service, &loaded, &policy).await
        }
        Command::Stats => {
            let stats = StatsService::new(Arc::clone(&storage.ledger));
            print_stats(&stats, &loaded).await
        }
        Command::Categories => Ok(()),
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
