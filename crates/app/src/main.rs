use std::fmt;
use std::sync::Arc;

use quiz_core::model::{Category, CategoryError, QuizPreset};
use services::{
    ApiError, ConfigError, HttpQuizApi, Ignored, QuizApi, QuizApiConfig, QuizPhase,
    QuizSessionController, SessionMode, Step, parse_timeout,
};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use ui::TerminalView;
use ui::vm::ScreenVm;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidCategory { raw: String, source: CategoryError },
    Config(ConfigError),
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidCategory { raw, source } => {
                write!(f, "invalid category {raw:?}: {source}")
            }
            ArgsError::Config(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ArgsError {}

impl From<ConfigError> for ArgsError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- play [--base-url <url>] [--preset general|pspo1]");
    eprintln!("                           [--category <name>] [--timeout <secs>]");
    eprintln!("                           [--explicit-session | --cookie-session]");
    eprintln!();
    eprintln!("Defaults for play:");
    eprintln!("  --base-url {}", QuizApiConfig::DEFAULT_BASE_URL);
    eprintln!("  --explicit-session");
    eprintln!("  no timeout; asks for a quiz when neither --preset nor --category is given");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_BASE_URL, QUIZ_CATEGORY, QUIZ_SESSION_MODE, QUIZ_TIMEOUT_SECS, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Play,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "play" => Some(Self::Play),
            _ => None,
        }
    }
}

struct Args {
    config: QuizApiConfig,
    category: Option<Category>,
    /// No quiz was picked on the command line or in the environment.
    ask_for_quiz: bool,
}

fn parse_category(raw: String) -> Result<Category, ArgsError> {
    Category::new(&raw).map_err(|source| ArgsError::InvalidCategory { raw, source })
}

impl Args {
    fn parse_play(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut config = QuizApiConfig::from_env()?;
        let mut category = match std::env::var("QUIZ_CATEGORY") {
            Ok(raw) if !raw.trim().is_empty() => Some(parse_category(raw)?),
            _ => None,
        };
        let mut ask_for_quiz = category.is_none();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--base-url" => {
                    let value = require_value(args, "--base-url")?;
                    config = config.with_base_url(&value)?;
                }
                "--category" => {
                    let value = require_value(args, "--category")?;
                    category = Some(parse_category(value)?);
                    ask_for_quiz = false;
                }
                "--preset" => {
                    let value = require_value(args, "--preset")?;
                    let preset: QuizPreset = value
                        .parse()
                        .map_err(|source| ArgsError::InvalidCategory { raw: value, source })?;
                    category = preset.category();
                    ask_for_quiz = false;
                }
                "--timeout" => {
                    let value = require_value(args, "--timeout")?;
                    config.timeout = Some(parse_timeout(&value)?);
                }
                "--explicit-session" => config.session_mode = SessionMode::Explicit,
                "--cookie-session" => config.session_mode = SessionMode::Cookie,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            config,
            category,
            ask_for_quiz,
        })
    }
}

type Input = Lines<BufReader<Stdin>>;

/// Shows the preset menu until a valid pick. `None` on `q` or end of input.
async fn choose_preset(
    view: &TerminalView<std::io::Stdout>,
    input: &mut Input,
) -> Result<Option<QuizPreset>, Box<dyn std::error::Error>> {
    loop {
        view.draw(&ScreenVm::Welcome)?;
        let Some(line) = input.next_line().await? else {
            return Ok(None);
        };
        let line = line.trim();
        if line.eq_ignore_ascii_case("q") {
            return Ok(None);
        }
        if line.is_empty() {
            return Ok(Some(QuizPreset::default()));
        }
        let picked = match line.parse::<usize>() {
            Ok(number) => number
                .checked_sub(1)
                .and_then(|index| QuizPreset::ALL.get(index).copied()),
            Err(_) => line.parse().ok(),
        };
        match picked {
            Some(preset) => return Ok(Some(preset)),
            None => eprintln!("unknown quiz: {line}"),
        }
    }
}

/// Reports refused inputs; failures are already on screen through the observer.
fn report(outcome: Result<Step, ApiError>) {
    match outcome {
        Ok(Step::Moved(phase)) => log::debug!("now {phase}"),
        Ok(Step::Ignored(Ignored::ChoiceOutOfRange { choices, .. })) => {
            eprintln!("type a number from 1 to {choices}");
        }
        Ok(Step::Ignored(reason)) => eprintln!("{reason}"),
        Err(err) => log::debug!("transition failed: {err}"),
    }
}

async fn play(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    log::info!(
        "quiz server {} ({} session)",
        args.config.base_url(),
        args.config.session_mode
    );
    let api: Arc<dyn QuizApi> = Arc::new(HttpQuizApi::new(args.config)?);
    let view = Arc::new(TerminalView::stdout());
    let quiz = QuizSessionController::new(api).with_observer(view.clone());
    let mut input = BufReader::new(tokio::io::stdin()).lines();

    let mut category = args.category;
    if args.ask_for_quiz {
        match choose_preset(&view, &mut input).await? {
            Some(preset) => category = preset.category(),
            None => return Ok(()),
        }
    }

    report(quiz.start(category.clone()).await);
    while let Some(line) = input.next_line().await? {
        let line = line.trim();
        if line.eq_ignore_ascii_case("q") {
            break;
        }
        let outcome = match quiz.phase().await {
            QuizPhase::QuestionActive => match line.parse::<usize>() {
                Ok(number) if number > 0 => quiz.submit_answer(number - 1).await,
                _ => {
                    eprintln!("type the number of your answer");
                    continue;
                }
            },
            QuizPhase::AnswerRevealed => quiz.next().await,
            QuizPhase::Finished => {
                if !line.eq_ignore_ascii_case("y") {
                    break;
                }
                quiz.start(category.clone()).await
            }
            QuizPhase::Errored => match line {
                "r" | "R" => quiz.retry().await,
                "s" | "S" => quiz.start(category.clone()).await,
                _ => continue,
            },
            QuizPhase::Idle | QuizPhase::Loading => continue,
        };
        report(outcome);
    }

    quiz.discard().await;
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // Default behavior: play when no subcommand is provided.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Play,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Play,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = match cmd {
        Command::Play => Args::parse_play(&mut iter),
    }
    .map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    match cmd {
        Command::Play => play(parsed).await,
    }
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
