mod commands;
mod render;

use std::fmt;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use quiz_core::model::QuizResults;
use services::{ApiConfig, AppServices, Clock, QuizSettings};
use ui::vm::{QuizIntent, QuizOutcome, QuizVm, TimerLevel, map_report, start_quiz};

use commands::{Command, HELP, parse_command};

type Input = Lines<BufReader<Stdin>>;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidDuration { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidDuration { raw } => write!(f, "invalid --duration value: {raw}"),
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
    eprintln!(
        "  cargo run -p app -- [--db <sqlite_url>] [--api <url>] [--duration <secs>] [--email <addr>]"
    );
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite://quiz-state.sqlite3");
    eprintln!("  --api {}", services::config::DEFAULT_API_URL);
    eprintln!("  --duration 1800");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_DB_URL, QUIZ_API_URL, QUIZ_API_TIMEOUT_SECS, QUIZ_DURATION_SECS, RUST_LOG");
}

#[derive(Debug, Default)]
struct Args {
    db_url: String,
    api_url: Option<String>,
    duration_secs: Option<u32>,
    email: Option<String>,
    help: bool,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut parsed = Self {
            db_url: std::env::var("QUIZ_DB_URL")
                .ok()
                .map_or_else(|| "sqlite://quiz-state.sqlite3".into(), normalize_sqlite_url),
            ..Self::default()
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    parsed.db_url = normalize_sqlite_url(value);
                }
                "--api" => parsed.api_url = Some(require_value(args, "--api")?),
                "--duration" => {
                    let value = require_value(args, "--duration")?;
                    let secs = value
                        .parse::<u32>()
                        .ok()
                        .filter(|secs| *secs > 0)
                        .ok_or(ArgsError::InvalidDuration { raw: value })?;
                    parsed.duration_secs = Some(secs);
                }
                "--email" => parsed.email = Some(require_value(args, "--email")?),
                "--help" | "-h" => parsed.help = true,
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(parsed)
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim();
    let path = std::path::Path::new(trimmed.strip_prefix("sqlite:").unwrap_or(trimmed));
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

/// `SQLite` creates the file itself but not its directory.
fn ensure_db_dir(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let Some(path) = db_url.strip_prefix("sqlite://") else {
        return Ok(());
    };
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }
    if let Some(parent) = std::path::Path::new(path).parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

//
// ─── TERMINAL LOOP ─────────────────────────────────────────────────────────────
//

async fn prompt(input: &mut Input, text: &str) -> std::io::Result<Option<String>> {
    println!("{text}");
    input.next_line().await
}

/// Ask for an email until a quiz starts. `None` means stdin closed.
async fn start_screen(
    services: &AppServices,
    input: &mut Input,
    mut preset: Option<String>,
) -> std::io::Result<Option<QuizVm>> {
    let quiz_loop = services.quiz_loop();
    loop {
        let email = match preset.take() {
            Some(email) => email,
            None => match prompt(input, "📧 Email address:").await? {
                Some(line) => line,
                None => return Ok(None),
            },
        };
        match start_quiz(&quiz_loop, &email).await {
            Ok(vm) => return Ok(Some(vm)),
            Err(err) => println!("{}", err.message()),
        }
    }
}

fn show_question(vm: &QuizVm) {
    if let Some(question) = vm.question() {
        render::print_question(&question, &vm.timer());
    }
}

/// Run the question screen until the quiz completes. `None` means the user
/// quit or stdin closed.
async fn question_screen(vm: &mut QuizVm, input: &mut Input) -> std::io::Result<Option<QuizResults>> {
    if let Some(started) = vm.started_label() {
        println!("Quiz started {started}. Type `help` for commands.");
    }
    show_question(vm);

    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately.
    ticker.tick().await;
    let mut level = vm.timer().level;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match vm.tick().await {
                    Ok(QuizOutcome::Completed(results)) => {
                        println!("⏰ Time is up. Your quiz was submitted.");
                        return Ok(Some(results));
                    }
                    Ok(_) => {}
                    Err(err) => {
                        warn!("automatic submission failed: {err}");
                        println!("⏰ Time is up, but submitting failed. Type `submit` to retry.");
                    }
                }
                let timer = vm.timer();
                if timer.level != level && timer.level != TimerLevel::Normal {
                    println!("{} left", render::timer_text(&timer));
                }
                level = timer.level;
            }
            line = input.next_line() => {
                let Some(line) = line? else {
                    return Ok(None);
                };
                let intent = match parse_command(&line) {
                    Ok(Command::Intent(intent)) => intent,
                    Ok(Command::Show) => {
                        show_question(vm);
                        continue;
                    }
                    Ok(Command::Navigator) => {
                        render::print_navigator(&vm.navigator());
                        continue;
                    }
                    Ok(Command::Help) => {
                        println!("{HELP}");
                        continue;
                    }
                    Ok(Command::Quit) => return Ok(None),
                    Err(err) => {
                        println!("{err}");
                        continue;
                    }
                };

                let moved = matches!(intent, QuizIntent::Next | QuizIntent::Prev | QuizIntent::GoTo(_));
                let filtered = matches!(intent, QuizIntent::Filter(_));
                match vm.apply(intent).await {
                    Ok(QuizOutcome::Completed(results)) => return Ok(Some(results)),
                    Ok(QuizOutcome::Notice(text)) => println!("{text}"),
                    Ok(QuizOutcome::Continue) => {}
                    Err(err) => {
                        println!("{}", err.message());
                        continue;
                    }
                }
                if moved {
                    show_question(vm);
                } else if filtered {
                    render::print_navigator(&vm.navigator());
                }
            }
        }
    }
}

async fn report_screen(services: &AppServices, vm: &QuizVm, results: &QuizResults) {
    let Some(quiz_id) = vm.quiz().quiz_id() else {
        return;
    };
    match services.reports().load_report(quiz_id, Some(results)).await {
        Ok(report) => render::print_report(&map_report(&report)),
        Err(err) => {
            warn!("report unavailable: {err}");
            println!("Failed to load results");
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let args = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;
    if args.help {
        print_usage();
        return Ok(());
    }

    let mut api_config = ApiConfig::from_env()?;
    if let Some(raw) = &args.api_url {
        api_config = ApiConfig::new(raw)?.with_timeout(api_config.timeout);
    }
    let mut settings = QuizSettings::from_env()?;
    if let Some(secs) = args.duration_secs {
        settings.duration_secs = secs;
    }

    ensure_db_dir(&args.db_url)?;
    info!("quiz API at {}", api_config.base_url);
    let services =
        AppServices::new_sqlite(&args.db_url, Clock::system(), api_config, settings).await?;

    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let mut preset = args.email;
    loop {
        let Some(mut vm) = start_screen(&services, &mut input, preset.take()).await? else {
            return Ok(());
        };
        let Some(results) = question_screen(&mut vm, &mut input).await? else {
            return Ok(());
        };
        report_screen(&services, &vm, &results).await;

        let again = prompt(&mut input, "🔄 Restart quiz? [y/N]").await?;
        if !again.is_some_and(|answer| answer.trim().eq_ignore_ascii_case("y")) {
            return Ok(());
        }
        vm.reset();
    }
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
