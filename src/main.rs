use anyhow::Result;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::info;

use taskd::calc::Op;
use taskd::cli;
use taskd::config::TaskdConfig;
use taskd::{rest, AppContext};

#[derive(Parser)]
#[command(
    name = "taskd",
    about = "taskd — local task list service (REST API + CLI)",
    version
)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// REST server port
    #[arg(long, env = "TASKD_PORT")]
    port: Option<u16>,

    /// Data directory for the task file, calculator history, and config
    #[arg(long, env = "TASKD_DATA_DIR")]
    data_dir: Option<std::path::PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "TASKD_LOG")]
    log: Option<String>,

    /// Bind address for the REST server (default: 127.0.0.1; use 0.0.0.0 for LAN access)
    #[arg(long, env = "TASKD_BIND")]
    bind_address: Option<String>,

    /// Write logs to this file path (rotated daily). Optional.
    #[arg(long, env = "TASKD_LOG_FILE")]
    log_file: Option<std::path::PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the REST server (default when no subcommand given).
    ///
    /// Runs taskd in the foreground on the configured bind address and port.
    ///
    /// Examples:
    ///   taskd serve
    ///   taskd
    Serve,
    /// Add a task.
    ///
    /// The title must be non-empty after trimming and at most 255 characters.
    ///
    /// Examples:
    ///   taskd add "Buy milk"
    ///   taskd add "Read" --description "chapter 4"
    Add {
        title: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// List tasks, optionally filtered by completion state.
    ///
    /// Examples:
    ///   taskd list
    ///   taskd list --done
    List {
        /// Only completed tasks
        #[arg(long, conflicts_with = "pending")]
        done: bool,
        /// Only pending tasks
        #[arg(long)]
        pending: bool,
    },
    /// Show one task by ID.
    Get { id: u64 },
    /// Flip a task's completion state.
    Toggle { id: u64 },
    /// Delete a task permanently. The ID is never reused.
    Delete { id: u64 },
    /// List completed tasks (shorthand for `list --done`).
    Done,
    /// List pending tasks (shorthand for `list --pending`).
    Pending,
    /// Show task statistics (total, pending, done, completion %).
    Stats,
    /// Four-function calculator with a history log.
    ///
    /// Examples:
    ///   taskd calc add 5 3
    ///   taskd calc repl
    ///   taskd calc history --limit 10
    Calc {
        #[command(subcommand)]
        action: CalcAction,
    },
}

#[derive(Subcommand)]
enum CalcAction {
    /// a + b
    Add { a: f64, b: f64 },
    /// a - b
    Sub { a: f64, b: f64 },
    /// a * b
    Mul { a: f64, b: f64 },
    /// a / b — fails when b is zero
    Div { a: f64, b: f64 },
    /// Interactive loop: <op> <a> <b>, history [n], stats, clear, quit
    Repl,
    /// Print logged operations, oldest first
    History {
        /// Show only the last N entries
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Per-operation counters over the whole log
    Stats,
    /// Delete the history file
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = TaskdConfig::new(args.port, args.data_dir, args.log, args.bind_address);
    let _log_guard = setup_logging(&config.log, args.log_file.as_deref(), &config.log_format);

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => run_serve(config).await,
        Command::Add { title, description } => cli::tasks::add(&config, &title, description).await,
        Command::List { done, pending } => {
            let filter = if done {
                Some(true)
            } else if pending {
                Some(false)
            } else {
                None
            };
            cli::tasks::list(&config, filter).await
        }
        Command::Get { id } => cli::tasks::get(&config, id).await,
        Command::Toggle { id } => cli::tasks::toggle(&config, id).await,
        Command::Delete { id } => cli::tasks::delete(&config, id).await,
        Command::Done => cli::tasks::list(&config, Some(true)).await,
        Command::Pending => cli::tasks::list(&config, Some(false)).await,
        Command::Stats => cli::tasks::stats(&config).await,
        Command::Calc { action } => match action {
            CalcAction::Add { a, b } => cli::calc::run_op(&config, Op::Add, a, b).await,
            CalcAction::Sub { a, b } => cli::calc::run_op(&config, Op::Sub, a, b).await,
            CalcAction::Mul { a, b } => cli::calc::run_op(&config, Op::Mul, a, b).await,
            CalcAction::Div { a, b } => cli::calc::run_op(&config, Op::Div, a, b).await,
            CalcAction::Repl => cli::calc::run_repl(&config).await,
            CalcAction::History { limit } => cli::calc::history(&config, limit).await,
            CalcAction::Stats => cli::calc::stats(&config).await,
            CalcAction::Clear => cli::calc::clear(&config).await,
        },
    }
}

async fn run_serve(config: TaskdConfig) -> Result<()> {
    info!(
        version = env!("CARGO_PKG_VERSION"),
        data_dir = %config.data_dir.display(),
        "starting taskd"
    );
    let ctx = Arc::new(AppContext::init(config).await);
    rest::start_rest_server(ctx).await
}

// ─── Logging ──────────────────────────────────────────────────────────────────

/// Initialize tracing with an optional daily-rolling log file.
///
/// Returns a `WorkerGuard` that must stay alive for the process lifetime.
///
/// `log_format` may be `"pretty"` (default, human-readable compact format) or
/// `"json"` (structured JSON for log aggregators).
///
/// If the log directory cannot be created, falls back to stdout-only logging
/// with a warning — never panics.
fn setup_logging(
    log_level: &str,
    log_file: Option<&std::path::Path>,
    log_format: &str,
) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let use_json = log_format == "json";

    if let Some(path) = log_file {
        let dir = path.parent().unwrap_or_else(|| std::path::Path::new("."));
        let filename = path
            .file_name()
            .unwrap_or_else(|| std::ffi::OsStr::new("taskd.log"));

        // Ensure the directory exists before tracing-appender tries to open it.
        if let Err(e) = std::fs::create_dir_all(dir) {
            eprintln!(
                "warn: could not create log directory '{}': {e} — falling back to stdout",
                dir.display()
            );
            if use_json {
                tracing_subscriber::fmt().json().with_env_filter(log_level).init();
            } else {
                tracing_subscriber::fmt().with_env_filter(log_level).compact().init();
            }
            return None;
        }

        let appender = tracing_appender::rolling::daily(dir, filename);
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);

        if use_json {
            tracing_subscriber::registry()
                .with(EnvFilter::new(log_level))
                .with(fmt::layer().json())
                .with(fmt::layer().json().with_writer(non_blocking))
                .init();
        } else {
            tracing_subscriber::registry()
                .with(EnvFilter::new(log_level))
                .with(fmt::layer().compact())
                .with(fmt::layer().with_writer(non_blocking))
                .init();
        }

        Some(guard)
    } else if use_json {
        tracing_subscriber::fmt().json().with_env_filter(log_level).init();
        None
    } else {
        tracing_subscriber::fmt().with_env_filter(log_level).compact().init();
        None
    }
}
