//! Wenli CLI - a personal wallet in your terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use wenli_core::services::LogEvent;

mod commands;
mod output;

use commands::{account, add, categories, config, delete, doctor, edit, list, logs, stats};

/// Wenli - record income and expenses, see where the money goes
#[derive(Parser)]
#[command(name = "wl", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account and log in
    Register {
        /// Username (prompted if omitted)
        username: Option<String>,
        /// Password (or WENLI_PASSWORD; prompted if omitted)
        #[arg(short, long)]
        password: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Log in as an existing user
    Login {
        /// Username (prompted if omitted)
        username: Option<String>,
        /// Password (or WENLI_PASSWORD; prompted if omitted)
        #[arg(short, long)]
        password: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Forget the logged-in user
    Logout {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the logged-in user
    Whoami {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Record an income or expense
    Add {
        /// income or expense (prompted if omitted)
        #[arg(short = 't', long = "type")]
        kind: Option<String>,
        /// Amount, greater than zero
        #[arg(short, long)]
        amount: Option<String>,
        /// Category name or English label
        #[arg(short, long)]
        category: Option<String>,
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
        /// Free-text note
        #[arg(short, long)]
        note: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List transactions, newest first
    List {
        /// Only income or expense
        #[arg(short = 't', long = "type")]
        kind: Option<String>,
        /// Case-insensitive match on note or category
        #[arg(short, long)]
        search: Option<String>,
        /// Show at most N transactions
        #[arg(short, long)]
        limit: Option<usize>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Change fields of a transaction
    Edit {
        /// Transaction ID
        id: String,
        /// New type
        #[arg(short = 't', long = "type")]
        kind: Option<String>,
        /// New amount
        #[arg(short, long)]
        amount: Option<String>,
        /// New category
        #[arg(short, long)]
        category: Option<String>,
        /// New date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,
        /// New note
        #[arg(short, long)]
        note: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a transaction
    Delete {
        /// Transaction ID
        id: String,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show balance, category breakdown and daily trend
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show suggested categories
    Categories {
        /// Only income or expense
        #[arg(short = 't', long = "type")]
        kind: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show settings, or change them with the flags below
    Config {
        /// Storage key prefix
        #[arg(long)]
        namespace: Option<String>,
        /// Fail on unreadable stored data (true) or read it as empty (false)
        #[arg(long)]
        strict_storage: Option<bool>,
        /// Days in the stats trend window
        #[arg(long)]
        trend_days: Option<u32>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run storage health checks
    Doctor {
        /// Show verbose output
        #[arg(long, short)]
        verbose: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// View and manage the event log
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Register { .. } => "register",
            Commands::Login { .. } => "login",
            Commands::Logout { .. } => "logout",
            Commands::Whoami { .. } => "whoami",
            Commands::Add { .. } => "add",
            Commands::List { .. } => "list",
            Commands::Edit { .. } => "edit",
            Commands::Delete { .. } => "delete",
            Commands::Stats { .. } => "stats",
            Commands::Categories { .. } => "categories",
            Commands::Config { .. } => "config",
            Commands::Doctor { .. } => "doctor",
            Commands::Logs { .. } => "logs",
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("WENLI_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    let name = cli.command.name();

    let result = run(cli);

    // Opened after the command so `wl logs` never holds two handles on the log file
    let logger = commands::get_logger();
    match result {
        Ok(healthy) => {
            commands::log_event(&logger, LogEvent::new("command_executed").with_command(name));
            if healthy {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            commands::log_event(&logger, failure_event(name, &e));
            output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

/// Event-log entry for a failed command
///
/// Error text often carries usernames, amounts or other input, so only a
/// fixed description of the error's kind is recorded.
fn failure_event(command: &str, error: &anyhow::Error) -> LogEvent {
    let kind = if let Some(core) = error.downcast_ref::<wenli_core::Error>() {
        core.kind()
    } else if error.downcast_ref::<dialoguer::Error>().is_some() {
        "prompt error"
    } else if error.downcast_ref::<std::io::Error>().is_some() {
        "io error"
    } else {
        "invalid input"
    };
    LogEvent::new("command_failed").with_command(command).with_error(kind)
}

/// Dispatch; `Ok(false)` means the command ran but should exit non-zero
fn run(cli: Cli) -> Result<bool> {
    match cli.command {
        Commands::Register { username, password, json } => account::run_register(username, password, json)?,
        Commands::Login { username, password, json } => account::run_login(username, password, json)?,
        Commands::Logout { json } => account::run_logout(json)?,
        Commands::Whoami { json } => account::run_whoami(json)?,
        Commands::Add { kind, amount, category, date, note, json } => add::run(add::AddArgs {
            kind,
            amount,
            category,
            date,
            note,
            json,
        })?,
        Commands::List { kind, search, limit, json } => list::run(kind, search, limit, json)?,
        Commands::Edit { id, kind, amount, category, date, note, json } => edit::run(edit::EditArgs {
            id,
            kind,
            amount,
            category,
            date,
            note,
            json,
        })?,
        Commands::Delete { id, force, json } => delete::run(&id, force, json)?,
        Commands::Stats { json } => stats::run(json)?,
        Commands::Categories { kind, json } => categories::run(kind, json)?,
        Commands::Config { namespace, strict_storage, trend_days, json } => {
            config::run(config::ConfigArgs {
                namespace,
                strict_storage,
                trend_days,
                json,
            })?
        }
        Commands::Doctor { verbose, json } => return doctor::run(verbose, json).map(|failed| !failed),
        Commands::Logs { command } => logs::run(command)?,
    }
    Ok(true)
}
