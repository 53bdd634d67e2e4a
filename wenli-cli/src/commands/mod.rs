//! CLI command implementations

pub mod account;
pub mod add;
pub mod categories;
pub mod config;
pub mod delete;
pub mod doctor;
pub mod edit;
pub mod list;
pub mod logs;
pub mod stats;

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use wenli_core::services::{LogEvent, LoggingService};
use wenli_core::{Session, WalletContext};

/// Get the logging service for CLI operations
///
/// Returns None if logging fails to initialize (shouldn't block operations)
pub fn get_logger() -> Option<LoggingService> {
    let data_dir = get_data_dir().ok()?;
    std::fs::create_dir_all(&data_dir).ok()?;
    LoggingService::new(&data_dir, env!("CARGO_PKG_VERSION")).ok()
}

/// Log an event, ignoring any errors (logging should never break the app)
pub fn log_event(logger: &Option<LoggingService>, event: LogEvent) {
    if let Some(l) = logger {
        if let Err(e) = l.log(event) {
            tracing::debug!(error = %e, "failed to write event log");
        }
    }
}

/// Get the wallet directory from environment or default
pub fn get_data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("WENLI_DIR") {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join(".wenli"))
        .ok_or_else(|| anyhow!("Could not find home directory; set WENLI_DIR"))
}

/// Open the wallet context
pub fn get_context() -> Result<WalletContext> {
    let data_dir = get_data_dir()?;
    WalletContext::new(&data_dir).context("Failed to initialize wallet")
}

/// The logged-in user, or an error telling the user to log in
pub fn require_session(ctx: &WalletContext) -> Result<Session> {
    match ctx.current_session()? {
        Some(session) => Ok(session),
        None => bail!("Not logged in. Run 'wl login' or 'wl register' first."),
    }
}
