use std::fs;
use std::path::PathBuf;

use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::{self, LoggingSettings};

pub const LOG_FILE: &str = "otono.log";

/// Directory the log file goes to: `logging.directory`, else the state dir.
pub fn log_dir(settings: &LoggingSettings) -> Option<PathBuf> {
    settings
        .directory
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .map(PathBuf::from)
        .or_else(config::default_state_dir)
}

/// `RUST_LOG` when set and valid, else `logging.level`, else `info`.
pub fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber writing to `<log dir>/otono.log`.
///
/// The terminal belongs to the TUI, so nothing is logged when no directory
/// can be found or created. Keep the returned guard alive until exit so
/// buffered lines are flushed.
pub fn init(settings: &LoggingSettings) -> Option<WorkerGuard> {
    let dir = log_dir(settings)?;
    if let Err(e) = fs::create_dir_all(&dir) {
        eprintln!("otono: cannot create log directory {}: {e}", dir.display());
        return None;
    }

    let file_appender = tracing_appender::rolling::never(&dir, LOG_FILE);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter(&settings.level))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .ok()?;

    info!("otono v{} starting", env!("CARGO_PKG_VERSION"));
    Some(guard)
}
