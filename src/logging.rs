//! Tracing subscriber setup.
//!
//! The filter comes from `ADSPEND_LOG` (same syntax as `RUST_LOG`), default
//! `warn`. The TUI owns the terminal, so it logs to a file instead of stderr.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::error::AppError;

pub const LOG_ENV: &str = "ADSPEND_LOG";

/// Default log file for the TUI.
pub const DEFAULT_LOG_FILE: &str = "adspend.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

/// Install the global subscriber. Call once per process.
pub fn init(target: &LogTarget) -> Result<(), AppError> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    let installed = match target {
        LogTarget::Stderr => {
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)
        }
        LogTarget::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| AppError::new(4, format!("Failed to open log file '{}': {e}", path.display())))?;
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .finish();
            tracing::subscriber::set_global_default(subscriber)
        }
    };

    installed.map_err(|e| AppError::new(4, format!("Failed to install logger: {e}")))
}
