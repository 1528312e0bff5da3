//! File logging for the TUI.
//!
//! Output never goes to the terminal, which is in raw mode on the alternate
//! screen. The filter comes from `GLIMPSE_LOG` when set, otherwise
//! `glimpse=info` (`glimpse=debug` when verbose).

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "GLIMPSE_LOG";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("could not open log file: {0}")]
    Io(#[from] std::io::Error),
    #[error("a global subscriber is already installed")]
    AlreadyInstalled,
}

pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "glimpse=debug"
    } else {
        "glimpse=info"
    }
}

/// Install the global subscriber writing to `path`, creating parent dirs.
pub fn init(path: &Path, verbose: bool) -> Result<(), LoggingError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|_| LoggingError::AlreadyInstalled)
}
