//! Tracing subscriber setup
//!
//! Logs go to stderr so they never interleave with the game table on
//! stdout. An optional file sink is written through a non-blocking
//! `tracing-appender` worker; keep the returned guard alive until exit or
//! buffered lines are lost.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("Log file path has no file name: {0}")]
    InvalidPath(PathBuf),

    #[error("Could not prepare log directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("A global subscriber is already installed: {0}")]
    AlreadyInitialized(String),
}

#[derive(Debug, Clone, Default)]
pub struct LogSettings {
    /// Number of `-v` flags
    pub verbosity: u8,
    /// Filter used when `-v` and `RUST_LOG` are both absent
    pub default_level: Option<String>,
    pub file: Option<PathBuf>,
}

/// Pick the filter: explicit `-v` wins, then `RUST_LOG`, then the
/// configured level, then `warn`.
pub fn filter_for(verbosity: u8, default_level: Option<&str>) -> EnvFilter {
    match verbosity {
        0 => EnvFilter::try_from_default_env()
            .ok()
            .or_else(|| default_level.and_then(|level| EnvFilter::try_new(level).ok()))
            .unwrap_or_else(|| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    }
}

/// Install the global subscriber.
pub fn init(settings: &LogSettings) -> Result<Option<WorkerGuard>, LoggingError> {
    let filter = filter_for(settings.verbosity, settings.default_level.as_deref());

    let stderr = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let (file_layer, guard) = match &settings.file {
        Some(path) => {
            let (dir, name) = split_log_path(path)?;
            std::fs::create_dir_all(&dir)?;
            let (writer, guard) = tracing_appender::non_blocking(
                tracing_appender::rolling::never(dir, name),
            );
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr)
        .with(file_layer)
        .try_init()
        .map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))?;

    Ok(guard)
}

fn split_log_path(path: &Path) -> Result<(PathBuf, PathBuf), LoggingError> {
    let name = path
        .file_name()
        .ok_or_else(|| LoggingError::InvalidPath(path.to_path_buf()))?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    Ok((dir.to_path_buf(), PathBuf::from(name)))
}
