//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Also write logs to this file (no ANSI colors)
    pub file: Option<PathBuf>,
    /// Default filter when neither `-v` nor `RUST_LOG` is given, e.g. "info"
    pub level: Option<String>,
}
