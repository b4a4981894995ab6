//! Round configuration from TOML (`[rounds]` section)

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Abandonment settings shared by every voting and quest round
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRoundsConfig {
    /// Give up on a round after this many seconds; absent waits forever
    pub timeout_secs: Option<u64>,
}

impl FileRoundsConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}
