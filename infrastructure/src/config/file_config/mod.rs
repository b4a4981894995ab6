//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod game;
mod logging;
mod output;
mod rounds;

pub use game::FileGameConfig;
pub use logging::FileLoggingConfig;
pub use output::FileOutputConfig;
pub use rounds::FileRoundsConfig;

use avalon_domain::{ConfigurationError, GameConfiguration};
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Role selection and rule variants
    pub game: FileGameConfig,
    /// Round abandonment
    pub rounds: FileRoundsConfig,
    /// Log filter and file sink
    pub logging: FileLoggingConfig,
    /// Terminal output
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Shorthand for `self.game.to_game_configuration`.
    pub fn to_game_configuration(
        &self,
        player_count: usize,
    ) -> Result<GameConfiguration, ConfigurationError> {
        self.game.to_game_configuration(player_count)
    }
}
