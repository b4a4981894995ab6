//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for avalon
#[derive(Parser, Debug)]
#[command(name = "avalon")]
#[command(author, version, about = "Hot-seat Avalon on the terminal")]
#[command(long_about = r#"
Runs one game of The Resistance: Avalon for 5 to 10 players sharing a terminal.

Every player types their own commands, prefixed with their name:
  alice approve          vote on a proposed team
  bob fail               play a quest card
  carol pick 1 4         nominate a team or name Merlin

Configuration files are loaded from (in priority order):
1. --config <path>          Explicit config file
2. ./avalon.toml            Project-level config
3. ~/.config/avalon/config.toml   Global config

Example:
  avalon alice bob carol dave erin
  avalon --role merlin --role percival --role morgana a b c d e f g
  avalon --resistance --random-order --seed 7 a b c d e
"#)]
pub struct Cli {
    /// Player names, in seating order
    #[arg(value_name = "PLAYER")]
    pub players: Vec<String>,

    /// Special role to include (can be specified multiple times; replaces the configured list)
    #[arg(short, long = "role", value_name = "ROLE")]
    pub roles: Vec<String>,

    /// Plain Resistance: Merlin optional, no assassination
    #[arg(long)]
    pub resistance: bool,

    /// Shuffle the seating (and so the leader order) before dealing roles
    #[arg(long)]
    pub random_order: bool,

    /// A fifth rejected proposal hands evil the win instead of being auto-approved
    #[arg(long)]
    pub evil_wins_on_rejections: bool,

    /// Abandon a voting or quest round after this many seconds
    #[arg(long, value_name = "SECS")]
    pub round_timeout: Option<u64>,

    /// Seed for deterministic seating and role shuffles
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_game_flags() {
        let cli = Cli::try_parse_from([
            "avalon",
            "--role",
            "merlin",
            "-r",
            "percival",
            "--random-order",
            "--round-timeout",
            "120",
            "--seed",
            "9",
            "-vv",
            "a",
            "b",
            "c",
            "d",
            "e",
        ])
        .unwrap();
        assert_eq!(cli.players, vec!["a", "b", "c", "d", "e"]);
        assert_eq!(cli.roles, vec!["merlin", "percival"]);
        assert!(cli.random_order);
        assert!(!cli.resistance);
        assert_eq!(cli.round_timeout, Some(120));
        assert_eq!(cli.seed, Some(9));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_show_config_needs_no_players() {
        let cli = Cli::try_parse_from(["avalon", "--show-config"]).unwrap();
        assert!(cli.players.is_empty());
        assert!(cli.show_config);
    }
}
