//! Presentation layer for avalon-engine
//!
//! This crate contains the CLI definition, the terminal messenger that
//! renders notices, and the parser for commands typed at the console.

pub mod cli;
pub mod input;
pub mod output;

// Re-export commonly used types
pub use cli::commands::Cli;
pub use input::{CommandError, ConsoleCommand, HELP, parse_command};
pub use output::{ConsoleMessenger, NoticeFormatter, disable_color};
