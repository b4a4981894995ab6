//! Typed console commands

mod command;

pub use command::{CommandError, ConsoleCommand, HELP, parse_command};
