//! Parser for lines typed at the hot-seat console
//!
//! ```text
//! alice approve | alice reject        team vote
//! bob succeed   | bob fail            quest card
//! carol pick 1 3                      nomination or assassination (1-based)
//! help | quit
//! ```

use avalon_application::{
    APPROVE_PAYLOAD, ActorId, FAIL_PAYLOAD, QUEST_VOTE_ACTION, REJECT_PAYLOAD, SUCCEED_PAYLOAD,
    TEAM_VOTE_ACTION,
};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// Button-style action for the listener registered on `action_key`
    Action {
        actor: ActorId,
        action_key: &'static str,
        payload: &'static str,
    },
    /// Answer to a pending decision; zero-based option indexes
    Pick { actor: ActorId, indexes: Vec<usize> },
    Help,
    Quit,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Type `<name> <action>`, or `help`")]
    Empty,

    #[error("Unknown action '{0}' (approve, reject, succeed, fail, pick)")]
    UnknownAction(String),

    #[error("Missing action after '{0}'")]
    MissingAction(String),

    #[error("'{0}' is not an option number")]
    BadNumber(String),

    #[error("`pick` needs at least one option number")]
    NoChoices,
}

pub fn parse_command(line: &str) -> Result<ConsoleCommand, CommandError> {
    let mut words = line.split_whitespace();
    let first = words.next().ok_or(CommandError::Empty)?;

    match first.to_lowercase().as_str() {
        "quit" | "exit" => return Ok(ConsoleCommand::Quit),
        "help" | "?" => return Ok(ConsoleCommand::Help),
        _ => {}
    }

    let actor = ActorId::new(first);
    let action = words
        .next()
        .ok_or_else(|| CommandError::MissingAction(first.to_string()))?
        .to_lowercase();

    let (action_key, payload) = match action.as_str() {
        "approve" | "yes" | "y" => (TEAM_VOTE_ACTION, APPROVE_PAYLOAD),
        "reject" | "no" | "n" => (TEAM_VOTE_ACTION, REJECT_PAYLOAD),
        "succeed" | "success" | "s" => (QUEST_VOTE_ACTION, SUCCEED_PAYLOAD),
        "fail" | "f" => (QUEST_VOTE_ACTION, FAIL_PAYLOAD),
        "pick" | "choose" => {
            let indexes = words
                .flat_map(|w| w.split(','))
                .filter(|w| !w.is_empty())
                .map(|w| match w.parse::<usize>() {
                    Ok(n) if n > 0 => Ok(n - 1),
                    _ => Err(CommandError::BadNumber(w.to_string())),
                })
                .collect::<Result<Vec<_>, _>>()?;
            if indexes.is_empty() {
                return Err(CommandError::NoChoices);
            }
            return Ok(ConsoleCommand::Pick { actor, indexes });
        }
        other => return Err(CommandError::UnknownAction(other.to_string())),
    };

    Ok(ConsoleCommand::Action {
        actor,
        action_key,
        payload,
    })
}

pub const HELP: &str = "\
Commands:
  <name> approve | reject      vote on the proposed team
  <name> succeed | fail        play a quest card (team members only)
  <name> pick <n> [<n>...]     answer a nomination or assassination
  help                         show this help
  quit                         abandon the game";
