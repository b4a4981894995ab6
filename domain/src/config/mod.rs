//! Configuration value objects for the domain layer
//!
//! A game is configured once, before it starts, and the configuration is
//! never mutated afterwards.

mod game_configuration;
mod rules;

pub use game_configuration::{GameConfiguration, QuestAssignment};
pub use rules::{FinalProposalRule, LeaderOrder};
