//! Domain error types

use crate::game::phase::GamePhase;
use crate::role::Role;
use thiserror::Error;

/// Errors raised while validating a [`GameConfiguration`](crate::GameConfiguration).
///
/// Construction fails fast and deterministically; callers must fix their
/// inputs rather than retry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Invalid player count: {count}. Must be {min}-{max}")]
    InvalidPlayerCount { count: usize, min: usize, max: usize },

    #[error("Invalid special role: {0}")]
    UnknownRole(String),

    #[error("Too many evil special roles ({requested}) for {player_count} players. Maximum: {budget}")]
    EvilBudgetExceeded {
        requested: usize,
        budget: usize,
        player_count: usize,
    },

    #[error("Merlin must be included in Avalon mode")]
    MerlinRequired,

    #[error("Percival requires Merlin or Morgana to be in the game")]
    PercivalWithoutTarget,
}

/// A phase transition that is not on the allow-list.
///
/// Treated as a fatal orchestration defect: the game is force-ended and the
/// error surfaced, never retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid phase transition: {from} -> {to}")]
pub struct PhaseError {
    pub from: GamePhase,
    pub to: GamePhase,
}

/// Errors raised while dealing roles onto a roster.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssignmentError {
    #[error("Roster has {actual} players but the configuration expects {expected}")]
    RosterSizeMismatch { expected: usize, actual: usize },

    #[error("Player {0} appears more than once in the roster")]
    DuplicatePlayer(String),

    #[error("Player {player} already holds the {role} role")]
    AlreadyAssigned { player: String, role: Role },

    #[error("No evil player was dealt, so nobody can hold the assassin duty")]
    NoEvilPlayers,
}
