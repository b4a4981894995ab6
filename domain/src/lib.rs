//! Domain layer for avalon-engine
//!
//! This crate contains the game rules, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns and
//! performs no I/O.
//!
//! # Core Concepts
//!
//! ## Roles and factions
//!
//! Every player is dealt one [`Role`] from a closed set. Roles belong to the
//! good or the evil [`Faction`]; special roles change who can see whom
//! (see [`RoleKnowledge`]).
//!
//! ## Game flow
//!
//! - **Team selection**: the leader nominates a team for the current quest
//! - **Team voting**: everyone approves or rejects the nomination
//! - **Quest execution**: the team secretly plays succeed/fail cards
//! - **Assassination**: if good wins three quests while Merlin plays, the
//!   assassin gets one guess at Merlin
//!
//! [`GamePhaseManager`] gates every transition; [`GameState`] aggregates the
//! whole game.

pub mod config;
pub mod core;
pub mod game;
pub mod role;

// Re-export commonly used types
pub use config::{FinalProposalRule, GameConfiguration, LeaderOrder, QuestAssignment};
pub use core::{
    error::{AssignmentError, ConfigurationError, PhaseError},
    player::{Player, PlayerId},
};
pub use game::{
    outcome::{GameOutcome, WinReason},
    phase::{GamePhase, GamePhaseManager},
    proposal::{ProposalHistoryEntry, ProposalOutcome, TeamProposal},
    quest::{QuestBoardEntry, QuestManager, QuestOutcome, QuestResult, QuestStatus, Score},
    role_assignment::{DealtRoles, RoleAssignmentService},
    state::GameState,
};
pub use role::{
    Faction, Role,
    knowledge::{Insight, RoleKnowledge},
};
