//! Application layer for avalon-engine
//!
//! This crate contains the game orchestrator, the voting and quest rounds,
//! the action collector they share, and the port definitions adapters
//! implement. It depends only on the domain layer.

pub mod collector;
pub mod orchestrator;
pub mod ports;
pub mod services;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use collector::{
    ActionCollector, CollectError, CollectorProgress, IdentityResolver, RoundPolicy,
    identity_equality,
};
pub use orchestrator::{GameOrchestrator, OrchestratorError};
pub use ports::{
    action_listener::{
        APPROVE_PAYLOAD, ActionEvent, ActionHandler, ActionListenerPort, ActorId, FAIL_PAYLOAD,
        ListenerId, QUEST_VOTE_ACTION, REJECT_PAYLOAD, SUCCEED_PAYLOAD, TEAM_VOTE_ACTION,
    },
    decision::{DecisionPort, DecisionRequest},
    error::PortError,
    messenger::{MessageHandle, MessageTarget, MessengerPort},
    notice::Notice,
};
pub use services::{
    RoundError,
    quest_execution::{QuestExecutionService, QuestRound, QuestVotes},
    team_voting::{TeamVote, TeamVoteResult, TeamVotingService},
};
