//! Team proposals and their audit trail

use crate::config::GameConfiguration;
use crate::core::player::PlayerId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One nomination attempt (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamProposal {
    leader: PlayerId,
    members: Vec<PlayerId>,
    quest_number: usize,
    attempt_number: u32,
}

impl TeamProposal {
    /// `members` is kept exactly as nominated, duplicates included.
    pub fn new(
        leader: PlayerId,
        members: Vec<PlayerId>,
        quest_number: usize,
        attempt_number: u32,
    ) -> Self {
        Self {
            leader,
            members,
            quest_number,
            attempt_number,
        }
    }

    pub fn leader(&self) -> &PlayerId {
        &self.leader
    }

    pub fn member_ids(&self) -> &[PlayerId] {
        &self.members
    }

    pub fn quest_number(&self) -> usize {
        self.quest_number
    }

    pub fn attempt_number(&self) -> u32 {
        self.attempt_number
    }

    pub fn includes_player(&self, player: &PlayerId) -> bool {
        self.members.contains(player)
    }

    pub fn team_size(&self) -> usize {
        self.members.len()
    }

    pub fn is_last_attempt(&self) -> bool {
        self.attempt_number >= GameConfiguration::MAX_PROPOSAL_ATTEMPTS
    }
}

/// How a proposal was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalOutcome {
    Approved,
    Rejected,
    /// Final attempt; voting skipped
    AutoApproved,
}

impl ProposalOutcome {
    pub fn is_approved(&self) -> bool {
        !matches!(self, ProposalOutcome::Rejected)
    }
}

/// Immutable audit record of one resolved proposal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalHistoryEntry {
    pub proposal: TeamProposal,
    pub approve_votes: Vec<PlayerId>,
    pub reject_votes: Vec<PlayerId>,
    pub outcome: ProposalOutcome,
    pub resolved_at: DateTime<Utc>,
}

impl ProposalHistoryEntry {
    pub fn voted(
        proposal: TeamProposal,
        approve_votes: Vec<PlayerId>,
        reject_votes: Vec<PlayerId>,
    ) -> Self {
        let outcome = if approve_votes.len() > reject_votes.len() {
            ProposalOutcome::Approved
        } else {
            ProposalOutcome::Rejected
        };
        Self {
            proposal,
            approve_votes,
            reject_votes,
            outcome,
            resolved_at: Utc::now(),
        }
    }

    /// Record a skipped vote as approved by the whole roster.
    pub fn auto_approved(proposal: TeamProposal, roster: Vec<PlayerId>) -> Self {
        Self {
            proposal,
            approve_votes: roster,
            reject_votes: Vec::new(),
            outcome: ProposalOutcome::AutoApproved,
            resolved_at: Utc::now(),
        }
    }
}
