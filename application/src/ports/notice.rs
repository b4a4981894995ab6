//! Notice content model
//!
//! Everything the engine tells players is one of these values. The engine
//! never builds display text; presentation adapters render notices however
//! their medium requires.

use avalon_domain::{
    GameOutcome, Player, PlayerId, ProposalHistoryEntry, QuestBoardEntry, QuestOutcome, Role,
    RoleKnowledge, TeamProposal,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Posted to the table once roles are dealt
    GameStarted {
        players: Vec<PlayerId>,
        special_roles: Vec<Role>,
        resistance: bool,
        evil_count: usize,
        board: Vec<QuestBoardEntry>,
    },
    /// Private: what this player's role lets them know
    RoleBriefing(RoleKnowledge),
    /// The current leader is choosing a team
    LeaderNominating {
        leader: PlayerId,
        quest_number: usize,
        attempt: u32,
        team_size: usize,
        requires_two_fails: bool,
        board: Vec<QuestBoardEntry>,
    },
    /// Posted to each player; they answer with approve/reject actions
    TeamVoteOpened { proposal: TeamProposal },
    /// Replaces `TeamVoteOpened` as votes arrive. Votes stay secret until resolved.
    TeamVoteProgress {
        proposal: TeamProposal,
        voted: Vec<PlayerId>,
        pending: Vec<PlayerId>,
    },
    /// Votes revealed
    TeamVoteResolved { entry: ProposalHistoryEntry },
    /// Posted to each player; team members answer with succeed/fail actions
    QuestStarted {
        quest_number: usize,
        leader: PlayerId,
        team: Vec<PlayerId>,
        requires_two_fails: bool,
    },
    QuestProgress {
        quest_number: usize,
        team: Vec<PlayerId>,
        completed: Vec<PlayerId>,
    },
    /// Only the result and fail count are public
    QuestResolved {
        quest_number: usize,
        outcome: QuestOutcome,
        board: Vec<QuestBoardEntry>,
    },
    AssassinationStarted {
        assassin: PlayerId,
        candidates: Vec<PlayerId>,
    },
    /// Final result with every role revealed
    GameOver {
        outcome: GameOutcome,
        players: Vec<Player>,
    },
}

impl Notice {
    /// Short description, used by adapters as fallback text
    pub fn headline(&self) -> String {
        match self {
            Notice::GameStarted { players, .. } => {
                format!("Game started with {} players", players.len())
            }
            Notice::RoleBriefing(knowledge) => {
                format!("You are {}", knowledge.role.display_name())
            }
            Notice::LeaderNominating {
                leader,
                quest_number,
                ..
            } => format!("{} is choosing the team for quest {}", leader, quest_number + 1),
            Notice::TeamVoteOpened { proposal } | Notice::TeamVoteProgress { proposal, .. } => {
                format!("Team vote for quest {}", proposal.quest_number() + 1)
            }
            Notice::TeamVoteResolved { entry } => format!(
                "Team vote result for quest {}",
                entry.proposal.quest_number() + 1
            ),
            Notice::QuestStarted { quest_number, .. } | Notice::QuestProgress { quest_number, .. } => {
                format!("Quest {} in progress", quest_number + 1)
            }
            Notice::QuestResolved { quest_number, outcome, .. } => {
                format!("Quest {}: {}", quest_number + 1, outcome.summary())
            }
            Notice::AssassinationStarted { assassin, .. } => {
                format!("{} is choosing whom to assassinate", assassin)
            }
            Notice::GameOver { outcome, .. } => outcome.to_string(),
        }
    }
}
