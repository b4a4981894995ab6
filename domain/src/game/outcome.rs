//! Final game result

use crate::core::player::PlayerId;
use crate::role::Faction;
use serde::{Deserialize, Serialize};

/// Why the game ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum WinReason {
    /// Three quests failed
    QuestsFailed,
    /// Three quests succeeded and there was no Merlin to hunt
    QuestsSucceeded,
    /// Five proposals in a row were rejected for the same quest
    ProposalsRejected,
    /// The assassin named Merlin
    MerlinAssassinated { target: PlayerId },
    /// The assassin named someone else
    MerlinSurvived { target: PlayerId },
}

impl WinReason {
    pub fn description(&self) -> String {
        match self {
            WinReason::QuestsFailed => "failing 3 quests".to_string(),
            WinReason::QuestsSucceeded => "succeeding 3 quests".to_string(),
            WinReason::ProposalsRejected => "rejecting 5 proposals in a row".to_string(),
            WinReason::MerlinAssassinated { target } => {
                format!("assassinating Merlin ({})", target)
            }
            WinReason::MerlinSurvived { target } => {
                format!("protecting Merlin (the assassin chose {})", target)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOutcome {
    pub winner: Faction,
    pub reason: WinReason,
}

impl GameOutcome {
    pub fn new(winner: Faction, reason: WinReason) -> Self {
        Self { winner, reason }
    }

    pub fn evil(reason: WinReason) -> Self {
        Self::new(Faction::Evil, reason)
    }

    pub fn good(reason: WinReason) -> Self {
        Self::new(Faction::Good, reason)
    }
}

impl std::fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} win by {}", self.winner, self.reason.description())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let outcome = GameOutcome::evil(WinReason::MerlinAssassinated {
            target: "alice".into(),
        });
        assert_eq!(
            outcome.to_string(),
            "Minions of Mordred win by assassinating Merlin (alice)"
        );
        assert_eq!(
            GameOutcome::good(WinReason::QuestsSucceeded).to_string(),
            "Loyal Servants of Arthur win by succeeding 3 quests"
        );
    }
}
