//! Small rule-choice value objects carried by a game configuration

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How the seating (and so the leader rotation) is ordered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaderOrder {
    /// Keep the join order
    #[default]
    Turn,
    /// Shuffle the seating once before roles are dealt
    Random,
}

impl FromStr for LeaderOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "turn" => Ok(LeaderOrder::Turn),
            "random" => Ok(LeaderOrder::Random),
            other => Err(format!("unknown leader order '{}'", other)),
        }
    }
}

/// What happens to the fifth proposal for the same quest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinalProposalRule {
    /// Voting is skipped and the team goes on the quest
    #[default]
    AutoApprove,
    /// The team is voted on as usual; a fifth rejection hands evil the win
    EvilWins,
}

impl FromStr for FinalProposalRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "auto_approve" => Ok(FinalProposalRule::AutoApprove),
            "evil_wins" => Ok(FinalProposalRule::EvilWins),
            other => Err(format!("unknown final proposal rule '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(LeaderOrder::default(), LeaderOrder::Turn);
        assert_eq!(FinalProposalRule::default(), FinalProposalRule::AutoApprove);
    }

    #[test]
    fn test_parse() {
        assert_eq!("Random".parse::<LeaderOrder>().unwrap(), LeaderOrder::Random);
        assert_eq!(
            "evil-wins".parse::<FinalProposalRule>().unwrap(),
            FinalProposalRule::EvilWins
        );
        assert!("sideways".parse::<LeaderOrder>().is_err());
    }
}
