//! Roles and factions
//!
//! The role set is closed. Every lookup that depends on a role is an
//! exhaustive `match`, so adding a variant is a compile error everywhere a
//! table needs a new row.

pub mod knowledge;

use crate::core::error::ConfigurationError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The two hidden factions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Faction {
    Good,
    Evil,
}

impl Faction {
    pub fn display_name(&self) -> &'static str {
        match self {
            Faction::Good => "Loyal Servants of Arthur",
            Faction::Evil => "Minions of Mordred",
        }
    }
}

impl std::fmt::Display for Faction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A role dealt to a player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Loyal Servant of Arthur
    Good,
    /// Minion of Mordred
    Bad,
    /// Sees every evil player except Mordred
    Merlin,
    /// Sees Merlin (and Morgana, without telling them apart)
    Percival,
    /// Evil; appears as Merlin to Percival
    Morgana,
    /// Evil; hidden from Merlin
    Mordred,
    /// Evil; unknown to the other evils and blind to them
    Oberon,
    /// Evil; gets the final shot at Merlin
    Assassin,
}

impl Role {
    pub const ALL: [Role; 8] = [
        Role::Good,
        Role::Bad,
        Role::Merlin,
        Role::Percival,
        Role::Morgana,
        Role::Mordred,
        Role::Oberon,
        Role::Assassin,
    ];

    pub fn faction(&self) -> Faction {
        match self {
            Role::Good | Role::Merlin | Role::Percival => Faction::Good,
            Role::Bad | Role::Morgana | Role::Mordred | Role::Oberon | Role::Assassin => {
                Faction::Evil
            }
        }
    }

    pub fn is_evil(&self) -> bool {
        self.faction() == Faction::Evil
    }

    /// Roles that may be requested in a configuration's special-role list.
    pub fn is_selectable_special(&self) -> bool {
        match self {
            Role::Merlin | Role::Percival | Role::Morgana | Role::Mordred | Role::Oberon => true,
            Role::Good | Role::Bad | Role::Assassin => false,
        }
    }

    /// Special roles that consume a slot of the evil budget.
    pub fn is_evil_special(&self) -> bool {
        self.is_selectable_special() && self.is_evil()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Good => "good",
            Role::Bad => "bad",
            Role::Merlin => "merlin",
            Role::Percival => "percival",
            Role::Morgana => "morgana",
            Role::Mordred => "mordred",
            Role::Oberon => "oberon",
            Role::Assassin => "assassin",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Role::Good => "Loyal Servant of Arthur",
            Role::Bad => "Minion of Mordred",
            Role::Merlin => "MERLIN",
            Role::Percival => "PERCIVAL",
            Role::Morgana => "MORGANA",
            Role::Mordred => "MORDRED",
            Role::Oberon => "OBERON",
            Role::Assassin => "THE ASSASSIN",
        }
    }

    /// One-line objective shown in the role briefing
    pub fn objective(&self) -> &'static str {
        match self {
            Role::Merlin => {
                "Use your knowledge wisely, but don't reveal yourself or the Assassin will kill you!"
            }
            Role::Percival => "Protect Merlin's identity while helping good prevail.",
            Role::Morgana => "Pretend to be Merlin to confuse Percival.",
            Role::Mordred => "You are hidden from Merlin. Use this to your advantage!",
            Role::Oberon => {
                "You work alone. Sow chaos without revealing yourself to other evil players."
            }
            Role::Assassin => "Sabotage quests and identify Merlin for the final kill.",
            Role::Bad => "Sabotage quests to make them fail. Work with your evil teammates.",
            Role::Good => "Choose teams wisely and make quests succeed!",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == normalized)
            .ok_or_else(|| ConfigurationError::UnknownRole(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factions() {
        let good: Vec<Role> = Role::ALL
            .into_iter()
            .filter(|r| r.faction() == Faction::Good)
            .collect();
        assert_eq!(good, vec![Role::Good, Role::Merlin, Role::Percival]);
    }

    #[test]
    fn test_role_parse_roundtrip() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert_eq!(" Morgana ".parse::<Role>().unwrap(), Role::Morgana);
    }

    #[test]
    fn test_role_parse_unknown() {
        let err = "lady".parse::<Role>().unwrap_err();
        assert_eq!(err, ConfigurationError::UnknownRole("lady".to_string()));
    }

    #[test]
    fn test_selectable_specials() {
        assert!(Role::Merlin.is_selectable_special());
        assert!(!Role::Assassin.is_selectable_special());
        assert!(!Role::Good.is_selectable_special());
        assert!(Role::Oberon.is_evil_special());
        assert!(!Role::Percival.is_evil_special());
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Role::Percival).unwrap();
        assert_eq!(json, "\"percival\"");
    }
}
