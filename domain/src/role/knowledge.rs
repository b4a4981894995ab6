//! What each player learns privately when roles are dealt

use super::Role;
use crate::core::player::{Player, PlayerId};
use serde::{Deserialize, Serialize};

/// The private insight a role grants at the start of the game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Insight {
    /// Plain servants and Oberon learn nothing
    Nothing,
    /// Merlin: the evil players he can see
    Evils {
        players: Vec<PlayerId>,
        mordred_hidden: bool,
    },
    /// Percival: one of these is Merlin (two candidates when Morgana plays)
    MerlinCandidates { players: Vec<PlayerId> },
    /// Evil players other than Oberon: the teammates they know
    Teammates {
        players: Vec<PlayerId>,
        oberon_hidden: bool,
    },
}

/// Private briefing for one player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleKnowledge {
    pub player: PlayerId,
    pub role: Role,
    /// Set when this player carries the assassin duty
    pub is_assassin: bool,
    pub insight: Insight,
}

impl RoleKnowledge {
    /// Compute the briefing for `player`. Returns `None` if no role was dealt.
    pub fn for_player(player: &Player, players: &[Player], assassin: &PlayerId) -> Option<Self> {
        let role = player.role()?;
        let others = || players.iter().filter(move |p| p.id() != player.id());

        let insight = match role {
            Role::Merlin => {
                let evils: Vec<&Player> = players.iter().filter(|p| p.is_evil()).collect();
                let visible: Vec<PlayerId> = evils
                    .iter()
                    .filter(|p| p.is_visible_to_merlin())
                    .map(|p| p.id().clone())
                    .collect();
                Insight::Evils {
                    mordred_hidden: visible.len() < evils.len(),
                    players: visible,
                }
            }
            Role::Percival => {
                let candidates: Vec<PlayerId> = others()
                    .filter(|p| matches!(p.role(), Some(Role::Merlin | Role::Morgana)))
                    .map(|p| p.id().clone())
                    .collect();
                if candidates.is_empty() {
                    Insight::Nothing
                } else {
                    Insight::MerlinCandidates {
                        players: candidates,
                    }
                }
            }
            Role::Bad | Role::Morgana | Role::Mordred | Role::Assassin => {
                let teammates: Vec<PlayerId> = others()
                    .filter(|p| p.is_known_to_other_evils())
                    .map(|p| p.id().clone())
                    .collect();
                Insight::Teammates {
                    players: teammates,
                    oberon_hidden: players.iter().any(|p| p.role() == Some(Role::Oberon)),
                }
            }
            Role::Good | Role::Oberon => Insight::Nothing,
        };

        Some(Self {
            player: player.id().clone(),
            role,
            is_assassin: player.id() == assassin,
            insight,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Vec<Player> {
        vec![
            Player::with_role("merlin", Role::Merlin),
            Player::with_role("percival", Role::Percival),
            Player::with_role("servant", Role::Good),
            Player::with_role("morgana", Role::Morgana),
            Player::with_role("mordred", Role::Mordred),
            Player::with_role("oberon", Role::Oberon),
            Player::with_role("minion", Role::Assassin),
        ]
    }

    fn ids(names: &[&str]) -> Vec<PlayerId> {
        names.iter().map(|n| PlayerId::from(*n)).collect()
    }

    fn knowledge(name: &str) -> RoleKnowledge {
        let players = table();
        let player = players.iter().find(|p| p.id().as_str() == name).unwrap();
        RoleKnowledge::for_player(player, &players, &PlayerId::from("minion")).unwrap()
    }

    #[test]
    fn test_merlin_does_not_see_mordred() {
        assert_eq!(
            knowledge("merlin").insight,
            Insight::Evils {
                players: ids(&["morgana", "oberon", "minion"]),
                mordred_hidden: true,
            }
        );
    }

    #[test]
    fn test_percival_sees_both_candidates() {
        assert_eq!(
            knowledge("percival").insight,
            Insight::MerlinCandidates {
                players: ids(&["merlin", "morgana"]),
            }
        );
    }

    #[test]
    fn test_evils_do_not_see_oberon() {
        assert_eq!(
            knowledge("mordred").insight,
            Insight::Teammates {
                players: ids(&["morgana", "minion"]),
                oberon_hidden: true,
            }
        );
    }

    #[test]
    fn test_oberon_and_servant_learn_nothing() {
        assert_eq!(knowledge("oberon").insight, Insight::Nothing);
        assert_eq!(knowledge("servant").insight, Insight::Nothing);
    }

    #[test]
    fn test_assassin_flag() {
        assert!(knowledge("minion").is_assassin);
        assert!(!knowledge("morgana").is_assassin);
    }

    #[test]
    fn test_no_role_no_briefing() {
        let unassigned = Player::new("x");
        assert!(RoleKnowledge::for_player(&unassigned, &[], &PlayerId::from("y")).is_none());
    }
}
