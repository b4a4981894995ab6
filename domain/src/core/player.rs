//! Player entity and identifiers

use crate::role::{Faction, Role};
use serde::{Deserialize, Serialize};

/// Identifier of a roster seat (Value Object)
///
/// Seats are what the game reasons about: leaders, team members, voters.
/// Which external actor controls a seat is an adapter concern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for PlayerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A participant in one game (Entity)
///
/// Created at game start without a role; the role is dealt exactly once by
/// [`RoleAssignmentService`](crate::RoleAssignmentService) and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    id: PlayerId,
    role: Option<Role>,
}

impl Player {
    pub fn new(id: impl Into<PlayerId>) -> Self {
        Self {
            id: id.into(),
            role: None,
        }
    }

    pub fn with_role(id: impl Into<PlayerId>, role: Role) -> Self {
        Self {
            id: id.into(),
            role: Some(role),
        }
    }

    pub fn from_ids<I, S>(ids: I) -> Vec<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<PlayerId>,
    {
        ids.into_iter().map(Self::new).collect()
    }

    pub fn id(&self) -> &PlayerId {
        &self.id
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn has_role(&self) -> bool {
        self.role.is_some()
    }

    /// Deal a role. Returns the role already held if one was dealt before.
    pub(crate) fn assign_role(&mut self, role: Role) -> Result<(), Role> {
        match self.role {
            Some(existing) => Err(existing),
            None => {
                self.role = Some(role);
                Ok(())
            }
        }
    }

    /// A player without a role is not evil.
    pub fn is_evil(&self) -> bool {
        self.role.is_some_and(|r| r.faction() == Faction::Evil)
    }

    pub fn is_good(&self) -> bool {
        !self.is_evil()
    }

    /// Only evil-aligned players may submit a fail on a quest.
    pub fn can_fail_quests(&self) -> bool {
        self.is_evil()
    }

    pub fn is_known_to_other_evils(&self) -> bool {
        self.is_evil() && self.role != Some(Role::Oberon)
    }

    pub fn is_visible_to_merlin(&self) -> bool {
        self.is_evil() && self.role != Some(Role::Mordred)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_without_role_is_good() {
        let player = Player::new("alice");
        assert!(!player.has_role());
        assert!(!player.is_evil());
        assert!(player.is_good());
    }

    #[test]
    fn test_alignment_follows_role() {
        for role in [Role::Good, Role::Merlin, Role::Percival] {
            assert!(Player::with_role("p", role).is_good(), "{role:?}");
        }
        for role in [
            Role::Bad,
            Role::Morgana,
            Role::Mordred,
            Role::Oberon,
            Role::Assassin,
        ] {
            assert!(Player::with_role("p", role).is_evil(), "{role:?}");
        }
    }

    #[test]
    fn test_visibility_rules() {
        let oberon = Player::with_role("o", Role::Oberon);
        assert!(!oberon.is_known_to_other_evils());
        assert!(oberon.is_visible_to_merlin());

        let mordred = Player::with_role("m", Role::Mordred);
        assert!(mordred.is_known_to_other_evils());
        assert!(!mordred.is_visible_to_merlin());

        let merlin = Player::with_role("x", Role::Merlin);
        assert!(!merlin.is_known_to_other_evils());
        assert!(!merlin.can_fail_quests());
    }

    #[test]
    fn test_role_assigned_once() {
        let mut player = Player::new("alice");
        assert!(player.assign_role(Role::Merlin).is_ok());
        assert_eq!(player.assign_role(Role::Bad), Err(Role::Merlin));
        assert_eq!(player.role(), Some(Role::Merlin));
    }

    #[test]
    fn test_from_ids_preserves_order() {
        let players = Player::from_ids(["c", "a", "b"]);
        let ids: Vec<&str> = players.iter().map(|p| p.id().as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }
}
