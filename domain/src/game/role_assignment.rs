//! Dealing roles onto a roster

use crate::config::{GameConfiguration, LeaderOrder};
use crate::core::error::AssignmentError;
use crate::core::player::{Player, PlayerId};
use crate::role::Role;
use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};
use std::collections::HashSet;

/// Result of dealing roles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DealtRoles {
    /// Every player, in seating order, with a role
    pub players: Vec<Player>,
    /// Evil-aligned players, in seating order
    pub evils: Vec<PlayerId>,
    pub assassin: PlayerId,
}

/// Shuffles the configured role multiset onto players
#[derive(Debug, Clone)]
pub struct RoleAssignmentService {
    config: GameConfiguration,
}

impl RoleAssignmentService {
    pub fn new(config: GameConfiguration) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GameConfiguration {
        &self.config
    }

    /// Apply the configured leader order to the join order.
    pub fn arrange_seating<R: Rng + ?Sized>(&self, mut players: Vec<Player>, rng: &mut R) -> Vec<Player> {
        if self.config.leader_order() == LeaderOrder::Random {
            players.shuffle(rng);
        }
        players
    }

    /// Deal a uniformly shuffled role multiset onto `players`, keeping their order.
    pub fn assign_roles<R: Rng + ?Sized>(
        &self,
        mut players: Vec<Player>,
        rng: &mut R,
    ) -> Result<DealtRoles, AssignmentError> {
        let expected = self.config.player_count();
        if players.len() != expected {
            return Err(AssignmentError::RosterSizeMismatch {
                expected,
                actual: players.len(),
            });
        }

        let mut seen = HashSet::with_capacity(players.len());
        if let Some(duplicate) = players.iter().find(|p| !seen.insert(p.id().clone())) {
            return Err(AssignmentError::DuplicatePlayer(duplicate.id().to_string()));
        }

        let mut roles = self.config.role_assignments();
        roles.shuffle(rng);

        for (player, role) in players.iter_mut().zip(roles) {
            if let Err(existing) = player.assign_role(role) {
                return Err(AssignmentError::AlreadyAssigned {
                    player: player.id().to_string(),
                    role: existing,
                });
            }
        }

        let evils: Vec<PlayerId> = players
            .iter()
            .filter(|p| p.is_evil())
            .map(|p| p.id().clone())
            .collect();

        let assassin = select_assassin(&players, rng).ok_or(AssignmentError::NoEvilPlayers)?;

        Ok(DealtRoles {
            players,
            evils,
            assassin,
        })
    }
}

/// The dealt assassin if any; otherwise a random plain minion, falling back
/// to any evil player.
fn select_assassin<R: Rng + ?Sized>(players: &[Player], rng: &mut R) -> Option<PlayerId> {
    if let Some(holder) = players.iter().find(|p| p.role() == Some(Role::Assassin)) {
        return Some(holder.id().clone());
    }

    let minions: Vec<&Player> = players
        .iter()
        .filter(|p| p.role() == Some(Role::Bad))
        .collect();
    if let Some(chosen) = minions.choose(rng) {
        return Some(chosen.id().clone());
    }

    let evils: Vec<&Player> = players.iter().filter(|p| p.is_evil()).collect();
    evils.choose(rng).map(|p| p.id().clone())
}
