//! Game configuration (Value Object)
//!
//! One immutable value per game instance. Validation happens in the
//! constructor so that holding a `GameConfiguration` is proof that the
//! player count and role combination are legal.

use super::rules::{FinalProposalRule, LeaderOrder};
use crate::core::error::ConfigurationError;
use crate::role::Role;
use serde::{Deserialize, Serialize};

/// Team size and fail threshold for one quest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestAssignment {
    /// Number of players that go on the quest
    pub required_team_size: usize,
    /// Number of fail cards that make the quest fail
    pub required_fails: usize,
}

impl QuestAssignment {
    const fn new(required_team_size: usize, required_fails: usize) -> Self {
        Self {
            required_team_size,
            required_fails,
        }
    }

    pub fn requires_two_fails(&self) -> bool {
        self.required_fails > 1
    }
}

/// Validated configuration for one game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfiguration {
    player_count: usize,
    special_roles: Vec<Role>,
    resistance: bool,
    leader_order: LeaderOrder,
    final_proposal: FinalProposalRule,
}

impl GameConfiguration {
    pub const MIN_PLAYERS: usize = 5;
    pub const MAX_PLAYERS: usize = 10;
    pub const QUEST_COUNT: usize = 5;
    pub const QUESTS_TO_WIN: usize = 3;
    pub const MAX_PROPOSAL_ATTEMPTS: u32 = 5;

    /// Create and validate a configuration.
    ///
    /// Duplicate special roles are collapsed; the first occurrence wins.
    pub fn new(
        player_count: usize,
        special_roles: Vec<Role>,
        resistance: bool,
        leader_order: LeaderOrder,
    ) -> Result<Self, ConfigurationError> {
        let mut deduped = Vec::with_capacity(special_roles.len());
        for role in special_roles {
            if !deduped.contains(&role) {
                deduped.push(role);
            }
        }

        let config = Self {
            player_count,
            special_roles: deduped,
            resistance,
            leader_order,
            final_proposal: FinalProposalRule::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Avalon defaults: Merlin only, turn order.
    pub fn standard(player_count: usize) -> Result<Self, ConfigurationError> {
        Self::new(player_count, vec![Role::Merlin], false, LeaderOrder::Turn)
    }

    /// Parse special role names, rejecting anything that is not a
    /// selectable special role.
    pub fn parse_special_roles<S: AsRef<str>>(names: &[S]) -> Result<Vec<Role>, ConfigurationError> {
        names
            .iter()
            .map(|name| {
                let role: Role = name.as_ref().parse()?;
                if role.is_selectable_special() {
                    Ok(role)
                } else {
                    Err(ConfigurationError::UnknownRole(name.as_ref().to_string()))
                }
            })
            .collect()
    }

    pub fn with_final_proposal_rule(mut self, rule: FinalProposalRule) -> Self {
        self.final_proposal = rule;
        self
    }

    fn validate(&self) -> Result<(), ConfigurationError> {
        if !(Self::MIN_PLAYERS..=Self::MAX_PLAYERS).contains(&self.player_count) {
            return Err(ConfigurationError::InvalidPlayerCount {
                count: self.player_count,
                min: Self::MIN_PLAYERS,
                max: Self::MAX_PLAYERS,
            });
        }

        if let Some(role) = self.special_roles.iter().find(|r| !r.is_selectable_special()) {
            return Err(ConfigurationError::UnknownRole(role.to_string()));
        }

        let evil_specials = self.special_roles.iter().filter(|r| r.is_evil_special()).count();
        let budget = self.evil_count();
        if evil_specials > budget {
            return Err(ConfigurationError::EvilBudgetExceeded {
                requested: evil_specials,
                budget,
                player_count: self.player_count,
            });
        }

        if !self.resistance && !self.includes(Role::Merlin) {
            return Err(ConfigurationError::MerlinRequired);
        }

        if self.includes(Role::Percival) && !self.includes(Role::Merlin) && !self.includes(Role::Morgana)
        {
            return Err(ConfigurationError::PercivalWithoutTarget);
        }

        Ok(())
    }

    pub fn player_count(&self) -> usize {
        self.player_count
    }

    pub fn special_roles(&self) -> &[Role] {
        &self.special_roles
    }

    pub fn resistance(&self) -> bool {
        self.resistance
    }

    pub fn leader_order(&self) -> LeaderOrder {
        self.leader_order
    }

    pub fn final_proposal_rule(&self) -> FinalProposalRule {
        self.final_proposal
    }

    pub fn includes(&self, role: Role) -> bool {
        self.special_roles.contains(&role)
    }

    /// Whether an assassination follows three successful quests
    pub fn has_merlin(&self) -> bool {
        self.includes(Role::Merlin)
    }

    /// Number of evil seats: 2 for 5–6 players, 3 for 7–9, 4 for 10.
    pub fn evil_count(&self) -> usize {
        evil_count_for(self.player_count)
    }

    pub fn good_count(&self) -> usize {
        self.player_count - self.evil_count()
    }

    /// The role multiset to deal for this configuration.
    ///
    /// Starts from generic good/bad slots, substitutes each special role into
    /// a slot of its faction, then (outside resistance mode) promotes one
    /// remaining generic evil slot to the assassin.
    pub fn role_assignments(&self) -> Vec<Role> {
        let evil = self.evil_count();
        let mut roles: Vec<Role> = std::iter::repeat_n(Role::Bad, evil)
            .chain(std::iter::repeat_n(Role::Good, self.player_count - evil))
            .collect();

        for special in &self.special_roles {
            let generic = if special.is_evil() { Role::Bad } else { Role::Good };
            if let Some(slot) = roles.iter_mut().find(|r| **r == generic) {
                *slot = *special;
            }
        }

        if !self.resistance
            && let Some(slot) = roles.iter_mut().find(|r| **r == Role::Bad)
        {
            *slot = Role::Assassin;
        }

        roles
    }

    /// The five quests for this player count.
    pub fn quest_assignments(&self) -> [QuestAssignment; 5] {
        quest_table_for(self.player_count)
    }

    pub fn quest_assignment(&self, quest_index: usize) -> Option<QuestAssignment> {
        self.quest_assignments().get(quest_index).copied()
    }
}

fn evil_count_for(player_count: usize) -> usize {
    match player_count {
        0..=6 => 2,
        7..=9 => 3,
        _ => 4,
    }
}

fn quest_table_for(player_count: usize) -> [QuestAssignment; 5] {
    #[allow(non_snake_case)]
    let Q = QuestAssignment::new;
    match player_count {
        0..=5 => [Q(2, 1), Q(3, 1), Q(2, 1), Q(3, 1), Q(3, 1)],
        6 => [Q(2, 1), Q(3, 1), Q(4, 1), Q(3, 1), Q(4, 1)],
        7 => [Q(2, 1), Q(3, 1), Q(3, 1), Q(4, 2), Q(4, 1)],
        _ => [Q(3, 1), Q(4, 1), Q(4, 1), Q(5, 2), Q(5, 1)],
    }
}
