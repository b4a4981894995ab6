//! Game state aggregate
//!
//! Owned by exactly one orchestrator and only mutated between its
//! suspension points. Once the phase reaches `GAME_ENDED` nothing here
//! changes any more.

use super::outcome::GameOutcome;
use super::phase::{GamePhase, GamePhaseManager};
use super::proposal::{ProposalHistoryEntry, TeamProposal};
use super::quest::QuestManager;
use super::role_assignment::DealtRoles;
use crate::config::GameConfiguration;
use crate::core::error::PhaseError;
use crate::core::player::{Player, PlayerId};
use crate::role::Role;

#[derive(Debug, Clone)]
pub struct GameState {
    config: GameConfiguration,
    players: Vec<Player>,
    evils: Vec<PlayerId>,
    assassin: PlayerId,
    current_leader_index: usize,
    reject_count: u32,
    quest_players: Vec<PlayerId>,
    phase: GamePhaseManager,
    quests: QuestManager,
    history: Vec<ProposalHistoryEntry>,
    outcome: Option<GameOutcome>,
}

impl GameState {
    pub fn new(config: GameConfiguration, dealt: DealtRoles) -> Self {
        let quests = QuestManager::new(&config);
        Self {
            config,
            players: dealt.players,
            evils: dealt.evils,
            assassin: dealt.assassin,
            current_leader_index: 0,
            reject_count: 0,
            quest_players: Vec::new(),
            phase: GamePhaseManager::new(),
            quests,
            history: Vec::new(),
            outcome: None,
        }
    }

    pub fn config(&self) -> &GameConfiguration {
        &self.config
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player_ids(&self) -> Vec<PlayerId> {
        self.players.iter().map(|p| p.id().clone()).collect()
    }

    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id() == id)
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn evils(&self) -> &[PlayerId] {
        &self.evils
    }

    pub fn evil_count(&self) -> usize {
        self.evils.len()
    }

    pub fn good_count(&self) -> usize {
        self.players.len() - self.evils.len()
    }

    pub fn is_evil(&self, id: &PlayerId) -> bool {
        self.evils.contains(id)
    }

    pub fn assassin(&self) -> &PlayerId {
        &self.assassin
    }

    /// Good-aligned players, in seating order: the assassin's choices
    pub fn good_players(&self) -> Vec<&Player> {
        self.players.iter().filter(|p| p.is_good()).collect()
    }

    pub fn merlin(&self) -> Option<&Player> {
        self.players.iter().find(|p| p.role() == Some(Role::Merlin))
    }

    pub fn current_leader_index(&self) -> usize {
        self.current_leader_index
    }

    pub fn current_leader(&self) -> &Player {
        &self.players[self.current_leader_index]
    }

    /// Pass leadership to the next seat, wrapping around the table.
    pub fn advance_leader(&mut self) {
        self.current_leader_index = (self.current_leader_index + 1) % self.players.len();
    }

    pub fn reject_count(&self) -> u32 {
        self.reject_count
    }

    pub fn increment_reject_count(&mut self) {
        self.reject_count += 1;
    }

    pub fn reset_reject_count(&mut self) {
        self.reject_count = 0;
    }

    /// Attempt number the next proposal for the current quest will carry.
    pub fn next_attempt_number(&self) -> u32 {
        self.reject_count + 1
    }

    pub fn quest_players(&self) -> &[PlayerId] {
        &self.quest_players
    }

    pub fn set_quest_players(&mut self, players: Vec<PlayerId>) {
        self.quest_players = players;
    }

    pub fn quests(&self) -> &QuestManager {
        &self.quests
    }

    pub fn quests_mut(&mut self) -> &mut QuestManager {
        &mut self.quests
    }

    pub fn history(&self) -> &[ProposalHistoryEntry] {
        &self.history
    }

    pub fn record_proposal(&mut self, entry: ProposalHistoryEntry) {
        self.history.push(entry);
    }

    /// Wrap a nomination by the current leader for the current quest.
    pub fn propose(&self, members: Vec<PlayerId>) -> TeamProposal {
        TeamProposal::new(
            self.current_leader().id().clone(),
            members,
            self.quests.current_quest_index(),
            self.next_attempt_number(),
        )
    }

    pub fn current_phase(&self) -> GamePhase {
        self.phase.current_phase()
    }

    pub fn is_in_phase(&self, phase: GamePhase) -> bool {
        self.phase.current_phase() == phase
    }

    pub fn can_transition_to(&self, phase: GamePhase) -> bool {
        self.phase.can_transition_to(phase)
    }

    pub fn transition_to(&mut self, phase: GamePhase) -> Result<(), PhaseError> {
        self.phase.transition_to(phase)
    }

    pub fn is_game_ended(&self) -> bool {
        self.phase.is_game_ended()
    }

    /// Move to `GAME_ENDED` through the allow-list and record the winner.
    pub fn finish(&mut self, outcome: GameOutcome) -> Result<(), PhaseError> {
        self.phase.transition_to(GamePhase::GameEnded)?;
        self.outcome = Some(outcome);
        Ok(())
    }

    /// Abort path: end the game without a winner.
    pub fn force_end(&mut self) {
        self.phase.force_end();
    }

    pub fn outcome(&self) -> Option<&GameOutcome> {
        self.outcome.as_ref()
    }
}
