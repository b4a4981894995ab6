//! Game phase state machine

use crate::core::error::PhaseError;
use serde::{Deserialize, Serialize};

/// Phase of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GamePhase {
    #[default]
    NotStarted,
    RoleAssignment,
    /// The current leader is nominating a team
    TeamSelection,
    /// Everyone votes on the nominated team
    TeamVoting,
    /// The team plays succeed/fail cards
    QuestExecution,
    /// The assassin gets one guess at Merlin
    Assassination,
    /// Terminal; no outgoing edges
    GameEnded,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::NotStarted => "NOT_STARTED",
            GamePhase::RoleAssignment => "ROLE_ASSIGNMENT",
            GamePhase::TeamSelection => "TEAM_SELECTION",
            GamePhase::TeamVoting => "TEAM_VOTING",
            GamePhase::QuestExecution => "QUEST_EXECUTION",
            GamePhase::Assassination => "ASSASSINATION",
            GamePhase::GameEnded => "GAME_ENDED",
        }
    }

    /// Phases reachable from this one through `transition_to`
    pub fn successors(&self) -> &'static [GamePhase] {
        match self {
            GamePhase::NotStarted => &[GamePhase::RoleAssignment],
            GamePhase::RoleAssignment => &[GamePhase::TeamSelection],
            GamePhase::TeamSelection => &[GamePhase::TeamVoting, GamePhase::GameEnded],
            GamePhase::TeamVoting => &[GamePhase::TeamSelection, GamePhase::QuestExecution],
            GamePhase::QuestExecution => &[
                GamePhase::TeamSelection,
                GamePhase::Assassination,
                GamePhase::GameEnded,
            ],
            GamePhase::Assassination => &[GamePhase::GameEnded],
            GamePhase::GameEnded => &[],
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.successors().is_empty()
    }
}

impl std::fmt::Display for GamePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Gatekeeper for phase transitions
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GamePhaseManager {
    current: GamePhase,
}

impl GamePhaseManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_phase(&self) -> GamePhase {
        self.current
    }

    pub fn can_transition_to(&self, next: GamePhase) -> bool {
        self.current.successors().contains(&next)
    }

    pub fn valid_transitions(&self) -> &'static [GamePhase] {
        self.current.successors()
    }

    /// Move to `next` if the edge is allowed; otherwise leave the phase as is.
    pub fn transition_to(&mut self, next: GamePhase) -> Result<(), PhaseError> {
        if !self.can_transition_to(next) {
            return Err(PhaseError {
                from: self.current,
                to: next,
            });
        }
        self.current = next;
        Ok(())
    }

    /// Jump straight to `GAME_ENDED`, bypassing the allow-list.
    pub fn force_end(&mut self) {
        self.current = GamePhase::GameEnded;
    }

    pub fn is_game_ended(&self) -> bool {
        self.current == GamePhase::GameEnded
    }
}
