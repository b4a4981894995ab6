//! Decision port
//!
//! Single-shot multi-select choice, used for team nomination and the
//! assassin's guess. Repeated per-player votes never go through here; they
//! use the action listener port.

use super::error::PortError;
use super::messenger::MessageTarget;
use async_trait::async_trait;
use avalon_domain::PlayerId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionRequest {
    /// Where the choice is presented
    pub target: MessageTarget,
    pub prompt: String,
    pub options: Vec<String>,
    /// Label of the confirm button ("Nominate", "Assassinate")
    pub verb: String,
    /// The only player allowed to answer
    pub chooser: PlayerId,
    pub min: usize,
    pub max: usize,
}

#[async_trait]
pub trait DecisionPort: Send + Sync {
    /// Wait for the chooser's answer. Returns indexes into `request.options`.
    async fn poll_for_decision(&self, request: DecisionRequest) -> Result<Vec<usize>, PortError>;
}
