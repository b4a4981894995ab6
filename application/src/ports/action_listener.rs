//! Action listener port
//!
//! Inbound button/action events. One listener is registered per action key
//! for the duration of a round; handlers are plain synchronous callbacks so
//! that listeners can be removed from `Drop`.

use super::error::PortError;
use std::sync::Arc;

/// Action key of team vote buttons
pub const TEAM_VOTE_ACTION: &str = "team-vote";

/// Action key of quest succeed/fail buttons
pub const QUEST_VOTE_ACTION: &str = "quest-vote";

pub const APPROVE_PAYLOAD: &str = "approve";
pub const REJECT_PAYLOAD: &str = "reject";
pub const SUCCEED_PAYLOAD: &str = "succeed";
pub const FAIL_PAYLOAD: &str = "fail";

/// Identity of whoever pressed the button, as the host platform knows them.
///
/// Distinct from [`PlayerId`](avalon_domain::PlayerId): one actor may control
/// several seats in constrained setups.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActorId(String);

impl ActorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ActorId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// One delivered action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionEvent {
    pub actor: ActorId,
    pub payload: String,
}

impl ActionEvent {
    pub fn new(actor: impl Into<ActorId>, payload: impl Into<String>) -> Self {
        Self {
            actor: actor.into(),
            payload: payload.into(),
        }
    }
}

/// Registration handle returned by [`ActionListenerPort::add_action_listener`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

pub type ActionHandler = Arc<dyn Fn(ActionEvent) + Send + Sync>;

pub trait ActionListenerPort: Send + Sync {
    fn add_action_listener(
        &self,
        action_key: &str,
        handler: ActionHandler,
    ) -> Result<ListenerId, PortError>;

    /// Removing an unknown or already removed listener is a no-op.
    fn remove_action_listener(&self, listener: ListenerId);
}
