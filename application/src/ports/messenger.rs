//! Messenger port
//!
//! Outbound notifications. Content is an opaque [`Notice`]; rendering it is
//! entirely the adapter's business.

use super::error::PortError;
use super::notice::Notice;
use async_trait::async_trait;
use avalon_domain::PlayerId;

/// Where a notice is delivered
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MessageTarget {
    /// The shared channel everyone reads
    Table,
    /// A private conversation with one player
    Player(PlayerId),
}

impl MessageTarget {
    pub fn player(id: &PlayerId) -> Self {
        MessageTarget::Player(id.clone())
    }
}

impl std::fmt::Display for MessageTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageTarget::Table => write!(f, "table"),
            MessageTarget::Player(id) => write!(f, "@{}", id),
        }
    }
}

/// Handle of a posted message, used to update it in place
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageHandle {
    pub target: MessageTarget,
    pub id: String,
}

impl MessageHandle {
    pub fn new(target: MessageTarget, id: impl Into<String>) -> Self {
        Self {
            target,
            id: id.into(),
        }
    }
}

#[async_trait]
pub trait MessengerPort: Send + Sync {
    /// Post a new message
    async fn post_message(
        &self,
        target: &MessageTarget,
        notice: &Notice,
    ) -> Result<MessageHandle, PortError>;

    /// Replace the content of a message posted earlier
    async fn update_message(&self, handle: &MessageHandle, notice: &Notice)
    -> Result<(), PortError>;
}
