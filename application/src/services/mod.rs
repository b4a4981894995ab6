//! One round of voting or questing, built on [`ActionCollector`](crate::collector::ActionCollector)

pub mod quest_execution;
pub mod team_voting;

use crate::collector::CollectError;
use crate::ports::error::PortError;
use crate::ports::messenger::{MessageHandle, MessageTarget, MessengerPort};
use crate::ports::notice::Notice;
use avalon_domain::PlayerId;
use futures::future::try_join_all;
use thiserror::Error;

/// Errors aborting a round in flight
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoundError {
    #[error("Collaborator error: {0}")]
    Port(#[from] PortError),

    #[error("Collection error: {0}")]
    Collect(#[from] CollectError),
}

/// Post one notice per player, built by `notice_for`, and keep the handles.
pub(crate) async fn post_to_each<F>(
    messenger: &dyn MessengerPort,
    players: &[PlayerId],
    notice_for: F,
) -> Result<Vec<MessageHandle>, PortError>
where
    F: Fn(&PlayerId) -> Notice,
{
    let targets: Vec<(MessageTarget, Notice)> = players
        .iter()
        .map(|p| (MessageTarget::player(p), notice_for(p)))
        .collect();
    try_join_all(
        targets
            .iter()
            .map(|(target, notice)| messenger.post_message(target, notice)),
    )
    .await
}

/// Replace every handle's content with the same notice.
pub(crate) async fn update_all(
    messenger: &dyn MessengerPort,
    handles: &[MessageHandle],
    notice: &Notice,
) -> Result<(), PortError> {
    try_join_all(
        handles
            .iter()
            .map(|handle| messenger.update_message(handle, notice)),
    )
    .await?;
    Ok(())
}
