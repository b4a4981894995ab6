//! Team voting round
//!
//! Every player votes approve/reject on the nominated team. A tie is a
//! rejection: approval needs a strict majority.

use super::{RoundError, post_to_each, update_all};
use crate::collector::{ActionCollector, CollectorProgress, IdentityResolver, RoundPolicy};
use crate::ports::action_listener::{
    APPROVE_PAYLOAD, ActionListenerPort, REJECT_PAYLOAD, TEAM_VOTE_ACTION,
};
use crate::ports::messenger::MessengerPort;
use crate::ports::notice::Notice;
use avalon_domain::{PlayerId, ProposalHistoryEntry, TeamProposal};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// One accepted vote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamVote {
    pub player: PlayerId,
    pub approve: bool,
}

/// Resolved team vote, kept for the audit trail
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamVoteResult {
    pub approved: bool,
    pub approve_votes: Vec<PlayerId>,
    pub reject_votes: Vec<PlayerId>,
}

impl TeamVoteResult {
    /// Partition votes (kept in completion order) and apply the majority rule.
    pub fn from_votes(votes: Vec<TeamVote>) -> Self {
        let (approve, reject): (Vec<TeamVote>, Vec<TeamVote>) =
            votes.into_iter().partition(|v| v.approve);
        let approve_votes: Vec<PlayerId> = approve.into_iter().map(|v| v.player).collect();
        let reject_votes: Vec<PlayerId> = reject.into_iter().map(|v| v.player).collect();
        Self {
            approved: approve_votes.len() > reject_votes.len(),
            approve_votes,
            reject_votes,
        }
    }

    pub fn into_history_entry(self, proposal: TeamProposal) -> ProposalHistoryEntry {
        ProposalHistoryEntry::voted(proposal, self.approve_votes, self.reject_votes)
    }
}

fn parse_vote(payload: &str) -> Option<bool> {
    match payload.trim().to_lowercase().as_str() {
        APPROVE_PAYLOAD => Some(true),
        REJECT_PAYLOAD => Some(false),
        _ => None,
    }
}

pub struct TeamVotingService {
    messenger: Arc<dyn MessengerPort>,
    listeners: Arc<dyn ActionListenerPort>,
    policy: RoundPolicy,
    resolver: Option<IdentityResolver>,
}

impl TeamVotingService {
    pub fn new(messenger: Arc<dyn MessengerPort>, listeners: Arc<dyn ActionListenerPort>) -> Self {
        Self {
            messenger,
            listeners,
            policy: RoundPolicy::default(),
            resolver: None,
        }
    }

    pub fn with_policy(mut self, policy: RoundPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_identity_resolver(mut self, resolver: IdentityResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Run one vote on `proposal` across the whole roster.
    pub async fn vote_on_team(
        &self,
        proposal: &TeamProposal,
        roster: &[PlayerId],
    ) -> Result<TeamVoteResult, RoundError> {
        info!(
            "Team vote for quest {} (attempt {}): {:?}",
            proposal.quest_number() + 1,
            proposal.attempt_number(),
            proposal.member_ids()
        );

        let opened = Notice::TeamVoteOpened {
            proposal: proposal.clone(),
        };
        let handles = post_to_each(self.messenger.as_ref(), roster, |_| opened.clone()).await?;

        let mut collector = ActionCollector::new(
            Arc::clone(&self.listeners),
            TEAM_VOTE_ACTION,
            roster,
        )
        .with_policy(self.policy.clone());
        if let Some(resolver) = &self.resolver {
            collector = collector.with_identity_resolver(Arc::clone(resolver));
        }

        let (updates_tx, mut updates) = mpsc::unbounded_channel::<CollectorProgress>();
        collector.start(
            |player: &PlayerId, payload: &str| {
                parse_vote(payload).map(|approve| TeamVote {
                    player: player.clone(),
                    approve,
                })
            },
            move |progress: &CollectorProgress| {
                let _ = updates_tx.send(progress.clone());
            },
        )?;

        let progress_notice = |progress: &CollectorProgress| Notice::TeamVoteProgress {
            proposal: proposal.clone(),
            voted: progress.completed.clone(),
            pending: progress.pending.clone(),
        };

        let votes = {
            let wait = collector.wait_for_all();
            tokio::pin!(wait);
            loop {
                tokio::select! {
                    votes = &mut wait => break votes?,
                    Some(progress) = updates.recv() => {
                        update_all(self.messenger.as_ref(), &handles, &progress_notice(&progress)).await?;
                    }
                }
            }
        };
        while let Ok(progress) = updates.try_recv() {
            update_all(self.messenger.as_ref(), &handles, &progress_notice(&progress)).await?;
        }

        let result = TeamVoteResult::from_votes(votes);
        debug!(
            "Team vote tally: {} approve, {} reject",
            result.approve_votes.len(),
            result.reject_votes.len()
        );

        let resolved = Notice::TeamVoteResolved {
            entry: result.clone().into_history_entry(proposal.clone()),
        };
        update_all(self.messenger.as_ref(), &handles, &resolved).await?;

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::CollectError;
    use crate::ports::action_listener::ActionEvent;
    use crate::ports::error::PortError;
    use crate::testing::{MockBus, RecordingMessenger};
    use std::time::Duration;

    fn roster() -> Vec<PlayerId> {
        ["a", "b", "c", "d"].iter().map(|n| PlayerId::from(*n)).collect()
    }

    fn proposal() -> TeamProposal {
        TeamProposal::new("a".into(), vec!["a".into(), "b".into()], 0, 1)
    }

    fn scripted(votes: &'static [(&'static str, &'static str)]) -> Arc<MockBus> {
        Arc::new(MockBus::with_responder(move |key| {
            assert_eq!(key, TEAM_VOTE_ACTION);
            votes
                .iter()
                .map(|(actor, payload)| ActionEvent::new(*actor, *payload))
                .collect()
        }))
    }

    #[test]
    fn test_tie_is_rejection() {
        let votes = vec![
            TeamVote { player: "a".into(), approve: true },
            TeamVote { player: "b".into(), approve: false },
            TeamVote { player: "c".into(), approve: true },
            TeamVote { player: "d".into(), approve: false },
        ];
        let result = TeamVoteResult::from_votes(votes);
        assert!(!result.approved);
        assert_eq!(result.approve_votes, vec![PlayerId::from("a"), PlayerId::from("c")]);
    }

    #[tokio::test]
    async fn test_majority_approves() {
        let bus = scripted(&[
            ("a", "approve"),
            ("b", "approve"),
            ("stranger", "approve"),
            ("c", "maybe"),
            ("c", "reject"),
            ("a", "reject"),
            ("d", "approve"),
        ]);
        let messenger = Arc::new(RecordingMessenger::default());
        let service = TeamVotingService::new(messenger.clone(), bus.clone());

        let result = service.vote_on_team(&proposal(), &roster()).await.unwrap();
        assert!(result.approved);
        assert_eq!(result.approve_votes.len(), 3);
        assert_eq!(result.reject_votes, vec![PlayerId::from("c")]);
        assert_eq!(bus.listener_count(), 0);

        // one opening message per player, refreshed after every accepted vote
        assert_eq!(messenger.posted().len(), 4);
        let updates = messenger.updated();
        let progress = updates
            .iter()
            .filter(|n| matches!(n, Notice::TeamVoteProgress { .. }))
            .count();
        assert_eq!(progress, 4 * 4);
        assert!(matches!(
            updates.last(),
            Some(Notice::TeamVoteResolved { entry }) if entry.outcome.is_approved()
        ));
    }

    #[tokio::test]
    async fn test_progress_does_not_leak_votes() {
        let bus = scripted(&[("b", "reject"), ("a", "reject"), ("c", "reject"), ("d", "approve")]);
        let messenger = Arc::new(RecordingMessenger::default());
        let service = TeamVotingService::new(messenger.clone(), bus);

        let result = service.vote_on_team(&proposal(), &roster()).await.unwrap();
        assert!(!result.approved);

        let first = messenger
            .updated()
            .into_iter()
            .find(|n| matches!(n, Notice::TeamVoteProgress { .. }))
            .unwrap();
        match first {
            Notice::TeamVoteProgress { voted, pending, .. } => {
                assert_eq!(voted, vec![PlayerId::from("b")]);
                assert_eq!(pending.len(), 3);
            }
            other => panic!("unexpected notice {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_post_failure_aborts_before_listening() {
        let bus = Arc::new(MockBus::default());
        let service =
            TeamVotingService::new(Arc::new(RecordingMessenger::failing()), bus.clone());
        let err = service.vote_on_team(&proposal(), &roster()).await.unwrap_err();
        assert!(matches!(err, RoundError::Port(PortError::Delivery(_))));
        assert_eq!(bus.listener_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_policy() {
        let bus = scripted(&[("a", "approve")]);
        let service = TeamVotingService::new(Arc::new(RecordingMessenger::default()), bus.clone())
            .with_policy(RoundPolicy::unbounded().with_timeout(Duration::from_secs(60)));

        let err = service.vote_on_team(&proposal(), &roster()).await.unwrap_err();
        match err {
            RoundError::Collect(CollectError::TimedOut { pending }) => {
                assert_eq!(pending.len(), 3);
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(bus.listener_count(), 0);
    }
}
