//! Quest execution round
//!
//! Only team members may play a card. Everyone is told who has played, but
//! never what they played.

use super::{RoundError, post_to_each, update_all};
use crate::collector::{ActionCollector, CollectorProgress, IdentityResolver, RoundPolicy};
use crate::ports::action_listener::{
    ActionListenerPort, FAIL_PAYLOAD, QUEST_VOTE_ACTION, SUCCEED_PAYLOAD,
};
use crate::ports::messenger::MessengerPort;
use crate::ports::notice::Notice;
use avalon_domain::{Player, PlayerId};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Everything the service needs to know about the quest being played
#[derive(Debug, Clone)]
pub struct QuestRound<'a> {
    pub quest_number: usize,
    pub leader: &'a PlayerId,
    /// Nominated team; may contain duplicates, each seat plays once
    pub team: &'a [PlayerId],
    pub requires_two_fails: bool,
    /// Everyone at the table, with roles
    pub players: &'a [Player],
}

/// Cards played on one quest, partitioned
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestVotes {
    pub failed: Vec<PlayerId>,
    pub succeeded: Vec<PlayerId>,
}

struct QuestCard {
    player: PlayerId,
    fail: bool,
}

pub struct QuestExecutionService {
    messenger: Arc<dyn MessengerPort>,
    listeners: Arc<dyn ActionListenerPort>,
    policy: RoundPolicy,
    resolver: Option<IdentityResolver>,
}

impl QuestExecutionService {
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

    /// Collect one card from each team member.
    ///
    /// A `fail` from a good player is dropped and that player must play
    /// again.
    pub async fn execute_quest(&self, round: QuestRound<'_>) -> Result<QuestVotes, RoundError> {
        info!(
            "Quest {} started with team {:?}",
            round.quest_number + 1,
            round.team
        );

        let everyone: Vec<PlayerId> = round.players.iter().map(|p| p.id().clone()).collect();
        let started = Notice::QuestStarted {
            quest_number: round.quest_number,
            leader: round.leader.clone(),
            team: round.team.to_vec(),
            requires_two_fails: round.requires_two_fails,
        };
        let handles =
            post_to_each(self.messenger.as_ref(), &everyone, |_| started.clone()).await?;

        let can_fail: HashSet<PlayerId> = round
            .players
            .iter()
            .filter(|p| p.can_fail_quests())
            .map(|p| p.id().clone())
            .collect();

        let mut collector =
            ActionCollector::new(Arc::clone(&self.listeners), QUEST_VOTE_ACTION, round.team)
                .with_policy(self.policy.clone());
        if let Some(resolver) = &self.resolver {
            collector = collector.with_identity_resolver(Arc::clone(resolver));
        }

        let (updates_tx, mut updates) = mpsc::unbounded_channel::<CollectorProgress>();
        collector.start(
            move |player: &PlayerId, payload: &str| {
                match payload.trim().to_lowercase().as_str() {
                    SUCCEED_PAYLOAD => Some(QuestCard {
                        player: player.clone(),
                        fail: false,
                    }),
                    FAIL_PAYLOAD if can_fail.contains(player) => Some(QuestCard {
                        player: player.clone(),
                        fail: true,
                    }),
                    FAIL_PAYLOAD => {
                        debug!("Ignoring fail card from good player {}", player);
                        None
                    }
                    _ => None,
                }
            },
            move |progress: &CollectorProgress| {
                let _ = updates_tx.send(progress.clone());
            },
        )?;

        let progress_notice = |progress: &CollectorProgress| Notice::QuestProgress {
            quest_number: round.quest_number,
            team: round.team.to_vec(),
            completed: progress.completed.clone(),
        };

        let cards = {
            let wait = collector.wait_for_all();
            tokio::pin!(wait);
            loop {
                tokio::select! {
                    cards = &mut wait => break cards?,
                    Some(progress) = updates.recv() => {
                        update_all(self.messenger.as_ref(), &handles, &progress_notice(&progress)).await?;
                    }
                }
            }
        };
        while let Ok(progress) = updates.try_recv() {
            update_all(self.messenger.as_ref(), &handles, &progress_notice(&progress)).await?;
        }

        let (failed, succeeded): (Vec<QuestCard>, Vec<QuestCard>) =
            cards.into_iter().partition(|card| card.fail);
        let votes = QuestVotes {
            failed: failed.into_iter().map(|c| c.player).collect(),
            succeeded: succeeded.into_iter().map(|c| c.player).collect(),
        };
        debug!(
            "Quest {} cards: {} fail, {} succeed",
            round.quest_number + 1,
            votes.failed.len(),
            votes.succeeded.len()
        );
        Ok(votes)
    }
}
