//! Game orchestrator
//!
//! Drives one game from dealing roles to the final reveal.
//!
//! # Flow
//!
//! ```text
//! setup: seat players → deal roles → briefings        (→ TEAM_SELECTION)
//!        ↓
//! ┌─ leader nominates a team (decision port)
//! │      ↓ leader seat advances
//! │  TEAM_VOTING ── 5th attempt + AutoApprove → skip vote, approved by all
//! │      ↓ rejected → TEAM_SELECTION (5th rejection + EvilWins → evil wins)
//! │  QUEST_EXECUTION → record result
//! │      ↓ 3 fails → evil wins
//! │      ↓ 3 successes, no Merlin → good wins
//! │      ↓ 3 successes, Merlin → ASSASSINATION → one guess
//! └──────↓ otherwise back to TEAM_SELECTION
//! GAME_ENDED → reveal every role
//! ```
//!
//! The state is only touched between suspension points, from this single
//! control flow. A round that fails part way leaves the state where `run`
//! can pick it up again: a failed vote goes back to TEAM_SELECTION with the
//! same leader, a failed quest or assassination stays in its phase and is
//! replayed.

use crate::collector::{CollectError, IdentityResolver, RoundPolicy};
use crate::ports::action_listener::ActionListenerPort;
use crate::ports::decision::{DecisionPort, DecisionRequest};
use crate::ports::error::PortError;
use crate::ports::messenger::{MessageTarget, MessengerPort};
use crate::ports::notice::Notice;
use crate::services::RoundError;
use crate::services::quest_execution::{QuestExecutionService, QuestRound};
use crate::services::team_voting::TeamVotingService;
use avalon_domain::{
    AssignmentError, DealtRoles, Faction, FinalProposalRule, GameConfiguration, GameOutcome,
    GamePhase, GameState, PhaseError, Player, PlayerId, ProposalHistoryEntry, Role,
    RoleAssignmentService, RoleKnowledge, TeamProposal, WinReason,
};
use futures::future::try_join_all;
use rand::Rng;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

#[derive(Error, Debug)]
pub enum OrchestratorError {
    #[error("{0}")]
    Phase(#[from] PhaseError),

    #[error("Role assignment failed: {0}")]
    Assignment(#[from] AssignmentError),

    #[error("Round failed: {0}")]
    Round(#[from] RoundError),

    #[error("Collaborator error: {0}")]
    Port(#[from] PortError),

    #[error("Invalid decision from {chooser}: {reason}")]
    InvalidDecision { chooser: PlayerId, reason: String },

    #[error("Decision from {chooser} abandoned: {reason}")]
    DecisionAbandoned {
        chooser: PlayerId,
        #[source]
        reason: CollectError,
    },

    #[error("All quests have already been played")]
    QuestsExhausted,

    #[error("Game ended without a winner")]
    NoOutcome,
}

pub struct GameOrchestrator {
    config: GameConfiguration,
    messenger: Arc<dyn MessengerPort>,
    decisions: Arc<dyn DecisionPort>,
    policy: RoundPolicy,
    voting: TeamVotingService,
    questing: QuestExecutionService,
}

impl GameOrchestrator {
    pub fn new(
        config: GameConfiguration,
        messenger: Arc<dyn MessengerPort>,
        listeners: Arc<dyn ActionListenerPort>,
        decisions: Arc<dyn DecisionPort>,
    ) -> Self {
        Self {
            voting: TeamVotingService::new(Arc::clone(&messenger), Arc::clone(&listeners)),
            questing: QuestExecutionService::new(Arc::clone(&messenger), listeners),
            config,
            messenger,
            decisions,
            policy: RoundPolicy::default(),
        }
    }

    /// Apply an abandonment policy to every suspension point: nominations,
    /// voting and quest rounds, and the assassin's pick.
    pub fn with_round_policy(mut self, policy: RoundPolicy) -> Self {
        self.voting = self.voting.with_policy(policy.clone());
        self.questing = self.questing.with_policy(policy.clone());
        self.policy = policy;
        self
    }

    /// Let one actor control several seats.
    pub fn with_identity_resolver(mut self, resolver: IdentityResolver) -> Self {
        self.voting = self.voting.with_identity_resolver(Arc::clone(&resolver));
        self.questing = self.questing.with_identity_resolver(resolver);
        self
    }

    pub fn config(&self) -> &GameConfiguration {
        &self.config
    }

    /// Seat the players, deal roles and brief everyone.
    pub async fn setup<R: Rng + ?Sized>(
        &self,
        players: Vec<Player>,
        rng: &mut R,
    ) -> Result<GameState, OrchestratorError> {
        let service = RoleAssignmentService::new(self.config.clone());
        let seated = service.arrange_seating(players, rng);
        let dealt = service.assign_roles(seated, rng)?;
        self.begin(dealt).await
    }

    /// Start a game from an already dealt table.
    pub async fn begin(&self, dealt: DealtRoles) -> Result<GameState, OrchestratorError> {
        let mut state = GameState::new(self.config.clone(), dealt);
        transition(&mut state, GamePhase::RoleAssignment)?;

        info!(
            "Roles dealt to {} players ({} evil)",
            state.player_count(),
            state.evil_count()
        );
        for player in state.players() {
            debug!(
                "{} is {}",
                player.id(),
                player.role().map(|r| r.as_str()).unwrap_or("unassigned")
            );
        }
        debug!("{} holds the assassin duty", state.assassin());

        let started = Notice::GameStarted {
            players: state.player_ids(),
            special_roles: self.config.special_roles().to_vec(),
            resistance: self.config.resistance(),
            evil_count: state.evil_count(),
            board: state.quests().board(),
        };
        self.messenger
            .post_message(&MessageTarget::Table, &started)
            .await?;

        let briefings: Vec<(MessageTarget, Notice)> = state
            .players()
            .iter()
            .filter_map(|player| {
                RoleKnowledge::for_player(player, state.players(), state.assassin())
                    .map(|knowledge| (MessageTarget::player(player.id()), Notice::RoleBriefing(knowledge)))
            })
            .collect();
        try_join_all(
            briefings
                .iter()
                .map(|(target, notice)| self.messenger.post_message(target, notice)),
        )
        .await?;

        transition(&mut state, GamePhase::TeamSelection)?;
        Ok(state)
    }

    /// Play until the game ends, then reveal every role.
    ///
    /// A phase error force-ends the game before it is returned. Collaborator
    /// failures abort the round in flight and leave the state as it was at
    /// the last completed step; calling `run` again continues from there.
    pub async fn run(&self, state: &mut GameState) -> Result<GameOutcome, OrchestratorError> {
        while !state.is_game_ended() {
            match state.current_phase() {
                GamePhase::QuestExecution => self.resume_quest(state).await?,
                GamePhase::Assassination => self.assassinate(state).await?,
                _ => self.play_proposal(state).await?,
            }
        }

        let outcome = state.outcome().cloned().ok_or(OrchestratorError::NoOutcome)?;
        info!("Game over: {}", outcome);

        let reveal = Notice::GameOver {
            outcome: outcome.clone(),
            players: state.players().to_vec(),
        };
        self.messenger
            .post_message(&MessageTarget::Table, &reveal)
            .await?;
        Ok(outcome)
    }

    /// One nomination, its vote and, if approved, its quest.
    async fn play_proposal(&self, state: &mut GameState) -> Result<(), OrchestratorError> {
        let assignment = state.quests().current_assignment();
        let leader = state.current_leader().id().clone();
        let quest_number = state.quests().current_quest_index();

        self.messenger
            .post_message(
                &MessageTarget::Table,
                &Notice::LeaderNominating {
                    leader: leader.clone(),
                    quest_number,
                    attempt: state.next_attempt_number(),
                    team_size: assignment.required_team_size,
                    requires_two_fails: assignment.requires_two_fails(),
                    board: state.quests().board(),
                },
            )
            .await?;

        let members = self
            .nominate(state, &leader, quest_number, assignment.required_team_size)
            .await?;
        let proposal = state.propose(members);
        info!(
            "{} proposed {:?} for quest {} (attempt {})",
            leader,
            proposal.member_ids(),
            quest_number + 1,
            proposal.attempt_number()
        );

        transition(state, GamePhase::TeamVoting)?;

        let entry = match self.resolve_proposal(state, &proposal).await {
            Ok(entry) => entry,
            Err(err) => {
                warn!("Vote on {:?} abandoned: {}", proposal.member_ids(), err);
                transition(state, GamePhase::TeamSelection)?;
                return Err(err);
            }
        };
        let approved = entry.outcome.is_approved();
        state.record_proposal(entry);
        state.advance_leader();

        if approved {
            state.reset_reject_count();
            state.set_quest_players(proposal.member_ids().to_vec());
            transition(state, GamePhase::QuestExecution)?;
            return self.play_quest(state, &proposal).await;
        }

        state.increment_reject_count();
        transition(state, GamePhase::TeamSelection)?;
        if self.config.final_proposal_rule() == FinalProposalRule::EvilWins
            && state.reject_count() >= GameConfiguration::MAX_PROPOSAL_ATTEMPTS
        {
            warn!(
                "{} proposals rejected in a row for quest {}",
                state.reject_count(),
                quest_number + 1
            );
            finish(state, GameOutcome::evil(WinReason::ProposalsRejected))?;
        }
        Ok(())
    }

    /// Approve or reject `proposal`, without touching the state.
    async fn resolve_proposal(
        &self,
        state: &GameState,
        proposal: &TeamProposal,
    ) -> Result<ProposalHistoryEntry, OrchestratorError> {
        let quest_number = proposal.quest_number();
        let auto_approve = proposal.is_last_attempt()
            && self.config.final_proposal_rule() == FinalProposalRule::AutoApprove;
        if auto_approve {
            info!("Final attempt for quest {}: team approved without a vote", quest_number + 1);
            let entry = ProposalHistoryEntry::auto_approved(proposal.clone(), state.player_ids());
            self.messenger
                .post_message(
                    &MessageTarget::Table,
                    &Notice::TeamVoteResolved {
                        entry: entry.clone(),
                    },
                )
                .await?;
            return Ok(entry);
        }

        let result = self
            .voting
            .vote_on_team(proposal, &state.player_ids())
            .await?;
        info!(
            "Team {} ({} approve, {} reject)",
            if result.approved { "approved" } else { "rejected" },
            result.approve_votes.len(),
            result.reject_votes.len()
        );
        Ok(result.into_history_entry(proposal.clone()))
    }

    /// Replay the quest of the last approved proposal after a failed round.
    async fn resume_quest(&self, state: &mut GameState) -> Result<(), OrchestratorError> {
        let approved = state
            .history()
            .iter()
            .rev()
            .find(|entry| entry.outcome.is_approved())
            .map(|entry| entry.proposal.clone());
        match approved {
            Some(proposal) => {
                info!("Replaying quest {}", proposal.quest_number() + 1);
                self.play_quest(state, &proposal).await
            }
            None => transition(state, GamePhase::TeamSelection),
        }
    }

    async fn play_quest(
        &self,
        state: &mut GameState,
        proposal: &TeamProposal,
    ) -> Result<(), OrchestratorError> {
        let quest_number = state.quests().current_quest_index();
        let assignment = state.quests().current_assignment();

        let votes = self
            .questing
            .execute_quest(QuestRound {
                quest_number,
                leader: proposal.leader(),
                team: proposal.member_ids(),
                requires_two_fails: assignment.requires_two_fails(),
                players: state.players(),
            })
            .await?;

        let outcome = state
            .quests()
            .evaluate_quest_outcome(&votes.failed, &votes.succeeded);
        if !state.quests_mut().record_quest_result(outcome.result) {
            error!("Quest {} played after the last quest; ending the game", quest_number + 1);
            state.force_end();
            return Err(OrchestratorError::QuestsExhausted);
        }
        info!("Quest {}: {}", quest_number + 1, outcome.summary());

        self.messenger
            .post_message(
                &MessageTarget::Table,
                &Notice::QuestResolved {
                    quest_number,
                    outcome,
                    board: state.quests().board(),
                },
            )
            .await?;

        match state.quests().end_condition() {
            Some(Faction::Evil) => finish(state, GameOutcome::evil(WinReason::QuestsFailed)),
            Some(Faction::Good) if !self.config.has_merlin() => {
                finish(state, GameOutcome::good(WinReason::QuestsSucceeded))
            }
            Some(Faction::Good) => {
                transition(state, GamePhase::Assassination)?;
                self.assassinate(state).await
            }
            None => transition(state, GamePhase::TeamSelection),
        }
    }

    async fn assassinate(&self, state: &mut GameState) -> Result<(), OrchestratorError> {
        let assassin = state.assassin().clone();
        let candidates: Vec<PlayerId> = state
            .good_players()
            .iter()
            .map(|p| p.id().clone())
            .collect();
        info!("Good won three quests; {} may now guess Merlin", assassin);

        self.messenger
            .post_message(
                &MessageTarget::Table,
                &Notice::AssassinationStarted {
                    assassin: assassin.clone(),
                    candidates: candidates.clone(),
                },
            )
            .await?;

        let request = DecisionRequest {
            target: MessageTarget::player(&assassin),
            prompt: "Choose whom to assassinate".to_string(),
            options: candidates.iter().map(|c| c.to_string()).collect(),
            verb: "Assassinate".to_string(),
            chooser: assassin.clone(),
            min: 1,
            max: 1,
        };
        let picked = self.decide(request).await?;
        let target = candidates[picked[0]].clone();

        let hit = state
            .player(&target)
            .is_some_and(|p| p.role() == Some(Role::Merlin));
        let outcome = if hit {
            GameOutcome::evil(WinReason::MerlinAssassinated { target })
        } else {
            GameOutcome::good(WinReason::MerlinSurvived { target })
        };
        finish(state, outcome)
    }

    /// Ask the leader for exactly `team_size` distinct seats.
    async fn nominate(
        &self,
        state: &GameState,
        leader: &PlayerId,
        quest_number: usize,
        team_size: usize,
    ) -> Result<Vec<PlayerId>, OrchestratorError> {
        let seats = state.player_ids();
        let request = DecisionRequest {
            target: MessageTarget::player(leader),
            prompt: format!(
                "Choose {} players to go on quest {}",
                team_size,
                quest_number + 1
            ),
            options: seats.iter().map(|s| s.to_string()).collect(),
            verb: "Nominate".to_string(),
            chooser: leader.clone(),
            min: team_size,
            max: team_size,
        };
        let picked = self.decide(request).await?;
        Ok(picked.into_iter().map(|i| seats[i].clone()).collect())
    }

    /// Poll for a decision and check the answer against the request bounds.
    ///
    /// The round policy applies: a deadline or a cancelled token abandons
    /// the decision.
    async fn decide(&self, request: DecisionRequest) -> Result<Vec<usize>, OrchestratorError> {
        let chooser = request.chooser.clone();
        let (min, max, option_count) = (request.min, request.max, request.options.len());

        let poll = async {
            let poll = self.decisions.poll_for_decision(request);
            match self.policy.timeout {
                Some(timeout) => tokio::time::timeout(timeout, poll).await.ok(),
                None => Some(poll.await),
            }
        };
        let polled = match &self.policy.cancellation {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => Err(CollectError::Cancelled),
                polled = poll => polled.ok_or(CollectError::TimedOut { pending: vec![chooser.clone()] }),
            },
            None => poll
                .await
                .ok_or(CollectError::TimedOut { pending: vec![chooser.clone()] }),
        };
        let picked = match polled {
            Ok(picked) => picked?,
            Err(reason) => {
                warn!("Decision from {} abandoned: {}", chooser, reason);
                return Err(OrchestratorError::DecisionAbandoned { chooser, reason });
            }
        };

        if picked.len() < min || picked.len() > max {
            return Err(OrchestratorError::InvalidDecision {
                chooser,
                reason: format!(
                    "expected between {} and {} choices, got {}",
                    min,
                    max,
                    picked.len()
                ),
            });
        }
        if let Some(bad) = picked.iter().find(|i| **i >= option_count) {
            return Err(OrchestratorError::InvalidDecision {
                chooser,
                reason: format!("option {} does not exist", bad),
            });
        }
        let mut seen = HashSet::with_capacity(picked.len());
        if let Some(repeated) = picked.iter().find(|i| !seen.insert(**i)) {
            return Err(OrchestratorError::InvalidDecision {
                chooser,
                reason: format!("option {} chosen more than once", repeated),
            });
        }
        Ok(picked)
    }
}

/// Move along an allowed edge; anything else force-ends the game.
fn transition(state: &mut GameState, phase: GamePhase) -> Result<(), OrchestratorError> {
    if let Err(err) = state.transition_to(phase) {
        error!("{}; ending the game", err);
        state.force_end();
        return Err(err.into());
    }
    Ok(())
}

fn finish(state: &mut GameState, outcome: GameOutcome) -> Result<(), OrchestratorError> {
    if let Err(err) = state.finish(outcome) {
        error!("{}; ending the game", err);
        state.force_end();
        return Err(err.into());
    }
    Ok(())
}
