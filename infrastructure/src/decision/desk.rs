//! Decision desk: one parked request per chooser

use async_trait::async_trait;
use avalon_application::ports::action_listener::ActorId;
use avalon_application::ports::decision::{DecisionPort, DecisionRequest};
use avalon_application::ports::error::PortError;
use avalon_domain::PlayerId;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

/// Called whenever a new request is parked, so a front-end can show it.
pub type DecisionAnnouncer = Arc<dyn Fn(&DecisionRequest) + Send + Sync>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnswerError {
    #[error("Nobody is waiting for a decision")]
    NoPendingDecision,

    #[error("{actor} is not choosing; waiting on {choosers}")]
    NotChooser { actor: ActorId, choosers: String },

    #[error("Option {index} does not exist (choose 1 to {options})")]
    OutOfRange { index: usize, options: usize },

    #[error("Expected {} choices, got {got}", format_bounds(.min, .max))]
    WrongCount { got: usize, min: usize, max: usize },

    #[error("Option {index} was chosen more than once")]
    Repeated { index: usize },

    #[error("The decision was withdrawn")]
    Withdrawn,
}

fn format_bounds(min: &usize, max: &usize) -> String {
    if min == max {
        min.to_string()
    } else {
        format!("{} to {}", min, max)
    }
}

struct PendingDecision {
    request: DecisionRequest,
    reply: oneshot::Sender<Vec<usize>>,
}

#[derive(Default)]
pub struct DecisionDesk {
    pending: Mutex<HashMap<PlayerId, PendingDecision>>,
    announcer: Option<DecisionAnnouncer>,
}

impl DecisionDesk {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_announcer(mut self, announcer: DecisionAnnouncer) -> Self {
        self.announcer = Some(announcer);
        self
    }

    /// Resolve the actor's pending decision with zero-based option indexes.
    ///
    /// An invalid answer leaves the decision pending so the chooser can try
    /// again.
    pub fn answer(&self, actor: &ActorId, indexes: Vec<usize>) -> Result<(), AnswerError> {
        let mut pending = self
            .pending
            .lock()
            .map_err(|_| AnswerError::NoPendingDecision)?;
        prune_abandoned(&mut pending);

        let chooser = PlayerId::new(actor.as_str());
        let Some(decision) = pending.get(&chooser) else {
            if pending.is_empty() {
                return Err(AnswerError::NoPendingDecision);
            }
            let mut choosers: Vec<&str> = pending.keys().map(|c| c.as_str()).collect();
            choosers.sort_unstable();
            return Err(AnswerError::NotChooser {
                actor: actor.clone(),
                choosers: choosers.join(", "),
            });
        };

        let request = &decision.request;
        if indexes.len() < request.min || indexes.len() > request.max {
            return Err(AnswerError::WrongCount {
                got: indexes.len(),
                min: request.min,
                max: request.max,
            });
        }
        if let Some(index) = indexes.iter().find(|i| **i >= request.options.len()) {
            return Err(AnswerError::OutOfRange {
                index: index + 1,
                options: request.options.len(),
            });
        }
        let mut seen = HashSet::with_capacity(indexes.len());
        if let Some(index) = indexes.iter().find(|i| !seen.insert(**i)) {
            return Err(AnswerError::Repeated { index: index + 1 });
        }

        let Some(decision) = pending.remove(&chooser) else {
            return Err(AnswerError::NoPendingDecision);
        };
        debug!("{} answered '{}'", chooser, decision.request.verb);
        decision
            .reply
            .send(indexes)
            .map_err(|_| AnswerError::Withdrawn)
    }

    /// Requests still waiting for an answer.
    pub fn pending_requests(&self) -> Vec<DecisionRequest> {
        self.pending
            .lock()
            .map(|mut p| {
                prune_abandoned(&mut p);
                p.values().map(|d| d.request.clone()).collect()
            })
            .unwrap_or_default()
    }

    pub fn has_pending(&self) -> bool {
        self.pending
            .lock()
            .map(|mut p| {
                prune_abandoned(&mut p);
                !p.is_empty()
            })
            .unwrap_or(false)
    }

    /// Drop every pending decision; their pollers fail with `PortError::Closed`.
    pub fn withdraw_all(&self) {
        if let Ok(mut pending) = self.pending.lock()
            && !pending.is_empty()
        {
            info!("Withdrawing {} pending decision(s)", pending.len());
            pending.clear();
        }
    }
}

/// Forget decisions whose poller gave up (timed out or was cancelled).
fn prune_abandoned(pending: &mut HashMap<PlayerId, PendingDecision>) {
    pending.retain(|chooser, decision| {
        let open = !decision.reply.is_closed();
        if !open {
            debug!("Dropping abandoned '{}' decision for {}", decision.request.verb, chooser);
        }
        open
    });
}

#[async_trait]
impl DecisionPort for DecisionDesk {
    async fn poll_for_decision(&self, request: DecisionRequest) -> Result<Vec<usize>, PortError> {
        let (reply, answer) = oneshot::channel();
        {
            let mut pending = self
                .pending
                .lock()
                .map_err(|_| PortError::Decision("decision desk poisoned".to_string()))?;
            let replaced = pending.insert(
                request.chooser.clone(),
                PendingDecision {
                    request: request.clone(),
                    reply,
                },
            );
            if replaced.is_some() {
                warn!("Replacing an unanswered decision for {}", request.chooser);
            }
        }

        if let Some(announce) = &self.announcer {
            announce(&request);
        }

        answer.await.map_err(|_| PortError::Closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use avalon_application::ports::messenger::MessageTarget;

    fn request(chooser: &str, min: usize, max: usize) -> DecisionRequest {
        DecisionRequest {
            target: MessageTarget::Player(chooser.into()),
            prompt: "Choose 2 players to go on quest 1".to_string(),
            options: vec!["alice".into(), "bob".into(), "carol".into()],
            verb: "Nominate".to_string(),
            chooser: chooser.into(),
            min,
            max,
        }
    }

    async fn parked(desk: &DecisionDesk) {
        while !desk.has_pending() {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_answer_resolves_poll() {
        let desk = Arc::new(DecisionDesk::new());
        let poll = tokio::spawn({
            let desk = desk.clone();
            async move { desk.poll_for_decision(request("alice", 2, 2)).await }
        });
        parked(&desk).await;

        desk.answer(&"alice".into(), vec![2, 0]).unwrap();
        assert_eq!(poll.await.unwrap().unwrap(), vec![2, 0]);
        assert!(!desk.has_pending());
    }

    #[tokio::test]
    async fn test_invalid_answers_keep_decision_pending() {
        let desk = Arc::new(DecisionDesk::new());
        let poll = tokio::spawn({
            let desk = desk.clone();
            async move { desk.poll_for_decision(request("alice", 2, 2)).await }
        });
        parked(&desk).await;

        assert_eq!(
            desk.answer(&"alice".into(), vec![0]),
            Err(AnswerError::WrongCount {
                got: 1,
                min: 2,
                max: 2
            })
        );
        assert_eq!(
            desk.answer(&"alice".into(), vec![0, 3]),
            Err(AnswerError::OutOfRange {
                index: 4,
                options: 3
            })
        );
        assert!(matches!(
            desk.answer(&"bob".into(), vec![0, 1]),
            Err(AnswerError::NotChooser { choosers, .. }) if choosers == "alice"
        ));
        assert_eq!(desk.pending_requests().len(), 1);

        assert_eq!(
            desk.answer(&"alice".into(), vec![1, 1]),
            Err(AnswerError::Repeated { index: 2 })
        );
        assert!(desk.has_pending());

        desk.answer(&"alice".into(), vec![1, 2]).unwrap();
        assert_eq!(poll.await.unwrap().unwrap(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_abandoned_poll_is_forgotten() {
        let desk = Arc::new(DecisionDesk::new());
        let poll = tokio::spawn({
            let desk = desk.clone();
            async move { desk.poll_for_decision(request("carol", 1, 1)).await }
        });
        parked(&desk).await;

        poll.abort();
        assert!(poll.await.unwrap_err().is_cancelled());
        assert!(!desk.has_pending());
        assert_eq!(
            desk.answer(&"carol".into(), vec![0]),
            Err(AnswerError::NoPendingDecision)
        );
    }

    #[test]
    fn test_answer_without_request() {
        let desk = DecisionDesk::new();
        assert_eq!(
            desk.answer(&"alice".into(), vec![0]),
            Err(AnswerError::NoPendingDecision)
        );
    }

    #[tokio::test]
    async fn test_withdraw_closes_poll() {
        let desk = Arc::new(DecisionDesk::new());
        let poll = tokio::spawn({
            let desk = desk.clone();
            async move { desk.poll_for_decision(request("dave", 1, 1)).await }
        });
        parked(&desk).await;

        desk.withdraw_all();
        assert_eq!(poll.await.unwrap(), Err(PortError::Closed));
    }

    #[tokio::test]
    async fn test_announcer_sees_request() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let desk = Arc::new(DecisionDesk::new().with_announcer(Arc::new(move |r: &DecisionRequest| {
            sink.lock().unwrap().push(r.verb.clone())
        })));
        let poll = tokio::spawn({
            let desk = desk.clone();
            async move { desk.poll_for_decision(request("erin", 1, 1)).await }
        });
        parked(&desk).await;
        while seen.lock().unwrap().is_empty() {
            tokio::task::yield_now().await;
        }

        assert_eq!(*seen.lock().unwrap(), vec!["Nominate"]);
        desk.answer(&"erin".into(), vec![0]).unwrap();
        poll.await.unwrap().unwrap();
    }
}
