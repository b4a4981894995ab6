//! ActionCollector: exactly one answer per roster entity
//!
//! # Flow
//!
//! ```text
//! new(roster)          one oneshot channel per distinct entity
//!      ↓
//! start(handler, on_update)
//!      ↓                single listener registered for the action key
//! event {actor, payload}
//!      ↓ resolve actor → first pending entity it owns (else drop)
//!      ↓ handler(entity, payload) → Some(result) (else drop)
//!      ↓ mark completed, on_update(progress), send result
//! wait_for_all() / wait_for(subset)
//!      ↓                results in completion order
//! listener removed exactly once
//! ```
//!
//! Unknown, duplicate and late actions are expected noise in interactive
//! input and are dropped silently.

use super::policy::RoundPolicy;
use crate::ports::action_listener::{ActionEvent, ActionListenerPort, ActorId, ListenerId};
use crate::ports::error::PortError;
use avalon_domain::PlayerId;
use futures::StreamExt;
use futures::stream::FuturesUnordered;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tokio::sync::oneshot;
use tracing::{debug, trace, warn};

/// Maps the actor who pressed a button to the roster entities they control.
pub type IdentityResolver = Arc<dyn Fn(&ActorId) -> Vec<PlayerId> + Send + Sync>;

/// Default resolver: an actor controls the seat with the same identifier.
pub fn identity_equality() -> IdentityResolver {
    Arc::new(|actor: &ActorId| vec![PlayerId::new(actor.as_str())])
}

/// Errors ending a wait before every requested answer arrived
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollectError {
    #[error("Round abandoned before every answer arrived")]
    Abandoned,

    #[error("Round timed out waiting for: {}", format_pending(.pending))]
    TimedOut { pending: Vec<PlayerId> },

    #[error("Round cancelled")]
    Cancelled,
}

fn format_pending(pending: &[PlayerId]) -> String {
    pending
        .iter()
        .map(|p| p.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Snapshot handed to the update callback after each accepted action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectorProgress {
    /// Entity whose action was just accepted
    pub entity: PlayerId,
    /// Completed entities, in completion order
    pub completed: Vec<PlayerId>,
    /// Entities still expected, in roster order
    pub pending: Vec<PlayerId>,
}

struct CollectorState<T> {
    senders: HashMap<PlayerId, oneshot::Sender<T>>,
    completed: Vec<PlayerId>,
}

impl<T> CollectorState<T> {
    fn pending(&self, roster: &[PlayerId]) -> Vec<PlayerId> {
        roster
            .iter()
            .filter(|id| !self.completed.contains(id))
            .cloned()
            .collect()
    }
}

pub struct ActionCollector<T: Send + 'static> {
    listeners: Arc<dyn ActionListenerPort>,
    action_key: String,
    roster: Arc<Vec<PlayerId>>,
    resolver: IdentityResolver,
    policy: RoundPolicy,
    state: Arc<Mutex<CollectorState<T>>>,
    receivers: HashMap<PlayerId, oneshot::Receiver<T>>,
    listener: Option<ListenerId>,
}

impl<T: Send + 'static> ActionCollector<T> {
    /// Create a collector expecting one answer from each distinct entity in `roster`.
    pub fn new(
        listeners: Arc<dyn ActionListenerPort>,
        action_key: impl Into<String>,
        roster: &[PlayerId],
    ) -> Self {
        let mut seen = HashSet::new();
        let roster: Vec<PlayerId> = roster
            .iter()
            .filter(|id| seen.insert((*id).clone()))
            .cloned()
            .collect();

        let mut senders = HashMap::with_capacity(roster.len());
        let mut receivers = HashMap::with_capacity(roster.len());
        for id in &roster {
            let (tx, rx) = oneshot::channel();
            senders.insert(id.clone(), tx);
            receivers.insert(id.clone(), rx);
        }

        Self {
            listeners,
            action_key: action_key.into(),
            roster: Arc::new(roster),
            resolver: identity_equality(),
            policy: RoundPolicy::default(),
            state: Arc::new(Mutex::new(CollectorState {
                senders,
                completed: Vec::new(),
            })),
            receivers,
            listener: None,
        }
    }

    pub fn with_identity_resolver(mut self, resolver: IdentityResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_policy(mut self, policy: RoundPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn action_key(&self) -> &str {
        &self.action_key
    }

    /// Distinct roster entities, in the order given
    pub fn roster(&self) -> &[PlayerId] {
        &self.roster
    }

    pub fn is_listening(&self) -> bool {
        self.listener.is_some()
    }

    /// Install the listener for this collector's action key.
    ///
    /// `handler` turns an entity's payload into a result; returning `None`
    /// drops the action and the entity stays pending. `on_update` runs after
    /// the entity is marked completed and before its result is delivered.
    /// Calling `start` on a collector that is already listening does nothing.
    pub fn start<H, U>(&mut self, handler: H, on_update: U) -> Result<(), PortError>
    where
        H: Fn(&PlayerId, &str) -> Option<T> + Send + Sync + 'static,
        U: Fn(&CollectorProgress) + Send + Sync + 'static,
    {
        if self.listener.is_some() {
            warn!("Collector for '{}' is already listening", self.action_key);
            return Ok(());
        }

        let state = Arc::clone(&self.state);
        let roster = Arc::clone(&self.roster);
        let resolver = Arc::clone(&self.resolver);
        let action_key = self.action_key.clone();

        let listener = self.listeners.add_action_listener(
            &self.action_key,
            Arc::new(move |event: ActionEvent| {
                let owned = resolver(&event.actor);

                let (accepted, progress) = {
                    let Ok(mut state) = state.lock() else {
                        return;
                    };
                    let Some(entity) = owned
                        .into_iter()
                        .find(|id| roster.contains(id) && !state.completed.contains(id))
                    else {
                        trace!(
                            "Dropping '{}' action from {}: no pending seat",
                            action_key, event.actor
                        );
                        return;
                    };
                    let Some(result) = handler(&entity, &event.payload) else {
                        debug!(
                            "Handler declined '{}' action for {}",
                            action_key, entity
                        );
                        return;
                    };

                    state.completed.push(entity.clone());
                    let sender = state.senders.remove(&entity);
                    let progress = CollectorProgress {
                        entity: entity.clone(),
                        completed: state.completed.clone(),
                        pending: state.pending(&roster),
                    };
                    ((sender, result), progress)
                };

                debug!(
                    "Accepted '{}' action for {} ({} pending)",
                    action_key,
                    progress.entity,
                    progress.pending.len()
                );
                on_update(&progress);

                let (sender, result) = accepted;
                if let Some(sender) = sender {
                    // The waiter may already be gone; the completion still counts.
                    let _ = sender.send(result);
                }
            }),
        )?;

        self.listener = Some(listener);
        Ok(())
    }

    /// Wait for every roster entity, then deregister the listener.
    pub async fn wait_for_all(&mut self) -> Result<Vec<T>, CollectError> {
        let roster = Arc::clone(&self.roster);
        self.wait_for(&roster).await
    }

    /// Wait for the given entities, then deregister the listener.
    ///
    /// Entities outside the roster, or already waited on, are skipped.
    /// Results come back in completion order. Dropping the returned future
    /// before it resolves forfeits the answers it was waiting on.
    pub async fn wait_for(&mut self, subset: &[PlayerId]) -> Result<Vec<T>, CollectError> {
        let mut waiting = Vec::with_capacity(subset.len());
        let mut pending: FuturesUnordered<_> = subset
            .iter()
            .filter_map(|id| {
                let receiver = self.receivers.remove(id)?;
                waiting.push(id.clone());
                Some(receiver)
            })
            .collect();

        let deadline = self
            .policy
            .timeout
            .map(|timeout| tokio::time::Instant::now() + timeout);
        let cancellation = self.policy.cancellation.clone();

        let mut results = Vec::with_capacity(pending.len());
        let outcome = loop {
            let next = async {
                match deadline {
                    Some(deadline) => tokio::time::timeout_at(deadline, pending.next()).await.ok(),
                    None => Some(pending.next().await),
                }
            };

            let next = if let Some(ref token) = cancellation {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break Err(CollectError::Cancelled),
                    next = next => next,
                }
            } else {
                next.await
            };

            match next {
                None => {
                    let completed = self.completed();
                    waiting.retain(|id| !completed.contains(id));
                    break Err(CollectError::TimedOut { pending: waiting });
                }
                Some(None) => break Ok(()),
                Some(Some(Ok(result))) => results.push(result),
                Some(Some(Err(_))) => break Err(CollectError::Abandoned),
            }
        };

        self.stop();
        match outcome {
            Ok(()) => Ok(results),
            Err(err) => {
                warn!("Collector for '{}' ended early: {}", self.action_key, err);
                Err(err)
            }
        }
    }

    pub fn has_completed(&self, entity: &PlayerId) -> bool {
        self.state
            .lock()
            .map(|state| state.completed.contains(entity))
            .unwrap_or(false)
    }

    /// Completed entities, in completion order
    pub fn completed(&self) -> Vec<PlayerId> {
        self.state
            .lock()
            .map(|state| state.completed.clone())
            .unwrap_or_default()
    }

    /// Entities still expected, in roster order
    pub fn pending(&self) -> Vec<PlayerId> {
        self.state
            .lock()
            .map(|state| state.pending(&self.roster))
            .unwrap_or_default()
    }

    /// Deregister the listener. Safe to call more than once.
    pub fn stop(&mut self) {
        if let Some(listener) = self.listener.take() {
            self.listeners.remove_action_listener(listener);
            debug!("Removed '{}' listener", self.action_key);
        }
    }
}

impl<T: Send + 'static> Drop for ActionCollector<T> {
    fn drop(&mut self) {
        self.stop();
    }
}
