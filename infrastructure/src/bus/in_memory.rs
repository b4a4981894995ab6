//! Action listener registry keyed by action key

use avalon_application::ports::action_listener::{
    ActionEvent, ActionHandler, ActionListenerPort, ListenerId,
};
use avalon_application::ports::error::PortError;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, trace};

struct Registration {
    id: ListenerId,
    action_key: String,
    handler: ActionHandler,
}

/// In-process action listener registry.
///
/// Handlers run synchronously on the dispatching thread, in registration
/// order. The registry lock is released before any handler runs, so a
/// handler may deregister itself.
#[derive(Default)]
pub struct InMemoryActionBus {
    next_id: AtomicU64,
    listeners: RwLock<Vec<Registration>>,
}

impl InMemoryActionBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `event` to every handler registered for `action_key`.
    ///
    /// Returns whether anyone was listening.
    pub fn dispatch(&self, action_key: &str, event: ActionEvent) -> bool {
        let handlers: Vec<ActionHandler> = match self.listeners.read() {
            Ok(listeners) => listeners
                .iter()
                .filter(|r| r.action_key == action_key)
                .map(|r| r.handler.clone())
                .collect(),
            Err(_) => return false,
        };

        if handlers.is_empty() {
            trace!("No listener for '{}', dropping action from {}", action_key, event.actor);
            return false;
        }
        for handler in &handlers {
            handler(event.clone());
        }
        true
    }

    /// Number of live listeners for `action_key`.
    pub fn listener_count(&self, action_key: &str) -> usize {
        self.listeners
            .read()
            .map(|l| l.iter().filter(|r| r.action_key == action_key).count())
            .unwrap_or(0)
    }

    /// Whether anyone is currently listening for `action_key`.
    pub fn is_listening(&self, action_key: &str) -> bool {
        self.listener_count(action_key) > 0
    }
}

impl ActionListenerPort for InMemoryActionBus {
    fn add_action_listener(
        &self,
        action_key: &str,
        handler: ActionHandler,
    ) -> Result<ListenerId, PortError> {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let mut listeners = self
            .listeners
            .write()
            .map_err(|_| PortError::Listener("listener registry poisoned".to_string()))?;
        listeners.push(Registration {
            id,
            action_key: action_key.to_string(),
            handler,
        });
        debug!("Listening for '{}' ({:?})", action_key, id);
        Ok(id)
    }

    fn remove_action_listener(&self, listener: ListenerId) {
        if let Ok(mut listeners) = self.listeners.write() {
            let before = listeners.len();
            listeners.retain(|r| r.id != listener);
            if listeners.len() < before {
                debug!("Stopped listening ({:?})", listener);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recorder() -> (ActionHandler, Arc<Mutex<Vec<ActionEvent>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let handler: ActionHandler = Arc::new(move |event| sink.lock().unwrap().push(event));
        (handler, seen)
    }

    #[test]
    fn test_dispatch_by_key() {
        let bus = InMemoryActionBus::new();
        let (votes, seen_votes) = recorder();
        let (cards, seen_cards) = recorder();
        bus.add_action_listener("team-vote", votes).unwrap();
        bus.add_action_listener("quest-vote", cards).unwrap();

        assert!(bus.dispatch("team-vote", ActionEvent::new("alice", "approve")));
        assert!(!bus.dispatch("assassinate", ActionEvent::new("alice", "bob")));

        assert_eq!(seen_votes.lock().unwrap().len(), 1);
        assert!(seen_cards.lock().unwrap().is_empty());
    }

    #[test]
    fn test_registration_order() {
        let bus = InMemoryActionBus::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        for n in 0..3 {
            let order = order.clone();
            bus.add_action_listener("team-vote", Arc::new(move |_| order.lock().unwrap().push(n)))
                .unwrap();
        }
        bus.dispatch("team-vote", ActionEvent::new("alice", "approve"));
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_remove_listener() {
        let bus = InMemoryActionBus::new();
        let (handler, seen) = recorder();
        let id = bus.add_action_listener("team-vote", handler).unwrap();
        assert!(bus.is_listening("team-vote"));

        bus.remove_action_listener(id);
        // second removal is a no-op
        bus.remove_action_listener(id);
        assert!(!bus.dispatch("team-vote", ActionEvent::new("alice", "approve")));
        assert!(seen.lock().unwrap().is_empty());
        assert_eq!(bus.listener_count("team-vote"), 0);
    }

    #[test]
    fn test_handler_may_deregister_itself() {
        let bus = Arc::new(InMemoryActionBus::new());
        let slot: Arc<Mutex<Option<ListenerId>>> = Arc::new(Mutex::new(None));

        let weak = Arc::downgrade(&bus);
        let own_id = slot.clone();
        let id = bus
            .add_action_listener(
                "quest-vote",
                Arc::new(move |_| {
                    if let (Some(bus), Some(id)) = (weak.upgrade(), *own_id.lock().unwrap()) {
                        bus.remove_action_listener(id);
                    }
                }),
            )
            .unwrap();
        *slot.lock().unwrap() = Some(id);

        assert!(bus.dispatch("quest-vote", ActionEvent::new("bob", "succeed")));
        assert!(!bus.is_listening("quest-vote"));
    }

    #[tokio::test]
    async fn test_collector_over_bus() {
        use avalon_application::ActionCollector;
        use avalon_domain::PlayerId;

        let bus = Arc::new(InMemoryActionBus::new());
        let roster = vec![PlayerId::from("alice"), PlayerId::from("bob")];
        let mut collector = ActionCollector::new(bus.clone(), "team-vote", &roster);
        collector
            .start(
                |player: &PlayerId, payload: &str| Some(format!("{player}:{payload}")),
                |_| {},
            )
            .unwrap();

        bus.dispatch("team-vote", ActionEvent::new("mallory", "approve"));
        bus.dispatch("team-vote", ActionEvent::new("bob", "reject"));
        bus.dispatch("team-vote", ActionEvent::new("bob", "approve"));
        bus.dispatch("team-vote", ActionEvent::new("alice", "approve"));

        let results = collector.wait_for_all().await.unwrap();
        assert_eq!(results, vec!["bob:reject", "alice:approve"]);
        assert!(!bus.is_listening("team-vote"));
    }
}
