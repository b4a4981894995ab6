//! Hand-written port fakes shared by the unit tests of this crate

use crate::ports::action_listener::{ActionEvent, ActionHandler, ActionListenerPort, ListenerId};
use crate::ports::decision::{DecisionPort, DecisionRequest};
use crate::ports::error::PortError;
use crate::ports::messenger::{MessageHandle, MessageTarget, MessengerPort};
use crate::ports::notice::Notice;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

type Responder = Box<dyn Fn(&str) -> Vec<ActionEvent> + Send + Sync>;

/// Listener registry dispatching synchronously to every handler of a key.
///
/// An optional responder is consulted each time a listener is registered;
/// the events it returns are delivered to that listener straight away, which
/// lets tests script whole rounds without racing the code under test.
#[derive(Default)]
pub(crate) struct MockBus {
    next_id: AtomicUsize,
    handlers: Mutex<Vec<(ListenerId, String, ActionHandler)>>,
    removed: Mutex<Vec<ListenerId>>,
    responder: Mutex<Option<Responder>>,
}

impl MockBus {
    pub(crate) fn with_responder<F>(responder: F) -> Self
    where
        F: Fn(&str) -> Vec<ActionEvent> + Send + Sync + 'static,
    {
        let bus = Self::default();
        *bus.responder.lock().unwrap() = Some(Box::new(responder));
        bus
    }

    pub(crate) fn dispatch(&self, key: &str, actor: &str, payload: &str) -> bool {
        let handlers: Vec<ActionHandler> = self
            .handlers
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, k, _)| k == key)
            .map(|(_, _, h)| Arc::clone(h))
            .collect();
        for handler in &handlers {
            handler(ActionEvent::new(actor, payload));
        }
        !handlers.is_empty()
    }

    pub(crate) fn listener_count(&self) -> usize {
        self.handlers.lock().unwrap().len()
    }

    pub(crate) fn removed_count(&self) -> usize {
        self.removed.lock().unwrap().len()
    }
}

impl ActionListenerPort for MockBus {
    fn add_action_listener(
        &self,
        action_key: &str,
        handler: ActionHandler,
    ) -> Result<ListenerId, PortError> {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::SeqCst) as u64);
        self.handlers
            .lock()
            .unwrap()
            .push((id, action_key.to_string(), Arc::clone(&handler)));

        let scripted = match self.responder.lock().unwrap().as_ref() {
            Some(responder) => responder(action_key),
            None => Vec::new(),
        };
        for event in scripted {
            handler(event);
        }
        Ok(id)
    }

    fn remove_action_listener(&self, listener: ListenerId) {
        self.handlers
            .lock()
            .unwrap()
            .retain(|(id, _, _)| *id != listener);
        self.removed.lock().unwrap().push(listener);
    }
}

/// Messenger that records everything it is asked to send
#[derive(Default)]
pub(crate) struct RecordingMessenger {
    next_id: AtomicUsize,
    pub(crate) posts: Mutex<Vec<(MessageTarget, Notice)>>,
    pub(crate) updates: Mutex<Vec<(MessageHandle, Notice)>>,
    fail_posts: bool,
    fail_updates: bool,
}

impl RecordingMessenger {
    pub(crate) fn failing() -> Self {
        Self {
            fail_posts: true,
            ..Self::default()
        }
    }

    /// Posts go through, every update fails.
    pub(crate) fn failing_updates() -> Self {
        Self {
            fail_updates: true,
            ..Self::default()
        }
    }

    pub(crate) fn posted(&self) -> Vec<Notice> {
        self.posts
            .lock()
            .unwrap()
            .iter()
            .map(|(_, n)| n.clone())
            .collect()
    }

    pub(crate) fn updated(&self) -> Vec<Notice> {
        self.updates
            .lock()
            .unwrap()
            .iter()
            .map(|(_, n)| n.clone())
            .collect()
    }
}

#[async_trait]
impl MessengerPort for RecordingMessenger {
    async fn post_message(
        &self,
        target: &MessageTarget,
        notice: &Notice,
    ) -> Result<MessageHandle, PortError> {
        if self.fail_posts {
            return Err(PortError::Delivery("offline".to_string()));
        }
        self.posts
            .lock()
            .unwrap()
            .push((target.clone(), notice.clone()));
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        Ok(MessageHandle::new(target.clone(), id.to_string()))
    }

    async fn update_message(
        &self,
        handle: &MessageHandle,
        notice: &Notice,
    ) -> Result<(), PortError> {
        if self.fail_updates {
            return Err(PortError::Delivery("message expired".to_string()));
        }
        self.updates
            .lock()
            .unwrap()
            .push((handle.clone(), notice.clone()));
        Ok(())
    }
}

type Chooser = Box<dyn Fn(&DecisionRequest) -> Vec<usize> + Send + Sync>;

/// Decision poller answering through a closure
pub(crate) struct ScriptedDecisions {
    chooser: Chooser,
    pub(crate) requests: Mutex<Vec<DecisionRequest>>,
}

impl ScriptedDecisions {
    pub(crate) fn new<F>(chooser: F) -> Self
    where
        F: Fn(&DecisionRequest) -> Vec<usize> + Send + Sync + 'static,
    {
        Self {
            chooser: Box::new(chooser),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn requests(&self) -> Vec<DecisionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl DecisionPort for ScriptedDecisions {
    async fn poll_for_decision(&self, request: DecisionRequest) -> Result<Vec<usize>, PortError> {
        let answer = (self.chooser)(&request);
        self.requests.lock().unwrap().push(request);
        Ok(answer)
    }
}
