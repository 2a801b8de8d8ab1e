use crate::events::{ChatEvent, EventBus};
use neuralchat_core::ChatId;
use std::sync::Arc;
use tokio::sync::watch;

/// The one "which chat is open" value of a client.
///
/// `None` means the user is composing a session that does not exist yet.
/// Clones share the same value.
#[derive(Debug, Clone)]
pub struct ActiveSession {
    sender: Arc<watch::Sender<Option<ChatId>>>,
    events: EventBus,
}

impl ActiveSession {
    pub fn new(events: EventBus) -> Self {
        let (sender, _) = watch::channel(None);
        Self {
            sender: Arc::new(sender),
            events,
        }
    }

    pub fn get(&self) -> Option<ChatId> {
        self.sender.borrow().clone()
    }

    /// Whether `id` is the active session.
    pub fn is(&self, id: Option<&ChatId>) -> bool {
        self.sender.borrow().as_ref() == id
    }

    /// Replaces the active session. Returns `false` when the value was unchanged.
    pub fn set(&self, id: Option<ChatId>) -> bool {
        let changed = self.sender.send_if_modified(|current| {
            if *current == id {
                return false;
            }
            *current = id.clone();
            true
        });
        if changed {
            tracing::debug!(active = ?id, "active session changed");
            self.events.emit(ChatEvent::ActiveSessionChanged(id));
        }
        changed
    }

    /// Observes changes without going through the event bus.
    pub fn watch(&self) -> watch::Receiver<Option<ChatId>> {
        self.sender.subscribe()
    }
}
