//! Change notifications emitted by the sync engine.
//!
//! Every mutating operation of a store emits one `ChatEvent` so a view can
//! re-read the state it renders. Events carry only small values; the stores
//! remain the source of truth.

use crate::send_controller::SendState;
use neuralchat_core::{AuthState, ChatId, ModelId};
use tokio::sync::broadcast;

const DEFAULT_CAPACITY: usize = 64;

/// A state change in one of the engine's components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    AuthChanged(AuthState),
    ActiveSessionChanged(Option<ChatId>),
    /// The chat list was reloaded, prepended to, or had an entry removed.
    ChatListChanged,
    /// A delete started (`Some`) or finished (`None`).
    DeletingChanged(Option<ChatId>),
    /// The timeline was loaded, cleared, or reconciled.
    TimelineChanged,
    SendStateChanged(SendState),
    ModelChanged(ModelId),
}

/// Broadcast bus shared by all components of one client.
///
/// Emitting never fails: when nobody listens the event is dropped.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<ChatEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChatEvent> {
        self.sender.subscribe()
    }

    pub fn emit(&self, event: ChatEvent) {
        tracing::trace!(?event, "chat event");
        let _ = self.sender.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
