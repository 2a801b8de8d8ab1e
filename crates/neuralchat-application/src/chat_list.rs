//! Chat list store.
//!
//! Holds the session picker's entries, most recent first. Creation is only
//! recorded after the server confirmed it, and so is deletion.

use crate::events::{ChatEvent, EventBus};
use crate::load_status::{LoadOutcome, LoadStatus};
use neuralchat_core::{ChatGateway, ChatId, ChatSummary, Result};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct ChatListState {
    chats: Vec<ChatSummary>,
    status: LoadStatus,
    /// Chat whose delete request is in flight.
    deleting: Option<ChatId>,
}

/// Ordered collection of the user's chat sessions.
pub struct ChatListStore {
    gateway: Arc<dyn ChatGateway>,
    state: RwLock<ChatListState>,
    events: EventBus,
}

impl ChatListStore {
    pub fn new(gateway: Arc<dyn ChatGateway>, events: EventBus) -> Self {
        Self {
            gateway,
            state: RwLock::new(ChatListState::default()),
            events,
        }
    }

    /// Replaces the list with the server's.
    ///
    /// A failure leaves the list empty and is not raised; `status()` reports
    /// `Failed` afterwards.
    pub async fn load(&self) -> LoadOutcome {
        self.state.write().await.status = LoadStatus::Loading;
        let result = self.gateway.list_chats().await;
        self.apply(result).await
    }

    /// Replaces the list with a listing fetched elsewhere, e.g. by the
    /// session probe.
    pub async fn seed(&self, chats: Vec<ChatSummary>) -> LoadOutcome {
        self.apply(Ok(chats)).await
    }

    async fn apply(&self, result: Result<Vec<ChatSummary>>) -> LoadOutcome {
        let outcome = {
            let mut state = self.state.write().await;
            match result {
                Ok(chats) => {
                    state.chats = dedup_by_id(chats);
                    state.status = LoadStatus::Loaded;
                    let count = state.chats.len();
                    tracing::debug!(count, "chat list loaded");
                    LoadOutcome::Applied(count)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "failed to load chat list");
                    state.chats.clear();
                    state.status = LoadStatus::Failed;
                    LoadOutcome::Failed
                }
            }
        };
        self.events.emit(ChatEvent::ChatListChanged);
        outcome
    }

    /// Puts a just-created session at the front of the list.
    ///
    /// An entry with the same id is moved rather than duplicated.
    pub async fn prepend_local(&self, summary: ChatSummary) {
        {
            let mut state = self.state.write().await;
            state.chats.retain(|c| c.id != summary.id);
            tracing::debug!(chat_id = %summary.id, "prepending chat");
            state.chats.insert(0, summary);
        }
        self.events.emit(ChatEvent::ChatListChanged);
    }

    /// Deletes a session on the server, then drops it from the list.
    ///
    /// Returns whether the entry was removed. On failure the list is left as is.
    pub async fn remove_local(&self, id: &ChatId) -> bool {
        self.state.write().await.deleting = Some(id.clone());
        self.events.emit(ChatEvent::DeletingChanged(Some(id.clone())));

        let result = self.gateway.delete_chat(id).await;

        let removed = {
            let mut state = self.state.write().await;
            state.deleting = None;
            match result {
                Ok(()) => {
                    state.chats.retain(|c| &c.id != id);
                    tracing::debug!(chat_id = %id, "chat deleted");
                    true
                }
                Err(e) => {
                    tracing::warn!(chat_id = %id, error = %e, "failed to delete chat");
                    false
                }
            }
        };
        self.events.emit(ChatEvent::DeletingChanged(None));
        if removed {
            self.events.emit(ChatEvent::ChatListChanged);
        }
        removed
    }

    pub async fn chats(&self) -> Vec<ChatSummary> {
        self.state.read().await.chats.clone()
    }

    pub async fn find(&self, id: &ChatId) -> Option<ChatSummary> {
        self.state
            .read()
            .await
            .chats
            .iter()
            .find(|c| &c.id == id)
            .cloned()
    }

    pub async fn status(&self) -> LoadStatus {
        self.state.read().await.status
    }

    pub async fn deleting(&self) -> Option<ChatId> {
        self.state.read().await.deleting.clone()
    }

    /// Forgets everything, e.g. on logout.
    pub async fn clear(&self) {
        *self.state.write().await = ChatListState::default();
        self.events.emit(ChatEvent::ChatListChanged);
    }
}

/// Keeps the first occurrence of each id.
fn dedup_by_id(chats: Vec<ChatSummary>) -> Vec<ChatSummary> {
    let mut seen = std::collections::HashSet::new();
    chats
        .into_iter()
        .filter(|c| seen.insert(c.id.clone()))
        .collect()
}
