use crate::events::{ChatEvent, EventBus};
use neuralchat_core::{AuthState, ChatGateway, ChatSummary};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Decides at startup whether the user already has a valid session.
///
/// The probe is a single read that requires a session. It does not tell
/// "not logged in" apart from "server unreachable": both route the user to
/// the login view, and nothing retries until the next start.
pub struct SessionProbe {
    gateway: Arc<dyn ChatGateway>,
    state: RwLock<AuthState>,
    events: EventBus,
}

impl SessionProbe {
    pub fn new(gateway: Arc<dyn ChatGateway>, events: EventBus) -> Self {
        Self {
            gateway,
            state: RwLock::new(AuthState::Unknown),
            events,
        }
    }

    pub async fn state(&self) -> AuthState {
        *self.state.read().await
    }

    /// Runs the probe and records its verdict.
    pub async fn probe(&self) -> AuthState {
        match self.probe_chats().await {
            Some(_) => AuthState::Authenticated,
            None => AuthState::Unauthenticated,
        }
    }

    /// Runs the probe and hands back the chat listing it read, so a caller
    /// can fill the chat list without a second request.
    pub async fn probe_chats(&self) -> Option<Vec<ChatSummary>> {
        match self.gateway.list_chats().await {
            Ok(chats) => {
                self.set(AuthState::Authenticated).await;
                Some(chats)
            }
            Err(e) => {
                tracing::debug!(error = %e, "session probe failed, treating as unauthenticated");
                self.set(AuthState::Unauthenticated).await;
                None
            }
        }
    }

    /// Called after a successful login.
    pub async fn mark_authenticated(&self) {
        self.set(AuthState::Authenticated).await;
    }

    /// Called after logout.
    pub async fn mark_unauthenticated(&self) {
        self.set(AuthState::Unauthenticated).await;
    }

    async fn set(&self, next: AuthState) {
        let mut state = self.state.write().await;
        if *state != next {
            *state = next;
            drop(state);
            tracing::info!(state = ?next, "auth state changed");
            self.events.emit(ChatEvent::AuthChanged(next));
        }
    }
}
