//! Optimistic send controller.
//!
//! A send shows the user's prompt immediately as a pending record, then makes
//! exactly one gateway call:
//!
//! - no active session: create the session with this first message
//! - otherwise: append the message to the active session
//!
//! Success confirms the pending record (and, for a new session, puts it at the
//! top of the chat list). Failure retracts it. Only one send runs at a time.

use crate::chat_list::ChatListStore;
use crate::events::{ChatEvent, EventBus};
use crate::session::ActiveSession;
use crate::timeline::MessageTimelineStore;
use chrono::Utc;
use neuralchat_core::{ChatError, ChatGateway, ChatId, ChatSummary, ModelId, local_message_id};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SendState {
    #[default]
    Idle,
    Sending,
}

/// Why a submit did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    EmptyPrompt,
    AlreadySending,
}

/// Result of one `submit` call.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The guard rejected the submit; nothing changed.
    Ignored(IgnoreReason),
    /// The server accepted the message.
    Confirmed { chat_id: ChatId, created: bool },
    /// The call failed and the pending record was retracted.
    RolledBack(ChatError),
}

pub struct SendController {
    gateway: Arc<dyn ChatGateway>,
    active: ActiveSession,
    chat_list: Arc<ChatListStore>,
    timeline: Arc<MessageTimelineStore>,
    state: RwLock<SendState>,
    /// Text in the compose box.
    draft: RwLock<String>,
    events: EventBus,
}

impl SendController {
    pub fn new(
        gateway: Arc<dyn ChatGateway>,
        active: ActiveSession,
        chat_list: Arc<ChatListStore>,
        timeline: Arc<MessageTimelineStore>,
        events: EventBus,
    ) -> Self {
        Self {
            gateway,
            active,
            chat_list,
            timeline,
            state: RwLock::new(SendState::Idle),
            draft: RwLock::new(String::new()),
            events,
        }
    }

    pub async fn state(&self) -> SendState {
        *self.state.read().await
    }

    pub async fn draft(&self) -> String {
        self.draft.read().await.clone()
    }

    pub async fn set_draft(&self, text: impl Into<String>) {
        *self.draft.write().await = text.into();
    }

    pub async fn clear_draft(&self) {
        self.draft.write().await.clear();
    }

    /// Sends `prompt` with `model` to the session active right now.
    ///
    /// Whitespace-only prompts and submits during another send are ignored.
    /// Gateway failures are recovered here and reported in the outcome.
    pub async fn submit(&self, prompt: &str, model: ModelId) -> SubmitOutcome {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return SubmitOutcome::Ignored(IgnoreReason::EmptyPrompt);
        }

        {
            let mut state = self.state.write().await;
            if *state == SendState::Sending {
                tracing::debug!("send already in flight, ignoring submit");
                return SubmitOutcome::Ignored(IgnoreReason::AlreadySending);
            }
            *state = SendState::Sending;
        }
        self.events.emit(ChatEvent::SendStateChanged(SendState::Sending));

        // Captured once: later session or model changes do not affect this send.
        let target = self.active.get();
        let model_key = model.key();

        self.clear_draft().await;
        self.timeline.append_temporary(prompt, model_key).await;

        let outcome = match &target {
            None => match self.gateway.create_chat(prompt, model_key).await {
                Ok(created) => {
                    let chat_id = created.chat_id.clone();
                    self.chat_list
                        .prepend_local(ChatSummary::new(chat_id.clone(), created.title, Utc::now()))
                        .await;
                    // The pending record only survives if the new chat is still on screen;
                    // otherwise `confirm` reloads the timeline for the new chat.
                    if self.active.is(None) {
                        self.timeline.assign_session(&chat_id).await;
                    }
                    self.active.set(Some(chat_id.clone()));
                    self.confirm(chat_id, true, created.response, created.message_id)
                        .await
                }
                Err(e) => self.roll_back(e).await,
            },
            Some(chat_id) => match self.gateway.append_message(chat_id, prompt, model_key).await {
                Ok(appended) => {
                    self.confirm(chat_id.clone(), false, appended.response, appended.message_id)
                        .await
                }
                Err(e) => self.roll_back(e).await,
            },
        };

        *self.state.write().await = SendState::Idle;
        self.events.emit(ChatEvent::SendStateChanged(SendState::Idle));
        outcome
    }

    async fn confirm(
        &self,
        chat_id: ChatId,
        created: bool,
        response: String,
        message_id: Option<String>,
    ) -> SubmitOutcome {
        let assigned_id = message_id.unwrap_or_else(local_message_id);
        let reconciled = self
            .timeline
            .reconcile_success(response, assigned_id, Utc::now())
            .await;

        // The pending record was lost to a session switch; if the user is
        // back on this chat, fetch what the server stored instead.
        if !reconciled && self.active.is(Some(&chat_id)) {
            self.timeline.load_for(Some(chat_id.clone())).await;
        }

        tracing::debug!(chat_id = %chat_id, created, "send confirmed");
        SubmitOutcome::Confirmed { chat_id, created }
    }

    async fn roll_back(&self, error: ChatError) -> SubmitOutcome {
        tracing::warn!(error = %error, "send failed, retracting pending message");
        self.timeline.reconcile_failure().await;
        SubmitOutcome::RolledBack(error)
    }
}
