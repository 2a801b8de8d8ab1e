//! Chat client use case.
//!
//! `ChatClient` owns one instance of every engine component around a single
//! `ActiveSession` and event bus, and implements the view-level flows: start,
//! pick a chat, start a new chat, delete, send, log in and out.

use crate::chat_list::ChatListStore;
use crate::events::{ChatEvent, EventBus};
use crate::load_status::LoadOutcome;
use crate::model_selector::ModelSelector;
use crate::send_controller::{SendController, SendState, SubmitOutcome};
use crate::session::{ActiveSession, SessionProbe};
use crate::timeline::MessageTimelineStore;
use neuralchat_core::{
    AuthGateway, AuthState, ChatGateway, ChatId, ClientConfig, Credentials, ModelId, Result,
};
use neuralchat_infrastructure::HttpChatGateway;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Title shown while no chat is active.
pub const NEW_CONVERSATION_TITLE: &str = "New Conversation";

pub struct ChatClient {
    auth_gateway: Arc<dyn AuthGateway>,
    events: EventBus,
    active: ActiveSession,
    probe: SessionProbe,
    chat_list: Arc<ChatListStore>,
    timeline: Arc<MessageTimelineStore>,
    sender: SendController,
    models: ModelSelector,
}

impl ChatClient {
    /// Creates a client over the given gateways.
    ///
    /// # Arguments
    ///
    /// * `chat_gateway` - Remote chat store
    /// * `auth_gateway` - Account operations of the same server
    /// * `default_model` - Model selected until the user picks another
    pub fn new(
        chat_gateway: Arc<dyn ChatGateway>,
        auth_gateway: Arc<dyn AuthGateway>,
        default_model: ModelId,
    ) -> Self {
        let events = EventBus::new();
        let active = ActiveSession::new(events.clone());
        let chat_list = Arc::new(ChatListStore::new(chat_gateway.clone(), events.clone()));
        let timeline = Arc::new(MessageTimelineStore::new(
            chat_gateway.clone(),
            active.clone(),
            events.clone(),
        ));
        let sender = SendController::new(
            chat_gateway.clone(),
            active.clone(),
            chat_list.clone(),
            timeline.clone(),
            events.clone(),
        );

        Self {
            auth_gateway,
            probe: SessionProbe::new(chat_gateway, events.clone()),
            models: ModelSelector::new(default_model, events.clone()),
            events,
            active,
            chat_list,
            timeline,
            sender,
        }
    }

    /// Creates a client talking HTTP to `config.base_url`.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let gateway = Arc::new(HttpChatGateway::new(config.base_url.clone())?);
        tracing::info!(base_url = %gateway.base_url(), "chat client configured");
        Ok(Self::new(gateway.clone(), gateway, config.default_model))
    }

    /// Probes the session and, when logged in, fills the chat list from the
    /// probe's own listing.
    pub async fn start(&self) -> AuthState {
        match self.probe.probe_chats().await {
            Some(chats) => {
                self.chat_list.seed(chats).await;
                AuthState::Authenticated
            }
            None => AuthState::Unauthenticated,
        }
    }

    /// Opens `chat_id` and reloads its timeline.
    ///
    /// Returns `None` when the chat is already open.
    pub async fn select_chat(&self, chat_id: ChatId) -> Option<LoadOutcome> {
        if self.active.is(Some(&chat_id)) {
            return None;
        }
        self.sender.clear_draft().await;
        self.active.set(Some(chat_id.clone()));
        Some(self.timeline.load_for(Some(chat_id)).await)
    }

    /// Switches to composing a chat that does not exist yet.
    pub async fn new_chat(&self) {
        self.sender.clear_draft().await;
        self.show_new_chat().await;
    }

    /// Deletes a chat once the server confirms it. Deleting the open chat
    /// switches to a new chat.
    pub async fn delete_chat(&self, chat_id: &ChatId) -> bool {
        let removed = self.chat_list.remove_local(chat_id).await;
        if removed && self.active.is(Some(chat_id)) {
            self.show_new_chat().await;
        }
        removed
    }

    /// Replaces the compose box text.
    pub async fn set_draft(&self, text: impl Into<String>) {
        self.sender.set_draft(text).await;
    }

    /// Sends the compose box text.
    pub async fn send_draft(&self) -> SubmitOutcome {
        let draft = self.sender.draft().await;
        self.send(&draft).await
    }

    /// Sends `prompt` to the open chat with the selected model.
    pub async fn send(&self, prompt: &str) -> SubmitOutcome {
        let model = self.models.selected().await;
        self.sender.submit(prompt, model).await
    }

    /// Logs in, closes whatever chat was open and loads the chat list.
    ///
    /// # Errors
    ///
    /// Returns the server's rejection; `ChatError::user_message` gives the
    /// text to show on the form.
    pub async fn login(&self, credentials: &Credentials) -> Result<()> {
        self.auth_gateway.login(credentials).await?;
        self.probe.mark_authenticated().await;
        self.sender.clear_draft().await;
        self.show_new_chat().await;
        self.chat_list.load().await;
        Ok(())
    }

    /// Creates an account. The user still has to log in afterwards.
    pub async fn register(&self, credentials: &Credentials) -> Result<()> {
        self.auth_gateway.register(credentials).await
    }

    /// Ends the session and forgets all local state.
    ///
    /// A failing remote logout is ignored: the local state is reset anyway.
    pub async fn logout(&self) {
        if let Err(e) = self.auth_gateway.logout().await {
            tracing::debug!(error = %e, "remote logout failed");
        }
        self.sender.clear_draft().await;
        self.show_new_chat().await;
        self.chat_list.clear().await;
        self.probe.mark_unauthenticated().await;
    }

    /// Title of the open chat, or the new-conversation placeholder.
    pub async fn active_title(&self) -> String {
        match self.active.get() {
            Some(id) => self
                .chat_list
                .find(&id)
                .await
                .map(|c| c.title)
                .unwrap_or_else(|| NEW_CONVERSATION_TITLE.to_string()),
            None => NEW_CONVERSATION_TITLE.to_string(),
        }
    }

    /// The compose box accepts input only while no send is in flight.
    pub async fn input_enabled(&self) -> bool {
        self.sender.state().await == SendState::Idle
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChatEvent> {
        self.events.subscribe()
    }

    pub fn active(&self) -> &ActiveSession {
        &self.active
    }

    pub fn probe(&self) -> &SessionProbe {
        &self.probe
    }

    pub fn chat_list(&self) -> &ChatListStore {
        &self.chat_list
    }

    pub fn timeline(&self) -> &MessageTimelineStore {
        &self.timeline
    }

    pub fn sender(&self) -> &SendController {
        &self.sender
    }

    pub fn models(&self) -> &ModelSelector {
        &self.models
    }

    async fn show_new_chat(&self) {
        self.active.set(None);
        self.timeline.load_for(None).await;
    }
}
