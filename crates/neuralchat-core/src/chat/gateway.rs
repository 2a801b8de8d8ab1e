//! Remote chat gateway trait.
//!
//! Defines the request/response operations the sync engine consumes from the
//! authoritative chat store.

use super::message::MessageRecord;
use super::model::{ChatId, ChatSummary};
use crate::error::Result;
use async_trait::async_trait;

/// Result of creating a session together with its first message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedChat {
    /// Identifier the remote store assigned to the new session
    pub chat_id: ChatId,
    /// Title the remote store derived for the session
    pub title: String,
    /// Assistant response to the first prompt
    pub response: String,
    /// Identifier of the stored message, when the server reports one
    pub message_id: Option<String>,
}

/// Result of appending a message to an existing session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppendedMessage {
    pub response: String,
    pub message_id: Option<String>,
}

/// An abstract gateway to the remote chat store.
///
/// Every call is a single request/response exchange over a transport that
/// already carries the user's session credential. Implementations report any
/// non-success outcome as an `Err`; callers in the sync engine never look
/// deeper than success vs. failure.
#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// Lists every chat session of the current user, in server order.
    async fn list_chats(&self) -> Result<Vec<ChatSummary>>;

    /// Reads the ordered message timeline of one session.
    async fn read_messages(&self, chat_id: &ChatId) -> Result<Vec<MessageRecord>>;

    /// Creates a new session whose first message is `prompt`.
    async fn create_chat(&self, prompt: &str, model: &str) -> Result<CreatedChat>;

    /// Appends `prompt` to an existing session and returns the answer.
    async fn append_message(
        &self,
        chat_id: &ChatId,
        prompt: &str,
        model: &str,
    ) -> Result<AppendedMessage>;

    /// Deletes a session.
    async fn delete_chat(&self, chat_id: &ChatId) -> Result<()>;
}
