//! Wire DTOs of the chat server's JSON API.
//!
//! The server uses document-store field names (`_id`, camelCase). These types
//! exist only at the HTTP boundary; everything above it sees domain types.

use chrono::{DateTime, Utc};
use neuralchat_core::{ChatSummary, MessageId, MessageRecord};
use serde::{Deserialize, Serialize};

/// `GET /api/chat/all`
#[derive(Debug, Deserialize)]
pub struct ChatListResponse {
    #[serde(default)]
    pub chats: Vec<ChatDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatDto {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<ChatDto> for ChatSummary {
    /// A chat without `createdAt` is stamped with the local clock, the same
    /// stand-in a freshly created chat gets.
    fn from(dto: ChatDto) -> Self {
        let created_at = dto.created_at.unwrap_or_else(|| {
            tracing::debug!(chat_id = %dto.id, "chat has no createdAt, using now");
            Utc::now()
        });
        ChatSummary::new(dto.id, dto.title, created_at)
    }
}

/// `GET /api/chat/{id}/messages`
#[derive(Debug, Deserialize)]
pub struct MessageListResponse {
    #[serde(default)]
    pub prompts: Vec<MessageDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub prompt: String,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<MessageDto> for MessageRecord {
    fn from(dto: MessageDto) -> Self {
        MessageRecord {
            id: MessageId::confirmed(dto.id),
            prompt: dto.prompt,
            response: dto.response,
            model: dto.model,
            created_at: dto.created_at,
        }
    }
}

/// Body of `POST /api/chat/new/message` and `POST /api/chat/{id}/message`.
#[derive(Debug, Serialize)]
pub struct SendMessageRequest<'a> {
    pub prompt: &'a str,
    pub model: &'a str,
}

/// Reply to either send endpoint. `chatId` and `title` are only present when
/// the call created the session.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageResponse {
    #[serde(default)]
    pub chat_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    pub response: String,
    #[serde(default, alias = "_id")]
    pub message_id: Option<String>,
}

/// Body of the auth endpoints.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsRequest<'a> {
    pub user_name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// Error body returned by every endpoint on failure.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missing_arrays_decode_as_empty() {
        let chats: ChatListResponse = serde_json::from_str("{}").unwrap();
        assert!(chats.chats.is_empty());

        let messages: MessageListResponse = serde_json::from_str("{}").unwrap();
        assert!(messages.prompts.is_empty());
    }

    #[test]
    fn test_chat_without_created_at_is_stamped_now() {
        let before = Utc::now();
        let dto: ChatDto =
            serde_json::from_value(serde_json::json!({ "_id": "s1", "title": "hello" })).unwrap();

        let summary = ChatSummary::from(dto);

        assert_eq!(summary.id.as_str(), "s1");
        assert!(summary.created_at >= before);
        assert!(summary.created_at <= Utc::now());
    }

    #[test]
    fn test_message_dto_maps_to_confirmed_record() {
        let dto: MessageDto = serde_json::from_value(serde_json::json!({
            "_id": "m1",
            "prompt": "hello",
            "response": "hi there",
            "model": "llama3",
            "createdAt": "2025-01-02T03:04:05Z"
        }))
        .unwrap();

        let record = MessageRecord::from(dto);
        assert_eq!(record.id, MessageId::confirmed("m1"));
        assert_eq!(record.response.as_deref(), Some("hi there"));
        assert_eq!(
            record.created_at.map(|t| t.to_rfc3339()),
            Some("2025-01-02T03:04:05+00:00".to_string())
        );
    }

    #[test]
    fn test_send_request_serializes_prompt_and_model() {
        let body = serde_json::to_value(SendMessageRequest {
            prompt: "hello",
            model: "qwen",
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({ "prompt": "hello", "model": "qwen" }));
    }

    #[test]
    fn test_credentials_use_camel_case() {
        let body = serde_json::to_value(CredentialsRequest {
            user_name: "ada",
            email: "ada@example.com",
            password: "secret",
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "userName": "ada", "email": "ada@example.com", "password": "secret" })
        );
    }
}
