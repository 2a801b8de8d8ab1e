//! Message timeline types.
//!
//! A `MessageRecord` is one exchange: the user's prompt together with the
//! assistant's response. While a send is in flight the record carries
//! `MessageId::Pending` and no response.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle-aware message identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "state", content = "id", rename_all = "snake_case")]
pub enum MessageId {
    /// The single speculative record of the send currently in flight.
    Pending,
    /// A record the remote store has accepted.
    Confirmed(String),
}

impl MessageId {
    pub fn confirmed(raw: impl Into<String>) -> Self {
        Self::Confirmed(raw.into())
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

/// Generates a permanent id for a confirmed message whose server id is unknown.
pub fn local_message_id() -> String {
    format!("local-{}", Uuid::new_v4())
}

/// A prompt/response pair in a chat timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub id: MessageId,
    pub prompt: String,
    /// `None` while the answer is still awaited.
    pub response: Option<String>,
    /// Wire key of the model that answered (or will answer).
    pub model: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl MessageRecord {
    /// Builds the speculative record inserted before the remote call completes.
    pub fn pending(prompt: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            id: MessageId::Pending,
            prompt: prompt.into(),
            response: None,
            model: model.into(),
            created_at: None,
        }
    }

    pub fn confirmed(
        id: impl Into<String>,
        prompt: impl Into<String>,
        response: impl Into<String>,
        model: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: MessageId::confirmed(id),
            prompt: prompt.into(),
            response: Some(response.into()),
            model: model.into(),
            created_at: Some(created_at),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.id.is_pending()
    }

    pub fn is_answered(&self) -> bool {
        self.response.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_record_has_no_response() {
        let record = MessageRecord::pending("hello", "llama3");
        assert!(record.is_pending());
        assert!(!record.is_answered());
        assert_eq!(record.created_at, None);
    }

    #[test]
    fn test_local_ids_are_unique() {
        let a = local_message_id();
        let b = local_message_id();
        assert!(a.starts_with("local-"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_message_id_serialization_is_tagged() {
        let pending = serde_json::to_value(MessageId::Pending).unwrap();
        assert_eq!(pending, serde_json::json!({ "state": "pending" }));

        let confirmed = serde_json::to_value(MessageId::confirmed("m1")).unwrap();
        assert_eq!(
            confirmed,
            serde_json::json!({ "state": "confirmed", "id": "m1" })
        );
    }
}
