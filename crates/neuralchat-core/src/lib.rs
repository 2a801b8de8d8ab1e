//! Domain layer of the NeuralChat client.
//!
//! Holds the data model shared by every other crate, the gateway traits the
//! sync engine talks through, and the shared error type.

pub mod auth;
pub mod chat;
pub mod config;
pub mod error;
pub mod supported_models;

// Re-export common types
pub use auth::{AuthGateway, AuthState, Credentials};
pub use chat::{
    AppendedMessage, ChatGateway, ChatId, ChatSummary, CreatedChat, MessageId, MessageRecord,
    local_message_id,
};
pub use config::ClientConfig;
pub use error::{ChatError, Result};
pub use supported_models::ModelId;
