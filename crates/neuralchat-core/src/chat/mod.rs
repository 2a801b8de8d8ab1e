//! Chat domain module.
//!
//! # Module Structure
//!
//! - `model`: session identifiers and summaries (`ChatId`, `ChatSummary`)
//! - `message`: timeline records (`MessageId`, `MessageRecord`)
//! - `gateway`: the remote store interface (`ChatGateway`)

mod gateway;
mod message;
mod model;

pub use gateway::{AppendedMessage, ChatGateway, CreatedChat};
pub use message::{MessageId, MessageRecord, local_message_id};
pub use model::{ChatId, ChatSummary};
