//! Sync engine of the NeuralChat client.
//!
//! The stores in this crate keep a local view of the user's chats consistent
//! with the remote chat server while requests are in flight:
//!
//! - [`SessionProbe`] decides whether the user is logged in.
//! - [`ChatListStore`] holds the session picker's entries.
//! - [`MessageTimelineStore`] holds the open chat's messages and drops loads
//!   that resolve after the user moved to another chat.
//! - [`SendController`] shows a sent prompt immediately and reconciles it
//!   with the server's answer, one send at a time.
//! - [`ModelSelector`] picks the model that accompanies the next send.
//!
//! [`ChatClient`] wires them around a shared [`ActiveSession`] and
//! [`EventBus`].

pub mod chat_list;
pub mod client;
pub mod events;
pub mod load_status;
pub mod model_selector;
pub mod send_controller;
pub mod session;
pub mod timeline;

#[cfg(test)]
mod testing;

pub use chat_list::ChatListStore;
pub use client::{ChatClient, NEW_CONVERSATION_TITLE};
pub use events::{ChatEvent, EventBus};
pub use load_status::{LoadOutcome, LoadStatus};
pub use model_selector::ModelSelector;
pub use send_controller::{IgnoreReason, SendController, SendState, SubmitOutcome};
pub use session::{ActiveSession, SessionProbe};
pub use timeline::MessageTimelineStore;
