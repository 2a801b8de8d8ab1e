//! In-memory gateway used by the engine's unit tests.

use async_trait::async_trait;
use chrono::Utc;
use neuralchat_core::{
    AppendedMessage, AuthGateway, ChatError, ChatGateway, ChatId, ChatSummary, CreatedChat,
    Credentials, MessageRecord, Result,
};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Gateway operations that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    List,
    Read,
    Create,
    Append,
    Delete,
    Login,
    Register,
    Logout,
}

#[derive(Default)]
struct ServerState {
    chats: Vec<ChatSummary>,
    messages: HashMap<ChatId, Vec<MessageRecord>>,
    replies: HashMap<String, String>,
    next_chat: usize,
    next_message: usize,
}

/// Mock chat server.
///
/// Calls are logged as strings (`list`, `read:<id>`, `create:<prompt>`,
/// `append:<id>:<prompt>`, `delete:<id>`, `login:<user>`, `register:<user>`,
/// `logout`). A gate registered under a call string holds that call until
/// the test releases it.
#[derive(Default)]
pub struct MockGateway {
    server: Mutex<ServerState>,
    failing: Mutex<HashSet<Op>>,
    calls: Mutex<Vec<String>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    hide_message_ids: Mutex<bool>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chat(self, id: &str, title: &str) -> Self {
        self.server
            .lock()
            .unwrap()
            .chats
            .push(ChatSummary::new(id, title, Utc::now()));
        self
    }

    pub fn with_messages(self, id: &str, prompts: &[&str]) -> Self {
        {
            let mut server = self.server.lock().unwrap();
            let records = prompts
                .iter()
                .map(|p| {
                    server.next_message += 1;
                    MessageRecord::confirmed(
                        format!("{id}-m{}", server.next_message),
                        *p,
                        format!("re: {p}"),
                        "llama3",
                        Utc::now(),
                    )
                })
                .collect();
            server.messages.insert(ChatId::from(id), records);
        }
        self
    }

    /// Scripts the assistant's answer to `prompt`.
    pub fn with_reply(self, prompt: &str, reply: &str) -> Self {
        self.server
            .lock()
            .unwrap()
            .replies
            .insert(prompt.to_string(), reply.to_string());
        self
    }

    /// Stops reporting message ids in send replies.
    pub fn without_message_ids(self) -> Self {
        *self.hide_message_ids.lock().unwrap() = true;
        self
    }

    pub fn fail(&self, op: Op) {
        self.failing.lock().unwrap().insert(op);
    }

    pub fn recover(&self, op: Op) {
        self.failing.lock().unwrap().remove(&op);
    }

    /// Holds the call logged as `call` until the returned handle is notified.
    pub fn gate(&self, call: &str) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.gates
            .lock()
            .unwrap()
            .insert(call.to_string(), notify.clone());
        notify
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn stored_messages(&self, id: &str) -> Vec<MessageRecord> {
        self.server
            .lock()
            .unwrap()
            .messages
            .get(&ChatId::from(id))
            .cloned()
            .unwrap_or_default()
    }

    /// Yields until `call` has been made.
    pub async fn wait_for_call(&self, call: &str) {
        for _ in 0..10_000 {
            if self.calls().iter().any(|c| c == call) {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("gateway call `{call}` never happened; saw {:?}", self.calls());
    }

    async fn enter(&self, call: String, op: Op) -> Result<()> {
        self.calls.lock().unwrap().push(call.clone());
        let gate = self.gates.lock().unwrap().remove(&call);
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if self.failing.lock().unwrap().contains(&op) {
            return Err(ChatError::remote(500, Some(format!("{op:?} failed"))));
        }
        Ok(())
    }

    fn store_exchange(&self, id: &ChatId, prompt: &str, model: &str) -> (String, Option<String>) {
        let mut server = self.server.lock().unwrap();
        let reply = server
            .replies
            .get(prompt)
            .cloned()
            .unwrap_or_else(|| format!("re: {prompt}"));
        server.next_message += 1;
        let message_id = format!("{id}-m{}", server.next_message);
        server
            .messages
            .entry(id.clone())
            .or_default()
            .push(MessageRecord::confirmed(
                message_id.clone(),
                prompt,
                reply.clone(),
                model,
                Utc::now(),
            ));
        let reported = (!*self.hide_message_ids.lock().unwrap()).then_some(message_id);
        (reply, reported)
    }
}

#[async_trait]
impl ChatGateway for MockGateway {
    async fn list_chats(&self) -> Result<Vec<ChatSummary>> {
        self.enter("list".to_string(), Op::List).await?;
        Ok(self.server.lock().unwrap().chats.clone())
    }

    async fn read_messages(&self, chat_id: &ChatId) -> Result<Vec<MessageRecord>> {
        self.enter(format!("read:{chat_id}"), Op::Read).await?;
        Ok(self.stored_messages(chat_id.as_str()))
    }

    async fn create_chat(&self, prompt: &str, model: &str) -> Result<CreatedChat> {
        self.enter(format!("create:{prompt}"), Op::Create).await?;
        let chat_id = {
            let mut server = self.server.lock().unwrap();
            server.next_chat += 1;
            let chat_id = ChatId::new(format!("s{}", server.next_chat));
            server
                .chats
                .insert(0, ChatSummary::new(chat_id.clone(), prompt, Utc::now()));
            chat_id
        };
        let (response, message_id) = self.store_exchange(&chat_id, prompt, model);
        Ok(CreatedChat {
            chat_id,
            title: prompt.to_string(),
            response,
            message_id,
        })
    }

    async fn append_message(
        &self,
        chat_id: &ChatId,
        prompt: &str,
        model: &str,
    ) -> Result<AppendedMessage> {
        self.enter(format!("append:{chat_id}:{prompt}"), Op::Append)
            .await?;
        let (response, message_id) = self.store_exchange(chat_id, prompt, model);
        Ok(AppendedMessage {
            response,
            message_id,
        })
    }

    async fn delete_chat(&self, chat_id: &ChatId) -> Result<()> {
        self.enter(format!("delete:{chat_id}"), Op::Delete).await?;
        let mut server = self.server.lock().unwrap();
        server.chats.retain(|c| &c.id != chat_id);
        server.messages.remove(chat_id);
        Ok(())
    }
}

#[async_trait]
impl AuthGateway for MockGateway {
    async fn login(&self, credentials: &Credentials) -> Result<()> {
        self.enter(format!("login:{}", credentials.user_name), Op::Login)
            .await
    }

    async fn register(&self, credentials: &Credentials) -> Result<()> {
        self.enter(format!("register:{}", credentials.user_name), Op::Register)
            .await
    }

    async fn logout(&self) -> Result<()> {
        self.enter("logout".to_string(), Op::Logout).await
    }
}
