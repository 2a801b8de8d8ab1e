//! Message timeline store.
//!
//! Holds the prompt/response pairs of the active session only. Loads are
//! tagged with the session they were issued for; a result that arrives after
//! the user moved elsewhere is dropped, whatever order the responses come in.
//!
//! At most one `Pending` record exists. It belongs to the session that was
//! active when it was appended and disappears on any switch away from it.

use crate::events::{ChatEvent, EventBus};
use crate::load_status::{LoadOutcome, LoadStatus};
use crate::session::ActiveSession;
use chrono::{DateTime, Utc};
use neuralchat_core::{ChatGateway, ChatId, MessageId, MessageRecord};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct TimelineState {
    /// Session the records belong to (`None`: a chat not created yet).
    session: Option<ChatId>,
    records: Vec<MessageRecord>,
    status: LoadStatus,
}

impl TimelineState {
    fn pending(&self) -> Option<&MessageRecord> {
        self.records.iter().find(|r| r.is_pending())
    }

    /// Switches ownership to `session`, dropping records of any other session.
    fn rebind(&mut self, session: Option<ChatId>) {
        if self.session != session {
            self.records.clear();
            self.session = session;
        }
    }
}

pub struct MessageTimelineStore {
    gateway: Arc<dyn ChatGateway>,
    active: ActiveSession,
    state: RwLock<TimelineState>,
    events: EventBus,
}

impl MessageTimelineStore {
    pub fn new(gateway: Arc<dyn ChatGateway>, active: ActiveSession, events: EventBus) -> Self {
        Self {
            gateway,
            active,
            state: RwLock::new(TimelineState::default()),
            events,
        }
    }

    /// Loads the timeline of `session`, or clears it for a new chat.
    ///
    /// The result is applied only if `session` is still the active session
    /// when the gateway answers. A failed load empties the timeline.
    pub async fn load_for(&self, session: Option<ChatId>) -> LoadOutcome {
        let Some(chat_id) = session else {
            {
                let mut state = self.state.write().await;
                state.session = None;
                state.records.clear();
                state.status = LoadStatus::Idle;
            }
            self.events.emit(ChatEvent::TimelineChanged);
            return LoadOutcome::Cleared;
        };

        {
            let mut state = self.state.write().await;
            state.rebind(Some(chat_id.clone()));
            state.status = LoadStatus::Loading;
        }
        self.events.emit(ChatEvent::TimelineChanged);

        let result = self.gateway.read_messages(&chat_id).await;

        let outcome = {
            let mut state = self.state.write().await;
            if !self.active.is(Some(&chat_id)) || state.session.as_ref() != Some(&chat_id) {
                tracing::debug!(chat_id = %chat_id, "discarding stale timeline load");
                return LoadOutcome::Discarded;
            }

            // An unresolved send of this session outlives the reload.
            let pending = state.pending().cloned();
            let outcome = match result {
                Ok(records) => {
                    let count = records.len();
                    state.records = records;
                    state.status = LoadStatus::Loaded;
                    tracing::debug!(chat_id = %chat_id, count, "timeline loaded");
                    LoadOutcome::Applied(count)
                }
                Err(e) => {
                    tracing::warn!(chat_id = %chat_id, error = %e, "failed to load timeline");
                    state.records.clear();
                    state.status = LoadStatus::Failed;
                    LoadOutcome::Failed
                }
            };
            if let Some(pending) = pending {
                state.records.push(pending);
            }
            outcome
        };
        self.events.emit(ChatEvent::TimelineChanged);
        outcome
    }

    /// Appends the speculative record of a send that is about to start.
    pub async fn append_temporary(&self, prompt: &str, model: &str) {
        {
            let mut state = self.state.write().await;
            debug_assert!(state.pending().is_none(), "only one send may be in flight");
            state.records.push(MessageRecord::pending(prompt, model));
        }
        self.events.emit(ChatEvent::TimelineChanged);
    }

    /// Replaces the pending record with the confirmed exchange.
    ///
    /// Returns `false` if there was no pending record left to replace, which
    /// happens when the user switched sessions while the send was in flight.
    pub async fn reconcile_success(
        &self,
        response: impl Into<String>,
        assigned_id: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> bool {
        let replaced = {
            let mut state = self.state.write().await;
            match state.records.iter_mut().find(|r| r.is_pending()) {
                Some(record) => {
                    record.id = MessageId::confirmed(assigned_id);
                    record.response = Some(response.into());
                    record.created_at = Some(created_at);
                    true
                }
                None => false,
            }
        };
        if replaced {
            self.events.emit(ChatEvent::TimelineChanged);
        } else {
            tracing::debug!("no pending record to reconcile");
        }
        replaced
    }

    /// Removes the pending record, restoring the timeline to its pre-send state.
    pub async fn reconcile_failure(&self) -> bool {
        let removed = {
            let mut state = self.state.write().await;
            let before = state.records.len();
            state.records.retain(|r| !r.is_pending());
            state.records.len() != before
        };
        if removed {
            self.events.emit(ChatEvent::TimelineChanged);
        }
        removed
    }

    /// Records that the not-yet-created chat shown now has a remote id.
    pub async fn assign_session(&self, chat_id: &ChatId) {
        let mut state = self.state.write().await;
        if state.session.is_none() {
            state.session = Some(chat_id.clone());
        }
    }

    pub async fn records(&self) -> Vec<MessageRecord> {
        self.state.read().await.records.clone()
    }

    pub async fn session(&self) -> Option<ChatId> {
        self.state.read().await.session.clone()
    }

    pub async fn status(&self) -> LoadStatus {
        self.state.read().await.status
    }

    pub async fn pending(&self) -> Option<MessageRecord> {
        self.state.read().await.pending().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockGateway, Op};
    use pretty_assertions::assert_eq;

    fn timeline(gateway: MockGateway) -> (Arc<MessageTimelineStore>, ActiveSession, Arc<MockGateway>) {
        let events = EventBus::new();
        let gateway = Arc::new(gateway);
        let active = ActiveSession::new(events.clone());
        let store = MessageTimelineStore::new(gateway.clone(), active.clone(), events);
        (Arc::new(store), active, gateway)
    }

    async fn prompts(store: &MessageTimelineStore) -> Vec<String> {
        store.records().await.into_iter().map(|r| r.prompt).collect()
    }

    async fn select(store: &MessageTimelineStore, active: &ActiveSession, id: &str) -> LoadOutcome {
        active.set(Some(ChatId::from(id)));
        store.load_for(Some(ChatId::from(id))).await
    }

    #[tokio::test]
    async fn test_load_for_replaces_timeline() {
        let (store, active, _) = timeline(MockGateway::new().with_messages("a", &["one", "two"]));

        assert_eq!(select(&store, &active, "a").await, LoadOutcome::Applied(2));
        assert_eq!(prompts(&store).await, vec!["one", "two"]);
        assert_eq!(store.session().await, Some(ChatId::from("a")));
        assert_eq!(store.status().await, LoadStatus::Loaded);
    }

    #[tokio::test]
    async fn test_load_for_none_clears_without_gateway_call() {
        let (store, active, gateway) = timeline(MockGateway::new().with_messages("a", &["one"]));
        select(&store, &active, "a").await;

        active.set(None);
        assert_eq!(store.load_for(None).await, LoadOutcome::Cleared);
        assert!(store.records().await.is_empty());
        assert_eq!(gateway.calls(), vec!["read:a"]);
    }

    #[tokio::test]
    async fn test_load_failure_leaves_timeline_empty() {
        let (store, active, gateway) = timeline(MockGateway::new().with_messages("a", &["one"]));
        gateway.fail(Op::Read);

        assert_eq!(select(&store, &active, "a").await, LoadOutcome::Failed);
        assert!(store.records().await.is_empty());
        assert_eq!(store.status().await, LoadStatus::Failed);
    }

    #[tokio::test]
    async fn test_stale_load_is_discarded() {
        let (store, active, gateway) = timeline(
            MockGateway::new()
                .with_messages("a", &["from a"])
                .with_messages("b", &["from b"]),
        );
        let gate_a = gateway.gate("read:a");

        active.set(Some(ChatId::from("a")));
        let slow = {
            let store = store.clone();
            tokio::spawn(async move { store.load_for(Some(ChatId::from("a"))).await })
        };
        gateway.wait_for_call("read:a").await;

        assert_eq!(select(&store, &active, "b").await, LoadOutcome::Applied(1));
        gate_a.notify_one();

        assert_eq!(slow.await.unwrap(), LoadOutcome::Discarded);
        assert_eq!(prompts(&store).await, vec!["from b"]);
        assert_eq!(store.session().await, Some(ChatId::from("b")));
    }

    #[tokio::test]
    async fn test_load_for_new_chat_discards_slow_load() {
        let (store, active, gateway) = timeline(MockGateway::new().with_messages("a", &["from a"]));
        let gate_a = gateway.gate("read:a");

        active.set(Some(ChatId::from("a")));
        let slow = {
            let store = store.clone();
            tokio::spawn(async move { store.load_for(Some(ChatId::from("a"))).await })
        };
        gateway.wait_for_call("read:a").await;

        active.set(None);
        store.load_for(None).await;
        gate_a.notify_one();

        assert_eq!(slow.await.unwrap(), LoadOutcome::Discarded);
        assert!(store.records().await.is_empty());
    }

    #[tokio::test]
    async fn test_append_temporary_then_failure_restores_timeline() {
        let (store, active, _) = timeline(MockGateway::new().with_messages("a", &["one", "two"]));
        select(&store, &active, "a").await;
        let before = store.records().await;

        store.append_temporary("three", "llama3").await;
        assert_eq!(store.records().await.len(), 3);
        assert!(store.pending().await.is_some());

        assert!(store.reconcile_failure().await);
        assert_eq!(store.records().await, before);
    }

    #[tokio::test]
    async fn test_reconcile_success_confirms_pending_record() {
        let (store, _, _) = timeline(MockGateway::new());
        store.append_temporary("hello", "qwen").await;

        let now = Utc::now();
        assert!(store.reconcile_success("hi there", "m1", now).await);

        assert_eq!(
            store.records().await,
            vec![MessageRecord::confirmed("m1", "hello", "hi there", "qwen", now)]
        );
        assert_eq!(store.pending().await, None);
    }

    #[tokio::test]
    async fn test_reconcile_without_pending_is_a_no_op() {
        let (store, active, _) = timeline(MockGateway::new().with_messages("a", &["one"]));
        select(&store, &active, "a").await;
        let before = store.records().await;

        assert!(!store.reconcile_success("late", "m9", Utc::now()).await);
        assert!(!store.reconcile_failure().await);
        assert_eq!(store.records().await, before);
    }

    #[tokio::test]
    async fn test_switching_session_drops_pending_record() {
        let (store, active, _) = timeline(
            MockGateway::new()
                .with_messages("a", &["one"])
                .with_messages("b", &["other"]),
        );
        select(&store, &active, "a").await;
        store.append_temporary("in flight", "llama3").await;

        select(&store, &active, "b").await;

        assert_eq!(prompts(&store).await, vec!["other"]);
        assert_eq!(store.pending().await, None);
    }

    #[tokio::test]
    async fn test_reload_of_same_session_keeps_pending_record() {
        let (store, active, _) = timeline(MockGateway::new().with_messages("a", &["one"]));
        select(&store, &active, "a").await;
        store.append_temporary("in flight", "llama3").await;

        store.load_for(Some(ChatId::from("a"))).await;

        assert_eq!(prompts(&store).await, vec!["one", "in flight"]);
        assert!(store.records().await[1].is_pending());
    }

    #[tokio::test]
    async fn test_assign_session_only_binds_new_chat() {
        let (store, active, _) = timeline(MockGateway::new().with_messages("a", &["one"]));
        store.assign_session(&ChatId::from("s1")).await;
        assert_eq!(store.session().await, Some(ChatId::from("s1")));

        select(&store, &active, "a").await;
        store.assign_session(&ChatId::from("s2")).await;
        assert_eq!(store.session().await, Some(ChatId::from("a")));
    }
}
