use crate::events::{ChatEvent, EventBus};
use neuralchat_core::{ModelId, Result};
use tokio::sync::RwLock;

/// Which model accompanies the next send.
pub struct ModelSelector {
    selected: RwLock<ModelId>,
    events: EventBus,
}

impl ModelSelector {
    pub fn new(initial: ModelId, events: EventBus) -> Self {
        Self {
            selected: RwLock::new(initial),
            events,
        }
    }

    pub async fn selected(&self) -> ModelId {
        *self.selected.read().await
    }

    pub async fn select(&self, model: ModelId) {
        let mut selected = self.selected.write().await;
        if *selected != model {
            *selected = model;
            drop(selected);
            self.events.emit(ChatEvent::ModelChanged(model));
        }
    }

    /// Selects by wire key; keys outside the catalogue are rejected.
    pub async fn select_key(&self, key: &str) -> Result<ModelId> {
        let model = ModelId::from_key(key)?;
        self.select(model).await;
        Ok(model)
    }

    pub fn options(&self) -> Vec<ModelId> {
        ModelId::all().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neuralchat_core::ChatError;

    #[tokio::test]
    async fn test_select_by_key() {
        let selector = ModelSelector::new(ModelId::default(), EventBus::new());
        assert_eq!(selector.select_key("qwen").await.unwrap(), ModelId::Qwen);
        assert_eq!(selector.selected().await, ModelId::Qwen);
    }

    #[tokio::test]
    async fn test_unknown_key_keeps_selection() {
        let selector = ModelSelector::new(ModelId::Llama3Fast, EventBus::new());
        let err = selector.select_key("mistral").await.unwrap_err();
        assert_eq!(err, ChatError::UnknownModel("mistral".to_string()));
        assert_eq!(selector.selected().await, ModelId::Llama3Fast);
    }

    #[tokio::test]
    async fn test_only_real_changes_emit_events() {
        let events = EventBus::new();
        let mut rx = events.subscribe();
        let selector = ModelSelector::new(ModelId::Llama3, events);

        selector.select(ModelId::Llama3).await;
        selector.select(ModelId::Qwen).await;

        assert_eq!(rx.recv().await.unwrap(), ChatEvent::ModelChanged(ModelId::Qwen));
        assert!(rx.try_recv().is_err());
    }
}
