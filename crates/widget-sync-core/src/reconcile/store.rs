//! Client-side widget store
//!
//! Mirrors the server collection. Every structured result replaces local
//! state wholesale; user edits are applied optimistically and then
//! superseded by whatever the server returns.

use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};
use serde_json::{json, Value};

use super::invoker::{InvokeResult, ToolInvoker};
use crate::bridge::{GlobalBridge, GlobalKey, Subscription};
use crate::log_warn;
use crate::logging::Logger;
use crate::tools::TodoTool;
use crate::types::{Item, ItemId, ResultAction, StructuredResult};

/// Snapshot of what the widget renders
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreState {
    pub items: Vec<Item>,
    pub last_action: Option<ResultAction>,
    pub message: Option<String>,
    /// Bumped on every applied result or optimistic edit
    pub revision: u64,
}

pub struct WidgetStore {
    state: RwLock<StoreState>,
    subscription: Mutex<Option<Subscription>>,
    logger: Arc<dyn Logger>,
}

impl WidgetStore {
    pub fn new(logger: Arc<dyn Logger>) -> Self {
        Self {
            state: RwLock::new(StoreState::default()),
            subscription: Mutex::new(None),
            logger,
        }
    }

    /// Replace local state with a server result
    pub fn apply_result(&self, result: StructuredResult) {
        let mut state = self.state.write();
        self.logger.debug(&format!(
            "[WidgetStore] Applying {} result ({} items)",
            result.action,
            result.items.len()
        ));
        state.items = result.items;
        state.last_action = Some(result.action);
        state.message = Some(result.message);
        state.revision += 1;
    }

    /// Decode a raw tool output and apply it. Returns false if it does not
    /// have the structured result shape.
    pub fn apply_payload(&self, payload: &Value) -> bool {
        match serde_json::from_value::<StructuredResult>(payload.clone()) {
            Ok(result) => {
                self.apply_result(result);
                true
            }
            Err(e) => {
                self.logger
                    .warn(&format!("[WidgetStore] Ignoring tool output: {}", e));
                false
            }
        }
    }

    /// Follow the host's tool output through `bridge`.
    ///
    /// Applies the current output immediately, then every change after it.
    /// Replaces any earlier attachment.
    pub fn attach(self: &Arc<Self>, bridge: &GlobalBridge) {
        if let Some(current) = bridge.read(GlobalKey::ToolOutput) {
            if !current.is_null() {
                self.apply_payload(&current);
            }
        }

        let store: Weak<Self> = Arc::downgrade(self);
        let subscription = bridge.subscribe(GlobalKey::ToolOutput, move |value| {
            let Some(store) = store.upgrade() else {
                return;
            };
            match value {
                Some(payload) if !payload.is_null() => {
                    store.apply_payload(&payload);
                }
                _ => {}
            }
        });
        *self.subscription.lock() = Some(subscription);
    }

    /// Stop following tool output
    pub fn detach(&self) {
        if let Some(subscription) = self.subscription.lock().take() {
            subscription.unsubscribe();
        }
    }

    pub fn is_attached(&self) -> bool {
        self.subscription
            .lock()
            .as_ref()
            .map_or(false, Subscription::is_active)
    }

    /// Flip completion locally, then ask the server to complete the item.
    ///
    /// The server only ever marks items completed, so toggling a completed
    /// item is corrected by the response.
    pub async fn toggle(
        &self,
        id: &ItemId,
        invoker: &dyn ToolInvoker,
    ) -> InvokeResult<StructuredResult> {
        self.edit(|items| {
            if let Some(item) = items.iter_mut().find(|item| &item.id == id) {
                item.completed = !item.completed;
            }
        });
        self.invoke(invoker, TodoTool::CompleteTodo, json!({ "id": id }))
            .await
    }

    /// Remove locally, then ask the server to delete the item
    pub async fn remove(
        &self,
        id: &ItemId,
        invoker: &dyn ToolInvoker,
    ) -> InvokeResult<StructuredResult> {
        self.edit(|items| items.retain(|item| &item.id != id));
        self.invoke(invoker, TodoTool::DeleteTodo, json!({ "id": id }))
            .await
    }

    /// Add an item. Ids are assigned by the server, so nothing is optimistic.
    pub async fn add(
        &self,
        text: &str,
        invoker: &dyn ToolInvoker,
    ) -> InvokeResult<StructuredResult> {
        self.invoke(invoker, TodoTool::AddTodo, json!({ "text": text }))
            .await
    }

    /// Drop completed items locally, then ask the server to do the same
    pub async fn clear_completed(
        &self,
        invoker: &dyn ToolInvoker,
    ) -> InvokeResult<StructuredResult> {
        self.edit(|items| items.retain(|item| !item.completed));
        self.invoke(invoker, TodoTool::ClearCompleted, json!({}))
            .await
    }

    /// Pull the full collection
    pub async fn refresh(&self, invoker: &dyn ToolInvoker) -> InvokeResult<StructuredResult> {
        self.invoke(invoker, TodoTool::ListTodos, json!({})).await
    }

    fn edit(&self, change: impl FnOnce(&mut Vec<Item>)) {
        let mut state = self.state.write();
        change(&mut state.items);
        state.revision += 1;
    }

    async fn invoke(
        &self,
        invoker: &dyn ToolInvoker,
        tool: TodoTool,
        arguments: Value,
    ) -> InvokeResult<StructuredResult> {
        let response = invoker.call_tool(tool.name(), arguments).await.map_err(|e| {
            log_warn!(self.logger, "[WidgetStore] {} failed: {}", tool.name(), e);
            e
        })?;
        let result = response.structured_content;
        self.apply_result(result.clone());
        Ok(result)
    }

    pub fn state(&self) -> StoreState {
        self.state.read().clone()
    }

    pub fn items(&self) -> Vec<Item> {
        self.state.read().items.clone()
    }

    pub fn len(&self) -> usize {
        self.state.read().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().items.is_empty()
    }

    pub fn completed_count(&self) -> usize {
        self.state
            .read()
            .items
            .iter()
            .filter(|item| item.completed)
            .count()
    }

    pub fn last_action(&self) -> Option<ResultAction> {
        self.state.read().last_action
    }

    pub fn message(&self) -> Option<String> {
        self.state.read().message.clone()
    }

    pub fn revision(&self) -> u64 {
        self.state.read().revision
    }

    /// `No tasks yet` or `c/n completed`
    pub fn progress_label(&self) -> String {
        let state = self.state.read();
        if state.items.is_empty() {
            return "No tasks yet".to_string();
        }
        let done = state.items.iter().filter(|item| item.completed).count();
        format!("{}/{} completed", done, state.items.len())
    }
}

impl Drop for WidgetStore {
    fn drop(&mut self) {
        self.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::HostGlobals;
    use crate::logging::{LogLevel, MemoryLogger, NoOpLogger};
    use crate::reconcile::InvokeError;
    use crate::store::MemoryCollection;
    use crate::tools::ToolRegistry;
    use crate::types::ToolResponse;
    use async_trait::async_trait;
    use std::time::Duration;

    fn logger() -> Arc<dyn Logger> {
        Arc::new(NoOpLogger::new())
    }

    fn registry_with(items: Vec<Item>) -> ToolRegistry {
        ToolRegistry::with_store(Box::new(MemoryCollection::with_items(items)), logger())
    }

    /// Answers every call with the same response
    struct FixedInvoker(ToolResponse);

    #[async_trait]
    impl ToolInvoker for FixedInvoker {
        async fn call_tool(&self, _name: &str, _arguments: Value) -> InvokeResult<ToolResponse> {
            Ok(self.0.clone())
        }
    }

    struct DownInvoker;

    #[async_trait]
    impl ToolInvoker for DownInvoker {
        async fn call_tool(&self, _name: &str, _arguments: Value) -> InvokeResult<ToolResponse> {
            Err(InvokeError::Transport("connection reset".to_string()))
        }
    }

    #[tokio::test]
    async fn test_server_result_supersedes_optimistic_toggle() {
        let done = Item::new(ItemId::new("a"), "file taxes").with_completed(true);
        let registry = registry_with(vec![done]);
        let store = WidgetStore::new(logger());
        store.refresh(&registry).await.unwrap();

        // Optimistic guess is "incomplete"; the server only completes.
        let result = store.toggle(&ItemId::new("a"), &registry).await.unwrap();

        assert_eq!(result.action, ResultAction::Completed);
        assert!(store.items()[0].completed);
        assert_eq!(store.items(), registry.snapshot());
    }

    #[tokio::test]
    async fn test_error_result_rolls_back_optimistic_remove() {
        let item = Item::new(ItemId::new("a"), "call mom");
        let unchanged = StructuredResult::new(
            vec![item.clone()],
            ResultAction::Error,
            "Todo \"a\" not found",
        );
        let store = WidgetStore::new(logger());
        store.apply_result(StructuredResult::new(vec![item], ResultAction::List, ""));

        let invoker = FixedInvoker(ToolResponse::from_result(unchanged));
        store.remove(&ItemId::new("a"), &invoker).await.unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.last_action(), Some(ResultAction::Error));
    }

    #[tokio::test]
    async fn test_transport_failure_keeps_optimistic_state() {
        let item = Item::new(ItemId::new("a"), "stretch");
        let store = WidgetStore::new(logger());
        store.apply_result(StructuredResult::new(vec![item], ResultAction::List, ""));

        let err = store
            .toggle(&ItemId::new("a"), &DownInvoker)
            .await
            .unwrap_err();

        assert!(matches!(err, InvokeError::Transport(_)));
        assert!(store.items()[0].completed);
        assert_eq!(store.last_action(), Some(ResultAction::List));
    }

    #[tokio::test]
    async fn test_unknown_id_reports_error_with_server_state() {
        let registry = registry_with(vec![Item::new(ItemId::new("a"), "read")]);
        let store = WidgetStore::new(logger());

        let result = store.toggle(&ItemId::new("ghost"), &registry).await.unwrap();

        assert!(result.is_error());
        assert_eq!(store.len(), 1);
        assert_eq!(store.message().as_deref(), Some("Todo \"ghost\" not found"));
    }

    #[tokio::test]
    async fn test_add_clear_and_progress() {
        let registry = ToolRegistry::new(logger());
        let store = WidgetStore::new(logger());
        assert_eq!(store.progress_label(), "No tasks yet");
        assert!(store.is_empty());

        store.add("one", &registry).await.unwrap();
        store.add("two", &registry).await.unwrap();
        let first = store.items()[0].id.clone();
        store.toggle(&first, &registry).await.unwrap();

        assert_eq!(store.completed_count(), 1);
        assert_eq!(store.progress_label(), "1/2 completed");

        let result = store.clear_completed(&registry).await.unwrap();
        assert_eq!(result.message, "Cleared 1 task(s)");
        assert_eq!(store.progress_label(), "0/1 completed");
    }

    #[test]
    fn test_apply_result_replaces_wholesale() {
        let store = WidgetStore::new(logger());
        store.apply_result(StructuredResult::new(
            vec![
                Item::new(ItemId::new("a"), "a"),
                Item::new(ItemId::new("b"), "b"),
            ],
            ResultAction::List,
            "You have 2 task(s)",
        ));
        store.apply_result(StructuredResult::new(
            vec![Item::new(ItemId::new("c"), "c")],
            ResultAction::Added,
            "Added: \"c\"",
        ));

        let ids: Vec<_> = store.items().into_iter().map(|item| item.id).collect();
        assert_eq!(ids, vec![ItemId::new("c")]);
        assert_eq!(store.revision(), 2);
    }

    #[test]
    fn test_malformed_payload_ignored() {
        let logger = Arc::new(MemoryLogger::new());
        let store = WidgetStore::new(logger.clone());

        assert!(!store.apply_payload(&json!({ "result": { "items": [] } })));
        assert_eq!(store.revision(), 0);
        assert!(logger.contains(LogLevel::Warn, "Ignoring tool output"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_attach_follows_tool_output() {
        let host = Arc::new(HostGlobals::new());
        let initial = StructuredResult::new(
            vec![Item::new(ItemId::new("a"), "a")],
            ResultAction::List,
            "You have 1 task(s)",
        );
        host.set_silently(GlobalKey::ToolOutput, serde_json::to_value(&initial).unwrap());
        let bridge = GlobalBridge::new(host.clone(), logger());
        let store = Arc::new(WidgetStore::new(logger()));

        store.attach(&bridge);
        assert_eq!(store.len(), 1);
        assert!(store.is_attached());

        let next = StructuredResult::new(vec![], ResultAction::Cleared, "Cleared 1 task(s)");
        host.set(GlobalKey::ToolOutput, serde_json::to_value(&next).unwrap());
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert!(store.is_empty());
        assert_eq!(store.last_action(), Some(ResultAction::Cleared));

        store.detach();
        assert!(!store.is_attached());
        host.set(GlobalKey::ToolOutput, serde_json::to_value(&initial).unwrap());
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(store.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_attach_standalone_is_noop() {
        let bridge = GlobalBridge::standalone(logger());
        let store = Arc::new(WidgetStore::new(logger()));

        store.attach(&bridge);

        assert!(!store.is_attached());
        assert_eq!(store.progress_label(), "No tasks yet");
    }
}
