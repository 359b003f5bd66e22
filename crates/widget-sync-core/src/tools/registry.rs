//! Tool registry over the shared collection
//!
//! The ToolRegistry is the central component for:
//! - Advertising the fixed tool catalogue with schemas and widget metadata
//! - Validating arguments before anything is touched
//! - Executing operations against the collection, one at a time
//! - Returning a full post-mutation snapshot with every result

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::{RegistryError, RegistryResult};
use super::ops;
use super::schema::{Operation, TodoTool};
use crate::logging::Logger;
use crate::store::{CollectionStore, MemoryCollection};
use crate::types::{Item, ItemIdGenerator, ToolResponse};

/// Descriptor for one registered tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInfo {
    /// Tool name
    pub name: String,
    /// Display title
    pub title: String,
    /// Tool description
    pub description: String,
    /// JSON Schema for tool parameters
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
    /// Opaque host rendering hints
    #[serde(rename = "_meta", default, skip_serializing_if = "Map::is_empty")]
    pub meta: Map<String, Value>,
}

impl From<TodoTool> for ToolInfo {
    fn from(tool: TodoTool) -> Self {
        Self {
            name: tool.name().to_string(),
            title: tool.title().to_string(),
            description: tool.description().to_string(),
            input_schema: tool.input_schema(),
            meta: Map::new(),
        }
    }
}

/// The collection plus the generator that names its items
struct Collection {
    store: Box<dyn CollectionStore>,
    ids: ItemIdGenerator,
}

/// Tool registry owning the canonical collection
///
/// Arguments are validated before the lock is taken; the mutation and the
/// snapshot that follows happen under one lock, so concurrent callers are
/// serialized and never observe each other's partial state.
pub struct ToolRegistry {
    collection: Mutex<Collection>,
    tools: Vec<ToolInfo>,
    logger: Arc<dyn Logger>,
}

impl ToolRegistry {
    /// Create a registry over an empty in-memory collection
    pub fn new(logger: Arc<dyn Logger>) -> Self {
        Self::with_store(Box::new(MemoryCollection::new()), logger)
    }

    /// Create a registry over an existing store
    pub fn with_store(store: Box<dyn CollectionStore>, logger: Arc<dyn Logger>) -> Self {
        let mut ids = ItemIdGenerator::new();
        for item in store.list() {
            ids.reserve(&item.id);
        }
        logger.info(&format!(
            "[ToolRegistry] Registered {} tools over {} store ({} items)",
            TodoTool::ALL.len(),
            store.name(),
            store.len()
        ));

        Self {
            collection: Mutex::new(Collection { store, ids }),
            tools: TodoTool::ALL.into_iter().map(ToolInfo::from).collect(),
            logger,
        }
    }

    /// Attach the same `_meta` block to every tool descriptor
    pub fn with_tool_meta(mut self, meta: Map<String, Value>) -> Self {
        for tool in &mut self.tools {
            tool.meta = meta.clone();
        }
        self
    }

    /// All tool descriptors, in registration order
    pub fn tools(&self) -> &[ToolInfo] {
        &self.tools
    }

    /// Look up a tool descriptor by name
    pub fn get_tool(&self, name: &str) -> Option<&ToolInfo> {
        self.tools.iter().find(|t| t.name == name)
    }

    /// Get count of registered tools
    pub fn tool_count(&self) -> usize {
        self.tools.len()
    }

    /// Call a tool by name
    ///
    /// Returns `Err` only for unknown tools and invalid arguments, both of
    /// which are rejected before the collection is touched. A missing item is
    /// an `Ok` response whose action is `error`.
    pub fn call_tool(&self, name: &str, arguments: Value) -> RegistryResult<ToolResponse> {
        let tool = TodoTool::from_name(name).ok_or_else(|| {
            self.logger.warn(&format!("[ToolRegistry] Unknown tool: {}", name));
            RegistryError::UnknownTool(name.to_string())
        })?;

        let op = Operation::parse(tool, arguments).map_err(|e| {
            self.logger.warn(&format!("[ToolRegistry] Rejected {}: {}", name, e));
            e
        })?;

        self.logger.info(&format!("[ToolRegistry] Calling tool: {}", name));

        let result = {
            let mut collection = self.collection.lock();
            let Collection { store, ids } = &mut *collection;
            ops::apply(op, store.as_mut(), ids)
        };

        if result.is_error() {
            self.logger.warn(&format!("[ToolRegistry] {}: {}", name, result.message));
        } else {
            self.logger.debug(&format!(
                "[ToolRegistry] {} -> {} ({} items)",
                name,
                result.action,
                result.items.len()
            ));
        }

        Ok(ToolResponse::from_result(result))
    }

    /// Current collection contents, in insertion order
    pub fn snapshot(&self) -> Vec<Item> {
        self.collection.lock().store.list()
    }

    /// Number of items currently stored
    pub fn item_count(&self) -> usize {
        self.collection.lock().store.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::{LogLevel, MemoryLogger, NoOpLogger};
    use crate::types::{ItemId, ResultAction};
    use serde_json::json;
    use std::collections::HashSet;

    fn registry() -> ToolRegistry {
        ToolRegistry::new(Arc::new(NoOpLogger::new()))
    }

    fn add(registry: &ToolRegistry, text: &str) -> ItemId {
        let response = registry.call_tool("add_todo", json!({ "text": text })).unwrap();
        response
            .structured_content
            .items
            .iter()
            .rev()
            .find(|i| i.text == text)
            .map(|i| i.id.clone())
            .unwrap()
    }

    fn bytes(registry: &ToolRegistry) -> Vec<u8> {
        serde_json::to_vec(&registry.snapshot()).unwrap()
    }

    #[test]
    fn test_catalogue() {
        let registry = registry();
        let names: Vec<_> = registry.tools().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["add_todo", "list_todos", "complete_todo", "delete_todo", "clear_completed"]
        );
        assert_eq!(registry.tool_count(), 5);
        assert_eq!(registry.get_tool("add_todo").unwrap().title, "Add Todo");
        assert!(registry.get_tool("nope").is_none());
    }

    #[test]
    fn test_tool_meta_attached_and_serialized() {
        let mut meta = Map::new();
        meta.insert("openai/outputTemplate".into(), json!("ui://widget/todo-template.html"));
        let registry = registry().with_tool_meta(meta);

        let value = serde_json::to_value(registry.get_tool("list_todos").unwrap()).unwrap();
        assert_eq!(value["_meta"]["openai/outputTemplate"], "ui://widget/todo-template.html");
        assert_eq!(value["inputSchema"]["type"], "object");
    }

    #[test]
    fn test_create_returns_fresh_snapshot() {
        let registry = registry();
        add(&registry, "walk dog");
        let before = registry.item_count();

        let response = registry.call_tool("add_todo", json!({ "text": "buy milk" })).unwrap();
        let result = &response.structured_content;

        assert_eq!(result.action, ResultAction::Added);
        assert_eq!(result.items.len(), before + 1);
        let added = result.items.last().unwrap();
        assert_eq!(added.text, "buy milk");
        assert!(!added.completed);
        assert_eq!(response.text(), "Added: \"buy milk\"");
        assert_eq!(result.items, registry.snapshot());
    }

    #[test]
    fn test_list_is_idempotent() {
        let registry = registry();
        add(&registry, "a");
        add(&registry, "b");

        let first = registry.call_tool("list_todos", json!({})).unwrap();
        let second = registry.call_tool("list_todos", Value::Null).unwrap();

        assert_eq!(first.structured_content.items, second.structured_content.items);
        assert_eq!(first.action(), ResultAction::List);
        assert_eq!(first.text(), "You have 2 task(s)");
    }

    #[test]
    fn test_list_empty_message() {
        let response = registry().call_tool("list_todos", json!({})).unwrap();
        assert_eq!(response.text(), "Your todo list is empty");
        assert!(response.structured_content.items.is_empty());
    }

    #[test]
    fn test_complete_and_delete() {
        let registry = registry();
        let a = add(&registry, "a");
        let b = add(&registry, "b");

        let completed = registry.call_tool("complete_todo", json!({ "id": a.as_str() })).unwrap();
        assert_eq!(completed.action(), ResultAction::Completed);
        let items = &completed.structured_content.items;
        assert!(items.iter().find(|i| i.id == a).unwrap().completed);
        assert!(!items.iter().find(|i| i.id == b).unwrap().completed);

        let deleted = registry.call_tool("delete_todo", json!({ "id": b.as_str() })).unwrap();
        assert_eq!(deleted.action(), ResultAction::Deleted);
        assert_eq!(deleted.text(), "Deleted: \"b\"");
        assert_eq!(deleted.structured_content.items.len(), 1);
        assert_eq!(deleted.structured_content.items[0].id, a);
    }

    #[test]
    fn test_not_found_leaves_collection_unchanged() {
        let registry = registry();
        let a = add(&registry, "a");
        registry.call_tool("complete_todo", json!({ "id": a.as_str() })).unwrap();
        add(&registry, "b");
        let before = bytes(&registry);

        let complete = registry.call_tool("complete_todo", json!({ "id": "nonexistent" })).unwrap();
        assert_eq!(complete.action(), ResultAction::Error);
        assert_eq!(complete.text(), "Todo \"nonexistent\" not found");
        assert_eq!(bytes(&registry), before);
        assert_eq!(serde_json::to_vec(&complete.structured_content.items).unwrap(), before);

        let delete = registry.call_tool("delete_todo", json!({ "id": "nonexistent" })).unwrap();
        assert_eq!(delete.action(), ResultAction::Error);
        assert_eq!(bytes(&registry), before);
    }

    #[test]
    fn test_clear_completed_is_selective() {
        let registry = registry();
        let a = add(&registry, "A");
        let b = add(&registry, "B");
        let c = add(&registry, "C");
        registry.call_tool("complete_todo", json!({ "id": a.as_str() })).unwrap();
        registry.call_tool("complete_todo", json!({ "id": c.as_str() })).unwrap();

        let cleared = registry.call_tool("clear_completed", json!({})).unwrap();

        assert_eq!(cleared.action(), ResultAction::Cleared);
        assert_eq!(cleared.text(), "Cleared 2 task(s)");
        let remaining: Vec<_> = cleared.structured_content.items.iter().map(|i| &i.id).collect();
        assert_eq!(remaining, vec![&b]);

        let again = registry.call_tool("clear_completed", json!({})).unwrap();
        assert_eq!(again.action(), ResultAction::Cleared);
        assert_eq!(again.text(), "Nothing to clear");
    }

    #[test]
    fn test_validation_errors_do_not_mutate() {
        let registry = registry();
        add(&registry, "keep");
        let before = bytes(&registry);

        for (tool, args) in [
            ("add_todo", json!({})),
            ("add_todo", json!({ "text": "" })),
            ("add_todo", json!({ "text": ["x"] })),
            ("complete_todo", json!({})),
            ("delete_todo", json!("abc")),
        ] {
            let err = registry.call_tool(tool, args).unwrap_err();
            assert!(matches!(err, RegistryError::InvalidArguments { .. }), "{tool}: {err}");
        }

        assert_eq!(bytes(&registry), before);
    }

    #[test]
    fn test_unknown_tool() {
        let registry = registry();
        let err = registry.call_tool("drop_all", json!({})).unwrap_err();
        assert_eq!(err, RegistryError::UnknownTool("drop_all".to_string()));
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        let registry = registry();
        let mut seen = HashSet::new();
        for round in 0..20 {
            let id = add(&registry, &format!("task {round}"));
            assert!(seen.insert(id.clone()));
            registry.call_tool("delete_todo", json!({ "id": id.as_str() })).unwrap();
        }
        assert_eq!(registry.item_count(), 0);
    }

    #[test]
    fn test_preloaded_store() {
        let store = MemoryCollection::with_items([
            Item::new(ItemId::new("seed-1"), "first"),
            Item::new(ItemId::new("seed-2"), "second").with_completed(true),
        ]);
        let registry = ToolRegistry::with_store(Box::new(store), Arc::new(NoOpLogger::new()));

        let listed = registry.call_tool("list_todos", json!({})).unwrap();
        assert_eq!(listed.structured_content.items.len(), 2);

        let id = add(&registry, "third");
        assert_ne!(id.as_str(), "seed-1");
        assert_ne!(id.as_str(), "seed-2");
    }

    #[test]
    fn test_add_stores_text_as_given() {
        let registry = registry();
        let response = registry
            .call_tool("add_todo", json!({ "text": "  buy milk " }))
            .unwrap();

        assert_eq!(response.structured_content.items[0].text, "  buy milk ");
        assert_eq!(response.text(), "Added: \"  buy milk \"");
        assert_eq!(registry.snapshot()[0].text, "  buy milk ");
    }

    #[test]
    fn test_concurrent_calls_are_serialized() {
        let registry = Arc::new(registry());
        let handles: Vec<_> = (0..4)
            .map(|worker| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    for n in 0..25 {
                        let response = registry
                            .call_tool("add_todo", json!({ "text": format!("w{worker}-{n}") }))
                            .unwrap();
                        // Each snapshot contains the item this call just added.
                        assert!(response
                            .structured_content
                            .items
                            .iter()
                            .any(|i| i.text == format!("w{worker}-{n}")));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let items = registry.snapshot();
        assert_eq!(items.len(), 100);
        let unique: HashSet<_> = items.iter().map(|i| i.id.clone()).collect();
        assert_eq!(unique.len(), 100);
    }

    #[test]
    fn test_logs_calls_and_rejections() {
        let logger = Arc::new(MemoryLogger::new());
        let registry = ToolRegistry::new(logger.clone());

        registry.call_tool("list_todos", json!({})).unwrap();
        registry.call_tool("delete_todo", json!({ "id": "gone" })).unwrap();
        let _ = registry.call_tool("add_todo", json!({}));

        assert!(logger.contains(LogLevel::Info, "Calling tool: list_todos"));
        assert!(logger.contains(LogLevel::Warn, "Todo \"gone\" not found"));
        assert!(logger.contains(LogLevel::Warn, "Rejected add_todo"));
    }
}
