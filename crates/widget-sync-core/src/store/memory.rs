//! In-memory collection store

use indexmap::IndexMap;

use super::traits::CollectionStore;
use crate::types::{Item, ItemId};

/// Insertion-ordered in-memory collection
///
/// Contents live for the lifetime of the process only.
#[derive(Debug, Default)]
pub struct MemoryCollection {
    items: IndexMap<ItemId, Item>,
}

impl MemoryCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a collection preloaded with items (in the given order)
    pub fn with_items(items: impl IntoIterator<Item = Item>) -> Self {
        Self {
            items: items.into_iter().map(|item| (item.id.clone(), item)).collect(),
        }
    }
}

impl CollectionStore for MemoryCollection {
    fn name(&self) -> &str {
        "memory"
    }

    fn get(&self, id: &ItemId) -> Option<Item> {
        self.items.get(id).cloned()
    }

    fn put(&mut self, item: Item) {
        // IndexMap keeps the original slot when the key already exists.
        self.items.insert(item.id.clone(), item);
    }

    fn delete(&mut self, id: &ItemId) -> Option<Item> {
        self.items.shift_remove(id)
    }

    fn list(&self) -> Vec<Item> {
        self.items.values().cloned().collect()
    }

    fn contains(&self, id: &ItemId) -> bool {
        self.items.contains_key(id)
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}
