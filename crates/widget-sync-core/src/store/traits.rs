//! Collection storage trait

use crate::types::{Item, ItemId};

/// Storage behind the tool registry
///
/// Implementations must keep items in insertion order. The registry is the
/// only caller and serialises access, so implementations need no locking of
/// their own.
pub trait CollectionStore: Send {
    /// Human-readable name of this store
    fn name(&self) -> &str;

    /// Look up an item by id
    fn get(&self, id: &ItemId) -> Option<Item>;

    /// Insert a new item at the end, or replace an existing one in place
    fn put(&mut self, item: Item);

    /// Remove an item, returning it if it existed
    fn delete(&mut self, id: &ItemId) -> Option<Item>;

    /// All items in insertion order
    fn list(&self) -> Vec<Item>;

    /// Check if an item exists
    fn contains(&self, id: &ItemId) -> bool {
        self.get(id).is_some()
    }

    /// Number of stored items
    fn len(&self) -> usize {
        self.list().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
