//! Operation semantics over the collection

use super::schema::Operation;
use crate::store::CollectionStore;
use crate::types::{Item, ItemId, ItemIdGenerator, ResultAction, StructuredResult};

/// Apply a validated operation and snapshot the collection afterwards.
///
/// The snapshot is taken after the mutation on every path, including
/// not-found, so callers can replace their state with `items` wholesale.
pub(crate) fn apply(
    op: Operation,
    store: &mut dyn CollectionStore,
    ids: &mut ItemIdGenerator,
) -> StructuredResult {
    let (action, message) = match op {
        Operation::Add { text } => {
            let message = format!("Added: \"{}\"", text);
            store.put(Item::new(ids.next_id(), text));
            (ResultAction::Added, message)
        }
        Operation::List => {
            let count = store.len();
            let message = if count > 0 {
                format!("You have {} task(s)", count)
            } else {
                "Your todo list is empty".to_string()
            };
            (ResultAction::List, message)
        }
        Operation::Complete { id } => match store.get(&id) {
            Some(item) => {
                let message = format!("Completed: \"{}\"", item.text);
                store.put(item.with_completed(true));
                (ResultAction::Completed, message)
            }
            None => not_found(&id),
        },
        Operation::Delete { id } => match store.delete(&id) {
            Some(item) => (ResultAction::Deleted, format!("Deleted: \"{}\"", item.text)),
            None => not_found(&id),
        },
        Operation::ClearCompleted => {
            let count = clear_completed(store);
            let message = if count > 0 {
                format!("Cleared {} task(s)", count)
            } else {
                "Nothing to clear".to_string()
            };
            (ResultAction::Cleared, message)
        }
    };

    StructuredResult::new(store.list(), action, message)
}

fn not_found(id: &ItemId) -> (ResultAction, String) {
    (ResultAction::Error, format!("Todo \"{}\" not found", id))
}

fn clear_completed(store: &mut dyn CollectionStore) -> usize {
    let done: Vec<ItemId> = store
        .list()
        .into_iter()
        .filter(|item| item.completed)
        .map(|item| item.id)
        .collect();
    for id in &done {
        store.delete(id);
    }
    done.len()
}
