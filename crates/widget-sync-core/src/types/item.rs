//! Collection item types

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque, server-generated item identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Wrap an existing identifier string
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A single task record in the collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Unique identifier, never reused within a process lifetime
    pub id: ItemId,
    /// Task description
    pub text: String,
    /// Lifecycle flag
    pub completed: bool,
    /// Creation time (RFC 3339 on the wire)
    pub created_at: DateTime<Utc>,
}

impl Item {
    /// Create an incomplete item stamped with the current time
    pub fn new(id: ItemId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            completed: false,
            created_at: Utc::now(),
        }
    }

    /// Mark the item completed
    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }
}

/// Issues item identifiers that are unique for the lifetime of the generator.
///
/// Every identifier handed out is remembered, so an id that belonged to a
/// deleted item is never issued again.
#[derive(Debug, Default)]
pub struct ItemIdGenerator {
    issued: HashSet<ItemId>,
}

impl ItemIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate a fresh identifier
    pub fn next_id(&mut self) -> ItemId {
        loop {
            let id = ItemId(Uuid::new_v4().simple().to_string());
            if self.issued.insert(id.clone()) {
                return id;
            }
        }
    }

    /// Reserve an identifier that was created elsewhere (e.g. preloaded items)
    pub fn reserve(&mut self, id: &ItemId) {
        self.issued.insert(id.clone());
    }
}
