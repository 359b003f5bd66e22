//! Structured result contract shared by the registry and the widget store

use serde::{Deserialize, Serialize};

use super::item::Item;

/// Result label attached to every structured result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultAction {
    Added,
    List,
    Completed,
    Deleted,
    Cleared,
    Error,
}

impl ResultAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultAction::Added => "added",
            ResultAction::List => "list",
            ResultAction::Completed => "completed",
            ResultAction::Deleted => "deleted",
            ResultAction::Cleared => "cleared",
            ResultAction::Error => "error",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ResultAction::Error)
    }
}

impl std::fmt::Display for ResultAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Full collection snapshot plus a result label.
///
/// Always built from post-mutation state; never a diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredResult {
    /// Every item currently in the collection, in insertion order
    pub items: Vec<Item>,
    /// What the operation did
    pub action: ResultAction,
    /// Human-readable summary
    #[serde(default)]
    pub message: String,
}

impl StructuredResult {
    pub fn new(items: Vec<Item>, action: ResultAction, message: impl Into<String>) -> Self {
        Self {
            items,
            action,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.action.is_error()
    }
}

/// A content block in a tool response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    Text { text: String },
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        ContentBlock::Text { text: text.into() }
    }
}

/// Response returned for a tool invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResponse {
    /// Human-readable content for the model
    pub content: Vec<ContentBlock>,
    /// Payload consumed by the widget
    pub structured_content: StructuredResult,
}

impl ToolResponse {
    /// Wrap a structured result, echoing its message as text content
    pub fn from_result(result: StructuredResult) -> Self {
        Self {
            content: vec![ContentBlock::text(result.message.clone())],
            structured_content: result,
        }
    }

    /// All text content joined by newlines
    pub fn text(&self) -> String {
        self.content
            .iter()
            .map(|block| match block {
                ContentBlock::Text { text } => text.as_str(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn action(&self) -> ResultAction {
        self.structured_content.action
    }
}
