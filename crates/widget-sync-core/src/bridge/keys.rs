//! Global snapshot keys and value types

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A host-provided value. Shared so identity can be compared cheaply.
pub type GlobalValue = Arc<Value>;

/// The closed set of globals the host publishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GlobalKey {
    #[serde(rename = "theme")]
    Theme,
    #[serde(rename = "displayMode")]
    DisplayMode,
    #[serde(rename = "maxHeight")]
    MaxHeight,
    #[serde(rename = "toolInput")]
    ToolInput,
    /// Structured result of the most recent tool call
    #[serde(rename = "toolOutput")]
    ToolOutput,
    /// Present when the host accepts display-mode requests
    #[serde(rename = "requestDisplayMode")]
    RequestDisplayMode,
    #[serde(rename = "isHostApp")]
    HostPresent,
}

impl GlobalKey {
    pub const ALL: [GlobalKey; 7] = [
        GlobalKey::Theme,
        GlobalKey::DisplayMode,
        GlobalKey::MaxHeight,
        GlobalKey::ToolInput,
        GlobalKey::ToolOutput,
        GlobalKey::RequestDisplayMode,
        GlobalKey::HostPresent,
    ];

    /// Name the host uses for this key
    pub fn as_str(&self) -> &'static str {
        match self {
            GlobalKey::Theme => "theme",
            GlobalKey::DisplayMode => "displayMode",
            GlobalKey::MaxHeight => "maxHeight",
            GlobalKey::ToolInput => "toolInput",
            GlobalKey::ToolOutput => "toolOutput",
            GlobalKey::RequestDisplayMode => "requestDisplayMode",
            GlobalKey::HostPresent => "isHostApp",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == name)
    }
}

impl fmt::Display for GlobalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether two observations of a global hold the same value.
///
/// Same allocation or structurally equal; both absent also counts as same.
pub fn same_value(a: &Option<GlobalValue>, b: &Option<GlobalValue>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => Arc::ptr_eq(a, b) || a == b,
        _ => false,
    }
}

/// Change notification dispatched by the host
#[derive(Debug, Clone, Default)]
pub struct GlobalsUpdated {
    /// Only the keys that changed
    pub globals: HashMap<GlobalKey, GlobalValue>,
}

impl GlobalsUpdated {
    pub fn single(key: GlobalKey, value: GlobalValue) -> Self {
        let mut globals = HashMap::new();
        globals.insert(key, value);
        Self { globals }
    }

    pub fn contains(&self, key: GlobalKey) -> bool {
        self.globals.contains_key(&key)
    }
}

/// How the host is displaying the widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    Inline,
    Pip,
    Fullscreen,
}

impl DisplayMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayMode::Inline => "inline",
            DisplayMode::Pip => "pip",
            DisplayMode::Fullscreen => "fullscreen",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}
