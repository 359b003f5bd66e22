//! Server configuration model

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::logging::LogLevel;
use super::traits::{ConfigError, ConfigResult};

/// Environment variable overriding `widget.base_url`
pub const ENV_BASE_URL: &str = "WIDGET_SYNC_BASE_URL";
/// Environment variable overriding `logging.level`
pub const ENV_LOG_LEVEL: &str = "WIDGET_SYNC_LOG_LEVEL";

/// MIME type hosts expect for widget templates
pub const WIDGET_MIME_TYPE: &str = "text/html+skybridge";

/// Complete configuration file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    pub server: ServerSettings,
    pub widget: WidgetConfig,
    pub bridge: BridgeConfig,
    pub logging: LoggingConfig,
}

impl ServerConfig {
    /// Check invariants the rest of the system relies on
    pub fn validate(&self) -> ConfigResult<()> {
        if self.bridge.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "bridge.poll_interval_ms must be greater than zero".to_string(),
            ));
        }
        if !self.widget.uri.contains("://") {
            return Err(ConfigError::Invalid(format!(
                "widget.uri must be an absolute URI, got {:?}",
                self.widget.uri
            )));
        }
        if self.server.name.trim().is_empty() {
            return Err(ConfigError::Invalid("server.name must not be empty".to_string()));
        }
        Ok(())
    }

    /// Apply overrides from the process environment
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(base_url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
            self.widget.base_url = base_url;
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL).and_then(|v| LogLevel::parse(&v)) {
            self.logging.level = level;
        }
        self
    }
}

/// Identity advertised to MCP clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub name: String,
    pub version: String,
    pub instructions: Option<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            name: "todo-widget".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            instructions: Some(
                "Todo list with an interactive widget. Tools: add_todo, list_todos, \
                 complete_todo, delete_todo, clear_completed."
                    .to_string(),
            ),
        }
    }
}

/// Widget template and display hints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    /// Logical URI the template is served under
    pub uri: String,
    /// Resource name
    pub name: String,
    pub title: String,
    pub description: String,
    /// Origin the template markup is fetched from
    pub base_url: String,
    /// Path appended to `base_url` when fetching over HTTP
    pub template_path: String,
    /// Read the template from disk instead of `base_url`
    pub template_file: Option<PathBuf>,
    pub prefers_border: bool,
    /// Whether the widget itself may call tools
    pub widget_accessible: bool,
    pub invoking_label: String,
    pub invoked_label: String,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            uri: "ui://widget/todo-template.html".to_string(),
            name: "todo-widget".to_string(),
            title: "Todo List Widget".to_string(),
            description: "Interactive todo list widget".to_string(),
            base_url: "http://localhost:3000".to_string(),
            template_path: "/".to_string(),
            template_file: None,
            prefers_border: true,
            widget_accessible: false,
            invoking_label: "Loading...".to_string(),
            invoked_label: "Done".to_string(),
        }
    }
}

impl WidgetConfig {
    /// `_meta` block attached to every tool descriptor
    pub fn tool_meta(&self) -> Map<String, Value> {
        let mut meta = Map::new();
        meta.insert("openai/outputTemplate".into(), json!(self.uri));
        meta.insert("openai/toolInvocation/invoking".into(), json!(self.invoking_label));
        meta.insert("openai/toolInvocation/invoked".into(), json!(self.invoked_label));
        meta.insert("openai/widgetAccessible".into(), json!(self.widget_accessible));
        meta.insert("openai/resultCanProduceWidget".into(), json!(true));
        meta
    }

    /// `_meta` block attached to the resource descriptor
    pub fn resource_meta(&self) -> Map<String, Value> {
        let mut meta = Map::new();
        meta.insert("openai/widgetDescription".into(), json!(self.description));
        meta.insert("openai/widgetPrefersBorder".into(), json!(self.prefers_border));
        meta
    }

    /// `_meta` block attached to served template contents
    pub fn contents_meta(&self) -> Map<String, Value> {
        let mut meta = self.resource_meta();
        meta.insert("openai/widgetDomain".into(), json!(self.base_url));
        meta
    }

    /// Full URL the HTTP template source fetches
    pub fn template_url(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            if self.template_path.starts_with('/') {
                self.template_path.clone()
            } else {
                format!("/{}", self.template_path)
            }
        )
    }
}

/// Global Sync Bridge settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Polling-channel interval
    pub poll_interval_ms: u64,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self { poll_interval_ms: 500 }
    }
}

impl BridgeConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    /// Append to this file instead of stderr
    pub file: Option<PathBuf>,
}
