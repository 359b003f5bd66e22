//! Widget Sync Core
//!
//! Two halves of the protocol that keeps an embedded chat widget in step
//! with the tools an agent calls:
//! - Server side: a `ToolRegistry` of five todo operations over one shared
//!   collection, plus the widget template `WidgetResource`, served over MCP
//! - Client side: a `GlobalBridge` mirroring host-owned globals, and a
//!   `WidgetStore` that reconciles structured results into local state
//!
//! ## Tool Results
//!
//! Every tool call returns the full post-mutation collection, so the widget
//! never diffs; it replaces its state with whatever arrives last.
//!
//! ```rust,ignore
//! use widget_sync_core::{ToolRegistry, WidgetStore};
//!
//! let registry = ToolRegistry::new(logger.clone());
//! let store = WidgetStore::new(logger);
//!
//! store.add("buy milk", &registry).await?;
//! store.toggle(&store.items()[0].id, &registry).await?;
//! assert_eq!(store.progress_label(), "1/1 completed");
//! ```

pub mod types;
pub mod logging;
pub mod config;
pub mod store;
pub mod tools;
pub mod resource;
pub mod bridge;
pub mod reconcile;
pub mod mcp;

// Re-export commonly used types
pub use types::{
    Item, ItemId, ItemIdGenerator,
    ResultAction, StructuredResult, ToolResponse, ContentBlock,
    CancellationToken,
};

pub use logging::{Logger, SharedLogger, LogLevel, NoOpLogger, ConsoleLogger, MemoryLogger, FileLogger};

pub use config::{
    ConfigProvider, ConfigError, ConfigResult,
    MemoryConfigProvider, FileConfigProvider,
    ServerConfig, WidgetConfig, BridgeConfig, LoggingConfig,
};

pub use store::{CollectionStore, MemoryCollection};

pub use tools::{ToolRegistry, ToolInfo, TodoTool, Operation, RegistryError, RegistryResult};

pub use resource::{WidgetResource, TemplateSource, ResourceError, ResourceResult, template_source};

pub use bridge::{
    GlobalBridge, GlobalSource, HostGlobals, GlobalKey, GlobalValue, GlobalsUpdated,
    Subscription, DisplayMode, Theme,
};

pub use reconcile::{WidgetStore, ToolInvoker, InvokeError, InvokeResult};

pub use mcp::WidgetServer;
