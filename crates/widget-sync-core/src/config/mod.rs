//! Configuration
//!
//! Supports two sources:
//! - `MemoryConfigProvider`: In-memory for testing
//! - `FileConfigProvider`: YAML file (user level or explicit path)
//!
//! Environment variables override selected fields after loading.

mod traits;
mod settings;
mod memory;
mod file;

pub use traits::{ConfigProvider, ConfigError, ConfigResult};
pub use settings::{
    ServerConfig, ServerSettings, WidgetConfig, BridgeConfig, LoggingConfig,
    ENV_BASE_URL, ENV_LOG_LEVEL, WIDGET_MIME_TYPE,
};
pub use memory::MemoryConfigProvider;
pub use file::FileConfigProvider;
