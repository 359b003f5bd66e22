//! Configuration provider trait

use async_trait::async_trait;

use super::settings::ServerConfig;

/// Configuration provider abstraction
///
/// Implementations:
/// - `MemoryConfigProvider`: In-memory for testing and embedding
/// - `FileConfigProvider`: YAML file (~/.config/widget-sync/config.yaml by default)
#[async_trait]
pub trait ConfigProvider: Send + Sync {
    /// Load the current configuration
    async fn get_config(&self) -> ConfigResult<ServerConfig>;

    /// Replace the stored configuration
    async fn update_config(&self, config: ServerConfig) -> ConfigResult<()>;
}

/// Errors that can occur during configuration operations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
