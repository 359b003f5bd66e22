//! In-memory configuration provider

use async_trait::async_trait;
use parking_lot::RwLock;

use super::settings::ServerConfig;
use super::traits::{ConfigProvider, ConfigResult};

/// In-memory configuration provider
#[derive(Debug, Default)]
pub struct MemoryConfigProvider {
    config: RwLock<ServerConfig>,
}

impl MemoryConfigProvider {
    /// Create a provider holding the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a provider with an initial configuration
    pub fn with_config(config: ServerConfig) -> Self {
        Self {
            config: RwLock::new(config),
        }
    }
}

#[async_trait]
impl ConfigProvider for MemoryConfigProvider {
    async fn get_config(&self) -> ConfigResult<ServerConfig> {
        Ok(self.config.read().clone())
    }

    async fn update_config(&self, config: ServerConfig) -> ConfigResult<()> {
        config.validate()?;
        *self.config.write() = config;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;

    #[tokio::test]
    async fn test_memory_config_provider() {
        let provider = MemoryConfigProvider::new();
        assert_eq!(provider.get_config().await.unwrap(), ServerConfig::default());

        let mut updated = ServerConfig::default();
        updated.widget.base_url = "https://todo.example.com".to_string();
        provider.update_config(updated.clone()).await.unwrap();
        assert_eq!(provider.get_config().await.unwrap(), updated);

        // Invalid configs are rejected and leave the old one in place
        let mut invalid = updated.clone();
        invalid.bridge.poll_interval_ms = 0;
        assert!(matches!(
            provider.update_config(invalid).await,
            Err(ConfigError::Invalid(_))
        ));
        assert_eq!(provider.get_config().await.unwrap(), updated);
    }
}
