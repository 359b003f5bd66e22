//! File-based configuration provider (YAML)
//!
//! The user-level file lives at ~/.config/widget-sync/config.yaml; any other
//! path can be given explicitly.

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::RwLock;

use super::settings::ServerConfig;
use super::traits::{ConfigProvider, ConfigResult};

/// File-based configuration provider
///
/// A missing file is not an error: it yields the default configuration.
///
/// # Example
///
/// ```no_run
/// use widget_sync_core::config::FileConfigProvider;
///
/// let user_config = FileConfigProvider::user();
/// let explicit = FileConfigProvider::new("/etc/widget-sync/config.yaml");
/// ```
pub struct FileConfigProvider {
    path: PathBuf,
    cache: RwLock<Option<ServerConfig>>,
}

impl FileConfigProvider {
    /// Create a provider for a specific path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: RwLock::new(None),
        }
    }

    /// Create a user-level provider (~/.config/widget-sync/config.yaml)
    pub fn user() -> Self {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));
        Self::new(base.join("widget-sync").join("config.yaml"))
    }

    /// Get the config file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if the config file exists
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    fn load(&self) -> ConfigResult<ServerConfig> {
        if !self.path.exists() {
            return Ok(ServerConfig::default());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(ServerConfig::default());
        }
        let config: ServerConfig = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    fn save(&self, config: &ServerConfig) -> ConfigResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(config)?;
        fs::write(&self.path, content)?;

        *self.cache.write() = Some(config.clone());
        Ok(())
    }

    /// Reload config from disk (invalidate cache)
    pub fn reload(&self) -> ConfigResult<ServerConfig> {
        let config = self.load()?;
        *self.cache.write() = Some(config.clone());
        Ok(config)
    }
}

impl std::fmt::Debug for FileConfigProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileConfigProvider")
            .field("path", &self.path)
            .field("exists", &self.exists())
            .finish()
    }
}

#[async_trait]
impl ConfigProvider for FileConfigProvider {
    async fn get_config(&self) -> ConfigResult<ServerConfig> {
        if let Some(config) = self.cache.read().as_ref() {
            return Ok(config.clone());
        }
        self.reload()
    }

    async fn update_config(&self, config: ServerConfig) -> ConfigResult<()> {
        config.validate()?;
        self.save(&config)
    }
}
