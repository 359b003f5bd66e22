//! Template sources
//!
//! The widget markup is produced elsewhere (a static site build, a CDN, a
//! file on disk). A `TemplateSource` fetches it exactly once at startup.

use std::path::PathBuf;

use async_trait::async_trait;

use super::error::{ResourceError, ResourceResult};
use crate::config::WidgetConfig;

/// Where the widget template markup comes from
#[async_trait]
pub trait TemplateSource: Send + Sync {
    /// Human-readable name used in logs and errors
    fn name(&self) -> String;

    /// Fetch the template markup
    async fn fetch(&self) -> ResourceResult<String>;
}

/// Fetches the template over HTTP(S)
#[derive(Debug, Clone)]
pub struct HttpTemplateSource {
    url: String,
    client: reqwest::Client,
}

impl HttpTemplateSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl TemplateSource for HttpTemplateSource {
    fn name(&self) -> String {
        self.url.clone()
    }

    async fn fetch(&self) -> ResourceResult<String> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| ResourceError::fetch_failed(&self.url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResourceError::fetch_failed(
                &self.url,
                format!("HTTP {}", status),
            ));
        }

        response
            .text()
            .await
            .map_err(|e| ResourceError::fetch_failed(&self.url, e.to_string()))
    }
}

/// Reads the template from a local file
#[derive(Debug, Clone)]
pub struct FileTemplateSource {
    path: PathBuf,
}

impl FileTemplateSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl TemplateSource for FileTemplateSource {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> ResourceResult<String> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| ResourceError::fetch_failed(self.name(), e.to_string()))
    }
}

/// Serves fixed markup; used in tests and embedded setups
#[derive(Debug, Clone)]
pub struct StaticTemplateSource {
    markup: String,
}

impl StaticTemplateSource {
    pub fn new(markup: impl Into<String>) -> Self {
        Self { markup: markup.into() }
    }
}

#[async_trait]
impl TemplateSource for StaticTemplateSource {
    fn name(&self) -> String {
        "static".to_string()
    }

    async fn fetch(&self) -> ResourceResult<String> {
        Ok(self.markup.clone())
    }
}

/// Pick the source the widget config asks for: a file if one is set,
/// otherwise HTTP against `base_url`
pub fn template_source(config: &WidgetConfig) -> Box<dyn TemplateSource> {
    match config.template_file {
        Some(ref path) => Box::new(FileTemplateSource::new(path.clone())),
        None => Box::new(HttpTemplateSource::new(config.template_url())),
    }
}
