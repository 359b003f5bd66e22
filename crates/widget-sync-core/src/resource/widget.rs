//! The widget template resource

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::{ResourceError, ResourceResult};
use super::source::TemplateSource;
use crate::config::{WidgetConfig, WIDGET_MIME_TYPE};
use crate::logging::Logger;

/// Listing entry for the widget resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDescriptor {
    pub uri: String,
    pub name: String,
    pub title: String,
    pub description: String,
    pub mime_type: String,
    #[serde(rename = "_meta", default, skip_serializing_if = "Map::is_empty")]
    pub meta: Map<String, Value>,
}

/// Body returned when the resource is read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceContent {
    pub uri: String,
    pub mime_type: String,
    pub text: String,
    #[serde(rename = "_meta", default, skip_serializing_if = "Map::is_empty")]
    pub meta: Map<String, Value>,
}

/// Read-only widget template, fetched once and served unchanged
#[derive(Debug, Clone)]
pub struct WidgetResource {
    descriptor: ResourceDescriptor,
    content: Arc<ResourceContent>,
}

impl WidgetResource {
    /// Fetch the template from `source` and build the resource.
    ///
    /// A fetch failure is returned as-is; the caller is expected to abort
    /// startup since the widget cannot render without its template.
    pub async fn load(
        config: &WidgetConfig,
        source: &dyn TemplateSource,
        logger: Arc<dyn Logger>,
    ) -> ResourceResult<Self> {
        logger.info(&format!("[WidgetResource] Fetching template from {}", source.name()));
        let markup = source.fetch().await.map_err(|e| {
            logger.error(&format!("[WidgetResource] {}", e));
            e
        })?;
        logger.info(&format!(
            "[WidgetResource] Registered {} ({} bytes)",
            config.uri,
            markup.len()
        ));
        Ok(Self::from_markup(config, markup))
    }

    /// Build the resource from markup that is already in hand
    pub fn from_markup(config: &WidgetConfig, markup: impl AsRef<str>) -> Self {
        let descriptor = ResourceDescriptor {
            uri: config.uri.clone(),
            name: config.name.clone(),
            title: config.title.clone(),
            description: config.description.clone(),
            mime_type: WIDGET_MIME_TYPE.to_string(),
            meta: config.resource_meta(),
        };
        let content = ResourceContent {
            uri: config.uri.clone(),
            mime_type: WIDGET_MIME_TYPE.to_string(),
            text: format!("<html>{}</html>", markup.as_ref()),
            meta: config.contents_meta(),
        };
        Self {
            descriptor,
            content: Arc::new(content),
        }
    }

    pub fn uri(&self) -> &str {
        &self.descriptor.uri
    }

    pub fn descriptor(&self) -> &ResourceDescriptor {
        &self.descriptor
    }

    /// Read the resource by URI
    pub fn read(&self, uri: &str) -> ResourceResult<Arc<ResourceContent>> {
        if uri == self.descriptor.uri {
            Ok(Arc::clone(&self.content))
        } else {
            Err(ResourceError::NotFound(uri.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::{LogLevel, MemoryLogger, NoOpLogger};
    use crate::resource::{FileTemplateSource, StaticTemplateSource};

    #[tokio::test]
    async fn test_load_wraps_markup() {
        let config = WidgetConfig::default();
        let source = StaticTemplateSource::new("<div id=\"root\"></div>");

        let resource = WidgetResource::load(&config, &source, Arc::new(NoOpLogger::new()))
            .await
            .unwrap();

        let content = resource.read("ui://widget/todo-template.html").unwrap();
        assert_eq!(content.text, "<html><div id=\"root\"></div></html>");
        assert_eq!(content.mime_type, "text/html+skybridge");
        assert_eq!(content.meta["openai/widgetDomain"], "http://localhost:3000");
    }

    #[tokio::test]
    async fn test_served_unchanged_on_every_read() {
        let resource = WidgetResource::from_markup(&WidgetConfig::default(), "<p>x</p>");

        let first = resource.read(resource.uri()).unwrap();
        let second = resource.read(resource.uri()).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_load_failure_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileTemplateSource::new(dir.path().join("missing.html"));
        let logger = Arc::new(MemoryLogger::new());

        let result = WidgetResource::load(&WidgetConfig::default(), &source, logger.clone()).await;

        assert!(matches!(result, Err(ResourceError::FetchFailed { .. })));
        assert!(logger.contains(LogLevel::Error, "Failed to fetch widget template"));
    }

    #[test]
    fn test_unknown_uri() {
        let resource = WidgetResource::from_markup(&WidgetConfig::default(), "");
        let err = resource.read("ui://widget/other.html").unwrap_err();
        assert!(matches!(err, ResourceError::NotFound(ref uri) if uri == "ui://widget/other.html"));
    }

    #[test]
    fn test_descriptor() {
        let resource = WidgetResource::from_markup(&WidgetConfig::default(), "");
        let value = serde_json::to_value(resource.descriptor()).unwrap();

        assert_eq!(value["name"], "todo-widget");
        assert_eq!(value["mimeType"], "text/html+skybridge");
        assert_eq!(value["_meta"]["openai/widgetDescription"], "Interactive todo list widget");
        assert_eq!(value["_meta"]["openai/widgetPrefersBorder"], true);
    }
}
