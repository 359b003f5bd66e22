//! MCP server adapter
//!
//! Exposes the tool registry and the widget resource over rmcp. The handler
//! is a thin translation layer: validation, mutation and snapshots all live
//! in `ToolRegistry`.

use std::future::Future;
use std::sync::Arc;

use rmcp::model::{
    AnnotateAble, CallToolRequestParams, CallToolResult, Content, Implementation, JsonObject,
    ListResourcesResult, ListToolsResult, Meta, PaginatedRequestParams, RawResource,
    ReadResourceRequestParams, ReadResourceResult, Resource, ResourceContents,
    ServerCapabilities, ServerInfo, Tool,
};
use rmcp::service::RequestContext;
use rmcp::{ErrorData as McpError, RoleServer, ServerHandler, ServiceExt};
use serde_json::{Map, Value};

use crate::config::ServerSettings;
use crate::log_info;
use crate::logging::Logger;
use crate::resource::{ResourceError, WidgetResource};
use crate::tools::{RegistryError, ToolInfo, ToolRegistry};

/// rmcp handler serving the todo tools and the widget template
#[derive(Clone)]
pub struct WidgetServer {
    registry: Arc<ToolRegistry>,
    resource: Arc<WidgetResource>,
    settings: ServerSettings,
    logger: Arc<dyn Logger>,
}

impl WidgetServer {
    pub fn new(
        registry: Arc<ToolRegistry>,
        resource: Arc<WidgetResource>,
        settings: ServerSettings,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            registry,
            resource,
            settings,
            logger,
        }
    }

    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    /// Serve over stdin/stdout until the client disconnects
    pub async fn serve_stdio(self) -> Result<(), rmcp::RmcpError> {
        let logger = Arc::clone(&self.logger);
        log_info!(logger, "[WidgetServer] Serving {} over stdio", self.settings.name);
        let service = self.serve((tokio::io::stdin(), tokio::io::stdout())).await?;
        service.waiting().await?;
        logger.info("[WidgetServer] Client disconnected");
        Ok(())
    }

    fn tool_descriptors(&self) -> Vec<Tool> {
        self.registry.tools().iter().map(to_mcp_tool).collect()
    }

    fn call(&self, name: &str, arguments: Option<JsonObject>) -> Result<CallToolResult, McpError> {
        let arguments = arguments.map(Value::Object).unwrap_or(Value::Null);
        let response = self.registry.call_tool(name, arguments).map_err(to_mcp_error)?;

        let structured = serde_json::to_value(&response.structured_content).map_err(|e| {
            McpError::internal_error(format!("failed to encode result: {e}"), None)
        })?;
        let mut result = CallToolResult::success(vec![Content::text(response.text())]);
        result.structured_content = Some(structured);
        Ok(result)
    }

    fn resources(&self) -> Vec<Resource> {
        let descriptor = self.resource.descriptor();
        vec![RawResource {
            uri: descriptor.uri.clone(),
            name: descriptor.name.clone(),
            title: Some(descriptor.title.clone()),
            description: Some(descriptor.description.clone()),
            mime_type: Some(descriptor.mime_type.clone()),
            size: None,
            icons: None,
            meta: to_meta(&descriptor.meta),
        }
        .no_annotation()]
    }

    fn read(&self, uri: &str) -> Result<ReadResourceResult, McpError> {
        let content = self.resource.read(uri).map_err(|e| match e {
            ResourceError::NotFound(_) => McpError::resource_not_found(e.to_string(), None),
            other => McpError::internal_error(other.to_string(), None),
        })?;

        let mut contents = ResourceContents::text(content.text.clone(), content.uri.clone());
        if let ResourceContents::TextResourceContents {
            ref mut mime_type,
            ref mut meta,
            ..
        } = contents
        {
            *mime_type = Some(content.mime_type.clone());
            *meta = to_meta(&content.meta);
        }
        Ok(ReadResourceResult {
            contents: vec![contents],
        })
    }
}

fn to_mcp_tool(info: &ToolInfo) -> Tool {
    let schema = match info.input_schema {
        Value::Object(ref map) => map.clone(),
        _ => Map::new(),
    };
    let mut tool = Tool::new(info.name.clone(), info.description.clone(), Arc::new(schema));
    tool.title = Some(info.title.clone());
    tool.meta = to_meta(&info.meta);
    tool
}

fn to_meta(map: &Map<String, Value>) -> Option<Meta> {
    if map.is_empty() {
        None
    } else {
        Some(Meta(map.clone()))
    }
}

fn to_mcp_error(error: RegistryError) -> McpError {
    McpError::invalid_params(error.to_string(), None)
}

impl ServerHandler for WidgetServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: self.settings.instructions.clone(),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation {
                name: self.settings.name.clone(),
                version: self.settings.version.clone(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        async move {
            Ok(ListToolsResult {
                meta: None,
                next_cursor: None,
                tools: self.tool_descriptors(),
            })
        }
    }

    fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<CallToolResult, McpError>> + Send + '_ {
        async move { self.call(&request.name, request.arguments) }
    }

    fn list_resources(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<ListResourcesResult, McpError>> + Send + '_ {
        async move {
            Ok(ListResourcesResult {
                meta: None,
                next_cursor: None,
                resources: self.resources(),
            })
        }
    }

    fn read_resource(
        &self,
        request: ReadResourceRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<ReadResourceResult, McpError>> + Send + '_ {
        async move { self.read(&request.uri) }
    }
}
