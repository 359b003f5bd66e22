//! MCP (Model Context Protocol) server module
//!
//! Uses the official rmcp SDK to serve the registry over stdio.
//!
//! # Example
//!
//! ```rust,ignore
//! use widget_sync_core::mcp::WidgetServer;
//!
//! let server = WidgetServer::new(registry, resource, config.server, logger);
//! server.serve_stdio().await?;
//! ```

mod server;

pub use server::WidgetServer;
