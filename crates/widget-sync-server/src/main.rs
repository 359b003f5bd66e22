//! Todo widget MCP server
//!
//! Loads configuration, fetches the widget template once, then serves the
//! todo tools and the template over stdio. Logs go to stderr or a file so
//! stdout stays reserved for the protocol.

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use widget_sync_core::config::{ConfigProvider, FileConfigProvider};
use widget_sync_core::{log_info, logging};
use widget_sync_core::resource::{template_source, WidgetResource};
use widget_sync_core::{ToolRegistry, WidgetServer};

#[derive(Parser)]
#[command(name = "widget-sync-server")]
#[command(about = "Serve the todo widget tools and template over MCP stdio", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (default: ~/.config/widget-sync/config.yaml)
    #[arg(short, long, env = "WIDGET_SYNC_CONFIG")]
    config: Option<PathBuf>,

    /// Load config and template, report, and exit without serving
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let provider = match cli.config {
        Some(path) => FileConfigProvider::new(path),
        None => FileConfigProvider::user(),
    };
    let config = provider.get_config().await?.with_env_overrides();
    config.validate()?;

    let logger = logging::from_config(&config.logging);
    log_info!(
        logger,
        "[Main] Config: {}{}",
        provider.path().display(),
        if provider.exists() { "" } else { " (not found, using defaults)" }
    );

    let source = template_source(&config.widget);
    let resource = WidgetResource::load(&config.widget, source.as_ref(), logger.clone()).await?;

    let registry = ToolRegistry::new(logger.clone()).with_tool_meta(config.widget.tool_meta());

    if cli.check {
        log_info!(
            logger,
            "[Main] OK: {} tools, resource {}",
            registry.tool_count(),
            resource.uri()
        );
        return Ok(());
    }

    let server = WidgetServer::new(
        Arc::new(registry),
        Arc::new(resource),
        config.server.clone(),
        logger,
    );
    server.serve_stdio().await?;
    Ok(())
}
