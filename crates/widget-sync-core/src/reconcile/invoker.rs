//! Tool invocation seam used by the widget store

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::tools::{RegistryError, ToolRegistry};
use crate::types::ToolResponse;

/// Failures surfaced to the widget when a tool call does not produce a result
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvokeError {
    /// The registry refused the call before touching the collection
    #[error("Tool call rejected: {0}")]
    Rejected(#[from] RegistryError),

    /// The request/response channel failed
    #[error("Transport error: {0}")]
    Transport(String),
}

pub type InvokeResult<T> = Result<T, InvokeError>;

/// Something that can run a named tool and hand back its response
#[async_trait]
pub trait ToolInvoker: Send + Sync {
    async fn call_tool(&self, name: &str, arguments: Value) -> InvokeResult<ToolResponse>;
}

#[async_trait]
impl ToolInvoker for ToolRegistry {
    async fn call_tool(&self, name: &str, arguments: Value) -> InvokeResult<ToolResponse> {
        Ok(ToolRegistry::call_tool(self, name, arguments)?)
    }
}
