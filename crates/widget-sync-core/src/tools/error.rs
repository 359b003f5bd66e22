//! Registry error types

use thiserror::Error;

/// Protocol faults raised by the registry.
///
/// These are the only failures that cross the tool boundary as errors; a
/// reference to a missing item is reported as data (`action: "error"`).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// No tool with this name is registered
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Arguments failed schema validation; nothing was mutated
    #[error("Invalid arguments for {tool}: {reason}")]
    InvalidArguments { tool: String, reason: String },
}

impl RegistryError {
    pub fn invalid_arguments(tool: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArguments {
            tool: tool.into(),
            reason: reason.into(),
        }
    }
}

pub type RegistryResult<T> = Result<T, RegistryError>;
