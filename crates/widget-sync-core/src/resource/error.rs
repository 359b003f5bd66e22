//! Resource error types

use thiserror::Error;

/// Errors raised while loading or serving the widget template
#[derive(Error, Debug)]
pub enum ResourceError {
    /// The template could not be fetched at startup
    #[error("Failed to fetch widget template from {source_name}: {message}")]
    FetchFailed { source_name: String, message: String },

    /// No resource is registered under this URI
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ResourceError {
    pub fn fetch_failed(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FetchFailed {
            source_name: source_name.into(),
            message: message.into(),
        }
    }
}

pub type ResourceResult<T> = Result<T, ResourceError>;
