//! Tool error types.

use thiserror::Error;

/// Errors that can occur while executing a capability.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("host sampling failed: {0}")]
    Sampling(String),
}

impl From<reqwest::Error> for ToolError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.to_string())
    }
}

/// Convenience alias for tool results.
pub type ToolResult<T> = Result<T, ToolError>;
