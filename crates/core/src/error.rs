//! Error types for the RustedReact domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.
//!
//! None of these errors escape a `run`: provider errors are turned into
//! response text by the agent loop and tool errors into observations by
//! the [`ToolRegistry`](crate::tool::ToolRegistry).

use thiserror::Error;

/// Errors raised while assembling an agent.
#[derive(Debug, Error)]
pub enum Error {
    // --- Registry errors ---
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API returned status {status_code}: {message}")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

#[derive(Debug, Clone, Error)]
pub enum ToolError {
    #[error("Tool execution failed: {tool_name} — {reason}")]
    ExecutionFailed { tool_name: String, reason: String },

    #[error("Tool timed out: {tool_name} after {timeout_secs}s")]
    Timeout { tool_name: String, timeout_secs: u64 },

    #[error("Tool panicked: {0}")]
    Panicked(String),

    #[error("Invalid tool arguments: {0}")]
    InvalidArguments(String),
}

impl ToolError {
    /// The failure message reported back to the model.
    pub fn reason(&self) -> String {
        match self {
            ToolError::ExecutionFailed { reason, .. } => reason.clone(),
            ToolError::InvalidArguments(reason) => format!("invalid arguments: {reason}"),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Tool '{0}' is already registered")]
    DuplicateTool(String),
}
