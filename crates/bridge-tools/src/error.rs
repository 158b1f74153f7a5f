//! Error types for tool invocation

use thiserror::Error;

/// Result type alias for tool operations
pub type Result<T> = std::result::Result<T, ToolError>;

/// Error type for tool invocation
#[derive(Error, Debug)]
pub enum ToolError {
    /// A required parameter was not supplied and has no default
    #[error("Missing required parameter '{0}'")]
    MissingParameter(String),

    /// A supplied argument did not match the declared parameter schema
    #[error("Invalid value for parameter '{name}': {reason}")]
    InvalidParameter {
        /// Parameter name
        name: String,
        /// What made the value invalid
        reason: String,
    },

    /// A supplied argument was outside the declared set of allowed values
    #[error("Invalid value for parameter '{name}': {value} is not one of the allowed values")]
    InvalidEnumValue {
        /// Parameter name
        name: String,
        /// The rejected value, JSON-encoded
        value: String,
    },

    /// The tool has no bound handler to invoke
    #[error("Tool '{0}' has no bound handler")]
    HandlerNotBound(String),

    /// The bound handler reported a failure
    #[error("Tool execution failed: {0}")]
    ExecutionFailed(String),
}
