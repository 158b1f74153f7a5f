//! Error types for the bridge runtime

use thiserror::Error;

/// Errors surfaced by the tool bridge
#[derive(Error, Debug)]
pub enum BridgeError {
    /// A tool with this name is already registered
    #[error("Tool '{0}' is already registered")]
    DuplicateTool(String),

    /// No registered tool has this name
    #[error("Tool '{0}' not found in registry")]
    ToolNotFound(String),

    /// The provider call failed
    #[error("Provider error: {0}")]
    Provider(#[from] bridge_providers::ProviderError),

    /// A blocking runtime could not be constructed for execute_sync
    #[error("Runtime error: {0}")]
    Runtime(String),
}

/// Result type alias for bridge operations
pub type Result<T> = std::result::Result<T, BridgeError>;
