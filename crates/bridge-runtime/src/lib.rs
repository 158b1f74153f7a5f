//! Runtime for tool-augmented LLM exchanges
//!
//! This crate provides the ToolBridge, which holds a tool registry and a
//! provider backend and runs the tool-call resolution loop until the model
//! answers in text or the tool-call bound is reached.

pub mod bridge;
pub mod error;

// Re-export key types
pub use bridge::{DEFAULT_MAX_TOOL_CALLS, ToolBridge, ToolRef};
pub use error::{BridgeError, Result};
