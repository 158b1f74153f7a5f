//! Provider-neutral exchange types for the LLM Tool Bridge
//!
//! This crate defines the types exchanged between the bridge, its registered
//! tools, and the LLM providers: tool schema documents, model-issued tool
//! calls, tool results, and the normalized response shape.

pub mod definition;
pub mod exchange;

pub use definition::ToolDefinition;
pub use exchange::{LLMResponse, ToolCall, ToolResult};
