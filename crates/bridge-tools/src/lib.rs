//! Tool model for the LLM Tool Bridge
//!
//! This crate defines schema-described tools with bound async handlers,
//! argument validation and coercion against declared parameter schemas, and
//! rendering into the provider-neutral schema document consumed by LLM
//! providers.

pub mod error;
pub mod parameter;
pub mod tool;

pub use error::{Result, ToolError};
pub use parameter::{ParameterDefinition, ParameterType};
pub use tool::{Tool, ToolHandler};
