//! Provider implementations
//!
//! Each submodule pairs a `Provider` with its `ProviderAdapter` and config
//! type. All three are registered under their wire names by
//! [`register_builtin_adapters`](crate::registry::register_builtin_adapters).

pub mod azure_openai;
pub mod gemini;
pub mod openai;

pub use azure_openai::{AzureOpenAIAdapter, AzureOpenAIConfig, AzureOpenAIProvider};
pub use gemini::{FunctionCallingMode, GeminiAdapter, GeminiConfig, GeminiProvider};
pub use openai::{OpenAIAdapter, OpenAIConfig, OpenAIProvider};
