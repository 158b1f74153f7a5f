//! Provider integration for the tool bridge
//!
//! This crate defines the provider abstraction and ships implementations for
//! OpenAI, Azure OpenAI and Google Gemini. Every provider accepts the same
//! [`GenerateRequest`] and returns the normalized
//! [`LLMResponse`](bridge_core::LLMResponse), so application code is written
//! once and the provider is chosen by configuration.
//!
//! Two integration surfaces are available:
//!
//! - [`Provider`]: the minimal trait, one `generate` call per exchange.
//! - [`ProviderAdapter`]: splits an exchange into prepare, execute and parse
//!   phases. The prepare and parse phases are pure, which keeps the vendor
//!   wire formats testable without network access, and adapters additionally
//!   report their [`ProviderCapabilities`].
//!
//! Adapters can be constructed from JSON config blocks through the
//! [`AdapterRegistry`], so a deployment can switch vendors without code
//! changes.
//!
//! # Examples
//!
//! ```no_run
//! use bridge_providers::{GenerateRequest, Provider};
//! use bridge_providers::providers::openai::OpenAIProvider;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = OpenAIProvider::from_env()?;
//!     let response = provider.generate(GenerateRequest::new("Hello!")).await?;
//!     println!("{}", response.content.unwrap_or_default());
//!     Ok(())
//! }
//! ```

pub mod adapter;
pub mod error;
pub mod provider;
pub mod providers;
pub mod registry;
pub mod request;

pub use adapter::{ProviderAdapter, ProviderCapabilities};
pub use error::{ProviderError, Result};
pub use provider::Provider;
pub use registry::{
    AdapterFactory, AdapterRegistry, global_registry, register_builtin_adapters,
};
pub use request::{GenerateOptions, GenerateRequest, GenerateRequestBuilder};
