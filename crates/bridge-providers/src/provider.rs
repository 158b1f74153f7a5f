//! LLM provider trait definition

use async_trait::async_trait;
use bridge_core::LLMResponse;

use crate::error::Result;
use crate::request::GenerateRequest;

/// Trait for LLM providers
///
/// One implementation per vendor API (OpenAI, Azure OpenAI, Gemini). A
/// provider translates the neutral request into its vendor's wire shape,
/// performs the call, and normalizes the raw response. Vendor failures
/// surface as typed [`crate::ProviderError`] values, never as raw transport
/// errors.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Exchange a prompt, offered tools, and prior tool results for a
    /// normalized response
    async fn generate(&self, request: GenerateRequest) -> Result<LLMResponse>;

    /// Get the provider name (e.g. "openai", "gemini")
    fn name(&self) -> &str;
}
