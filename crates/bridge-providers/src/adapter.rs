//! Provider adapter contract and capability descriptors

use async_trait::async_trait;
use bridge_core::LLMResponse;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::request::GenerateRequest;

/// Declared capabilities of a wrapped provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProviderCapabilities {
    /// Whether the provider supports tool/function calling
    #[serde(default)]
    pub supports_tool_calling: bool,

    /// Whether multiple tools can be offered in a single request
    #[serde(default)]
    pub supports_multiple_tools: bool,

    /// Whether streaming responses are supported
    #[serde(default)]
    pub supports_streaming: bool,

    /// Whether vision/image inputs are supported
    #[serde(default)]
    pub supports_vision: bool,

    /// Maximum number of tokens accepted in a request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens_limit: Option<usize>,
}

/// Uniform wrapper exposing a provider through prepare/execute/parse phases
///
/// `prepare_request` and `parse_response` are pure; `execute_request` is the
/// only I/O boundary. The split lets callers interpose caching, request
/// logging, or retry wrapping between phases without touching vendor logic.
/// Phases exchange `serde_json::Value` so the trait stays object-safe across
/// vendors with different wire shapes.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Build the provider-specific request body. Performs no I/O.
    fn prepare_request(&self, request: &GenerateRequest) -> Result<Value>;

    /// Execute a prepared request against the vendor endpoint
    async fn execute_request(&self, prepared: Value) -> Result<Value>;

    /// Convert a raw provider response into the normalized shape. Performs no I/O.
    fn parse_response(&self, raw: Value) -> Result<LLMResponse>;

    /// Static capability descriptor for the wrapped vendor
    fn capabilities(&self) -> ProviderCapabilities;

    /// Adapter name, matching its registry key
    fn name(&self) -> &str;

    /// Run the three phases in order
    ///
    /// With this an adapter can stand in anywhere a provider is expected.
    async fn generate(&self, request: GenerateRequest) -> Result<LLMResponse> {
        let prepared = self.prepare_request(&request)?;
        let raw = self.execute_request(prepared).await?;
        self.parse_response(raw)
    }
}

// Lets unit tests call `unwrap_err` on `Result<Arc<dyn ProviderAdapter>, _>`,
// which requires the `Ok` type to be `Debug`.
#[cfg(test)]
impl std::fmt::Debug for dyn ProviderAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderAdapter")
            .field("name", &self.name())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capabilities_default_to_nothing() {
        let caps = ProviderCapabilities::default();
        assert!(!caps.supports_tool_calling);
        assert!(!caps.supports_multiple_tools);
        assert!(!caps.supports_streaming);
        assert!(!caps.supports_vision);
        assert_eq!(caps.max_tokens_limit, None);
    }

    #[test]
    fn test_capabilities_serde_round_trip() {
        let caps = ProviderCapabilities {
            supports_tool_calling: true,
            supports_multiple_tools: true,
            supports_streaming: false,
            supports_vision: true,
            max_tokens_limit: Some(8192),
        };
        let encoded = serde_json::to_string(&caps).unwrap();
        let decoded: ProviderCapabilities = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, caps);
    }
}
