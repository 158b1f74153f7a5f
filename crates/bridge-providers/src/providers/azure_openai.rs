//! Azure OpenAI provider implementation
//!
//! Azure hosts the same chat completions protocol as OpenAI behind a
//! deployment-scoped URL and an `api-key` header, so this module reuses the
//! wire types and parsing from the OpenAI module and only supplies the
//! endpoint and auth differences.
//!
//! # Examples
//!
//! ```no_run
//! use bridge_providers::{GenerateRequest, Provider};
//! use bridge_providers::providers::azure_openai::{AzureOpenAIConfig, AzureOpenAIProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AzureOpenAIConfig::new(
//!         "azure-key",
//!         "https://my-resource.openai.azure.com",
//!         "gpt-4-deployment",
//!     );
//!     let provider = AzureOpenAIProvider::with_config(config)?;
//!
//!     let response = provider.generate(GenerateRequest::new("Hello!")).await?;
//!     println!("{}", response.content.unwrap_or_default());
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use bridge_core::LLMResponse;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::adapter::{ProviderAdapter, ProviderCapabilities};
use crate::error::{ProviderError, Result};
use crate::provider::Provider;
use crate::request::GenerateRequest;

use super::openai::{
    build_chat_request, default_timeout_secs, parse_chat_response_body, read_chat_response,
};

const DEFAULT_API_VERSION: &str = "2023-12-01-preview";

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

/// Configuration for the Azure OpenAI provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AzureOpenAIConfig {
    /// API key for the Azure OpenAI resource
    pub api_key: String,

    /// Resource endpoint, e.g. "https://my-resource.openai.azure.com"
    pub endpoint: String,

    /// Deployment name that selects the model
    pub deployment_name: String,

    /// API version query parameter (default: "2023-12-01-preview")
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Request timeout in seconds (default: 120)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl AzureOpenAIConfig {
    /// Create a new config with default API version and timeout
    pub fn new(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        deployment_name: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            deployment_name: deployment_name.into(),
            api_version: default_api_version(),
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Create config from environment variables
    ///
    /// Requires `AZURE_OPENAI_API_KEY`, `AZURE_OPENAI_ENDPOINT` and
    /// `AZURE_OPENAI_DEPLOYMENT`. Optionally reads `AZURE_OPENAI_API_VERSION`.
    pub fn from_env() -> Result<Self> {
        let require = |name: &str| {
            std::env::var(name).map_err(|_| {
                ProviderError::ConfigurationError(format!(
                    "{name} environment variable not set"
                ))
            })
        };

        Ok(Self {
            api_key: require("AZURE_OPENAI_API_KEY")?,
            endpoint: require("AZURE_OPENAI_ENDPOINT")?,
            deployment_name: require("AZURE_OPENAI_DEPLOYMENT")?,
            api_version: std::env::var("AZURE_OPENAI_API_VERSION")
                .unwrap_or_else(|_| default_api_version()),
            timeout_secs: default_timeout_secs(),
        })
    }

    /// Set the API version
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    /// Set the request timeout in seconds
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// Azure OpenAI provider
pub struct AzureOpenAIProvider {
    client: Client,
    config: AzureOpenAIConfig,
}

impl AzureOpenAIProvider {
    /// Create a new Azure OpenAI provider with the given configuration
    pub fn with_config(config: AzureOpenAIConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    /// Create a provider from environment variables
    pub fn from_env() -> Result<Self> {
        Self::with_config(AzureOpenAIConfig::from_env()?)
    }

    /// Get the current configuration
    pub fn config(&self) -> &AzureOpenAIConfig {
        &self.config
    }

    /// Deployment-scoped chat completions URL
    fn request_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.config.endpoint.trim_end_matches('/'),
            self.config.deployment_name,
            self.config.api_version
        )
    }

    /// Build the chat completions request body. Performs no I/O.
    ///
    /// The body carries no model field. The deployment in the URL selects it.
    pub(crate) fn build_request_body(&self, request: &GenerateRequest) -> Result<Value> {
        let body = build_chat_request(None, request);
        Ok(serde_json::to_value(body)?)
    }

    /// Execute a prepared request body against the deployment
    pub(crate) async fn post_chat(&self, body: &Value) -> Result<Value> {
        let response = self
            .client
            .post(self.request_url())
            .header("api-key", &self.config.api_key)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await?;

        read_chat_response(response, &self.config.deployment_name).await
    }
}

#[async_trait]
impl Provider for AzureOpenAIProvider {
    #[instrument(skip(self, request), fields(deployment = %self.config.deployment_name))]
    async fn generate(&self, request: GenerateRequest) -> Result<LLMResponse> {
        debug!(
            "Sending request to Azure OpenAI deployment {}",
            self.config.deployment_name
        );

        let body = self.build_request_body(&request)?;
        let raw = self.post_chat(&body).await?;
        parse_chat_response_body(raw)
    }

    fn name(&self) -> &str {
        "azure_openai"
    }
}

/// Adapter exposing the Azure OpenAI provider through the three-phase contract
pub struct AzureOpenAIAdapter {
    provider: AzureOpenAIProvider,
}

impl AzureOpenAIAdapter {
    /// Wrap an existing provider
    pub fn new(provider: AzureOpenAIProvider) -> Self {
        Self { provider }
    }

    /// Build the provider from config, then wrap it
    pub fn from_config(config: AzureOpenAIConfig) -> Result<Self> {
        Ok(Self::new(AzureOpenAIProvider::with_config(config)?))
    }
}

#[async_trait]
impl ProviderAdapter for AzureOpenAIAdapter {
    fn prepare_request(&self, request: &GenerateRequest) -> Result<Value> {
        self.provider.build_request_body(request)
    }

    async fn execute_request(&self, prepared: Value) -> Result<Value> {
        self.provider.post_chat(&prepared).await
    }

    fn parse_response(&self, raw: Value) -> Result<LLMResponse> {
        parse_chat_response_body(raw)
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            supports_tool_calling: true,
            supports_multiple_tools: true,
            supports_streaming: false,
            supports_vision: true,
            max_tokens_limit: Some(4096),
        }
    }

    fn name(&self) -> &str {
        "azure_openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_config() -> AzureOpenAIConfig {
        AzureOpenAIConfig::new(
            "azure-key",
            "https://my-resource.openai.azure.com",
            "gpt-4-deployment",
        )
    }

    #[test]
    fn test_provider_creation() {
        let provider = AzureOpenAIProvider::with_config(sample_config()).unwrap();
        assert_eq!(provider.name(), "azure_openai");
        assert_eq!(provider.config().api_version, "2023-12-01-preview");
    }

    #[test]
    fn test_request_url_includes_deployment_and_version() {
        let provider = AzureOpenAIProvider::with_config(sample_config()).unwrap();
        assert_eq!(
            provider.request_url(),
            "https://my-resource.openai.azure.com/openai/deployments/gpt-4-deployment/chat/completions?api-version=2023-12-01-preview"
        );
    }

    #[test]
    fn test_request_url_trims_trailing_slash() {
        let config = AzureOpenAIConfig::new(
            "azure-key",
            "https://my-resource.openai.azure.com/",
            "gpt-4-deployment",
        );
        let provider = AzureOpenAIProvider::with_config(config).unwrap();
        assert!(
            provider
                .request_url()
                .starts_with("https://my-resource.openai.azure.com/openai/")
        );
    }

    #[test]
    fn test_config_from_env() {
        unsafe {
            std::env::set_var("AZURE_OPENAI_API_KEY", "env-key");
            std::env::set_var("AZURE_OPENAI_ENDPOINT", "https://env.openai.azure.com");
            std::env::set_var("AZURE_OPENAI_DEPLOYMENT", "env-deployment");
        }

        let config = AzureOpenAIConfig::from_env().unwrap();
        assert_eq!(config.api_key, "env-key");
        assert_eq!(config.endpoint, "https://env.openai.azure.com");
        assert_eq!(config.deployment_name, "env-deployment");

        unsafe {
            std::env::remove_var("AZURE_OPENAI_API_KEY");
            std::env::remove_var("AZURE_OPENAI_ENDPOINT");
            std::env::remove_var("AZURE_OPENAI_DEPLOYMENT");
        }

        let err = AzureOpenAIConfig::from_env().unwrap_err();
        assert!(matches!(err, ProviderError::ConfigurationError(_)));
        assert!(err.to_string().contains("AZURE_OPENAI_API_KEY"));
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: AzureOpenAIConfig = serde_json::from_value(json!({
            "api_key": "azure-key",
            "endpoint": "https://my-resource.openai.azure.com",
            "deployment_name": "gpt-4-deployment",
        }))
        .unwrap();
        assert_eq!(config.api_version, "2023-12-01-preview");
        assert_eq!(config.timeout_secs, 120);
    }

    #[test]
    fn test_request_body_omits_model() {
        let provider = AzureOpenAIProvider::with_config(sample_config()).unwrap();
        let body = provider
            .build_request_body(&GenerateRequest::new("Hello"))
            .unwrap();

        assert!(body.get("model").is_none());
        assert_eq!(body["messages"][0]["content"], "Hello");
    }

    #[test]
    fn test_adapter_capabilities() {
        let adapter = AzureOpenAIAdapter::from_config(sample_config()).unwrap();
        let caps = adapter.capabilities();
        assert!(caps.supports_tool_calling);
        assert_eq!(caps.max_tokens_limit, Some(4096));
        assert_eq!(adapter.name(), "azure_openai");
    }
}
