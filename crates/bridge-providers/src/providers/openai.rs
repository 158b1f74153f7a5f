//! OpenAI provider implementation
//!
//! This module implements the Provider trait for OpenAI's chat completions
//! API. See: https://platform.openai.com/docs/api-reference/chat
//!
//! The chat-completions wire types live here and are shared with the Azure
//! OpenAI provider, which speaks the same protocol behind a different URL
//! and auth header.
//!
//! # Examples
//!
//! ## Basic usage with environment variable
//!
//! ```no_run
//! use bridge_providers::{GenerateRequest, Provider};
//! use bridge_providers::providers::openai::OpenAIProvider;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Create provider from OPENAI_API_KEY environment variable
//!     let provider = OpenAIProvider::from_env()?;
//!
//!     let request = GenerateRequest::builder("Hello!").max_tokens(100).build();
//!     let response = provider.generate(request).await?;
//!     println!("{}", response.content.unwrap_or_default());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Custom configuration
//!
//! ```no_run
//! use bridge_providers::providers::openai::{OpenAIConfig, OpenAIProvider};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = OpenAIConfig::new("sk-...")
//!     .with_model("gpt-4o")
//!     .with_api_base("http://localhost:8000/v1")
//!     .with_timeout(60);
//!
//! let provider = OpenAIProvider::with_config(config)?;
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use bridge_core::{LLMResponse, ToolCall, ToolDefinition, ToolResult};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::{debug, instrument};

use crate::adapter::{ProviderAdapter, ProviderCapabilities};
use crate::error::{ProviderError, Result};
use crate::provider::Provider;
use crate::request::GenerateRequest;

const DEFAULT_OPENAI_API_BASE: &str = "https://api.openai.com/v1";
const DEFAULT_OPENAI_MODEL: &str = "gpt-4";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

// Vendor defaults applied when the request options leave a field unset.
pub(crate) const DEFAULT_TEMPERATURE: f32 = 0.7;
pub(crate) const DEFAULT_MAX_TOKENS: usize = 800;
pub(crate) const DEFAULT_TOP_P: f32 = 1.0;

fn default_api_base() -> String {
    DEFAULT_OPENAI_API_BASE.to_string()
}

fn default_model() -> String {
    DEFAULT_OPENAI_MODEL.to_string()
}

pub(crate) fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Configuration for the OpenAI provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIConfig {
    /// API key for authentication
    pub api_key: String,

    /// Model identifier (default: "gpt-4")
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL for the OpenAI API (default: "https://api.openai.com/v1")
    /// Can be customized for OpenAI-compatible local deployments.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Optional organization id sent as the OpenAI-Organization header
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,

    /// Request timeout in seconds (default: 120)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl OpenAIConfig {
    /// Create a new config with the given API key and default settings
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: default_model(),
            api_base: default_api_base(),
            organization: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Create config from environment variables
    ///
    /// Reads the API key from `OPENAI_API_KEY`. Optionally reads the model
    /// from `OPENAI_MODEL` and the base URL from `OPENAI_API_BASE`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            ProviderError::ConfigurationError(
                "OPENAI_API_KEY environment variable not set".to_string(),
            )
        })?;

        let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| default_model());
        let api_base = std::env::var("OPENAI_API_BASE").unwrap_or_else(|_| default_api_base());

        Ok(Self {
            api_key,
            model,
            api_base,
            organization: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        })
    }

    /// Set the model identifier
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set a custom API base URL
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Set the organization id
    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    /// Set the request timeout in seconds
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// OpenAI provider
///
/// Talks to the chat completions endpoint with function calling enabled.
/// Also works with OpenAI-compatible APIs through a custom `api_base`.
pub struct OpenAIProvider {
    client: Client,
    config: OpenAIConfig,
}

impl OpenAIProvider {
    /// Create a new OpenAI provider with custom configuration
    pub fn with_config(config: OpenAIConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    /// Create a new OpenAI provider with an API key and default settings
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(OpenAIConfig::new(api_key))
    }

    /// Create a provider from environment variables
    pub fn from_env() -> Result<Self> {
        Self::with_config(OpenAIConfig::from_env()?)
    }

    /// Get the current configuration
    pub fn config(&self) -> &OpenAIConfig {
        &self.config
    }

    /// Endpoint URL for chat completions
    fn request_url(&self) -> String {
        format!("{}/chat/completions", self.config.api_base)
    }

    /// Build the chat completions request body. Performs no I/O.
    pub(crate) fn build_request_body(&self, request: &GenerateRequest) -> Result<Value> {
        let body = build_chat_request(Some(self.config.model.clone()), request);
        Ok(serde_json::to_value(body)?)
    }

    /// Execute a prepared request body against the endpoint
    pub(crate) async fn post_chat(&self, body: &Value) -> Result<Value> {
        let mut http_request = self
            .client
            .post(self.request_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json");

        if let Some(organization) = &self.config.organization {
            http_request = http_request.header("OpenAI-Organization", organization);
        }

        let response = http_request.json(body).send().await?;
        read_chat_response(response, &self.config.model).await
    }
}

#[async_trait]
impl Provider for OpenAIProvider {
    #[instrument(skip(self, request), fields(model = %self.config.model, api_base = %self.config.api_base))]
    async fn generate(&self, request: GenerateRequest) -> Result<LLMResponse> {
        debug!("Sending request to OpenAI API at {}", self.config.api_base);

        let body = self.build_request_body(&request)?;
        let raw = self.post_chat(&body).await?;
        parse_chat_response_body(raw)
    }

    fn name(&self) -> &str {
        "openai"
    }
}

/// Adapter exposing the OpenAI provider through the three-phase contract
pub struct OpenAIAdapter {
    provider: OpenAIProvider,
}

impl OpenAIAdapter {
    /// Wrap an existing provider
    pub fn new(provider: OpenAIProvider) -> Self {
        Self { provider }
    }

    /// Build the provider from config, then wrap it
    pub fn from_config(config: OpenAIConfig) -> Result<Self> {
        Ok(Self::new(OpenAIProvider::with_config(config)?))
    }
}

#[async_trait]
impl ProviderAdapter for OpenAIAdapter {
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
            max_tokens_limit: Some(8192),
        }
    }

    fn name(&self) -> &str {
        "openai"
    }
}

// ============================================================================
// Chat completions wire types (shared with the Azure OpenAI provider)
// ============================================================================

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest {
    /// Omitted for Azure, where the deployment in the URL selects the model
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<String>,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: usize,
    top_p: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<ChatTool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<String>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<ChatToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct ChatTool {
    #[serde(rename = "type")]
    tool_type: String,
    function: ChatFunction,
}

#[derive(Debug, Serialize)]
struct ChatFunction {
    name: String,
    description: String,
    parameters: Value,
}

#[derive(Debug, Serialize)]
struct ChatToolCall {
    id: String,
    #[serde(rename = "type")]
    tool_type: String,
    function: ChatFunctionCall,
}

#[derive(Debug, Serialize)]
struct ChatFunctionCall {
    name: String,
    arguments: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
    tool_calls: Option<Vec<ChatResponseToolCall>>,
}

#[derive(Debug, Deserialize)]
struct ChatResponseToolCall {
    id: String,
    function: ChatResponseFunctionCall,
}

#[derive(Debug, Deserialize)]
struct ChatResponseFunctionCall {
    name: String,
    arguments: String,
}

// ============================================================================
// Conversion functions
// ============================================================================

/// Build the full chat completions request from the neutral request
pub(crate) fn build_chat_request(model: Option<String>, request: &GenerateRequest) -> ChatRequest {
    let tools = if request.tools.is_empty() {
        None
    } else {
        Some(convert_tools(&request.tools))
    };

    // tool_choice is only meaningful when tools are offered
    let tool_choice = tools.as_ref().map(|_| {
        request
            .options
            .tool_choice
            .clone()
            .unwrap_or_else(|| "auto".to_string())
    });

    ChatRequest {
        model,
        messages: build_chat_messages(&request.prompt, &request.tool_results),
        temperature: request.options.temperature.unwrap_or(DEFAULT_TEMPERATURE),
        max_tokens: request.options.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        top_p: request.options.top_p.unwrap_or(DEFAULT_TOP_P),
        tools,
        tool_choice,
    }
}

/// Build the message turns for one exchange
///
/// Prior tool results become an assistant turn echoing the call ids followed
/// by one `role: "tool"` message per result, which is the turn structure the
/// chat completions API expects for tool output.
fn build_chat_messages(prompt: &str, tool_results: &[ToolResult]) -> Vec<ChatMessage> {
    let mut messages = vec![ChatMessage {
        role: "user".to_string(),
        content: Some(prompt.to_string()),
        tool_calls: None,
        tool_call_id: None,
    }];

    if tool_results.is_empty() {
        return messages;
    }

    let echoed_calls = tool_results
        .iter()
        .map(|result| ChatToolCall {
            id: result.correlation_key().to_string(),
            tool_type: "function".to_string(),
            function: ChatFunctionCall {
                name: result.tool_name.clone(),
                arguments: "{}".to_string(),
            },
        })
        .collect();

    messages.push(ChatMessage {
        role: "assistant".to_string(),
        content: None,
        tool_calls: Some(echoed_calls),
        tool_call_id: None,
    });

    for result in tool_results {
        messages.push(ChatMessage {
            role: "tool".to_string(),
            content: Some(tool_result_payload(result).to_string()),
            tool_calls: None,
            tool_call_id: Some(result.correlation_key().to_string()),
        });
    }

    messages
}

/// JSON payload reported back to the model for one tool result
pub(crate) fn tool_result_payload(result: &ToolResult) -> Value {
    if result.success {
        json!({"result": result.result, "success": true})
    } else {
        json!({"error": result.error, "success": false})
    }
}

/// Convert tool definitions to the chat completions shape
fn convert_tools(tools: &[ToolDefinition]) -> Vec<ChatTool> {
    tools
        .iter()
        .map(|tool| ChatTool {
            tool_type: "function".to_string(),
            function: ChatFunction {
                name: tool.name.clone(),
                description: tool.description.clone(),
                parameters: tool.parameters.clone(),
            },
        })
        .collect()
}

/// Map a non-success HTTP status to the provider error it represents
pub(crate) fn status_error(status: StatusCode, error_text: String, model: &str) -> ProviderError {
    match status.as_u16() {
        401 | 403 => ProviderError::AuthenticationFailed,
        429 => ProviderError::RateLimitExceeded(error_text),
        400 => ProviderError::InvalidRequest(error_text),
        404 => ProviderError::ModelNotFound(model.to_string()),
        _ => ProviderError::RequestFailed(format!("HTTP {status}: {error_text}")),
    }
}

/// Read a chat completions HTTP response, mapping error statuses
pub(crate) async fn read_chat_response(response: reqwest::Response, model: &str) -> Result<Value> {
    if !response.status().is_success() {
        let status = response.status();
        let error_text = response.text().await?;
        return Err(status_error(status, error_text, model));
    }

    Ok(response.json().await?)
}

/// Parse a raw chat completions body into the normalized response
pub(crate) fn parse_chat_response_body(raw: Value) -> Result<LLMResponse> {
    let response: ChatResponse = serde_json::from_value(raw)
        .map_err(|e| ProviderError::UnexpectedResponse(format!("Failed to parse response: {e}")))?;

    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::UnexpectedResponse("No choices in response".to_string()))?;

    let content = choice.message.content.filter(|text| !text.is_empty());

    let tool_calls = choice
        .message
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .map(|call| {
            ToolCall::with_call_id(
                call.function.name,
                parse_call_arguments(&call.function.arguments),
                call.id,
            )
        })
        .collect();

    Ok(LLMResponse {
        content,
        tool_calls,
    })
}

/// Decode a tool call's arguments JSON
///
/// One call's malformed arguments degrade to an error-marker object so the
/// rest of the batch still reaches the bridge.
fn parse_call_arguments(arguments: &str) -> Map<String, Value> {
    match serde_json::from_str::<Value>(arguments) {
        Ok(Value::Object(map)) => map,
        Ok(other) => {
            let mut map = Map::new();
            map.insert("value".to_string(), other);
            map
        }
        Err(e) => {
            debug!("Error parsing tool call arguments: {e}");
            let mut map = Map::new();
            map.insert("error".to_string(), json!("Invalid JSON in arguments"));
            map
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
