//! Google Gemini provider implementation
//!
//! Talks to the `generateContent` REST endpoint with function calling
//! enabled. See: https://ai.google.dev/api/generate-content
//!
//! Gemini differs from the chat-completions family in three ways this module
//! absorbs: requests are camelCase `contents` with typed parts, the API
//! returns no call ids (they are synthesized as `gemini-function-{idx}`),
//! and its schema subset rejects `default` values and `additionalProperties`
//! so tool parameters are sanitized before sending.
//!
//! # Examples
//!
//! ```no_run
//! use bridge_providers::{GenerateRequest, Provider};
//! use bridge_providers::providers::gemini::GeminiProvider;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Create provider from GEMINI_API_KEY environment variable
//!     let provider = GeminiProvider::from_env()?;
//!
//!     let response = provider.generate(GenerateRequest::new("Hello!")).await?;
//!     println!("{}", response.content.unwrap_or_default());
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use bridge_core::{LLMResponse, ToolCall, ToolDefinition, ToolResult};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::{debug, instrument};

use crate::adapter::{ProviderAdapter, ProviderCapabilities};
use crate::error::{ProviderError, Result};
use crate::provider::Provider;
use crate::request::{GenerateOptions, GenerateRequest};

use super::openai::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, DEFAULT_TOP_P, default_timeout_secs};

const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-pro";

fn default_api_base() -> String {
    DEFAULT_GEMINI_API_BASE.to_string()
}

fn default_model() -> String {
    DEFAULT_GEMINI_MODEL.to_string()
}

/// How the model is allowed to use the provided functions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FunctionCallingMode {
    /// The model decides whether to call a function
    #[default]
    Auto,
    /// The model must call one of the provided functions
    Any,
    /// Function calling is disabled
    None,
}

/// Configuration for the Gemini provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Google AI API key
    pub api_key: String,

    /// Model identifier (default: "gemini-2.0-pro")
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL for the Gemini API (default: v1beta endpoint)
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Function calling mode used when the request does not choose one
    #[serde(default)]
    pub function_calling_mode: FunctionCallingMode,

    /// Request timeout in seconds (default: 120)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl GeminiConfig {
    /// Create a new config with the given API key and default settings
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: default_model(),
            api_base: default_api_base(),
            function_calling_mode: FunctionCallingMode::default(),
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Create config from environment variables
    ///
    /// Reads the API key from `GEMINI_API_KEY`. Optionally reads the model
    /// from `GEMINI_MODEL` and the base URL from `GEMINI_API_BASE`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY").map_err(|_| {
            ProviderError::ConfigurationError(
                "GEMINI_API_KEY environment variable not set".to_string(),
            )
        })?;

        let model = std::env::var("GEMINI_MODEL").unwrap_or_else(|_| default_model());
        let api_base = std::env::var("GEMINI_API_BASE").unwrap_or_else(|_| default_api_base());

        Ok(Self {
            api_key,
            model,
            api_base,
            function_calling_mode: FunctionCallingMode::default(),
            timeout_secs: default_timeout_secs(),
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

    /// Set the default function calling mode
    pub fn with_function_calling_mode(mut self, mode: FunctionCallingMode) -> Self {
        self.function_calling_mode = mode;
        self
    }

    /// Set the request timeout in seconds
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// Google Gemini provider
pub struct GeminiProvider {
    client: Client,
    config: GeminiConfig,
}

impl GeminiProvider {
    /// Create a new Gemini provider with custom configuration
    pub fn with_config(config: GeminiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    /// Create a new Gemini provider with an API key and default settings
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(GeminiConfig::new(api_key))
    }

    /// Create a provider from environment variables
    pub fn from_env() -> Result<Self> {
        Self::with_config(GeminiConfig::from_env()?)
    }

    /// Get the current configuration
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    /// Endpoint URL for content generation. Carries the API key as a query
    /// parameter, so it must never be logged.
    fn request_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.config.api_base.trim_end_matches('/'),
            self.config.model,
            self.config.api_key
        )
    }

    /// Build the generateContent request body. Performs no I/O.
    pub(crate) fn build_request_body(&self, request: &GenerateRequest) -> Result<Value> {
        let tools = if request.tools.is_empty() {
            None
        } else {
            Some(vec![GeminiToolDeclarations {
                function_declarations: convert_tools(&request.tools),
            }])
        };

        let tool_config = tools.as_ref().map(|_| GeminiToolConfig {
            function_calling_config: GeminiFunctionCallingConfig {
                mode: resolve_mode(self.config.function_calling_mode, &request.options),
            },
        });

        let body = GeminiRequest {
            contents: build_gemini_contents(&request.prompt, &request.tool_results),
            tools,
            tool_config,
            generation_config: GeminiGenerationConfig {
                temperature: request.options.temperature.unwrap_or(DEFAULT_TEMPERATURE),
                max_output_tokens: request.options.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
                top_p: request.options.top_p.unwrap_or(DEFAULT_TOP_P),
            },
        };

        Ok(serde_json::to_value(body)?)
    }

    /// Execute a prepared request body against the endpoint
    pub(crate) async fn post_generate(&self, body: &Value) -> Result<Value> {
        let response = self
            .client
            .post(self.request_url())
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            return Err(super::openai::status_error(
                status,
                error_text,
                &self.config.model,
            ));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl Provider for GeminiProvider {
    #[instrument(skip(self, request), fields(model = %self.config.model))]
    async fn generate(&self, request: GenerateRequest) -> Result<LLMResponse> {
        debug!("Sending request to Gemini API");

        let body = self.build_request_body(&request)?;
        let raw = self.post_generate(&body).await?;
        parse_gemini_response_body(raw)
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

/// Adapter exposing the Gemini provider through the three-phase contract
pub struct GeminiAdapter {
    provider: GeminiProvider,
}

impl GeminiAdapter {
    /// Wrap an existing provider
    pub fn new(provider: GeminiProvider) -> Self {
        Self { provider }
    }

    /// Build the provider from config, then wrap it
    pub fn from_config(config: GeminiConfig) -> Result<Self> {
        Ok(Self::new(GeminiProvider::with_config(config)?))
    }
}

#[async_trait]
impl ProviderAdapter for GeminiAdapter {
    fn prepare_request(&self, request: &GenerateRequest) -> Result<Value> {
        self.provider.build_request_body(request)
    }

    async fn execute_request(&self, prepared: Value) -> Result<Value> {
        self.provider.post_generate(&prepared).await
    }

    fn parse_response(&self, raw: Value) -> Result<LLMResponse> {
        parse_gemini_response_body(raw)
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            supports_tool_calling: true,
            supports_multiple_tools: true,
            supports_streaming: false,
            supports_vision: true,
            max_tokens_limit: Some(32768),
        }
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

// ============================================================================
// generateContent wire types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<GeminiToolDeclarations>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_config: Option<GeminiToolConfig>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    role: String,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

/// One content part. Exactly one field is set per part; unknown part kinds
/// deserialize with all fields empty and are skipped.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    function_call: Option<GeminiFunctionCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    function_response: Option<GeminiFunctionResponse>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiFunctionCall {
    name: String,
    #[serde(default)]
    args: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiFunctionResponse {
    name: String,
    response: Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiToolDeclarations {
    function_declarations: Vec<GeminiFunctionDeclaration>,
}

#[derive(Debug, Serialize)]
struct GeminiFunctionDeclaration {
    name: String,
    description: String,
    parameters: Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiToolConfig {
    function_calling_config: GeminiFunctionCallingConfig,
}

#[derive(Debug, Serialize)]
struct GeminiFunctionCallingConfig {
    mode: FunctionCallingMode,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    temperature: f32,
    max_output_tokens: usize,
    top_p: f32,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

// ============================================================================
// Conversion functions
// ============================================================================

/// Map the request's tool_choice onto a function calling mode
///
/// `"auto"`, `"required"` and `"none"` are the neutral spellings shared with
/// the chat-completions family. An unrecognized value falls back to the
/// configured default.
fn resolve_mode(default_mode: FunctionCallingMode, options: &GenerateOptions) -> FunctionCallingMode {
    match options.tool_choice.as_deref() {
        Some("auto") => FunctionCallingMode::Auto,
        Some("required") | Some("any") => FunctionCallingMode::Any,
        Some("none") => FunctionCallingMode::None,
        Some(other) => {
            debug!("Unrecognized tool_choice {other:?}, using configured mode");
            default_mode
        }
        None => default_mode,
    }
}

/// Build the conversation turns for one exchange
///
/// Prior tool results are replayed as a model turn issuing the function call
/// followed by a user turn carrying the function response, which is the turn
/// structure Gemini expects for function output.
fn build_gemini_contents(prompt: &str, tool_results: &[ToolResult]) -> Vec<GeminiContent> {
    let mut contents = vec![GeminiContent {
        role: "user".to_string(),
        parts: vec![GeminiPart {
            text: Some(prompt.to_string()),
            ..GeminiPart::default()
        }],
    }];

    for result in tool_results {
        contents.push(GeminiContent {
            role: "model".to_string(),
            parts: vec![GeminiPart {
                function_call: Some(GeminiFunctionCall {
                    name: result.tool_name.clone(),
                    args: Some(json!({})),
                }),
                ..GeminiPart::default()
            }],
        });

        contents.push(GeminiContent {
            role: "user".to_string(),
            parts: vec![GeminiPart {
                function_response: Some(GeminiFunctionResponse {
                    name: result.tool_name.clone(),
                    response: function_response_payload(result),
                }),
                ..GeminiPart::default()
            }],
        });
    }

    contents
}

/// Payload reported back to the model for one tool result
///
/// The response field must be a JSON object, so scalar results are wrapped
/// in a `result` key.
fn function_response_payload(result: &ToolResult) -> Value {
    if !result.success {
        return json!({"error": result.error});
    }

    match &result.result {
        Some(value @ (Value::Object(_) | Value::Array(_))) => value.clone(),
        Some(value) => json!({"result": value}),
        None => json!({"result": Value::Null}),
    }
}

/// Convert tool definitions to Gemini function declarations
fn convert_tools(tools: &[ToolDefinition]) -> Vec<GeminiFunctionDeclaration> {
    tools
        .iter()
        .map(|tool| GeminiFunctionDeclaration {
            name: tool.name.clone(),
            description: tool.description.clone(),
            parameters: sanitize_parameters(&tool.parameters),
        })
        .collect()
}

/// Strip schema keys Gemini's schema subset rejects
///
/// Removes `additionalProperties` at the object level and `default` from
/// each property.
fn sanitize_parameters(parameters: &Value) -> Value {
    let mut sanitized = parameters.clone();

    if let Some(object) = sanitized.as_object_mut() {
        object.remove("additionalProperties");

        if let Some(properties) = object.get_mut("properties").and_then(Value::as_object_mut) {
            for property in properties.values_mut() {
                if let Some(property) = property.as_object_mut() {
                    property.remove("default");
                }
            }
        }
    }

    sanitized
}

/// Parse a raw generateContent body into the normalized response
///
/// Gemini returns no call ids, so ids are synthesized as
/// `gemini-function-{idx}` from each call's position in the response.
pub(crate) fn parse_gemini_response_body(raw: Value) -> Result<LLMResponse> {
    let response: GeminiResponse = serde_json::from_value(raw)
        .map_err(|e| ProviderError::UnexpectedResponse(format!("Failed to parse response: {e}")))?;

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::UnexpectedResponse("No candidates in response".to_string()))?;

    let parts = candidate.content.map(|content| content.parts).unwrap_or_default();

    let mut text = String::new();
    let mut tool_calls = Vec::new();

    for part in parts {
        if let Some(part_text) = part.text {
            text.push_str(&part_text);
        }

        if let Some(call) = part.function_call {
            let call_id = format!("gemini-function-{}", tool_calls.len());
            tool_calls.push(ToolCall::with_call_id(
                call.name,
                function_call_arguments(call.args),
                call_id,
            ));
        }
    }

    Ok(LLMResponse {
        content: (!text.is_empty()).then_some(text),
        tool_calls,
    })
}

/// Normalize a function call's args into an argument map
fn function_call_arguments(args: Option<Value>) -> Map<String, Value> {
    match args {
        Some(Value::Object(map)) => map,
        Some(Value::Null) | None => Map::new(),
        Some(other) => {
            let mut map = Map::new();
            map.insert("value".to_string(), other);
            map
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_core::definition::schema;

    fn sample_tool() -> ToolDefinition {
        ToolDefinition::new(
            "weather",
            "Get the current weather",
            schema::object(
                json!({
                    "location": schema::string("City name"),
                    "unit": {
                        "type": "string",
                        "description": "Temperature unit",
                        "enum": ["celsius", "fahrenheit"],
                        "default": "celsius",
                    },
                }),
                vec!["location"],
            ),
        )
    }

    #[test]
    fn test_provider_creation() {
        let provider = GeminiProvider::new("test-key").unwrap();
        assert_eq!(provider.name(), "gemini");
        assert_eq!(provider.config().model, "gemini-2.0-pro");
        assert_eq!(
            provider.config().api_base,
            "https://generativelanguage.googleapis.com/v1beta"
        );
        assert_eq!(
            provider.request_url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-pro:generateContent?key=test-key"
        );
    }

    #[test]
    fn test_config_builders() {
        let config = GeminiConfig::new("test-key")
            .with_model("gemini-2.0-flash")
            .with_api_base("http://localhost:9000/v1beta")
            .with_function_calling_mode(FunctionCallingMode::Any)
            .with_timeout(30);

        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.api_base, "http://localhost:9000/v1beta");
        assert_eq!(config.function_calling_mode, FunctionCallingMode::Any);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_config_from_env() {
        unsafe {
            std::env::set_var("GEMINI_API_KEY", "gemini-env-key");
            std::env::set_var("GEMINI_MODEL", "gemini-2.0-flash");
        }

        let config = GeminiConfig::from_env().unwrap();
        assert_eq!(config.api_key, "gemini-env-key");
        assert_eq!(config.model, "gemini-2.0-flash");

        unsafe {
            std::env::remove_var("GEMINI_API_KEY");
            std::env::remove_var("GEMINI_MODEL");
        }
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: GeminiConfig =
            serde_json::from_value(json!({"api_key": "test-key"})).unwrap();
        assert_eq!(config.model, "gemini-2.0-pro");
        assert_eq!(config.function_calling_mode, FunctionCallingMode::Auto);
        assert_eq!(config.timeout_secs, 120);
    }

    #[test]
    fn test_request_body_without_tools() {
        let provider = GeminiProvider::new("test-key").unwrap();
        let body = provider
            .build_request_body(&GenerateRequest::new("Hello"))
            .unwrap();

        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Hello");
        assert!(body.get("tools").is_none());
        assert!(body.get("toolConfig").is_none());
        assert_eq!(
            body["generationConfig"]["temperature"],
            json!(DEFAULT_TEMPERATURE)
        );
        assert_eq!(
            body["generationConfig"]["maxOutputTokens"],
            json!(DEFAULT_MAX_TOKENS)
        );
        assert_eq!(body["generationConfig"]["topP"], json!(DEFAULT_TOP_P));
    }

    #[test]
    fn test_request_body_with_tools() {
        let provider = GeminiProvider::new("test-key").unwrap();
        let request = GenerateRequest::builder("What's the weather in Paris?")
            .add_tool(sample_tool())
            .build();
        let body = provider.build_request_body(&request).unwrap();

        let declaration = &body["tools"][0]["functionDeclarations"][0];
        assert_eq!(declaration["name"], "weather");
        assert_eq!(
            body["toolConfig"]["functionCallingConfig"]["mode"],
            "AUTO"
        );
    }

    #[test]
    fn test_request_body_sanitizes_schema() {
        let provider = GeminiProvider::new("test-key").unwrap();
        let request = GenerateRequest::builder("hi").add_tool(sample_tool()).build();
        let body = provider.build_request_body(&request).unwrap();

        let parameters = &body["tools"][0]["functionDeclarations"][0]["parameters"];
        assert!(parameters.get("additionalProperties").is_none());
        assert!(parameters["properties"]["unit"].get("default").is_none());
        assert_eq!(parameters["required"][0], "location");
    }

    #[test]
    fn test_tool_choice_maps_to_mode() {
        let provider = GeminiProvider::new("test-key").unwrap();

        let request = GenerateRequest::builder("hi")
            .add_tool(sample_tool())
            .tool_choice("required")
            .build();
        let body = provider.build_request_body(&request).unwrap();
        assert_eq!(body["toolConfig"]["functionCallingConfig"]["mode"], "ANY");

        let request = GenerateRequest::builder("hi")
            .add_tool(sample_tool())
            .tool_choice("none")
            .build();
        let body = provider.build_request_body(&request).unwrap();
        assert_eq!(body["toolConfig"]["functionCallingConfig"]["mode"], "NONE");
    }

    #[test]
    fn test_request_body_carries_tool_results() {
        let provider = GeminiProvider::new("test-key").unwrap();
        let request = GenerateRequest::builder("prompt")
            .add_tool_result(ToolResult::success(
                "weather",
                Some("gemini-function-0".to_string()),
                json!(21.5),
            ))
            .add_tool_result(ToolResult::failure(
                "ghost",
                Some("gemini-function-1".to_string()),
                "Tool 'ghost' not found",
            ))
            .build();
        let body = provider.build_request_body(&request).unwrap();
        let contents = body["contents"].as_array().unwrap();

        // user prompt, then a model call and user response per result
        assert_eq!(contents.len(), 5);
        assert_eq!(contents[1]["role"], "model");
        assert_eq!(
            contents[1]["parts"][0]["functionCall"]["name"],
            "weather"
        );
        assert_eq!(contents[2]["role"], "user");
        assert_eq!(
            contents[2]["parts"][0]["functionResponse"]["response"]["result"],
            json!(21.5)
        );
        assert!(
            contents[4]["parts"][0]["functionResponse"]["response"]["error"]
                .as_str()
                .unwrap()
                .contains("ghost")
        );
    }

    #[test]
    fn test_parse_text_response() {
        let raw = json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "It is sunny."}]}
            }]
        });
        let response = parse_gemini_response_body(raw).unwrap();
        assert_eq!(response.content.as_deref(), Some("It is sunny."));
        assert!(!response.has_tool_calls());
    }

    #[test]
    fn test_parse_response_with_function_calls() {
        let raw = json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        {"functionCall": {"name": "weather", "args": {"location": "Paris"}}},
                        {"functionCall": {"name": "weather", "args": {"location": "Lyon"}}}
                    ]
                }
            }]
        });
        let response = parse_gemini_response_body(raw).unwrap();

        assert_eq!(response.tool_calls.len(), 2);
        assert_eq!(response.tool_calls[0].tool_name, "weather");
        assert_eq!(
            response.tool_calls[0].call_id.as_deref(),
            Some("gemini-function-0")
        );
        assert_eq!(
            response.tool_calls[1].call_id.as_deref(),
            Some("gemini-function-1")
        );
        assert_eq!(response.tool_calls[0].arguments["location"], "Paris");
    }

    #[test]
    fn test_parse_mixed_text_and_call() {
        let raw = json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        {"text": "Checking the weather."},
                        {"functionCall": {"name": "weather", "args": {"location": "Paris"}}}
                    ]
                }
            }]
        });
        let response = parse_gemini_response_body(raw).unwrap();
        assert_eq!(response.content.as_deref(), Some("Checking the weather."));
        assert_eq!(response.tool_calls.len(), 1);
    }

    #[test]
    fn test_parse_rejects_empty_candidates() {
        let err = parse_gemini_response_body(json!({"candidates": []})).unwrap_err();
        assert!(matches!(err, ProviderError::UnexpectedResponse(_)));
    }

    #[test]
    fn test_adapter_capabilities() {
        let adapter = GeminiAdapter::from_config(GeminiConfig::new("test-key")).unwrap();
        let caps = adapter.capabilities();
        assert!(caps.supports_tool_calling);
        assert!(caps.supports_multiple_tools);
        assert!(!caps.supports_streaming);
        assert_eq!(caps.max_tokens_limit, Some(32768));
        assert_eq!(adapter.name(), "gemini");
    }
}
