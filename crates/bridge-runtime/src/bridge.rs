//! Tool bridge orchestrating the prompt and tool-call exchange loop
//!
//! The ToolBridge holds a provider backend and a registry of tools, and runs
//! the resolution loop:
//! 1. Call the provider with the prompt, tool schemas and accumulated results
//! 2. If the response contains no tool calls, return it
//! 3. Invoke the requested tools and collect their results
//! 4. Loop back with the results until the model answers in text or the
//!    tool-call bound is reached

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use bridge_core::{LLMResponse, ToolCall, ToolDefinition, ToolResult};
use bridge_providers::{GenerateOptions, GenerateRequest, Provider, ProviderAdapter};
use bridge_tools::Tool;
use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::error::{BridgeError, Result};

/// Default bound on tool calls resolved within one exchange
pub const DEFAULT_MAX_TOOL_CALLS: usize = 10;

/// A tool argument to `execute`: an owned tool or the name of a registered one
#[derive(Debug, Clone)]
pub enum ToolRef {
    /// A tool supplied for this exchange only
    Tool(Tool),
    /// The name of a tool registered on the bridge
    Name(String),
}

impl From<Tool> for ToolRef {
    fn from(tool: Tool) -> Self {
        Self::Tool(tool)
    }
}

impl From<String> for ToolRef {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<&str> for ToolRef {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

/// Lets an adapter stand in wherever a provider is expected
struct AdapterBackend {
    adapter: Arc<dyn ProviderAdapter>,
}

#[async_trait]
impl Provider for AdapterBackend {
    async fn generate(&self, request: GenerateRequest) -> bridge_providers::Result<LLMResponse> {
        self.adapter.generate(request).await
    }

    fn name(&self) -> &str {
        self.adapter.name()
    }
}

/// Orchestrates tool-augmented exchanges against one provider backend
///
/// Tools are registered once and offered to the model on every round. The
/// bridge resolves the model's tool calls, feeds the results back, and
/// returns the first response that carries no further calls.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use bridge_runtime::ToolBridge;
/// use bridge_tools::{ParameterDefinition, ParameterType, Tool};
/// use bridge_providers::providers::openai::OpenAIProvider;
/// use serde_json::json;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let provider = Arc::new(OpenAIProvider::from_env()?);
/// let mut bridge = ToolBridge::new(provider);
///
/// let echo = Tool::new("echo", "Echo the input back")
///     .with_parameter(
///         "text",
///         ParameterDefinition::new(ParameterType::String, "Text to echo"),
///     )
///     .with_handler(|args| async move { Ok(json!(args["text"])) });
/// bridge.register_tool(echo)?;
///
/// let response = bridge.execute("Echo 'hello' back to me", vec![]).await?;
/// println!("{}", response.content.unwrap_or_default());
/// # Ok(())
/// # }
/// ```
pub struct ToolBridge {
    provider: Arc<dyn Provider>,
    tools: BTreeMap<String, Tool>,
    max_tool_calls: usize,
}

impl ToolBridge {
    /// Create a bridge over a provider backend
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self {
            provider,
            tools: BTreeMap::new(),
            max_tool_calls: DEFAULT_MAX_TOOL_CALLS,
        }
    }

    /// Create a bridge over an adapter backend
    pub fn with_adapter(adapter: Arc<dyn ProviderAdapter>) -> Self {
        Self::new(Arc::new(AdapterBackend { adapter }))
    }

    /// Set the bound on tool calls resolved within one exchange
    pub fn with_max_tool_calls(mut self, max_tool_calls: usize) -> Self {
        self.max_tool_calls = max_tool_calls;
        self
    }

    /// Name of the underlying provider
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Register a tool on the bridge
    ///
    /// # Errors
    ///
    /// Returns `DuplicateTool` if a tool with the same name is already
    /// registered.
    pub fn register_tool(&mut self, tool: Tool) -> Result<()> {
        if self.tools.contains_key(&tool.name) {
            return Err(BridgeError::DuplicateTool(tool.name.clone()));
        }

        debug!(tool_name = %tool.name, "Registered tool");
        self.tools.insert(tool.name.clone(), tool);
        Ok(())
    }

    /// Register a batch of tools
    ///
    /// The batch is checked as a whole before anything is inserted: a
    /// duplicate against the registry or within the batch registers nothing.
    pub fn register_tools(&mut self, tools: Vec<Tool>) -> Result<()> {
        let mut batch_names = std::collections::BTreeSet::new();
        for tool in &tools {
            if self.tools.contains_key(&tool.name) || !batch_names.insert(tool.name.clone()) {
                return Err(BridgeError::DuplicateTool(tool.name.clone()));
            }
        }

        for tool in tools {
            debug!(tool_name = %tool.name, "Registered tool");
            self.tools.insert(tool.name.clone(), tool);
        }
        Ok(())
    }

    /// Look up a registered tool by name
    ///
    /// # Errors
    ///
    /// Returns `ToolNotFound` for unknown names.
    pub fn get_tool(&self, name: &str) -> Result<&Tool> {
        self.tools
            .get(name)
            .ok_or_else(|| BridgeError::ToolNotFound(name.to_string()))
    }

    /// Names of all registered tools, in sorted order
    pub fn tool_names(&self) -> Vec<String> {
        self.tools.keys().cloned().collect()
    }

    /// Run one exchange to completion with default generation options
    ///
    /// An empty `tools` list offers all registered tools.
    pub async fn execute(
        &self,
        prompt: impl Into<String>,
        tools: Vec<ToolRef>,
    ) -> Result<LLMResponse> {
        self.execute_with_options(prompt, tools, GenerateOptions::default())
            .await
    }

    /// Run one exchange to completion
    ///
    /// Implements the resolution loop: each round sends the prompt, the tool
    /// schemas and all results accumulated so far, then resolves the calls
    /// the model issued. Terminates when a response carries no tool calls or
    /// when resolving the next batch would exceed `max_tool_calls`; in the
    /// latter case the response is returned with its calls unresolved.
    ///
    /// # Errors
    ///
    /// A name in `tools` that matches no registered tool fails with
    /// `ToolNotFound` before any provider call. Provider transport errors
    /// abort the exchange. A single tool's invocation failure does not: it
    /// is captured into that call's `ToolResult` and the loop continues.
    pub async fn execute_with_options(
        &self,
        prompt: impl Into<String>,
        tools: Vec<ToolRef>,
        options: GenerateOptions,
    ) -> Result<LLMResponse> {
        let prompt = prompt.into();
        let resolved = self.resolve_tools(&tools)?;
        let definitions: Vec<ToolDefinition> =
            resolved.iter().map(|tool| tool.definition()).collect();
        let lookup: HashMap<&str, &Tool> = resolved
            .iter()
            .map(|tool| (tool.name.as_str(), *tool))
            .collect();

        let mut tool_results: Vec<ToolResult> = Vec::new();
        let mut call_count = 0usize;
        let mut iteration = 0usize;

        loop {
            iteration += 1;
            info!(
                provider = %self.provider.name(),
                iteration = iteration,
                tool_count = definitions.len(),
                result_count = tool_results.len(),
                "Sending request to provider"
            );

            let request = GenerateRequest {
                prompt: prompt.clone(),
                tools: definitions.clone(),
                tool_results: tool_results.clone(),
                options: options.clone(),
            };
            let response = self.provider.generate(request).await?;

            if response.tool_calls.is_empty() {
                info!(iteration = iteration, "Exchange completed");
                return Ok(response);
            }

            let batch_size = response.tool_calls.len();
            if call_count + batch_size > self.max_tool_calls {
                warn!(
                    max_tool_calls = self.max_tool_calls,
                    resolved = call_count,
                    requested = batch_size,
                    "Tool call limit reached, returning response with unresolved calls"
                );
                return Ok(response);
            }

            info!(tool_count = batch_size, "Resolving tool call batch");
            let batch_results = resolve_batch(&lookup, &response.tool_calls).await;

            call_count += batch_size;
            tool_results.extend(batch_results);
        }
    }

    /// Blocking variant of [`execute`](Self::execute)
    ///
    /// Runs the exchange on a private current-thread runtime. Must not be
    /// called from within an async runtime.
    pub fn execute_sync(
        &self,
        prompt: impl Into<String>,
        tools: Vec<ToolRef>,
    ) -> Result<LLMResponse> {
        self.execute_sync_with_options(prompt, tools, GenerateOptions::default())
    }

    /// Blocking variant of [`execute_with_options`](Self::execute_with_options)
    pub fn execute_sync_with_options(
        &self,
        prompt: impl Into<String>,
        tools: Vec<ToolRef>,
        options: GenerateOptions,
    ) -> Result<LLMResponse> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| BridgeError::Runtime(e.to_string()))?;

        runtime.block_on(self.execute_with_options(prompt, tools, options))
    }

    /// Resolve tool references for one exchange
    ///
    /// An empty list selects all registered tools. Name references must
    /// match a registered tool; supplied `Tool` values are used as-is.
    fn resolve_tools<'a>(&'a self, refs: &'a [ToolRef]) -> Result<Vec<&'a Tool>> {
        if refs.is_empty() {
            return Ok(self.tools.values().collect());
        }

        refs.iter()
            .map(|tool_ref| match tool_ref {
                ToolRef::Tool(tool) => Ok(tool),
                ToolRef::Name(name) => self.get_tool(name),
            })
            .collect()
    }
}

/// Resolve one batch of tool calls into results
///
/// Calls run concurrently and the results come back in call order. An
/// unknown tool name or a failing handler yields a `success = false` result
/// for that call; it never aborts the siblings.
async fn resolve_batch(
    lookup: &HashMap<&str, &Tool>,
    calls: &[ToolCall],
) -> Vec<ToolResult> {
    let invocations = calls.iter().map(|call| async move {
        let Some(tool) = lookup.get(call.tool_name.as_str()) else {
            warn!(tool_name = %call.tool_name, "Model requested unknown tool");
            return ToolResult::failure(
                &call.tool_name,
                call.call_id.clone(),
                format!("Tool '{}' not found", call.tool_name),
            );
        };

        let started = Instant::now();
        let outcome = tool.invoke(call.arguments.clone()).await;
        let duration_ms = started.elapsed().as_millis() as u64;

        match &outcome {
            Ok(value) => {
                let preview: String = value.to_string().chars().take(200).collect();
                debug!(
                    tool_name = %call.tool_name,
                    duration_ms = duration_ms,
                    result_preview = %preview,
                    "Tool invocation succeeded"
                );
            }
            Err(e) => {
                warn!(
                    tool_name = %call.tool_name,
                    duration_ms = duration_ms,
                    error = %e,
                    "Tool invocation failed"
                );
            }
        }

        ToolResult::for_call(call, outcome.map_err(|e| e.to_string()))
    });

    join_all(invocations).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_tools::{ParameterDefinition, ParameterType, ToolError};
    use mockall::mock;
    use serde_json::{Value, json};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    mock! {
        ScriptedProvider {}

        #[async_trait]
        impl Provider for ScriptedProvider {
            async fn generate(
                &self,
                request: GenerateRequest,
            ) -> bridge_providers::Result<LLMResponse>;
            fn name(&self) -> &str;
        }
    }

    /// Provider that replays scripted responses and records each request
    fn scripted(
        responses: Vec<LLMResponse>,
    ) -> (MockScriptedProvider, Arc<Mutex<Vec<GenerateRequest>>>) {
        let mut provider = MockScriptedProvider::new();
        let requests: Arc<Mutex<Vec<GenerateRequest>>> = Arc::new(Mutex::new(Vec::new()));

        let log = requests.clone();
        let queue = Mutex::new(VecDeque::from(responses));
        provider.expect_generate().returning(move |request| {
            log.lock().unwrap().push(request);
            let response = queue
                .lock()
                .unwrap()
                .pop_front()
                .expect("provider called more times than scripted");
            Ok(response)
        });
        provider.expect_name().return_const("scripted".to_string());

        (provider, requests)
    }

    fn calculator() -> Tool {
        Tool::new("calculator", "Perform basic arithmetic")
            .with_parameter(
                "operation",
                ParameterDefinition::new(ParameterType::String, "Operation to perform")
                    .with_enum_values(vec!["add", "subtract", "multiply", "divide"]),
            )
            .with_parameter(
                "x",
                ParameterDefinition::new(ParameterType::Number, "First operand"),
            )
            .with_parameter(
                "y",
                ParameterDefinition::new(ParameterType::Number, "Second operand"),
            )
            .with_handler(|args| async move {
                let x = args["x"].as_f64().unwrap_or_default();
                let y = args["y"].as_f64().unwrap_or_default();
                match args["operation"].as_str().unwrap_or_default() {
                    "add" => Ok(json!(x + y)),
                    "subtract" => Ok(json!(x - y)),
                    "multiply" => Ok(json!(x * y)),
                    "divide" => {
                        if y == 0.0 {
                            Err(ToolError::ExecutionFailed("division by zero".to_string()))
                        } else {
                            Ok(json!(x / y))
                        }
                    }
                    other => Err(ToolError::ExecutionFailed(format!(
                        "unknown operation: {other}"
                    ))),
                }
            })
    }

    fn call(name: &str, arguments: Value, call_id: &str) -> ToolCall {
        let Value::Object(arguments) = arguments else {
            panic!("arguments must be an object");
        };
        ToolCall::with_call_id(name, arguments, call_id)
    }

    #[tokio::test]
    async fn test_text_response_returned_after_one_call() {
        let (provider, requests) = scripted(vec![LLMResponse::from_text("Hello there")]);
        let mut bridge = ToolBridge::new(Arc::new(provider));
        bridge.register_tool(calculator()).unwrap();

        let response = bridge.execute("Say hello", vec![]).await.unwrap();

        assert_eq!(response.content.as_deref(), Some("Hello there"));
        assert!(!response.has_tool_calls());

        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].prompt, "Say hello");
        assert_eq!(requests[0].tools.len(), 1);
        assert_eq!(requests[0].tools[0].name, "calculator");
        assert!(requests[0].tool_results.is_empty());
    }

    #[tokio::test]
    async fn test_tool_calls_resolved_and_fed_back() {
        let (provider, requests) = scripted(vec![
            LLMResponse::with_tool_calls(
                None,
                vec![call(
                    "calculator",
                    json!({"operation": "multiply", "x": 5, "y": 3}),
                    "call_1",
                )],
            ),
            LLMResponse::from_text("The answer is 15."),
        ]);
        let mut bridge = ToolBridge::new(Arc::new(provider));
        bridge.register_tool(calculator()).unwrap();

        let response = bridge.execute("What is 5 times 3?", vec![]).await.unwrap();
        assert_eq!(response.content.as_deref(), Some("The answer is 15."));

        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 2);

        let follow_up = &requests[1];
        assert_eq!(follow_up.tool_results.len(), 1);
        let result = &follow_up.tool_results[0];
        assert!(result.success);
        assert_eq!(result.result, Some(json!(15.0)));
        assert_eq!(result.call_id.as_deref(), Some("call_1"));
        // tools stay on offer in follow-up rounds
        assert_eq!(follow_up.tools.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_tool_yields_failed_result_without_aborting() {
        let (provider, requests) = scripted(vec![
            LLMResponse::with_tool_calls(
                None,
                vec![
                    call(
                        "calculator",
                        json!({"operation": "add", "x": 2, "y": 2}),
                        "call_1",
                    ),
                    call("ghost", json!({}), "call_2"),
                ],
            ),
            LLMResponse::from_text("Done"),
        ]);
        let mut bridge = ToolBridge::new(Arc::new(provider));
        bridge.register_tool(calculator()).unwrap();

        let response = bridge.execute("Add and haunt", vec![]).await.unwrap();
        assert_eq!(response.content.as_deref(), Some("Done"));

        let requests = requests.lock().unwrap();
        let follow_up = &requests[1];
        assert_eq!(follow_up.tool_results.len(), 2);

        assert!(follow_up.tool_results[0].success);
        assert_eq!(follow_up.tool_results[0].result, Some(json!(4.0)));

        let ghost = &follow_up.tool_results[1];
        assert!(!ghost.success);
        assert_eq!(ghost.call_id.as_deref(), Some("call_2"));
        assert!(ghost.error.as_deref().unwrap().contains("ghost"));
    }

    #[tokio::test]
    async fn test_handler_failure_captured_into_result() {
        let (provider, requests) = scripted(vec![
            LLMResponse::with_tool_calls(
                None,
                vec![call(
                    "calculator",
                    json!({"operation": "divide", "x": 1, "y": 0}),
                    "call_1",
                )],
            ),
            LLMResponse::from_text("Cannot divide by zero"),
        ]);
        let mut bridge = ToolBridge::new(Arc::new(provider));
        bridge.register_tool(calculator()).unwrap();

        let response = bridge.execute("Divide 1 by 0", vec![]).await.unwrap();
        assert_eq!(response.content.as_deref(), Some("Cannot divide by zero"));

        let requests = requests.lock().unwrap();
        let result = &requests[1].tool_results[0];
        assert!(!result.success);
        assert!(result.error.as_deref().unwrap().contains("division by zero"));
    }

    #[tokio::test]
    async fn test_limit_returns_response_with_unresolved_calls() {
        let two_calls = || {
            LLMResponse::with_tool_calls(
                None,
                vec![
                    call(
                        "calculator",
                        json!({"operation": "add", "x": 1, "y": 1}),
                        "call_a",
                    ),
                    call(
                        "calculator",
                        json!({"operation": "add", "x": 2, "y": 2}),
                        "call_b",
                    ),
                ],
            )
        };
        let (provider, requests) = scripted(vec![two_calls(), two_calls()]);
        let mut bridge = ToolBridge::new(Arc::new(provider)).with_max_tool_calls(3);
        bridge.register_tool(calculator()).unwrap();

        // First batch of two resolves; the second would exceed the bound of
        // three, so the loop stops and hands back that response unresolved.
        let response = bridge.execute("Keep adding", vec![]).await.unwrap();

        assert_eq!(response.tool_calls.len(), 2);
        assert_eq!(requests.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_register_duplicate_tool_fails() {
        let (provider, _) = scripted(vec![]);
        let mut bridge = ToolBridge::new(Arc::new(provider));

        bridge.register_tool(calculator()).unwrap();
        let err = bridge.register_tool(calculator()).unwrap_err();

        assert!(matches!(err, BridgeError::DuplicateTool(name) if name == "calculator"));
        assert_eq!(bridge.tool_names(), vec!["calculator"]);
    }

    #[test]
    fn test_register_tools_is_atomic() {
        let (provider, _) = scripted(vec![]);
        let mut bridge = ToolBridge::new(Arc::new(provider));

        let err = bridge
            .register_tools(vec![
                Tool::new("alpha", "First"),
                Tool::new("beta", "Second"),
                Tool::new("alpha", "Duplicate"),
            ])
            .unwrap_err();

        assert!(matches!(err, BridgeError::DuplicateTool(name) if name == "alpha"));
        assert!(bridge.tool_names().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_tool_name_fails_before_provider_call() {
        let mut provider = MockScriptedProvider::new();
        provider.expect_generate().never();
        provider.expect_name().return_const("scripted".to_string());

        let bridge = ToolBridge::new(Arc::new(provider));
        let err = bridge
            .execute("hi", vec![ToolRef::from("missing")])
            .await
            .unwrap_err();

        assert!(matches!(err, BridgeError::ToolNotFound(name) if name == "missing"));
    }

    #[tokio::test]
    async fn test_supplied_tool_used_without_registration() {
        let (provider, requests) = scripted(vec![
            LLMResponse::with_tool_calls(
                None,
                vec![call("echo", json!({"text": "hi"}), "call_1")],
            ),
            LLMResponse::from_text("echoed"),
        ]);
        let bridge = ToolBridge::new(Arc::new(provider));

        let echo = Tool::new("echo", "Echo the input back")
            .with_parameter(
                "text",
                ParameterDefinition::new(ParameterType::String, "Text to echo"),
            )
            .with_handler(|args| async move { Ok(args["text"].clone()) });

        let response = bridge
            .execute("Echo hi", vec![ToolRef::from(echo)])
            .await
            .unwrap();
        assert_eq!(response.content.as_deref(), Some("echoed"));

        let requests = requests.lock().unwrap();
        assert_eq!(requests[0].tools[0].name, "echo");
        let result = &requests[1].tool_results[0];
        assert!(result.success);
        assert_eq!(result.result, Some(json!("hi")));
    }

    #[tokio::test]
    async fn test_name_ref_selects_registered_tool() {
        let (provider, requests) = scripted(vec![LLMResponse::from_text("ok")]);
        let mut bridge = ToolBridge::new(Arc::new(provider));
        bridge
            .register_tools(vec![calculator(), Tool::new("weather", "Current weather")])
            .unwrap();

        bridge
            .execute("Just the calculator", vec!["calculator".into()])
            .await
            .unwrap();

        let requests = requests.lock().unwrap();
        assert_eq!(requests[0].tools.len(), 1);
        assert_eq!(requests[0].tools[0].name, "calculator");
    }

    #[tokio::test]
    async fn test_options_reach_the_provider() {
        let (provider, requests) = scripted(vec![LLMResponse::from_text("ok")]);
        let bridge = ToolBridge::new(Arc::new(provider));

        let options = GenerateOptions {
            temperature: Some(0.2),
            max_tokens: Some(64),
            ..GenerateOptions::default()
        };
        bridge
            .execute_with_options("hi", vec![], options)
            .await
            .unwrap();

        let requests = requests.lock().unwrap();
        assert_eq!(requests[0].options.temperature, Some(0.2));
        assert_eq!(requests[0].options.max_tokens, Some(64));
    }

    #[test]
    fn test_execute_sync_returns_response_unchanged() {
        let (provider, requests) = scripted(vec![LLMResponse::from_text("sync answer")]);
        let bridge = ToolBridge::new(Arc::new(provider));

        let response = bridge.execute_sync("hi", vec![]).unwrap();

        assert_eq!(response.content.as_deref(), Some("sync answer"));
        assert!(response.tool_calls.is_empty());
        assert_eq!(requests.lock().unwrap().len(), 1);
    }

    mock! {
        PhasedAdapter {}

        #[async_trait]
        impl ProviderAdapter for PhasedAdapter {
            fn prepare_request(
                &self,
                request: &GenerateRequest,
            ) -> bridge_providers::Result<Value>;
            async fn execute_request(&self, prepared: Value) -> bridge_providers::Result<Value>;
            fn parse_response(&self, raw: Value) -> bridge_providers::Result<LLMResponse>;
            fn capabilities(&self) -> bridge_providers::ProviderCapabilities;
            fn name(&self) -> &str;
        }
    }

    #[tokio::test]
    async fn test_adapter_backend_runs_all_three_phases() {
        let mut adapter = MockPhasedAdapter::new();
        adapter
            .expect_prepare_request()
            .times(1)
            .returning(|_| Ok(json!({"prepared": true})));
        adapter
            .expect_execute_request()
            .times(1)
            .returning(|prepared| {
                assert_eq!(prepared["prepared"], json!(true));
                Ok(json!({"raw": "body"}))
            });
        adapter
            .expect_parse_response()
            .times(1)
            .returning(|_| Ok(LLMResponse::from_text("parsed")));
        adapter.expect_name().return_const("phased".to_string());

        let bridge = ToolBridge::with_adapter(Arc::new(adapter));
        let response = bridge.execute("hi", vec![]).await.unwrap();

        assert_eq!(response.content.as_deref(), Some("parsed"));
        assert_eq!(bridge.provider_name(), "phased");
    }
}
