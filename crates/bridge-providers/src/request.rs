//! Generate request types shared by all providers

use bridge_core::{ToolDefinition, ToolResult};
use serde::{Deserialize, Serialize};

/// Request for one provider exchange
///
/// Carries the fixed prompt, the tool schema documents offered to the model,
/// and the results of tool calls already executed in this exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// User prompt for the exchange
    pub prompt: String,

    /// Tool schema documents offered to the model
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolDefinition>,

    /// Results of previously executed tool calls, oldest first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_results: Vec<ToolResult>,

    /// Sampling and tool-choice options
    #[serde(default)]
    pub options: GenerateOptions,
}

impl GenerateRequest {
    /// Create a request with just a prompt
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            tools: Vec::new(),
            tool_results: Vec::new(),
            options: GenerateOptions::default(),
        }
    }

    /// Create a builder for generate requests
    pub fn builder(prompt: impl Into<String>) -> GenerateRequestBuilder {
        GenerateRequestBuilder::new(prompt)
    }
}

/// Optional sampling and tool-choice parameters
///
/// Unset fields fall back to each provider's vendor defaults.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GenerateOptions {
    /// Sampling temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Maximum tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<usize>,

    /// Nucleus sampling cutoff
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,

    /// Vendor tool-choice directive (e.g. "auto", "none")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<String>,
}

/// Builder for GenerateRequest
pub struct GenerateRequestBuilder {
    prompt: String,
    tools: Vec<ToolDefinition>,
    tool_results: Vec<ToolResult>,
    options: GenerateOptions,
}

impl GenerateRequestBuilder {
    /// Create a new builder
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            tools: Vec::new(),
            tool_results: Vec::new(),
            options: GenerateOptions::default(),
        }
    }

    /// Set the offered tools
    pub fn tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = tools;
        self
    }

    /// Add a single tool
    pub fn add_tool(mut self, tool: ToolDefinition) -> Self {
        self.tools.push(tool);
        self
    }

    /// Set the accumulated tool results
    pub fn tool_results(mut self, results: Vec<ToolResult>) -> Self {
        self.tool_results = results;
        self
    }

    /// Add a single tool result
    pub fn add_tool_result(mut self, result: ToolResult) -> Self {
        self.tool_results.push(result);
        self
    }

    /// Set the sampling temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.options.temperature = Some(temperature);
        self
    }

    /// Set the maximum tokens
    pub fn max_tokens(mut self, max_tokens: usize) -> Self {
        self.options.max_tokens = Some(max_tokens);
        self
    }

    /// Set the nucleus sampling cutoff
    pub fn top_p(mut self, top_p: f32) -> Self {
        self.options.top_p = Some(top_p);
        self
    }

    /// Set the vendor tool-choice directive
    pub fn tool_choice(mut self, tool_choice: impl Into<String>) -> Self {
        self.options.tool_choice = Some(tool_choice.into());
        self
    }

    /// Replace the options wholesale
    pub fn options(mut self, options: GenerateOptions) -> Self {
        self.options = options;
        self
    }

    /// Build the generate request
    pub fn build(self) -> GenerateRequest {
        GenerateRequest {
            prompt: self.prompt,
            tools: self.tools,
            tool_results: self.tool_results,
            options: self.options,
        }
    }
}
