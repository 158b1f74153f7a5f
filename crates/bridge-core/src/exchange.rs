//! Exchange types passed between the bridge and LLM providers
//!
//! A provider call yields an [`LLMResponse`], which may carry [`ToolCall`]
//! requests. The bridge answers those with [`ToolResult`] values on the next
//! round of the exchange.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A model-issued request to invoke a specific tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Name of the tool to invoke
    pub tool_name: String,

    /// Arguments for the invocation, keyed by parameter name
    pub arguments: Map<String, Value>,

    /// Provider-assigned correlation id, echoed back in the matching result
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_id: Option<String>,
}

impl ToolCall {
    /// Create a tool call without a correlation id
    pub fn new(tool_name: impl Into<String>, arguments: Map<String, Value>) -> Self {
        Self {
            tool_name: tool_name.into(),
            arguments,
            call_id: None,
        }
    }

    /// Create a tool call carrying a provider-assigned correlation id
    pub fn with_call_id(
        tool_name: impl Into<String>,
        arguments: Map<String, Value>,
        call_id: impl Into<String>,
    ) -> Self {
        Self {
            tool_name: tool_name.into(),
            arguments,
            call_id: Some(call_id.into()),
        }
    }

    /// Correlation key for this call: the call id when present, else the tool name
    pub fn correlation_key(&self) -> &str {
        self.call_id.as_deref().unwrap_or(&self.tool_name)
    }
}

/// Outcome of one tool invocation, reported back to the provider
///
/// Exactly one of `result` and `error` is set; `success` tells them apart.
/// The constructors are the only way this type is built, so the pairing
/// holds everywhere downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    /// Name of the tool that was invoked
    pub tool_name: String,

    /// Correlation id copied from the originating call, if it carried one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_id: Option<String>,

    /// Value returned by the tool on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,

    /// Error message when the invocation failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Whether the invocation succeeded
    pub success: bool,
}

impl ToolResult {
    /// Create a successful result
    pub fn success(
        tool_name: impl Into<String>,
        call_id: Option<String>,
        result: Value,
    ) -> Self {
        Self {
            tool_name: tool_name.into(),
            call_id,
            result: Some(result),
            error: None,
            success: true,
        }
    }

    /// Create a failed result carrying an error message
    pub fn failure(
        tool_name: impl Into<String>,
        call_id: Option<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            tool_name: tool_name.into(),
            call_id,
            result: None,
            error: Some(error.into()),
            success: false,
        }
    }

    /// Create a result answering the given call, reusing its name and id
    pub fn for_call(call: &ToolCall, outcome: Result<Value, String>) -> Self {
        match outcome {
            Ok(value) => Self::success(&call.tool_name, call.call_id.clone(), value),
            Err(message) => Self::failure(&call.tool_name, call.call_id.clone(), message),
        }
    }

    /// Correlation key for this result: the call id when present, else the tool name
    pub fn correlation_key(&self) -> &str {
        self.call_id.as_deref().unwrap_or(&self.tool_name)
    }
}

/// Normalized response from an LLM provider
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LLMResponse {
    /// Text content of the response, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Tool calls requested by the model, in provider order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
}

impl LLMResponse {
    /// Create a text-only response
    pub fn from_text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            tool_calls: Vec::new(),
        }
    }

    /// Create a response carrying tool calls and optional text
    pub fn with_tool_calls(content: Option<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            content,
            tool_calls,
        }
    }

    /// Check whether the model requested any tool calls
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(pairs: &[(&str, Value)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_tool_call_correlation_key() {
        let call = ToolCall::new("calculator", args(&[("x", json!(1))]));
        assert_eq!(call.correlation_key(), "calculator");

        let call = ToolCall::with_call_id("calculator", Map::new(), "call_42");
        assert_eq!(call.correlation_key(), "call_42");
    }

    #[test]
    fn test_tool_result_success() {
        let result = ToolResult::success("calculator", Some("call_1".to_string()), json!(15));
        assert!(result.success);
        assert_eq!(result.result, Some(json!(15)));
        assert_eq!(result.error, None);
    }

    #[test]
    fn test_tool_result_failure() {
        let result = ToolResult::failure("calculator", None, "division by zero");
        assert!(!result.success);
        assert_eq!(result.result, None);
        assert_eq!(result.error.as_deref(), Some("division by zero"));
    }

    #[test]
    fn test_tool_result_for_call_preserves_call_id() {
        let call = ToolCall::with_call_id("lookup", Map::new(), "call_7");
        let ok = ToolResult::for_call(&call, Ok(json!("found")));
        assert_eq!(ok.call_id.as_deref(), Some("call_7"));
        assert!(ok.success);

        let err = ToolResult::for_call(&call, Err("boom".to_string()));
        assert_eq!(err.call_id.as_deref(), Some("call_7"));
        assert!(!err.success);
        assert_eq!(err.error.as_deref(), Some("boom"));
    }

    #[test]
    fn test_response_with_tool_calls() {
        let response = LLMResponse::with_tool_calls(
            None,
            vec![ToolCall::new("calculator", Map::new())],
        );
        assert!(response.has_tool_calls());
        assert_eq!(response.tool_calls.len(), 1);
    }

    #[test]
    fn test_text_response_has_no_tool_calls() {
        let response = LLMResponse::from_text("Hello");
        assert!(!response.has_tool_calls());
        assert_eq!(response.content.as_deref(), Some("Hello"));
    }

    #[test]
    fn test_response_serialization_skips_empty_fields() {
        let response = LLMResponse::from_text("hi");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json, json!({"content": "hi"}));

        let round_trip: LLMResponse = serde_json::from_value(json).unwrap();
        assert_eq!(round_trip, response);
    }
}
