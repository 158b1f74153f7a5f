//! Tool schema documents sent to LLM providers

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Provider-neutral schema document describing one tool
///
/// This is the shape every vendor's function-calling API consumes after its
/// own renaming: a name, a description, and a JSON-Schema object describing
/// the parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name (must match the name registered with the bridge)
    pub name: String,

    /// Description of what the tool does
    pub description: String,

    /// JSON schema for the tool's parameters
    pub parameters: Value,
}

impl ToolDefinition {
    /// Create a new tool definition
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }
}

/// Helper module to build JSON schemas for tool parameters
pub mod schema {
    use serde_json::{Value, json};

    /// Create a JSON schema for an object with properties
    ///
    /// The `required` list is omitted from the output when empty.
    ///
    /// # Example
    ///
    /// ```
    /// use bridge_core::definition::schema;
    /// use serde_json::json;
    ///
    /// let schema = schema::object(
    ///     json!({
    ///         "city": schema::string("City to look up"),
    ///         "days": schema::integer("Forecast window in days"),
    ///     }),
    ///     vec!["city"],
    /// );
    /// ```
    pub fn object(properties: Value, required: Vec<&str>) -> Value {
        if required.is_empty() {
            json!({
                "type": "object",
                "properties": properties,
                "additionalProperties": false,
            })
        } else {
            json!({
                "type": "object",
                "properties": properties,
                "required": required,
                "additionalProperties": false,
            })
        }
    }

    /// String property schema
    pub fn string(description: &str) -> Value {
        json!({
            "type": "string",
            "description": description,
        })
    }

    /// String property schema constrained to a fixed set of values
    pub fn string_enum(description: &str, values: Vec<&str>) -> Value {
        json!({
            "type": "string",
            "description": description,
            "enum": values,
        })
    }

    /// Number property schema
    pub fn number(description: &str) -> Value {
        json!({
            "type": "number",
            "description": description,
        })
    }

    /// Integer property schema
    pub fn integer(description: &str) -> Value {
        json!({
            "type": "integer",
            "description": description,
        })
    }

    /// Boolean property schema
    pub fn boolean(description: &str) -> Value {
        json!({
            "type": "boolean",
            "description": description,
        })
    }

    /// Array property schema
    pub fn array(description: &str, items: Value) -> Value {
        json!({
            "type": "array",
            "description": description,
            "items": items,
        })
    }
}
