//! Parameter schema types for tools

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::error::{Result, ToolError};

/// JSON type of a single tool parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    /// UTF-8 text
    String,
    /// Floating-point number
    Number,
    /// Whole number
    Integer,
    /// True or false
    Boolean,
    /// Ordered list of values
    Array,
    /// Nested key/value object
    Object,
}

impl ParameterType {
    /// JSON-schema name of this type
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

/// Schema for a single tool parameter
///
/// Parameters are required by default. An optional parameter may carry a
/// `default`, injected when the model omits the argument; an optional
/// parameter without a default is simply absent from the handler's
/// arguments when omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDefinition {
    /// Declared JSON type
    #[serde(rename = "type")]
    pub param_type: ParameterType,

    /// Description shown to the model
    pub description: String,

    /// Finite set of allowed values, if constrained
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,

    /// Whether the argument must be supplied
    #[serde(default = "default_required")]
    pub required: bool,

    /// Value injected when an optional argument is omitted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

fn default_required() -> bool {
    true
}

impl ParameterDefinition {
    /// Create a required parameter of the given type
    pub fn new(param_type: ParameterType, description: impl Into<String>) -> Self {
        Self {
            param_type,
            description: description.into(),
            enum_values: None,
            required: true,
            default: None,
        }
    }

    /// Mark the parameter as optional
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Constrain the parameter to a finite set of allowed values
    pub fn with_enum_values<V: Into<Value>>(mut self, values: Vec<V>) -> Self {
        self.enum_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Set the value injected when the argument is omitted
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Render the property schema sent to providers
    ///
    /// The `required` flag is not part of the property itself; providers
    /// expect it aggregated into the enclosing object's `required` list.
    pub fn schema_value(&self) -> Value {
        let mut property = Map::new();
        property.insert("type".to_string(), json!(self.param_type.as_str()));
        property.insert("description".to_string(), json!(self.description));
        if let Some(values) = &self.enum_values {
            property.insert("enum".to_string(), json!(values));
        }
        if let Some(default) = &self.default {
            property.insert("default".to_string(), default.clone());
        }
        Value::Object(property)
    }

    /// Coerce a supplied argument to the declared type and check enum membership
    pub fn coerce(&self, name: &str, value: Value) -> Result<Value> {
        let coerced = self.coerce_type(name, value)?;
        if let Some(allowed) = &self.enum_values {
            if !allowed.contains(&coerced) {
                return Err(ToolError::InvalidEnumValue {
                    name: name.to_string(),
                    value: coerced.to_string(),
                });
            }
        }
        Ok(coerced)
    }

    fn coerce_type(&self, name: &str, value: Value) -> Result<Value> {
        let mismatch = |got: &Value| ToolError::InvalidParameter {
            name: name.to_string(),
            reason: format!(
                "expected {}, got {}",
                self.param_type.as_str(),
                json_type_name(got)
            ),
        };

        match self.param_type {
            ParameterType::String => match value {
                Value::String(_) => Ok(value),
                Value::Number(n) => Ok(Value::String(n.to_string())),
                Value::Bool(b) => Ok(Value::String(b.to_string())),
                other => Err(mismatch(&other)),
            },
            ParameterType::Number => match value {
                Value::Number(_) => Ok(value),
                Value::String(s) => s
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .and_then(serde_json::Number::from_f64)
                    .map(Value::Number)
                    .ok_or_else(|| mismatch(&Value::String(s))),
                other => Err(mismatch(&other)),
            },
            ParameterType::Integer => match value {
                Value::Number(ref n) if n.is_i64() || n.is_u64() => Ok(value),
                Value::String(s) => s
                    .trim()
                    .parse::<i64>()
                    .map(|i| Value::Number(i.into()))
                    .map_err(|_| mismatch(&Value::String(s))),
                other => Err(mismatch(&other)),
            },
            ParameterType::Boolean => match value {
                Value::Bool(_) => Ok(value),
                Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                    "true" => Ok(Value::Bool(true)),
                    "false" => Ok(Value::Bool(false)),
                    _ => Err(mismatch(&Value::String(s))),
                },
                other => Err(mismatch(&other)),
            },
            ParameterType::Array => match value {
                Value::Array(_) => Ok(value),
                other => Err(mismatch(&other)),
            },
            ParameterType::Object => match value {
                Value::Object(_) => Ok(value),
                other => Err(mismatch(&other)),
            },
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
