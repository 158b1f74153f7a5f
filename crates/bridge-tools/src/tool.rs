//! Tool model: a schema-described capability with an optional bound handler

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use bridge_core::ToolDefinition;
use bridge_core::definition::schema;
use futures::future::BoxFuture;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{Result, ToolError};
use crate::parameter::ParameterDefinition;

/// Boxed async function bound to a tool
///
/// Receives the canonical argument object (validated, coerced, defaults
/// injected) and produces the tool's result value.
pub type ToolHandler =
    Arc<dyn Fn(Map<String, Value>) -> BoxFuture<'static, Result<Value>> + Send + Sync>;

/// A named, schema-described capability invokable by a model
///
/// A `Tool` is an immutable value: build it with the `with_*` methods, then
/// register it with a bridge. Invocation validates arguments against the
/// declared parameters before the bound handler runs, so handlers only ever
/// see the canonical shape.
#[derive(Clone)]
pub struct Tool {
    /// Tool name, unique within a bridge
    pub name: String,

    /// Description shown to the model
    pub description: String,

    /// Parameter schemas keyed by parameter name
    pub parameters: BTreeMap<String, ParameterDefinition>,

    /// Tool version, not part of the provider schema document
    pub version: String,

    /// Bound handler, if any
    pub handler: Option<ToolHandler>,
}

impl Tool {
    /// Create a tool with no parameters and no bound handler
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: BTreeMap::new(),
            version: "1.0.0".to_string(),
            handler: None,
        }
    }

    /// Add a parameter schema
    pub fn with_parameter(mut self, name: impl Into<String>, def: ParameterDefinition) -> Self {
        self.parameters.insert(name.into(), def);
        self
    }

    /// Replace the parameter schemas wholesale
    pub fn with_parameters(mut self, parameters: BTreeMap<String, ParameterDefinition>) -> Self {
        self.parameters = parameters;
        self
    }

    /// Set the tool version
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Bind an async handler
    pub fn with_handler<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn(Map<String, Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value>> + Send + 'static,
    {
        self.handler = Some(Arc::new(move |args| Box::pin(handler(args))));
        self
    }

    /// Check whether a handler is bound
    pub fn has_handler(&self) -> bool {
        self.handler.is_some()
    }

    /// Invoke the bound handler with validated arguments
    ///
    /// Arguments are checked against the declared parameters first: unknown
    /// names are rejected, values are coerced to their declared types, enum
    /// constraints are enforced, defaults are injected, and missing required
    /// parameters fail the invocation before the handler runs.
    pub async fn invoke(&self, arguments: Map<String, Value>) -> Result<Value> {
        let handler = self
            .handler
            .as_ref()
            .ok_or_else(|| ToolError::HandlerNotBound(self.name.clone()))?;

        let canonical = self.validate_arguments(arguments)?;
        debug!(tool = %self.name, "invoking tool handler");
        handler(canonical).await
    }

    /// Render the provider-neutral schema document for this tool
    ///
    /// Deterministic for an unchanged tool: parameters are emitted in name
    /// order and the version is excluded.
    pub fn definition(&self) -> ToolDefinition {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for (name, def) in &self.parameters {
            properties.insert(name.clone(), def.schema_value());
            if def.required {
                required.push(name.as_str());
            }
        }

        ToolDefinition::new(
            &self.name,
            &self.description,
            schema::object(Value::Object(properties), required),
        )
    }

    fn validate_arguments(&self, mut supplied: Map<String, Value>) -> Result<Map<String, Value>> {
        if let Some(unknown) = supplied.keys().find(|k| !self.parameters.contains_key(*k)) {
            return Err(ToolError::InvalidParameter {
                name: unknown.clone(),
                reason: "not a declared parameter".to_string(),
            });
        }

        let mut canonical = Map::new();
        for (name, def) in &self.parameters {
            match supplied.remove(name) {
                Some(value) => {
                    canonical.insert(name.clone(), def.coerce(name, value)?);
                }
                None => {
                    if let Some(default) = &def.default {
                        canonical.insert(name.clone(), default.clone());
                    } else if def.required {
                        return Err(ToolError::MissingParameter(name.clone()));
                    }
                    // Optional without a default stays absent.
                }
            }
        }
        Ok(canonical)
    }
}

impl fmt::Debug for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tool")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("parameters", &self.parameters)
            .field("version", &self.version)
            .field("has_handler", &self.handler.is_some())
            .finish()
    }
}
