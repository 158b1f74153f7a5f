//! Adapter registry for dynamic adapter construction
//!
//! Maps adapter names to constructor closures so applications can pick a
//! provider by configuration string. The registry is an explicit object;
//! the process-wide instance is just one such object behind
//! [`global_registry`], and built-in vendors are registered by an explicit
//! call to [`register_builtin_adapters`], never implicitly.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};

use serde_json::Value;
use tracing::debug;

use crate::adapter::ProviderAdapter;
use crate::error::{ProviderError, Result};
use crate::providers::azure_openai::{AzureOpenAIAdapter, AzureOpenAIConfig};
use crate::providers::gemini::{GeminiAdapter, GeminiConfig};
use crate::providers::openai::{OpenAIAdapter, OpenAIConfig};

/// Constructor closure producing an adapter from its raw config block
pub type AdapterFactory = Arc<dyn Fn(&Value) -> Result<Arc<dyn ProviderAdapter>> + Send + Sync>;

/// Registry mapping adapter names to constructors
///
/// Later registrations replace earlier ones for the same name. Registration
/// and lookup are safe under concurrent use by multiple bridges.
pub struct AdapterRegistry {
    factories: RwLock<HashMap<String, AdapterFactory>>,
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self {
            factories: RwLock::new(HashMap::new()),
        }
    }
}

impl AdapterRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an adapter constructor under a name
    ///
    /// An existing registration under the same name is replaced.
    pub fn register<F>(&self, name: impl Into<String>, factory: F)
    where
        F: Fn(&Value) -> Result<Arc<dyn ProviderAdapter>> + Send + Sync + 'static,
    {
        let name = name.into();
        let mut factories = self.factories.write().unwrap();
        if factories.insert(name.clone(), Arc::new(factory)).is_some() {
            debug!(adapter = %name, "replacing existing adapter registration");
        }
    }

    /// Check whether an adapter is registered under a name
    pub fn has_adapter(&self, name: &str) -> bool {
        let factories = self.factories.read().unwrap();
        factories.contains_key(name)
    }

    /// List registered adapter names in sorted order
    pub fn adapter_names(&self) -> Vec<String> {
        let factories = self.factories.read().unwrap();
        let mut names: Vec<String> = factories.keys().cloned().collect();
        names.sort();
        names
    }

    /// Look up the constructor registered under a name
    pub fn factory(&self, name: &str) -> Result<AdapterFactory> {
        let factories = self.factories.read().unwrap();
        factories
            .get(name)
            .cloned()
            .ok_or_else(|| ProviderError::AdapterNotFound(name.to_string()))
    }

    /// Construct an adapter from its raw config block
    pub fn create(&self, name: &str, config: &Value) -> Result<Arc<dyn ProviderAdapter>> {
        let factory = self.factory(name)?;
        factory(config)
    }
}

static GLOBAL_REGISTRY: OnceLock<AdapterRegistry> = OnceLock::new();

/// Process-wide adapter registry
///
/// Populate it at startup, typically via [`register_builtin_adapters`].
/// Tests that need isolation should build their own [`AdapterRegistry`]
/// instead.
pub fn global_registry() -> &'static AdapterRegistry {
    GLOBAL_REGISTRY.get_or_init(AdapterRegistry::new)
}

/// Register the built-in vendor adapters on a registry
///
/// Each factory deserializes its vendor config from the raw block handed to
/// [`AdapterRegistry::create`].
pub fn register_builtin_adapters(registry: &AdapterRegistry) {
    registry.register("openai", |config: &Value| {
        let config: OpenAIConfig = serde_json::from_value(config.clone())?;
        Ok(Arc::new(OpenAIAdapter::from_config(config)?) as Arc<dyn ProviderAdapter>)
    });

    registry.register("azure_openai", |config: &Value| {
        let config: AzureOpenAIConfig = serde_json::from_value(config.clone())?;
        Ok(Arc::new(AzureOpenAIAdapter::from_config(config)?) as Arc<dyn ProviderAdapter>)
    });

    registry.register("gemini", |config: &Value| {
        let config: GeminiConfig = serde_json::from_value(config.clone())?;
        Ok(Arc::new(GeminiAdapter::from_config(config)?) as Arc<dyn ProviderAdapter>)
    });
}
