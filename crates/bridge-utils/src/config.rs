//! Configuration loading and saving
//!
//! Configuration lives in a JSON file resolved from an explicit path or an
//! ordered list of default locations, with environment overrides applied on
//! top. Loading fails soft: a missing or malformed file logs a warning and
//! falls back to defaults, so a bad config never prevents startup.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors from configuration handling
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read or written
    #[error("Config I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration could not be serialized or deserialized
    #[error("Config serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// No configuration block exists for the named provider
    #[error("No configuration found for provider '{0}'")]
    ProviderNotConfigured(String),
}

/// Result type alias for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

fn default_log_level() -> String {
    "info".to_string()
}

/// Global configuration for the tool bridge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolBridgeConfig {
    /// Provider used when none is specified
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_provider: Option<String>,

    /// Raw configuration block per provider name
    #[serde(default)]
    pub provider_configs: HashMap<String, Value>,

    /// Logging level (default: "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Directory used for caching
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<String>,
}

impl Default for ToolBridgeConfig {
    fn default() -> Self {
        Self {
            default_provider: None,
            provider_configs: HashMap::new(),
            log_level: default_log_level(),
            cache_dir: None,
        }
    }
}

impl ToolBridgeConfig {
    /// Configuration block for the named provider
    ///
    /// # Errors
    ///
    /// Returns `ProviderNotConfigured` when the provider has no block.
    pub fn provider_config(&self, name: &str) -> Result<&Value> {
        self.provider_configs
            .get(name)
            .ok_or_else(|| ConfigError::ProviderNotConfigured(name.to_string()))
    }
}

/// Loads and saves tool bridge configuration
pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration
    ///
    /// With an explicit `path`, only that file is considered. Otherwise the
    /// first existing of `./llm_toolbridge_config.json`, then
    /// `~/.llm_toolbridge/config.json`, then the file named by
    /// `$LLM_TOOLBRIDGE_CONFIG` is used. A file that cannot be read or
    /// parsed logs a warning and the next location is tried; when nothing
    /// loads, the defaults apply. Environment overrides
    /// (`LLM_TOOLBRIDGE_DEFAULT_PROVIDER`, `LLM_TOOLBRIDGE_LOG_LEVEL`,
    /// `LLM_TOOLBRIDGE_CACHE_DIR`) are applied last.
    pub fn load(path: Option<&Path>) -> ToolBridgeConfig {
        let candidates = match path {
            Some(path) => vec![path.to_path_buf()],
            None => Self::default_config_paths(),
        };

        let mut config = ToolBridgeConfig::default();
        for candidate in candidates {
            if !candidate.exists() {
                continue;
            }

            match Self::read_file(&candidate) {
                Ok(loaded) => {
                    debug!(path = %candidate.display(), "Loaded configuration");
                    config = loaded;
                    break;
                }
                Err(e) => {
                    warn!(
                        path = %candidate.display(),
                        error = %e,
                        "Failed to load configuration, trying next location"
                    );
                }
            }
        }

        Self::apply_env_overrides(&mut config);
        config
    }

    /// Save configuration as pretty-printed JSON, creating parent directories
    pub fn save(config: &ToolBridgeConfig, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let contents = serde_json::to_string_pretty(config)?;
        std::fs::write(path, contents)?;
        debug!(path = %path.display(), "Saved configuration");
        Ok(())
    }

    fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("./llm_toolbridge_config.json")];

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".llm_toolbridge").join("config.json"));
        }

        if let Ok(env_path) = std::env::var("LLM_TOOLBRIDGE_CONFIG") {
            if !env_path.is_empty() {
                paths.push(PathBuf::from(env_path));
            }
        }

        paths
    }

    fn read_file(path: &Path) -> Result<ToolBridgeConfig> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn apply_env_overrides(config: &mut ToolBridgeConfig) {
        if let Ok(provider) = std::env::var("LLM_TOOLBRIDGE_DEFAULT_PROVIDER") {
            config.default_provider = Some(provider);
        }
        if let Ok(level) = std::env::var("LLM_TOOLBRIDGE_LOG_LEVEL") {
            config.log_level = level;
        }
        if let Ok(dir) = std::env::var("LLM_TOOLBRIDGE_CACHE_DIR") {
            config.cache_dir = Some(dir);
        }
    }
}
