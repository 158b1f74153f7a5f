//! Shared utilities for the tool bridge
//!
//! Configuration files, `.env` loading, and tracing setup used by the
//! binaries built on the bridge crates.

pub mod config;
pub mod env;
pub mod logging;

pub use config::{ConfigError, ConfigManager, ToolBridgeConfig};
pub use env::{get_env_var, load_dotenv};
pub use logging::init_tracing;
