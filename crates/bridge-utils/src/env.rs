//! Environment helpers
//!
//! Minimal `.env` support: KEY=VALUE lines, `#` comment lines, and single or
//! double quoted values. Variables already present in the process
//! environment are never overwritten, so real environment configuration
//! always wins over the file.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Load variables from a `.env` file into the process environment
///
/// With no explicit `path`, the current directory and up to two parent
/// directories are searched and the first `.env` found is used. Returns
/// everything parsed from the file, including entries skipped because the
/// variable was already set. Call during startup, before spawning threads,
/// since this mutates the process environment.
pub fn load_dotenv(path: Option<&Path>) -> HashMap<String, String> {
    let Some(file) = resolve_dotenv_path(path) else {
        return HashMap::new();
    };

    let Ok(contents) = std::fs::read_to_string(&file) else {
        return HashMap::new();
    };

    let parsed = parse_dotenv(&contents);
    for (key, value) in &parsed {
        if std::env::var_os(key).is_none() {
            // Sound only while the process is single-threaded
            unsafe {
                std::env::set_var(key, value);
            }
        }
    }
    debug!(path = %file.display(), count = parsed.len(), "Loaded .env file");
    parsed
}

/// Read an environment variable, falling back to `default` when unset
pub fn get_env_var(key: &str, default: Option<&str>) -> Option<String> {
    std::env::var(key).ok().or_else(|| default.map(String::from))
}

fn resolve_dotenv_path(path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = path {
        return path.exists().then(|| path.to_path_buf());
    }

    let mut dir = std::env::current_dir().ok()?;
    for _ in 0..3 {
        let candidate = dir.join(".env");
        if candidate.exists() {
            return Some(candidate);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}

fn parse_dotenv(contents: &str) -> HashMap<String, String> {
    let mut vars = HashMap::new();
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        vars.insert(key.to_string(), unquote(value.trim()).to_string());
    }
    vars
}

fn unquote(value: &str) -> &str {
    if value.len() >= 2 {
        let bytes = value.as_bytes();
        if (bytes[0] == b'"' && bytes[value.len() - 1] == b'"')
            || (bytes[0] == b'\'' && bytes[value.len() - 1] == b'\'')
        {
            return &value[1..value.len() - 1];
        }
    }
    value
}
