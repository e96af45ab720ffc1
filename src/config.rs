//! # Engine Configuration
//!
//! Loaded from a JSON file; every field except `data_dir` has a default.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(String),

    #[error("Invalid config JSON: {0}")]
    Parse(String),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Runtime selection
pub const RUNTIME_NATIVE: &str = "native";
pub const RUNTIME_SUBPROCESS: &str = "subprocess";

/// Engine configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Data directory (required)
    pub data_dir: String,

    /// Storage namespace invocations run under (default "default")
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Execution time budget in milliseconds (default 10s)
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Log lines kept per invocation (default 1000)
    #[serde(default = "default_max_log_lines")]
    pub max_log_lines: usize,

    /// Function-to-function call chain ceiling (default 32)
    #[serde(default = "default_max_call_depth")]
    pub max_call_depth: u32,

    /// Execution engine: "native" or "subprocess" (default "native")
    #[serde(default = "default_runtime")]
    pub runtime: String,

    /// Interpreter binary, required when runtime is "subprocess"
    #[serde(default)]
    pub interpreter: Option<String>,

    /// Secret for the token capability
    #[serde(default = "default_token_secret")]
    pub token_secret: String,

    /// Token lifetime in seconds (default 1 hour)
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: i64,
}

fn default_namespace() -> String {
    "default".to_string()
}
fn default_timeout_ms() -> u64 {
    10_000
}
fn default_max_log_lines() -> usize {
    1_000
}
fn default_max_call_depth() -> u32 {
    32
}
fn default_runtime() -> String {
    RUNTIME_NATIVE.to_string()
}
fn default_token_secret() -> String {
    "CHANGE_THIS_SECRET_IN_PRODUCTION".to_string()
}
fn default_token_ttl_secs() -> i64 {
    3_600
}

impl EngineConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;

        let config: EngineConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if self.data_dir.is_empty() {
            return Err(ConfigError::Invalid("data_dir must not be empty".into()));
        }

        if self.timeout_ms == 0 {
            return Err(ConfigError::Invalid("timeout_ms must be > 0".into()));
        }

        if self.max_call_depth == 0 {
            return Err(ConfigError::Invalid("max_call_depth must be > 0".into()));
        }

        match self.runtime.as_str() {
            RUNTIME_NATIVE => {}
            RUNTIME_SUBPROCESS => {
                if self.interpreter.is_none() {
                    return Err(ConfigError::Invalid(
                        "interpreter is required when runtime is 'subprocess'".into(),
                    ));
                }
            }
            other => {
                return Err(ConfigError::Invalid(format!(
                    "Invalid runtime: '{}'. Must be '{}' or '{}'.",
                    other, RUNTIME_NATIVE, RUNTIME_SUBPROCESS
                )));
            }
        }

        Ok(())
    }

    /// Data directory as a path
    pub fn data_path(&self) -> &Path {
        Path::new(&self.data_dir)
    }

    /// Document store file
    pub fn store_path(&self) -> PathBuf {
        self.data_path().join("store.json")
    }

    /// Blob storage root
    pub fn blob_root(&self) -> PathBuf {
        self.data_path().join("blobs")
    }
}
