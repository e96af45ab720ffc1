//! # Execution Engine Boundary
//!
//! The engine that actually runs compiled code is opaque to the rest of the
//! crate: the orchestrator assembles its two inputs (compiled code and the
//! capability bundle) and interprets its one output (a result or a failure).
//! Implementations enforce the time and log budget themselves; nothing
//! outside the engine watches the clock.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Instant;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::observability::{Logger, Severity};
use crate::sdk::CloudSdk;

use super::context::InvocationContext;
use super::errors::{FunctionError, FunctionResult};

/// Execution budget configuration
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Maximum execution time in milliseconds
    pub timeout_ms: u64,

    /// Maximum number of log lines kept per invocation
    pub max_log_lines: usize,

    /// Enable debug logging
    pub debug: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000, // 10 seconds
            max_log_lines: 1_000,
            debug: false,
        }
    }
}

/// What the engine is handed for one run
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// The invocation's request context
    pub context: InvocationContext,

    /// Name of the function being executed
    pub function_name: String,

    /// The invocation's capability bundle
    pub sdk: CloudSdk,
}

/// What one run produces
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// The function's return value
    pub value: Value,

    /// Log lines produced during execution, in order
    pub logs: Vec<String>,

    /// Elapsed execution time in milliseconds
    pub time_usage_ms: u64,
}

impl ExecutionResult {
    pub fn new(value: Value) -> Self {
        Self {
            value,
            logs: Vec::new(),
            time_usage_ms: 0,
        }
    }

    /// Attach log lines
    pub fn with_logs(mut self, logs: Vec<String>) -> Self {
        self.logs = logs;
        self
    }

    /// Prepend a single log line
    pub fn prepend_log(&mut self, line: impl Into<String>) {
        self.logs.insert(0, line.into());
    }
}

/// Trait for execution engine implementations
pub trait Runtime: Send + Sync + std::fmt::Debug {
    /// Execute compiled code with the given context and capabilities
    fn run(
        &self,
        compiled_code: &str,
        opts: RunOptions,
        config: &RuntimeConfig,
    ) -> FunctionResult<ExecutionResult>;

    /// Runtime name for logging
    fn name(&self) -> &'static str;
}

/// A native handler registered with [`NativeRuntime`]
pub type Handler = Arc<dyn Fn(&RunOptions) -> FunctionResult<ExecutionResult> + Send + Sync>;

/// In-process execution engine dispatching to registered native handlers.
///
/// Functions registered here run as host closures with full capability
/// access. Unregistered functions fall back to echoing their context, which
/// keeps local development and tests runnable without a language toolchain.
#[derive(Default)]
pub struct NativeRuntime {
    handlers: RwLock<HashMap<String, Handler>>,
}

impl std::fmt::Debug for NativeRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.handlers.read().map(|h| h.len()).unwrap_or(0);
        f.debug_struct("NativeRuntime")
            .field("handlers", &count)
            .finish()
    }
}

impl NativeRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a native handler under a function name
    pub fn register<F>(&self, name: impl Into<String>, handler: F)
    where
        F: Fn(&RunOptions) -> FunctionResult<ExecutionResult> + Send + Sync + 'static,
    {
        let mut handlers = match self.handlers.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        handlers.insert(name.into(), Arc::new(handler));
    }

    fn handler_for(&self, name: &str) -> FunctionResult<Option<Handler>> {
        let handlers = self
            .handlers
            .read()
            .map_err(|_| FunctionError::Internal("Lock poisoned".into()))?;
        Ok(handlers.get(name).cloned())
    }
}

impl Runtime for NativeRuntime {
    fn run(
        &self,
        _compiled_code: &str,
        opts: RunOptions,
        config: &RuntimeConfig,
    ) -> FunctionResult<ExecutionResult> {
        let start = Instant::now();

        if config.debug {
            Logger::log(
                Severity::Trace,
                "RUNTIME_DISPATCH",
                &[
                    ("function", opts.function_name.as_str()),
                    ("runtime", self.name()),
                ],
            );
        }

        let mut result = match self.handler_for(&opts.function_name)? {
            Some(handler) => handler(&opts)?,
            None => {
                // Echo fallback
                ExecutionResult::new(json!({
                    "function": opts.function_name,
                    "method": opts.context.method,
                    "query": opts.context.query,
                    "body": opts.context.body,
                }))
            }
        };

        let elapsed_ms = start.elapsed().as_millis() as u64;
        if elapsed_ms > config.timeout_ms {
            return Err(FunctionError::Timeout(config.timeout_ms));
        }

        result.time_usage_ms = elapsed_ms;
        result.logs.truncate(config.max_log_lines);
        Ok(result)
    }

    fn name(&self) -> &'static str {
        "native"
    }
}
