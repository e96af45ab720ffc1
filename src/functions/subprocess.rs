//! # Subprocess Runtime
//!
//! Executes compiled code in an external interpreter process. The contract
//! with the interpreter is JSON over pipes: the request
//! `{code, function_name, context}` on stdin, the response
//! `{value, logs, error?}` on stdout. The child is killed once the time
//! budget expires.
//!
//! Capabilities do not cross the process boundary: functions that need the
//! capability bundle run on the in-process runtime. This variant exists for
//! untrusted pure compute.

use std::io::{Read, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::observability::{Logger, Severity};

use super::context::InvocationContext;
use super::errors::{FunctionError, FunctionResult};
use super::runtime::{ExecutionResult, RunOptions, Runtime, RuntimeConfig};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug, Serialize)]
struct WireRequest<'a> {
    code: &'a str,
    function_name: &'a str,
    context: &'a InvocationContext,
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    #[serde(default)]
    value: Value,

    #[serde(default)]
    logs: Vec<String>,

    #[serde(default)]
    error: Option<String>,
}

/// Execution engine backed by an external interpreter process
#[derive(Debug, Clone)]
pub struct ProcessRuntime {
    interpreter: PathBuf,
    args: Vec<String>,
}

impl ProcessRuntime {
    pub fn new(interpreter: impl Into<PathBuf>) -> Self {
        Self {
            interpreter: interpreter.into(),
            args: Vec::new(),
        }
    }

    /// Add an interpreter argument
    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }
}

impl Runtime for ProcessRuntime {
    fn run(
        &self,
        compiled_code: &str,
        opts: RunOptions,
        config: &RuntimeConfig,
    ) -> FunctionResult<ExecutionResult> {
        let start = Instant::now();
        let deadline = start + Duration::from_millis(config.timeout_ms);

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

        let mut child = Command::new(&self.interpreter)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| FunctionError::Execution(format!("spawn interpreter: {}", e)))?;

        let request = WireRequest {
            code: compiled_code,
            function_name: &opts.function_name,
            context: &opts.context,
        };
        let payload = serde_json::to_vec(&request)
            .map_err(|e| FunctionError::Internal(format!("encode run request: {}", e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            // A child that exits before reading surfaces through its status.
            let _ = stdin.write_all(&payload);
        }

        let stdout = child.stdout.take();
        let reader = thread::spawn(move || {
            let mut output = String::new();
            if let Some(mut stdout) = stdout {
                let _ = stdout.read_to_string(&mut output);
            }
            output
        });

        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {
                    if Instant::now() >= deadline {
                        let _ = child.kill();
                        let _ = child.wait();
                        return Err(FunctionError::Timeout(config.timeout_ms));
                    }
                    thread::sleep(POLL_INTERVAL);
                }
                Err(e) => {
                    let _ = child.kill();
                    return Err(FunctionError::Execution(format!("wait interpreter: {}", e)));
                }
            }
        };

        let output = reader
            .join()
            .map_err(|_| FunctionError::Internal("interpreter reader panicked".into()))?;

        if !status.success() {
            return Err(FunctionError::Execution(format!(
                "interpreter exited with {}",
                status
            )));
        }

        let response: WireResponse = serde_json::from_str(&output)
            .map_err(|e| FunctionError::Execution(format!("malformed interpreter output: {}", e)))?;

        if let Some(error) = response.error {
            return Err(FunctionError::Execution(error));
        }

        let mut result = ExecutionResult::new(response.value).with_logs(response.logs);
        result.time_usage_ms = start.elapsed().as_millis() as u64;
        result.logs.truncate(config.max_log_lines);
        Ok(result)
    }

    fn name(&self) -> &'static str {
        "subprocess"
    }
}
