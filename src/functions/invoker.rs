//! # Function Invoker
//!
//! Top-level entry point for running functions. Two paths:
//!
//! - [`Invoker::invoke`] is the bare primitive: build a capability bundle,
//!   hand compiled code to the execution engine, return the result untouched.
//!   Nothing is logged or persisted.
//! - [`Invoker::invoke_nested`] is what the `invoke` capability is bound to:
//!   resolve by name, execute, prepend a trace line, persist one audit
//!   record, return. Every function-to-function call goes through here.

use crate::observability::{Logger, Severity};
use crate::sdk::{NestedInvoke, SdkFactory, SharedPreferences};

use std::sync::Arc;

use super::audit::{AuditLogEntry, AuditTrail};
use super::context::InvocationContext;
use super::errors::{FunctionError, FunctionResult};
use super::function::FunctionDefinition;
use super::runtime::{ExecutionResult, RunOptions, Runtime, RuntimeConfig};
use super::store::FunctionStore;

/// Default ceiling for function-to-function call chains
pub const DEFAULT_MAX_CALL_DEPTH: u32 = 32;

/// Function invocation orchestrator.
///
/// A cheap handle: clones share the stores, runtime and capability factory.
#[derive(Debug, Clone)]
pub struct Invoker {
    functions: FunctionStore,
    audit: AuditTrail,
    runtime: Arc<dyn Runtime>,
    sdk: SdkFactory,
    runtime_config: RuntimeConfig,
    max_call_depth: u32,
}

impl Invoker {
    pub fn new(
        functions: FunctionStore,
        audit: AuditTrail,
        runtime: Arc<dyn Runtime>,
        sdk: SdkFactory,
        runtime_config: RuntimeConfig,
    ) -> Self {
        Self {
            functions,
            audit,
            runtime,
            sdk,
            runtime_config,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }

    /// Set the call-chain ceiling
    pub fn with_max_call_depth(mut self, depth: u32) -> Self {
        self.max_call_depth = depth;
        self
    }

    /// The function store this invoker resolves against
    pub fn functions(&self) -> &FunctionStore {
        &self.functions
    }

    /// The audit trail this invoker appends to
    pub fn audit(&self) -> &AuditTrail {
        &self.audit
    }

    /// The process-wide shared preference store
    pub fn shared(&self) -> &SharedPreferences {
        self.sdk.shared()
    }

    /// Bare invocation: execute a resolved definition and return the result
    /// unchanged. Resolution is the caller's job; nothing is persisted here.
    pub fn invoke(
        &self,
        function: &FunctionDefinition,
        context: InvocationContext,
        namespace: &str,
    ) -> FunctionResult<ExecutionResult> {
        let nested: Arc<dyn NestedInvoke> = Arc::new(NestedCall {
            engine: self.clone(),
            namespace: namespace.to_string(),
            depth: context.call_depth,
        });
        let sdk = self.sdk.build(namespace, nested);

        self.runtime.run(
            &function.compiled_code,
            RunOptions {
                context,
                function_name: function.name.clone(),
                sdk,
            },
            &self.runtime_config,
        )
    }

    /// Audited invocation by name, used for function-to-function calls.
    ///
    /// The trace line is prepended before the audit write, so callers and the
    /// persisted record see the same log sequence. A failed audit write is
    /// logged and does not discard the completed result.
    pub fn invoke_nested(
        &self,
        name: &str,
        context: Option<InvocationContext>,
        namespace: &str,
    ) -> FunctionResult<ExecutionResult> {
        let function = self.functions.resolve_by_name(name)?;

        let context = context.unwrap_or_default().normalized();
        if context.call_depth >= self.max_call_depth {
            return Err(FunctionError::RecursionLimitExceeded(context.call_depth));
        }

        let mut result = self.invoke(&function, context, namespace)?;

        result.prepend_log(format!(
            "invoked in function: {} ({})",
            function.name, function.id
        ));

        let entry = AuditLogEntry::for_invocation(&function, &result);
        if let Err(e) = self.audit.record(&entry) {
            let error = e.to_string();
            Logger::log_stderr(
                Severity::Error,
                "AUDIT_WRITE_FAILED",
                &[("function", name), ("error", error.as_str())],
            );
        }

        Ok(result)
    }
}

/// The `invoke` capability: binds nested calls to the audited path and
/// advances the call-chain depth by one per hop.
#[derive(Debug)]
struct NestedCall {
    engine: Invoker,
    namespace: String,
    depth: u32,
}

impl NestedInvoke for NestedCall {
    fn invoke(
        &self,
        name: &str,
        context: Option<InvocationContext>,
    ) -> FunctionResult<ExecutionResult> {
        let mut context = context.unwrap_or_default();
        context.call_depth = self.depth.saturating_add(1);

        self.engine
            .invoke_nested(name, Some(context), &self.namespace)
    }
}
