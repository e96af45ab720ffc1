//! # Function Invocation Core
//!
//! Resolving, compiling, executing and audit-logging cloud functions.
//! Execution happens behind the opaque [`Runtime`] boundary; everything a
//! running function can touch is injected through its capability bundle.

pub mod audit;
pub mod compiler;
pub mod context;
pub mod errors;
pub mod function;
pub mod invoker;
pub mod runtime;
pub mod store;
pub mod subprocess;

pub use audit::{AuditLogEntry, AuditTrail, FUNCTION_LOGS};
pub use compiler::{compile, MODULE_HEADER};
pub use context::{InvocationContext, DEFAULT_METHOD};
pub use errors::{FunctionError, FunctionResult};
pub use function::FunctionDefinition;
pub use invoker::{Invoker, DEFAULT_MAX_CALL_DEPTH};
pub use runtime::{
    ExecutionResult, Handler, NativeRuntime, RunOptions, Runtime, RuntimeConfig,
};
pub use store::{FunctionStore, FUNCTIONS};
pub use subprocess::ProcessRuntime;
