//! cirrus - a capability-scoped cloud function invocation engine
//!
//! Given a named function definition and an invocation context, cirrus
//! compiles the function's source, executes the compiled code behind an
//! opaque runtime boundary with a per-invocation capability bundle, lets
//! functions invoke other functions through an audited nested path, and
//! persists a log record of every nested invocation.

pub mod blob_store;
pub mod cli;
pub mod config;
pub mod functions;
pub mod observability;
pub mod sdk;
pub mod store;
