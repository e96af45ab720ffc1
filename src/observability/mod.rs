//! # Observability
//!
//! Structured JSON logging for the engine's own operational events. Function
//! execution logs are data, not telemetry, and live on the execution result
//! instead.

pub mod logger;

pub use logger::{Logger, Severity};
