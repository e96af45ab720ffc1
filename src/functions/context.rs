//! # Invocation Context

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Method assumed for nested calls that do not name one
pub const DEFAULT_METHOD: &str = "call";

/// Per-invocation request context.
///
/// Built fresh by the caller for every invocation and passed by value into
/// the engine; the engine does not retain it past the invocation. Only its
/// effects (logs, timing) are persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvocationContext {
    /// Query parameters
    #[serde(default)]
    pub query: Value,

    /// Request body
    #[serde(default)]
    pub body: Value,

    /// Authentication claims, if the trigger carried any
    #[serde(default)]
    pub auth: Option<Value>,

    /// Correlation id supplied by the trigger
    #[serde(default)]
    pub request_id: Option<String>,

    /// Invocation method; nested calls default to [`DEFAULT_METHOD`]
    #[serde(default)]
    pub method: Option<String>,

    /// Position in the call chain; 0 for externally-triggered invocations
    #[serde(default)]
    pub call_depth: u32,
}

impl InvocationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set query parameters
    pub fn with_query(mut self, query: Value) -> Self {
        self.query = query;
        self
    }

    /// Set the request body
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = body;
        self
    }

    /// Set authentication claims
    pub fn with_auth(mut self, auth: Value) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Set the correlation id
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Set the method
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Default an absent or empty method to [`DEFAULT_METHOD`].
    pub fn normalized(mut self) -> Self {
        match &self.method {
            Some(m) if !m.is_empty() => {}
            _ => self.method = Some(DEFAULT_METHOD.to_string()),
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalized_defaults_method() {
        let ctx = InvocationContext::new().normalized();
        assert_eq!(ctx.method.as_deref(), Some(DEFAULT_METHOD));
    }

    #[test]
    fn test_normalized_defaults_empty_method() {
        let ctx = InvocationContext::new().with_method("").normalized();
        assert_eq!(ctx.method.as_deref(), Some(DEFAULT_METHOD));
    }

    #[test]
    fn test_normalized_keeps_explicit_method() {
        let ctx = InvocationContext::new().with_method("POST").normalized();
        assert_eq!(ctx.method.as_deref(), Some("POST"));
    }

    #[test]
    fn test_empty_context_normalizes_like_explicit_call() {
        let empty = InvocationContext::new().normalized();
        let explicit = InvocationContext::new()
            .with_method(DEFAULT_METHOD)
            .normalized();
        assert_eq!(empty, explicit);
    }

    #[test]
    fn test_deserialize_partial() {
        let ctx: InvocationContext =
            serde_json::from_value(json!({"query": {"name": "x"}})).unwrap();
        assert_eq!(ctx.query, json!({"name": "x"}));
        assert_eq!(ctx.body, Value::Null);
        assert_eq!(ctx.call_depth, 0);
    }
}
