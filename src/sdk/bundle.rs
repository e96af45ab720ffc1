//! # Capability Bundle
//!
//! The fixed set of injected services a function body may call, and its
//! entire interface to the outside world. One bundle is built per
//! invocation; the shared preference store is the single process-wide
//! exception.

use std::sync::Arc;

use serde_json::Value;

use crate::blob_store::NamespacedBlobs;
use crate::functions::context::InvocationContext;
use crate::functions::errors::FunctionResult;
use crate::functions::runtime::ExecutionResult;
use crate::store::{Database, DocumentStore};

use super::errors::SdkResult;
use super::events::EventBus;
use super::fetch::HttpFetch;
use super::shared::SharedPreferences;
use super::tokens::{TokenClaims, TokenService};

/// Nested function invocation, as exposed to running function code.
///
/// Every call through this capability is resolved, executed and audit-logged;
/// there is no unlogged path from inside a function to another function.
pub trait NestedInvoke: Send + Sync + std::fmt::Debug {
    fn invoke(
        &self,
        name: &str,
        context: Option<InvocationContext>,
    ) -> FunctionResult<ExecutionResult>;
}

/// The capability bundle handed to a running function
#[derive(Debug, Clone)]
pub struct CloudSdk {
    /// Document database handle, fresh per invocation
    pub database: Database,

    /// Blob storage scoped to the invocation's namespace
    pub storage: NamespacedBlobs,

    /// Outbound HTTP
    pub fetch: Arc<dyn HttpFetch>,

    /// Invoke another function (always audit-logged)
    pub invoke: Arc<dyn NestedInvoke>,

    /// Event emission
    pub events: Arc<dyn EventBus>,

    /// Process-wide shared preference store
    pub shared: SharedPreferences,

    /// Token issue/parse
    pub tokens: Arc<TokenService>,

    /// The raw underlying document store handle
    pub raw_database: Arc<dyn DocumentStore>,
}

impl CloudSdk {
    /// Emit an event, fire-and-forget
    pub fn emit(&self, event: &str, payload: Value) {
        self.events.emit(event, payload);
    }

    /// Issue a token for a subject
    pub fn get_token(&self, sub: &str, scope: Option<&str>) -> SdkResult<String> {
        self.tokens.issue(sub, scope)
    }

    /// Parse and validate a token
    pub fn parse_token(&self, token: &str) -> SdkResult<TokenClaims> {
        self.tokens.parse(token)
    }
}
