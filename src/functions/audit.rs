//! # Invocation Audit Trail
//!
//! One persisted record per nested invocation, appended immediately after
//! the invocation completes and never updated afterward.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::{Database, DocumentStore, Filter, StoreError, StoreResult};

use super::function::FunctionDefinition;
use super::runtime::ExecutionResult;

/// Collection holding audit records
pub const FUNCTION_LOGS: &str = "function_logs";

/// A persisted record of one nested invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogEntry {
    /// Synthesized correlation id, `func_{id}` of the callee
    pub request_id: String,

    /// Callee function id
    pub func_id: String,

    /// Callee function name
    pub func_name: String,

    /// The invocation's log lines, trace line first
    pub logs: Vec<String>,

    /// Elapsed execution time in milliseconds
    pub time_usage_ms: u64,

    /// Record creation time
    pub created_at: DateTime<Utc>,

    /// Record update time; equals `created_at`, records are never updated
    pub updated_at: DateTime<Utc>,

    /// Provenance tag: the callee's own id
    pub created_by: String,
}

impl AuditLogEntry {
    /// Build the record for a completed invocation
    pub fn for_invocation(function: &FunctionDefinition, result: &ExecutionResult) -> Self {
        let now = Utc::now();

        Self {
            request_id: format!("func_{}", function.id),
            func_id: function.id.to_string(),
            func_name: function.name.clone(),
            logs: result.logs.clone(),
            time_usage_ms: result.time_usage_ms,
            created_at: now,
            updated_at: now,
            created_by: function.id.to_string(),
        }
    }
}

/// Write path for audit records
#[derive(Debug, Clone)]
pub struct AuditTrail {
    db: Database,
}

impl AuditTrail {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            db: Database::new(store),
        }
    }

    /// Append exactly one record
    pub fn record(&self, entry: &AuditLogEntry) -> StoreResult<String> {
        let doc = serde_json::to_value(entry)
            .map_err(|e| StoreError::Serialization(format!("serialize audit entry: {}", e)))?;
        self.db.collection(FUNCTION_LOGS).add(doc)
    }

    /// Records persisted for a function name, in stored order
    pub fn entries_for(&self, func_name: &str) -> StoreResult<Vec<AuditLogEntry>> {
        let docs = self
            .db
            .collection(FUNCTION_LOGS)
            .filter(Filter::field("func_name", func_name))
            .find()?;

        docs.iter()
            .map(|doc| {
                serde_json::from_value(doc.clone()).map_err(|e| {
                    StoreError::Serialization(format!("malformed audit entry: {}", e))
                })
            })
            .collect()
    }
}
