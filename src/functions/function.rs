//! # Function Definition

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use super::errors::{FunctionError, FunctionResult};

/// A stored, named unit of executable code plus metadata.
///
/// Definitions are authored and edited by a management surface; the
/// invocation engine reads them. `id` is immutable once created; `name` is
/// the human-facing lookup key and uniqueness is not enforced at this layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionDefinition {
    /// Unique function ID
    pub id: Uuid,

    /// Function name, used for lookup
    pub name: String,

    /// Authored source text
    pub source: String,

    /// Executable code produced by the compiler; replaced on edit
    pub compiled_code: String,

    /// Content hash of the compiled code
    pub code_hash: String,

    /// Created timestamp
    pub created_at: DateTime<Utc>,

    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl FunctionDefinition {
    /// Create a new definition from authored source and its compiled form
    pub fn new(
        name: impl Into<String>,
        source: impl Into<String>,
        compiled_code: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        let compiled_code = compiled_code.into();

        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            source: source.into(),
            code_hash: hash_code(&compiled_code),
            compiled_code,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the code after an edit
    pub fn update_code(&mut self, source: impl Into<String>, compiled_code: impl Into<String>) {
        self.source = source.into();
        self.compiled_code = compiled_code.into();
        self.code_hash = hash_code(&self.compiled_code);
        self.updated_at = Utc::now();
    }

    /// Serialize for the document store
    pub fn to_document(&self) -> FunctionResult<Value> {
        serde_json::to_value(self)
            .map_err(|e| FunctionError::Internal(format!("serialize definition: {}", e)))
    }

    /// Deserialize from a document store record
    pub fn from_document(doc: &Value) -> FunctionResult<Self> {
        serde_json::from_value(doc.clone())
            .map_err(|e| FunctionError::Internal(format!("malformed definition document: {}", e)))
    }
}

fn hash_code(code: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(code.as_bytes());
    format!("{:x}", hasher.finalize())
}
