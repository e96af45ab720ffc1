//! # Function Store Adapter
//!
//! Read path over the document store's `functions` collection. One lookup
//! per call, no caching.

use std::sync::Arc;

use uuid::Uuid;

use crate::store::{Database, DocumentStore, Filter};

use super::errors::{FunctionError, FunctionResult};
use super::function::FunctionDefinition;

/// Collection holding function definitions
pub const FUNCTIONS: &str = "functions";

/// Adapter resolving function definitions by name or id
#[derive(Debug, Clone)]
pub struct FunctionStore {
    db: Database,
}

impl FunctionStore {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            db: Database::new(store),
        }
    }

    /// Resolve a definition by name.
    ///
    /// Names are not unique at this layer; when several definitions share a
    /// name, the first stored match (insertion order) is returned.
    pub fn resolve_by_name(&self, name: &str) -> FunctionResult<FunctionDefinition> {
        let doc = self
            .db
            .collection(FUNCTIONS)
            .filter(Filter::field("name", name))
            .get_one()?
            .ok_or_else(|| FunctionError::NotFound(name.to_string()))?;

        FunctionDefinition::from_document(&doc)
    }

    /// Resolve a definition by its unique id
    pub fn resolve_by_id(&self, id: &Uuid) -> FunctionResult<FunctionDefinition> {
        let doc = self
            .db
            .collection(FUNCTIONS)
            .filter(Filter::field("id", id.to_string()))
            .get_one()?
            .ok_or_else(|| FunctionError::NotFound(id.to_string()))?;

        FunctionDefinition::from_document(&doc)
    }

    /// Append a new definition (management write path)
    pub fn insert(&self, definition: &FunctionDefinition) -> FunctionResult<()> {
        self.db
            .collection(FUNCTIONS)
            .add(definition.to_document()?)?;
        Ok(())
    }

    /// Replace the definition with the same id, or append it
    pub fn upsert(&self, definition: &FunctionDefinition) -> FunctionResult<()> {
        self.db.collection(FUNCTIONS).upsert(
            &Filter::field("id", definition.id.to_string()),
            definition.to_document()?,
        )?;
        Ok(())
    }
}
