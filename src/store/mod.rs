//! # Document Store
//!
//! Schemaless document storage behind the engine: function definitions are
//! read from it and invocation logs appended to it. Backends implement
//! [`DocumentStore`]; the engine only issues find-one, find, insert and
//! upsert.

pub mod document;
pub mod errors;
pub mod file;
pub mod memory;

pub use document::{Collection, Database, DocumentStore, Filter, Query};
pub use errors::{StoreError, StoreResult};
pub use file::FileStore;
pub use memory::MemoryStore;
