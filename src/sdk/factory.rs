//! # Capability Bundle Factory

use std::sync::Arc;

use crate::blob_store::{BlobBackend, NamespacedBlobs};
use crate::store::{Database, DocumentStore};

use super::bundle::{CloudSdk, NestedInvoke};
use super::events::EventBus;
use super::fetch::HttpFetch;
use super::shared::SharedPreferences;
use super::tokens::TokenService;

/// Builds one [`CloudSdk`] per invocation.
///
/// Construction is pure: handles are cloned or wrapped, nothing blocks on
/// the network. The shared preference store is created once with the factory
/// and reused by every bundle it builds.
#[derive(Debug, Clone)]
pub struct SdkFactory {
    database: Arc<dyn DocumentStore>,
    blobs: Arc<dyn BlobBackend>,
    fetch: Arc<dyn HttpFetch>,
    events: Arc<dyn EventBus>,
    tokens: Arc<TokenService>,
    shared: SharedPreferences,
}

impl SdkFactory {
    pub fn new(
        database: Arc<dyn DocumentStore>,
        blobs: Arc<dyn BlobBackend>,
        fetch: Arc<dyn HttpFetch>,
        events: Arc<dyn EventBus>,
        tokens: Arc<TokenService>,
    ) -> Self {
        Self {
            database,
            blobs,
            fetch,
            events,
            tokens,
            shared: SharedPreferences::new(),
        }
    }

    /// The process-wide shared preference store
    pub fn shared(&self) -> &SharedPreferences {
        &self.shared
    }

    /// Build a capability bundle scoped to `namespace`.
    ///
    /// `invoke` is supplied by the orchestrator and is its audited nested
    /// path; the factory never binds anything else there.
    pub fn build(&self, namespace: &str, invoke: Arc<dyn NestedInvoke>) -> CloudSdk {
        CloudSdk {
            database: Database::new(Arc::clone(&self.database)),
            storage: NamespacedBlobs::new(Arc::clone(&self.blobs), namespace),
            fetch: Arc::clone(&self.fetch),
            invoke,
            events: Arc::clone(&self.events),
            shared: self.shared.clone(),
            tokens: Arc::clone(&self.tokens),
            raw_database: Arc::clone(&self.database),
        }
    }
}
