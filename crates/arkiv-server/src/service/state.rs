//! Shared service state.

use arkiv_opendal::{FileStore, StorageConfig, StorageResult};
use axum::extract::FromRef;

/// State shared by every request handler.
///
/// Holds the single storage gateway built at startup. The gateway is an
/// immutable shared resource; cloning the state is cheap and no handler
/// mutates it.
#[derive(Debug, Clone)]
pub struct ServiceState {
    store: FileStore,
}

impl ServiceState {
    /// Creates state around an already-constructed gateway.
    pub fn new(store: FileStore) -> Self {
        Self { store }
    }

    /// Builds the gateway from configuration and wraps it in state.
    pub async fn from_config(config: StorageConfig) -> StorageResult<Self> {
        Ok(Self::new(FileStore::new(config).await?))
    }

    /// Returns the storage gateway.
    #[inline]
    pub fn store(&self) -> &FileStore {
        &self.store
    }
}

impl FromRef<ServiceState> for FileStore {
    fn from_ref(state: &ServiceState) -> Self {
        state.store.clone()
    }
}
