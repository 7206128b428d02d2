//! In-memory gateway using DashMap for concurrent access

use crate::error::StoreError;
use crate::gateway::QueryGateway;
use dashmap::DashMap;
use std::sync::Arc;

/// Thread-safe in-memory key-value store
#[derive(Clone, Default)]
pub struct MemoryStore {
    /// Entries keyed by (store name, key)
    entries: Arc<DashMap<(String, Vec<u8>), Vec<u8>>>,
}

impl MemoryStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl QueryGateway for MemoryStore {
    fn query(&self, store: &str, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self
            .entries
            .get(&(store.to_string(), key.to_vec()))
            .map(|r| r.value().clone()))
    }

    fn put(&self, store: &str, key: &[u8], value: Vec<u8>) -> Result<(), StoreError> {
        self.entries.insert((store.to_string(), key.to_vec()), value);
        Ok(())
    }
}
