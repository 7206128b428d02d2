//! Persistent gateway backed by sled
//!
//! Each named store maps to its own sled tree, so keys from different stores
//! never collide.

use crate::error::StoreError;
use crate::gateway::QueryGateway;
use sled::Db;
use std::path::Path;

/// sled-backed key-value store
pub struct SledStore {
    /// Sled database instance
    db: Db,
}

impl SledStore {
    /// Open or create a store at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let db = sled::open(&path)?;
        tracing::info!("Opened persistent store at {:?}", path.as_ref());
        Ok(Self { db })
    }
}

impl QueryGateway for SledStore {
    fn query(&self, store: &str, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        let tree = self.db.open_tree(store)?;
        Ok(tree.get(key)?.map(|v| v.to_vec()))
    }

    fn put(&self, store: &str, key: &[u8], value: Vec<u8>) -> Result<(), StoreError> {
        let tree = self.db.open_tree(store)?;
        tree.insert(key, value)?;
        Ok(())
    }

    fn flush(&self) -> Result<(), StoreError> {
        self.db.flush()?;
        Ok(())
    }
}
