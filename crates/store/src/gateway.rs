//! Raw key-value gateway

use crate::error::StoreError;

/// Byte-level access to named stores in replicated state.
///
/// `query` returns `Ok(None)` for absent keys; backend failures are errors.
pub trait QueryGateway: Send + Sync {
    /// Fetch the value stored under `key` in `store`
    fn query(&self, store: &str, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;

    /// Write `value` under `key` in `store`
    fn put(&self, store: &str, key: &[u8], value: Vec<u8>) -> Result<(), StoreError>;

    /// Make completed writes durable; a no-op for volatile backends
    fn flush(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
