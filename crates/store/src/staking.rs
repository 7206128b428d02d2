//! Typed staking queries over a raw gateway
//!
//! Validator records live in the `staker` store under their address bytes;
//! the current validator set lives under `CURRENT_VALIDATOR_SET_KEY`.
//! Empty values are treated the same as missing keys.

use crate::error::StoreError;
use crate::gateway::QueryGateway;
use bridge_staking::{preview_proposers, rotate_once, Validator, ValidatorSet};
use bridge_types::Address;
use parking_lot::Mutex;
use std::sync::Arc;

/// Store holding validator records and the current validator set
pub const STAKING_STORE: &str = "staker";

/// Key of the current validator set inside `STAKING_STORE`
pub const CURRENT_VALIDATOR_SET_KEY: &[u8] = b"current-validator-set";

/// Staking view of replicated state
pub struct StakingStore {
    gateway: Arc<dyn QueryGateway>,
    /// Serializes canonical set mutation within this process
    write_lock: Mutex<()>,
}

impl StakingStore {
    pub fn new(gateway: Arc<dyn QueryGateway>) -> Self {
        Self {
            gateway,
            write_lock: Mutex::new(()),
        }
    }

    fn query_non_empty(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self
            .gateway
            .query(STAKING_STORE, key)?
            .filter(|bytes| !bytes.is_empty()))
    }

    /// Validator record for `address`
    pub fn validator_by_address(&self, address: &Address) -> Result<Option<Validator>, StoreError> {
        match self.query_non_empty(address.as_ref())? {
            Some(bytes) => Ok(Some(Validator::from_bytes(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Snapshot of the current validator set
    pub fn current_validator_set(&self) -> Result<Option<ValidatorSet>, StoreError> {
        match self.query_non_empty(CURRENT_VALIDATOR_SET_KEY)? {
            Some(bytes) => Ok(Some(ValidatorSet::from_bytes(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Proposers for the next `times` rounds, without changing stored state
    pub fn preview_proposers(&self, times: usize) -> Result<Option<Vec<Validator>>, StoreError> {
        let Some(set) = self.current_validator_set()? else {
            return Ok(None);
        };
        Ok(Some(preview_proposers(&set, times)?))
    }

    /// Write a validator record
    pub fn save_validator(&self, validator: &Validator) -> Result<(), StoreError> {
        self.gateway
            .put(STAKING_STORE, validator.address.as_ref(), validator.to_bytes())
    }

    /// Replace the current validator set, refreshing each member's record
    pub fn save_validator_set(&self, set: &ValidatorSet) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock();
        self.write_set(set)
    }

    /// Set key first, then member records. Not atomic: a failure partway
    /// leaves some member records one round behind the stored set, which
    /// stays authoritative.
    fn write_set(&self, set: &ValidatorSet) -> Result<(), StoreError> {
        self.gateway
            .put(STAKING_STORE, CURRENT_VALIDATOR_SET_KEY, set.to_bytes())?;
        for validator in set.validators() {
            self.save_validator(validator)?;
        }
        Ok(())
    }

    /// Make stored staking state durable
    pub fn flush(&self) -> Result<(), StoreError> {
        self.gateway.flush()
    }

    /// Advance the canonical set by one round and persist it.
    ///
    /// Holds the write lock from load to store so two advances never
    /// interleave. Returns `None` when no set is stored.
    pub fn advance_proposer(&self) -> Result<Option<Validator>, StoreError> {
        let _guard = self.write_lock.lock();

        let Some(mut set) = self.current_validator_set()? else {
            return Ok(None);
        };
        let proposer = rotate_once(&mut set)?;
        self.write_set(&set)?;

        tracing::info!(
            proposer = %proposer.address,
            priority = proposer.proposer_priority,
            "advanced checkpoint proposer"
        );
        Ok(Some(proposer))
    }
}
