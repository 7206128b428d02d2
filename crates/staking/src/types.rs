//! Validator records

use crate::error::StakingError;
use borsh::{BorshDeserialize, BorshSerialize};
use bridge_types::Address;
use serde::{Deserialize, Serialize};

/// A single validator as stored in replicated staking state
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub struct Validator {
    /// Validator address (unique within a set)
    pub address: Address,
    /// Raw public key bytes
    #[serde(default)]
    pub pub_key: Vec<u8>,
    /// Weight determining proposing frequency
    pub voting_power: u64,
    /// Rotation counter, only mutated by proposer rotation
    #[serde(default)]
    pub proposer_priority: i64,
}

impl Validator {
    /// Create a validator with zero priority
    pub fn new(address: Address, voting_power: u64) -> Self {
        Self {
            address,
            pub_key: Vec::new(),
            voting_power,
            proposer_priority: 0,
        }
    }

    /// Attach a public key
    pub fn with_pub_key(mut self, pub_key: Vec<u8>) -> Self {
        self.pub_key = pub_key;
        self
    }

    /// Copy of this validator without its public key
    pub fn view(&self) -> ValidatorView {
        ValidatorView {
            address: self.address,
            voting_power: self.voting_power,
            proposer_priority: self.proposer_priority,
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        borsh::to_vec(self).expect("Validator serialization should not fail")
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, StakingError> {
        borsh::from_slice(data).map_err(|e| StakingError::Decode(e.to_string()))
    }
}

/// Validator as returned to query clients (public key stripped)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorView {
    pub address: Address,
    pub voting_power: u64,
    pub proposer_priority: i64,
}
