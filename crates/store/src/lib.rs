//! Bridge Store - Access to replicated staking state
//!
//! Everything the validator reads from shared state goes through the
//! `QueryGateway` trait, which only knows about raw bytes:
//! - `MemoryStore`: in-process map, for tests and local devnets
//! - `SledStore`: sled embedded database, survives restarts
//! - `StakingStore`: typed validator / validator-set queries on top of any gateway

pub mod error;
pub mod gateway;
pub mod memory;
pub mod sled_store;
pub mod staking;

pub use error::StoreError;
pub use gateway::QueryGateway;
pub use memory::MemoryStore;
pub use sled_store::SledStore;
pub use staking::{StakingStore, CURRENT_VALIDATOR_SET_KEY, STAKING_STORE};
