//! Staking - Validator sets and proposer rotation
//!
//! Architecture:
//! - `Validator` carries voting power and a rotation priority
//! - `ValidatorSet` keeps validators in canonical (address ascending) order
//! - Weighted round-robin picks the next checkpoint proposer, deterministically
//!   from set state alone, so every validator computes the same sequence

pub mod error;
pub mod rotation;
pub mod types;
pub mod validator_set;

pub use error::StakingError;
pub use rotation::{preview_proposers, rotate_once};
pub use types::{Validator, ValidatorView};
pub use validator_set::{ValidatorSet, MAX_TOTAL_VOTING_POWER};
