//! Staking errors

use bridge_types::Address;
use thiserror::Error;

/// Errors raised by validator-set construction and rotation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StakingError {
    #[error("no eligible proposer: total voting power is zero")]
    NoEligibleProposer,

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("duplicate validator {0}")]
    DuplicateValidator(Address),

    #[error("total voting power exceeds {max}")]
    TotalVotingPowerOverflow { max: i64 },

    #[error("unknown proposer {0}")]
    UnknownProposer(Address),

    #[error("failed to decode validator data: {0}")]
    Decode(String),
}
