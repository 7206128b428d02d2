//! Storage errors

use bridge_staking::StakingError;
use thiserror::Error;

/// Failures talking to, or decoding data from, the key-value backend
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(String),

    #[error(transparent)]
    Staking(#[from] StakingError),
}

impl From<sled::Error> for StoreError {
    fn from(e: sled::Error) -> Self {
        StoreError::Backend(e.to_string())
    }
}
