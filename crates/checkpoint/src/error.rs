//! Checkpoint validation errors

use thiserror::Error;

/// Rejections raised before a checkpoint message is built
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckpointError {
    #[error("invalid block range: end block {end} must be greater than start block {start}")]
    InvalidRange { start: u64, end: u64 },

    #[error("invalid {field}: expected 32 bytes, got {len}")]
    InvalidHash { field: &'static str, len: usize },

    #[error("missing mainchain proof: tx hash is empty")]
    MissingProof,
}
