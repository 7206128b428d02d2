//! Checkpoint messages for sidechain-to-mainchain settlement
//!
//! - Proposer submits a `CheckpointProposal` covering a block range
//! - Validators `CheckpointAck` once the mainchain confirms it
//! - Or `CheckpointNoAck` when no confirmation shows up in time
//!
//! Builders validate raw fields and never touch the network or storage.

pub mod builder;
pub mod clock;
pub mod error;
pub mod types;

pub use builder::{CheckpointAckBuilder, CheckpointNoAckBuilder, CheckpointProposalBuilder};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::CheckpointError;
pub use types::*;
