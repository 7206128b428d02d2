//! Builders that validate raw request fields into checkpoint messages

use crate::clock::{Clock, SystemClock};
use crate::error::CheckpointError;
use crate::types::{CheckpointAck, CheckpointNoAck, CheckpointProposal};
use bridge_types::{Address, Hash32};
use std::sync::Arc;

fn parse_hash(field: &'static str, bytes: &[u8]) -> Result<Hash32, CheckpointError> {
    Hash32::try_from_slice(bytes).map_err(|_| CheckpointError::InvalidHash {
        field,
        len: bytes.len(),
    })
}

/// Unset and zero timestamps both fall back to the clock
fn resolve_timestamp(clock: &dyn Clock, timestamp: Option<u64>) -> u64 {
    match timestamp {
        Some(ts) if ts != 0 => ts,
        _ => clock.now_unix(),
    }
}

/// Builds checkpoint proposals
#[derive(Clone)]
pub struct CheckpointProposalBuilder {
    clock: Arc<dyn Clock>,
}

impl CheckpointProposalBuilder {
    /// Create a builder reading the system clock
    pub fn new() -> Self {
        Self {
            clock: Arc::new(SystemClock),
        }
    }

    /// Use a different clock for default timestamps
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Validate fields and build a proposal.
    ///
    /// The range is checked first, then `rootHash`, then `accountRootHash`.
    pub fn build(
        &self,
        proposer: Address,
        start_block: u64,
        end_block: u64,
        root_hash: &[u8],
        account_root_hash: &[u8],
        timestamp: Option<u64>,
    ) -> Result<CheckpointProposal, CheckpointError> {
        if end_block <= start_block {
            return Err(CheckpointError::InvalidRange {
                start: start_block,
                end: end_block,
            });
        }
        let root_hash = parse_hash("rootHash", root_hash)?;
        let account_root_hash = parse_hash("accountRootHash", account_root_hash)?;

        let proposal = CheckpointProposal {
            proposer,
            start_block,
            end_block,
            root_hash,
            account_root_hash,
            timestamp: resolve_timestamp(self.clock.as_ref(), timestamp),
        };

        tracing::debug!(
            proposer = %proposal.proposer,
            start_block,
            end_block,
            blocks = proposal.block_count(),
            "built checkpoint proposal"
        );
        Ok(proposal)
    }
}

impl Default for CheckpointProposalBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds checkpoint acks
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckpointAckBuilder;

impl CheckpointAckBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Validate the mainchain proof and build an ack.
    ///
    /// Index fields are passed through; the ledger checks them against the
    /// mainchain.
    pub fn build(
        &self,
        proposer: Address,
        header_block: u64,
        tx_hash: &[u8],
        log_index: u64,
    ) -> Result<CheckpointAck, CheckpointError> {
        if tx_hash.iter().all(|b| *b == 0) {
            return Err(CheckpointError::MissingProof);
        }
        let tx_hash = parse_hash("tx_hash", tx_hash)?;

        tracing::debug!(proposer = %proposer, header_block, log_index, "built checkpoint ack");
        Ok(CheckpointAck {
            proposer,
            header_block,
            tx_hash,
            log_index,
        })
    }
}

/// Builds no-ack votes
#[derive(Clone)]
pub struct CheckpointNoAckBuilder {
    clock: Arc<dyn Clock>,
}

impl CheckpointNoAckBuilder {
    pub fn new() -> Self {
        Self {
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// No-acks signal the absence of a valid checkpoint, so nothing beyond
    /// the address is checked.
    pub fn build(&self, proposer: Address, timestamp: Option<u64>) -> CheckpointNoAck {
        CheckpointNoAck {
            proposer,
            timestamp: resolve_timestamp(self.clock.as_ref(), timestamp),
        }
    }
}

impl Default for CheckpointNoAckBuilder {
    fn default() -> Self {
        Self::new()
    }
}
