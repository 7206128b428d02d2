//! Checkpoint message types
//!
//! JSON field names follow the existing REST contract (`rootHash`,
//! `startBlock`, `headerBlock`, `tx_hash`, ...) so current clients keep working.

use borsh::{BorshDeserialize, BorshSerialize};
use bridge_types::{Address, Hash32};
use serde::{Deserialize, Serialize};

/// Proposal summarizing sidechain blocks `start_block..end_block`
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub struct CheckpointProposal {
    pub proposer: Address,
    #[serde(rename = "startBlock")]
    pub start_block: u64,
    #[serde(rename = "endBlock")]
    pub end_block: u64,
    #[serde(rename = "rootHash")]
    pub root_hash: Hash32,
    #[serde(rename = "accountRootHash")]
    pub account_root_hash: Hash32,
    /// Unix seconds
    pub timestamp: u64,
}

impl CheckpointProposal {
    /// Number of sidechain blocks covered
    pub fn block_count(&self) -> u64 {
        self.end_block - self.start_block
    }
}

/// Vote that a proposed checkpoint landed on the mainchain
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub struct CheckpointAck {
    pub proposer: Address,
    /// Header block index assigned by the mainchain contract
    #[serde(rename = "headerBlock")]
    pub header_block: u64,
    /// Mainchain transaction carrying the confirmation
    pub tx_hash: Hash32,
    /// Position of the confirming event in that transaction's logs
    pub log_index: u64,
}

/// Vote to skip the current proposer's checkpoint
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub struct CheckpointNoAck {
    pub proposer: Address,
    pub timestamp: u64,
}

/// Message kinds handed to the transaction gateway
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum CheckpointMsg {
    #[serde(rename = "checkpoint")]
    Proposal(CheckpointProposal),
    #[serde(rename = "checkpoint-ack")]
    Ack(CheckpointAck),
    #[serde(rename = "checkpoint-no-ack")]
    NoAck(CheckpointNoAck),
}

impl CheckpointMsg {
    /// Route name of this message kind
    pub fn kind(&self) -> &'static str {
        match self {
            CheckpointMsg::Proposal(_) => "checkpoint",
            CheckpointMsg::Ack(_) => "checkpoint-ack",
            CheckpointMsg::NoAck(_) => "checkpoint-no-ack",
        }
    }

    /// Validator that signs this message
    pub fn signer(&self) -> Address {
        match self {
            CheckpointMsg::Proposal(m) => m.proposer,
            CheckpointMsg::Ack(m) => m.proposer,
            CheckpointMsg::NoAck(m) => m.proposer,
        }
    }
}

impl From<CheckpointProposal> for CheckpointMsg {
    fn from(msg: CheckpointProposal) -> Self {
        CheckpointMsg::Proposal(msg)
    }
}

impl From<CheckpointAck> for CheckpointMsg {
    fn from(msg: CheckpointAck) -> Self {
        CheckpointMsg::Ack(msg)
    }
}

impl From<CheckpointNoAck> for CheckpointMsg {
    fn from(msg: CheckpointNoAck) -> Self {
        CheckpointMsg::NoAck(msg)
    }
}
