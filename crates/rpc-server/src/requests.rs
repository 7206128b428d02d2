//! REST request bodies
//!
//! Field names match the existing client contract.

use crate::error::ApiError;
use bridge_types::Address;
use serde::{Deserialize, Serialize};

/// Transaction metadata common to every write request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BaseReq {
    /// Signing account (name or address)
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub chain_id: String,
    #[serde(default)]
    pub memo: String,
    #[serde(default)]
    pub gas: Option<u64>,
    #[serde(default)]
    pub fees: String,
}

impl BaseReq {
    /// Trim surrounding whitespace from text fields
    pub fn sanitize(self) -> Self {
        Self {
            from: self.from.trim().to_string(),
            chain_id: self.chain_id.trim().to_string(),
            memo: self.memo.trim().to_string(),
            gas: self.gas,
            fees: self.fees.trim().to_string(),
        }
    }

    pub fn validate_basic(&self) -> Result<(), ApiError> {
        if self.chain_id.is_empty() {
            return Err(ApiError::BadRequest("chain-id required but not specified".to_string()));
        }
        if self.from.is_empty() {
            return Err(ApiError::BadRequest("name or address required but not specified".to_string()));
        }
        Ok(())
    }
}

/// `POST /checkpoint/new`
#[derive(Debug, Clone, Deserialize)]
pub struct HeaderBlockReq {
    pub base_req: BaseReq,
    pub proposer: Address,
    /// Hex; length is checked by the proposal builder
    #[serde(rename = "rootHash")]
    pub root_hash: String,
    #[serde(rename = "accountRootHash")]
    pub account_root_hash: String,
    #[serde(rename = "startBlock")]
    pub start_block: u64,
    #[serde(rename = "endBlock")]
    pub end_block: u64,
}

/// `POST /checkpoint/ack`
#[derive(Debug, Clone, Deserialize)]
pub struct HeaderAckReq {
    pub base_req: BaseReq,
    pub proposer: Address,
    #[serde(rename = "headerBlock")]
    pub header_block: u64,
    #[serde(default)]
    pub tx_hash: String,
    #[serde(default)]
    pub log_index: u64,
}

/// `POST /checkpoint/no-ack`
#[derive(Debug, Clone, Deserialize)]
pub struct HeaderNoAckReq {
    pub base_req: BaseReq,
    pub proposer: Address,
}
