//! Transaction gateway
//!
//! Turns built checkpoint messages into a transaction envelope. Signing and
//! broadcast happen outside this process; the default gateway returns the
//! envelope unsigned so the caller's wallet can sign it.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use borsh::BorshSerialize;
use bridge_checkpoint::CheckpointMsg;
use serde::{Deserialize, Serialize};

use crate::requests::BaseReq;

/// Default gas limit when the request leaves it out
pub const DEFAULT_GAS: u64 = 200_000;

/// Fee attached to a transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize)]
pub struct StdFee {
    pub gas: u64,
    pub amount: String,
}

/// Envelope returned to the client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxEnvelope {
    pub chain_id: String,
    pub from: String,
    pub memo: String,
    pub fee: StdFee,
    pub msgs: Vec<CheckpointMsg>,
    /// Base64 of the borsh-encoded transaction body
    pub tx_bytes: String,
    /// Hex blake3 of the transaction body
    pub tx_hash: String,
    pub signatures: Vec<String>,
}

/// Collaborator that wraps messages into a broadcastable transaction
#[async_trait]
pub trait TxGateway: Send + Sync {
    async fn generate(&self, base_req: &BaseReq, msgs: Vec<CheckpointMsg>) -> anyhow::Result<TxEnvelope>;
}

/// Body covered by `tx_hash`
#[derive(BorshSerialize)]
struct TxBody {
    chain_id: String,
    from: String,
    memo: String,
    fee: StdFee,
    msgs: Vec<CheckpointMsg>,
}

/// Builds unsigned envelopes
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsignedTxGateway;

#[async_trait]
impl TxGateway for UnsignedTxGateway {
    async fn generate(&self, base_req: &BaseReq, msgs: Vec<CheckpointMsg>) -> anyhow::Result<TxEnvelope> {
        if msgs.is_empty() {
            anyhow::bail!("transaction has no messages");
        }

        let fee = StdFee {
            gas: base_req.gas.unwrap_or(DEFAULT_GAS),
            amount: base_req.fees.clone(),
        };
        let body = TxBody {
            chain_id: base_req.chain_id.clone(),
            from: base_req.from.clone(),
            memo: base_req.memo.clone(),
            fee,
            msgs,
        };
        let bytes = borsh::to_vec(&body)?;
        let tx_hash = format!("0x{}", hex::encode(blake3::hash(&bytes).as_bytes()));

        tracing::info!(
            chain_id = %base_req.chain_id,
            kind = body.msgs[0].kind(),
            signer = %body.msgs[0].signer(),
            tx_hash = %tx_hash,
            "generated unsigned transaction"
        );

        Ok(TxEnvelope {
            chain_id: body.chain_id,
            from: body.from,
            memo: body.memo,
            fee: body.fee,
            msgs: body.msgs,
            tx_bytes: BASE64.encode(&bytes),
            tx_hash,
            signatures: Vec::new(),
        })
    }
}
