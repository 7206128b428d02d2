//! RPC Server - REST boundary for the checkpoint bridge
//!
//! Routes:
//! - `POST /checkpoint/new`, `/checkpoint/ack`, `/checkpoint/no-ack`: build
//!   checkpoint messages and return an unsigned transaction envelope
//! - `GET /staking/validator/:address`, `/staking/validatorSet`,
//!   `/staking/proposer/:times`: staking queries

pub mod error;
pub mod http_server;
pub mod requests;
pub mod tx;

pub use error::ApiError;
pub use http_server::{RestContext, RestServer};
pub use tx::{TxEnvelope, TxGateway, UnsignedTxGateway};

/// Default cap on `/staking/proposer/:times`
pub const DEFAULT_MAX_PREVIEW: usize = 1_000;
