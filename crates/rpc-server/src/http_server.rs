//! HTTP REST Server
//!
//! Thin boundary: decode the request, hand fields to the checkpoint builders
//! or staking store, and serialize the result.

use crate::error::ApiError;
use crate::requests::{BaseReq, HeaderAckReq, HeaderBlockReq, HeaderNoAckReq};
use crate::tx::{TxEnvelope, TxGateway};
use crate::DEFAULT_MAX_PREVIEW;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, Method},
    routing::{get, post},
    Json, Router,
};
use bridge_checkpoint::{
    CheckpointAckBuilder, CheckpointMsg, CheckpointNoAckBuilder, CheckpointProposalBuilder, Clock,
};
use bridge_staking::{Validator, ValidatorSet, ValidatorView};
use bridge_store::StakingStore;
use bridge_types::{parse_hex_bytes, Address};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// State shared across handlers
pub struct RestContext {
    pub staking: Arc<StakingStore>,
    pub tx_gateway: Arc<dyn TxGateway>,
    pub proposal_builder: CheckpointProposalBuilder,
    pub ack_builder: CheckpointAckBuilder,
    pub no_ack_builder: CheckpointNoAckBuilder,
    /// Largest `times` accepted by the proposer preview
    pub max_preview: usize,
}

impl RestContext {
    pub fn new(staking: Arc<StakingStore>, tx_gateway: Arc<dyn TxGateway>, clock: Arc<dyn Clock>) -> Self {
        Self {
            staking,
            tx_gateway,
            proposal_builder: CheckpointProposalBuilder::new().with_clock(clock.clone()),
            ack_builder: CheckpointAckBuilder::new(),
            no_ack_builder: CheckpointNoAckBuilder::new().with_clock(clock),
            max_preview: DEFAULT_MAX_PREVIEW,
        }
    }

    pub fn with_max_preview(mut self, max_preview: usize) -> Self {
        self.max_preview = max_preview;
        self
    }
}

/// HTTP REST server
pub struct RestServer {
    context: Arc<RestContext>,
}

impl RestServer {
    /// Create a new REST server
    pub fn new(context: Arc<RestContext>) -> Self {
        Self { context }
    }

    /// Create the Axum router
    pub fn router(self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

        Router::new()
            .route("/health", get(handle_health))
            .route("/checkpoint/new", post(handle_new_checkpoint))
            .route("/checkpoint/ack", post(handle_checkpoint_ack))
            .route("/checkpoint/no-ack", post(handle_checkpoint_no_ack))
            .route("/staking/validator/:address", get(handle_validator_by_address))
            .route("/staking/validatorSet", get(handle_validator_set))
            .route("/staking/proposer/:times", get(handle_proposers))
            .layer(cors)
            .with_state(self.context)
    }

    /// Run the server
    pub async fn run(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("REST server listening on {}", addr);

        axum::serve(listener, self.router()).await?;
        Ok(())
    }
}

fn read_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|e| ApiError::BadRequest(e.body_text()))
}

fn checked_base_req(base_req: BaseReq) -> Result<BaseReq, ApiError> {
    let base_req = base_req.sanitize();
    base_req.validate_basic()?;
    Ok(base_req)
}

fn decode_hash_field(field: &str, value: &str) -> Result<Vec<u8>, ApiError> {
    parse_hex_bytes(value).map_err(|e| ApiError::BadRequest(format!("invalid {}: {}", field, e)))
}

async fn submit(
    ctx: &RestContext,
    base_req: &BaseReq,
    msg: CheckpointMsg,
) -> Result<Json<TxEnvelope>, ApiError> {
    let envelope = ctx
        .tx_gateway
        .generate(base_req, vec![msg])
        .await
        .map_err(ApiError::Tx)?;
    Ok(Json(envelope))
}

async fn handle_health() -> Json<&'static str> {
    Json("ok")
}

/// `POST /checkpoint/new`
async fn handle_new_checkpoint(
    State(ctx): State<Arc<RestContext>>,
    payload: Result<Json<HeaderBlockReq>, JsonRejection>,
) -> Result<Json<TxEnvelope>, ApiError> {
    let req = read_body(payload)?;
    let base_req = checked_base_req(req.base_req)?;

    let root_hash = decode_hash_field("rootHash", &req.root_hash)?;
    let account_root_hash = decode_hash_field("accountRootHash", &req.account_root_hash)?;
    let proposal = ctx.proposal_builder.build(
        req.proposer,
        req.start_block,
        req.end_block,
        &root_hash,
        &account_root_hash,
        None,
    )?;

    submit(&ctx, &base_req, proposal.into()).await
}

/// `POST /checkpoint/ack`
async fn handle_checkpoint_ack(
    State(ctx): State<Arc<RestContext>>,
    payload: Result<Json<HeaderAckReq>, JsonRejection>,
) -> Result<Json<TxEnvelope>, ApiError> {
    let req = read_body(payload)?;
    let base_req = checked_base_req(req.base_req)?;

    let tx_hash = decode_hash_field("tx_hash", &req.tx_hash)?;
    let ack = ctx
        .ack_builder
        .build(req.proposer, req.header_block, &tx_hash, req.log_index)?;

    submit(&ctx, &base_req, ack.into()).await
}

/// `POST /checkpoint/no-ack`
async fn handle_checkpoint_no_ack(
    State(ctx): State<Arc<RestContext>>,
    payload: Result<Json<HeaderNoAckReq>, JsonRejection>,
) -> Result<Json<TxEnvelope>, ApiError> {
    let req = read_body(payload)?;
    let base_req = checked_base_req(req.base_req)?;

    let no_ack = ctx.no_ack_builder.build(req.proposer, None);
    submit(&ctx, &base_req, no_ack.into()).await
}

/// `GET /staking/validator/:address`
async fn handle_validator_by_address(
    State(ctx): State<Arc<RestContext>>,
    Path(address): Path<String>,
) -> Result<Json<ValidatorView>, ApiError> {
    let address: Address = address
        .parse()
        .map_err(|e| ApiError::BadRequest(format!("invalid address: {}", e)))?;

    let validator = ctx
        .staking
        .validator_by_address(&address)?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(validator.view()))
}

/// `GET /staking/validatorSet`
async fn handle_validator_set(
    State(ctx): State<Arc<RestContext>>,
) -> Result<Json<ValidatorSet>, ApiError> {
    let set = ctx
        .staking
        .current_validator_set()?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(set))
}

/// `GET /staking/proposer/:times`
async fn handle_proposers(
    State(ctx): State<Arc<RestContext>>,
    Path(times): Path<String>,
) -> Result<Json<Vec<Validator>>, ApiError> {
    let times: i64 = times
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("invalid times: {}", times)))?;
    let times = match usize::try_from(times) {
        Ok(times) if times > 0 => times,
        _ => {
            return Err(ApiError::BadRequest(format!(
                "times must be positive, got {}",
                times
            )))
        }
    };
    if times > ctx.max_preview {
        return Err(ApiError::BadRequest(format!(
            "times must be at most {}, got {}",
            ctx.max_preview, times
        )));
    }

    tracing::info!("Getting {} proposers for current validator set", times);
    let proposers = ctx
        .staking
        .preview_proposers(times)?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(proposers))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tx::UnsignedTxGateway;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use bridge_checkpoint::FixedClock;
    use bridge_store::MemoryStore;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    const NOW: u64 = 1_700_000_000;

    fn addr(n: u8) -> Address {
        let mut bytes = [0u8; 20];
        bytes[19] = n;
        Address(bytes)
    }

    fn router(seed: bool) -> Router {
        let staking = Arc::new(StakingStore::new(Arc::new(MemoryStore::new())));
        if seed {
            let set = ValidatorSet::new(vec![
                Validator::new(addr(1), 3).with_pub_key(vec![1; 33]),
                Validator::new(addr(2), 1).with_pub_key(vec![2; 33]),
            ])
            .unwrap();
            staking.save_validator_set(&set).unwrap();
        }
        let ctx = RestContext::new(staking, Arc::new(UnsignedTxGateway), Arc::new(FixedClock(NOW)))
            .with_max_preview(100);
        RestServer::new(Arc::new(ctx)).router()
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn post(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn base_req() -> Value {
        json!({"from": "validator-1", "chain_id": "bridge-testnet"})
    }

    fn checkpoint_body(start: u64, end: u64) -> Value {
        json!({
            "base_req": base_req(),
            "proposer": addr(1).to_string(),
            "rootHash": format!("0x{}", "aa".repeat(32)),
            "accountRootHash": format!("0x{}", "bb".repeat(32)),
            "startBlock": start,
            "endBlock": end,
        })
    }

    #[tokio::test]
    async fn test_new_checkpoint() {
        let (status, body) = send(router(false), post("/checkpoint/new", checkpoint_body(100, 200))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["chain_id"], "bridge-testnet");
        assert_eq!(body["msgs"][0]["type"], "checkpoint");
        assert_eq!(body["msgs"][0]["value"]["startBlock"], 100);
        assert_eq!(body["msgs"][0]["value"]["endBlock"], 200);
        assert_eq!(body["msgs"][0]["value"]["timestamp"], NOW);
    }

    #[tokio::test]
    async fn test_new_checkpoint_equal_range() {
        let (status, body) = send(router(false), post("/checkpoint/new", checkpoint_body(100, 100))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("block range"));
    }

    #[tokio::test]
    async fn test_new_checkpoint_requires_chain_id() {
        let mut body = checkpoint_body(1, 2);
        body["base_req"]["chain_id"] = json!("");
        let (status, _) = send(router(false), post("/checkpoint/new", body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let (status, _) = send(router(false), post("/checkpoint/no-ack", json!({"proposer": 5}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_ack_without_proof() {
        let body = json!({
            "base_req": base_req(),
            "proposer": addr(1).to_string(),
            "headerBlock": 5,
            "tx_hash": "",
            "log_index": 0,
        });
        let (status, body) = send(router(false), post("/checkpoint/ack", body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("proof"));
    }

    #[tokio::test]
    async fn test_ack_and_no_ack() {
        let ack = json!({
            "base_req": base_req(),
            "proposer": addr(1).to_string(),
            "headerBlock": 5,
            "tx_hash": format!("0x{}", "cd".repeat(32)),
            "log_index": 1,
        });
        let (status, body) = send(router(false), post("/checkpoint/ack", ack)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["msgs"][0]["type"], "checkpoint-ack");
        assert_eq!(body["msgs"][0]["value"]["headerBlock"], 5);

        let no_ack = json!({"base_req": base_req(), "proposer": addr(2).to_string()});
        let (status, body) = send(router(false), post("/checkpoint/no-ack", no_ack)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["msgs"][0]["type"], "checkpoint-no-ack");
        assert_eq!(body["msgs"][0]["value"]["timestamp"], NOW);
    }

    #[tokio::test]
    async fn test_validator_queries() {
        let uri = format!("/staking/validator/{}", addr(2));
        let (status, body) = send(router(true), get_req(&uri)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["voting_power"], 1);
        assert!(body.get("pub_key").is_none());

        let (status, _) = send(router(false), get_req(&uri)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(router(true), get_req("/staking/validator/0x1234")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_validator_set_query() {
        let (status, body) = send(router(true), get_req("/staking/validatorSet")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["validators"].as_array().unwrap().len(), 2);
        assert_eq!(body["total_voting_power"], 4);

        let (status, _) = send(router(false), get_req("/staking/validatorSet")).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_proposer_preview() {
        let (status, body) = send(router(true), get_req("/staking/proposer/4")).await;
        assert_eq!(status, StatusCode::OK);

        let addrs: Vec<String> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v["address"].as_str().unwrap().to_string())
            .collect();
        let (a, b) = (addr(1).to_string(), addr(2).to_string());
        assert_eq!(addrs, vec![a.clone(), a.clone(), b, a]);
    }

    #[tokio::test]
    async fn test_proposer_preview_bad_times() {
        for uri in ["/staking/proposer/0", "/staking/proposer/-2", "/staking/proposer/abc", "/staking/proposer/101"] {
            let (status, _) = send(router(true), get_req(uri)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        }

        // rejected before the store is consulted
        let (status, _) = send(router(false), get_req("/staking/proposer/0")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(router(false), get_req("/staking/proposer/3")).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }
}
