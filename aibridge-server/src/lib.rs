//! aibridge-server library
//!
//! Axum HTTP surface for the NEAR AI bridge agent.
//!
//! # Routes
//! - `/agent/*`: action dispatch and the capability manifest
//! - `/api/zcash/*`, `/api/secret/*`: chain executors
//! - `/api/intents/*`: cross-chain intent submission and status
//! - `/api/status`, `/api/status/detailed`, `/api/validate-token`, `/health`

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};

use aibridge_agent::AgentService;
use aibridge_chains::{
    string_or_number, ChainOperationExecutor, ContractQueryRequest, PrivateComputeRequest,
    PrivateSwapRequest, SecretExecutor, ShieldRequest, TransferRequest, ZcashExecutor,
};
use aibridge_common::{BridgeConfig, BridgeError, BRIDGE_VERSION};
use aibridge_intents::{
    BridgeIntentRequest, ChainAccount, IntentOrchestrator, IntentStatusSource, LocalKeyAccount,
    PrivacyLevel, SimulatedStatusSource, SwapIntentRequest, TargetChain, NOT_SIGNED_IN,
};
use aibridge_query::{validate_token_structure, TokenValidation};

// ═══════════════════════════════════════════════════════════════════════════════
// APPLICATION STATE
// ═══════════════════════════════════════════════════════════════════════════════

/// Application state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<BridgeConfig>,
    pub agent: Arc<AgentService>,
    pub zcash: Arc<ZcashExecutor>,
    pub secret: Arc<SecretExecutor>,
    pub intents: Arc<IntentOrchestrator>,
}

impl AppState {
    /// Wire every service from configuration. Nothing is initialized yet.
    pub fn new(config: BridgeConfig) -> anyhow::Result<Self> {
        let agent = AgentService::with_http_backend(&config.near, &config.near_ai)?;
        let account: Arc<dyn ChainAccount> = Arc::new(LocalKeyAccount::from_config(&config.near));
        let status_source: Arc<dyn IntentStatusSource> = Arc::new(SimulatedStatusSource::default());
        let intents = IntentOrchestrator::new(account, status_source, &config.intents);

        Ok(Self {
            zcash: Arc::new(ZcashExecutor::new(config.zcash.clone())),
            secret: Arc::new(SecretExecutor::new(config.secret.clone())),
            agent: Arc::new(agent),
            intents: Arc::new(intents),
            config: Arc::new(config),
        })
    }

    /// Initialize the agent and both chain executors. Failures are logged;
    /// the affected executor keeps answering `NotInitialized`.
    pub async fn initialize(&self) {
        let mode = self.agent.initialize().await;
        tracing::info!(mode = ?mode, "agent initialized");

        let executors: [&dyn ChainOperationExecutor; 2] = [self.zcash.as_ref(), self.secret.as_ref()];
        for executor in executors {
            if let Err(err) = executor.initialize().await {
                tracing::error!(service = executor.service_name(), error = %err, "service initialization failed");
            }
        }
        tracing::info!("all services initialized");
    }
}

/// Build state and initialize every service.
pub async fn build_state(config: BridgeConfig) -> anyhow::Result<AppState> {
    let state = AppState::new(config)?;
    state.initialize().await;
    Ok(state)
}

/// Build the router.
pub fn app_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/status", get(status))
        .route("/api/status/detailed", get(detailed_status))
        .route("/api/validate-token", post(validate_token))
        // Agent
        .route("/agent/action", post(agent_action))
        .route("/agent/capabilities", get(capabilities))
        // Zcash
        .route("/api/zcash/address", post(zcash_address))
        .route("/api/zcash/transfer", post(zcash_transfer))
        .route("/api/zcash/shield", post(zcash_shield))
        .route("/api/zcash/history", get(zcash_history))
        // Secret Network
        .route("/api/secret/viewing-key", post(secret_viewing_key))
        .route("/api/secret/swap", post(secret_swap))
        .route("/api/secret/compute", post(secret_compute))
        .route("/api/secret/query", post(secret_query))
        .route("/api/secret/history", get(secret_history))
        // Intents
        .route("/api/intents/bridge", post(create_bridge_intent))
        .route("/api/intents/swap", post(create_swap_intent))
        .route("/api/intents/:intent_id", get(intent_status))
        .layer(cors)
        .with_state(state)
}

// ═══════════════════════════════════════════════════════════════════════════════
// STATUS
// ═══════════════════════════════════════════════════════════════════════════════

/// Health check endpoint.
async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": BRIDGE_VERSION
    }))
}

async fn status(State(state): State<AppState>) -> impl IntoResponse {
    let ai_mode = if state.config.near_ai.use_actual_api {
        "NEAR AI API"
    } else {
        "Simulation"
    };
    Json(json!({
        "message": "NEAR AI Bridge Agent is running",
        "version": BRIDGE_VERSION,
        "status": "operational",
        "aiMode": ai_mode
    }))
}

async fn detailed_status(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    Ok(Json(json!({
        "near": state.agent.status().await,
        "zcash": state.zcash.status(),
        "secret": state.secret.status(),
        "bridgeStatus": "operational"
    })))
}

#[derive(Debug, Deserialize)]
pub struct ValidateTokenRequest {
    #[serde(default)]
    pub token: Value,
}

/// Structural token check. Signatures are not verified.
async fn validate_token(ApiJson(req): ApiJson<ValidateTokenRequest>) -> impl IntoResponse {
    let invalid = |status: StatusCode| {
        (
            status,
            Json(json!({ "valid": false, "error": "Invalid token format" })),
        )
    };

    match req.token {
        Value::Null => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "valid": false, "error": "No token provided" })),
        ),
        Value::String(raw) if raw.is_empty() => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "valid": false, "error": "No token provided" })),
        ),
        Value::String(raw) => match validate_token_structure(&raw) {
            TokenValidation::Valid { account_id } => (
                StatusCode::OK,
                Json(json!({ "valid": true, "account_id": account_id })),
            ),
            TokenValidation::MissingFields => invalid(StatusCode::OK),
            TokenValidation::Malformed => invalid(StatusCode::BAD_REQUEST),
        },
        _ => invalid(StatusCode::BAD_REQUEST),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// AGENT
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
pub struct AgentActionRequest {
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub params: Value,
}

async fn agent_action(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<AgentActionRequest>,
) -> Result<Json<Value>, ApiError> {
    tracing::info!(action = %req.action, "received action request");
    let result = state.agent.process_action(&req.action, &req.params).await?;
    Ok(Json(json!({ "success": true, "result": result })))
}

async fn capabilities(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.agent.capabilities())
}

// ═══════════════════════════════════════════════════════════════════════════════
// ZCASH
// ═══════════════════════════════════════════════════════════════════════════════

async fn zcash_address(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let address = state.zcash.generate_address().await?;
    success_with(address)
}

async fn zcash_transfer(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<TransferRequest>,
) -> Result<Json<Value>, ApiError> {
    let receipt = state.zcash.transfer_assets(req).await?;
    to_json(receipt)
}

async fn zcash_shield(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<ShieldRequest>,
) -> Result<Json<Value>, ApiError> {
    let receipt = state.zcash.execute_shielded_transaction(req).await?;
    to_json(receipt)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZcashHistoryQuery {
    pub filter: Option<String>,
    pub account_id: Option<String>,
}

async fn zcash_history(
    State(state): State<AppState>,
    Query(query): Query<ZcashHistoryQuery>,
) -> Result<Json<Value>, ApiError> {
    let history = state
        .zcash
        .transaction_history(query.filter.as_deref(), query.account_id.as_deref())
        .await?;
    to_json(history)
}

// ═══════════════════════════════════════════════════════════════════════════════
// SECRET NETWORK
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
pub struct ViewingKeyRequest {
    pub address: Option<String>,
}

async fn secret_viewing_key(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<ViewingKeyRequest>,
) -> Result<Json<Value>, ApiError> {
    let address = require_address(req.address)?;
    let key = state.secret.generate_viewing_key(&address).await?;
    success_with(key)
}

async fn secret_swap(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<PrivateSwapRequest>,
) -> Result<Json<Value>, ApiError> {
    let receipt = state.secret.execute_private_swap(req).await?;
    to_json(receipt)
}

async fn secret_compute(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<PrivateComputeRequest>,
) -> Result<Json<Value>, ApiError> {
    let receipt = state.secret.execute_private_computation(req).await?;
    to_json(receipt)
}

async fn secret_query(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<ContractQueryRequest>,
) -> Result<Json<Value>, ApiError> {
    let receipt = state.secret.query_encrypted_contract(req).await?;
    to_json(receipt)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretHistoryQuery {
    pub filter: Option<String>,
    pub address: Option<String>,
    pub viewing_key: Option<String>,
}

async fn secret_history(
    State(state): State<AppState>,
    Query(query): Query<SecretHistoryQuery>,
) -> Result<Json<Value>, ApiError> {
    let address = require_address(query.address)?;
    let history = state
        .secret
        .private_transaction_history(query.filter.as_deref(), &address, query.viewing_key.as_deref())
        .await?;
    to_json(history)
}

fn require_address(address: Option<String>) -> Result<String, ApiError> {
    address
        .filter(|a| !a.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("Address is required"))
}

// ═══════════════════════════════════════════════════════════════════════════════
// INTENTS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeIntentBody {
    pub target_chain: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub amount: Option<String>,
    pub receiver_address: Option<String>,
    pub shielded: Option<bool>,
    pub encrypted: Option<bool>,
}

async fn create_bridge_intent(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<BridgeIntentBody>,
) -> Result<Json<Value>, ApiError> {
    if state.intents.account_id().is_none() {
        return Err(BridgeError::Unauthenticated(NOT_SIGNED_IN.to_string()).into());
    }
    let target_chain: TargetChain = body.target_chain.as_deref().unwrap_or_default().parse()?;
    let request = BridgeIntentRequest {
        target_chain,
        amount: body.amount.unwrap_or_default(),
        receiver_address: body.receiver_address.unwrap_or_default(),
        private: body.shielded.or(body.encrypted).unwrap_or(false),
    };
    let receipt = state.intents.create_bridge_intent(request).await?;
    success_with(receipt)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapIntentBody {
    pub from_token: Option<String>,
    pub to_token: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub amount: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub min_amount_out: Option<String>,
    pub privacy_level: Option<String>,
}

async fn create_swap_intent(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<SwapIntentBody>,
) -> Result<Json<Value>, ApiError> {
    if state.intents.account_id().is_none() {
        return Err(BridgeError::Unauthenticated(NOT_SIGNED_IN.to_string()).into());
    }
    let privacy_level = body.privacy_level.as_deref().map(PrivacyLevel::from_tag);
    let request = SwapIntentRequest {
        from_token: body.from_token.unwrap_or_default(),
        to_token: body.to_token.unwrap_or_default(),
        amount: body.amount.unwrap_or_default(),
        min_amount_out: body.min_amount_out,
        privacy_level,
    };
    let receipt = state.intents.create_swap_intent(request).await?;
    success_with(receipt)
}

async fn intent_status(
    State(state): State<AppState>,
    Path(intent_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let snapshot = state.intents.query_intent_status(&intent_id).await?;
    success_with(snapshot)
}

// ═══════════════════════════════════════════════════════════════════════════════
// RESPONSES
// ═══════════════════════════════════════════════════════════════════════════════

fn to_json<T: Serialize>(body: T) -> Result<Json<Value>, ApiError> {
    Ok(Json(serde_json::to_value(body).map_err(BridgeError::from)?))
}

/// `{success: true, ...body}`.
fn success_with<T: Serialize>(body: T) -> Result<Json<Value>, ApiError> {
    let mut value = serde_json::to_value(body).map_err(BridgeError::from)?;
    if let Value::Object(map) = &mut value {
        map.insert("success".to_string(), Value::Bool(true));
    }
    Ok(Json(value))
}

/// JSON body extractor whose rejections use the `{success: false, error}` envelope.
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// API error type.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let body = json!({
            "success": false,
            "error": self.message,
        });
        (self.status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "request body rejected");
        ApiError {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<BridgeError> for ApiError {
    fn from(err: BridgeError) -> Self {
        let status = match &err {
            BridgeError::Validation(_) | BridgeError::UnknownAction(_) => StatusCode::BAD_REQUEST,
            BridgeError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            BridgeError::NotInitialized(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!(error = %err, "request failed");
        } else {
            tracing::debug!(error = %err, "request rejected");
        }
        ApiError {
            status,
            message: err.to_string(),
        }
    }
}
