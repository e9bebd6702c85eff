//! Agent service: initialization state machine and action dispatch.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;

use aibridge_chains::NearConnection;
use aibridge_common::{iso_timestamp, BridgeError, NearAiConfig, NearConfig, BRIDGE_VERSION};
use aibridge_query::{
    AuthTokenProvisioner, HttpNearAiBackend, NearAiBackend, Outcome, ResilientQueryEngine,
    SIMULATION_MODEL,
};

use crate::action::{AgentAction, TransactParams, TransactionReceipt};
use crate::manifest::{capabilities, CapabilityManifest};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AiMode {
    #[serde(rename = "api")]
    Live,
    #[serde(rename = "simulation")]
    Simulated,
}

/// Uninitialized → Initializing → Ready(mode).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InitState {
    Uninitialized,
    Initializing,
    Ready(AiMode),
}

// ═══════════════════════════════════════════════════════════════════════════════
// STATUS REPORT
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AgentInfo {
    pub version: String,
    pub status: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearInfo {
    pub network: String,
    pub connected: bool,
    pub account_configured: bool,
    /// Configured account's balance in NEAR, read from the node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_balance: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiInfo {
    pub mode: AiMode,
    pub api_configured: bool,
    pub model: String,
    pub auth_configured: bool,
    pub available_models: Vec<String>,
    pub account_id: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AgentStatus {
    pub agent: AgentInfo,
    pub near: NearInfo,
    pub ai: AiInfo,
    pub timestamp: String,
}

// ═══════════════════════════════════════════════════════════════════════════════
// AGENT SERVICE
// ═══════════════════════════════════════════════════════════════════════════════

pub struct AgentService {
    near_config: NearConfig,
    ai_config: NearAiConfig,
    near: Option<NearConnection>,
    provisioner: AuthTokenProvisioner,
    engine: RwLock<ResilientQueryEngine>,
    state: RwLock<InitState>,
}

impl AgentService {
    pub fn new(
        near_config: &NearConfig,
        ai_config: &NearAiConfig,
        backend: Arc<dyn NearAiBackend>,
    ) -> Self {
        let near = match NearConnection::new(near_config) {
            Ok(connection) => Some(connection),
            Err(err) => {
                tracing::warn!(error = %err, "could not build NEAR connection");
                None
            }
        };

        Self {
            near_config: near_config.clone(),
            ai_config: ai_config.clone(),
            near,
            provisioner: AuthTokenProvisioner::new(ai_config),
            engine: RwLock::new(ResilientQueryEngine::new(backend, ai_config)),
            state: RwLock::new(InitState::Uninitialized),
        }
    }

    /// Service talking to the NEAR AI HTTP API.
    pub fn with_http_backend(
        near_config: &NearConfig,
        ai_config: &NearAiConfig,
    ) -> Result<Self, BridgeError> {
        let backend = HttpNearAiBackend::new(ai_config)?;
        Ok(Self::new(near_config, ai_config, Arc::new(backend)))
    }

    pub async fn state(&self) -> InitState {
        *self.state.read().await
    }

    /// Current AI mode. Simulated until initialization completes.
    pub async fn mode(&self) -> AiMode {
        match self.state().await {
            InitState::Ready(mode) => mode,
            _ => AiMode::Simulated,
        }
    }

    pub fn near(&self) -> Option<&NearConnection> {
        self.near.as_ref()
    }

    /// Connect to NEAR and provision the AI token. Never fails: problems are
    /// logged and the agent ends up ready in simulation mode.
    pub async fn initialize(&self) -> AiMode {
        {
            let mut state = self.state.write().await;
            if let InitState::Ready(mode) = *state {
                return mode;
            }
            *state = InitState::Initializing;
        }

        match &self.near {
            Some(near) => match near.connect().await {
                Ok(()) => tracing::info!("agent service connected to NEAR"),
                Err(err) => {
                    tracing::warn!(error = %err, "NEAR connection failed, continuing with limited functionality")
                }
            },
            None => tracing::warn!("no NEAR connection available"),
        }

        let mut engine = self.engine.write().await;
        if self.ai_config.use_actual_api {
            let token = self.provisioner.provision_token(
                &self.near_config,
                self.near_config.account_id.as_deref(),
                self.near_config.private_key.as_deref(),
            );
            if token.is_none() {
                tracing::info!("no NEAR AI auth token, falling back to simulation mode");
            }
            engine.set_auth_token(token);
        } else {
            tracing::info!("NEAR AI API integration is disabled (USE_ACTUAL_API=false)");
        }

        let mode = if engine.is_live() {
            AiMode::Live
        } else {
            AiMode::Simulated
        };
        drop(engine);

        *self.state.write().await = InitState::Ready(mode);
        tracing::info!(mode = ?mode, "agent service ready");
        mode
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // DISPATCH
    // ═══════════════════════════════════════════════════════════════════════════════

    /// Run a named action.
    pub async fn process_action(&self, name: &str, params: &Value) -> Result<Value, BridgeError> {
        let action = AgentAction::parse(name, params)?;
        tracing::debug!(action = action.name(), "processing action");

        match action {
            AgentAction::Query { prompt } => {
                let outcome = self.engine.read().await.process_query(&prompt).await;
                log_recovery("query", &outcome);
                Ok(serde_json::to_value(outcome.into_inner())?)
            }
            AgentAction::Analyze { data } => {
                let outcome = self.engine.read().await.analyze_data(&data).await;
                log_recovery("analyze", &outcome);
                Ok(serde_json::to_value(outcome.into_inner())?)
            }
            AgentAction::Transact(params) => Ok(serde_json::to_value(self.transact(&params))?),
            AgentAction::Status => Ok(serde_json::to_value(self.status().await)?),
        }
    }

    /// Transactions are never submitted; the receipt is always simulated.
    pub fn transact(&self, params: &TransactParams) -> TransactionReceipt {
        tracing::info!(
            contract = ?params.contract_id,
            method = ?params.method,
            "processing transaction"
        );
        if self.near_config.has_credentials() {
            tracing::info!("real transaction submission is not implemented, returning a simulated receipt");
        }
        TransactionReceipt::simulated()
    }

    pub async fn status(&self) -> AgentStatus {
        let account_balance = self.account_balance().await;
        let mode = self.mode().await;
        let engine = self.engine.read().await;
        let authorized = engine.auth_token().is_some();

        let available_models = match mode {
            AiMode::Live => engine
                .get_models()
                .await
                .into_inner()
                .iter()
                .map(|m| m.label().to_string())
                .collect(),
            AiMode::Simulated => vec![SIMULATION_MODEL.to_string()],
        };

        AgentStatus {
            agent: AgentInfo {
                version: BRIDGE_VERSION.to_string(),
                status: "operational".to_string(),
            },
            near: NearInfo {
                network: self.near_config.network.to_string(),
                connected: self.near.as_ref().map_or(false, NearConnection::is_connected),
                account_configured: self.near_config.account_id.is_some(),
                account_balance,
            },
            ai: AiInfo {
                mode,
                api_configured: authorized,
                model: self
                    .ai_config
                    .model
                    .clone()
                    .unwrap_or_else(|| SIMULATION_MODEL.to_string()),
                auth_configured: authorized,
                available_models,
                account_id: self
                    .near_config
                    .account_id
                    .clone()
                    .unwrap_or_else(|| "none".to_string()),
            },
            timestamp: iso_timestamp(),
        }
    }

    async fn account_balance(&self) -> Option<String> {
        let near = self.near.as_ref().filter(|near| near.is_connected())?;
        let account_id = self.near_config.account_id.as_deref()?;
        match near.view_account(account_id).await {
            Ok(balance) => Some(balance.total),
            Err(err) => {
                tracing::debug!(account_id, error = %err, "could not read account balance");
                None
            }
        }
    }

    pub fn capabilities(&self) -> CapabilityManifest {
        capabilities(self.ai_config.use_actual_api)
    }
}

fn log_recovery<T>(action: &str, outcome: &Outcome<T>) {
    if let Outcome::Recovered { cause, .. } = outcome {
        tracing::warn!(action, cause = %cause, "answered from simulation after live failure");
    }
}
