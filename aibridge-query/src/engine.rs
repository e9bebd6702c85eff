//! Live-or-simulated query execution.

use std::sync::Arc;

use serde_json::Value;

use aibridge_common::NearAiConfig;

use crate::auth::AuthToken;
use crate::backend::{LiveAnalysisRequest, LiveQueryRequest, NearAiBackend};
use crate::error::BackendError;
use crate::simulation::{simulate_analysis, simulate_query, simulated_models};
use crate::types::{AnalysisResult, ModelDescriptor, Outcome, QueryResult, RecoveryPath};
use crate::{LIVE_MAX_TOKENS, LIVE_TEMPERATURE};

const ANALYSIS_TYPE: &str = "comprehensive";

/// Runs queries against NEAR AI when authorized, otherwise simulates them.
///
/// The live/simulated decision is made on every call: the live backend is
/// used only while a token is set and the live flag is on. A failed live call
/// never reaches the caller; it is answered by the simulation and reported as
/// [`Outcome::Recovered`].
pub struct ResilientQueryEngine {
    backend: Arc<dyn NearAiBackend>,
    live_enabled: bool,
    auth_token: Option<AuthToken>,
    model: String,
}

impl ResilientQueryEngine {
    pub fn new(backend: Arc<dyn NearAiBackend>, config: &NearAiConfig) -> Self {
        tracing::info!(
            backend = backend.id(),
            live_enabled = config.use_actual_api,
            "query engine created"
        );
        Self {
            backend,
            live_enabled: config.use_actual_api,
            auth_token: None,
            model: config.effective_model().to_string(),
        }
    }

    /// Install or clear the auth token. Clearing it forces simulation.
    pub fn set_auth_token(&mut self, token: Option<AuthToken>) {
        match &token {
            Some(t) => tracing::info!(
                account_id = t.account_id(),
                provenance = t.provenance(),
                "auth token installed"
            ),
            None => tracing::info!("auth token cleared, query engine is simulation-only"),
        }
        self.auth_token = token;
    }

    pub fn auth_token(&self) -> Option<&AuthToken> {
        self.auth_token.as_ref()
    }

    /// Whether the next call would go to the live backend.
    pub fn is_live(&self) -> bool {
        self.live_token().is_some()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn live_token(&self) -> Option<&AuthToken> {
        if self.live_enabled {
            self.auth_token.as_ref()
        } else {
            None
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // OPERATIONS
    // ═══════════════════════════════════════════════════════════════════════════════

    pub async fn process_query(&self, prompt: &str) -> Outcome<QueryResult> {
        let Some(token) = self.live_token() else {
            return Outcome::Simulated(simulate_query(prompt));
        };

        let request = LiveQueryRequest {
            prompt: prompt.to_string(),
            model: self.model.clone(),
            max_tokens: LIVE_MAX_TOKENS,
            temperature: LIVE_TEMPERATURE,
        };

        match self.backend.query(token, &request).await {
            Ok(body) => Outcome::Live(QueryResult::from_live(body, &self.model)),
            Err(err) => recover("query", err, || simulate_query(prompt)),
        }
    }

    pub async fn analyze_data(&self, data: &Value) -> Outcome<AnalysisResult> {
        let Some(token) = self.live_token() else {
            return Outcome::Simulated(simulate_analysis(data));
        };

        let request = LiveAnalysisRequest {
            data: data.clone(),
            model: self.model.clone(),
            analysis_type: ANALYSIS_TYPE.to_string(),
        };

        match self.backend.analyze(token, &request).await {
            Ok(body) => Outcome::Live(AnalysisResult::from_live(body, &self.model)),
            Err(err) => recover("analysis", err, || simulate_analysis(data)),
        }
    }

    pub async fn get_models(&self) -> Outcome<Vec<ModelDescriptor>> {
        let Some(token) = self.live_token() else {
            return Outcome::Simulated(simulated_models());
        };

        match self.backend.list_models(token).await {
            Ok(body) => Outcome::Live(ModelDescriptor::list_from_live(&body)),
            Err(err) => recover("model listing", err, simulated_models),
        }
    }
}

fn recover<T>(operation: &str, err: BackendError, simulate: impl FnOnce() -> T) -> Outcome<T> {
    tracing::warn!(operation, error = %err, "NEAR AI call failed, falling back to simulation");
    Outcome::Recovered {
        result: simulate(),
        via: RecoveryPath::Simulation,
        cause: err.to_string(),
    }
}
