//! NEAR AI API backend.

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use aibridge_common::NearAiConfig;

use crate::auth::AuthToken;
use crate::error::BackendError;

pub const QUERY_ENDPOINT: &str = "/v1/query";
pub const ANALYSIS_ENDPOINT: &str = "/v1/analysis";
pub const MODELS_ENDPOINT: &str = "/v1/models";

/// Body of a live `/v1/query` call.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LiveQueryRequest {
    pub prompt: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Body of a live `/v1/analysis` call.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LiveAnalysisRequest {
    pub data: Value,
    pub model: String,
    pub analysis_type: String,
}

/// Remote AI provider.
///
/// Implementations return the raw reply body; mapping into result types is
/// done by the engine so every backend is shaped the same way.
#[async_trait]
pub trait NearAiBackend: Send + Sync {
    fn id(&self) -> &str;

    async fn query(&self, token: &AuthToken, request: &LiveQueryRequest)
        -> Result<Value, BackendError>;

    async fn analyze(
        &self,
        token: &AuthToken,
        request: &LiveAnalysisRequest,
    ) -> Result<Value, BackendError>;

    async fn list_models(&self, token: &AuthToken) -> Result<Value, BackendError>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// HTTP BACKEND
// ═══════════════════════════════════════════════════════════════════════════════

/// Backend talking to the NEAR AI HTTP API.
pub struct HttpNearAiBackend {
    client: Client,
    base_url: String,
}

impl HttpNearAiBackend {
    pub fn new(config: &NearAiConfig) -> Result<Self, BackendError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| BackendError::Request(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    fn bearer(token: &AuthToken) -> Result<String, BackendError> {
        let json = token
            .to_json()
            .map_err(|e| BackendError::Parse(e.to_string()))?;
        Ok(format!("Bearer {}", json))
    }

    async fn read_json(response: reqwest::Response) -> Result<Value, BackendError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| BackendError::Parse(e.to_string()))
    }
}

#[async_trait]
impl NearAiBackend for HttpNearAiBackend {
    fn id(&self) -> &str {
        &self.base_url
    }

    async fn query(
        &self,
        token: &AuthToken,
        request: &LiveQueryRequest,
    ) -> Result<Value, BackendError> {
        tracing::debug!(model = %request.model, "NEAR AI query");
        let response = self
            .client
            .post(self.url(QUERY_ENDPOINT))
            .header(header::AUTHORIZATION, Self::bearer(token)?)
            .json(request)
            .send()
            .await?;
        Self::read_json(response).await
    }

    async fn analyze(
        &self,
        token: &AuthToken,
        request: &LiveAnalysisRequest,
    ) -> Result<Value, BackendError> {
        tracing::debug!(model = %request.model, "NEAR AI analysis");
        let response = self
            .client
            .post(self.url(ANALYSIS_ENDPOINT))
            .header(header::AUTHORIZATION, Self::bearer(token)?)
            .json(request)
            .send()
            .await?;
        Self::read_json(response).await
    }

    async fn list_models(&self, token: &AuthToken) -> Result<Value, BackendError> {
        let response = self
            .client
            .get(self.url(MODELS_ENDPOINT))
            .header(header::AUTHORIZATION, Self::bearer(token)?)
            .send()
            .await?;
        Self::read_json(response).await
    }
}
