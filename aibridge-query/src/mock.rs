//! Mock NEAR AI backend for testing.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::auth::AuthToken;
use crate::backend::{LiveAnalysisRequest, LiveQueryRequest, NearAiBackend};
use crate::error::BackendError;

/// Backend with canned replies and a call counter.
pub struct MockBackend {
    available: AtomicBool,
    query_reply: Value,
    analysis_reply: Value,
    models_reply: Value,
    call_count: AtomicU32,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            available: AtomicBool::new(true),
            query_reply: json!({"text": "Mock response", "model": "mock-model"}),
            analysis_reply: json!({
                "summary": "Mock analysis",
                "insights": ["mock insight"],
                "recommendations": [],
                "model": "mock-model"
            }),
            models_reply: json!({"models": [{"id": "mock-model", "name": "Mock Model"}]}),
            call_count: AtomicU32::new(0),
        }
    }

    pub fn with_query_reply(mut self, reply: Value) -> Self {
        self.query_reply = reply;
        self
    }

    pub fn with_analysis_reply(mut self, reply: Value) -> Self {
        self.analysis_reply = reply;
        self
    }

    /// When unavailable every call fails with a request error.
    pub fn with_available(self, available: bool) -> Self {
        self.available.store(available, Ordering::SeqCst);
        self
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Number of backend calls made so far.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::SeqCst)
    }

    fn reply(&self, value: &Value) -> Result<Value, BackendError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if !self.available.load(Ordering::SeqCst) {
            return Err(BackendError::Request("mock backend disabled".to_string()));
        }
        Ok(value.clone())
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NearAiBackend for MockBackend {
    fn id(&self) -> &str {
        "mock"
    }

    async fn query(&self, _: &AuthToken, _: &LiveQueryRequest) -> Result<Value, BackendError> {
        self.reply(&self.query_reply)
    }

    async fn analyze(
        &self,
        _: &AuthToken,
        _: &LiveAnalysisRequest,
    ) -> Result<Value, BackendError> {
        self.reply(&self.analysis_reply)
    }

    async fn list_models(&self, _: &AuthToken) -> Result<Value, BackendError> {
        self.reply(&self.models_reply)
    }
}
