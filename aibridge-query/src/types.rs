//! Result types shared by the live and simulated paths.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use aibridge_common::iso_timestamp;

const LIVE_QUERY_DEFAULT_CONFIDENCE: f64 = 0.9;
const LIVE_ANALYSIS_DEFAULT_CONFIDENCE: f64 = 0.85;
const LIVE_ANALYSIS_DEFAULT_SUMMARY: &str = "Analysis completed";

// ═══════════════════════════════════════════════════════════════════════════════
// QUERY RESULT
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseKind {
    Text,
}

/// Answer to a natural-language query.
///
/// Live and simulated answers have the same field set. `raw_response` is
/// `null` for simulated answers and only the `model` tag tells them apart.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    #[serde(rename = "type")]
    pub kind: ResponseKind,
    pub content: String,
    pub confidence: f64,
    pub timestamp: String,
    pub model: String,
    pub raw_response: Option<Value>,
}

impl QueryResult {
    /// Map a `/v1/query` reply body.
    pub fn from_live(body: Value, default_model: &str) -> Self {
        let content = ["text", "response", "content"]
            .iter()
            .find_map(|key| body.get(*key).and_then(Value::as_str))
            .unwrap_or_default()
            .to_string();

        Self {
            kind: ResponseKind::Text,
            content,
            confidence: positive_f64(&body, "confidence").unwrap_or(LIVE_QUERY_DEFAULT_CONFIDENCE),
            timestamp: iso_timestamp(),
            model: non_empty_str(&body, "model").unwrap_or(default_model).to_string(),
            raw_response: Some(body),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ANALYSIS RESULT
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub summary: String,
    pub insights: Vec<String>,
    pub recommendations: Vec<String>,
    pub confidence: f64,
    pub timestamp: String,
    pub model: String,
    pub raw_response: Option<Value>,
}

impl AnalysisResult {
    /// Map a `/v1/analysis` reply body.
    pub fn from_live(body: Value, default_model: &str) -> Self {
        Self {
            summary: non_empty_str(&body, "summary")
                .unwrap_or(LIVE_ANALYSIS_DEFAULT_SUMMARY)
                .to_string(),
            insights: string_list(&body, "insights"),
            recommendations: string_list(&body, "recommendations"),
            confidence: positive_f64(&body, "confidence")
                .unwrap_or(LIVE_ANALYSIS_DEFAULT_CONFIDENCE),
            timestamp: iso_timestamp(),
            model: non_empty_str(&body, "model").unwrap_or(default_model).to_string(),
            raw_response: Some(body),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// MODELS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl ModelDescriptor {
    /// Identifier shown in status reports: the id, or the name when the id is blank.
    pub fn label(&self) -> &str {
        if self.id.is_empty() {
            &self.name
        } else {
            &self.id
        }
    }

    /// Parse the `models` array of a `/v1/models` reply, skipping malformed entries.
    pub fn list_from_live(body: &Value) -> Vec<Self> {
        body.get("models")
            .and_then(Value::as_array)
            .map(|models| {
                models
                    .iter()
                    .filter_map(|m| serde_json::from_value(m.clone()).ok())
                    .collect()
            })
            .unwrap_or_default()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// OUTCOME
// ═══════════════════════════════════════════════════════════════════════════════

/// Local path used to recover from a failed live call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecoveryPath {
    Simulation,
}

/// Provenance of an engine result.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome<T> {
    /// Produced by the live backend.
    Live(T),
    /// Produced by the simulation because live mode was not enabled.
    Simulated(T),
    /// The live backend failed and the result came from the recovery path.
    Recovered {
        result: T,
        via: RecoveryPath,
        cause: String,
    },
}

impl<T> Outcome<T> {
    pub fn value(&self) -> &T {
        match self {
            Self::Live(v) | Self::Simulated(v) => v,
            Self::Recovered { result, .. } => result,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            Self::Live(v) | Self::Simulated(v) => v,
            Self::Recovered { result, .. } => result,
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, Self::Live(_))
    }

    pub fn is_recovered(&self) -> bool {
        matches!(self, Self::Recovered { .. })
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U> {
        match self {
            Self::Live(v) => Outcome::Live(f(v)),
            Self::Simulated(v) => Outcome::Simulated(f(v)),
            Self::Recovered { result, via, cause } => Outcome::Recovered {
                result: f(result),
                via,
                cause,
            },
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// HELPERS
// ═══════════════════════════════════════════════════════════════════════════════

fn non_empty_str<'a>(body: &'a Value, key: &str) -> Option<&'a str> {
    body.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

// A zero confidence is treated as absent.
fn positive_f64(body: &Value, key: &str) -> Option<f64> {
    body.get(key).and_then(Value::as_f64).filter(|c| *c > 0.0)
}

fn string_list(body: &Value, key: &str) -> Vec<String> {
    body.get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect()
        })
        .unwrap_or_default()
}
