//! Agent action vocabulary.

use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use aibridge_common::{current_timestamp_millis, to_base36, BridgeError};

use crate::SIMULATED_TX_NOTE;

const MAX_SIMULATED_GAS: u64 = 10_000_000;

/// A parsed `/agent/action` request.
#[derive(Clone, Debug, PartialEq)]
pub enum AgentAction {
    Query { prompt: String },
    Transact(TransactParams),
    Analyze { data: Value },
    Status,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactParams {
    pub contract_id: Option<String>,
    pub method: Option<String>,
    #[serde(default)]
    pub args: Value,
}

impl AgentAction {
    /// Parse an action name and its parameters.
    pub fn parse(name: &str, params: &Value) -> Result<Self, BridgeError> {
        match name {
            "query" => params
                .get("prompt")
                .and_then(Value::as_str)
                .filter(|p| !p.trim().is_empty())
                .map(|prompt| AgentAction::Query {
                    prompt: prompt.to_string(),
                })
                .ok_or_else(|| BridgeError::validation("Prompt is required")),
            "analyze" => match params.get("data") {
                Some(data) if !data.is_null() => Ok(AgentAction::Analyze { data: data.clone() }),
                _ => Err(BridgeError::validation("Data is required")),
            },
            "transact" => {
                let params = if params.is_null() {
                    TransactParams::default()
                } else {
                    serde_json::from_value(params.clone()).map_err(|e| {
                        BridgeError::validation(format!("Invalid transact params: {}", e))
                    })?
                };
                Ok(AgentAction::Transact(params))
            }
            "status" => Ok(AgentAction::Status),
            other => Err(BridgeError::UnknownAction(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AgentAction::Query { .. } => "query",
            AgentAction::Transact(_) => "transact",
            AgentAction::Analyze { .. } => "analyze",
            AgentAction::Status => "status",
        }
    }
}

/// Receipt for a `transact` action. Always simulated.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub success: bool,
    pub tx_hash: String,
    pub gas_used: u64,
    pub status: String,
    pub note: String,
}

impl TransactionReceipt {
    pub fn simulated() -> Self {
        Self {
            success: true,
            tx_hash: format!("simulated_tx_{}", to_base36(current_timestamp_millis())),
            gas_used: rand::thread_rng().gen_range(0..MAX_SIMULATED_GAS),
            status: "SuccessValue".to_string(),
            note: SIMULATED_TX_NOTE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_vocabulary() {
        let query = AgentAction::parse("query", &json!({"prompt": "hi"})).unwrap();
        assert_eq!(query, AgentAction::Query { prompt: "hi".into() });
        assert_eq!(AgentAction::parse("status", &Value::Null).unwrap(), AgentAction::Status);

        let transact = AgentAction::parse(
            "transact",
            &json!({"contractId": "c.testnet", "method": "ping", "args": {"a": 1}}),
        )
        .unwrap();
        match transact {
            AgentAction::Transact(p) => {
                assert_eq!(p.contract_id.as_deref(), Some("c.testnet"));
                assert_eq!(p.args["a"], 1);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_parse_errors() {
        let err = AgentAction::parse("dance", &json!({})).unwrap_err();
        assert!(matches!(err, BridgeError::UnknownAction(_)));
        assert_eq!(err.to_string(), "Unknown action: dance");

        assert_eq!(
            AgentAction::parse("query", &json!({})).unwrap_err().to_string(),
            "Prompt is required"
        );
        assert_eq!(
            AgentAction::parse("analyze", &json!({"data": null})).unwrap_err().to_string(),
            "Data is required"
        );
    }

    #[test]
    fn test_simulated_receipt() {
        let receipt = TransactionReceipt::simulated();
        assert!(receipt.tx_hash.starts_with("simulated_tx_"));
        assert!(receipt.gas_used < 10_000_000);
        assert_eq!(receipt.status, "SuccessValue");
    }
}
