//! NEAR JSON-RPC connection.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use aibridge_common::{format_near_amount, NearConfig};

use crate::error::RpcError;

const RPC_TIMEOUT: Duration = Duration::from_secs(10);

// ═══════════════════════════════════════════════════════════════════════════════
// NEAR CONNECTION
// ═══════════════════════════════════════════════════════════════════════════════

/// Handle to a NEAR RPC node.
pub struct NearConnection {
    config: NearConfig,
    client: reqwest::Client,
    connected: AtomicBool,
}

impl NearConnection {
    pub fn new(config: &NearConfig) -> Result<Self, RpcError> {
        let client = reqwest::Client::builder().timeout(RPC_TIMEOUT).build()?;
        Ok(Self {
            config: config.clone(),
            client,
            connected: AtomicBool::new(false),
        })
    }

    pub fn config(&self) -> &NearConfig {
        &self.config
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Check the node with a `status` call. The connection is marked
    /// connected only when the node answers.
    pub async fn connect(&self) -> Result<(), RpcError> {
        let status = self.rpc_call("status", json!([])).await;
        self.connected.store(status.is_ok(), Ordering::SeqCst);
        let status = status?;
        tracing::info!(
            network = %self.config.network,
            chain_id = status.get("chain_id").and_then(serde_json::Value::as_str).unwrap_or("unknown"),
            "connected to NEAR"
        );
        Ok(())
    }

    /// Balance and storage of `account_id` at final finality.
    pub async fn view_account(&self, account_id: &str) -> Result<AccountBalance, RpcError> {
        let result = self
            .rpc_call(
                "query",
                json!({
                    "request_type": "view_account",
                    "finality": "final",
                    "account_id": account_id
                }),
            )
            .await?;

        let view: AccountView =
            serde_json::from_value(result).map_err(|e| RpcError::Decode(e.to_string()))?;
        let yocto: u128 = view
            .amount
            .parse()
            .map_err(|_| RpcError::Decode(format!("invalid amount {}", view.amount)))?;

        Ok(AccountBalance {
            account_id: account_id.to_string(),
            total: format_near_amount(yocto),
            amount: view.amount,
            locked: view.locked,
            storage_usage: view.storage_usage,
        })
    }

    async fn rpc_call(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        let request = json!({
            "jsonrpc": "2.0",
            "id": "dontcare",
            "method": method,
            "params": params
        });

        tracing::debug!(method, node = %self.config.node_url, "NEAR rpc call");
        let response = self
            .client
            .post(&self.config.node_url)
            .json(&request)
            .send()
            .await?;

        let json: Value = response
            .json()
            .await
            .map_err(|e| RpcError::Decode(e.to_string()))?;

        if let Some(error) = json.get("error") {
            return Err(RpcError::Rpc(error.to_string()));
        }

        json.get("result").cloned().ok_or(RpcError::MissingResult)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// RPC TYPES
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
struct AccountView {
    amount: String,
    #[serde(default)]
    locked: String,
    #[serde(default)]
    storage_usage: u64,
}

/// Account balance, raw in yoctoNEAR plus `total` in NEAR.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountBalance {
    pub account_id: String,
    pub total: String,
    pub amount: String,
    pub locked: String,
    pub storage_usage: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn connection(server: &MockServer) -> NearConnection {
        let config = NearConfig {
            node_url: server.uri(),
            ..NearConfig::testnet()
        };
        NearConnection::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_connect_marks_connected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"method": "status"})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"jsonrpc": "2.0", "id": "dontcare", "result": {"chain_id": "testnet"}})),
            )
            .mount(&server)
            .await;

        let near = connection(&server);
        assert!(!near.is_connected());
        near.connect().await.unwrap();
        assert!(near.is_connected());
    }

    #[tokio::test]
    async fn test_unreachable_node_stays_disconnected() {
        let config = NearConfig {
            node_url: "http://127.0.0.1:9".into(),
            ..NearConfig::testnet()
        };
        let near = NearConnection::new(&config).unwrap();
        assert!(matches!(near.connect().await, Err(RpcError::Transport(_))));
        assert!(!near.is_connected());
    }

    #[tokio::test]
    async fn test_view_account() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"params": {"request_type": "view_account"}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": {
                    "amount": "2500000000000000000000000",
                    "locked": "0",
                    "storage_usage": 182,
                    "code_hash": "11111111111111111111111111111111"
                }
            })))
            .mount(&server)
            .await;

        let balance = connection(&server).view_account("alice.testnet").await.unwrap();
        assert_eq!(balance.total, "2.5");
        assert_eq!(balance.storage_usage, 182);
    }

    #[tokio::test]
    async fn test_rpc_error_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "error": {"name": "HANDLER_ERROR", "cause": {"name": "UNKNOWN_ACCOUNT"}}
            })))
            .mount(&server)
            .await;

        let err = connection(&server).view_account("ghost.testnet").await.unwrap_err();
        assert!(matches!(err, RpcError::Rpc(ref m) if m.contains("UNKNOWN_ACCOUNT")));
    }
}
