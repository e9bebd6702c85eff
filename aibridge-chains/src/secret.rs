//! Simulated Secret Network service: viewing keys, private swaps, TEE
//! computation and encrypted contract queries.

use async_trait::async_trait;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use aibridge_common::{
    current_timestamp_millis, iso_timestamp, iso_timestamp_ago, BridgeError, SecretConfig,
    ServiceStatus,
};

use crate::executor::{
    is_valid_viewing_key, random_base36, random_fixed, require_positive_amount,
    require_present, string_or_number, ChainOperationExecutor, HistoryFilter, InitGate,
};
use crate::VIEWING_KEY_PREFIX;

const SERVICE_NAME: &str = "Secret Network";
const DEFAULT_GAS_USED: u64 = 50_000;
const VIEWING_KEY_RANDOM_LEN: usize = 22;
const HOUR_MS: i64 = 3_600_000;

// ═══════════════════════════════════════════════════════════════════════════════
// VIEWING KEYS & SWAPS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewingKey {
    pub address: String,
    pub viewing_key: String,
    pub created: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivateSwapRequest {
    pub from_chain: Option<String>,
    pub to_chain: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub amount: Option<String>,
    pub from_address: Option<String>,
    pub to_address: Option<String>,
    #[serde(default)]
    pub use_privacy: bool,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivateSwapReceipt {
    pub success: bool,
    pub transaction_id: String,
    pub from_chain: Option<String>,
    pub to_chain: Option<String>,
    pub amount: String,
    pub from_address: Option<String>,
    pub to_address: String,
    pub privacy_level: String,
    pub status: String,
    pub estimated_completion_time: String,
    pub timestamp: String,
}

// ═══════════════════════════════════════════════════════════════════════════════
// TEE COMPUTATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Computation kinds run inside the enclave. Unrecognized tags run as a
/// generic sealed computation rather than failing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PrivacyComputation {
    ZeroKnowledgeProof,
    PrivateAnalytics,
    ConfidentialBridge,
    Other(String),
}

impl PrivacyComputation {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "zero-knowledge-proof" => PrivacyComputation::ZeroKnowledgeProof,
            "private-analytics" => PrivacyComputation::PrivateAnalytics,
            "confidential-bridge" => PrivacyComputation::ConfidentialBridge,
            other => PrivacyComputation::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            PrivacyComputation::ZeroKnowledgeProof => "zero-knowledge-proof",
            PrivacyComputation::PrivateAnalytics => "private-analytics",
            PrivacyComputation::ConfidentialBridge => "confidential-bridge",
            PrivacyComputation::Other(tag) => tag,
        }
    }

    fn run(&self) -> ComputationOutput {
        let mut rng = rand::thread_rng();
        match self {
            PrivacyComputation::ZeroKnowledgeProof => ComputationOutput::Proof {
                proof: format!("proof_{}", random_base36(13)),
                verified: true,
                encrypted_result: true,
            },
            PrivacyComputation::PrivateAnalytics => ComputationOutput::Analytics {
                aggregated_data: AggregatedData {
                    total_transactions: rng.gen_range(0..1000),
                    average_amount: random_fixed(100.0, 2),
                    top_destinations: vec!["NEAR".into(), "Zcash".into(), "Ethereum".into()],
                },
                privacy_preserving: true,
            },
            PrivacyComputation::ConfidentialBridge => ComputationOutput::Bridge {
                bridge_status: "success".to_string(),
                encrypted_transfers: rng.gen_range(1..=5),
                completion_time: "3.2 seconds".to_string(),
            },
            PrivacyComputation::Other(_) => ComputationOutput::Sealed {
                status: "completed".to_string(),
                encrypted_output: format!("sealed_data_{}", current_timestamp_millis()),
            },
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivateComputeRequest {
    pub computation_type: Option<String>,
    pub input_data: Option<Value>,
    pub gas_limit: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedData {
    pub total_transactions: u32,
    pub average_amount: String,
    pub top_destinations: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ComputationOutput {
    #[serde(rename_all = "camelCase")]
    Proof {
        proof: String,
        verified: bool,
        encrypted_result: bool,
    },
    #[serde(rename_all = "camelCase")]
    Analytics {
        aggregated_data: AggregatedData,
        privacy_preserving: bool,
    },
    #[serde(rename_all = "camelCase")]
    Bridge {
        bridge_status: String,
        encrypted_transfers: u32,
        completion_time: String,
    },
    #[serde(rename_all = "camelCase")]
    Sealed {
        status: String,
        encrypted_output: String,
    },
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputeReceipt {
    pub success: bool,
    pub computation_type: String,
    pub transaction_id: String,
    #[serde(rename = "executedInTEE")]
    pub executed_in_tee: bool,
    pub gas_used: u64,
    pub result: ComputationOutput,
    pub timestamp: String,
}

// ═══════════════════════════════════════════════════════════════════════════════
// CONTRACT QUERIES
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContractQuery {
    GetBalance,
    GetBridgeStatus,
    GetPrivateTransactions,
    Other(String),
}

impl ContractQuery {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "getBalance" => ContractQuery::GetBalance,
            "getBridgeStatus" => ContractQuery::GetBridgeStatus,
            "getPrivateTransactions" => ContractQuery::GetPrivateTransactions,
            other => ContractQuery::Other(other.to_string()),
        }
    }

    fn answer(&self) -> ContractQueryResult {
        let now = current_timestamp_millis() as i64;
        match self {
            ContractQuery::GetBalance => ContractQueryResult::Balance {
                balance: random_fixed(100.0, 6),
                denom: "SCRT".to_string(),
                viewing_key_valid: true,
            },
            ContractQuery::GetBridgeStatus => ContractQueryResult::BridgeStatus {
                is_active: true,
                total_locked: random_fixed(10_000.0, 2),
                supported_tokens: ["SCRT", "NEAR", "sZEC", "ETH"].map(String::from).to_vec(),
                last_bridge_operation: iso_timestamp(),
            },
            ContractQuery::GetPrivateTransactions => {
                let statuses = ["completed", "pending", "completed", "completed", "failed"];
                let transactions = statuses
                    .iter()
                    .enumerate()
                    .map(|(i, status)| PrivateTransaction {
                        id: format!("tx_{}", now - i as i64 * 100_000),
                        amount: random_fixed(10.0, 4),
                        timestamp: iso_timestamp_ago(i as i64 * HOUR_MS),
                        status: status.to_string(),
                    })
                    .collect();
                ContractQueryResult::PrivateTransactions {
                    transactions,
                    encrypted_data: true,
                    viewable_with_key: true,
                }
            }
            ContractQuery::Other(_) => ContractQueryResult::Processed {
                status: "query_processed".to_string(),
                data: "encrypted_data_returned".to_string(),
            },
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractQueryRequest {
    pub contract_address: Option<String>,
    pub query: Option<String>,
    pub viewing_key: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PrivateTransaction {
    pub id: String,
    pub amount: String,
    pub timestamp: String,
    pub status: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ContractQueryResult {
    #[serde(rename_all = "camelCase")]
    Balance {
        balance: String,
        denom: String,
        viewing_key_valid: bool,
    },
    #[serde(rename_all = "camelCase")]
    BridgeStatus {
        is_active: bool,
        total_locked: String,
        supported_tokens: Vec<String>,
        last_bridge_operation: String,
    },
    #[serde(rename_all = "camelCase")]
    PrivateTransactions {
        transactions: Vec<PrivateTransaction>,
        encrypted_data: bool,
        viewable_with_key: bool,
    },
    Processed {
        status: String,
        data: String,
    },
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractQueryReceipt {
    pub success: bool,
    pub contract_address: String,
    pub query_type: String,
    pub result: ContractQueryResult,
    #[serde(rename = "executedInTEE")]
    pub executed_in_tee: bool,
    pub timestamp: String,
}

// ═══════════════════════════════════════════════════════════════════════════════
// HISTORY
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SecretHistoryCategory {
    NearToSecret,
    SecretToZcash,
    PrivateComputation,
}

impl HistoryFilter<SecretHistoryCategory> {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "all" => HistoryFilter::All,
            "near-to-secret" => HistoryFilter::Only(SecretHistoryCategory::NearToSecret),
            "secret-to-zcash" => HistoryFilter::Only(SecretHistoryCategory::SecretToZcash),
            "private-computation" => HistoryFilter::Only(SecretHistoryCategory::PrivateComputation),
            _ => HistoryFilter::Unrecognized,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretHistoryEntry {
    pub date: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub computation_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_fee: Option<String>,
    pub status: String,
    pub encrypted: bool,
    pub tx_id: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicHistoryData {
    pub transaction_count: u32,
    pub last_transaction: String,
}

/// History behind the viewing key gate: full entries with a valid key,
/// aggregate public data otherwise.
#[derive(Clone, Debug, Serialize)]
#[serde(untagged)]
pub enum SecretHistory {
    #[serde(rename_all = "camelCase")]
    Disclosed {
        success: bool,
        transactions: Vec<SecretHistoryEntry>,
        filter_type: String,
        address: String,
        viewing_key_valid: bool,
        privacy_level: String,
    },
    #[serde(rename_all = "camelCase")]
    Redacted {
        success: bool,
        error: String,
        public_data: PublicHistoryData,
    },
}

impl SecretHistory {
    pub fn is_disclosed(&self) -> bool {
        matches!(self, SecretHistory::Disclosed { .. })
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// EXECUTOR
// ═══════════════════════════════════════════════════════════════════════════════

pub struct SecretExecutor {
    config: SecretConfig,
    gate: InitGate,
}

impl SecretExecutor {
    pub fn new(config: SecretConfig) -> Self {
        tracing::debug!(network = %config.network, node = %config.node_url, "Secret Network executor created");
        let gate = InitGate::new(config.simulated_latency);
        Self { config, gate }
    }

    pub async fn generate_viewing_key(&self, address: &str) -> Result<ViewingKey, BridgeError> {
        self.ensure_initialized()?;
        Ok(ViewingKey {
            address: address.to_string(),
            viewing_key: format!("{}{}", VIEWING_KEY_PREFIX, random_base36(VIEWING_KEY_RANDOM_LEN)),
            created: iso_timestamp(),
        })
    }

    pub async fn execute_private_swap(
        &self,
        request: PrivateSwapRequest,
    ) -> Result<PrivateSwapReceipt, BridgeError> {
        self.ensure_initialized()?;
        let amount = require_positive_amount(request.amount.as_deref())?;
        let to_address = require_present(request.to_address.as_deref(), "Recipient address is required")?;

        tracing::info!(
            amount = %amount,
            from = ?request.from_chain,
            to = ?request.to_chain,
            privacy = request.use_privacy,
            "executing private swap"
        );
        self.gate.pause().await;

        let privacy_level = if request.use_privacy { "maximum" } else { "standard" };
        Ok(PrivateSwapReceipt {
            success: true,
            transaction_id: format!("secret_tx_{}", current_timestamp_millis()),
            from_chain: request.from_chain,
            to_chain: request.to_chain,
            amount,
            from_address: request.from_address,
            to_address,
            privacy_level: privacy_level.to_string(),
            status: "pending".to_string(),
            estimated_completion_time: "2-5 minutes".to_string(),
            timestamp: iso_timestamp(),
        })
    }

    pub async fn execute_private_computation(
        &self,
        request: PrivateComputeRequest,
    ) -> Result<ComputeReceipt, BridgeError> {
        self.ensure_initialized()?;
        let tag = require_present(request.computation_type.as_deref(), "Computation type is required")?;
        let computation = PrivacyComputation::from_tag(&tag);

        tracing::info!(computation = computation.as_str(), "executing private computation");
        self.gate.pause().await;

        let gas_used = match request.gas_limit {
            Some(limit) if limit > 0 => match rand::thread_rng().gen_range(0..limit) {
                0 => DEFAULT_GAS_USED,
                used => used,
            },
            _ => DEFAULT_GAS_USED,
        };

        Ok(ComputeReceipt {
            success: true,
            computation_type: computation.as_str().to_string(),
            transaction_id: format!("compute_{}", current_timestamp_millis()),
            executed_in_tee: true,
            gas_used,
            result: computation.run(),
            timestamp: iso_timestamp(),
        })
    }

    pub async fn query_encrypted_contract(
        &self,
        request: ContractQueryRequest,
    ) -> Result<ContractQueryReceipt, BridgeError> {
        self.ensure_initialized()?;
        let contract_address =
            require_present(request.contract_address.as_deref(), "Contract address is required")?;
        let query_type = require_present(request.query.as_deref(), "Query is required")?;

        tracing::info!(contract = %contract_address, query = %query_type, "querying encrypted contract");
        self.gate.pause().await;

        Ok(ContractQueryReceipt {
            success: true,
            result: ContractQuery::from_tag(&query_type).answer(),
            contract_address,
            query_type,
            executed_in_tee: true,
            timestamp: iso_timestamp(),
        })
    }

    pub async fn private_transaction_history(
        &self,
        filter: Option<&str>,
        address: &str,
        viewing_key: Option<&str>,
    ) -> Result<SecretHistory, BridgeError> {
        self.ensure_initialized()?;
        let filter_type = filter.unwrap_or("all").to_string();

        tracing::debug!(filter = %filter_type, address, "fetching private history");
        self.gate.pause().await;

        if !is_valid_viewing_key(viewing_key) {
            tracing::debug!(address, "viewing key rejected, returning public data only");
            return Ok(SecretHistory::Redacted {
                success: false,
                error: "Invalid viewing key".to_string(),
                public_data: PublicHistoryData {
                    transaction_count: rand::thread_rng().gen_range(0..50),
                    last_transaction: iso_timestamp(),
                },
            });
        }

        let parsed = HistoryFilter::<SecretHistoryCategory>::from_tag(&filter_type);
        let now = current_timestamp_millis() as i64;
        let entry = |hours: i64, kind: &str, prefix: &str| SecretHistoryEntry {
            date: iso_timestamp_ago(hours * HOUR_MS),
            kind: kind.to_string(),
            amount: None,
            from: None,
            to: None,
            computation_type: None,
            gas_fee: None,
            status: "Completed".to_string(),
            encrypted: true,
            tx_id: format!("{}_{}", prefix, now - hours * HOUR_MS),
        };

        let mut transactions = Vec::new();
        if parsed.includes(&SecretHistoryCategory::NearToSecret) {
            transactions.push(SecretHistoryEntry {
                amount: Some(random_fixed(5.0, 4)),
                from: Some("near-address".to_string()),
                to: Some(address.to_string()),
                ..entry(1, "NEAR → Secret", "secret")
            });
        }
        if parsed.includes(&SecretHistoryCategory::SecretToZcash) {
            transactions.push(SecretHistoryEntry {
                amount: Some(random_fixed(3.0, 4)),
                from: Some(address.to_string()),
                to: Some("zs1...".to_string()),
                ..entry(2, "Secret → Zcash", "secret")
            });
        }
        if parsed.includes(&SecretHistoryCategory::PrivateComputation) {
            transactions.push(SecretHistoryEntry {
                computation_type: Some("Zero-Knowledge Proof".to_string()),
                gas_fee: Some(random_fixed(0.01, 6)),
                ..entry(3, "TEE Computation", "compute")
            });
        }

        Ok(SecretHistory::Disclosed {
            success: true,
            transactions,
            filter_type,
            address: address.to_string(),
            viewing_key_valid: true,
            privacy_level: "maximum".to_string(),
        })
    }
}

#[async_trait]
impl ChainOperationExecutor for SecretExecutor {
    fn service_name(&self) -> &'static str {
        SERVICE_NAME
    }

    async fn initialize(&self) -> Result<(), BridgeError> {
        self.gate.open(SERVICE_NAME).await;
        Ok(())
    }

    fn is_initialized(&self) -> bool {
        self.gate.is_open()
    }

    fn status(&self) -> ServiceStatus {
        ServiceStatus::new(self.is_initialized(), self.config.network.clone())
            .with_detail("nodeUrl", self.config.node_url.clone())
            .with_detail("chainId", self.config.chain_id.clone())
            .with_detail("privacyStatus", "active")
            .with_detail("teeStatus", "operational")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn ready() -> SecretExecutor {
        let executor = SecretExecutor::new(SecretConfig::default());
        executor.initialize().await.unwrap();
        executor
    }

    #[tokio::test]
    async fn test_not_initialized_message() {
        let executor = SecretExecutor::new(SecretConfig::default());
        let err = executor.generate_viewing_key("secret1abc").await.unwrap_err();
        assert_eq!(err.to_string(), "Secret Network service not initialized");
        let status = serde_json::to_value(executor.status()).unwrap();
        assert_eq!(status["teeStatus"], "operational");
        assert_eq!(status["chainId"], "pulsar-2");
        assert_eq!(status["bridgeStatus"], "operational");
    }

    #[tokio::test]
    async fn test_issued_viewing_key_unlocks_history() {
        let executor = ready().await;
        let key = executor.generate_viewing_key("secret1abc").await.unwrap();
        assert!(key.viewing_key.starts_with("api_key_"));

        let history = executor
            .private_transaction_history(None, "secret1abc", Some(&key.viewing_key))
            .await
            .unwrap();
        assert!(history.is_disclosed());
        let value = serde_json::to_value(&history).unwrap();
        assert_eq!(value["transactions"].as_array().unwrap().len(), 3);
        assert_eq!(value["transactions"][2]["computationType"], "Zero-Knowledge Proof");
        assert!(value["transactions"][2].get("amount").is_none());
        assert_eq!(value["privacyLevel"], "maximum");
    }

    #[tokio::test]
    async fn test_history_without_key_is_redacted() {
        let executor = ready().await;
        let history = executor
            .private_transaction_history(Some("near-to-secret"), "secret1abc", Some("guess"))
            .await
            .unwrap();
        let value = serde_json::to_value(&history).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["error"], "Invalid viewing key");
        assert!(value["publicData"]["transactionCount"].as_u64().unwrap() < 50);
        assert!(value.get("transactions").is_none());
    }

    #[tokio::test]
    async fn test_unknown_filter_is_gated_then_empty() {
        let executor = ready().await;
        let redacted = executor
            .private_transaction_history(Some("bogus"), "secret1abc", None)
            .await
            .unwrap();
        assert!(!redacted.is_disclosed());

        let disclosed = executor
            .private_transaction_history(Some("bogus"), "secret1abc", Some("api_key_abc"))
            .await
            .unwrap();
        let value = serde_json::to_value(&disclosed).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["filterType"], "bogus");
        assert!(value["transactions"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_private_swap_privacy_level() {
        let executor = ready().await;
        let receipt = executor
            .execute_private_swap(PrivateSwapRequest {
                amount: Some("4".into()),
                to_address: Some("secret1dest".into()),
                use_privacy: true,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(receipt.privacy_level, "maximum");
        assert!(receipt.transaction_id.starts_with("secret_tx_"));
        assert_eq!(receipt.estimated_completion_time, "2-5 minutes");

        let err = executor
            .execute_private_swap(PrivateSwapRequest {
                amount: Some("4".into()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Recipient address is required");
    }

    #[tokio::test]
    async fn test_computation_dispatch() {
        let executor = ready().await;
        let compute = |tag: &str| PrivateComputeRequest {
            computation_type: Some(tag.to_string()),
            ..Default::default()
        };

        let proof = executor.execute_private_computation(compute("zero-knowledge-proof")).await.unwrap();
        assert!(matches!(proof.result, ComputationOutput::Proof { verified: true, .. }));
        assert_eq!(proof.gas_used, 50_000);

        let bridge = executor.execute_private_computation(compute("confidential-bridge")).await.unwrap();
        match bridge.result {
            ComputationOutput::Bridge { encrypted_transfers, .. } => {
                assert!((1..=5).contains(&encrypted_transfers))
            }
            other => panic!("unexpected output {:?}", other),
        }

        // Unknown tags fall through to the generic computation.
        let other = executor.execute_private_computation(compute("fft")).await.unwrap();
        assert_eq!(other.computation_type, "fft");
        assert!(matches!(other.result, ComputationOutput::Sealed { .. }));

        let limited = executor
            .execute_private_computation(PrivateComputeRequest {
                computation_type: Some("private-analytics".into()),
                gas_limit: Some(1_000),
                input_data: Some(json!({"rows": 3})),
            })
            .await
            .unwrap();
        assert!(limited.gas_used < 1_000 || limited.gas_used == 50_000);

        let err = executor.execute_private_computation(PrivateComputeRequest::default()).await.unwrap_err();
        assert_eq!(err.to_string(), "Computation type is required");
    }

    #[tokio::test]
    async fn test_contract_queries() {
        let executor = ready().await;
        let query = |q: &str| ContractQueryRequest {
            contract_address: Some("secret1contract".into()),
            query: Some(q.to_string()),
            viewing_key: None,
        };

        let balance = serde_json::to_value(executor.query_encrypted_contract(query("getBalance")).await.unwrap()).unwrap();
        assert_eq!(balance["result"]["denom"], "SCRT");
        assert_eq!(balance["executedInTEE"], true);
        assert_eq!(balance["queryType"], "getBalance");

        let txs = serde_json::to_value(executor.query_encrypted_contract(query("getPrivateTransactions")).await.unwrap()).unwrap();
        assert_eq!(txs["result"]["transactions"][4]["status"], "failed");

        let other = serde_json::to_value(executor.query_encrypted_contract(query("whatever")).await.unwrap()).unwrap();
        assert_eq!(other["result"]["status"], "query_processed");

        let err = executor
            .query_encrypted_contract(ContractQueryRequest {
                contract_address: Some("secret1contract".into()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Query is required");
    }
}
