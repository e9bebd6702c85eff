//! Simulated Zcash bridge service.

use async_trait::async_trait;
use serde::{Deserialize, Serialize, Serializer};

use aibridge_common::{
    current_timestamp_millis, iso_timestamp, iso_timestamp_ago, BridgeError, ServiceStatus,
    ZcashConfig,
};

use crate::executor::{
    random_fixed, random_hex, require_positive_amount, require_present, string_or_number,
    ChainOperationExecutor, HistoryFilter, InitGate,
};

const SERVICE_NAME: &str = "Zcash";
const SHIELDED_ADDRESS_PREFIX: &str = "zs1";
const ADDRESS_HEX_LEN: usize = 30;
const DEFAULT_ACCOUNT: &str = "example.near";
const HOUR_MS: i64 = 3_600_000;

// ═══════════════════════════════════════════════════════════════════════════════
// REQUESTS & RECEIPTS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShieldedAddress {
    pub address: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Cross-chain transfer between NEAR and Zcash.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub from_chain: Option<String>,
    pub to_chain: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub amount: Option<String>,
    pub from_address: Option<String>,
    pub to_address: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferReceipt {
    pub success: bool,
    pub transaction_id: String,
    pub from_chain: Option<String>,
    pub to_chain: Option<String>,
    pub amount: String,
    pub from_address: Option<String>,
    pub to_address: String,
    pub status: String,
    pub estimated_completion_time: String,
    pub timestamp: String,
}

/// Shielded operation kind. Unknown tags are carried through unchanged and
/// handled like a plain shield.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ShieldOperation {
    #[default]
    Shield,
    Deshield,
    Private,
    Other(String),
}

impl ShieldOperation {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "shield" => ShieldOperation::Shield,
            "deshield" => ShieldOperation::Deshield,
            "private" => ShieldOperation::Private,
            other => ShieldOperation::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ShieldOperation::Shield => "shield",
            ShieldOperation::Deshield => "deshield",
            ShieldOperation::Private => "private",
            ShieldOperation::Other(tag) => tag,
        }
    }

    /// Deshielding and private sends go to an explicit recipient.
    pub fn requires_recipient(&self) -> bool {
        matches!(self, ShieldOperation::Deshield | ShieldOperation::Private)
    }
}

impl Serialize for ShieldOperation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShieldRequest {
    pub operation_type: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub amount: Option<String>,
    pub from_address: Option<String>,
    pub to_address: Option<String>,
    pub memo: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShieldReceipt {
    pub success: bool,
    pub operation_type: ShieldOperation,
    pub transaction_id: String,
    pub amount: String,
    pub from_address: Option<String>,
    pub to_address: Option<String>,
    pub memo: String,
    pub status: String,
    pub timestamp: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZcashHistoryCategory {
    NearToZcash,
    ZcashToNear,
    Shield,
}

impl HistoryFilter<ZcashHistoryCategory> {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "all" => HistoryFilter::All,
            "near-to-zcash" => HistoryFilter::Only(ZcashHistoryCategory::NearToZcash),
            "zcash-to-near" => HistoryFilter::Only(ZcashHistoryCategory::ZcashToNear),
            "shield" => HistoryFilter::Only(ZcashHistoryCategory::Shield),
            _ => HistoryFilter::Unrecognized,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZcashHistoryEntry {
    pub date: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: String,
    pub from: String,
    pub to: String,
    pub status: String,
    pub tx_id: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZcashHistory {
    pub success: bool,
    pub transactions: Vec<ZcashHistoryEntry>,
    pub filter_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// EXECUTOR
// ═══════════════════════════════════════════════════════════════════════════════

pub struct ZcashExecutor {
    config: ZcashConfig,
    gate: InitGate,
}

impl ZcashExecutor {
    pub fn new(config: ZcashConfig) -> Self {
        tracing::debug!(network = %config.network, api = %config.api_url, "Zcash executor created");
        let gate = InitGate::new(config.simulated_latency);
        Self { config, gate }
    }

    pub async fn generate_address(&self) -> Result<ShieldedAddress, BridgeError> {
        self.ensure_initialized()?;
        Ok(ShieldedAddress {
            address: format!("{}{}", SHIELDED_ADDRESS_PREFIX, random_hex(ADDRESS_HEX_LEN)),
            kind: "shielded".to_string(),
        })
    }

    pub async fn transfer_assets(&self, request: TransferRequest) -> Result<TransferReceipt, BridgeError> {
        self.ensure_initialized()?;
        let amount = require_positive_amount(request.amount.as_deref())?;
        let to_address = require_present(request.to_address.as_deref(), "Recipient address is required")?;

        tracing::info!(
            amount = %amount,
            from = ?request.from_chain,
            to = ?request.to_chain,
            "transferring assets"
        );
        self.gate.pause().await;

        Ok(TransferReceipt {
            success: true,
            transaction_id: format!("tx_{}", current_timestamp_millis()),
            from_chain: request.from_chain,
            to_chain: request.to_chain,
            amount,
            from_address: request.from_address,
            to_address,
            status: "pending".to_string(),
            estimated_completion_time: "10-30 minutes".to_string(),
            timestamp: iso_timestamp(),
        })
    }

    pub async fn execute_shielded_transaction(
        &self,
        request: ShieldRequest,
    ) -> Result<ShieldReceipt, BridgeError> {
        self.ensure_initialized()?;
        let operation = request
            .operation_type
            .as_deref()
            .map(ShieldOperation::from_tag)
            .unwrap_or_default();
        let amount = require_positive_amount(request.amount.as_deref())?;
        let to_address = request.to_address.filter(|a| !a.trim().is_empty());
        if operation.requires_recipient() && to_address.is_none() {
            return Err(BridgeError::validation(
                "Recipient address is required for this operation type",
            ));
        }

        tracing::info!(operation = operation.as_str(), amount = %amount, "executing shielded transaction");
        self.gate.pause().await;

        let memo = match request.memo.as_deref() {
            Some(m) if !m.is_empty() => "Encrypted",
            _ => "None",
        };

        Ok(ShieldReceipt {
            success: true,
            operation_type: operation,
            transaction_id: format!("zec_{}", current_timestamp_millis()),
            amount,
            to_address: to_address.or_else(|| request.from_address.clone()),
            from_address: request.from_address,
            memo: memo.to_string(),
            status: "confirmed".to_string(),
            timestamp: iso_timestamp(),
        })
    }

    /// Recent simulated activity, newest first.
    pub async fn transaction_history(
        &self,
        filter: Option<&str>,
        account_id: Option<&str>,
    ) -> Result<ZcashHistory, BridgeError> {
        self.ensure_initialized()?;
        let filter_type = filter.unwrap_or("all").to_string();
        let parsed = HistoryFilter::<ZcashHistoryCategory>::from_tag(&filter_type);

        tracing::debug!(filter = %filter_type, account_id = ?account_id, "fetching Zcash history");
        self.gate.pause().await;

        let now = current_timestamp_millis() as i64;
        let account = account_id.unwrap_or(DEFAULT_ACCOUNT).to_string();
        let masked_address = || format!("{}{}...", SHIELDED_ADDRESS_PREFIX, random_hex(10));
        let entry = |hours: i64, kind: &str, max: f64, from: String, to: String, prefix: &str| {
            ZcashHistoryEntry {
                date: iso_timestamp_ago(hours * HOUR_MS),
                kind: kind.to_string(),
                amount: random_fixed(max, 4),
                from,
                to,
                status: "Completed".to_string(),
                tx_id: format!("{}_{}", prefix, now - hours * HOUR_MS),
            }
        };

        let mut transactions = Vec::new();
        if parsed.includes(&ZcashHistoryCategory::NearToZcash) {
            transactions.push(entry(1, "NEAR → Zcash", 5.0, account.clone(), masked_address(), "tx"));
        }
        if parsed.includes(&ZcashHistoryCategory::ZcashToNear) {
            transactions.push(entry(2, "Zcash → NEAR", 3.0, masked_address(), account.clone(), "tx"));
        }
        if parsed.includes(&ZcashHistoryCategory::Shield) {
            transactions.push(entry(3, "Zcash Shield", 2.0, "Transparent".into(), "Shielded".into(), "zec"));
            transactions.push(entry(4, "Zcash Deshield", 1.0, "Shielded".into(), "Transparent".into(), "zec"));
        }

        Ok(ZcashHistory {
            success: true,
            transactions,
            filter_type,
            account_id: account_id.map(str::to_string),
        })
    }
}

#[async_trait]
impl ChainOperationExecutor for ZcashExecutor {
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
            .with_detail("apiEndpoint", self.config.api_url.clone())
            .with_detail("bridgeContract", self.config.bridge_contract.clone())
    }
}
