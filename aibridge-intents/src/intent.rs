//! Intent requests, parameters and receipts.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use aibridge_common::{current_timestamp_millis, to_base36, BridgeError};

const INTENT_ID_SUFFIX_LEN: usize = 9;

/// `<epoch millis>-<9 base36 chars>`. Unique in practice, not guaranteed.
pub fn generate_intent_id() -> String {
    let suffix = rand::thread_rng().gen_range(0..36u64.pow(INTENT_ID_SUFFIX_LEN as u32));
    format!(
        "{}-{:0>width$}",
        current_timestamp_millis(),
        to_base36(suffix),
        width = INTENT_ID_SUFFIX_LEN
    )
}

// ═══════════════════════════════════════════════════════════════════════════════
// TARGETS & KINDS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetChain {
    Zcash,
    Secret,
}

impl TargetChain {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetChain::Zcash => "zcash",
            TargetChain::Secret => "secret",
        }
    }

    /// Funds-moving method on the bridge receiver.
    pub fn bridge_method(&self) -> &'static str {
        match self {
            TargetChain::Zcash => "bridge_to_zcash",
            TargetChain::Secret => "bridge_to_secret",
        }
    }

    /// Name of the chain's privacy flag in call arguments.
    pub fn privacy_flag(&self) -> &'static str {
        match self {
            TargetChain::Zcash => "shielded",
            TargetChain::Secret => "encrypted",
        }
    }

    pub fn intent_kind(&self) -> IntentKind {
        match self {
            TargetChain::Zcash => IntentKind::BridgeToZcash,
            TargetChain::Secret => IntentKind::BridgeToSecret,
        }
    }
}

impl fmt::Display for TargetChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetChain {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "zcash" => Ok(TargetChain::Zcash),
            "secret" => Ok(TargetChain::Secret),
            other => Err(BridgeError::validation(format!(
                "Unsupported target chain: {}",
                other
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    BridgeToZcash,
    BridgeToSecret,
    PrivateSwap,
}

/// Requested swap privacy. Unrecognized levels are passed through to the
/// intent contract unchanged.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum PrivacyLevel {
    Maximum,
    #[default]
    Standard,
    Minimal,
    Other(String),
}

impl PrivacyLevel {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "maximum" => PrivacyLevel::Maximum,
            "standard" => PrivacyLevel::Standard,
            "minimal" => PrivacyLevel::Minimal,
            other => PrivacyLevel::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            PrivacyLevel::Maximum => "maximum",
            PrivacyLevel::Standard => "standard",
            PrivacyLevel::Minimal => "minimal",
            PrivacyLevel::Other(tag) => tag,
        }
    }
}

impl Serialize for PrivacyLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PrivacyLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(|tag| PrivacyLevel::from_tag(&tag))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// REQUESTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Bridge NEAR funds to another chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BridgeIntentRequest {
    pub target_chain: TargetChain,
    /// Decimal NEAR amount.
    pub amount: String,
    pub receiver_address: String,
    /// Shielded (Zcash) or encrypted (Secret) delivery.
    pub private: bool,
}

/// Private token swap.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SwapIntentRequest {
    pub from_token: String,
    pub to_token: String,
    pub amount: String,
    pub min_amount_out: Option<String>,
    pub privacy_level: Option<PrivacyLevel>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// RECEIPTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Parameters captured at submission. Never mutated after creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IntentParams {
    #[serde(rename_all = "camelCase")]
    ZcashBridge {
        amount: String,
        receiver_zcash_address: String,
        shielded: bool,
    },
    #[serde(rename_all = "camelCase")]
    SecretBridge {
        amount: String,
        receiver_secret_address: String,
        encrypted: bool,
    },
    #[serde(rename_all = "camelCase")]
    Swap {
        from_token: String,
        to_token: String,
        amount: String,
        min_amount_out: String,
        privacy_level: PrivacyLevel,
    },
}

impl IntentParams {
    pub fn for_bridge(request: &BridgeIntentRequest) -> Self {
        let amount = request.amount.clone();
        let address = request.receiver_address.clone();
        match request.target_chain {
            TargetChain::Zcash => IntentParams::ZcashBridge {
                amount,
                receiver_zcash_address: address,
                shielded: request.private,
            },
            TargetChain::Secret => IntentParams::SecretBridge {
                amount,
                receiver_secret_address: address,
                encrypted: request.private,
            },
        }
    }

    pub fn amount(&self) -> &str {
        match self {
            IntentParams::ZcashBridge { amount, .. }
            | IntentParams::SecretBridge { amount, .. }
            | IntentParams::Swap { amount, .. } => amount,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReceiptStatus {
    IntentCreated,
}

/// Returned once the intent transaction has been submitted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentReceipt {
    pub transaction_hash: String,
    pub status: ReceiptStatus,
    #[serde(rename = "type")]
    pub kind: IntentKind,
    pub params: IntentParams,
    pub intent_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_intent_id_shape() {
        let id = generate_intent_id();
        let (millis, suffix) = id.split_once('-').unwrap();
        assert!(millis.parse::<u64>().is_ok());
        assert_eq!(suffix.len(), 9);
        assert!(suffix.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
        assert_ne!(generate_intent_id(), generate_intent_id());
    }

    #[test]
    fn test_target_chain_parsing() {
        assert_eq!("Zcash".parse::<TargetChain>().unwrap(), TargetChain::Zcash);
        assert_eq!("secret".parse::<TargetChain>().unwrap().bridge_method(), "bridge_to_secret");
        assert!("ethereum".parse::<TargetChain>().is_err());
    }

    #[test]
    fn test_privacy_level_passes_unknown_through() {
        assert_eq!(PrivacyLevel::from_tag("maximum"), PrivacyLevel::Maximum);
        let custom = PrivacyLevel::from_tag("paranoid");
        assert_eq!(custom.as_str(), "paranoid");
        assert_eq!(serde_json::to_value(&custom).unwrap(), json!("paranoid"));
        let back: PrivacyLevel = serde_json::from_value(json!("standard")).unwrap();
        assert_eq!(back, PrivacyLevel::Standard);
    }

    #[test]
    fn test_receipt_wire_shape() {
        let receipt = IntentReceipt {
            transaction_hash: "abc".into(),
            status: ReceiptStatus::IntentCreated,
            kind: IntentKind::BridgeToZcash,
            params: IntentParams::for_bridge(&BridgeIntentRequest {
                target_chain: TargetChain::Zcash,
                amount: "1.5".into(),
                receiver_address: "zs1xyz".into(),
                private: true,
            }),
            intent_id: "1-abc".into(),
        };
        assert_eq!(
            serde_json::to_value(&receipt).unwrap(),
            json!({
                "transactionHash": "abc",
                "status": "intent_created",
                "type": "bridge_to_zcash",
                "params": {"amount": "1.5", "receiverZcashAddress": "zs1xyz", "shielded": true},
                "intentId": "1-abc"
            })
        );
    }
}
