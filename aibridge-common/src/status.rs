//! Point-in-time status snapshots.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Health of a bridge as reported to callers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BridgeHealth {
    Operational,
}

/// Snapshot published by a chain executor.
///
/// The three fixed fields are always present; executors add their own keys
/// through `details`, which are flattened into the same JSON object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceStatus {
    pub is_initialized: bool,
    pub network: String,
    pub bridge_status: BridgeHealth,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl ServiceStatus {
    pub fn new(is_initialized: bool, network: impl Into<String>) -> Self {
        Self {
            is_initialized,
            network: network.into(),
            bridge_status: BridgeHealth::Operational,
            details: Map::new(),
        }
    }

    pub fn with_detail(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.details.insert(key.to_string(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_flattens_details() {
        let status = ServiceStatus::new(true, "testnet").with_detail("apiEndpoint", "https://x");
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["isInitialized"], true);
        assert_eq!(json["bridgeStatus"], "operational");
        assert_eq!(json["apiEndpoint"], "https://x");
    }
}
