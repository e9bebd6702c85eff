//! Static routing of intent categories to receiver accounts.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntentCategory {
    Transfer,
    Swap,
    Bridge,
    Private,
}

/// Receiver account per intent category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentReceivers {
    pub transfer: String,
    pub swap: String,
    pub bridge: String,
    pub private: String,
}

impl Default for IntentReceivers {
    fn default() -> Self {
        Self {
            transfer: "transfer.intent.near".to_string(),
            swap: "swap.intent.near".to_string(),
            bridge: "bridge.intent.near".to_string(),
            private: "private.intent.near".to_string(),
        }
    }
}

impl IntentReceivers {
    pub fn receiver(&self, category: IntentCategory) -> &str {
        match category {
            IntentCategory::Transfer => &self.transfer,
            IntentCategory::Swap => &self.swap,
            IntentCategory::Bridge => &self.bridge,
            IntentCategory::Private => &self.private,
        }
    }
}
