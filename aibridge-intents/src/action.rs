//! NEAR transaction actions and submission outcomes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use aibridge_common::TGAS;

/// Transaction action.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    FunctionCall {
        method_name: String,
        args: Value,
        gas: u64,
        /// Attached deposit in yoctoNEAR, as a decimal string.
        deposit: String,
    },
}

impl Action {
    pub fn function_call(method_name: &str, args: Value, gas_tgas: u64, deposit_yocto: u128) -> Self {
        Action::FunctionCall {
            method_name: method_name.to_string(),
            args,
            gas: gas_tgas * TGAS,
            deposit: deposit_yocto.to_string(),
        }
    }

    pub fn method_name(&self) -> &str {
        match self {
            Action::FunctionCall { method_name, .. } => method_name,
        }
    }

    pub fn args(&self) -> &Value {
        match self {
            Action::FunctionCall { args, .. } => args,
        }
    }

    pub fn deposit(&self) -> &str {
        match self {
            Action::FunctionCall { deposit, .. } => deposit,
        }
    }
}

/// Unsigned transaction body.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub signer_id: String,
    pub public_key: String,
    pub receiver_id: String,
    pub nonce: u64,
    pub actions: Vec<Action>,
}

/// Execution status of a submitted transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    Success,
    /// Signed and hashed locally, not broadcast to the network.
    SignedOnly,
}

/// Result of `sign_and_send`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransactionOutcome {
    pub transaction_hash: String,
    pub status: ExecutionStatus,
    /// Base58 ed25519 signature over the transaction hash, when signed locally.
    pub signature: Option<String>,
}
