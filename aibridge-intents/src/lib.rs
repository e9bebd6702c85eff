//! aibridge-intents
//!
//! Cross-chain intents on NEAR: a bridge or swap request is turned into a
//! batch of function-call actions, submitted as a single transaction through
//! a [`ChainAccount`], and later polled to a terminal status.
//!
//! Intent status is read from an [`IntentStatusSource`] and passed through an
//! [`IntentStatusTracker`], so a caller never sees an intent move backwards
//! from Processing to Pending or leave Completed/Failed.

pub mod account;
pub mod action;
pub mod intent;
pub mod orchestrator;
pub mod receivers;
pub mod status;

pub use account::{ChainAccount, LocalKeyAccount, MockAccount, NOT_SIGNED_IN};
pub use action::{Action, ExecutionStatus, TransactionOutcome};
pub use intent::{
    generate_intent_id, BridgeIntentRequest, IntentKind, IntentParams, IntentReceipt,
    PrivacyLevel, ReceiptStatus, SwapIntentRequest, TargetChain,
};
pub use orchestrator::IntentOrchestrator;
pub use receivers::{IntentCategory, IntentReceivers};
pub use status::{
    ChainStatus, CompletionDetails, IntentStatus, IntentStatusSource, IntentStatusTracker,
    SimulatedStatusSource, StatusSnapshot,
};

/// Gas attached to the funds-moving bridge call.
pub const BRIDGE_CALL_GAS_TGAS: u64 = 30;

/// Gas attached to `create_intent`.
pub const CREATE_INTENT_GAS_TGAS: u64 = 100;

/// Fee attached to `create_intent`, in NEAR.
pub const INTENT_FEE_NEAR: &str = "0.01";
