//! aibridge-chains
//!
//! Chain-side services used by the bridge agent:
//!
//! ```text
//!   ┌────────────────────┐   ┌────────────────────┐   ┌──────────────────┐
//!   │   ZcashExecutor    │   │   SecretExecutor   │   │  NearConnection  │
//!   │ address / transfer │   │ viewing key / swap │   │  JSON-RPC reads  │
//!   │ shield / history   │   │ compute / query    │   │  view_account    │
//!   └─────────┬──────────┘   └─────────┬──────────┘   └──────────────────┘
//!             └──────── ChainOperationExecutor ───────┘
//!                  (init gate + status report)
//! ```
//!
//! The Zcash and Secret executors simulate their chains: every operation is
//! answered locally with a payload shaped like the real service's reply.

pub mod error;
pub mod executor;
pub mod near;
pub mod secret;
pub mod zcash;

pub use error::RpcError;
pub use executor::{
    is_valid_viewing_key, string_or_number, ChainOperationExecutor, HistoryFilter, InitGate,
};
pub use near::{AccountBalance, NearConnection};
pub use secret::{
    ComputationOutput, ComputeReceipt, ContractQuery, ContractQueryReceipt, ContractQueryRequest,
    PrivacyComputation, PrivateComputeRequest, PrivateSwapReceipt, PrivateSwapRequest,
    SecretExecutor, SecretHistory, ViewingKey,
};
pub use zcash::{
    ShieldOperation, ShieldReceipt, ShieldRequest, ShieldedAddress, TransferReceipt,
    TransferRequest, ZcashExecutor, ZcashHistory,
};

/// Prefix every issued viewing key carries.
pub const VIEWING_KEY_PREFIX: &str = "api_key_";
