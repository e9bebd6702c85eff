//! aibridge-agent
//!
//! The agent facade. A caller names an action (`query`, `transact`,
//! `analyze` or `status`); the [`AgentService`] routes it to the query engine,
//! the simulated transaction path or the status report.
//!
//! Initialization connects to NEAR and, when the live-AI flag is set,
//! provisions an auth token. It never fails: any problem leaves the agent
//! ready in simulation mode.

pub mod action;
pub mod manifest;
pub mod service;

pub use action::{AgentAction, TransactParams, TransactionReceipt};
pub use manifest::{capabilities, Capability, CapabilityManifest};
pub use service::{AgentService, AgentStatus, AiMode, InitState};

/// Note attached to every transact receipt.
pub const SIMULATED_TX_NOTE: &str = "This is a simulated transaction. To execute real transactions, configure NEAR_ACCOUNT_ID and NEAR_PRIVATE_KEY";
