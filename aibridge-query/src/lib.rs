//! aibridge-query
//!
//! Natural-language query and data analysis against NEAR AI, with a
//! deterministic local simulation standing in whenever the live API is not
//! authorized or fails.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    ResilientQueryEngine                      │
//! │                                                              │
//! │   token set && live flag? ──yes──► NearAiBackend ──ok──► Live│
//! │            │                            │                    │
//! │            no                          err                   │
//! │            ▼                            ▼                    │
//! │        simulation ──► Simulated    simulation ──► Recovered  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The [`AuthTokenProvisioner`] produces the [`AuthToken`] that unlocks the
//! live path.

pub mod auth;
pub mod backend;
pub mod engine;
pub mod error;
pub mod mock;
pub mod simulation;
pub mod types;

pub use auth::{
    extract_auth_token_from_cookie, validate_token_structure, AuthPayload, AuthToken,
    AuthTokenProvisioner, TokenValidation, PLACEHOLDER_SIGNATURE,
};
pub use backend::{HttpNearAiBackend, LiveAnalysisRequest, LiveQueryRequest, NearAiBackend};
pub use engine::ResilientQueryEngine;
pub use error::BackendError;
pub use mock::MockBackend;
pub use types::{AnalysisResult, ModelDescriptor, Outcome, QueryResult, RecoveryPath, ResponseKind};

/// Model tag carried by every simulated result.
pub const SIMULATION_MODEL: &str = "simulation";

/// Token budget sent with live queries.
pub const LIVE_MAX_TOKENS: u32 = 1000;

/// Sampling temperature sent with live queries.
pub const LIVE_TEMPERATURE: f32 = 0.7;
