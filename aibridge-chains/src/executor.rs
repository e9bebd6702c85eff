//! Shared executor contract and simulation helpers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use aibridge_common::{BridgeError, ServiceStatus};

use crate::VIEWING_KEY_PREFIX;

/// A chain integration with an initialization gate.
///
/// Every operation except [`status`](Self::status) fails with
/// `NotInitialized` until [`initialize`](Self::initialize) has completed.
#[async_trait]
pub trait ChainOperationExecutor: Send + Sync {
    /// Human-readable service name, e.g. `"Zcash"`.
    fn service_name(&self) -> &'static str;

    async fn initialize(&self) -> Result<(), BridgeError>;

    fn is_initialized(&self) -> bool;

    /// Available before initialization.
    fn status(&self) -> ServiceStatus;

    fn ensure_initialized(&self) -> Result<(), BridgeError> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(BridgeError::NotInitialized(format!(
                "{} service not initialized",
                self.service_name()
            )))
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// INIT GATE
// ═══════════════════════════════════════════════════════════════════════════════

/// One-way initialized flag plus the simulated network latency.
#[derive(Debug, Default)]
pub struct InitGate {
    open: AtomicBool,
    latency: Duration,
}

impl InitGate {
    pub fn new(latency: Duration) -> Self {
        Self {
            open: AtomicBool::new(false),
            latency,
        }
    }

    pub async fn open(&self, service: &str) {
        tracing::info!(service, "initializing service");
        self.pause().await;
        self.open.store(true, Ordering::SeqCst);
        tracing::info!(service, "service initialized");
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    /// Stand-in for a network round trip.
    pub async fn pause(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// HISTORY FILTERS
// ═══════════════════════════════════════════════════════════════════════════════

/// History filter: everything, one named category, or an unrecognized tag
/// that matches nothing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HistoryFilter<C> {
    All,
    Only(C),
    Unrecognized,
}

impl<C: PartialEq> HistoryFilter<C> {
    pub fn includes(&self, category: &C) -> bool {
        match self {
            HistoryFilter::All => true,
            HistoryFilter::Only(c) => c == category,
            HistoryFilter::Unrecognized => false,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// HELPERS
// ═══════════════════════════════════════════════════════════════════════════════

/// Structural viewing key check. Keys are not verified against the chain.
pub fn is_valid_viewing_key(key: Option<&str>) -> bool {
    key.map_or(false, |k| k.starts_with(VIEWING_KEY_PREFIX))
}

/// Amount must be present and parse to a positive number.
pub(crate) fn require_positive_amount(amount: Option<&str>) -> Result<String, BridgeError> {
    let invalid = || BridgeError::validation("Invalid amount");
    let raw = amount.map(str::trim).filter(|a| !a.is_empty()).ok_or_else(invalid)?;
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => Ok(raw.to_string()),
        _ => Err(invalid()),
    }
}

pub(crate) fn require_present(value: Option<&str>, message: &str) -> Result<String, BridgeError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| BridgeError::validation(message))
}

pub(crate) fn random_hex(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| char::from_digit(rng.gen_range(0..16), 16).unwrap_or('0'))
        .collect()
}

pub(crate) fn random_base36(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| char::from_digit(rng.gen_range(0..36), 36).unwrap_or('0'))
        .collect()
}

/// Uniform random value in `[0, max)` rendered with `decimals` digits.
pub(crate) fn random_fixed(max: f64, decimals: usize) -> String {
    let value = rand::thread_rng().gen_range(0.0..max);
    format!("{:.*}", decimals, value)
}

/// Accepts `"1.5"` or `1.5` for amount-like request fields.
pub fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
