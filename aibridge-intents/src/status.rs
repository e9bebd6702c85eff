//! Intent status: chain-reported observations clamped to a monotone lifecycle.
//!
//! ```text
//!   Pending ──▶ Processing ──▶ Completed
//!                        └───▶ Failed
//! ```

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tokio::sync::Mutex;

use aibridge_common::{current_timestamp_millis, BridgeError};

const DEFAULT_PROCESSING_AFTER: Duration = Duration::from_secs(10);
const DEFAULT_SETTLED_AFTER: Duration = Duration::from_secs(60);

/// Hash bytes below this threshold settle as Failed (about one in ten).
const FAILURE_THRESHOLD: u8 = 26;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntentStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl IntentStatus {
    fn rank(&self) -> u8 {
        match self {
            IntentStatus::Pending => 0,
            IntentStatus::Processing => 1,
            IntentStatus::Completed | IntentStatus::Failed => 2,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, IntentStatus::Completed | IntentStatus::Failed)
    }

    /// Status after observing `observed`. Never moves backwards and never
    /// leaves a terminal state.
    pub fn advance(self, observed: IntentStatus) -> IntentStatus {
        if self.is_terminal() || observed.rank() < self.rank() {
            self
        } else {
            observed
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionDetails {
    pub final_amount: f64,
    pub fee: f64,
    pub completed_at: String,
}

/// Status as reported by the chain for one intent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChainStatus {
    pub status: IntentStatus,
    /// Present only for Completed.
    pub details: Option<CompletionDetails>,
}

impl ChainStatus {
    pub fn new(status: IntentStatus) -> Self {
        Self {
            status,
            details: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSnapshot {
    pub intent_id: String,
    pub status: IntentStatus,
    pub last_updated: String,
    pub details: Option<CompletionDetails>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// STATUS SOURCES
// ═══════════════════════════════════════════════════════════════════════════════

/// Where intent status is read from.
#[async_trait]
pub trait IntentStatusSource: Send + Sync {
    async fn fetch_status(&self, intent_id: &str) -> Result<ChainStatus, BridgeError>;
}

/// Derives status from the creation time encoded in the intent id.
///
/// Deterministic per id and time: Pending until `processing_after`, Processing
/// until `settled_after`, then Completed or Failed depending on a hash of the id.
#[derive(Clone, Debug)]
pub struct SimulatedStatusSource {
    processing_after: Duration,
    settled_after: Duration,
}

impl Default for SimulatedStatusSource {
    fn default() -> Self {
        Self::new(DEFAULT_PROCESSING_AFTER, DEFAULT_SETTLED_AFTER)
    }
}

impl SimulatedStatusSource {
    pub fn new(processing_after: Duration, settled_after: Duration) -> Self {
        Self {
            processing_after,
            settled_after: settled_after.max(processing_after),
        }
    }

    /// Status of `intent_id` at `now_millis`.
    pub fn status_at(&self, intent_id: &str, now_millis: u64) -> ChainStatus {
        let created = created_millis(intent_id);
        let age = created
            .map(|c| Duration::from_millis(now_millis.saturating_sub(c)))
            .unwrap_or_default();

        if age < self.processing_after {
            return ChainStatus::new(IntentStatus::Pending);
        }
        if age < self.settled_after {
            return ChainStatus::new(IntentStatus::Processing);
        }

        let digest = Sha256::digest(intent_id.as_bytes());
        if digest[0] < FAILURE_THRESHOLD {
            return ChainStatus::new(IntentStatus::Failed);
        }

        let final_amount = f64::from(u16::from_be_bytes([digest[1], digest[2]]) % 10_000) / 1_000.0;
        let fee = f64::from(digest[3] % 100) / 1_000.0;
        let settled_at = created.unwrap_or(now_millis) + self.settled_after.as_millis() as u64;
        let completed_at = Utc
            .timestamp_millis_opt(settled_at as i64)
            .single()
            .unwrap_or_else(Utc::now)
            .to_rfc3339_opts(SecondsFormat::Millis, true);

        ChainStatus {
            status: IntentStatus::Completed,
            details: Some(CompletionDetails {
                final_amount,
                fee,
                completed_at,
            }),
        }
    }
}

#[async_trait]
impl IntentStatusSource for SimulatedStatusSource {
    async fn fetch_status(&self, intent_id: &str) -> Result<ChainStatus, BridgeError> {
        Ok(self.status_at(intent_id, current_timestamp_millis()))
    }
}

fn created_millis(intent_id: &str) -> Option<u64> {
    intent_id.split('-').next()?.parse().ok()
}

// ═══════════════════════════════════════════════════════════════════════════════
// TRACKER
// ═══════════════════════════════════════════════════════════════════════════════

/// Intents retained by default before the oldest is evicted.
pub const DEFAULT_TRACKED_INTENTS: usize = 10_000;

#[derive(Default)]
struct TrackedIntents {
    entries: HashMap<String, Option<ChainStatus>>,
    order: VecDeque<String>,
}

/// Highest status observed per registered intent.
///
/// Only ids passed to [`register`](Self::register) are retained, oldest
/// first out once `capacity` is reached. Observations for any other id pass
/// through unchanged.
pub struct IntentStatusTracker {
    capacity: usize,
    tracked: Mutex<TrackedIntents>,
}

impl Default for IntentStatusTracker {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_TRACKED_INTENTS)
    }
}

impl IntentStatusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            tracked: Mutex::new(TrackedIntents::default()),
        }
    }

    /// Start tracking an intent created by this process.
    pub async fn register(&self, intent_id: &str) {
        let mut tracked = self.tracked.lock().await;
        if tracked.entries.contains_key(intent_id) {
            return;
        }
        while tracked.order.len() >= self.capacity {
            match tracked.order.pop_front() {
                Some(oldest) => {
                    tracked.entries.remove(&oldest);
                }
                None => break,
            }
        }
        tracked.order.push_back(intent_id.to_string());
        tracked.entries.insert(intent_id.to_string(), None);
    }

    /// Fold an observation into the tracked status and return the clamped result.
    pub async fn record(&self, intent_id: &str, observed: ChainStatus) -> ChainStatus {
        let mut tracked = self.tracked.lock().await;
        let Some(slot) = tracked.entries.get_mut(intent_id) else {
            return observed;
        };
        let current = match slot.as_ref() {
            Some(previous)
                if previous.status.is_terminal()
                    || previous.status.advance(observed.status) != observed.status =>
            {
                tracing::debug!(
                    intent_id,
                    kept = ?previous.status,
                    observed = ?observed.status,
                    "ignoring regressive status observation"
                );
                previous.clone()
            }
            _ => observed,
        };
        *slot = Some(current.clone());
        current
    }

    pub async fn get(&self, intent_id: &str) -> Option<ChainStatus> {
        self.tracked.lock().await.entries.get(intent_id).cloned().flatten()
    }

    pub async fn tracked_count(&self) -> usize {
        self.tracked.lock().await.entries.len()
    }
}
