//! Account/signer capability used to submit intents.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use async_trait::async_trait;
use ed25519_dalek::{Signer, SigningKey};
use sha2::{Digest, Sha256};
use tokio::sync::Mutex;

use aibridge_common::keys::{encode_public_key, parse_secret_key};
use aibridge_common::{current_timestamp_millis, BridgeError, NearConfig};

use crate::action::{Action, ExecutionStatus, Transaction, TransactionOutcome};

pub const NOT_SIGNED_IN: &str = "User must be signed in";

/// A NEAR account able to sign and submit transactions.
#[async_trait]
pub trait ChainAccount: Send + Sync {
    /// The signed-in account, or `None` when signed out.
    fn account_id(&self) -> Option<&str>;

    /// Sign all `actions` into one transaction to `receiver_id` and submit it.
    ///
    /// The actions are applied atomically: all of them or none.
    async fn sign_and_send(
        &self,
        receiver_id: &str,
        actions: Vec<Action>,
    ) -> Result<TransactionOutcome, BridgeError>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// LOCAL KEY ACCOUNT
// ═══════════════════════════════════════════════════════════════════════════════

struct LocalSigner {
    account_id: String,
    key: SigningKey,
}

/// Account backed by a locally held ed25519 key.
///
/// Transactions are serialized, hashed with SHA-256 and signed, but never
/// broadcast; the outcome reports [`ExecutionStatus::SignedOnly`].
pub struct LocalKeyAccount {
    signer: Option<LocalSigner>,
    nonce: AtomicU64,
}

impl LocalKeyAccount {
    pub fn new(account_id: &str, private_key: &str) -> Result<Self, BridgeError> {
        let key = parse_secret_key(private_key)?;
        Ok(Self {
            signer: Some(LocalSigner {
                account_id: account_id.to_string(),
                key,
            }),
            nonce: AtomicU64::new(current_timestamp_millis()),
        })
    }

    pub fn signed_out() -> Self {
        Self {
            signer: None,
            nonce: AtomicU64::new(0),
        }
    }

    /// Signed in when the configured credentials are usable.
    pub fn from_config(near: &NearConfig) -> Self {
        match (&near.account_id, &near.private_key) {
            (Some(account_id), Some(private_key)) => match Self::new(account_id, private_key) {
                Ok(account) => {
                    tracing::info!(account_id = %account_id, "intent account signed in");
                    account
                }
                Err(err) => {
                    tracing::warn!(error = %err, "unusable NEAR credentials, intent account signed out");
                    Self::signed_out()
                }
            },
            _ => Self::signed_out(),
        }
    }
}

#[async_trait]
impl ChainAccount for LocalKeyAccount {
    fn account_id(&self) -> Option<&str> {
        self.signer.as_ref().map(|s| s.account_id.as_str())
    }

    async fn sign_and_send(
        &self,
        receiver_id: &str,
        actions: Vec<Action>,
    ) -> Result<TransactionOutcome, BridgeError> {
        let signer = self
            .signer
            .as_ref()
            .ok_or_else(|| BridgeError::Unauthenticated(NOT_SIGNED_IN.to_string()))?;
        if actions.is_empty() {
            return Err(BridgeError::validation("transaction has no actions"));
        }

        let transaction = Transaction {
            signer_id: signer.account_id.clone(),
            public_key: encode_public_key(&signer.key.verifying_key().to_bytes()),
            receiver_id: receiver_id.to_string(),
            nonce: self.nonce.fetch_add(1, Ordering::SeqCst) + 1,
            actions,
        };

        let hash = Sha256::digest(serde_json::to_vec(&transaction)?);
        let signature = signer.key.sign(&hash);
        let transaction_hash = bs58::encode(hash).into_string();

        tracing::info!(
            signer = %transaction.signer_id,
            receiver = receiver_id,
            actions = transaction.actions.len(),
            tx_hash = %transaction_hash,
            "transaction signed"
        );

        Ok(TransactionOutcome {
            transaction_hash,
            status: ExecutionStatus::SignedOnly,
            signature: Some(bs58::encode(signature.to_bytes()).into_string()),
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// MOCK ACCOUNT
// ═══════════════════════════════════════════════════════════════════════════════

/// Account for tests. Records every submission.
pub struct MockAccount {
    account_id: Option<String>,
    failure: Option<String>,
    submissions: AtomicU32,
    transactions: Mutex<Vec<(String, Vec<Action>)>>,
}

impl MockAccount {
    pub fn signed_in(account_id: impl Into<String>) -> Self {
        Self {
            account_id: Some(account_id.into()),
            failure: None,
            submissions: AtomicU32::new(0),
            transactions: Mutex::new(Vec::new()),
        }
    }

    pub fn signed_out() -> Self {
        Self {
            account_id: None,
            ..Self::signed_in("")
        }
    }

    /// Make every submission fail with `message`.
    pub fn with_failure(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// Number of `sign_and_send` calls that reached the network boundary.
    pub fn submission_count(&self) -> u32 {
        self.submissions.load(Ordering::SeqCst)
    }

    /// Receiver and actions of every successful submission.
    pub async fn transactions(&self) -> Vec<(String, Vec<Action>)> {
        self.transactions.lock().await.clone()
    }
}

#[async_trait]
impl ChainAccount for MockAccount {
    fn account_id(&self) -> Option<&str> {
        self.account_id.as_deref()
    }

    async fn sign_and_send(
        &self,
        receiver_id: &str,
        actions: Vec<Action>,
    ) -> Result<TransactionOutcome, BridgeError> {
        let n = self.submissions.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(message) = &self.failure {
            return Err(BridgeError::upstream(message.clone()));
        }
        self.transactions
            .lock()
            .await
            .push((receiver_id.to_string(), actions));
        Ok(TransactionOutcome {
            transaction_hash: format!("mock_tx_{}", n),
            status: ExecutionStatus::Success,
            signature: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn call() -> Action {
        Action::function_call("ping", json!({}), 1, 0)
    }

    #[tokio::test]
    async fn test_local_account_signs_without_broadcast() {
        let key = bs58::encode([5u8; 32]).into_string();
        let account = LocalKeyAccount::new("agent.testnet", &key).unwrap();
        assert_eq!(account.account_id(), Some("agent.testnet"));

        let a = account.sign_and_send("bridge.intent.near", vec![call()]).await.unwrap();
        let b = account.sign_and_send("bridge.intent.near", vec![call()]).await.unwrap();
        assert_eq!(a.status, ExecutionStatus::SignedOnly);
        assert!(a.signature.is_some());
        // Nonce advances, so identical batches hash differently.
        assert_ne!(a.transaction_hash, b.transaction_hash);
    }

    #[tokio::test]
    async fn test_signed_out_local_account_rejects() {
        let account = LocalKeyAccount::from_config(&NearConfig::testnet());
        assert!(account.account_id().is_none());
        let err = account.sign_and_send("x", vec![call()]).await.unwrap_err();
        assert!(matches!(err, BridgeError::Unauthenticated(_)));
    }

    #[tokio::test]
    async fn test_bad_credentials_sign_out() {
        let near = NearConfig::testnet().with_credentials("a.testnet", "ed25519:0OIl");
        assert!(LocalKeyAccount::from_config(&near).account_id().is_none());
    }

    #[tokio::test]
    async fn test_mock_account_records_batches() {
        let account = MockAccount::signed_in("alice.testnet");
        account.sign_and_send("r", vec![call(), call()]).await.unwrap();
        assert_eq!(account.submission_count(), 1);
        assert_eq!(account.transactions().await[0].1.len(), 2);

        let failing = MockAccount::signed_in("a").with_failure("rpc down");
        tokio_test::assert_err!(failing.sign_and_send("r", vec![call()]).await);
        assert_eq!(failing.submission_count(), 1);
        assert!(failing.transactions().await.is_empty());
    }
}
