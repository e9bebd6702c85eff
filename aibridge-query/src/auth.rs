//! NEAR AI authentication tokens.
//!
//! A token binds a NEAR account to the NEAR AI API. It is either reused from
//! configuration or assembled by signing the hub welcome message with the
//! account key. Tokens are checked for structure only; the signature is never
//! verified here.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use ed25519_dalek::Signer;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use aibridge_common::keys::{claimed_public_key, encode_public_key, parse_secret_key};
use aibridge_common::{current_timestamp_millis, NearAiConfig, NearConfig};

/// Signature used when the key material cannot produce a real one.
pub const PLACEHOLDER_SIGNATURE: &str = "P6fZ5bp9j.....Z7BvtqDQ==";

const NONCE_WIDTH: usize = 32;

// ═══════════════════════════════════════════════════════════════════════════════
// TOKEN
// ═══════════════════════════════════════════════════════════════════════════════

/// Wire form of a token, as sent in the `Authorization` header.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthPayload {
    #[serde(default)]
    pub account_id: String,
    #[serde(default)]
    pub public_key: String,
    #[serde(default)]
    pub signature: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub recipient: String,
    #[serde(default)]
    pub nonce: String,
    #[serde(default)]
    pub callback_url: String,
    /// Unknown keys of a pre-provisioned token, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AuthPayload {
    /// All identity fields are present.
    pub fn is_structurally_valid(&self) -> bool {
        !self.account_id.is_empty()
            && !self.public_key.is_empty()
            && !self.signature.is_empty()
            && !self.message.is_empty()
    }
}

/// An auth token tagged with how it was obtained.
#[derive(Clone, Debug, PartialEq)]
pub enum AuthToken {
    /// Freshly signed with the configured account key.
    Signed(AuthPayload),
    /// Reused verbatim from configuration.
    Preconfigured(AuthPayload),
    /// Reused from configuration with `account_id` replaced. The signature
    /// still belongs to `original_account_id`.
    Rebound {
        payload: AuthPayload,
        original_account_id: String,
    },
    /// Carries the placeholder signature because signing failed.
    Unverified(AuthPayload),
}

impl AuthToken {
    pub fn payload(&self) -> &AuthPayload {
        match self {
            Self::Signed(p) | Self::Preconfigured(p) | Self::Unverified(p) => p,
            Self::Rebound { payload, .. } => payload,
        }
    }

    pub fn account_id(&self) -> &str {
        &self.payload().account_id
    }

    pub fn is_unverified(&self) -> bool {
        matches!(self, Self::Unverified(_))
    }

    pub fn provenance(&self) -> &'static str {
        match self {
            Self::Signed(_) => "signed",
            Self::Preconfigured(_) => "preconfigured",
            Self::Rebound { .. } => "rebound",
            Self::Unverified(_) => "unverified",
        }
    }

    /// JSON text of the payload.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self.payload())
    }
}

impl Serialize for AuthToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.payload().serialize(serializer)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// PROVISIONER
// ═══════════════════════════════════════════════════════════════════════════════

/// Derives or reuses the token handed to the query engine.
///
/// Never touches chain state: it only builds a locally signed message.
#[derive(Clone, Debug)]
pub struct AuthTokenProvisioner {
    message: String,
    recipient: String,
    callback_url: String,
    preconfigured: Option<String>,
}

impl AuthTokenProvisioner {
    pub fn new(config: &NearAiConfig) -> Self {
        Self {
            message: config.auth_message.clone(),
            recipient: config.auth_recipient.clone(),
            callback_url: config.auth_callback_url.clone(),
            preconfigured: config.auth_token.clone(),
        }
    }

    /// A pre-provisioned token exists and parses as a JSON object.
    pub fn has_preconfigured_token(&self) -> bool {
        self.parse_preconfigured().is_some()
    }

    /// Produce a token for `account_id`.
    ///
    /// First match wins: a pre-provisioned token (rebound to `account_id`
    /// when it names another account), then a freshly signed token when both
    /// credentials are present. Returns `None` when neither source exists.
    pub fn provision_token(
        &self,
        near: &NearConfig,
        account_id: Option<&str>,
        private_key: Option<&str>,
    ) -> Option<AuthToken> {
        if let Some(payload) = self.parse_preconfigured() {
            return Some(match account_id {
                Some(requested) if requested != payload.account_id => {
                    tracing::warn!(
                        from = %payload.account_id,
                        to = requested,
                        "rebinding pre-configured auth token without re-signing"
                    );
                    let original_account_id = payload.account_id.clone();
                    AuthToken::Rebound {
                        payload: AuthPayload {
                            account_id: requested.to_string(),
                            ..payload
                        },
                        original_account_id,
                    }
                }
                _ => {
                    tracing::info!("using pre-configured NEAR AI auth token");
                    AuthToken::Preconfigured(payload)
                }
            });
        }

        match (account_id, private_key) {
            (Some(account_id), Some(private_key)) => {
                tracing::info!(
                    account_id,
                    network = %near.network,
                    "generating NEAR AI auth token from account credentials"
                );
                Some(self.sign(account_id, private_key))
            }
            _ => {
                tracing::info!("no NEAR credentials or auth token available for NEAR AI");
                None
            }
        }
    }

    /// Sign the hub message, degrading to the placeholder signature when the
    /// key cannot be used.
    pub fn sign(&self, account_id: &str, private_key: &str) -> AuthToken {
        let mut payload = AuthPayload {
            account_id: account_id.to_string(),
            message: self.message.clone(),
            recipient: self.recipient.clone(),
            nonce: generate_nonce(),
            callback_url: self.callback_url.clone(),
            ..AuthPayload::default()
        };

        match parse_secret_key(private_key) {
            Ok(key) => {
                let signature = key.sign(self.message.as_bytes());
                payload.public_key = encode_public_key(&key.verifying_key().to_bytes());
                payload.signature = BASE64.encode(signature.to_bytes());
                AuthToken::Signed(payload)
            }
            Err(reason) => {
                tracing::warn!(%reason, "could not sign auth message, using placeholder signature");
                payload.public_key = claimed_public_key(private_key).unwrap_or_default();
                payload.signature = PLACEHOLDER_SIGNATURE.to_string();
                AuthToken::Unverified(payload)
            }
        }
    }

    fn parse_preconfigured(&self) -> Option<AuthPayload> {
        let raw = self.preconfigured.as_deref()?;
        match serde_json::from_str::<AuthPayload>(raw) {
            Ok(payload) if payload.is_structurally_valid() => Some(payload),
            Ok(_) => {
                tracing::warn!("pre-configured auth token is missing identity fields, ignoring it");
                None
            }
            Err(err) => {
                tracing::warn!(error = %err, "could not parse pre-configured auth token");
                None
            }
        }
    }
}

/// Both credential halves are configured.
pub fn has_valid_near_credentials(near: &NearConfig) -> bool {
    near.has_credentials()
}

// ═══════════════════════════════════════════════════════════════════════════════
// STRUCTURAL VALIDATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Result of a structure-only token check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenValidation {
    Valid { account_id: String },
    /// Parsed, but an identity field is missing.
    MissingFields,
    /// Not a JSON object.
    Malformed,
}

/// Check that `raw` is a token object with `account_id`, `public_key`,
/// `signature` and `message`. No cryptographic verification is done.
pub fn validate_token_structure(raw: &str) -> TokenValidation {
    match serde_json::from_str::<AuthPayload>(raw) {
        Ok(payload) if payload.is_structurally_valid() => TokenValidation::Valid {
            account_id: payload.account_id,
        },
        Ok(_) => TokenValidation::MissingFields,
        Err(_) => TokenValidation::Malformed,
    }
}

/// Pull the token out of an `auth:<value>` cookie entry.
pub fn extract_auth_token_from_cookie(cookie: &str) -> Option<String> {
    let start = cookie.find("auth:")? + "auth:".len();
    let value = cookie[start..].split(';').next().unwrap_or_default();
    if value.is_empty() {
        return None;
    }

    match urlencoding::decode(value) {
        Ok(decoded) => {
            let decoded = decoded.into_owned();
            let trimmed = decoded.strip_prefix('"').unwrap_or(&decoded);
            let trimmed = trimmed.strip_suffix('"').unwrap_or(trimmed);
            Some(trimmed.to_string())
        }
        Err(err) => {
            tracing::warn!(error = %err, "could not decode auth cookie");
            None
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// NONCE
// ═══════════════════════════════════════════════════════════════════════════════

/// Epoch milliseconds, left-padded with zeros.
fn generate_nonce() -> String {
    format!("{:0>width$}", current_timestamp_millis(), width = NONCE_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::{Signature, SigningKey, Verifier, VerifyingKey};

    fn near_secret_key(seed: [u8; 32]) -> String {
        let key = SigningKey::from_bytes(&seed);
        let mut bytes = seed.to_vec();
        bytes.extend_from_slice(&key.verifying_key().to_bytes());
        format!("ed25519:{}", bs58::encode(bytes).into_string())
    }

    fn provisioner(preconfigured: Option<&str>) -> AuthTokenProvisioner {
        AuthTokenProvisioner::new(&NearAiConfig {
            auth_token: preconfigured.map(str::to_string),
            ..NearAiConfig::default()
        })
    }

    const PRECONFIGURED: &str = r#"{"account_id":"alice.near","public_key":"ed25519:abc","signature":"sig","message":"Welcome to NEAR AI Hub!","nonce":"1","custom":"kept"}"#;

    #[test]
    fn test_fresh_token_signature_verifies() {
        let seed = [7u8; 32];
        let token = provisioner(None)
            .provision_token(&NearConfig::testnet(), Some("agent.testnet"), Some(&near_secret_key(seed)))
            .unwrap();

        let AuthToken::Signed(payload) = &token else {
            panic!("expected signed token, got {}", token.provenance());
        };
        assert_eq!(payload.account_id, "agent.testnet");
        assert_eq!(payload.recipient, "ai.near");
        assert_eq!(payload.callback_url, "https://app.near.ai/sign-in/callback");
        assert_eq!(payload.nonce.len(), 32);
        assert!(payload.nonce.starts_with('0'));

        let pk = bs58::decode(payload.public_key.trim_start_matches("ed25519:"))
            .into_vec()
            .unwrap();
        let verifying = VerifyingKey::from_bytes(&pk.try_into().unwrap()).unwrap();
        let sig_bytes: [u8; 64] = BASE64.decode(&payload.signature).unwrap().try_into().unwrap();
        verifying
            .verify(payload.message.as_bytes(), &Signature::from_bytes(&sig_bytes))
            .unwrap();
    }

    #[test]
    fn test_bare_seed_key_is_accepted() {
        let bare = bs58::encode([3u8; 32]).into_string();
        let token = provisioner(None).sign("a.near", &bare);
        assert!(matches!(token, AuthToken::Signed(_)));
    }

    #[test]
    fn test_bad_key_degrades_to_placeholder() {
        let token = provisioner(None).sign("a.near", "ed25519:not-base58-0OIl");
        assert!(token.is_unverified());
        assert_eq!(token.payload().signature, PLACEHOLDER_SIGNATURE);
        assert_eq!(token.account_id(), "a.near");
    }

    #[test]
    fn test_preconfigured_token_reused_verbatim() {
        let token = provisioner(Some(PRECONFIGURED))
            .provision_token(&NearConfig::testnet(), Some("alice.near"), None)
            .unwrap();
        assert_eq!(token.provenance(), "preconfigured");
        assert_eq!(token.payload().signature, "sig");
        assert_eq!(token.payload().extra["custom"], "kept");
    }

    #[test]
    fn test_preconfigured_token_rebound_to_other_account() {
        let token = provisioner(Some(PRECONFIGURED))
            .provision_token(&NearConfig::testnet(), Some("bob.near"), Some("ed25519:x"))
            .unwrap();
        match token {
            AuthToken::Rebound { payload, original_account_id } => {
                assert_eq!(payload.account_id, "bob.near");
                assert_eq!(payload.signature, "sig");
                assert_eq!(original_account_id, "alice.near");
            }
            other => panic!("expected rebound token, got {:?}", other),
        }
    }

    #[test]
    fn test_no_sources_yields_none() {
        let p = provisioner(None);
        assert!(p.provision_token(&NearConfig::testnet(), Some("a.near"), None).is_none());
        assert!(p.provision_token(&NearConfig::testnet(), None, None).is_none());
        assert!(!p.has_preconfigured_token());
    }

    #[test]
    fn test_invalid_preconfigured_falls_through_to_signing() {
        let p = provisioner(Some("not json"));
        assert!(!p.has_preconfigured_token());
        let token = p
            .provision_token(&NearConfig::testnet(), Some("a.near"), Some(&near_secret_key([1u8; 32])))
            .unwrap();
        assert_eq!(token.provenance(), "signed");
    }

    #[test]
    fn test_incomplete_preconfigured_is_ignored() {
        for raw in ["{}", r#"{"account_id":"alice.near","signature":"sig"}"#] {
            let p = provisioner(Some(raw));
            assert!(!p.has_preconfigured_token());
            assert!(p.provision_token(&NearConfig::testnet(), None, None).is_none());
            let token = p
                .provision_token(&NearConfig::testnet(), Some("a.near"), Some(&near_secret_key([2u8; 32])))
                .unwrap();
            assert_eq!(token.provenance(), "signed");
        }
    }

    #[test]
    fn test_token_serializes_flat() {
        let token = provisioner(Some(PRECONFIGURED))
            .provision_token(&NearConfig::testnet(), None, None)
            .unwrap();
        let json: Value = serde_json::from_str(&token.to_json().unwrap()).unwrap();
        assert_eq!(json["account_id"], "alice.near");
        assert_eq!(json["custom"], "kept");
    }

    #[test]
    fn test_structural_validation() {
        assert_eq!(
            validate_token_structure(PRECONFIGURED),
            TokenValidation::Valid { account_id: "alice.near".into() }
        );
        assert_eq!(
            validate_token_structure(r#"{"account_id":"a"}"#),
            TokenValidation::MissingFields
        );
        assert_eq!(validate_token_structure("{oops"), TokenValidation::Malformed);
    }

    #[test]
    fn test_cookie_extraction() {
        assert_eq!(
            extract_auth_token_from_cookie("theme=dark; auth:%22%7B%22a%22%3A1%7D%22; x=1"),
            Some(r#"{"a":1}"#.to_string())
        );
        assert_eq!(extract_auth_token_from_cookie("auth:plain"), Some("plain".into()));
        assert_eq!(extract_auth_token_from_cookie("session=1"), None);
        assert_eq!(extract_auth_token_from_cookie("auth:;"), None);
    }
}
