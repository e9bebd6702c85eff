//! Environment driven configuration.

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::error::BridgeError;

// ═══════════════════════════════════════════════════════════════════════════════
// ENVIRONMENT VARIABLES
// ═══════════════════════════════════════════════════════════════════════════════

const PORT_ENV: &str = "PORT";
const NEAR_NETWORK_ENV: &str = "NEAR_NETWORK";
const NEAR_NODE_URL_ENV: &str = "NEAR_NODE_URL";
const NEAR_WALLET_URL_ENV: &str = "NEAR_WALLET_URL";
const NEAR_HELPER_URL_ENV: &str = "NEAR_HELPER_URL";
const NEAR_EXPLORER_URL_ENV: &str = "NEAR_EXPLORER_URL";
const NEAR_ACCOUNT_ID_ENV: &str = "NEAR_ACCOUNT_ID";
const NEAR_PRIVATE_KEY_ENV: &str = "NEAR_PRIVATE_KEY";
const USE_ACTUAL_API_ENV: &str = "USE_ACTUAL_API";
const NEAR_AI_API_URL_ENV: &str = "NEAR_AI_API_URL";
const NEAR_AI_MODEL_ENV: &str = "NEAR_AI_MODEL";
const NEAR_AI_AUTH_TOKEN_ENV: &str = "NEAR_AI_AUTH_TOKEN";
const NEAR_AI_TIMEOUT_ENV: &str = "NEAR_AI_TIMEOUT_MS";
const ZCASH_NETWORK_ENV: &str = "ZCASH_NETWORK";
const ZCASH_API_URL_ENV: &str = "ZCASH_API_URL";
const ZCASH_BRIDGE_CONTRACT_ENV: &str = "ZCASH_BRIDGE_CONTRACT";
const SECRET_NODE_URL_ENV: &str = "SECRET_NODE_URL";
const SECRET_NETWORK_ENV: &str = "SECRET_NETWORK";
const SECRET_CHAIN_ID_ENV: &str = "SECRET_CHAIN_ID";
const SECRET_BRIDGE_CONTRACT_ENV: &str = "SECRET_BRIDGE_CONTRACT";
const SECRET_BRIDGE_NEAR_CONTRACT_ENV: &str = "SECRET_BRIDGE_NEAR_CONTRACT";
const SIMULATED_LATENCY_ENV: &str = "SIMULATED_LATENCY_MS";

// ═══════════════════════════════════════════════════════════════════════════════
// DEFAULTS
// ═══════════════════════════════════════════════════════════════════════════════

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_NEAR_AI_URL: &str = "https://api.near.ai";
pub const DEFAULT_NEAR_AI_MODEL: &str = "near-ai-agent-v1";
pub const DEFAULT_NEAR_AI_TIMEOUT_MS: u64 = 30_000;

pub const NEAR_AI_AUTH_MESSAGE: &str = "Welcome to NEAR AI Hub!";
pub const NEAR_AI_AUTH_RECIPIENT: &str = "ai.near";
pub const NEAR_AI_AUTH_CALLBACK_URL: &str = "https://app.near.ai/sign-in/callback";

pub const DEFAULT_ZCASH_API_URL: &str = "https://api.lightwalletd.com";
pub const DEFAULT_ZCASH_NETWORK: &str = "testnet";
pub const DEFAULT_ZCASH_BRIDGE_CONTRACT: &str = "zcash-bridge.testnet";

pub const DEFAULT_SECRET_NODE_URL: &str = "https://lcd-secret.scrt.network";
pub const DEFAULT_SECRET_NETWORK: &str = "pulsar-2";
pub const DEFAULT_SECRET_BRIDGE_CONTRACT: &str = "secret1abc...";
pub const DEFAULT_SECRET_BRIDGE_NEAR_CONTRACT: &str = "secret-bridge.testnet";

// ═══════════════════════════════════════════════════════════════════════════════
// NEAR
// ═══════════════════════════════════════════════════════════════════════════════

/// NEAR network selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NearNetwork {
    Mainnet,
    Testnet,
}

impl NearNetwork {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Testnet => "testnet",
        }
    }
}

impl fmt::Display for NearNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NearNetwork {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Self::Mainnet),
            "testnet" => Ok(Self::Testnet),
            other => Err(BridgeError::InvalidConfig(format!(
                "unknown NEAR network: {}",
                other
            ))),
        }
    }
}

/// NEAR connection settings and optional agent credentials.
#[derive(Clone, Debug)]
pub struct NearConfig {
    pub network: NearNetwork,
    pub node_url: String,
    pub wallet_url: String,
    pub helper_url: String,
    pub explorer_url: String,
    /// Account the agent acts as, if configured.
    pub account_id: Option<String>,
    /// `ed25519:`-prefixed (or bare) base58 secret key for `account_id`.
    pub private_key: Option<String>,
}

impl NearConfig {
    pub fn testnet() -> Self {
        Self {
            network: NearNetwork::Testnet,
            node_url: "https://rpc.testnet.near.org".to_string(),
            wallet_url: "https://wallet.testnet.near.org".to_string(),
            helper_url: "https://helper.testnet.near.org".to_string(),
            explorer_url: "https://explorer.testnet.near.org".to_string(),
            account_id: None,
            private_key: None,
        }
    }

    pub fn mainnet() -> Self {
        Self {
            network: NearNetwork::Mainnet,
            node_url: "https://rpc.mainnet.near.org".to_string(),
            wallet_url: "https://wallet.mainnet.near.org".to_string(),
            helper_url: "https://helper.mainnet.near.org".to_string(),
            explorer_url: "https://explorer.mainnet.near.org".to_string(),
            account_id: None,
            private_key: None,
        }
    }

    /// Attach agent credentials.
    pub fn with_credentials(
        mut self,
        account_id: impl Into<String>,
        private_key: impl Into<String>,
    ) -> Self {
        self.account_id = Some(account_id.into());
        self.private_key = Some(private_key.into());
        self
    }

    /// Both an account id and a private key are configured.
    pub fn has_credentials(&self) -> bool {
        self.account_id.is_some() && self.private_key.is_some()
    }

    fn from_env() -> Result<Self> {
        let network: NearNetwork = env_or(NEAR_NETWORK_ENV, "testnet")
            .parse()
            .context("NEAR_NETWORK must be mainnet or testnet")?;

        let preset = match network {
            NearNetwork::Mainnet => Self::mainnet(),
            NearNetwork::Testnet => Self::testnet(),
        };

        Ok(Self {
            network,
            node_url: env::var(NEAR_NODE_URL_ENV).unwrap_or(preset.node_url),
            wallet_url: env::var(NEAR_WALLET_URL_ENV).unwrap_or(preset.wallet_url),
            helper_url: env::var(NEAR_HELPER_URL_ENV).unwrap_or(preset.helper_url),
            explorer_url: env::var(NEAR_EXPLORER_URL_ENV).unwrap_or(preset.explorer_url),
            account_id: env_opt(NEAR_ACCOUNT_ID_ENV),
            private_key: env_opt(NEAR_PRIVATE_KEY_ENV),
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// NEAR AI
// ═══════════════════════════════════════════════════════════════════════════════

/// NEAR AI API settings.
#[derive(Clone, Debug)]
pub struct NearAiConfig {
    pub base_url: String,
    /// Explicitly configured model. `None` means the default model is used
    /// for live calls and status reports `simulation`.
    pub model: Option<String>,
    pub timeout: Duration,
    /// Live calls are only attempted when this is set.
    pub use_actual_api: bool,
    /// Pre-provisioned auth token as raw JSON.
    pub auth_token: Option<String>,
    pub auth_message: String,
    pub auth_recipient: String,
    pub auth_callback_url: String,
}

impl Default for NearAiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_NEAR_AI_URL.to_string(),
            model: None,
            timeout: Duration::from_millis(DEFAULT_NEAR_AI_TIMEOUT_MS),
            use_actual_api: false,
            auth_token: None,
            auth_message: NEAR_AI_AUTH_MESSAGE.to_string(),
            auth_recipient: NEAR_AI_AUTH_RECIPIENT.to_string(),
            auth_callback_url: NEAR_AI_AUTH_CALLBACK_URL.to_string(),
        }
    }
}

impl NearAiConfig {
    /// Model used for live requests.
    pub fn effective_model(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_NEAR_AI_MODEL)
    }

    fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: env::var(NEAR_AI_API_URL_ENV).unwrap_or(defaults.base_url),
            model: env_opt(NEAR_AI_MODEL_ENV),
            timeout: env::var(NEAR_AI_TIMEOUT_ENV)
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.timeout),
            use_actual_api: parse_flag(env::var(USE_ACTUAL_API_ENV).ok().as_deref()),
            auth_token: env_opt(NEAR_AI_AUTH_TOKEN_ENV),
            ..defaults
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ZCASH / SECRET NETWORK
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug)]
pub struct ZcashConfig {
    pub api_url: String,
    pub network: String,
    pub bridge_contract: String,
    /// Artificial delay applied by simulated operations.
    pub simulated_latency: Duration,
}

impl Default for ZcashConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_ZCASH_API_URL.to_string(),
            network: DEFAULT_ZCASH_NETWORK.to_string(),
            bridge_contract: DEFAULT_ZCASH_BRIDGE_CONTRACT.to_string(),
            simulated_latency: Duration::ZERO,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SecretConfig {
    pub node_url: String,
    pub network: String,
    pub chain_id: String,
    pub bridge_contract: String,
    pub simulated_latency: Duration,
}

impl Default for SecretConfig {
    fn default() -> Self {
        Self {
            node_url: DEFAULT_SECRET_NODE_URL.to_string(),
            network: DEFAULT_SECRET_NETWORK.to_string(),
            chain_id: DEFAULT_SECRET_NETWORK.to_string(),
            bridge_contract: DEFAULT_SECRET_BRIDGE_CONTRACT.to_string(),
            simulated_latency: Duration::ZERO,
        }
    }
}

/// NEAR-side bridge contracts targeted by intents.
#[derive(Clone, Debug)]
pub struct IntentsConfig {
    pub zcash_bridge_contract: String,
    pub secret_bridge_contract: String,
}

impl Default for IntentsConfig {
    fn default() -> Self {
        Self {
            zcash_bridge_contract: DEFAULT_ZCASH_BRIDGE_CONTRACT.to_string(),
            secret_bridge_contract: DEFAULT_SECRET_BRIDGE_NEAR_CONTRACT.to_string(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// BRIDGE CONFIG
// ═══════════════════════════════════════════════════════════════════════════════

/// Full process configuration.
#[derive(Clone, Debug)]
pub struct BridgeConfig {
    pub port: u16,
    pub near: NearConfig,
    pub near_ai: NearAiConfig,
    pub zcash: ZcashConfig,
    pub secret: SecretConfig,
    pub intents: IntentsConfig,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            near: NearConfig::testnet(),
            near_ai: NearAiConfig::default(),
            zcash: ZcashConfig::default(),
            secret: SecretConfig::default(),
            intents: IntentsConfig::default(),
        }
    }
}

impl BridgeConfig {
    /// Load configuration from environment variables.
    ///
    /// Callers load `.env` with `dotenvy` beforehand.
    pub fn from_env() -> Result<Self> {
        let port = match env::var(PORT_ENV) {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("PORT must be a port number, got {}", raw))?,
            Err(_) => DEFAULT_PORT,
        };

        let simulated_latency = Duration::from_millis(
            env::var(SIMULATED_LATENCY_ENV)
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(0),
        );

        let zcash_bridge_contract =
            env_or(ZCASH_BRIDGE_CONTRACT_ENV, DEFAULT_ZCASH_BRIDGE_CONTRACT);

        Ok(Self {
            port,
            near: NearConfig::from_env()?,
            near_ai: NearAiConfig::from_env(),
            zcash: ZcashConfig {
                api_url: env_or(ZCASH_API_URL_ENV, DEFAULT_ZCASH_API_URL),
                network: env_or(ZCASH_NETWORK_ENV, DEFAULT_ZCASH_NETWORK),
                bridge_contract: zcash_bridge_contract.clone(),
                simulated_latency,
            },
            secret: SecretConfig {
                node_url: env_or(SECRET_NODE_URL_ENV, DEFAULT_SECRET_NODE_URL),
                network: env_or(SECRET_NETWORK_ENV, DEFAULT_SECRET_NETWORK),
                chain_id: env_or(SECRET_CHAIN_ID_ENV, DEFAULT_SECRET_NETWORK),
                bridge_contract: env_or(SECRET_BRIDGE_CONTRACT_ENV, DEFAULT_SECRET_BRIDGE_CONTRACT),
                simulated_latency,
            },
            intents: IntentsConfig {
                zcash_bridge_contract,
                secret_bridge_contract: env_or(
                    SECRET_BRIDGE_NEAR_CONTRACT_ENV,
                    DEFAULT_SECRET_BRIDGE_NEAR_CONTRACT,
                ),
            },
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// HELPERS
// ═══════════════════════════════════════════════════════════════════════════════

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Only the literal string `true` enables a flag.
pub fn parse_flag(value: Option<&str>) -> bool {
    value == Some("true")
}
