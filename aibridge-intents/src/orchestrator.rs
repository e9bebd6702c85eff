//! Intent construction, submission and status lookup.

use std::sync::Arc;

use serde_json::{json, Value};

use aibridge_common::{iso_timestamp, parse_near_amount, BridgeError, IntentsConfig};

use crate::account::{ChainAccount, NOT_SIGNED_IN};
use crate::action::Action;
use crate::intent::{
    generate_intent_id, BridgeIntentRequest, IntentKind, IntentParams, IntentReceipt,
    ReceiptStatus, SwapIntentRequest, TargetChain,
};
use crate::receivers::{IntentCategory, IntentReceivers};
use crate::status::{IntentStatusSource, IntentStatusTracker, StatusSnapshot};
use crate::{BRIDGE_CALL_GAS_TGAS, CREATE_INTENT_GAS_TGAS, INTENT_FEE_NEAR};

const NATIVE_TOKEN: &str = "NEAR";

/// Builds intents, submits them through a [`ChainAccount`] and reports their status.
pub struct IntentOrchestrator {
    account: Arc<dyn ChainAccount>,
    status_source: Arc<dyn IntentStatusSource>,
    tracker: IntentStatusTracker,
    receivers: IntentReceivers,
    config: IntentsConfig,
}

impl IntentOrchestrator {
    pub fn new(
        account: Arc<dyn ChainAccount>,
        status_source: Arc<dyn IntentStatusSource>,
        config: &IntentsConfig,
    ) -> Self {
        Self {
            account,
            status_source,
            tracker: IntentStatusTracker::new(),
            receivers: IntentReceivers::default(),
            config: config.clone(),
        }
    }

    pub fn account_id(&self) -> Option<&str> {
        self.account.account_id()
    }

    fn signed_in(&self) -> Result<&str, BridgeError> {
        self.account
            .account_id()
            .ok_or_else(|| BridgeError::Unauthenticated(NOT_SIGNED_IN.to_string()))
    }

    fn bridge_contract(&self, chain: TargetChain) -> &str {
        match chain {
            TargetChain::Zcash => &self.config.zcash_bridge_contract,
            TargetChain::Secret => &self.config.secret_bridge_contract,
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // BRIDGE
    // ═══════════════════════════════════════════════════════════════════════════════

    /// Submit the funds-moving call and `create_intent` as one transaction.
    pub async fn create_bridge_intent(
        &self,
        request: BridgeIntentRequest,
    ) -> Result<IntentReceipt, BridgeError> {
        let account_id = self.signed_in()?;

        if request.amount.trim().is_empty() || request.receiver_address.trim().is_empty() {
            return Err(BridgeError::validation(
                "Amount and receiver address are required",
            ));
        }
        let amount_yocto = parse_near_amount(&request.amount)?;
        let fee_yocto = parse_near_amount(INTENT_FEE_NEAR)?;

        let chain = request.target_chain;
        let flag = chain.privacy_flag();

        let mut bridge_args = json!({ "receiver_address": request.receiver_address });
        bridge_args[flag] = Value::Bool(request.private);
        let mut intent_params = json!({
            "receiver_address": request.receiver_address,
            "amount": amount_yocto.to_string(),
        });
        intent_params[flag] = Value::Bool(request.private);

        let actions = vec![
            Action::function_call(
                chain.bridge_method(),
                bridge_args,
                BRIDGE_CALL_GAS_TGAS,
                amount_yocto,
            ),
            Action::function_call(
                "create_intent",
                json!({
                    "intent_type": "bridge",
                    "target_chain": chain.as_str(),
                    "bridge_contract": self.bridge_contract(chain),
                    "params": intent_params,
                }),
                CREATE_INTENT_GAS_TGAS,
                fee_yocto,
            ),
        ];

        let receiver = self.receivers.receiver(IntentCategory::Bridge);
        let outcome = self.account.sign_and_send(receiver, actions).await?;
        let intent_id = generate_intent_id();
        self.tracker.register(&intent_id).await;

        tracing::info!(
            intent_id = %intent_id,
            account_id,
            target_chain = %chain,
            tx_hash = %outcome.transaction_hash,
            "bridge intent created"
        );

        Ok(IntentReceipt {
            transaction_hash: outcome.transaction_hash,
            status: ReceiptStatus::IntentCreated,
            kind: chain.intent_kind(),
            params: IntentParams::for_bridge(&request),
            intent_id,
        })
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // SWAP
    // ═══════════════════════════════════════════════════════════════════════════════

    pub async fn create_swap_intent(
        &self,
        request: SwapIntentRequest,
    ) -> Result<IntentReceipt, BridgeError> {
        let account_id = self.signed_in()?;

        if request.from_token.trim().is_empty()
            || request.to_token.trim().is_empty()
            || request.amount.trim().is_empty()
        {
            return Err(BridgeError::validation(
                "From token, to token, and amount are required",
            ));
        }

        // Native amounts go on-chain in yoctoNEAR; other tokens are forwarded as given.
        let (deposit, wire_amount) = if request.from_token == NATIVE_TOKEN {
            let yocto = parse_near_amount(&request.amount)?;
            (yocto, yocto.to_string())
        } else {
            (parse_near_amount(INTENT_FEE_NEAR)?, request.amount.clone())
        };
        let min_amount_out = request
            .min_amount_out
            .clone()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| "0".to_string());
        let privacy_level = request.privacy_level.clone().unwrap_or_default();

        let action = Action::function_call(
            "create_intent",
            json!({
                "intent_type": "swap",
                "params": {
                    "from_token": request.from_token,
                    "to_token": request.to_token,
                    "amount": wire_amount,
                    "min_amount_out": min_amount_out,
                    "privacy_level": privacy_level.as_str(),
                }
            }),
            CREATE_INTENT_GAS_TGAS,
            deposit,
        );

        let receiver = self.receivers.receiver(IntentCategory::Swap);
        let outcome = self.account.sign_and_send(receiver, vec![action]).await?;
        let intent_id = generate_intent_id();
        self.tracker.register(&intent_id).await;

        tracing::info!(
            intent_id = %intent_id,
            account_id,
            from = %request.from_token,
            to = %request.to_token,
            tx_hash = %outcome.transaction_hash,
            "swap intent created"
        );

        Ok(IntentReceipt {
            transaction_hash: outcome.transaction_hash,
            status: ReceiptStatus::IntentCreated,
            kind: IntentKind::PrivateSwap,
            params: IntentParams::Swap {
                from_token: request.from_token,
                to_token: request.to_token,
                amount: request.amount,
                min_amount_out,
                privacy_level,
            },
            intent_id,
        })
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // STATUS
    // ═══════════════════════════════════════════════════════════════════════════════

    pub async fn query_intent_status(&self, intent_id: &str) -> Result<StatusSnapshot, BridgeError> {
        if intent_id.trim().is_empty() {
            return Err(BridgeError::validation("Intent ID is required"));
        }

        let observed = self.status_source.fetch_status(intent_id).await?;
        let status = self.tracker.record(intent_id, observed).await;
        tracing::debug!(intent_id, status = ?status.status, "intent status queried");

        Ok(StatusSnapshot {
            intent_id: intent_id.to_string(),
            status: status.status,
            last_updated: iso_timestamp(),
            details: status.details,
        })
    }
}
