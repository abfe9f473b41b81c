//! Drives one boost purchase end to end.
//!
//! The four remote steps run strictly in sequence; step N+1 never starts
//! before step N's result is back. There is no cancellation — the only bound
//! on a purchase is the receipt-poll timeout. A terminal `failed`/`refunded`
//! receipt is a result, not an error; only protocol failures throw.

use bevy::log::info;
use parking_lot::Mutex;
use std::sync::Arc;

use crate::game::state::GameState;
use crate::payment::wallet::WalletConnector;
use crate::shared::{epoch_ms, BoostItem, StoreConfig};

use super::error::{normalize_user_rejection, PaymentError};
use super::gateway::{BoxedIntentApi, RECEIPT_POLL_INTERVAL_MS, RECEIPT_TIMEOUT_MS};
use super::types::{base_units, IntentReceipt, IntentStatus, QuoteRequest, TradeType};

/// Where a purchase currently is. Labels are what the status sink shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchasePhase {
    Quoting,
    Committing,
    Executing,
    Polling,
}

impl PurchasePhase {
    pub fn label(self) -> &'static str {
        match self {
            PurchasePhase::Quoting => "Getting best route…",
            PurchasePhase::Committing => "Locking in rate…",
            PurchasePhase::Executing => "Confirm in your wallet…",
            PurchasePhase::Polling => "Waiting for confirmation…",
        }
    }
}

pub struct PurchaseOrchestrator {
    gateway: BoxedIntentApi,
    game: Arc<Mutex<GameState>>,
    wallet: Arc<Mutex<WalletConnector>>,
    store: StoreConfig,
    receipt_timeout_ms: u64,
    poll_interval_ms: u64,
}

impl PurchaseOrchestrator {
    pub fn new(
        gateway: BoxedIntentApi,
        game: Arc<Mutex<GameState>>,
        wallet: Arc<Mutex<WalletConnector>>,
        store: StoreConfig,
    ) -> Self {
        Self {
            gateway,
            game,
            wallet,
            store,
            receipt_timeout_ms: RECEIPT_TIMEOUT_MS,
            poll_interval_ms: RECEIPT_POLL_INTERVAL_MS,
        }
    }

    /// Overrides the receipt-poll pacing (tests, impatient configs).
    pub fn with_receipt_timing(mut self, timeout_ms: u64, poll_interval_ms: u64) -> Self {
        self.receipt_timeout_ms = timeout_ms;
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Runs one purchase. `on_status` receives each phase right before its
    /// remote step — progress only, never errors. On a `completed` receipt
    /// the item's effect lands on the game state exactly once; `failed` and
    /// `refunded` receipts come back untouched for the caller to present.
    pub async fn purchase<F>(
        &self,
        item: &BoostItem,
        origin_chain_id: u64,
        mut on_status: F,
    ) -> Result<IntentReceipt, PaymentError>
    where
        F: FnMut(PurchasePhase),
    {
        // Lock scope must end before the first await.
        let owner = {
            let wallet = self.wallet.lock();
            match wallet.session() {
                Some(session) => session.address.clone(),
                None => return Err(PaymentError::NotConnected),
            }
        };

        // Price is denominated in the settlement token, so the treasury
        // receives it exactly and the origin amount floats with the route.
        let request = QuoteRequest {
            owner,
            origin_chain_id,
            origin_token: self.store.origin_token_for(origin_chain_id),
            amount: base_units(item.price, self.store.settlement_decimals),
            destination_chain_id: self.store.destination_chain_id,
            destination_token: self.store.destination_token.clone(),
            recipient: self.store.treasury_address.clone(),
            trade_type: TradeType::ExactOutput,
            slippage_bps: Some(self.store.slippage_bps),
            provider: None,
            calldata: None,
        };

        on_status(PurchasePhase::Quoting);
        let quote = self
            .gateway
            .quote(&request)
            .await
            .map_err(normalize_user_rejection)?;

        on_status(PurchasePhase::Committing);
        let commit = self
            .gateway
            .commit(&quote.intent)
            .await
            .map_err(normalize_user_rejection)?;

        on_status(PurchasePhase::Executing);
        let _execute = self
            .gateway
            .execute(&commit.intent_id, None)
            .await
            .map_err(normalize_user_rejection)?;

        on_status(PurchasePhase::Polling);
        let receipt = self
            .gateway
            .wait_receipt(&commit.intent_id, self.receipt_timeout_ms, self.poll_interval_ms)
            .await?;

        if receipt.status == IntentStatus::Completed {
            let mut game = self.game.lock();
            item.effect.apply(&mut game, epoch_ms());
            info!(
                "[Boost] {} applied after intent {} settled",
                item.id, receipt.intent_id
            );
        }
        Ok(receipt)
    }
}
