//! Shared fixtures for the integration tests: a scripted intent service
//! double and canned game/wallet state.

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use coinforge::data::store_config;
use coinforge::game::state::GameState;
use coinforge::payment::error::PaymentError;
use coinforge::payment::gateway::IntentApi;
use coinforge::payment::orchestrator::PurchaseOrchestrator;
use coinforge::payment::types::{
    CommitAck, ExecuteAck, Intent, IntentReceipt, IntentStatus, Quote, QuoteRequest,
};
use coinforge::payment::wallet::{WalletConnector, WalletSession};
use coinforge::shared::{BoostEffect, BoostItem};

// ═══════════════════════════════════════════════════════════════════════
// SCRIPTED GATEWAY
// ═══════════════════════════════════════════════════════════════════════

/// Shared handles onto the mock's call counters; clone them out before the
/// mock is boxed into an orchestrator.
#[derive(Clone, Default)]
pub struct CallCounts {
    pub quote: Arc<AtomicUsize>,
    pub commit: Arc<AtomicUsize>,
    pub execute: Arc<AtomicUsize>,
    pub poll: Arc<AtomicUsize>,
}

/// Mints deterministic quotes/commits and serves receipts from a script.
/// An exhausted script keeps answering `pending`, which is how the timeout
/// scenarios are staged.
pub struct MockGateway {
    receipts: Mutex<VecDeque<IntentStatus>>,
    pub fail_quote: Option<(u16, String)>,
    pub fail_execute: Option<(u16, String)>,
    pub calls: CallCounts,
}

impl MockGateway {
    pub fn with_script(statuses: impl IntoIterator<Item = IntentStatus>) -> Self {
        Self {
            receipts: Mutex::new(statuses.into_iter().collect()),
            fail_quote: None,
            fail_execute: None,
            calls: CallCounts::default(),
        }
    }

    pub fn completed() -> Self {
        Self::with_script([IntentStatus::Completed])
    }

    pub fn never_settling() -> Self {
        Self::with_script([])
    }

    pub fn failing_quote(status: u16, message: &str) -> Self {
        let mut mock = Self::with_script([]);
        mock.fail_quote = Some((status, message.to_string()));
        mock
    }

    pub fn failing_execute(status: u16, message: &str) -> Self {
        let mut mock = Self::with_script([IntentStatus::Completed]);
        mock.fail_execute = Some((status, message.to_string()));
        mock
    }

    fn remote((status, message): &(u16, String)) -> PaymentError {
        PaymentError::Remote {
            status: *status,
            message: message.clone(),
        }
    }
}

#[async_trait]
impl IntentApi for MockGateway {
    async fn quote(&self, request: &QuoteRequest) -> Result<Quote, PaymentError> {
        self.calls.quote.fetch_add(1, Ordering::SeqCst);
        if let Some(failure) = &self.fail_quote {
            return Err(Self::remote(failure));
        }
        let intent = Intent {
            intent_id: "int_mock_1".into(),
            origin_chain_id: request.origin_chain_id,
            destination_chain_id: request.destination_chain_id,
            origin_token: request.origin_token.clone(),
            destination_token: request.destination_token.clone(),
            origin_amount: request.amount.clone(),
            destination_amount: request.amount.clone(),
            owner: request.owner.clone(),
            recipient: request.recipient.clone(),
            expires_at: 4_102_444_800,
        };
        Ok(Quote {
            origin_amount: intent.origin_amount.clone(),
            destination_amount: intent.destination_amount.clone(),
            intent,
            fees: vec![],
            price_impact: 0.0,
            eta_seconds: 12,
            route: vec![],
        })
    }

    async fn commit(&self, intent: &Intent) -> Result<CommitAck, PaymentError> {
        self.calls.commit.fetch_add(1, Ordering::SeqCst);
        Ok(CommitAck {
            intent_id: intent.intent_id.clone(),
            expires_at: intent.expires_at,
        })
    }

    async fn execute(
        &self,
        intent_id: &str,
        _signature: Option<&str>,
    ) -> Result<ExecuteAck, PaymentError> {
        self.calls.execute.fetch_add(1, Ordering::SeqCst);
        if let Some(failure) = &self.fail_execute {
            return Err(Self::remote(failure));
        }
        Ok(ExecuteAck {
            tx_hash: format!("0xtx_{intent_id}"),
        })
    }

    async fn poll_receipt(&self, intent_id: &str) -> Result<IntentReceipt, PaymentError> {
        self.calls.poll.fetch_add(1, Ordering::SeqCst);
        let status = self
            .receipts
            .lock()
            .pop_front()
            .unwrap_or(IntentStatus::Pending);
        Ok(IntentReceipt {
            intent_id: intent_id.to_string(),
            status,
            origin_tx_hash: Some("0xoriginhash".into()),
            destination_tx_hash: None,
            error: None,
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════
// CANNED STATE
// ═══════════════════════════════════════════════════════════════════════

pub const PLAYER_ADDRESS: &str = "0xAb5801a7D398351b8bE11C439e05C5b3259aeC9B";
pub const PLAYER_CHAIN: u64 = 8453;

pub fn shared_game() -> Arc<Mutex<GameState>> {
    Arc::new(Mutex::new(GameState::in_memory()))
}

pub fn connected_wallet() -> Arc<Mutex<WalletConnector>> {
    let mut wallet = WalletConnector::new();
    wallet.attach(WalletSession {
        address: PLAYER_ADDRESS.into(),
        chain_id: PLAYER_CHAIN,
    });
    Arc::new(Mutex::new(wallet))
}

pub fn empty_wallet() -> Arc<Mutex<WalletConnector>> {
    Arc::new(Mutex::new(WalletConnector::new()))
}

pub fn click_boost() -> BoostItem {
    BoostItem {
        id: "test_click_boost".into(),
        name: "Test Click Boost".into(),
        description: "Adds two click power.".into(),
        price: 0.99,
        effect: BoostEffect::ClickPower { amount: 2.0 },
    }
}

/// Orchestrator with tight receipt timing so poll-loop tests finish fast.
pub fn orchestrator(
    gateway: MockGateway,
    game: Arc<Mutex<GameState>>,
    wallet: Arc<Mutex<WalletConnector>>,
) -> PurchaseOrchestrator {
    PurchaseOrchestrator::new(Box::new(gateway), game, wallet, store_config())
        .with_receipt_timing(50, 5)
}
