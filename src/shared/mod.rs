//! Shared resources, events, and states for Coinforge.
//!
//! This is the type contract. Every domain plugin imports from here.
//! No domain imports from any other domain directly; the engine-free cores
//! (`game::state` for progression, `payment` for the intent client) are the
//! only modules this contract wraps into ECS resources.

use bevy::prelude::*;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use crate::game::state::{GameState, Progress};
use crate::payment::types::IntentStatus;
use crate::payment::wallet::WalletConnector;

// ═══════════════════════════════════════════════════════════════════════
// APP SCREEN — top-level state machine
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, States, Default)]
pub enum AppScreen {
    #[default]
    Playing,
    Shop,
}

// ═══════════════════════════════════════════════════════════════════════
// CLOCK
// ═══════════════════════════════════════════════════════════════════════

/// Wall-clock time in epoch milliseconds. The progression core takes time as
/// a parameter; systems resolve it here so the multiplier expiry survives a
/// page reload.
#[cfg(not(target_arch = "wasm32"))]
pub fn epoch_ms() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as f64)
        .unwrap_or(0.0)
}

#[cfg(target_arch = "wasm32")]
pub fn epoch_ms() -> f64 {
    js_sys::Date::now()
}

// ═══════════════════════════════════════════════════════════════════════
// RESOURCES
// ═══════════════════════════════════════════════════════════════════════

/// The single progression record, explicitly constructed in `main` and
/// cloned into purchase tasks. Lock scope must never span an `.await`.
#[derive(Resource, Clone)]
pub struct SharedGameState(pub Arc<Mutex<GameState>>);

impl SharedGameState {
    pub fn new(state: GameState) -> Self {
        Self(Arc::new(Mutex::new(state)))
    }

    /// Copy of the current record for display code.
    pub fn snapshot(&self) -> Progress {
        self.0.lock().progress().clone()
    }
}

/// The wallet session shared between the HUD and purchase tasks.
#[derive(Resource, Clone, Default)]
pub struct SharedWallet(pub Arc<Mutex<WalletConnector>>);

/// Which boost (if any) is mid-purchase. The purchase protocol itself allows
/// concurrent intents; keeping one in flight at a time is a UI policy.
#[derive(Resource, Debug, Clone, Default)]
pub struct ActivePurchase(pub Option<String>);

/// Finished purchases from this session, newest last.
#[derive(Resource, Debug, Clone, Default)]
pub struct PurchaseLog {
    pub entries: Vec<PurchaseLogEntry>,
}

#[derive(Debug, Clone)]
pub struct PurchaseLogEntry {
    pub item_id: String,
    pub intent_id: Option<String>,
    pub outcome: String,
}

// ═══════════════════════════════════════════════════════════════════════
// BOOST CATALOG
// ═══════════════════════════════════════════════════════════════════════

/// What a boost does to the progression record once its payment settles.
/// Effects are data, not closures, so the catalog can live in a const table
/// and the shop UI can describe them.
#[derive(Debug, Clone, PartialEq)]
pub enum BoostEffect {
    ClickPower { amount: f64 },
    AutoRate { amount: f64 },
    Multiplier { value: f64, duration_ms: f64 },
}

impl BoostEffect {
    /// Applies the effect. Called exactly once per settled purchase, by the
    /// orchestrator.
    pub fn apply(&self, game: &mut GameState, now_ms: f64) {
        match *self {
            BoostEffect::ClickPower { amount } => game.add_click_power(amount),
            BoostEffect::AutoRate { amount } => game.add_auto_per_second(amount),
            BoostEffect::Multiplier { value, duration_ms } => {
                game.set_multiplier(value, duration_ms, now_ms)
            }
        }
    }

    /// Short effect line for the shop list.
    pub fn summary(&self) -> String {
        match *self {
            BoostEffect::ClickPower { amount } => format!("+{amount} click power"),
            BoostEffect::AutoRate { amount } => format!("+{amount}/s auto-forge"),
            BoostEffect::Multiplier { value, duration_ms } => {
                format!("x{value} for {} min", (duration_ms / 60_000.0).round() as u64)
            }
        }
    }
}

/// One purchasable boost.
#[derive(Debug, Clone)]
pub struct BoostItem {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Price in the settlement token (e.g. 0.99 USDC).
    pub price: f64,
    pub effect: BoostEffect,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct BoostCatalog {
    pub items: Vec<BoostItem>,
}

impl BoostCatalog {
    pub fn get(&self, id: &str) -> Option<&BoostItem> {
        self.items.iter().find(|item| item.id == id)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// STORE / GATEWAY CONFIGURATION
// ═══════════════════════════════════════════════════════════════════════

/// Where boost payments settle: the destination side of every intent, plus
/// the accepted origin token per chain.
#[derive(Resource, Debug, Clone)]
pub struct StoreConfig {
    pub destination_chain_id: u64,
    pub destination_token: String,
    pub treasury_address: String,
    pub settlement_decimals: u32,
    /// Accepted payment token per origin chain id.
    pub origin_tokens: HashMap<u64, String>,
    pub slippage_bps: u32,
}

impl StoreConfig {
    /// Token the store accepts on `chain_id`. Unknown chains are forwarded
    /// empty; the intent service rejects unsupported routes itself.
    pub fn origin_token_for(&self, chain_id: u64) -> String {
        self.origin_tokens.get(&chain_id).cloned().unwrap_or_default()
    }
}

/// Intent-service endpoint and credentials. Env vars override the compiled
/// defaults on native; the wasm build ships the defaults.
#[derive(Resource, Debug, Clone)]
pub struct GatewayConfig {
    pub base_url: String,
    pub api_key: String,
    pub bearer_token: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: std::env::var("COINFORGE_GATEWAY_URL")
                .unwrap_or_else(|_| "https://intents.coinforge.gg".to_string()),
            api_key: std::env::var("COINFORGE_GATEWAY_API_KEY").unwrap_or_default(),
            bearer_token: std::env::var("COINFORGE_GATEWAY_TOKEN").unwrap_or_default(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// INPUT
// ═══════════════════════════════════════════════════════════════════════

/// Frame-scoped game actions, written once per frame by the input plugin.
#[derive(Resource, Debug, Clone, Default)]
pub struct PlayerInput {
    /// Forge a coin this frame (left click or Space).
    pub forge_click: bool,
    pub toggle_shop: bool,
    pub connect_wallet: bool,
    pub disconnect_wallet: bool,
    pub reset_progress: bool,
    pub menu_up: bool,
    pub menu_down: bool,
    pub menu_confirm: bool,
    pub menu_cancel: bool,
}

// ═══════════════════════════════════════════════════════════════════════
// EVENTS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Event, Debug, Clone)]
pub struct ToastEvent {
    pub message: String,
    pub duration_secs: f32,
}

/// Coins were added to the record (click or auto tick).
#[derive(Event, Debug, Clone)]
pub struct CoinsForgedEvent {
    pub amount: f64,
    pub from_click: bool,
}

/// The active multiplier lapsed this tick.
#[derive(Event, Debug, Clone)]
pub struct MultiplierExpiredEvent;

/// Fired by the shop UI when the player confirms a boost purchase.
#[derive(Event, Debug, Clone)]
pub struct PurchaseRequestEvent {
    pub item_id: String,
}

/// Progress label for the purchase in flight ("Locking in rate…").
#[derive(Event, Debug, Clone)]
pub struct PurchaseStatusEvent {
    pub message: String,
}

/// Terminal result of one purchase attempt.
#[derive(Event, Debug, Clone)]
pub struct PurchaseFinishedEvent {
    pub item_id: String,
    pub outcome: PurchaseOutcome,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PurchaseOutcome {
    /// The receipt reached a terminal status; the effect was applied only
    /// for `Completed`.
    Settled {
        status: IntentStatus,
        intent_id: String,
    },
    /// A step of the protocol failed outright.
    Errored { message: String, rejected: bool },
}

#[derive(Event, Debug, Clone)]
pub struct WalletConnectRequestEvent;

#[derive(Event, Debug, Clone)]
pub struct WalletDisconnectRequestEvent;

#[derive(Event, Debug, Clone)]
pub struct WalletConnectedEvent {
    pub address: String,
    pub chain_id: u64,
}

// ═══════════════════════════════════════════════════════════════════════
// DISPLAY HELPERS
// ═══════════════════════════════════════════════════════════════════════

/// "0x1234…abcd" form for HUD lines and toasts.
pub fn shorten_address(address: &str) -> String {
    if address.len() <= 10 {
        return address.to_string();
    }
    format!("{}…{}", &address[..6], &address[address.len() - 4..])
}
