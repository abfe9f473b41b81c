//! Boost domain — glues shop requests to the purchase orchestrator.
//!
//! Purchase and wallet work runs on the IO task pool; results flow back into
//! the ECS through one channel drained every frame. One purchase in flight
//! at a time: the protocol itself would happily run concurrent intents, but
//! a second request while one is pending only earns a toast.

use bevy::prelude::*;
use bevy::tasks::IoTaskPool;
use futures::channel::mpsc::{unbounded, UnboundedReceiver, UnboundedSender};
use parking_lot::Mutex;
use std::sync::Arc;

use crate::payment::error::PaymentError;
use crate::payment::gateway::PaymentGateway;
use crate::payment::types::IntentStatus;
use crate::payment::orchestrator::PurchaseOrchestrator;
use crate::payment::wallet::{resolve_session, WalletSession};
use crate::shared::*;

// ═══════════════════════════════════════════════════════════════════════
// RESOURCES
// ═══════════════════════════════════════════════════════════════════════

/// The one orchestrator instance, shared with purchase tasks.
#[derive(Resource, Clone)]
pub struct Orchestrator(pub Arc<PurchaseOrchestrator>);

/// Messages task code sends back to the game loop.
#[derive(Debug)]
pub enum FeedMsg {
    PhaseLabel { message: String },
    Finished { item_id: String, outcome: PurchaseOutcome },
    WalletResolved { session: WalletSession },
    WalletFailed { message: String },
}

/// Channel between spawned tasks and the drain system.
#[derive(Resource)]
pub struct PurchaseFeed {
    tx: UnboundedSender<FeedMsg>,
    rx: Mutex<UnboundedReceiver<FeedMsg>>,
}

impl Default for PurchaseFeed {
    fn default() -> Self {
        let (tx, rx) = unbounded();
        Self {
            tx,
            rx: Mutex::new(rx),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// PLUGIN
// ═══════════════════════════════════════════════════════════════════════

pub struct BoostPlugin;

impl Plugin for BoostPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GatewayConfig>()
            .init_resource::<PurchaseFeed>()
            .init_resource::<ActivePurchase>()
            .init_resource::<PurchaseLog>();

        app.add_systems(Startup, init_orchestrator);
        app.add_systems(
            Update,
            (handle_purchase_requests, handle_wallet_requests, drain_feed),
        );
    }
}

fn init_orchestrator(
    mut commands: Commands,
    gateway_config: Res<GatewayConfig>,
    store_config: Res<StoreConfig>,
    game: Res<SharedGameState>,
    wallet: Res<SharedWallet>,
) {
    let gateway = PaymentGateway::new(
        gateway_config.base_url.clone(),
        gateway_config.api_key.clone(),
        gateway_config.bearer_token.clone(),
    );
    let orchestrator = PurchaseOrchestrator::new(
        Box::new(gateway),
        game.0.clone(),
        wallet.0.clone(),
        store_config.clone(),
    );
    commands.insert_resource(Orchestrator(Arc::new(orchestrator)));
    info!("[Boost] Orchestrator ready against {}", gateway_config.base_url);
}

// ═══════════════════════════════════════════════════════════════════════
// TASK SPAWNING
// ═══════════════════════════════════════════════════════════════════════

#[cfg(not(target_arch = "wasm32"))]
fn spawn_detached(future: impl std::future::Future<Output = ()> + Send + 'static) {
    IoTaskPool::get().spawn(future).detach();
}

// Wasm futures hold JS values and are not Send; the pool runs them locally.
#[cfg(target_arch = "wasm32")]
fn spawn_detached(future: impl std::future::Future<Output = ()> + 'static) {
    IoTaskPool::get().spawn_local(future).detach();
}

// ═══════════════════════════════════════════════════════════════════════
// SYSTEMS
// ═══════════════════════════════════════════════════════════════════════

pub fn handle_purchase_requests(
    mut requests: EventReader<PurchaseRequestEvent>,
    catalog: Res<BoostCatalog>,
    orchestrator: Res<Orchestrator>,
    wallet: Res<SharedWallet>,
    feed: Res<PurchaseFeed>,
    mut active: ResMut<ActivePurchase>,
    mut toasts: EventWriter<ToastEvent>,
) {
    for request in requests.read() {
        if let Some(in_flight) = &active.0 {
            info!(
                "[Boost] Ignoring purchase of {} while {} is in flight",
                request.item_id, in_flight
            );
            toasts.send(ToastEvent {
                message: "A boost purchase is already in flight".into(),
                duration_secs: 2.5,
            });
            continue;
        }
        let Some(item) = catalog.get(&request.item_id).cloned() else {
            warn!("[Boost] Unknown boost id {}", request.item_id);
            continue;
        };
        // Origin chain is wherever the connected wallet currently sits.
        let origin_chain_id = match wallet.0.lock().chain_id() {
            Ok(chain_id) => chain_id,
            Err(_) => {
                toasts.send(ToastEvent {
                    message: "Connect your wallet first (W)".into(),
                    duration_secs: 2.5,
                });
                continue;
            }
        };

        active.0 = Some(item.id.clone());
        info!("[Boost] Starting purchase of {} on chain {origin_chain_id}", item.id);

        let orchestrator = orchestrator.0.clone();
        let tx = feed.tx.clone();
        spawn_detached(async move {
            let status_tx = tx.clone();
            let result = orchestrator
                .purchase(&item, origin_chain_id, move |phase| {
                    let _ = status_tx.unbounded_send(FeedMsg::PhaseLabel {
                        message: phase.label().to_string(),
                    });
                })
                .await;
            let outcome = match result {
                Ok(receipt) => PurchaseOutcome::Settled {
                    status: receipt.status,
                    intent_id: receipt.intent_id,
                },
                Err(err) => PurchaseOutcome::Errored {
                    rejected: matches!(err, PaymentError::UserRejected),
                    message: err.to_string(),
                },
            };
            let _ = tx.unbounded_send(FeedMsg::Finished {
                item_id: item.id.clone(),
                outcome,
            });
        });
    }
}

pub fn handle_wallet_requests(
    mut connects: EventReader<WalletConnectRequestEvent>,
    mut disconnects: EventReader<WalletDisconnectRequestEvent>,
    wallet: Res<SharedWallet>,
    feed: Res<PurchaseFeed>,
) {
    if connects.read().next().is_some() {
        let tx = feed.tx.clone();
        spawn_detached(async move {
            let msg = match resolve_session().await {
                Ok(session) => FeedMsg::WalletResolved { session },
                Err(err) => FeedMsg::WalletFailed {
                    message: err.to_string(),
                },
            };
            let _ = tx.unbounded_send(msg);
        });
    }
    if disconnects.read().next().is_some() {
        wallet.0.lock().disconnect();
    }
}

/// Feeds task messages back into events and resources, once per frame.
pub fn drain_feed(
    feed: Res<PurchaseFeed>,
    catalog: Res<BoostCatalog>,
    wallet: Res<SharedWallet>,
    mut active: ResMut<ActivePurchase>,
    mut log: ResMut<PurchaseLog>,
    mut statuses: EventWriter<PurchaseStatusEvent>,
    mut finishes: EventWriter<PurchaseFinishedEvent>,
    mut connected: EventWriter<WalletConnectedEvent>,
    mut toasts: EventWriter<ToastEvent>,
) {
    let mut rx = feed.rx.lock();
    while let Ok(Some(msg)) = rx.try_next() {
        match msg {
            FeedMsg::PhaseLabel { message } => {
                statuses.send(PurchaseStatusEvent {
                    message: message.clone(),
                });
                toasts.send(ToastEvent {
                    message,
                    duration_secs: 2.0,
                });
            }
            FeedMsg::Finished { item_id, outcome } => {
                active.0 = None;
                let display_name = catalog
                    .get(&item_id)
                    .map(|item| item.name.clone())
                    .unwrap_or_else(|| item_id.clone());
                let (log_outcome, intent_id, toast_message) = match &outcome {
                    PurchaseOutcome::Settled { status, intent_id } => {
                        let message = match status {
                            IntentStatus::Completed => format!("{display_name} is live!"),
                            IntentStatus::Refunded => {
                                format!("{display_name} purchase refunded")
                            }
                            _ => format!("{display_name} purchase failed"),
                        };
                        (status.label().to_string(), Some(intent_id.clone()), message)
                    }
                    PurchaseOutcome::Errored { message, rejected } => {
                        let toast = if *rejected {
                            "Purchase cancelled".to_string()
                        } else {
                            format!("Purchase failed: {message}")
                        };
                        (
                            if *rejected { "rejected".into() } else { format!("error: {message}") },
                            None,
                            toast,
                        )
                    }
                };
                log.entries.push(PurchaseLogEntry {
                    item_id: item_id.clone(),
                    intent_id,
                    outcome: log_outcome,
                });
                toasts.send(ToastEvent {
                    message: toast_message,
                    duration_secs: 3.5,
                });
                finishes.send(PurchaseFinishedEvent { item_id, outcome });
            }
            FeedMsg::WalletResolved { session } => {
                wallet.0.lock().attach(session.clone());
                connected.send(WalletConnectedEvent {
                    address: session.address.clone(),
                    chain_id: session.chain_id,
                });
                toasts.send(ToastEvent {
                    message: format!("Wallet connected: {}", shorten_address(&session.address)),
                    duration_secs: 3.0,
                });
            }
            FeedMsg::WalletFailed { message } => {
                warn!("[Boost] Wallet connect failed: {message}");
                toasts.send(ToastEvent {
                    message,
                    duration_secs: 3.0,
                });
            }
        }
    }
}

