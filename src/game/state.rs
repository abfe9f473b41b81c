//! The progression record and its observable container.
//!
//! Every mutation runs as one logical unit: validate, mutate, persist,
//! notify. The persist step is an injected hook so the container stays
//! storage-agnostic (localStorage on wasm, a save file on native, a no-op in
//! headless tests). Listeners receive a read-only snapshot after every
//! notifying mutation and must not call back into the container.

use bevy::log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;

// ═══════════════════════════════════════════════════════════════════════
// PROGRESS RECORD
// ═══════════════════════════════════════════════════════════════════════

/// The persisted progression counters. Wire names match the storage slot
/// format; unknown keys fail the whole parse so a tampered slot falls back
/// to defaults instead of part-merging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Progress {
    pub coins: f64,
    pub click_power: f64,
    pub auto_per_second: f64,
    pub multiplier: f64,
    /// Absolute expiry in epoch ms; 0 (or any past instant) means inactive.
    #[serde(rename = "multiplierEndTime")]
    pub multiplier_end_ms: f64,
    pub total_clicks: u64,
    pub total_coins_earned: f64,
    pub purchase_count: u64,
}

impl Default for Progress {
    fn default() -> Self {
        Self {
            coins: 0.0,
            click_power: 1.0,
            auto_per_second: 0.0,
            multiplier: 1.0,
            multiplier_end_ms: 0.0,
            total_clicks: 0,
            total_coins_earned: 0.0,
            purchase_count: 0,
        }
    }
}

impl Progress {
    /// Range invariants of the record. A loaded slot that violates any of
    /// them is treated as corrupt.
    pub fn is_valid(&self) -> bool {
        self.coins.is_finite()
            && self.coins >= 0.0
            && self.click_power.is_finite()
            && self.click_power >= 1.0
            && self.auto_per_second.is_finite()
            && self.auto_per_second >= 0.0
            && self.multiplier.is_finite()
            && self.multiplier >= 1.0
            && self.multiplier_end_ms.is_finite()
            && self.multiplier_end_ms >= 0.0
            && self.total_coins_earned.is_finite()
            && self.coins <= self.total_coins_earned + 1e-6
    }
}

// ═══════════════════════════════════════════════════════════════════════
// OBSERVABLE CONTAINER
// ═══════════════════════════════════════════════════════════════════════

/// Handle returned by [`GameState::subscribe`]; pass it back to
/// [`GameState::unsubscribe`] to drop the listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&Progress) + Send + Sync>;
type PersistHook = Box<dyn Fn(&Progress) + Send + Sync>;

pub struct GameState {
    progress: Progress,
    persist: PersistHook,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl fmt::Debug for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameState")
            .field("progress", &self.progress)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl GameState {
    pub fn new(progress: Progress, persist: PersistHook) -> Self {
        Self {
            progress,
            persist,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Container with default progress and no persistence. Headless tests
    /// and benches use this; the game itself goes through `save::open_slot`.
    pub fn in_memory() -> Self {
        Self::new(Progress::default(), Box::new(|_| {}))
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    // ── Named operations ───────────────────────────────────────────────

    /// One forge click. Returns the amount earned.
    pub fn click(&mut self) -> f64 {
        let earned = self.progress.click_power * self.progress.multiplier;
        self.progress.total_clicks += 1;
        self.progress.coins += earned;
        self.progress.total_coins_earned += earned;
        self.commit();
        earned
    }

    /// One second of idle income. A true no-op (no persist, no notify)
    /// while the auto rate is zero.
    pub fn auto_generate(&mut self) -> f64 {
        if self.progress.auto_per_second <= 0.0 {
            return 0.0;
        }
        let earned = self.progress.auto_per_second * self.progress.multiplier;
        self.progress.coins += earned;
        self.progress.total_coins_earned += earned;
        self.commit();
        earned
    }

    /// Permanent additive click-power upgrade.
    pub fn add_click_power(&mut self, amount: f64) {
        if !amount.is_finite() || amount <= 0.0 {
            warn!("[Game] Ignoring click power upgrade of {amount}");
            return;
        }
        self.progress.click_power += amount;
        self.progress.purchase_count += 1;
        self.commit();
    }

    /// Permanent additive auto-forge upgrade.
    pub fn add_auto_per_second(&mut self, amount: f64) {
        if !amount.is_finite() || amount <= 0.0 {
            warn!("[Game] Ignoring auto rate upgrade of {amount}");
            return;
        }
        self.progress.auto_per_second += amount;
        self.progress.purchase_count += 1;
        self.commit();
    }

    /// Activates a timed multiplier. A later purchase overwrites an active
    /// one outright (value and expiry both), even when smaller.
    pub fn set_multiplier(&mut self, value: f64, duration_ms: f64, now_ms: f64) {
        let value = if !value.is_finite() || value < 1.0 {
            warn!("[Game] Multiplier {value} below 1, clamping");
            1.0
        } else {
            value
        };
        self.progress.multiplier = value;
        self.progress.multiplier_end_ms = now_ms + duration_ms.max(0.0);
        self.progress.purchase_count += 1;
        self.commit();
    }

    /// Lapses an expired multiplier. Returns true exactly once per expiry
    /// (the reset writes multiplier back to 1). Driven by the 1 Hz ticker.
    pub fn check_multiplier_expiry(&mut self, now_ms: f64) -> bool {
        if self.progress.multiplier > 1.0 && now_ms > self.progress.multiplier_end_ms {
            self.progress.multiplier = 1.0;
            self.progress.multiplier_end_ms = 0.0;
            self.commit();
            return true;
        }
        false
    }

    /// Back to the default record.
    pub fn reset(&mut self) {
        self.progress = Progress::default();
        self.commit();
    }

    // ── Subscriptions ──────────────────────────────────────────────────

    /// Registers a listener called with a snapshot after every notifying
    /// mutation. Notification order follows registration order.
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&Progress) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false if the handle was already removed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Persist, then notify. Runs inside whatever lock guards this
    /// container, so observed mutations never interleave.
    fn commit(&mut self) {
        (self.persist)(&self.progress);
        for (_, listener) in &mut self.listeners {
            listener(&self.progress);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════
