//! Game domain — the progression core and the systems that drive it.
//!
//! Clicks arrive through `PlayerInput`; idle income and multiplier expiry
//! run off a once-per-second ticker. A backgrounded tab that misses ticks
//! resumes with a single tick — there is no catch-up accounting.

pub mod state;

use bevy::prelude::*;

use crate::shared::*;

/// Drives `auto_generate` and the multiplier expiry check at 1 Hz.
#[derive(Resource)]
pub struct ProgressTicker {
    pub timer: Timer,
}

impl Default for ProgressTicker {
    fn default() -> Self {
        Self {
            timer: Timer::from_seconds(1.0, TimerMode::Repeating),
        }
    }
}

pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ProgressTicker>();
        app.add_systems(
            Update,
            (forge_clicks, reset_progress).run_if(in_state(AppScreen::Playing)),
        );
        // The ticker keeps running while the shop overlay is open.
        app.add_systems(Update, tick_progress);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// SYSTEMS
// ═══════════════════════════════════════════════════════════════════════

/// One forge stroke per click or Space press.
pub fn forge_clicks(
    input: Res<PlayerInput>,
    game: Res<SharedGameState>,
    mut forged: EventWriter<CoinsForgedEvent>,
) {
    if !input.forge_click {
        return;
    }
    let earned = game.0.lock().click();
    forged.send(CoinsForgedEvent {
        amount: earned,
        from_click: true,
    });
}

/// The 1 Hz tick: idle income plus the multiplier expiry check. Both calls
/// are safe to repeat and tolerate skipped periods.
pub fn tick_progress(
    time: Res<Time>,
    mut ticker: ResMut<ProgressTicker>,
    game: Res<SharedGameState>,
    mut forged: EventWriter<CoinsForgedEvent>,
    mut expired: EventWriter<MultiplierExpiredEvent>,
    mut toasts: EventWriter<ToastEvent>,
) {
    if !ticker.timer.tick(time.delta()).just_finished() {
        return;
    }

    let (earned, lapsed) = {
        let mut state = game.0.lock();
        let earned = state.auto_generate();
        let lapsed = state.check_multiplier_expiry(epoch_ms());
        (earned, lapsed)
    };

    if earned > 0.0 {
        forged.send(CoinsForgedEvent {
            amount: earned,
            from_click: false,
        });
    }
    if lapsed {
        expired.send(MultiplierExpiredEvent);
        toasts.send(ToastEvent {
            message: "Multiplier expired".into(),
            duration_secs: 3.0,
        });
    }
}

/// Delete wipes the record back to defaults.
pub fn reset_progress(
    input: Res<PlayerInput>,
    game: Res<SharedGameState>,
    mut toasts: EventWriter<ToastEvent>,
) {
    if !input.reset_progress {
        return;
    }
    game.0.lock().reset();
    info!("[Game] Progress reset");
    toasts.send(ToastEvent {
        message: "Progress reset".into(),
        duration_secs: 3.0,
    });
}
