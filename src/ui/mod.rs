//! UI domain — HUD, toast stack, and the boost shop overlay.
//!
//! Presentation only: these systems read snapshots and events, never the
//! progression record directly through anything but `SharedGameState`.

mod hud;
mod shop_screen;
mod toast;

use bevy::prelude::*;

use crate::shared::*;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        // ─── TOASTS — always present ───
        app.add_systems(Startup, toast::spawn_toast_container);
        app.add_systems(
            Update,
            (toast::handle_toast_events, toast::update_toasts).chain(),
        );

        // ─── HUD — visible during Playing ───
        app.add_systems(OnEnter(AppScreen::Playing), hud::spawn_hud);
        app.add_systems(OnExit(AppScreen::Playing), hud::despawn_hud);
        app.add_systems(
            Update,
            (
                hud::update_progress_display,
                hud::update_wallet_display,
                hud::update_status_line,
                open_shop,
            )
                .run_if(in_state(AppScreen::Playing)),
        );

        // ─── SHOP OVERLAY ───
        app.add_systems(OnEnter(AppScreen::Shop), shop_screen::spawn_shop_screen);
        app.add_systems(OnExit(AppScreen::Shop), shop_screen::despawn_shop_screen);
        app.add_systems(
            Update,
            (shop_screen::shop_navigation, shop_screen::update_shop_display)
                .run_if(in_state(AppScreen::Shop)),
        );

        // ─── WALLET HOTKEY — works on both screens ───
        app.add_systems(Update, wallet_hotkey);
    }
}

fn open_shop(input: Res<PlayerInput>, mut next_screen: ResMut<NextState<AppScreen>>) {
    if input.toggle_shop {
        next_screen.set(AppScreen::Shop);
    }
}

fn wallet_hotkey(
    input: Res<PlayerInput>,
    mut connect_requests: EventWriter<WalletConnectRequestEvent>,
    mut disconnect_requests: EventWriter<WalletDisconnectRequestEvent>,
) {
    if input.connect_wallet {
        connect_requests.send(WalletConnectRequestEvent);
    }
    if input.disconnect_wallet {
        disconnect_requests.send(WalletDisconnectRequestEvent);
    }
}
