mod shared;
mod input;
mod game;
mod save;
mod payment;
mod data;
mod boost;
mod ui;

use bevy::prelude::*;
use bevy::window::{PresentMode, WindowResolution};

use shared::*;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Coinforge".into(),
                resolution: WindowResolution::new(960.0, 540.0),
                present_mode: PresentMode::AutoVsync,
                resizable: true,
                ..default()
            }),
            ..default()
        }))
        // Screen state
        .init_state::<AppScreen>()
        // Shared resources — the progression record is loaded once from its
        // storage slot and injected everywhere else from here.
        .insert_resource(SharedGameState::new(save::open_slot(save::SAVE_SLOT)))
        .insert_resource(SharedWallet::default())
        // Events
        .add_event::<ToastEvent>()
        .add_event::<CoinsForgedEvent>()
        .add_event::<MultiplierExpiredEvent>()
        .add_event::<PurchaseRequestEvent>()
        .add_event::<PurchaseStatusEvent>()
        .add_event::<PurchaseFinishedEvent>()
        .add_event::<WalletConnectRequestEvent>()
        .add_event::<WalletDisconnectRequestEvent>()
        .add_event::<WalletConnectedEvent>()
        // Domain plugins
        .add_plugins(data::DataPlugin)
        .add_plugins(input::InputPlugin)
        .add_plugins(game::GamePlugin)
        .add_plugins(boost::BoostPlugin)
        .add_plugins(ui::UiPlugin)
        // Camera
        .add_systems(Startup, setup_camera)
        .run();
}

fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}
