//! Input domain — the single point where hardware input becomes game
//! actions. Everything downstream reads `PlayerInput`, never the keyboard.

use bevy::prelude::*;

use crate::shared::*;

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlayerInput>();
        app.add_systems(PreUpdate, reset_and_read_input);
    }
}

fn reset_and_read_input(
    keys: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    screen: Res<State<AppScreen>>,
    mut input: ResMut<PlayerInput>,
) {
    *input = PlayerInput::default();

    input.toggle_shop = keys.just_pressed(KeyCode::KeyB) || keys.just_pressed(KeyCode::Tab);
    input.connect_wallet = keys.just_pressed(KeyCode::KeyW);
    input.disconnect_wallet = keys.just_pressed(KeyCode::KeyX);

    match screen.get() {
        AppScreen::Playing => {
            input.forge_click = mouse.just_pressed(MouseButton::Left)
                || keys.just_pressed(KeyCode::Space);
            input.reset_progress = keys.just_pressed(KeyCode::Delete);
        }
        AppScreen::Shop => {
            input.menu_up =
                keys.just_pressed(KeyCode::ArrowUp) || keys.just_pressed(KeyCode::KeyK);
            input.menu_down =
                keys.just_pressed(KeyCode::ArrowDown) || keys.just_pressed(KeyCode::KeyJ);
            input.menu_confirm =
                keys.just_pressed(KeyCode::Enter) || keys.just_pressed(KeyCode::Space);
            input.menu_cancel = keys.just_pressed(KeyCode::Escape);
        }
    }
}
