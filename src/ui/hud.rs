use bevy::prelude::*;

use crate::shared::*;

// ═══════════════════════════════════════════════════════════════════════
// MARKER COMPONENTS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Component)]
pub struct HudRoot;

#[derive(Component)]
pub struct HudCoinsText;

#[derive(Component)]
pub struct HudRatesText;

#[derive(Component)]
pub struct HudMultiplierText;

#[derive(Component)]
pub struct HudWalletText;

/// Current purchase phase label, empty when idle.
#[derive(Component)]
pub struct HudStatusText;

// ═══════════════════════════════════════════════════════════════════════
// SPAWN / DESPAWN
// ═══════════════════════════════════════════════════════════════════════

pub fn spawn_hud(mut commands: Commands) {
    commands
        .spawn((
            HudRoot,
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(16.0),
                left: Val::Px(16.0),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(4.0),
                ..default()
            },
        ))
        .with_children(|parent| {
            parent.spawn((
                HudCoinsText,
                Text::new("0 coins"),
                TextFont {
                    font_size: 32.0,
                    ..default()
                },
                TextColor(Color::srgb(1.0, 0.85, 0.3)),
            ));
            parent.spawn((
                HudRatesText,
                Text::new("1/click • 0/s"),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
            parent.spawn((
                HudMultiplierText,
                Text::new(""),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgb(0.5, 1.0, 0.5)),
            ));
            parent.spawn((
                HudWalletText,
                Text::new("Wallet: not connected"),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(Color::srgba(0.8, 0.8, 0.8, 0.9)),
            ));
            parent.spawn((
                HudStatusText,
                Text::new(""),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(Color::srgb(0.6, 0.8, 1.0)),
            ));
            parent.spawn((
                Text::new("Click to forge • B: boost shop • W: wallet • Del: reset"),
                TextFont {
                    font_size: 12.0,
                    ..default()
                },
                TextColor(Color::srgba(0.7, 0.7, 0.7, 0.8)),
            ));
        });
}

pub fn despawn_hud(mut commands: Commands, query: Query<Entity, With<HudRoot>>) {
    for entity in &query {
        commands.entity(entity).despawn_recursive();
    }
}

// ═══════════════════════════════════════════════════════════════════════
// UPDATE SYSTEMS
// ═══════════════════════════════════════════════════════════════════════

/// Refreshed every frame: the record lives behind a lock, so Bevy's change
/// detection never sees it move.
pub fn update_progress_display(
    game: Res<SharedGameState>,
    mut coins_query: Query<&mut Text, With<HudCoinsText>>,
    mut rates_query: Query<&mut Text, (With<HudRatesText>, Without<HudCoinsText>)>,
    mut multiplier_query: Query<
        &mut Text,
        (With<HudMultiplierText>, Without<HudCoinsText>, Without<HudRatesText>),
    >,
) {
    let snapshot = game.snapshot();

    for mut text in &mut coins_query {
        **text = format!("{} coins", format_coins(snapshot.coins));
    }
    for mut text in &mut rates_query {
        **text = format!(
            "{}/click • {}/s",
            format_coins(snapshot.click_power * snapshot.multiplier),
            format_coins(snapshot.auto_per_second * snapshot.multiplier),
        );
    }
    for mut text in &mut multiplier_query {
        **text = if snapshot.multiplier > 1.0 {
            let remaining_s = ((snapshot.multiplier_end_ms - epoch_ms()) / 1_000.0).max(0.0) as u64;
            format!(
                "x{} boost — {}:{:02} left",
                snapshot.multiplier,
                remaining_s / 60,
                remaining_s % 60
            )
        } else {
            String::new()
        };
    }
}

pub fn update_wallet_display(
    wallet: Res<SharedWallet>,
    mut query: Query<&mut Text, With<HudWalletText>>,
) {
    let line = {
        let wallet = wallet.0.lock();
        match wallet.session() {
            Some(session) => format!(
                "Wallet: {} (chain {})",
                shorten_address(&session.address),
                session.chain_id
            ),
            None => "Wallet: not connected".to_string(),
        }
    };
    for mut text in &mut query {
        **text = line.clone();
    }
}

/// Shows the in-flight purchase phase, clears when the purchase finishes.
pub fn update_status_line(
    mut statuses: EventReader<PurchaseStatusEvent>,
    mut finishes: EventReader<PurchaseFinishedEvent>,
    mut query: Query<&mut Text, With<HudStatusText>>,
) {
    let mut line: Option<String> = None;
    for status in statuses.read() {
        line = Some(status.message.clone());
    }
    if finishes.read().next().is_some() {
        line = Some(String::new());
    }
    if let Some(line) = line {
        for mut text in &mut query {
            **text = line.clone();
        }
    }
}

/// Whole coins below a thousand, compact suffixes above.
fn format_coins(amount: f64) -> String {
    if amount >= 1_000_000.0 {
        format!("{:.2}M", amount / 1_000_000.0)
    } else if amount >= 1_000.0 {
        format!("{:.1}k", amount / 1_000.0)
    } else if amount.fract() == 0.0 {
        format!("{}", amount as u64)
    } else {
        format!("{amount:.1}")
    }
}
