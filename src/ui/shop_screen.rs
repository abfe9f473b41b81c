use bevy::prelude::*;

use crate::shared::*;

// ═══════════════════════════════════════════════════════════════════════
// COMPONENTS & RESOURCES
// ═══════════════════════════════════════════════════════════════════════

#[derive(Component)]
pub struct ShopScreenRoot;

#[derive(Component)]
pub struct ShopRow {
    pub index: usize,
}

#[derive(Component)]
pub struct ShopWalletText;

#[derive(Component)]
pub struct ShopFlightText;

/// Cursor position while the shop overlay is open.
#[derive(Resource, Default)]
pub struct ShopUiState {
    pub cursor: usize,
}

// ═══════════════════════════════════════════════════════════════════════
// SPAWN / DESPAWN
// ═══════════════════════════════════════════════════════════════════════

pub fn spawn_shop_screen(mut commands: Commands, catalog: Res<BoostCatalog>) {
    commands.insert_resource(ShopUiState::default());

    commands
        .spawn((
            ShopScreenRoot,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.5)),
        ))
        .with_children(|parent| {
            parent
                .spawn((
                    Node {
                        width: Val::Px(520.0),
                        flex_direction: FlexDirection::Column,
                        padding: UiRect::all(Val::Px(16.0)),
                        row_gap: Val::Px(8.0),
                        border: UiRect::all(Val::Px(3.0)),
                        ..default()
                    },
                    BackgroundColor(Color::srgba(0.08, 0.09, 0.12, 0.95)),
                    BorderColor(Color::srgb(0.3, 0.4, 0.6)),
                ))
                .with_children(|panel| {
                    panel.spawn((
                        Text::new("BOOST SHOP"),
                        TextFont {
                            font_size: 24.0,
                            ..default()
                        },
                        TextColor(Color::srgb(1.0, 0.85, 0.3)),
                    ));
                    panel.spawn((
                        ShopWalletText,
                        Text::new(""),
                        TextFont {
                            font_size: 13.0,
                            ..default()
                        },
                        TextColor(Color::srgba(0.8, 0.8, 0.8, 0.9)),
                    ));

                    for (index, item) in catalog.items.iter().enumerate() {
                        panel.spawn((
                            ShopRow { index },
                            Text::new(format!(
                                "{} — {} — {:.2} USDC\n    {}",
                                item.name,
                                item.effect.summary(),
                                item.price,
                                item.description
                            )),
                            TextFont {
                                font_size: 15.0,
                                ..default()
                            },
                            TextColor(Color::WHITE),
                        ));
                    }

                    panel.spawn((
                        ShopFlightText,
                        Text::new(""),
                        TextFont {
                            font_size: 13.0,
                            ..default()
                        },
                        TextColor(Color::srgb(0.6, 0.8, 1.0)),
                    ));
                    panel.spawn((
                        Text::new("Up/Down: select • Enter: buy • Esc: close"),
                        TextFont {
                            font_size: 12.0,
                            ..default()
                        },
                        TextColor(Color::srgba(0.7, 0.7, 0.7, 0.8)),
                    ));
                });
        });
}

pub fn despawn_shop_screen(mut commands: Commands, query: Query<Entity, With<ShopScreenRoot>>) {
    for entity in &query {
        commands.entity(entity).despawn_recursive();
    }
    commands.remove_resource::<ShopUiState>();
}

// ═══════════════════════════════════════════════════════════════════════
// SYSTEMS
// ═══════════════════════════════════════════════════════════════════════

pub fn shop_navigation(
    input: Res<PlayerInput>,
    catalog: Res<BoostCatalog>,
    mut ui_state: ResMut<ShopUiState>,
    mut next_screen: ResMut<NextState<AppScreen>>,
    mut purchases: EventWriter<PurchaseRequestEvent>,
) {
    let count = catalog.items.len();
    if count == 0 {
        return;
    }

    if input.menu_up {
        ui_state.cursor = (ui_state.cursor + count - 1) % count;
    }
    if input.menu_down {
        ui_state.cursor = (ui_state.cursor + 1) % count;
    }
    if input.menu_confirm {
        let item = &catalog.items[ui_state.cursor];
        purchases.send(PurchaseRequestEvent {
            item_id: item.id.clone(),
        });
    }
    if input.menu_cancel || input.toggle_shop {
        next_screen.set(AppScreen::Playing);
    }
}

pub fn update_shop_display(
    ui_state: Res<ShopUiState>,
    active: Res<ActivePurchase>,
    catalog: Res<BoostCatalog>,
    wallet: Res<SharedWallet>,
    mut rows: Query<(&ShopRow, &mut TextColor)>,
    mut wallet_query: Query<&mut Text, (With<ShopWalletText>, Without<ShopFlightText>)>,
    mut flight_query: Query<&mut Text, (With<ShopFlightText>, Without<ShopWalletText>)>,
) {
    for (row, mut color) in &mut rows {
        color.0 = if row.index == ui_state.cursor {
            Color::srgb(1.0, 0.85, 0.3)
        } else {
            Color::WHITE
        };
    }

    let wallet_line = {
        let wallet = wallet.0.lock();
        match wallet.session() {
            Some(session) => format!(
                "Paying from {} (chain {})",
                shorten_address(&session.address),
                session.chain_id
            ),
            None => "No wallet connected — press W first".to_string(),
        }
    };
    for mut text in &mut wallet_query {
        **text = wallet_line.clone();
    }

    let flight_line = match &active.0 {
        Some(item_id) => {
            let name = catalog
                .get(item_id)
                .map(|item| item.name.clone())
                .unwrap_or_else(|| item_id.clone());
            format!("Purchasing {name}…")
        }
        None => String::new(),
    };
    for mut text in &mut flight_query {
        **text = flight_line.clone();
    }
}
