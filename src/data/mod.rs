//! Data layer — the boost catalog and the store configuration.
//!
//! Both tables are hard-coded game-design data, inserted as resources when
//! the plugin registers so every other domain can read them from frame one.
//! No other domain seeds these resources.

use bevy::prelude::*;
use std::collections::HashMap;

use crate::shared::{BoostCatalog, BoostEffect, BoostItem, StoreConfig};

pub struct DataPlugin;

impl Plugin for DataPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(boost_catalog());
        app.insert_resource(store_config());
        info!("DataPlugin: catalog and store config loaded");
    }
}

// ═══════════════════════════════════════════════════════════════════════
// BOOST CATALOG
// ═══════════════════════════════════════════════════════════════════════

/// Prices are in the settlement token (USDC). Effect numbers are tuned so
/// the cheapest boost in each family is worth buying in the first session.
pub fn boost_catalog() -> BoostCatalog {
    let items = vec![
        BoostItem {
            id: "iron_cursor".into(),
            name: "Iron Cursor".into(),
            description: "A sturdier striking arm for the forge.".into(),
            price: 0.99,
            effect: BoostEffect::ClickPower { amount: 1.0 },
        },
        BoostItem {
            id: "steel_cursor".into(),
            name: "Steel Cursor".into(),
            description: "Five times the heft, none of the rust.".into(),
            price: 3.99,
            effect: BoostEffect::ClickPower { amount: 5.0 },
        },
        BoostItem {
            id: "apprentice_bellows".into(),
            name: "Apprentice Bellows".into(),
            description: "Keeps the fire going while you look away.".into(),
            price: 1.99,
            effect: BoostEffect::AutoRate { amount: 1.0 },
        },
        BoostItem {
            id: "journeyman_bellows".into(),
            name: "Journeyman Bellows".into(),
            description: "A steady five coins a second, hands free.".into(),
            price: 6.99,
            effect: BoostEffect::AutoRate { amount: 5.0 },
        },
        BoostItem {
            id: "golden_rush".into(),
            name: "Golden Rush".into(),
            description: "Everything doubles for ten minutes.".into(),
            price: 2.49,
            effect: BoostEffect::Multiplier {
                value: 2.0,
                duration_ms: 600_000.0,
            },
        },
        BoostItem {
            id: "dragons_breath".into(),
            name: "Dragon's Breath".into(),
            description: "Five minutes of quintuple output. Stand back.".into(),
            price: 4.99,
            effect: BoostEffect::Multiplier {
                value: 5.0,
                duration_ms: 300_000.0,
            },
        },
    ];
    BoostCatalog { items }
}

// ═══════════════════════════════════════════════════════════════════════
// STORE CONFIGURATION
// ═══════════════════════════════════════════════════════════════════════

/// Payments settle as USDC on Base into the store treasury. Origin side
/// accepts USDC on the majors; anything else is left for the intent service
/// to reject as an unsupported route.
pub fn store_config() -> StoreConfig {
    let origin_tokens: HashMap<u64, String> = [
        // Ethereum mainnet
        (1u64, "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"),
        // Base
        (8453, "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913"),
        // Arbitrum One
        (42161, "0xaf88d065e77c8cC2239327C5EDb3A432268e5831"),
        // Optimism
        (10, "0x0b2C639c533813f4Aa9D7837CAf62653d097Ff85"),
        // Polygon PoS
        (137, "0x3c499c542cEF5E3811e1192ce70d8cC03d5c3359"),
    ]
    .into_iter()
    .map(|(chain, token)| (chain, token.to_string()))
    .collect();

    StoreConfig {
        destination_chain_id: 8453,
        destination_token: "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913".into(),
        treasury_address: "0x9e2B3c41f0D7C35Aa6E1b2249E30B5C1F4A8D6e3".into(),
        settlement_decimals: 6,
        origin_tokens,
        slippage_bps: 50,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_ids_are_unique() {
        let catalog = boost_catalog();
        let mut ids: Vec<_> = catalog.items.iter().map(|i| i.id.as_str()).collect();
        ids.sort_unstable();
        let len_before = ids.len();
        ids.dedup();
        assert_eq!(ids.len(), len_before);
        assert!(len_before >= 6);
    }

    #[test]
    fn catalog_covers_all_effect_kinds() {
        let catalog = boost_catalog();
        assert!(catalog
            .items
            .iter()
            .any(|i| matches!(i.effect, BoostEffect::ClickPower { .. })));
        assert!(catalog
            .items
            .iter()
            .any(|i| matches!(i.effect, BoostEffect::AutoRate { .. })));
        assert!(catalog
            .items
            .iter()
            .any(|i| matches!(i.effect, BoostEffect::Multiplier { .. })));
        assert!(catalog.items.iter().all(|i| i.price > 0.0));
    }

    #[test]
    fn store_accepts_its_own_settlement_chain() {
        let config = store_config();
        assert_eq!(
            config.origin_token_for(config.destination_chain_id),
            config.destination_token
        );
        // Unknown chains forward empty and get rejected upstream.
        assert_eq!(config.origin_token_for(999_999), "");
    }
}
