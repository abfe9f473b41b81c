//! Single-slot persistence for the progression record.
//!
//! The record is one flat JSON object in one named slot: browser
//! `localStorage` on wasm, an exe-relative `saves/` file on native builds.
//! Loads swallow corruption — missing slot, undecodable JSON, out-of-range
//! values all fall back to the default record. Saves only `warn!`; a failed
//! write never surfaces to gameplay.

use bevy::log::warn;
#[cfg(not(target_arch = "wasm32"))]
use std::fs;
#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;

use crate::game::state::{GameState, Progress};

/// The one storage slot the game uses.
pub const SAVE_SLOT: &str = "coinforge.progress.v1";

// ═══════════════════════════════════════════════════════════════════════
// SLOT BACKENDS
// ═══════════════════════════════════════════════════════════════════════

#[cfg(not(target_arch = "wasm32"))]
fn saves_directory() -> PathBuf {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));
    exe_dir.join("saves")
}

#[cfg(not(target_arch = "wasm32"))]
fn slot_path(slot: &str) -> PathBuf {
    saves_directory().join(format!("{slot}.json"))
}

#[cfg(not(target_arch = "wasm32"))]
fn read_slot(slot: &str) -> Option<String> {
    fs::read_to_string(slot_path(slot)).ok()
}

#[cfg(not(target_arch = "wasm32"))]
fn write_slot(slot: &str, json: &str) -> Result<(), String> {
    let dir = saves_directory();
    if !dir.exists() {
        fs::create_dir_all(&dir).map_err(|e| format!("could not create saves dir: {e}"))?;
    }
    let path = slot_path(slot);
    // Write to a temp file first, then rename for atomicity
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, json).map_err(|e| format!("write failed: {e}"))?;
    fs::rename(&tmp_path, &path).map_err(|e| format!("rename failed: {e}"))?;
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

#[cfg(target_arch = "wasm32")]
fn read_slot(slot: &str) -> Option<String> {
    local_storage().and_then(|storage| storage.get_item(slot).ok().flatten())
}

#[cfg(target_arch = "wasm32")]
fn write_slot(slot: &str, json: &str) -> Result<(), String> {
    let storage = local_storage().ok_or("localStorage unavailable")?;
    storage
        .set_item(slot, json)
        .map_err(|_| "localStorage.setItem failed".to_string())
}

// ═══════════════════════════════════════════════════════════════════════
// RECORD I/O
// ═══════════════════════════════════════════════════════════════════════

/// Parses the slot. `None` on any kind of damage: absent slot, bad JSON,
/// unknown keys, values outside the record's invariants.
pub fn read_progress(slot: &str) -> Option<Progress> {
    let json = read_slot(slot)?;
    match serde_json::from_str::<Progress>(&json) {
        Ok(progress) if progress.is_valid() => Some(progress),
        Ok(_) => {
            warn!("[Save] Slot {slot} holds out-of-range values, starting fresh");
            None
        }
        Err(e) => {
            warn!("[Save] Slot {slot} is unreadable ({e}), starting fresh");
            None
        }
    }
}

/// Serializes the full record into the slot. Failures are logged and
/// dropped.
pub fn write_progress(slot: &str, progress: &Progress) {
    let json = match serde_json::to_string(progress) {
        Ok(json) => json,
        Err(e) => {
            warn!("[Save] Could not serialize progress: {e}");
            return;
        }
    };
    if let Err(e) = write_slot(slot, &json) {
        warn!("[Save] Could not write slot {slot}: {e}");
    }
}

/// Loads the slot (or defaults) and wires the container's persist hook back
/// to it, so every notifying mutation rewrites the slot.
pub fn open_slot(slot: &str) -> GameState {
    let progress = read_progress(slot).unwrap_or_default();
    let slot_name = slot.to_string();
    GameState::new(
        progress,
        Box::new(move |p| write_progress(&slot_name, p)),
    )
}

// ═══════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn round_trip_reproduces_record() {
        let slot = "test.round_trip";
        let mut game = open_slot(slot);
        game.add_click_power(4.0);
        game.set_multiplier(2.0, 5_000.0, 1_000.0);
        game.click();
        let expected = game.progress().clone();

        let reloaded = open_slot(slot);
        assert_eq!(*reloaded.progress(), expected);
        let _ = fs::remove_file(slot_path(slot));
    }

    #[test]
    fn missing_slot_yields_defaults() {
        let game = open_slot("test.never_written");
        assert_eq!(*game.progress(), Progress::default());
    }

    #[test]
    fn corrupt_slot_yields_defaults() {
        let slot = "test.corrupt";
        write_slot(slot, "{not json at all").unwrap();
        assert!(read_progress(slot).is_none());
        let game = open_slot(slot);
        assert_eq!(*game.progress(), Progress::default());
        let _ = fs::remove_file(slot_path(slot));
    }

    #[test]
    fn unknown_keys_discard_the_slot() {
        let slot = "test.unknown_keys";
        write_slot(
            slot,
            r#"{"coins":5,"clickPower":1,"autoPerSecond":0,"multiplier":1,
               "multiplierEndTime":0,"totalClicks":1,"totalCoinsEarned":5,
               "purchaseCount":0,"legacyField":true}"#,
        )
        .unwrap();
        assert!(read_progress(slot).is_none());
        let _ = fs::remove_file(slot_path(slot));
    }

    #[test]
    fn out_of_range_values_discard_the_slot() {
        let slot = "test.out_of_range";
        write_slot(
            slot,
            r#"{"coins":-3,"clickPower":1,"autoPerSecond":0,"multiplier":1,
               "multiplierEndTime":0,"totalClicks":0,"totalCoinsEarned":0,
               "purchaseCount":0}"#,
        )
        .unwrap();
        assert!(read_progress(slot).is_none());
        let _ = fs::remove_file(slot_path(slot));
    }
}
