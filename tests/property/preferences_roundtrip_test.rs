//! Property-based tests for preference persistence.
//!
//! Whatever valid preferences are saved, a fresh store pointed at the same file
//! loads them back unchanged.

use clean_reader::services::preference_store::{PreferenceStore, PreferenceStoreTrait, PREFERENCES_FILE};
use clean_reader::types::reader::{FontFamily, ReaderPreferences, MAX_FONT_SIZE_PX, MIN_FONT_SIZE_PX};
use proptest::prelude::*;
use serde_json::json;
use tempfile::TempDir;

fn arb_font_family() -> impl Strategy<Value = FontFamily> {
    prop_oneof![
        Just(FontFamily::Serif),
        Just(FontFamily::SansSerif),
        Just(FontFamily::Monospace),
        "[A-Z][a-z]{3,10} (Pro|Text|Display)".prop_map(FontFamily::Custom),
    ]
}

fn arb_preferences() -> impl Strategy<Value = ReaderPreferences> {
    (MIN_FONT_SIZE_PX..=MAX_FONT_SIZE_PX, arb_font_family(), any::<bool>()).prop_map(
        |(font_size_px, font_family, dark_mode)| ReaderPreferences {
            font_size_px,
            font_family,
            dark_mode,
        },
    )
}

fn store_in(dir: &TempDir) -> PreferenceStore {
    let path = dir.path().join(PREFERENCES_FILE).to_string_lossy().to_string();
    PreferenceStore::new(Some(path))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn saved_preferences_load_back(prefs in arb_preferences()) {
        let dir = TempDir::new().expect("Failed to create temp dir");
        store_in(&dir)
            .set_preferences(prefs.clone())
            .expect("valid preferences should save");

        let loaded = store_in(&dir).load().expect("saved file should load");
        prop_assert_eq!(loaded, prefs);
    }

    #[test]
    fn theme_alias_matches_dark_mode(dark in any::<bool>()) {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let mut by_theme = store_in(&dir);
        by_theme
            .set_value("theme", json!(if dark { "dark" } else { "light" }))
            .expect("theme alias should be accepted");
        prop_assert_eq!(by_theme.get_preferences().dark_mode, dark);

        let mut by_key = store_in(&dir);
        by_key.set_value("darkMode", json!(dark)).expect("darkMode should be accepted");
        prop_assert_eq!(by_key.get_preferences(), by_theme.get_preferences());
    }

    #[test]
    fn out_of_range_font_size_is_refused(size in prop_oneof![0u32..MIN_FONT_SIZE_PX, (MAX_FONT_SIZE_PX + 1)..200]) {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let mut store = store_in(&dir);
        prop_assert!(store.set_value("fontSize", json!(size)).is_err());
        prop_assert_eq!(store.get_preferences().font_size_px, 16);
    }
}
