//! Store contract tests, run against every backend.
//!
//! Each backend must give the same observable behavior for keys that do not
//! collide and for kinds with free capacity.

use rs_webgui::{
    backends::{FixedSlotBackend, HashedEepromBackend, PreferencesBackend},
    hal::{MockEeprom, MockFlash, MockPreferences},
    HashedLayout, SettingKind, SettingValue, SettingsConfig, SettingsStore,
};

fn preferences() -> SettingsStore<PreferencesBackend<MockPreferences>> {
    SettingsStore::preferences(MockPreferences::new(), &SettingsConfig::default())
}

fn hashed() -> SettingsStore<HashedEepromBackend<MockEeprom>> {
    SettingsStore::hashed_eeprom(MockEeprom::new(8192), &SettingsConfig::default()).unwrap()
}

fn hashed_compact() -> SettingsStore<HashedEepromBackend<MockEeprom>> {
    let config = SettingsConfig::default().with_layout(HashedLayout::COMPACT);
    SettingsStore::hashed_eeprom(MockEeprom::new(1024), &config).unwrap()
}

fn fixed_slot() -> SettingsStore<FixedSlotBackend<MockFlash>> {
    SettingsStore::fixed_slot(MockFlash::new(4096), &SettingsConfig::default())
}

macro_rules! store_contract {
    ($name:ident, $make:expr) => {
        mod $name {
            use super::*;

            // =================================================================
            // Round-trip
            // =================================================================

            #[test]
            fn round_trip_each_kind() {
                let mut store = $make;
                store.save("temp", 72);
                store.save("ratio", 0.125f32);
                store.save("enabled", true);
                store.save("name", "abc");

                assert_eq!(store.load_int("temp"), 72);
                assert_eq!(store.load_float("ratio"), 0.125);
                assert!(store.load_bool("enabled"));
                assert_eq!(store.load_string("name").as_str(), "abc");
            }

            #[test]
            fn round_trip_extremes() {
                let mut store = $make;
                store.save("min", i32::MIN);
                store.save("max", i32::MAX);
                store.save("neg", -1);
                store.save("tiny", f32::MIN_POSITIVE);
                store.save("empty", "");

                assert_eq!(store.load_int("min"), i32::MIN);
                assert_eq!(store.load_int("max"), i32::MAX);
                assert_eq!(store.load_int("neg"), -1);
                assert_eq!(store.load_float("tiny"), f32::MIN_POSITIVE);
                assert_eq!(store.load_string("empty").as_str(), "");
            }

            #[test]
            fn nan_round_trips_as_nan() {
                let mut store = $make;
                store.save("nan", f32::NAN);
                assert!(store.load_float("nan").is_nan());
            }

            #[test]
            fn false_round_trips() {
                let mut store = $make;
                store.save("flag", true);
                store.save("flag", false);
                assert!(!store.load_bool("flag"));
            }

            // =================================================================
            // Defaults
            // =================================================================

            #[test]
            fn default_on_miss() {
                let mut store = $make;
                assert_eq!(store.load_int("never_saved"), 0);
                assert_eq!(store.load_float("never_saved"), 0.0);
                assert!(!store.load_bool("never_saved"));
                assert_eq!(store.load_string("never_saved").as_str(), "");
            }

            #[test]
            fn load_value_defaults_match_kind() {
                let mut store = $make;
                for kind in SettingKind::ALL {
                    assert_eq!(
                        store.load_value("never_saved", kind),
                        SettingValue::default_for(kind)
                    );
                }
            }

            // =================================================================
            // Idempotence and overwrite
            // =================================================================

            #[test]
            fn repeated_save_is_idempotent() {
                let mut store = $make;
                store.save("k", 9);
                store.save("k", 9);
                assert_eq!(store.load_int("k"), 9);
            }

            #[test]
            fn overwrite_keeps_latest() {
                let mut store = $make;
                store.save("k", 1);
                store.save("k", 2);
                assert_eq!(store.load_int("k"), 2);

                store.save("s", "first");
                store.save("s", "second");
                assert_eq!(store.load_string("s").as_str(), "second");
            }

            #[test]
            fn shorter_string_overwrite_has_no_leftovers() {
                let mut store = $make;
                store.save("s", "longer value");
                store.save("s", "ab");
                assert_eq!(store.load_string("s").as_str(), "ab");
            }

            // =================================================================
            // Clear
            // =================================================================

            #[test]
            fn clear_resets_all() {
                let mut store = $make;
                store.save("a", 1);
                store.save("b", 2.5f32);
                store.save("c", true);
                store.save("d", "text");
                store.clear();

                assert_eq!(store.load_int("a"), 0);
                assert_eq!(store.load_float("b"), 0.0);
                assert!(!store.load_bool("c"));
                assert_eq!(store.load_string("d").as_str(), "");
            }

            #[test]
            fn save_after_clear() {
                let mut store = $make;
                store.save("a", 1);
                store.clear();
                store.save("a", 3);
                assert_eq!(store.load_int("a"), 3);
            }

            // =================================================================
            // Kinds
            // =================================================================

            #[test]
            fn cross_kind_isolation() {
                let mut store = $make;
                store.save("x", 5);
                assert_eq!(store.load_float("x"), 0.0);
                assert!(!store.load_bool("x"));
                assert_eq!(store.load_string("x").as_str(), "");
                assert_eq!(store.load_int("x"), 5);
            }

            #[test]
            fn typed_load_matches_helpers() {
                let mut store = $make;
                store.save("x", 7);
                assert_eq!(store.load::<i32>("x"), store.load_int("x"));
            }

            // =================================================================
            // Limits
            // =================================================================

            #[test]
            fn long_string_truncates_to_fifteen_bytes() {
                let mut store = $make;
                store.save("s", "0123456789abcdefXYZ");
                assert_eq!(store.load_string("s").as_str(), "0123456789abcde");
            }

            #[test]
            fn empty_key_is_dropped() {
                let mut store = $make;
                store.save("", 5);
                assert_eq!(store.load_int(""), 0);
            }

            // =================================================================
            // Lifecycle
            // =================================================================

            #[test]
            fn lazy_init_on_first_use() {
                let mut store = $make;
                assert!(!store.is_ready());
                store.load_int("x");
                assert!(store.is_ready());
            }

            #[test]
            fn explicit_init_then_use() {
                let mut store = $make;
                store.init().unwrap();
                store.init().unwrap();
                store.save("x", 1);
                assert_eq!(store.load_int("x"), 1);
            }
        }
    };
}

store_contract!(preferences_backend, preferences());
store_contract!(hashed_backend, hashed());
store_contract!(hashed_compact_backend, hashed_compact());
store_contract!(fixed_slot_backend, fixed_slot());
