//! Settings backends.
//!
//! Each backend implements [`SettingsBackend`](crate::traits::SettingsBackend)
//! over one storage primitive:
//!
//! - `preferences`: pass-through to a platform preference store (ESP32)
//! - `hashed`: hash-addressed buckets in a flat EEPROM (Arduino UNO R4 WiFi)
//! - `fixed_slot`: one whole-struct record in flash (boards without EEPROM)

pub mod fixed_slot;
pub mod hashed;
pub mod preferences;

pub use fixed_slot::{FixedSlotBackend, SlotImage, DEFAULT_SLOTS};
pub use hashed::{
    key_hash, HashedEepromBackend, HashedLayout, KindRegion, COMPACT_EEPROM_SIZE,
    DEFAULT_EEPROM_SIZE, HEADER_LEN,
};
pub use preferences::{PreferencesBackend, DEFAULT_NAMESPACE};
