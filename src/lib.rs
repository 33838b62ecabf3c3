//! # rs-webgui
//!
//! Persistent settings for microcontroller WebGUI dashboards: a tiny typed
//! key-value store that survives reboots.
//!
//! ## Features
//!
//! - **Four kinds**: `i32`, `f32`, `bool`, and short strings (15 bytes)
//! - **Never fails loudly**: a missing key loads as `0`, `0.0`, `false` or
//!   `""`; a write the medium cannot hold is dropped and logged
//! - **Three backends**, picked at compile time:
//!   - platform preferences (ESP32 NVS)
//!   - hash-addressed EEPROM buckets (Arduino UNO R4 WiFi and similar)
//!   - a fixed-slot record rewritten whole to flash (boards without EEPROM)
//! - **Lazy init**: the first save or load brings the backend up
//!
//! ## Architecture
//!
//! The crate is structured to allow testing on desktop without hardware:
//!
//! - `traits` - Storage primitives and the backend capability trait
//! - `settings` - Kinds, values, and fixed-capacity key/string types
//! - `backends` - The three persistence strategies
//! - `store` - The typed front end applications call
//! - `hal` - Concrete primitives (mock and file for desktop, esp32 for hardware)
//!
//! ## Example
//!
//! ```rust
//! use rs_webgui::{
//!     hal::MockEeprom,
//!     SettingsConfig, SettingsStore,
//! };
//!
//! let config = SettingsConfig::default();
//! let mut store = SettingsStore::hashed_eeprom(MockEeprom::new(8192), &config).unwrap();
//!
//! store.save("brightness", 80);
//! store.save("label", "kitchen");
//!
//! assert_eq!(store.load_int("brightness"), 80);
//! assert_eq!(store.load_string("label").as_str(), "kitchen");
//! assert!(!store.load_bool("never_saved"));
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

/// Settings backends over preferences, EEPROM, and flash.
pub mod backends;
/// Error types for the store, layouts, and storage primitives.
pub mod error;
/// Hardware abstraction layer with mock implementations for testing.
pub mod hal;
/// Setting kinds, values, and key/string types.
pub mod settings;
/// Typed settings store with lazy initialization.
pub mod store;
/// Core traits for storage primitives and settings backends.
pub mod traits;

/// Shared configuration for desktop and embedded builds.
pub mod config;

/// Message types for the HTTP API (serde-based).
#[cfg(feature = "serde")]
pub mod messages;

// Re-exports for convenience
pub use backends::{FixedSlotBackend, HashedEepromBackend, HashedLayout, PreferencesBackend};
pub use config::SettingsConfig;
pub use error::{LayoutError, SettingsError, StorageError};
pub use settings::{Setting, SettingKey, SettingKind, SettingString, SettingValue};
pub use store::{SettingsStore, StoreState};
pub use traits::{
    // Backend
    DropReason,
    // Primitives
    EepromStorage,
    FlashRecord,
    PreferenceStore,
    SettingsBackend,
    WriteOutcome,
};
