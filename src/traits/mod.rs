//! Trait definitions for storage abstraction.
//!
//! This module defines the abstractions that let rs-webgui:
//! - Run the same settings contract on ESP32 NVS, raw EEPROM, or a flash record
//! - Test every backend on desktop against in-memory mocks
//!
//! # Submodules
//!
//! - `storage`: Platform storage primitives ([`PreferenceStore`], [`EepromStorage`], [`FlashRecord`])
//! - `backend`: The [`SettingsBackend`] capability implemented by each strategy

pub mod backend;
pub mod storage;

pub use backend::*;
pub use storage::*;
