//! Non-volatile storage primitives.
//!
//! Each backend in [`crate::backends`] sits on exactly one of these:
//!
//! | Trait | Medium | Used by |
//! |-------|--------|---------|
//! | [`PreferenceStore`] | Platform-managed namespaced key-value database (ESP32 NVS) | [`PreferencesBackend`] |
//! | [`EepromStorage`] | Flat byte-addressable EEPROM (or emulated EEPROM) | [`HashedEepromBackend`] |
//! | [`FlashRecord`] | One flash region written as a single record | [`FixedSlotBackend`] |
//!
//! Mock implementations live in [`crate::hal::mock`].
//!
//! [`PreferencesBackend`]: crate::backends::PreferencesBackend
//! [`HashedEepromBackend`]: crate::backends::HashedEepromBackend
//! [`FixedSlotBackend`]: crate::backends::FixedSlotBackend

use crate::settings::SettingString;

/// Namespaced typed key-value store with its own persistence.
///
/// Modeled on the ESP32 `Preferences`/NVS API. Getters return `Ok(None)` when
/// the key is missing or holds a different type.
///
/// # Example Implementation
///
/// ```rust,ignore
/// use rs_webgui::traits::PreferenceStore;
///
/// struct MyNvs { /* driver handle */ }
///
/// impl PreferenceStore for MyNvs {
///     type Error = MyNvsError;
///
///     fn open(&mut self, namespace: &str) -> Result<(), MyNvsError> {
///         // nvs_open(namespace, READWRITE)...
///         Ok(())
///     }
///     // ...
/// }
/// ```
pub trait PreferenceStore {
    /// Error type for preference operations.
    type Error: core::fmt::Debug;

    /// Open (or create) the namespace all later calls operate on.
    fn open(&mut self, namespace: &str) -> Result<(), Self::Error>;

    /// Store an integer.
    fn put_i32(&mut self, key: &str, value: i32) -> Result<(), Self::Error>;

    /// Read an integer.
    fn get_i32(&mut self, key: &str) -> Result<Option<i32>, Self::Error>;

    /// Store a float.
    fn put_f32(&mut self, key: &str, value: f32) -> Result<(), Self::Error>;

    /// Read a float.
    fn get_f32(&mut self, key: &str) -> Result<Option<f32>, Self::Error>;

    /// Store a flag.
    fn put_bool(&mut self, key: &str, value: bool) -> Result<(), Self::Error>;

    /// Read a flag.
    fn get_bool(&mut self, key: &str) -> Result<Option<bool>, Self::Error>;

    /// Store a string.
    fn put_str(&mut self, key: &str, value: &str) -> Result<(), Self::Error>;

    /// Read a string, truncated to the setting string capacity.
    fn get_str(&mut self, key: &str) -> Result<Option<SettingString>, Self::Error>;

    /// Remove every key in the open namespace.
    fn clear(&mut self) -> Result<(), Self::Error>;

    /// Longest key the platform accepts, in bytes.
    ///
    /// Defaults to unlimited.
    fn max_key_len(&self) -> usize {
        usize::MAX
    }
}

/// Byte-addressable EEPROM.
///
/// Writes may be buffered in RAM until [`commit`](Self::commit) on platforms
/// that emulate EEPROM in flash. Erased bytes read as [`ERASED_BYTE`].
pub trait EepromStorage {
    /// Error type for EEPROM operations.
    type Error: core::fmt::Debug;

    /// Bring up the EEPROM subsystem. Called once by the backend's init.
    fn begin(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Size of the medium in bytes.
    fn capacity(&self) -> usize;

    /// Read `buf.len()` bytes starting at `address`.
    fn read(&mut self, address: usize, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Write `data` starting at `address`.
    fn write(&mut self, address: usize, data: &[u8]) -> Result<(), Self::Error>;

    /// Flush buffered writes to the physical medium.
    fn commit(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Value of an erased EEPROM or flash byte.
pub const ERASED_BYTE: u8 = 0xFF;

/// Flash region that holds one record, always rewritten as a whole.
///
/// `write` must erase and program the region as one unit. Reading an erased
/// region yields [`ERASED_BYTE`]s.
pub trait FlashRecord {
    /// Error type for flash operations.
    type Error: core::fmt::Debug;

    /// Region size in bytes.
    fn capacity(&self) -> usize;

    /// Read the start of the region into `buf`.
    ///
    /// Must fail if `buf` is longer than [`capacity`](Self::capacity).
    fn read(&mut self, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Erase the region and program `data` at its start.
    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Erase the region.
    fn erase(&mut self) -> Result<(), Self::Error>;
}
