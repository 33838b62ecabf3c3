//! The settings store that application code talks to.
//!
//! This module provides [`SettingsStore`], a typed key-value front end over
//! any [`SettingsBackend`]. It owns the backend for the life of the program,
//! initializes it on first use, normalizes keys, and turns every failure into
//! either a dropped write or a default value.
//!
//! # Example
//!
//! ```rust
//! use rs_webgui::backends::PreferencesBackend;
//! use rs_webgui::hal::MockPreferences;
//! use rs_webgui::SettingsStore;
//!
//! let backend = PreferencesBackend::new(MockPreferences::new(), "webgui");
//! let mut store = SettingsStore::new(backend);
//!
//! store.save("temp", 72);
//! store.save("ratio", 0.5f32);
//! store.save("enabled", true);
//! store.save("name", "abc");
//!
//! assert_eq!(store.load_int("temp"), 72);
//! assert_eq!(store.load_float("ratio"), 0.5);
//! assert!(store.load_bool("enabled"));
//! assert_eq!(store.load_string("name").as_str(), "abc");
//!
//! // Never-saved keys read as the kind default
//! assert_eq!(store.load_int("missing"), 0);
//!
//! store.clear();
//! assert_eq!(store.load_int("temp"), 0);
//! ```
//!
//! # Lifecycle
//!
//! The store starts [`Uninitialized`](StoreState::Uninitialized). The first
//! call to [`init`](SettingsStore::init) or any save/load/clear moves it to
//! [`Ready`](StoreState::Ready), where it stays. If the backend fails to
//! initialize, the store stays uninitialized and the next call tries again.

use log::{debug, error, warn};

use crate::backends::{FixedSlotBackend, HashedEepromBackend, PreferencesBackend};
use crate::config::SettingsConfig;
use crate::error::{LayoutError, SettingsError};
use crate::settings::{truncate_str, Setting, SettingKind, SettingString, SettingValue};
use crate::traits::{
    EepromStorage, FlashRecord, PreferenceStore, SettingsBackend, WriteOutcome,
};

/// Store lifecycle state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum StoreState {
    /// Backend not yet initialized.
    #[default]
    Uninitialized,
    /// Backend initialized; stays here for the life of the program.
    Ready,
}

/// Typed settings store over a [`SettingsBackend`].
///
/// # Type Parameter
///
/// - `B`: The persistence strategy ([`SettingsBackend`] trait)
///
/// # Thread Safety
///
/// The store is meant to be owned by the single loop that also serves HTTP
/// requests. It does no locking.
pub struct SettingsStore<B: SettingsBackend> {
    backend: B,
    state: StoreState,
    warn_on_drop: bool,
}

impl<B: SettingsBackend> SettingsStore<B> {
    /// Create an uninitialized store that owns `backend`.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: StoreState::Uninitialized,
            warn_on_drop: true,
        }
    }

    /// Enable or disable the warning logged when a backend drops a write.
    pub fn with_drop_warnings(mut self, enabled: bool) -> Self {
        self.warn_on_drop = enabled;
        self
    }

    /// Current lifecycle state.
    pub fn state(&self) -> StoreState {
        self.state
    }

    /// True once the backend has been initialized.
    pub fn is_ready(&self) -> bool {
        self.state == StoreState::Ready
    }

    /// Borrow the backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutably borrow the backend.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Consume the store, returning the backend.
    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Initialize the backend. Does nothing once the store is ready.
    pub fn init(&mut self) -> Result<(), SettingsError<B::Error>> {
        if self.state == StoreState::Ready {
            return Ok(());
        }
        self.backend.init().map_err(SettingsError::Init)?;
        self.state = StoreState::Ready;
        debug!("settings: store ready");
        Ok(())
    }

    /// Reject empty keys and keys with NUL, and truncate long ones to the
    /// backend's capacity.
    fn normalize_key<'k>(&self, key: &'k str) -> Result<&'k str, SettingsError<B::Error>> {
        if key.is_empty() {
            return Err(SettingsError::EmptyKey);
        }
        // Flash slots and NVS keys are NUL-terminated
        if key.contains('\0') {
            return Err(SettingsError::InvalidKey);
        }
        Ok(truncate_str(key, self.backend.key_capacity()))
    }

    // ========================================================================
    // Save
    // ========================================================================

    /// Persist `value` under `key`.
    ///
    /// Never reports failure. Dropped writes and backend errors are logged;
    /// the previously stored value (or the default) stays readable.
    pub fn save(&mut self, key: &str, value: impl Into<SettingValue>) {
        let value = value.into();
        let kind = value.kind();
        match self.try_save(key, value) {
            Ok(WriteOutcome::Dropped(reason)) => {
                if self.warn_on_drop {
                    warn!(
                        "settings: dropped {} '{}' ({})",
                        kind,
                        key,
                        reason.as_str()
                    );
                }
            }
            Ok(_) => {}
            Err(SettingsError::EmptyKey) => warn!("settings: ignoring {} save with empty key", kind),
            Err(SettingsError::InvalidKey) => {
                warn!("settings: ignoring {} save with NUL in key {:?}", kind, key)
            }
            Err(e) => error!("settings: save '{}' failed: {}", key, e),
        }
    }

    /// Persist `value` under `key`, reporting what happened.
    ///
    /// # Errors
    ///
    /// - [`SettingsError::EmptyKey`] if `key` is empty
    /// - [`SettingsError::InvalidKey`] if `key` contains a NUL byte
    /// - [`SettingsError::Init`] if lazy initialization failed
    /// - [`SettingsError::Backend`] if the storage write failed
    pub fn try_save(
        &mut self,
        key: &str,
        value: impl Into<SettingValue>,
    ) -> Result<WriteOutcome, SettingsError<B::Error>> {
        self.init()?;
        let key = self.normalize_key(key)?;
        self.backend
            .save(key, &value.into())
            .map_err(SettingsError::Backend)
    }

    // ========================================================================
    // Load
    // ========================================================================

    /// Load the value of type `T` stored under `key`, or `T::default()`.
    ///
    /// ```rust
    /// use rs_webgui::{backends::PreferencesBackend, hal::MockPreferences, SettingsStore};
    ///
    /// let mut store = SettingsStore::new(PreferencesBackend::new(MockPreferences::new(), "ns"));
    /// store.save("x", 5);
    ///
    /// assert_eq!(store.load::<i32>("x"), 5);
    /// assert_eq!(store.load::<f32>("x"), 0.0); // different kind
    /// ```
    pub fn load<T: Setting>(&mut self, key: &str) -> T {
        match self.try_load::<T>(key) {
            Ok(value) => value.unwrap_or_default(),
            Err(SettingsError::EmptyKey | SettingsError::InvalidKey) => T::default(),
            Err(e) => {
                error!("settings: load '{}' failed: {}", key, e);
                T::default()
            }
        }
    }

    /// Load the value of type `T` stored under `key`.
    ///
    /// Returns `Ok(None)` when nothing of that kind is stored.
    pub fn try_load<T: Setting>(
        &mut self,
        key: &str,
    ) -> Result<Option<T>, SettingsError<B::Error>> {
        Ok(self.try_load_value(key, T::KIND)?.and_then(T::from_value))
    }

    /// Load the value of `kind` stored under `key`, or the kind default.
    pub fn load_value(&mut self, key: &str, kind: SettingKind) -> SettingValue {
        match self.try_load_value(key, kind) {
            Ok(Some(value)) => value,
            Ok(None) | Err(SettingsError::EmptyKey | SettingsError::InvalidKey) => {
                SettingValue::default_for(kind)
            }
            Err(e) => {
                error!("settings: load '{}' failed: {}", key, e);
                SettingValue::default_for(kind)
            }
        }
    }

    /// Load the value of `kind` stored under `key`.
    pub fn try_load_value(
        &mut self,
        key: &str,
        kind: SettingKind,
    ) -> Result<Option<SettingValue>, SettingsError<B::Error>> {
        self.init()?;
        let key = self.normalize_key(key)?;
        let value = self
            .backend
            .load(key, kind)
            .map_err(SettingsError::Backend)?;
        Ok(value.filter(|v| v.kind() == kind))
    }

    /// Load an integer setting (default `0`).
    pub fn load_int(&mut self, key: &str) -> i32 {
        self.load(key)
    }

    /// Load a float setting (default `0.0`).
    pub fn load_float(&mut self, key: &str) -> f32 {
        self.load(key)
    }

    /// Load a bool setting (default `false`).
    pub fn load_bool(&mut self, key: &str) -> bool {
        self.load(key)
    }

    /// Load a string setting (default empty).
    pub fn load_string(&mut self, key: &str) -> SettingString {
        self.load(key)
    }

    // ========================================================================
    // Clear
    // ========================================================================

    /// Wipe every stored setting. Failures are logged.
    pub fn clear(&mut self) {
        if let Err(e) = self.try_clear() {
            error!("settings: clear failed: {}", e);
        }
    }

    /// Wipe every stored setting.
    ///
    /// Returns after the medium has been erased.
    pub fn try_clear(&mut self) -> Result<(), SettingsError<B::Error>> {
        self.init()?;
        self.backend.clear().map_err(SettingsError::Backend)
    }
}

// ============================================================================
// Backend-specific constructors
// ============================================================================

impl<P: PreferenceStore> SettingsStore<PreferencesBackend<P>> {
    /// Store over a platform preference namespace from `config`.
    pub fn preferences(prefs: P, config: &SettingsConfig) -> Self {
        Self::new(PreferencesBackend::new(prefs, config.namespace.as_str()))
            .with_drop_warnings(config.warn_on_drop)
    }
}

impl<E: EepromStorage> SettingsStore<HashedEepromBackend<E>> {
    /// Store over an EEPROM using the layout from `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the layout does not fit the EEPROM.
    pub fn hashed_eeprom(eeprom: E, config: &SettingsConfig) -> Result<Self, LayoutError> {
        let backend = HashedEepromBackend::with_layout(eeprom, config.layout)?;
        Ok(Self::new(backend).with_drop_warnings(config.warn_on_drop))
    }
}

impl<F: FlashRecord, const N: usize> SettingsStore<FixedSlotBackend<F, N>> {
    /// Store over a flash record with `N` slots per kind.
    pub fn fixed_slot(flash: F, config: &SettingsConfig) -> Self {
        Self::new(FixedSlotBackend::new(flash)).with_drop_warnings(config.warn_on_drop)
    }
}
