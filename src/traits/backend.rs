//! The settings backend capability trait.
//!
//! One logical contract, several physical realizations. The backend is picked
//! at compile time by the type parameter of [`SettingsStore`](crate::SettingsStore);
//! call sites never branch on it.

use crate::settings::{SettingKind, SettingValue, MAX_KEY_LEN};

/// Why a backend declined to persist a write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropReason {
    /// Every slot for this kind already holds a different key.
    SlotsFull,
}

impl DropReason {
    /// Returns the reason as a short string.
    pub const fn as_str(&self) -> &'static str {
        match self {
            DropReason::SlotsFull => "slots full",
        }
    }
}

/// Result of a save that did not fail outright.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Value was persisted.
    Written,
    /// Stored bytes already matched; nothing was written.
    Unchanged,
    /// Write was silently dropped.
    Dropped(DropReason),
}

impl WriteOutcome {
    /// True if the value is now readable under its key.
    pub fn is_stored(&self) -> bool {
        matches!(self, WriteOutcome::Written | WriteOutcome::Unchanged)
    }
}

/// A physical persistence strategy for typed settings.
///
/// Implementations receive non-empty keys already truncated to
/// [`key_capacity`](Self::key_capacity) and string values already truncated
/// to [`MAX_STRING_LEN`](crate::settings::MAX_STRING_LEN).
///
/// # Contract
///
/// - `save` then `load` of the same key and kind returns the saved value,
///   unless the backend aliased or dropped it (see each backend's docs).
/// - `load` of a never-saved key returns `Ok(None)` or the kind default.
/// - `load` never mutates persisted state.
/// - After `clear`, every `load` returns `Ok(None)` or the kind default.
/// - All operations complete the physical write before returning.
pub trait SettingsBackend {
    /// Error type from the underlying storage primitive.
    type Error: core::fmt::Debug;

    /// One-time setup (open namespace, begin EEPROM, check format).
    fn init(&mut self) -> Result<(), Self::Error>;

    /// Persist `value` under `key`.
    fn save(&mut self, key: &str, value: &SettingValue) -> Result<WriteOutcome, Self::Error>;

    /// Read the value of `kind` stored under `key`.
    fn load(&mut self, key: &str, kind: SettingKind) -> Result<Option<SettingValue>, Self::Error>;

    /// Reset all stored settings.
    fn clear(&mut self) -> Result<(), Self::Error>;

    /// Longest key this backend stores without truncation, in bytes.
    fn key_capacity(&self) -> usize {
        MAX_KEY_LEN
    }
}
