//! Error types for settings operations and storage primitives.
//!
//! All types are `no_std` and implement [`core::fmt::Display`].

use crate::settings::SettingKind;

/// Errors surfaced by [`SettingsStore`](crate::SettingsStore)'s `try_*` methods.
///
/// The plain `save`/`load`/`clear` methods log these and fall back to
/// dropping the write or returning the kind default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsError<E> {
    /// Key was empty.
    EmptyKey,
    /// Key contained a NUL byte, which fixed-width key fields cannot hold.
    InvalidKey,
    /// Backend failed to initialize; the store is still uninitialized.
    Init(E),
    /// Underlying storage reported an error.
    Backend(E),
}

impl<E: core::fmt::Debug> core::fmt::Display for SettingsError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SettingsError::EmptyKey => write!(f, "setting key is empty"),
            SettingsError::InvalidKey => write!(f, "setting key contains NUL"),
            SettingsError::Init(e) => write!(f, "settings backend init failed: {:?}", e),
            SettingsError::Backend(e) => write!(f, "settings backend error: {:?}", e),
        }
    }
}

#[cfg(feature = "std")]
impl<E: core::fmt::Debug> std::error::Error for SettingsError<E> {}

/// Invalid hashed-EEPROM layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutError {
    /// A region has zero buckets.
    NoBuckets(SettingKind),
    /// A region's stride cannot hold one serialized value.
    StrideTooSmall {
        /// Region kind
        kind: SettingKind,
        /// Configured stride
        stride: u16,
        /// Bytes needed per slot
        needed: u16,
    },
    /// A region starts inside the format header.
    HeaderOverlap(SettingKind),
    /// Two regions share addresses.
    Overlap(SettingKind, SettingKind),
    /// A region extends past the end of the medium.
    OutOfBounds {
        /// Region kind
        kind: SettingKind,
        /// First address past the region
        end: usize,
        /// Medium capacity in bytes
        capacity: usize,
    },
}

impl core::fmt::Display for LayoutError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            LayoutError::NoBuckets(kind) => write!(f, "{} region has no buckets", kind),
            LayoutError::StrideTooSmall {
                kind,
                stride,
                needed,
            } => write!(
                f,
                "{} stride {} is smaller than the {} bytes a slot needs",
                kind, stride, needed
            ),
            LayoutError::HeaderOverlap(kind) => {
                write!(f, "{} region overlaps the format header", kind)
            }
            LayoutError::Overlap(a, b) => write!(f, "{} and {} regions overlap", a, b),
            LayoutError::OutOfBounds {
                kind,
                end,
                capacity,
            } => write!(
                f,
                "{} region ends at {} but storage holds {} bytes",
                kind, end, capacity
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for LayoutError {}

/// Errors from the in-memory storage primitives in [`crate::hal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Access past the end of the medium.
    OutOfBounds {
        /// Start address of the access
        address: usize,
        /// Length of the access
        len: usize,
        /// Medium capacity in bytes
        capacity: usize,
    },
    /// Record does not fit the flash region.
    TooLarge {
        /// Record length
        len: usize,
        /// Region capacity
        capacity: usize,
    },
    /// Preference namespace used before it was opened.
    NotOpen,
    /// Injected write or commit failure.
    WriteFailed,
}

impl core::fmt::Display for StorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            StorageError::OutOfBounds {
                address,
                len,
                capacity,
            } => write!(
                f,
                "access of {} bytes at {} exceeds capacity {}",
                len, address, capacity
            ),
            StorageError::TooLarge { len, capacity } => {
                write!(f, "record of {} bytes exceeds region of {}", len, capacity)
            }
            StorageError::NotOpen => write!(f, "preference namespace not open"),
            StorageError::WriteFailed => write!(f, "write failed"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for StorageError {}
