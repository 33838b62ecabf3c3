//! Hardware Abstraction Layer implementations.
//!
//! This module contains concrete implementations of the storage traits
//! defined in [`crate::traits`] for various platforms.
//!
//! # Available Implementations
//!
//! - `mock`: In-memory implementations for tests
//! - `file`: File-backed EEPROM and flash for desktop (requires `std` feature)
//! - `esp32`: NVS preferences (requires `esp32` feature)

pub mod mock;

#[cfg(feature = "std")]
pub mod file;

#[cfg(feature = "esp32")]
pub mod esp32;

pub use mock::*;

#[cfg(feature = "std")]
pub use file::{FileEeprom, FileFlash};

#[cfg(feature = "esp32")]
pub use esp32::*;
