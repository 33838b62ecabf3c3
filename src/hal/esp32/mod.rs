//! ESP32 storage implementations.
//!
//! Settings on ESP32 go through the platform's NVS partition, which handles
//! wear levelling and addressing on its own. Boards without NVS use the
//! hashed EEPROM or fixed-slot backends over their own primitives.

mod nvs;

pub use nvs::{Esp32Preferences, NVS_MAX_KEY_LEN};
