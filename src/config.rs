//! Settings store configuration.
//!
//! Uses `heapless::String` for `no_std` compatibility while remaining
//! ergonomic to use on desktop with `std`.
//!
//! # Example
//!
//! ```rust
//! use rs_webgui::config::SettingsConfig;
//! use rs_webgui::backends::HashedLayout;
//!
//! // Use defaults
//! let config = SettingsConfig::default();
//! assert_eq!(config.namespace.as_str(), "webgui");
//!
//! // Or customize
//! let config = SettingsConfig::default()
//!     .with_namespace("panel")
//!     .with_layout(HashedLayout::COMPACT);
//! ```

use heapless::String as HString;

use crate::backends::{HashedLayout, DEFAULT_NAMESPACE};
use crate::settings::truncate_str;

/// Maximum length for short config strings (namespaces, device names)
pub const MAX_SHORT_STRING: usize = 32;

/// Type alias for short config strings
pub type ShortString = HString<MAX_SHORT_STRING>;

/// Create a ShortString from a &str, truncating if too long
pub fn short_string(s: &str) -> ShortString {
    let mut hs = ShortString::new();
    let _ = hs.push_str(truncate_str(s, MAX_SHORT_STRING));
    hs
}

// ============================================================================
// Settings Config
// ============================================================================

/// Settings store configuration
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SettingsConfig {
    /// Preference namespace (preference backend only)
    pub namespace: ShortString,
    /// Address layout (hashed EEPROM backend only)
    pub layout: HashedLayout,
    /// Log a warning when a backend drops a write
    pub warn_on_drop: bool,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            namespace: short_string(DEFAULT_NAMESPACE),
            layout: HashedLayout::DEFAULT,
            warn_on_drop: true,
        }
    }
}

impl SettingsConfig {
    /// Set the preference namespace
    pub fn with_namespace(mut self, namespace: &str) -> Self {
        self.namespace = short_string(namespace);
        self
    }

    /// Set the hashed EEPROM layout
    pub fn with_layout(mut self, layout: HashedLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Enable or disable dropped-write warnings
    pub fn with_warn_on_drop(mut self, warn: bool) -> Self {
        self.warn_on_drop = warn;
        self
    }
}

// ============================================================================
// Tests
// ============================================================================
