//! Message types for exposing settings over the WebGUI's HTTP API.
//!
//! These types are `no_std` compatible and can be handled using either
//! `serde_json` (desktop) or `serde-json-core` (embedded).
//!
//! # Example
//!
//! ```
//! use rs_webgui::messages::SettingRequest;
//! use rs_webgui::SettingValue;
//!
//! // Desktop: using serde_json
//! #[cfg(feature = "std")]
//! {
//!     let json = r#"{"key": "temp", "int": 72}"#;
//!     let req: SettingRequest = serde_json::from_str(json).unwrap();
//!     assert_eq!(req.value(), Some(SettingValue::Int(72)));
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::settings::{SettingKey, SettingKind, SettingString, SettingValue};
use crate::store::SettingsStore;
use crate::traits::SettingsBackend;

// ============================================================================
// Request Types
// ============================================================================

/// Request to save one setting.
///
/// Exactly one value field is expected; if several are present the first in
/// `int`, `float`, `bool`, `string` order wins.
///
/// # JSON Examples
///
/// ```json
/// {"key": "temp", "int": 72}
/// {"key": "ratio", "float": 0.5}
/// {"key": "enabled", "bool": true}
/// {"key": "name", "string": "kitchen"}
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SettingRequest {
    /// Setting key
    pub key: SettingKey,
    /// Integer value
    #[serde(default, rename = "int", skip_serializing_if = "Option::is_none")]
    pub int_value: Option<i32>,
    /// Float value
    #[serde(default, rename = "float", skip_serializing_if = "Option::is_none")]
    pub float_value: Option<f32>,
    /// Bool value
    #[serde(default, rename = "bool", skip_serializing_if = "Option::is_none")]
    pub bool_value: Option<bool>,
    /// String value
    #[serde(default, rename = "string", skip_serializing_if = "Option::is_none")]
    pub string_value: Option<SettingString>,
}

impl SettingRequest {
    /// The value carried by this request, if any.
    pub fn value(&self) -> Option<SettingValue> {
        self.int_value
            .map(SettingValue::Int)
            .or(self.float_value.map(SettingValue::Float))
            .or(self.bool_value.map(SettingValue::Bool))
            .or_else(|| self.string_value.clone().map(SettingValue::Str))
    }

    /// Save the carried value into `store`.
    ///
    /// Returns `false` if the request has no value.
    pub fn apply<B: SettingsBackend>(&self, store: &mut SettingsStore<B>) -> bool {
        match self.value() {
            Some(value) => {
                store.save(self.key.as_str(), value);
                true
            }
            None => false,
        }
    }
}

// ============================================================================
// Response Types
// ============================================================================

/// One setting as reported to the UI.
///
/// # JSON Example
///
/// ```json
/// {"key": "temp", "value": {"kind": "int", "value": 72}}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettingEntry {
    /// Setting key
    pub key: SettingKey,
    /// Current value (the kind default if never saved)
    pub value: SettingValue,
}

impl SettingEntry {
    /// Read `key` as `kind` from `store`.
    pub fn load<B: SettingsBackend>(
        store: &mut SettingsStore<B>,
        key: &str,
        kind: SettingKind,
    ) -> Self {
        Self {
            key: crate::settings::setting_key(key),
            value: store.load_value(key, kind),
        }
    }
}

// ============================================================================
// JSON helpers (using serde-json-core for no_std compatibility)
// ============================================================================

/// Parse a save request from JSON bytes.
///
/// # Example
///
/// ```
/// use rs_webgui::messages::parse_setting_request;
///
/// let req = parse_setting_request(br#"{"key": "enabled", "bool": true}"#).unwrap();
/// assert_eq!(req.key.as_str(), "enabled");
/// assert_eq!(req.bool_value, Some(true));
/// ```
#[cfg(feature = "serde-json-core")]
pub fn parse_setting_request(json: &[u8]) -> Option<SettingRequest> {
    serde_json_core::from_slice(json).ok().map(|(req, _)| req)
}

/// Render a list of entries as a JSON array into `buf`.
///
/// Returns the number of bytes written, or `None` if `buf` is too small.
///
/// # Example
///
/// ```
/// use rs_webgui::messages::{render_entries, SettingEntry};
/// use rs_webgui::settings::setting_key;
/// use rs_webgui::SettingValue;
///
/// let entries = [SettingEntry { key: setting_key("temp"), value: SettingValue::Int(72) }];
/// let mut buf = [0u8; 64];
/// let n = render_entries(&entries, &mut buf).unwrap();
/// assert_eq!(
///     core::str::from_utf8(&buf[..n]).unwrap(),
///     r#"[{"key":"temp","value":{"kind":"int","value":72}}]"#
/// );
/// ```
#[cfg(feature = "serde-json-core")]
pub fn render_entries(entries: &[SettingEntry], buf: &mut [u8]) -> Option<usize> {
    serde_json_core::to_slice(entries, buf).ok()
}
