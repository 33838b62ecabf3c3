//! Setting kinds, values, and the fixed-capacity key/string types.
//!
//! A setting is addressed by a short key and one of four kinds. The kind is
//! chosen by the caller at load time; the store never records which kind a
//! key was saved under, so reusing a key across kinds is unspecified.
//!
//! # Example
//!
//! ```rust
//! use rs_webgui::settings::{SettingKind, SettingValue};
//!
//! let v: SettingValue = 72.into();
//! assert_eq!(v.kind(), SettingKind::Int);
//! assert_eq!(SettingValue::default_for(SettingKind::Str), SettingValue::from(""));
//! ```

use heapless::String as HString;

/// Maximum key length in bytes for fixed-width backends.
pub const MAX_KEY_LEN: usize = 15;

/// Maximum string value length in bytes.
pub const MAX_STRING_LEN: usize = 15;

/// Fixed-capacity setting key.
pub type SettingKey = HString<MAX_KEY_LEN>;

/// Fixed-capacity string setting value.
pub type SettingString = HString<MAX_STRING_LEN>;

/// Longest prefix of `s` that fits in `max` bytes without splitting a char.
pub fn truncate_str(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Build a [`SettingKey`], truncating to [`MAX_KEY_LEN`] bytes.
pub fn setting_key(s: &str) -> SettingKey {
    let mut key = SettingKey::new();
    // Cannot fail after truncation
    let _ = key.push_str(truncate_str(s, MAX_KEY_LEN));
    key
}

/// Build a [`SettingString`], truncating to [`MAX_STRING_LEN`] bytes.
pub fn setting_string(s: &str) -> SettingString {
    let mut value = SettingString::new();
    let _ = value.push_str(truncate_str(s, MAX_STRING_LEN));
    value
}

// ============================================================================
// Kinds
// ============================================================================

/// The four value kinds a setting can hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SettingKind {
    /// 32-bit signed integer.
    Int,
    /// 32-bit IEEE-754 float.
    Float,
    /// Boolean flag.
    Bool,
    /// Short string (up to [`MAX_STRING_LEN`] bytes).
    #[cfg_attr(feature = "serde", serde(rename = "string"))]
    Str,
}

impl SettingKind {
    /// All kinds, in the order the hashed layout places them.
    pub const ALL: [SettingKind; 4] = [
        SettingKind::Str,
        SettingKind::Int,
        SettingKind::Float,
        SettingKind::Bool,
    ];

    /// Returns the kind as a lowercase string.
    ///
    /// ```
    /// use rs_webgui::SettingKind;
    ///
    /// assert_eq!(SettingKind::Int.as_str(), "int");
    /// assert_eq!(SettingKind::Str.as_str(), "string");
    /// ```
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            SettingKind::Int => "int",
            SettingKind::Float => "float",
            SettingKind::Bool => "bool",
            SettingKind::Str => "string",
        }
    }

    /// Serialized width of a value of this kind, excluding any length prefix.
    ///
    /// For strings this is the maximum payload.
    #[inline]
    pub const fn value_width(&self) -> usize {
        match self {
            SettingKind::Int | SettingKind::Float => 4,
            SettingKind::Bool => 1,
            SettingKind::Str => MAX_STRING_LEN,
        }
    }
}

impl core::fmt::Display for SettingKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Values
// ============================================================================

/// A typed setting value.
///
/// Equality follows `f32` semantics, so a `NaN` never compares equal to
/// itself. Use [`same_bits`](Self::same_bits) to compare stored bits.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "kind", content = "value", rename_all = "lowercase")
)]
pub enum SettingValue {
    /// Integer value.
    Int(i32),
    /// Float value.
    Float(f32),
    /// Boolean value.
    Bool(bool),
    /// String value.
    #[cfg_attr(feature = "serde", serde(rename = "string"))]
    Str(SettingString),
}

impl SettingValue {
    /// The kind of this value.
    pub const fn kind(&self) -> SettingKind {
        match self {
            SettingValue::Int(_) => SettingKind::Int,
            SettingValue::Float(_) => SettingKind::Float,
            SettingValue::Bool(_) => SettingKind::Bool,
            SettingValue::Str(_) => SettingKind::Str,
        }
    }

    /// The value returned for a key that was never saved.
    ///
    /// `0`, `0.0`, `false`, and the empty string respectively.
    pub fn default_for(kind: SettingKind) -> Self {
        match kind {
            SettingKind::Int => SettingValue::Int(0),
            SettingKind::Float => SettingValue::Float(0.0),
            SettingKind::Bool => SettingValue::Bool(false),
            SettingKind::Str => SettingValue::Str(SettingString::new()),
        }
    }

    /// True when both values have the same kind and identical stored bits.
    pub fn same_bits(&self, other: &SettingValue) -> bool {
        match (self, other) {
            (SettingValue::Float(a), SettingValue::Float(b)) => a.to_bits() == b.to_bits(),
            _ => self == other,
        }
    }

    /// Returns the integer, if this is an [`Int`](Self::Int).
    pub fn as_int(&self) -> Option<i32> {
        match self {
            SettingValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the float, if this is a [`Float`](Self::Float).
    pub fn as_float(&self) -> Option<f32> {
        match self {
            SettingValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the flag, if this is a [`Bool`](Self::Bool).
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SettingValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the string, if this is a [`Str`](Self::Str).
    pub fn as_str(&self) -> Option<&str> {
        match self {
            SettingValue::Str(v) => Some(v.as_str()),
            _ => None,
        }
    }
}

impl From<i32> for SettingValue {
    fn from(v: i32) -> Self {
        SettingValue::Int(v)
    }
}

impl From<f32> for SettingValue {
    fn from(v: f32) -> Self {
        SettingValue::Float(v)
    }
}

impl From<bool> for SettingValue {
    fn from(v: bool) -> Self {
        SettingValue::Bool(v)
    }
}

/// Strings longer than [`MAX_STRING_LEN`] bytes are truncated.
impl From<&str> for SettingValue {
    fn from(v: &str) -> Self {
        SettingValue::Str(setting_string(v))
    }
}

impl From<SettingString> for SettingValue {
    fn from(v: SettingString) -> Self {
        SettingValue::Str(v)
    }
}

// ============================================================================
// Typed access
// ============================================================================

/// A Rust type that maps to exactly one [`SettingKind`].
///
/// Used by [`SettingsStore::load`](crate::SettingsStore::load) to pick the
/// kind from the requested return type. `Default` supplies the miss value.
pub trait Setting: Default + Into<SettingValue> {
    /// Kind this type is stored as.
    const KIND: SettingKind;

    /// Extract from a value of the matching kind.
    fn from_value(value: SettingValue) -> Option<Self>;
}

impl Setting for i32 {
    const KIND: SettingKind = SettingKind::Int;

    fn from_value(value: SettingValue) -> Option<Self> {
        value.as_int()
    }
}

impl Setting for f32 {
    const KIND: SettingKind = SettingKind::Float;

    fn from_value(value: SettingValue) -> Option<Self> {
        value.as_float()
    }
}

impl Setting for bool {
    const KIND: SettingKind = SettingKind::Bool;

    fn from_value(value: SettingValue) -> Option<Self> {
        value.as_bool()
    }
}

impl Setting for SettingString {
    const KIND: SettingKind = SettingKind::Str;

    fn from_value(value: SettingValue) -> Option<Self> {
        match value {
            SettingValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_per_kind() {
        assert_eq!(SettingValue::default_for(SettingKind::Int), SettingValue::Int(0));
        assert_eq!(
            SettingValue::default_for(SettingKind::Float),
            SettingValue::Float(0.0)
        );
        assert_eq!(
            SettingValue::default_for(SettingKind::Bool),
            SettingValue::Bool(false)
        );
        assert_eq!(SettingValue::default_for(SettingKind::Str).as_str(), Some(""));
    }

    #[test]
    fn string_values_truncate_to_capacity() {
        let v = SettingValue::from("abcdefghijklmnopqrstuvwxyz");
        assert_eq!(v.as_str(), Some("abcdefghijklmno"));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        // 'é' is two bytes; 8 of them is 16 bytes
        let s = "éééééééé";
        let t = truncate_str(s, MAX_STRING_LEN);
        assert_eq!(t.len(), 14);
        assert!(core::str::from_utf8(t.as_bytes()).is_ok());
    }

    #[test]
    fn key_truncation() {
        let key = setting_key("a_very_long_setting_name");
        assert_eq!(key.as_str(), "a_very_long_set");
        assert_eq!(key.len(), MAX_KEY_LEN);
    }

    #[test]
    fn typed_extraction_rejects_other_kinds() {
        assert_eq!(i32::from_value(SettingValue::Int(5)), Some(5));
        assert_eq!(i32::from_value(SettingValue::Float(5.0)), None);
        assert_eq!(bool::from_value(SettingValue::Int(1)), None);
        assert!(SettingString::from_value("x".into()).is_some());
    }

    #[test]
    fn same_bits_compares_float_bits() {
        let nan = SettingValue::Float(f32::NAN);
        assert!(nan.same_bits(&SettingValue::Float(f32::NAN)));
        assert_ne!(nan, SettingValue::Float(f32::NAN));
        assert!(!SettingValue::Float(0.0).same_bits(&SettingValue::Float(-0.0)));
    }

    #[test]
    fn kind_widths() {
        assert_eq!(SettingKind::Int.value_width(), 4);
        assert_eq!(SettingKind::Float.value_width(), 4);
        assert_eq!(SettingKind::Bool.value_width(), 1);
        assert_eq!(SettingKind::Str.value_width(), MAX_STRING_LEN);
    }
}
