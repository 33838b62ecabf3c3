//! Pass-through backend over a platform preference store.

use crate::config::{short_string, ShortString};
use crate::settings::{SettingKind, SettingValue};
use crate::traits::{PreferenceStore, SettingsBackend, WriteOutcome};

/// Default preference namespace.
pub const DEFAULT_NAMESPACE: &str = "webgui";

/// Settings backend that delegates to a [`PreferenceStore`].
///
/// The platform handles addressing, so keys of different kinds never collide
/// in storage and there is no capacity bound beyond the platform's own.
///
/// # Example
///
/// ```rust
/// use rs_webgui::backends::PreferencesBackend;
/// use rs_webgui::hal::MockPreferences;
/// use rs_webgui::SettingsStore;
///
/// let backend = PreferencesBackend::new(MockPreferences::new(), "webgui");
/// let mut store = SettingsStore::new(backend);
///
/// store.save("volume", 7);
/// assert_eq!(store.load_int("volume"), 7);
/// ```
#[derive(Debug)]
pub struct PreferencesBackend<P> {
    prefs: P,
    namespace: ShortString,
}

impl<P: PreferenceStore> PreferencesBackend<P> {
    /// Create a backend that opens `namespace` on init.
    pub fn new(prefs: P, namespace: &str) -> Self {
        Self {
            prefs,
            namespace: short_string(namespace),
        }
    }

    /// The namespace opened on init.
    pub fn namespace(&self) -> &str {
        self.namespace.as_str()
    }

    /// Borrow the underlying preference store.
    pub fn prefs(&self) -> &P {
        &self.prefs
    }

    /// Mutably borrow the underlying preference store.
    pub fn prefs_mut(&mut self) -> &mut P {
        &mut self.prefs
    }

    /// Consume the backend, returning the preference store.
    pub fn into_inner(self) -> P {
        self.prefs
    }
}

impl<P: PreferenceStore> SettingsBackend for PreferencesBackend<P> {
    type Error = P::Error;

    fn init(&mut self) -> Result<(), P::Error> {
        self.prefs.open(self.namespace.as_str())
    }

    fn save(&mut self, key: &str, value: &SettingValue) -> Result<WriteOutcome, P::Error> {
        match value {
            SettingValue::Int(v) => self.prefs.put_i32(key, *v)?,
            SettingValue::Float(v) => self.prefs.put_f32(key, *v)?,
            SettingValue::Bool(v) => self.prefs.put_bool(key, *v)?,
            SettingValue::Str(v) => self.prefs.put_str(key, v.as_str())?,
        }
        Ok(WriteOutcome::Written)
    }

    fn load(&mut self, key: &str, kind: SettingKind) -> Result<Option<SettingValue>, P::Error> {
        let value = match kind {
            SettingKind::Int => self.prefs.get_i32(key)?.map(SettingValue::Int),
            SettingKind::Float => self.prefs.get_f32(key)?.map(SettingValue::Float),
            SettingKind::Bool => self.prefs.get_bool(key)?.map(SettingValue::Bool),
            SettingKind::Str => self.prefs.get_str(key)?.map(SettingValue::Str),
        };
        Ok(value)
    }

    fn clear(&mut self) -> Result<(), P::Error> {
        self.prefs.clear()
    }

    fn key_capacity(&self) -> usize {
        self.prefs.max_key_len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::MockPreferences;

    fn backend() -> PreferencesBackend<MockPreferences> {
        let mut b = PreferencesBackend::new(MockPreferences::new(), DEFAULT_NAMESPACE);
        b.init().unwrap();
        b
    }

    #[test]
    fn init_opens_namespace() {
        let b = backend();
        assert_eq!(b.prefs().namespace(), Some("webgui"));
    }

    #[test]
    fn delegates_each_kind() {
        let mut b = backend();
        b.save("i", &SettingValue::Int(-3)).unwrap();
        b.save("f", &SettingValue::Float(1.5)).unwrap();
        b.save("b", &SettingValue::Bool(true)).unwrap();
        b.save("s", &"hi".into()).unwrap();

        assert_eq!(b.load("i", SettingKind::Int).unwrap(), Some(SettingValue::Int(-3)));
        assert_eq!(
            b.load("f", SettingKind::Float).unwrap(),
            Some(SettingValue::Float(1.5))
        );
        assert_eq!(
            b.load("b", SettingKind::Bool).unwrap(),
            Some(SettingValue::Bool(true))
        );
        assert_eq!(b.load("s", SettingKind::Str).unwrap(), Some("hi".into()));
    }

    #[test]
    fn missing_and_mismatched_kinds_are_none() {
        let mut b = backend();
        assert_eq!(b.load("nope", SettingKind::Int).unwrap(), None);

        b.save("x", &SettingValue::Int(5)).unwrap();
        assert_eq!(b.load("x", SettingKind::Float).unwrap(), None);
    }

    #[test]
    fn key_capacity_follows_platform() {
        let b = PreferencesBackend::new(MockPreferences::new().with_max_key_len(15), "ns");
        assert_eq!(b.key_capacity(), 15);

        let b = PreferencesBackend::new(MockPreferences::new(), "ns");
        assert_eq!(b.key_capacity(), usize::MAX);
    }

    #[test]
    fn clear_empties_namespace() {
        let mut b = backend();
        b.save("x", &SettingValue::Int(5)).unwrap();
        b.clear().unwrap();
        assert_eq!(b.load("x", SettingKind::Int).unwrap(), None);
    }
}
