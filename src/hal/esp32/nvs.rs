//! NVS-backed preferences for ESP32.
//!
//! Wraps `EspNvs` from esp-idf-svc as a [`PreferenceStore`]. NVS has no
//! native float or bool type, so floats are stored as their `u32` bit
//! pattern and bools as `u8`.
//!
//! # Example
//!
//! ```ignore
//! use rs_webgui::hal::esp32::Esp32Preferences;
//! use rs_webgui::{SettingsConfig, SettingsStore};
//!
//! let prefs = Esp32Preferences::take()?;
//! let mut store = SettingsStore::preferences(prefs, &SettingsConfig::default());
//! let boots = store.load_int("boots") + 1;
//! store.save("boots", boots);
//! ```

use esp_idf_svc::nvs::{EspDefaultNvsPartition, EspNvs, NvsDefault};
use esp_idf_svc::sys::{
    esp, nvs_commit, nvs_erase_all, EspError, ESP_ERR_NVS_INVALID_HANDLE,
    ESP_ERR_NVS_INVALID_LENGTH,
};
use log::{debug, info};

use crate::settings::{setting_string, SettingString, MAX_STRING_LEN};
use crate::traits::PreferenceStore;

/// NVS key length limit.
pub const NVS_MAX_KEY_LEN: usize = 15;

/// True for the error NVS returns when a stored string exceeds the buffer.
fn is_oversized(e: &EspError) -> bool {
    e.code() == ESP_ERR_NVS_INVALID_LENGTH
}

/// Preference store over the default NVS partition.
///
/// The namespace handle is opened by [`PreferenceStore::open`]; calls before
/// that fail with `ESP_ERR_NVS_INVALID_HANDLE`.
pub struct Esp32Preferences {
    partition: EspDefaultNvsPartition,
    nvs: Option<EspNvs<NvsDefault>>,
}

impl Esp32Preferences {
    /// Wrap an already-taken default partition.
    ///
    /// Use this when the partition is shared with WiFi.
    pub fn new(partition: EspDefaultNvsPartition) -> Self {
        Self {
            partition,
            nvs: None,
        }
    }

    /// Take the default NVS partition.
    ///
    /// # Errors
    ///
    /// Returns an error if the partition was already taken or fails to
    /// initialize.
    pub fn take() -> anyhow::Result<Self> {
        Ok(Self::new(EspDefaultNvsPartition::take()?))
    }

    fn nvs(&self) -> Result<&EspNvs<NvsDefault>, EspError> {
        self.nvs
            .as_ref()
            .ok_or_else(EspError::from_infallible::<ESP_ERR_NVS_INVALID_HANDLE>)
    }
}

impl PreferenceStore for Esp32Preferences {
    type Error = EspError;

    fn open(&mut self, namespace: &str) -> Result<(), EspError> {
        self.nvs = Some(EspNvs::new(self.partition.clone(), namespace, true)?);
        info!("settings: opened NVS namespace '{}'", namespace);
        Ok(())
    }

    fn put_i32(&mut self, key: &str, value: i32) -> Result<(), EspError> {
        self.nvs()?.set_i32(key, value)
    }

    fn get_i32(&mut self, key: &str) -> Result<Option<i32>, EspError> {
        self.nvs()?.get_i32(key)
    }

    fn put_f32(&mut self, key: &str, value: f32) -> Result<(), EspError> {
        self.nvs()?.set_u32(key, value.to_bits())
    }

    fn get_f32(&mut self, key: &str) -> Result<Option<f32>, EspError> {
        Ok(self.nvs()?.get_u32(key)?.map(f32::from_bits))
    }

    fn put_bool(&mut self, key: &str, value: bool) -> Result<(), EspError> {
        self.nvs()?.set_u8(key, u8::from(value))
    }

    fn get_bool(&mut self, key: &str) -> Result<Option<bool>, EspError> {
        Ok(self.nvs()?.get_u8(key)?.map(|v| v != 0))
    }

    fn put_str(&mut self, key: &str, value: &str) -> Result<(), EspError> {
        self.nvs()?.set_str(key, value)
    }

    fn get_str(&mut self, key: &str) -> Result<Option<SettingString>, EspError> {
        // Payload plus NUL terminator
        let mut buf = [0u8; MAX_STRING_LEN + 1];
        match self.nvs()?.get_str(key, &mut buf) {
            Ok(value) => Ok(value.map(setting_string)),
            // Stored by an older firmware with a longer limit
            Err(e) if is_oversized(&e) => {
                debug!("settings: NVS string '{}' too long, reading as missing", key);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn clear(&mut self) -> Result<(), EspError> {
        let handle = self.nvs()?.handle();
        esp!(unsafe { nvs_erase_all(handle) })?;
        esp!(unsafe { nvs_commit(handle) })?;
        info!("settings: erased NVS namespace");
        Ok(())
    }

    fn max_key_len(&self) -> usize {
        NVS_MAX_KEY_LEN
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use esp_idf_svc::sys::ESP_ERR_NVS_NOT_ENOUGH_SPACE;

    #[test]
    fn only_length_errors_read_as_missing() {
        assert!(is_oversized(&EspError::from_infallible::<
            ESP_ERR_NVS_INVALID_LENGTH,
        >()));
        assert!(!is_oversized(&EspError::from_infallible::<
            ESP_ERR_NVS_INVALID_HANDLE,
        >()));
        assert!(!is_oversized(&EspError::from_infallible::<
            ESP_ERR_NVS_NOT_ENOUGH_SPACE,
        >()));
    }
}
