//! Mock implementations for testing without hardware.
//!
//! This module provides in-memory test doubles for every storage primitive,
//! enabling development and testing on desktop without a board attached.
//!
//! # Available Mocks
//!
//! | Mock | Trait | Purpose |
//! |------|-------|---------|
//! | [`MockPreferences`] | [`PreferenceStore`] | Typed map per namespace, with failure injection |
//! | [`MockEeprom`] | [`EepromStorage`] | Byte array starting erased, counts writes/commits |
//! | [`MockFlash`] | [`FlashRecord`] | Whole-record region, counts writes/erases |
//!
//! All mocks report [`StorageError`].
//!
//! # Example
//!
//! ```rust
//! use rs_webgui::backends::HashedEepromBackend;
//! use rs_webgui::hal::MockEeprom;
//! use rs_webgui::SettingsStore;
//!
//! let mut store = SettingsStore::new(HashedEepromBackend::new(MockEeprom::new(8192)).unwrap());
//! store.save("temp", 72);
//!
//! // Simulate a reboot by handing the same bytes to a fresh store
//! let eeprom = store.into_backend().into_inner();
//! let mut store = SettingsStore::new(HashedEepromBackend::new(eeprom).unwrap());
//! assert_eq!(store.load_int("temp"), 72);
//! ```
//!
//! [`PreferenceStore`]: crate::traits::PreferenceStore
//! [`EepromStorage`]: crate::traits::EepromStorage
//! [`FlashRecord`]: crate::traits::FlashRecord

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use crate::error::StorageError;
use crate::settings::{setting_string, SettingString};
use crate::traits::{EepromStorage, FlashRecord, PreferenceStore, ERASED_BYTE};

// ============================================================================
// Preferences
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
enum PrefValue {
    I32(i32),
    F32(f32),
    Bool(bool),
    Str(String),
}

/// Mock preference store for testing.
///
/// Keeps one typed map per namespace. A getter for a key stored under a
/// different type returns `None`, like NVS does.
///
/// # Example
///
/// ```rust
/// use rs_webgui::hal::MockPreferences;
/// use rs_webgui::traits::PreferenceStore;
///
/// let mut prefs = MockPreferences::new();
/// prefs.open("webgui").unwrap();
/// prefs.put_i32("volume", 7).unwrap();
///
/// assert_eq!(prefs.get_i32("volume").unwrap(), Some(7));
/// assert_eq!(prefs.get_f32("volume").unwrap(), None); // wrong type
/// assert_eq!(prefs.namespace(), Some("webgui"));
/// ```
#[derive(Debug, Default)]
pub struct MockPreferences {
    namespaces: BTreeMap<String, BTreeMap<String, PrefValue>>,
    open: Option<String>,
    max_key_len: Option<usize>,
    open_failures: usize,
    fail_reads: bool,
    open_count: usize,
    clear_count: usize,
}

impl MockPreferences {
    /// Creates an empty store with no namespace open.
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit key length, like the 15-byte NVS key limit.
    pub fn with_max_key_len(mut self, len: usize) -> Self {
        self.max_key_len = Some(len);
        self
    }

    /// Make the next `count` calls to `open` fail.
    pub fn with_open_failures(mut self, count: usize) -> Self {
        self.open_failures = count;
        self
    }

    /// Make every getter fail until reset.
    pub fn fail_reads(&mut self, fail: bool) {
        self.fail_reads = fail;
    }

    /// The open namespace, if any.
    pub fn namespace(&self) -> Option<&str> {
        self.open.as_deref()
    }

    /// Number of successful `open` calls.
    pub fn open_count(&self) -> usize {
        self.open_count
    }

    /// Number of `clear` calls.
    pub fn clear_count(&self) -> usize {
        self.clear_count
    }

    /// True if the open namespace (or, with none open, every namespace) is empty.
    pub fn is_empty(&self) -> bool {
        match &self.open {
            Some(ns) => self.namespaces.get(ns).map_or(true, |m| m.is_empty()),
            None => self.namespaces.values().all(|m| m.is_empty()),
        }
    }

    /// True if `key` exists in the open namespace.
    pub fn contains(&self, key: &str) -> bool {
        self.open
            .as_ref()
            .and_then(|ns| self.namespaces.get(ns))
            .map_or(false, |m| m.contains_key(key))
    }

    fn entries_mut(&mut self) -> Result<&mut BTreeMap<String, PrefValue>, StorageError> {
        let ns = self.open.as_ref().ok_or(StorageError::NotOpen)?;
        Ok(self.namespaces.entry(ns.clone()).or_default())
    }

    fn put(&mut self, key: &str, value: PrefValue) -> Result<(), StorageError> {
        self.entries_mut()?.insert(key.into(), value);
        Ok(())
    }

    fn get(&mut self, key: &str) -> Result<Option<PrefValue>, StorageError> {
        if self.fail_reads {
            return Err(StorageError::NotOpen);
        }
        Ok(self.entries_mut()?.get(key).cloned())
    }
}

impl PreferenceStore for MockPreferences {
    type Error = StorageError;

    fn open(&mut self, namespace: &str) -> Result<(), StorageError> {
        if self.open_failures > 0 {
            self.open_failures -= 1;
            return Err(StorageError::NotOpen);
        }
        self.open = Some(namespace.into());
        self.open_count += 1;
        Ok(())
    }

    fn put_i32(&mut self, key: &str, value: i32) -> Result<(), StorageError> {
        self.put(key, PrefValue::I32(value))
    }

    fn get_i32(&mut self, key: &str) -> Result<Option<i32>, StorageError> {
        Ok(match self.get(key)? {
            Some(PrefValue::I32(v)) => Some(v),
            _ => None,
        })
    }

    fn put_f32(&mut self, key: &str, value: f32) -> Result<(), StorageError> {
        self.put(key, PrefValue::F32(value))
    }

    fn get_f32(&mut self, key: &str) -> Result<Option<f32>, StorageError> {
        Ok(match self.get(key)? {
            Some(PrefValue::F32(v)) => Some(v),
            _ => None,
        })
    }

    fn put_bool(&mut self, key: &str, value: bool) -> Result<(), StorageError> {
        self.put(key, PrefValue::Bool(value))
    }

    fn get_bool(&mut self, key: &str) -> Result<Option<bool>, StorageError> {
        Ok(match self.get(key)? {
            Some(PrefValue::Bool(v)) => Some(v),
            _ => None,
        })
    }

    fn put_str(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.put(key, PrefValue::Str(value.into()))
    }

    fn get_str(&mut self, key: &str) -> Result<Option<SettingString>, StorageError> {
        Ok(match self.get(key)? {
            Some(PrefValue::Str(v)) => Some(setting_string(&v)),
            _ => None,
        })
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        self.entries_mut()?.clear();
        self.clear_count += 1;
        Ok(())
    }

    fn max_key_len(&self) -> usize {
        self.max_key_len.unwrap_or(usize::MAX)
    }
}

// ============================================================================
// EEPROM
// ============================================================================

/// Mock EEPROM for testing.
///
/// Starts fully erased (`0xFF`). Writes land immediately; `commit` only
/// counts, unless [`fail_commits`](Self::fail_commits) is set.
///
/// # Example
///
/// ```rust
/// use rs_webgui::hal::MockEeprom;
/// use rs_webgui::traits::EepromStorage;
///
/// let mut eeprom = MockEeprom::new(16);
/// eeprom.write(4, &[1, 2]).unwrap();
///
/// let mut buf = [0u8; 3];
/// eeprom.read(4, &mut buf).unwrap();
/// assert_eq!(buf, [1, 2, 0xFF]);
/// assert!(eeprom.read(15, &mut buf).is_err());
/// ```
#[derive(Clone, Debug)]
pub struct MockEeprom {
    bytes: Vec<u8>,
    write_count: usize,
    commit_count: usize,
    fail_writes: bool,
    fail_commits: bool,
}

impl MockEeprom {
    /// Creates an erased EEPROM of `size` bytes.
    pub fn new(size: usize) -> Self {
        Self {
            bytes: vec![ERASED_BYTE; size],
            write_count: 0,
            commit_count: 0,
            fail_writes: false,
            fail_commits: false,
        }
    }

    /// Raw contents.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of `write` calls.
    pub fn write_count(&self) -> usize {
        self.write_count
    }

    /// Number of `commit` calls.
    pub fn commit_count(&self) -> usize {
        self.commit_count
    }

    /// Make every write fail until reset.
    pub fn fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Make every commit fail until reset. Writes still land in RAM.
    pub fn fail_commits(&mut self, fail: bool) {
        self.fail_commits = fail;
    }

    /// Overwrite bytes directly, bypassing counters.
    ///
    /// # Panics
    ///
    /// Panics if the range is out of bounds.
    pub fn corrupt(&mut self, address: usize, data: &[u8]) {
        self.bytes[address..address + data.len()].copy_from_slice(data);
    }

    fn check(&self, address: usize, len: usize) -> Result<(), StorageError> {
        if address.checked_add(len).map_or(true, |end| end > self.bytes.len()) {
            return Err(StorageError::OutOfBounds {
                address,
                len,
                capacity: self.bytes.len(),
            });
        }
        Ok(())
    }
}

impl EepromStorage for MockEeprom {
    type Error = StorageError;

    fn capacity(&self) -> usize {
        self.bytes.len()
    }

    fn read(&mut self, address: usize, buf: &mut [u8]) -> Result<(), StorageError> {
        self.check(address, buf.len())?;
        buf.copy_from_slice(&self.bytes[address..address + buf.len()]);
        Ok(())
    }

    fn write(&mut self, address: usize, data: &[u8]) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::WriteFailed);
        }
        self.check(address, data.len())?;
        self.bytes[address..address + data.len()].copy_from_slice(data);
        self.write_count += 1;
        Ok(())
    }

    fn commit(&mut self) -> Result<(), StorageError> {
        if self.fail_commits {
            return Err(StorageError::WriteFailed);
        }
        self.commit_count += 1;
        Ok(())
    }
}

// ============================================================================
// Flash
// ============================================================================

/// Mock flash record region for testing.
///
/// # Example
///
/// ```rust
/// use rs_webgui::hal::MockFlash;
/// use rs_webgui::traits::FlashRecord;
///
/// let mut flash = MockFlash::new(8);
/// flash.write(&[1, 2, 3]).unwrap();
/// assert_eq!(flash.contents(), &[1, 2, 3, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]);
///
/// flash.erase().unwrap();
/// assert_eq!(flash.erase_count(), 2); // write erases first
/// ```
#[derive(Clone, Debug)]
pub struct MockFlash {
    contents: Vec<u8>,
    write_count: usize,
    erase_count: usize,
}

impl MockFlash {
    /// Creates an erased region of `capacity` bytes.
    pub fn new(capacity: usize) -> Self {
        Self {
            contents: vec![ERASED_BYTE; capacity],
            write_count: 0,
            erase_count: 0,
        }
    }

    /// Raw contents.
    pub fn contents(&self) -> &[u8] {
        &self.contents
    }

    /// Number of `write` calls.
    pub fn write_count(&self) -> usize {
        self.write_count
    }

    /// Number of erases, including the one inside each `write`.
    pub fn erase_count(&self) -> usize {
        self.erase_count
    }

    /// Overwrite bytes directly, bypassing counters.
    ///
    /// # Panics
    ///
    /// Panics if the range is out of bounds.
    pub fn corrupt(&mut self, offset: usize, data: &[u8]) {
        self.contents[offset..offset + data.len()].copy_from_slice(data);
    }
}

impl FlashRecord for MockFlash {
    type Error = StorageError;

    fn capacity(&self) -> usize {
        self.contents.len()
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<(), StorageError> {
        if buf.len() > self.contents.len() {
            return Err(StorageError::OutOfBounds {
                address: 0,
                len: buf.len(),
                capacity: self.contents.len(),
            });
        }
        buf.copy_from_slice(&self.contents[..buf.len()]);
        Ok(())
    }

    fn write(&mut self, data: &[u8]) -> Result<(), StorageError> {
        if data.len() > self.contents.len() {
            return Err(StorageError::TooLarge {
                len: data.len(),
                capacity: self.contents.len(),
            });
        }
        self.erase()?;
        self.contents[..data.len()].copy_from_slice(data);
        self.write_count += 1;
        Ok(())
    }

    fn erase(&mut self) -> Result<(), StorageError> {
        self.contents.fill(ERASED_BYTE);
        self.erase_count += 1;
        Ok(())
    }
}
