//! Fixed-slot record persisted wholesale to flash.
//!
//! The whole settings state is one struct: a `valid` flag and four parallel
//! slot tables, one per kind, each holding `N` `(key, value)` pairs. Every
//! save reads the record, updates one slot, and rewrites the record.
//!
//! # Record format
//!
//! ```text
//! [valid:1]
//! [int slots:    N x (key:16, i32 LE:4)]
//! [float slots:  N x (key:16, f32 LE:4)]
//! [bool slots:   N x (key:16, u8:1)]
//! [string slots: N x (key:16, len:1, payload:15)]
//! [crc32 LE:4]   over everything before it
//! ```
//!
//! Keys are NUL-padded; an all-NUL key marks a free slot. A record whose
//! `valid` byte or CRC does not match reads as empty.

use alloc::vec;
use alloc::vec::Vec;

use crc::{Crc, CRC_32_ISO_HDLC};
use log::{debug, warn};

use crate::settings::{
    setting_key, SettingKey, SettingKind, SettingString, SettingValue, MAX_KEY_LEN,
    MAX_STRING_LEN,
};
use crate::traits::{DropReason, FlashRecord, SettingsBackend, WriteOutcome};

/// Default slots per kind.
pub const DEFAULT_SLOTS: usize = 10;

const KEY_FIELD: usize = MAX_KEY_LEN + 1;
const STRING_FIELD: usize = 1 + MAX_STRING_LEN;
const VALID_MARK: u8 = 0xA5;
const CRC_LEN: usize = 4;

const CRC32: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

// ============================================================================
// Slot tables
// ============================================================================

/// `N` key/value slots for one kind.
#[derive(Clone, Debug, PartialEq)]
struct SlotTable<V, const N: usize> {
    keys: [SettingKey; N],
    values: [V; N],
}

impl<V: Default, const N: usize> SlotTable<V, N> {
    fn new() -> Self {
        Self {
            keys: core::array::from_fn(|_| SettingKey::new()),
            values: core::array::from_fn(|_| V::default()),
        }
    }
}

impl<V, const N: usize> SlotTable<V, N> {
    /// Slot holding `key`, if any.
    fn position(&self, key: &str) -> Option<usize> {
        if key.is_empty() {
            return None;
        }
        self.keys.iter().position(|k| k.as_str() == key)
    }

    /// Slot `key` would be written to: its existing slot, else the first free one.
    fn slot_for(&self, key: &str) -> Option<usize> {
        self.position(key)
            .or_else(|| self.keys.iter().position(|k| k.is_empty()))
    }

    /// Value stored under `key`.
    fn get(&self, key: &str) -> Option<&V> {
        self.position(key).map(|i| &self.values[i])
    }

    /// Number of occupied slots.
    fn used(&self) -> usize {
        self.keys.iter().filter(|k| !k.is_empty()).count()
    }

    fn set(&mut self, key: &str, value: V, same: impl Fn(&V, &V) -> bool) -> WriteOutcome {
        let Some(slot) = self.slot_for(key) else {
            return WriteOutcome::Dropped(DropReason::SlotsFull);
        };
        if self.keys[slot].as_str() == key && same(&self.values[slot], &value) {
            return WriteOutcome::Unchanged;
        }
        self.keys[slot] = setting_key(key);
        self.values[slot] = value;
        WriteOutcome::Written
    }
}

// ============================================================================
// Record image
// ============================================================================

/// In-memory copy of the whole flash record.
#[derive(Clone, Debug, PartialEq)]
pub struct SlotImage<const N: usize> {
    valid: bool,
    ints: SlotTable<i32, N>,
    floats: SlotTable<f32, N>,
    bools: SlotTable<bool, N>,
    strings: SlotTable<SettingString, N>,
}

impl<const N: usize> SlotImage<N> {
    /// Encoded record size in bytes.
    pub const ENCODED_LEN: usize = 1
        + N * (KEY_FIELD + 4)
        + N * (KEY_FIELD + 4)
        + N * (KEY_FIELD + 1)
        + N * (KEY_FIELD + STRING_FIELD)
        + CRC_LEN;

    /// A never-written image: `valid` unset, every slot free.
    pub fn empty() -> Self {
        Self {
            valid: false,
            ints: SlotTable::new(),
            floats: SlotTable::new(),
            bools: SlotTable::new(),
            strings: SlotTable::new(),
        }
    }

    /// True once anything has been saved into this image.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Occupied slots for `kind`.
    pub fn used(&self, kind: SettingKind) -> usize {
        match kind {
            SettingKind::Int => self.ints.used(),
            SettingKind::Float => self.floats.used(),
            SettingKind::Bool => self.bools.used(),
            SettingKind::Str => self.strings.used(),
        }
    }

    /// Value of `kind` stored under `key`.
    pub fn get(&self, key: &str, kind: SettingKind) -> Option<SettingValue> {
        match kind {
            SettingKind::Int => self.ints.get(key).map(|v| SettingValue::Int(*v)),
            SettingKind::Float => self.floats.get(key).map(|v| SettingValue::Float(*v)),
            SettingKind::Bool => self.bools.get(key).map(|v| SettingValue::Bool(*v)),
            SettingKind::Str => self.strings.get(key).map(|v| SettingValue::Str(v.clone())),
        }
    }

    /// Store `value` under `key` in its kind's table.
    pub fn set(&mut self, key: &str, value: &SettingValue) -> WriteOutcome {
        let outcome = match value {
            SettingValue::Int(v) => self.ints.set(key, *v, |a, b| a == b),
            SettingValue::Float(v) => {
                self.floats
                    .set(key, *v, |a, b| a.to_bits() == b.to_bits())
            }
            SettingValue::Bool(v) => self.bools.set(key, *v, |a, b| a == b),
            SettingValue::Str(v) => self.strings.set(key, v.clone(), |a, b| a == b),
        };
        if outcome == WriteOutcome::Written {
            self.valid = true;
        }
        outcome
    }

    /// Serialize into a freshly allocated record.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(Self::ENCODED_LEN);
        out.push(if self.valid { VALID_MARK } else { 0 });
        put_table(&mut out, &self.ints, |out, v| {
            out.extend_from_slice(&v.to_le_bytes())
        });
        put_table(&mut out, &self.floats, |out, v| {
            out.extend_from_slice(&v.to_bits().to_le_bytes())
        });
        put_table(&mut out, &self.bools, |out, v| out.push(u8::from(*v)));
        put_table(&mut out, &self.strings, |out, v| {
            let mut field = [0u8; STRING_FIELD];
            field[0] = v.len() as u8;
            field[1..=v.len()].copy_from_slice(v.as_bytes());
            out.extend_from_slice(&field);
        });
        let crc = CRC32.checksum(&out);
        out.extend_from_slice(&crc.to_le_bytes());
        out
    }

    /// Parse a record. Returns `None` for anything but a valid, intact record.
    pub fn decode(buf: &[u8]) -> Option<Self> {
        if buf.len() < Self::ENCODED_LEN || buf[0] != VALID_MARK {
            return None;
        }
        let body = &buf[..Self::ENCODED_LEN - CRC_LEN];
        let mut stored = [0u8; CRC_LEN];
        stored.copy_from_slice(&buf[Self::ENCODED_LEN - CRC_LEN..Self::ENCODED_LEN]);
        if CRC32.checksum(body) != u32::from_le_bytes(stored) {
            return None;
        }

        let mut reader = Reader { buf: body, pos: 1 };
        let ints = take_table(&mut reader, 4, |b| {
            i32::from_le_bytes([b[0], b[1], b[2], b[3]])
        });
        let floats = take_table(&mut reader, 4, |b| {
            f32::from_bits(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        });
        let bools = take_table(&mut reader, 1, |b| b[0] != 0);
        let strings = take_table(&mut reader, STRING_FIELD, |b| {
            let len = (b[0] as usize).min(MAX_STRING_LEN);
            let mut s = SettingString::new();
            if let Ok(text) = core::str::from_utf8(&b[1..=len]) {
                let _ = s.push_str(text);
            }
            s
        });

        Some(Self {
            valid: true,
            ints,
            floats,
            bools,
            strings,
        })
    }
}

impl<const N: usize> Default for SlotImage<N> {
    fn default() -> Self {
        Self::empty()
    }
}

fn put_key(out: &mut Vec<u8>, key: &SettingKey) {
    let mut field = [0u8; KEY_FIELD];
    field[..key.len()].copy_from_slice(key.as_bytes());
    out.extend_from_slice(&field);
}

fn put_table<V, const N: usize>(
    out: &mut Vec<u8>,
    table: &SlotTable<V, N>,
    put_value: impl Fn(&mut Vec<u8>, &V),
) {
    for (key, value) in table.keys.iter().zip(table.values.iter()) {
        put_key(out, key);
        put_value(out, value);
    }
}

struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    /// Caller has already checked the total length.
    fn take(&mut self, n: usize) -> &'a [u8] {
        let out = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        out
    }

    fn take_key(&mut self) -> SettingKey {
        let field = self.take(KEY_FIELD);
        let len = field
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(KEY_FIELD)
            .min(MAX_KEY_LEN);
        match core::str::from_utf8(&field[..len]) {
            Ok(text) => setting_key(text),
            Err(_) => SettingKey::new(),
        }
    }
}

fn take_table<V: Default, const N: usize>(
    reader: &mut Reader<'_>,
    width: usize,
    take_value: impl Fn(&[u8]) -> V,
) -> SlotTable<V, N> {
    let mut table = SlotTable::new();
    for slot in 0..N {
        table.keys[slot] = reader.take_key();
        table.values[slot] = take_value(reader.take(width));
    }
    table
}

// ============================================================================
// Backend
// ============================================================================

/// Settings backend storing a [`SlotImage`] in a [`FlashRecord`].
///
/// # Limitations
///
/// At most `N` distinct keys per kind. A save for a new key when all `N`
/// slots are taken is dropped with [`DropReason::SlotsFull`]; existing keys
/// can still be overwritten.
///
/// # Example
///
/// ```rust
/// use rs_webgui::backends::FixedSlotBackend;
/// use rs_webgui::hal::MockFlash;
/// use rs_webgui::SettingsStore;
///
/// let backend: FixedSlotBackend<_, 2> = FixedSlotBackend::new(MockFlash::new(4096));
/// let mut store = SettingsStore::new(backend);
///
/// store.save("a", 1);
/// store.save("b", 2);
/// store.save("c", 3); // no free int slot, dropped
///
/// assert_eq!(store.load_int("b"), 2);
/// assert_eq!(store.load_int("c"), 0);
/// ```
#[derive(Debug)]
pub struct FixedSlotBackend<F, const N: usize = DEFAULT_SLOTS> {
    flash: F,
}

impl<F: FlashRecord, const N: usize> FixedSlotBackend<F, N> {
    /// Encoded record size for `N` slots per kind.
    pub const RECORD_LEN: usize = SlotImage::<N>::ENCODED_LEN;

    /// Create a backend over `flash`.
    pub fn new(flash: F) -> Self {
        Self { flash }
    }

    /// Borrow the flash region.
    pub fn flash(&self) -> &F {
        &self.flash
    }

    /// Mutably borrow the flash region.
    pub fn flash_mut(&mut self) -> &mut F {
        &mut self.flash
    }

    /// Consume the backend, returning the flash region.
    pub fn into_inner(self) -> F {
        self.flash
    }

    /// Read and decode the record. Invalid or corrupt records read as empty.
    pub fn read_image(&mut self) -> Result<SlotImage<N>, F::Error> {
        let mut buf = vec![0u8; Self::RECORD_LEN];
        self.flash.read(&mut buf)?;
        match SlotImage::decode(&buf) {
            Some(image) => Ok(image),
            None => {
                if buf[0] == VALID_MARK {
                    warn!("settings: flash record failed CRC, treating as empty");
                }
                Ok(SlotImage::empty())
            }
        }
    }

    fn write_image(&mut self, image: &SlotImage<N>) -> Result<(), F::Error> {
        self.flash.write(&image.encode())
    }
}

impl<F: FlashRecord, const N: usize> SettingsBackend for FixedSlotBackend<F, N> {
    type Error = F::Error;

    fn init(&mut self) -> Result<(), F::Error> {
        if self.flash.capacity() < Self::RECORD_LEN {
            warn!(
                "settings: flash region of {} bytes is smaller than the {} byte record",
                self.flash.capacity(),
                Self::RECORD_LEN
            );
        }
        // A full-record read fails on an undersized region
        let image = self.read_image()?;
        debug!(
            "settings: flash record {}",
            if image.is_valid() { "loaded" } else { "empty" }
        );
        Ok(())
    }

    fn save(&mut self, key: &str, value: &SettingValue) -> Result<WriteOutcome, F::Error> {
        let mut image = self.read_image()?;
        let outcome = image.set(key, value);
        if outcome == WriteOutcome::Written {
            self.write_image(&image)?;
            debug!(
                "settings: {} '{}' written ({}/{} slots)",
                value.kind(),
                key,
                image.used(value.kind()),
                N
            );
        }
        Ok(outcome)
    }

    fn load(&mut self, key: &str, kind: SettingKind) -> Result<Option<SettingValue>, F::Error> {
        Ok(self.read_image()?.get(key, kind))
    }

    fn clear(&mut self) -> Result<(), F::Error> {
        self.flash.erase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::hal::MockFlash;
    use crate::traits::ERASED_BYTE;

    fn backend<const N: usize>() -> FixedSlotBackend<MockFlash, N> {
        let mut b = FixedSlotBackend::new(MockFlash::new(4096));
        b.init().unwrap();
        b
    }

    #[test]
    fn record_len_for_default_slots() {
        // 1 + 10*20 + 10*20 + 10*17 + 10*32 + 4
        assert_eq!(SlotImage::<DEFAULT_SLOTS>::ENCODED_LEN, 895);
        assert_eq!(
            FixedSlotBackend::<MockFlash>::RECORD_LEN,
            SlotImage::<DEFAULT_SLOTS>::ENCODED_LEN
        );
    }

    #[test]
    fn erased_flash_reads_invalid_image() {
        let mut b = backend::<DEFAULT_SLOTS>();
        let image = b.read_image().unwrap();
        assert!(!image.is_valid());
        assert_eq!(image, SlotImage::empty());
    }

    #[test]
    fn encode_decode_preserves_slots() {
        let mut image = SlotImage::<3>::empty();
        image.set("i", &SettingValue::Int(-7));
        image.set("f", &SettingValue::Float(0.25));
        image.set("b", &SettingValue::Bool(true));
        image.set("s", &"hello".into());

        let bytes = image.encode();
        assert_eq!(bytes.len(), SlotImage::<3>::ENCODED_LEN);
        assert_eq!(SlotImage::<3>::decode(&bytes), Some(image));
    }

    #[test]
    fn never_saved_image_encodes_invalid() {
        let bytes = SlotImage::<2>::empty().encode();
        assert_eq!(SlotImage::<2>::decode(&bytes), None);
    }

    #[test]
    fn crc_mismatch_reads_empty() {
        let mut b = backend::<DEFAULT_SLOTS>();
        b.save("temp", &SettingValue::Int(72)).unwrap();
        b.flash_mut().corrupt(5, &[0x00, 0x11]);
        assert_eq!(b.load("temp", SettingKind::Int).unwrap(), None);
    }

    #[test]
    fn overwrite_reuses_slot() {
        let mut b = backend::<2>();
        b.save("a", &SettingValue::Int(1)).unwrap();
        b.save("a", &SettingValue::Int(2)).unwrap();
        let image = b.read_image().unwrap();
        assert_eq!(image.used(SettingKind::Int), 1);
        assert_eq!(image.get("a", SettingKind::Int), Some(SettingValue::Int(2)));
    }

    #[test]
    fn full_table_drops_new_keys_only() {
        let mut b = backend::<2>();
        b.save("a", &SettingValue::Int(1)).unwrap();
        b.save("b", &SettingValue::Int(2)).unwrap();
        assert_eq!(
            b.save("c", &SettingValue::Int(3)).unwrap(),
            WriteOutcome::Dropped(DropReason::SlotsFull)
        );
        // Existing key still updatable
        assert_eq!(
            b.save("b", &SettingValue::Int(20)).unwrap(),
            WriteOutcome::Written
        );
        // Other kinds have their own tables
        assert_eq!(
            b.save("c", &SettingValue::Bool(true)).unwrap(),
            WriteOutcome::Written
        );
    }

    #[test]
    fn unchanged_save_skips_flash_write() {
        let mut b = backend::<DEFAULT_SLOTS>();
        b.save("x", &SettingValue::Float(1.5)).unwrap();
        let writes = b.flash().write_count();
        assert_eq!(
            b.save("x", &SettingValue::Float(1.5)).unwrap(),
            WriteOutcome::Unchanged
        );
        assert_eq!(b.flash().write_count(), writes);
    }

    #[test]
    fn clear_erases_region() {
        let mut b = backend::<DEFAULT_SLOTS>();
        b.save("x", &"abc".into()).unwrap();
        b.clear().unwrap();
        assert!(b.flash().contents().iter().all(|&x| x == ERASED_BYTE));
        assert_eq!(b.load("x", SettingKind::Str).unwrap(), None);
    }

    #[test]
    fn slots_fill_in_order() {
        let mut image = SlotImage::<4>::empty();
        image.set("one", &SettingValue::Int(1));
        image.set("two", &SettingValue::Int(2));
        assert_eq!(image.ints.position("one"), Some(0));
        assert_eq!(image.ints.position("two"), Some(1));
        assert_eq!(image.ints.slot_for("three"), Some(2));
        assert_eq!(image.used(SettingKind::Int), 2);
    }

    #[test]
    fn undersized_region_fails_init() {
        let mut b: FixedSlotBackend<MockFlash> = FixedSlotBackend::new(MockFlash::new(64));
        assert!(matches!(
            b.init(),
            Err(StorageError::OutOfBounds { capacity: 64, .. })
        ));

        let mut b: FixedSlotBackend<MockFlash> =
            FixedSlotBackend::new(MockFlash::new(FixedSlotBackend::<MockFlash>::RECORD_LEN));
        assert!(b.init().is_ok());
    }
}
