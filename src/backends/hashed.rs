//! Hashed addressing over a flat EEPROM.
//!
//! Each kind owns a disjoint address range split into fixed-stride buckets.
//! A key's bucket is `key_hash(key) % buckets`, and its address is
//! `base + bucket * stride`. Nothing is stored about the key itself, so two
//! keys of the same kind that land in one bucket alias: the later write wins
//! and both read it back.
//!
//! # Layout
//!
//! ```text
//! 0      8      16                1616             3216             4816         6416
//! +------+------+-----------------+----------------+----------------+------------+
//! |header| free | string x100 @16 | int x100 @16   | float x100 @16 | bool x200 @8|
//! +------+------+-----------------+----------------+----------------+------------+
//! ```
//!
//! That is [`HashedLayout::DEFAULT`]. Strings are stored as a one-byte length
//! followed by the payload. Integers and floats are 4 bytes little-endian,
//! flags are one byte.
//!
//! The header holds a magic, a format version, and a CRC32 of the layout
//! triples. When it does not match (fresh part, corruption, or a firmware
//! that changed the layout) init re-formats: every region is zero-filled so
//! unwritten buckets decode as the kind default.

use crc::{Crc, CRC_32_ISO_HDLC};
use log::{debug, info, warn};

use crate::error::LayoutError;
use crate::settings::{truncate_str, SettingKind, SettingString, SettingValue, MAX_STRING_LEN};
use crate::traits::{EepromStorage, SettingsBackend, WriteOutcome, ERASED_BYTE};

/// Bytes reserved at address 0 for the format header.
pub const HEADER_LEN: usize = 8;

/// EEPROM size the default layout is sized for.
pub const DEFAULT_EEPROM_SIZE: usize = 8192;

/// EEPROM size the compact layout is sized for.
pub const COMPACT_EEPROM_SIZE: usize = 1024;

const HEADER_MAGIC: [u8; 3] = *b"WGS";
const FORMAT_VERSION: u8 = 1;

/// Largest slot any kind writes: length prefix plus string payload.
const SLOT_BUF_LEN: usize = 1 + MAX_STRING_LEN;

/// Chunk size for format/clear writes.
const FILL_CHUNK: usize = 64;

const CRC32: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

/// Rolling 16-bit hash of a key: `hash = hash * 31 + byte`, wrapping.
///
/// ```
/// use rs_webgui::backends::key_hash;
///
/// assert_eq!(key_hash("a"), 97);
/// assert_eq!(key_hash("aa"), 97 * 31 + 97);
/// ```
pub fn key_hash(key: &str) -> u16 {
    key.bytes()
        .fold(0u16, |hash, b| hash.wrapping_mul(31).wrapping_add(u16::from(b)))
}

// ============================================================================
// Layout
// ============================================================================

/// Address range owned by one kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KindRegion {
    /// First byte of the region.
    pub base: u16,
    /// Bytes per bucket.
    pub stride: u16,
    /// Number of buckets.
    pub buckets: u16,
}

impl KindRegion {
    /// Create a region.
    pub const fn new(base: u16, stride: u16, buckets: u16) -> Self {
        Self {
            base,
            stride,
            buckets,
        }
    }

    /// First address of the region.
    pub const fn start(&self) -> usize {
        self.base as usize
    }

    /// Region size in bytes.
    pub const fn size(&self) -> usize {
        self.stride as usize * self.buckets as usize
    }

    /// First address past the region.
    pub const fn end(&self) -> usize {
        self.start() + self.size()
    }

    /// Bucket index for `key`.
    ///
    /// Must not be called on a region with zero buckets.
    pub fn bucket(&self, key: &str) -> u16 {
        key_hash(key) % self.buckets
    }

    /// Physical address for `key`.
    pub fn address(&self, key: &str) -> usize {
        self.start() + self.bucket(key) as usize * self.stride as usize
    }

    /// True if `address` falls inside the region.
    pub const fn contains(&self, address: usize) -> bool {
        address >= self.start() && address < self.end()
    }

    const fn overlaps(&self, other: &KindRegion) -> bool {
        self.start() < other.end() && other.start() < self.end()
    }
}

/// Per-kind `(base, stride, buckets)` triples.
///
/// Changing any triple invalidates everything stored under the old layout;
/// the format header detects this and re-formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HashedLayout {
    /// String region (length prefix + payload per bucket).
    pub string: KindRegion,
    /// Integer region.
    pub int: KindRegion,
    /// Float region.
    pub float: KindRegion,
    /// Bool region.
    pub boolean: KindRegion,
}

impl HashedLayout {
    /// Layout for 8 KiB parts.
    ///
    /// String, int and float regions keep the historical addresses. Bools
    /// get their own range after the floats.
    pub const DEFAULT: Self = Self {
        string: KindRegion::new(16, 16, 100),
        int: KindRegion::new(1616, 16, 100),
        float: KindRegion::new(3216, 16, 100),
        boolean: KindRegion::new(4816, 8, 200),
    };

    /// Layout for 1 KiB parts, with strides sized to the value width.
    pub const COMPACT: Self = Self {
        string: KindRegion::new(16, 16, 32),
        int: KindRegion::new(528, 4, 64),
        float: KindRegion::new(784, 4, 48),
        boolean: KindRegion::new(976, 1, 48),
    };

    /// Region for `kind`.
    pub const fn region(&self, kind: SettingKind) -> KindRegion {
        match kind {
            SettingKind::Str => self.string,
            SettingKind::Int => self.int,
            SettingKind::Float => self.float,
            SettingKind::Bool => self.boolean,
        }
    }

    /// First address past every region.
    pub fn end(&self) -> usize {
        SettingKind::ALL
            .iter()
            .map(|k| self.region(*k).end())
            .max()
            .unwrap_or(HEADER_LEN)
            .max(HEADER_LEN)
    }

    /// Longest string payload the string stride can hold.
    pub fn string_capacity(&self) -> usize {
        (self.string.stride as usize)
            .saturating_sub(1)
            .min(MAX_STRING_LEN)
    }

    /// Smallest stride that holds one value of `kind`.
    pub const fn min_stride(kind: SettingKind) -> u16 {
        match kind {
            SettingKind::Str => 2,
            SettingKind::Int | SettingKind::Float => 4,
            SettingKind::Bool => 1,
        }
    }

    /// Check that regions are non-empty, disjoint, clear of the header, and
    /// fit in `capacity` bytes.
    pub fn validate(&self, capacity: usize) -> Result<(), LayoutError> {
        for kind in SettingKind::ALL {
            let region = self.region(kind);
            if region.buckets == 0 {
                return Err(LayoutError::NoBuckets(kind));
            }
            let needed = Self::min_stride(kind);
            if region.stride < needed {
                return Err(LayoutError::StrideTooSmall {
                    kind,
                    stride: region.stride,
                    needed,
                });
            }
            if region.start() < HEADER_LEN {
                return Err(LayoutError::HeaderOverlap(kind));
            }
            if region.end() > capacity {
                return Err(LayoutError::OutOfBounds {
                    kind,
                    end: region.end(),
                    capacity,
                });
            }
        }

        for (i, a) in SettingKind::ALL.iter().enumerate() {
            for b in &SettingKind::ALL[i + 1..] {
                if self.region(*a).overlaps(&self.region(*b)) {
                    return Err(LayoutError::Overlap(*a, *b));
                }
            }
        }
        Ok(())
    }

    /// CRC32 over every region triple, stored in the format header.
    pub fn fingerprint(&self) -> u32 {
        let mut digest = CRC32.digest();
        for kind in SettingKind::ALL {
            let r = self.region(kind);
            digest.update(&r.base.to_le_bytes());
            digest.update(&r.stride.to_le_bytes());
            digest.update(&r.buckets.to_le_bytes());
        }
        digest.finalize()
    }

    fn header(&self) -> [u8; HEADER_LEN] {
        let mut header = [0u8; HEADER_LEN];
        header[..3].copy_from_slice(&HEADER_MAGIC);
        header[3] = FORMAT_VERSION;
        header[4..].copy_from_slice(&self.fingerprint().to_le_bytes());
        header
    }

    /// Byte value at `address` on a freshly formatted medium.
    fn formatted_byte(&self, header: &[u8; HEADER_LEN], address: usize) -> u8 {
        if address < HEADER_LEN {
            header[address]
        } else if SettingKind::ALL
            .iter()
            .any(|k| self.region(*k).contains(address))
        {
            0
        } else {
            ERASED_BYTE
        }
    }
}

impl Default for HashedLayout {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// ============================================================================
// Backend
// ============================================================================

/// Settings backend using hashed addressing over an [`EepromStorage`].
///
/// # Limitations
///
/// - Same-kind keys that hash to one bucket alias silently.
/// - String payloads are truncated to [`HashedLayout::string_capacity`].
///
/// # Example
///
/// ```rust
/// use rs_webgui::backends::{HashedEepromBackend, HashedLayout, COMPACT_EEPROM_SIZE};
/// use rs_webgui::hal::MockEeprom;
/// use rs_webgui::SettingsStore;
///
/// let eeprom = MockEeprom::new(COMPACT_EEPROM_SIZE);
/// let backend = HashedEepromBackend::with_layout(eeprom, HashedLayout::COMPACT).unwrap();
/// let mut store = SettingsStore::new(backend);
///
/// store.save("name", "abc");
/// assert_eq!(store.load_string("name").as_str(), "abc");
/// ```
#[derive(Debug)]
pub struct HashedEepromBackend<E> {
    eeprom: E,
    layout: HashedLayout,
}

impl<E: EepromStorage> HashedEepromBackend<E> {
    /// Create a backend with [`HashedLayout::DEFAULT`].
    ///
    /// # Errors
    ///
    /// Returns an error if the EEPROM is smaller than the default layout.
    pub fn new(eeprom: E) -> Result<Self, LayoutError> {
        Self::with_layout(eeprom, HashedLayout::DEFAULT)
    }

    /// Create a backend with a custom layout.
    ///
    /// # Errors
    ///
    /// Returns an error if the layout fails [`HashedLayout::validate`]
    /// against the EEPROM's capacity.
    pub fn with_layout(eeprom: E, layout: HashedLayout) -> Result<Self, LayoutError> {
        layout.validate(eeprom.capacity())?;
        Ok(Self { eeprom, layout })
    }

    /// The active layout.
    pub fn layout(&self) -> &HashedLayout {
        &self.layout
    }

    /// Borrow the EEPROM.
    pub fn eeprom(&self) -> &E {
        &self.eeprom
    }

    /// Mutably borrow the EEPROM.
    pub fn eeprom_mut(&mut self) -> &mut E {
        &mut self.eeprom
    }

    /// Consume the backend, returning the EEPROM.
    pub fn into_inner(self) -> E {
        self.eeprom
    }

    /// True if the header at address 0 matches this layout.
    pub fn is_formatted(&mut self) -> Result<bool, E::Error> {
        let mut header = [0u8; HEADER_LEN];
        self.eeprom.read(0, &mut header)?;
        Ok(header == self.layout.header())
    }

    /// Zero every region and write the header.
    pub fn format(&mut self) -> Result<(), E::Error> {
        let end = self.layout.end();
        self.fill_formatted(end)?;
        info!("settings: formatted {} EEPROM bytes", end);
        Ok(())
    }

    /// Write the formatted image over `[0, end)` and commit.
    fn fill_formatted(&mut self, end: usize) -> Result<(), E::Error> {
        let header = self.layout.header();
        let mut chunk = [0u8; FILL_CHUNK];
        let mut address = 0;
        while address < end {
            let len = FILL_CHUNK.min(end - address);
            for (i, byte) in chunk[..len].iter_mut().enumerate() {
                *byte = self.layout.formatted_byte(&header, address + i);
            }
            self.eeprom.write(address, &chunk[..len])?;
            address += len;
        }
        self.eeprom.commit()
    }

    fn encode(&self, value: &SettingValue, buf: &mut [u8; SLOT_BUF_LEN]) -> usize {
        match value {
            SettingValue::Int(v) => {
                buf[..4].copy_from_slice(&v.to_le_bytes());
                4
            }
            SettingValue::Float(v) => {
                buf[..4].copy_from_slice(&v.to_bits().to_le_bytes());
                4
            }
            SettingValue::Bool(v) => {
                buf[0] = u8::from(*v);
                1
            }
            SettingValue::Str(s) => {
                let text = truncate_str(s.as_str(), self.layout.string_capacity());
                let n = text.len();
                buf[0] = n as u8;
                buf[1..=n].copy_from_slice(text.as_bytes());
                1 + n
            }
        }
    }

    fn read_string(&mut self, address: usize, key: &str) -> Result<Option<SettingValue>, E::Error> {
        let mut len = [0u8; 1];
        self.eeprom.read(address, &mut len)?;
        let len = len[0] as usize;
        if len > self.layout.string_capacity() {
            warn!(
                "settings: string '{}' has corrupt length {} at {}",
                key, len, address
            );
            return Ok(None);
        }

        let mut payload = [0u8; MAX_STRING_LEN];
        self.eeprom.read(address + 1, &mut payload[..len])?;
        let Ok(text) = core::str::from_utf8(&payload[..len]) else {
            warn!("settings: string '{}' is not valid UTF-8", key);
            return Ok(None);
        };
        let mut value = SettingString::new();
        // Length already bounded by MAX_STRING_LEN
        let _ = value.push_str(text);
        Ok(Some(SettingValue::Str(value)))
    }
}

impl<E: EepromStorage> SettingsBackend for HashedEepromBackend<E> {
    type Error = E::Error;

    fn init(&mut self) -> Result<(), E::Error> {
        self.eeprom.begin()?;
        if !self.is_formatted()? {
            info!("settings: EEPROM header missing or stale, formatting");
            self.format()?;
        }
        Ok(())
    }

    fn save(&mut self, key: &str, value: &SettingValue) -> Result<WriteOutcome, E::Error> {
        let region = self.layout.region(value.kind());
        let address = region.address(key);

        let mut buf = [0u8; SLOT_BUF_LEN];
        let len = self.encode(value, &mut buf);

        let mut current = [0u8; SLOT_BUF_LEN];
        self.eeprom.read(address, &mut current[..len])?;
        if current[..len] == buf[..len] {
            return Ok(WriteOutcome::Unchanged);
        }

        self.eeprom.write(address, &buf[..len])?;
        if let Err(e) = self.eeprom.commit() {
            // Put the RAM image back so the failed value is not readable
            let _ = self.eeprom.write(address, &current[..len]);
            warn!("settings: commit of {} '{}' failed: {:?}", value.kind(), key, e);
            return Err(e);
        }
        debug!(
            "settings: {} '{}' -> bucket {} @ {}",
            value.kind(),
            key,
            region.bucket(key),
            address
        );
        Ok(WriteOutcome::Written)
    }

    fn load(&mut self, key: &str, kind: SettingKind) -> Result<Option<SettingValue>, E::Error> {
        let address = self.layout.region(kind).address(key);
        let value = match kind {
            SettingKind::Int => {
                let mut raw = [0u8; 4];
                self.eeprom.read(address, &mut raw)?;
                Some(SettingValue::Int(i32::from_le_bytes(raw)))
            }
            SettingKind::Float => {
                let mut raw = [0u8; 4];
                self.eeprom.read(address, &mut raw)?;
                Some(SettingValue::Float(f32::from_bits(u32::from_le_bytes(raw))))
            }
            SettingKind::Bool => {
                let mut raw = [0u8; 1];
                self.eeprom.read(address, &mut raw)?;
                match raw[0] {
                    0 => Some(SettingValue::Bool(false)),
                    1 => Some(SettingValue::Bool(true)),
                    other => {
                        warn!("settings: bool '{}' has corrupt byte {:#04x}", key, other);
                        None
                    }
                }
            }
            SettingKind::Str => self.read_string(address, key)?,
        };
        Ok(value)
    }

    fn clear(&mut self) -> Result<(), E::Error> {
        let capacity = self.eeprom.capacity();
        self.fill_formatted(capacity)?;
        info!("settings: cleared {} EEPROM bytes", capacity);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::hal::MockEeprom;

    fn backend() -> HashedEepromBackend<MockEeprom> {
        let mut b = HashedEepromBackend::new(MockEeprom::new(DEFAULT_EEPROM_SIZE)).unwrap();
        b.init().unwrap();
        b
    }

    // =========================================================================
    // Hash and addressing
    // =========================================================================

    #[test]
    fn hash_matches_rolling_formula() {
        assert_eq!(key_hash(""), 0);
        assert_eq!(key_hash("temp"), 17364);
        assert_eq!(key_hash("name"), 31371);
    }

    #[test]
    fn hash_wraps_at_16_bits() {
        let long = "zzzzzzzzzzzzzzz";
        let expected = long
            .bytes()
            .fold(0u32, |h, b| (h * 31 + b as u32) & 0xFFFF) as u16;
        assert_eq!(key_hash(long), expected);
    }

    #[test]
    fn default_addresses() {
        let layout = HashedLayout::DEFAULT;
        // 17364 % 100 = 64
        assert_eq!(layout.int.address("temp"), 1616 + 64 * 16);
        // 31371 % 100 = 71
        assert_eq!(layout.string.address("name"), 16 + 71 * 16);
        // 17364 % 200 = 164
        assert_eq!(layout.boolean.address("temp"), 4816 + 164 * 8);
    }

    // =========================================================================
    // Layout validation
    // =========================================================================

    #[test]
    fn builtin_layouts_are_valid() {
        assert!(HashedLayout::DEFAULT.validate(DEFAULT_EEPROM_SIZE).is_ok());
        assert!(HashedLayout::COMPACT.validate(COMPACT_EEPROM_SIZE).is_ok());
        assert_eq!(HashedLayout::DEFAULT.end(), 6416);
        assert_eq!(HashedLayout::COMPACT.end(), 1024);
    }

    #[test]
    fn default_layout_needs_more_than_1k() {
        let err = HashedLayout::DEFAULT.validate(1024).unwrap_err();
        assert!(matches!(err, LayoutError::OutOfBounds { .. }));
    }

    #[test]
    fn historical_bool_region_overlaps_strings() {
        let layout = HashedLayout {
            boolean: KindRegion::new(16, 8, 200),
            ..HashedLayout::DEFAULT
        };
        assert_eq!(
            layout.validate(DEFAULT_EEPROM_SIZE),
            Err(LayoutError::Overlap(SettingKind::Str, SettingKind::Bool))
        );
    }

    #[test]
    fn header_and_stride_checks() {
        let layout = HashedLayout {
            string: KindRegion::new(4, 16, 10),
            ..HashedLayout::DEFAULT
        };
        assert_eq!(
            layout.validate(DEFAULT_EEPROM_SIZE),
            Err(LayoutError::HeaderOverlap(SettingKind::Str))
        );

        let layout = HashedLayout {
            int: KindRegion::new(1616, 2, 100),
            ..HashedLayout::DEFAULT
        };
        assert_eq!(
            layout.validate(DEFAULT_EEPROM_SIZE),
            Err(LayoutError::StrideTooSmall {
                kind: SettingKind::Int,
                stride: 2,
                needed: 4
            })
        );

        let layout = HashedLayout {
            float: KindRegion::new(3216, 16, 0),
            ..HashedLayout::DEFAULT
        };
        assert_eq!(
            layout.validate(DEFAULT_EEPROM_SIZE),
            Err(LayoutError::NoBuckets(SettingKind::Float))
        );
    }

    #[test]
    fn fingerprint_tracks_layout() {
        assert_eq!(
            HashedLayout::DEFAULT.fingerprint(),
            HashedLayout::DEFAULT.fingerprint()
        );
        assert_ne!(
            HashedLayout::DEFAULT.fingerprint(),
            HashedLayout::COMPACT.fingerprint()
        );
    }

    #[test]
    fn constructor_rejects_small_eeprom() {
        assert!(HashedEepromBackend::new(MockEeprom::new(COMPACT_EEPROM_SIZE)).is_err());
    }

    // =========================================================================
    // Format header
    // =========================================================================

    #[test]
    fn init_formats_fresh_eeprom() {
        let b = backend();
        let bytes = b.eeprom().bytes();
        assert_eq!(&bytes[..3], b"WGS");
        assert_eq!(bytes[3], FORMAT_VERSION);
        // Reserved bytes stay erased, regions are zeroed
        assert!(bytes[8..16].iter().all(|&x| x == ERASED_BYTE));
        assert!(bytes[16..6416].iter().all(|&x| x == 0));
        assert!(bytes[6416..].iter().all(|&x| x == ERASED_BYTE));
    }

    #[test]
    fn init_keeps_existing_format() {
        let mut b = backend();
        b.save("temp", &SettingValue::Int(72)).unwrap();

        let mut reopened = HashedEepromBackend::new(b.into_inner()).unwrap();
        let writes = reopened.eeprom().write_count();
        reopened.init().unwrap();
        assert_eq!(reopened.eeprom().write_count(), writes);
        assert_eq!(
            reopened.load("temp", SettingKind::Int).unwrap(),
            Some(SettingValue::Int(72))
        );
    }

    #[test]
    fn layout_change_reformats() {
        let mut b = backend();
        b.save("temp", &SettingValue::Int(72)).unwrap();

        let moved = HashedLayout {
            int: KindRegion::new(6416, 16, 100),
            ..HashedLayout::DEFAULT
        };
        let mut reopened = HashedEepromBackend::with_layout(b.into_inner(), moved).unwrap();
        reopened.init().unwrap();
        assert!(reopened.is_formatted().unwrap());
        assert_eq!(
            reopened.load("temp", SettingKind::Int).unwrap(),
            Some(SettingValue::Int(0))
        );
    }

    // =========================================================================
    // Values
    // =========================================================================

    #[test]
    fn raw_layout_is_little_endian() {
        let mut b = backend();
        b.save("temp", &SettingValue::Int(0x01020304)).unwrap();
        let addr = HashedLayout::DEFAULT.int.address("temp");
        assert_eq!(&b.eeprom().bytes()[addr..addr + 4], &[4, 3, 2, 1]);

        b.save("name", &"abc".into()).unwrap();
        let addr = HashedLayout::DEFAULT.string.address("name");
        assert_eq!(&b.eeprom().bytes()[addr..addr + 4], &[3, b'a', b'b', b'c']);
    }

    #[test]
    fn negative_one_round_trips() {
        let mut b = backend();
        b.save("n", &SettingValue::Int(-1)).unwrap();
        assert_eq!(
            b.load("n", SettingKind::Int).unwrap(),
            Some(SettingValue::Int(-1))
        );
    }

    #[test]
    fn identical_save_is_unchanged() {
        let mut b = backend();
        assert_eq!(
            b.save("x", &SettingValue::Float(2.5)).unwrap(),
            WriteOutcome::Written
        );
        let writes = b.eeprom().write_count();
        assert_eq!(
            b.save("x", &SettingValue::Float(2.5)).unwrap(),
            WriteOutcome::Unchanged
        );
        assert_eq!(b.eeprom().write_count(), writes);
    }

    #[test]
    fn failed_commit_keeps_previous_value() {
        let mut b = backend();
        b.save("temp", &SettingValue::Int(1)).unwrap();

        b.eeprom_mut().fail_commits(true);
        assert_eq!(
            b.save("temp", &SettingValue::Int(5)),
            Err(StorageError::WriteFailed)
        );
        assert_eq!(
            b.load("temp", SettingKind::Int).unwrap(),
            Some(SettingValue::Int(1))
        );

        b.save("name", &"abc".into()).unwrap_err();
        assert_eq!(
            b.load("name", SettingKind::Str).unwrap(),
            Some("".into())
        );

        b.eeprom_mut().fail_commits(false);
        b.save("temp", &SettingValue::Int(5)).unwrap();
        assert_eq!(
            b.load("temp", SettingKind::Int).unwrap(),
            Some(SettingValue::Int(5))
        );
    }

    #[test]
    fn corrupt_string_length_reads_none() {
        let mut b = backend();
        b.save("name", &"abc".into()).unwrap();
        let addr = HashedLayout::DEFAULT.string.address("name");
        b.eeprom_mut().corrupt(addr, &[16]);
        assert_eq!(b.load("name", SettingKind::Str).unwrap(), None);
    }

    #[test]
    fn corrupt_bool_reads_none() {
        let mut b = backend();
        let addr = HashedLayout::DEFAULT.boolean.address("flag");
        b.eeprom_mut().corrupt(addr, &[0x7F]);
        assert_eq!(b.load("flag", SettingKind::Bool).unwrap(), None);
    }

    #[test]
    fn compact_string_stride_limits_payload() {
        let layout = HashedLayout {
            string: KindRegion::new(16, 8, 32),
            ..HashedLayout::COMPACT
        };
        let mut b =
            HashedEepromBackend::with_layout(MockEeprom::new(COMPACT_EEPROM_SIZE), layout).unwrap();
        b.init().unwrap();
        b.save("s", &"abcdefghij".into()).unwrap();
        assert_eq!(b.load("s", SettingKind::Str).unwrap(), Some("abcdefg".into()));
    }

    #[test]
    fn clear_erases_whole_medium_then_formats() {
        let mut b = backend();
        b.eeprom_mut().corrupt(7000, &[0x12, 0x34]);
        b.save("temp", &SettingValue::Int(5)).unwrap();
        b.clear().unwrap();

        assert!(b.is_formatted().unwrap());
        assert_eq!(&b.eeprom().bytes()[7000..7002], &[ERASED_BYTE, ERASED_BYTE]);
        assert_eq!(
            b.load("temp", SettingKind::Int).unwrap(),
            Some(SettingValue::Int(0))
        );
    }
}
