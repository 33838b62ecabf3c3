//! File-backed storage for desktop builds.
//!
//! Each primitive keeps a RAM image and mirrors it to a single file, so
//! settings survive process restarts the way they survive reboots on a board.
//! A missing or short file reads as erased (`0xFF`).
//!
//! # Example
//!
//! ```rust,no_run
//! use rs_webgui::backends::HashedEepromBackend;
//! use rs_webgui::hal::FileEeprom;
//! use rs_webgui::SettingsStore;
//!
//! let eeprom = FileEeprom::open("settings.eeprom", 8192)?;
//! let mut store = SettingsStore::new(HashedEepromBackend::new(eeprom).unwrap());
//! store.save("volume", 7);
//! # Ok::<(), std::io::Error>(())
//! ```

use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use log::debug;

use crate::traits::{EepromStorage, FlashRecord, ERASED_BYTE};

fn load_image(path: &Path, size: usize) -> io::Result<Vec<u8>> {
    let mut image = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
        Err(e) => return Err(e),
    };
    image.resize(size, ERASED_BYTE);
    Ok(image)
}

fn out_of_bounds(address: usize, len: usize, capacity: usize) -> io::Error {
    io::Error::new(
        ErrorKind::InvalidInput,
        format!(
            "access of {} bytes at {} exceeds capacity {}",
            len, address, capacity
        ),
    )
}

// ============================================================================
// EEPROM
// ============================================================================

/// EEPROM emulated by a file.
///
/// Writes go to RAM; [`commit`](EepromStorage::commit) flushes the whole
/// image, like ESP32/RP2040 emulated EEPROM.
#[derive(Debug)]
pub struct FileEeprom {
    path: PathBuf,
    image: Vec<u8>,
    dirty: bool,
}

impl FileEeprom {
    /// Load `path`, or start erased if it does not exist.
    pub fn open(path: impl Into<PathBuf>, size: usize) -> io::Result<Self> {
        let path = path.into();
        let image = load_image(&path, size)?;
        Ok(Self {
            path,
            image,
            dirty: false,
        })
    }

    /// True if there are writes not yet committed.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn check(&self, address: usize, len: usize) -> io::Result<()> {
        match address.checked_add(len) {
            Some(end) if end <= self.image.len() => Ok(()),
            _ => Err(out_of_bounds(address, len, self.image.len())),
        }
    }
}

impl EepromStorage for FileEeprom {
    type Error = io::Error;

    fn capacity(&self) -> usize {
        self.image.len()
    }

    fn read(&mut self, address: usize, buf: &mut [u8]) -> io::Result<()> {
        self.check(address, buf.len())?;
        buf.copy_from_slice(&self.image[address..address + buf.len()]);
        Ok(())
    }

    fn write(&mut self, address: usize, data: &[u8]) -> io::Result<()> {
        self.check(address, data.len())?;
        self.image[address..address + data.len()].copy_from_slice(data);
        self.dirty = true;
        Ok(())
    }

    fn commit(&mut self) -> io::Result<()> {
        if !self.dirty {
            return Ok(());
        }
        fs::write(&self.path, &self.image)?;
        self.dirty = false;
        debug!("settings: committed {}", self.path.display());
        Ok(())
    }
}

// ============================================================================
// Flash
// ============================================================================

/// Flash record region emulated by a file.
///
/// Every write and erase rewrites the file.
#[derive(Debug)]
pub struct FileFlash {
    path: PathBuf,
    image: Vec<u8>,
}

impl FileFlash {
    /// Load `path`, or start erased if it does not exist.
    pub fn open(path: impl Into<PathBuf>, capacity: usize) -> io::Result<Self> {
        let path = path.into();
        let image = load_image(&path, capacity)?;
        Ok(Self { path, image })
    }
}

impl FlashRecord for FileFlash {
    type Error = io::Error;

    fn capacity(&self) -> usize {
        self.image.len()
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<()> {
        if buf.len() > self.image.len() {
            return Err(out_of_bounds(0, buf.len(), self.image.len()));
        }
        buf.copy_from_slice(&self.image[..buf.len()]);
        Ok(())
    }

    fn write(&mut self, data: &[u8]) -> io::Result<()> {
        if data.len() > self.image.len() {
            return Err(out_of_bounds(0, data.len(), self.image.len()));
        }
        self.image.fill(ERASED_BYTE);
        self.image[..data.len()].copy_from_slice(data);
        fs::write(&self.path, &self.image)
    }

    fn erase(&mut self) -> io::Result<()> {
        self.image.fill(ERASED_BYTE);
        fs::write(&self.path, &self.image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "rs-webgui-{}-{}",
            std::process::id(),
            name
        ));
        let _ = fs::remove_file(&path);
        path
    }

    #[test]
    fn missing_file_reads_erased() {
        let path = temp_path("missing.eeprom");
        let mut eeprom = FileEeprom::open(&path, 8).unwrap();
        let mut buf = [0u8; 8];
        eeprom.read(0, &mut buf).unwrap();
        assert_eq!(buf, [ERASED_BYTE; 8]);
        assert!(!path.exists());
    }

    #[test]
    fn eeprom_persists_only_after_commit() {
        let path = temp_path("commit.eeprom");
        let mut eeprom = FileEeprom::open(&path, 8).unwrap();
        eeprom.write(2, &[1, 2, 3]).unwrap();
        assert!(eeprom.is_dirty());
        assert!(!path.exists());

        eeprom.commit().unwrap();
        assert!(!eeprom.is_dirty());

        let mut reopened = FileEeprom::open(&path, 8).unwrap();
        let mut buf = [0u8; 4];
        reopened.read(1, &mut buf).unwrap();
        assert_eq!(buf, [ERASED_BYTE, 1, 2, 3]);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn eeprom_bounds() {
        let path = temp_path("bounds.eeprom");
        let mut eeprom = FileEeprom::open(&path, 4).unwrap();
        let err = eeprom.write(3, &[0, 0]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn flash_write_erases_tail() {
        let path = temp_path("record.flash");
        let mut flash = FileFlash::open(&path, 6).unwrap();
        flash.write(&[1, 2, 3, 4]).unwrap();
        flash.write(&[9]).unwrap();

        let mut reopened = FileFlash::open(&path, 6).unwrap();
        let mut buf = [0u8; 6];
        reopened.read(&mut buf).unwrap();
        assert_eq!(buf, [9, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]);
        let _ = fs::remove_file(&path);
    }
}
