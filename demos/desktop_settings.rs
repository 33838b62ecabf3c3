//! Desktop settings demo backed by files.
//!
//! Runs the EEPROM and flash backends against files in the working directory so values
//! persist between runs, the way they persist across reboots on a board:
//! - `webgui.eeprom`: hashed EEPROM image (8 KiB)
//! - `webgui.flash`: fixed-slot flash record
//!
//! Log lines go to stderr; set `RUST_LOG=debug` to see every write.
//!
//! # Usage
//!
//! ```sh
//! cargo run --example desktop_settings           # show and bump counters
//! cargo run --example desktop_settings -- clear  # wipe both media
//! ```

use rs_webgui::backends::{DEFAULT_EEPROM_SIZE, DEFAULT_SLOTS};
use rs_webgui::hal::{FileEeprom, FileFlash};
use rs_webgui::{EepromStorage, FixedSlotBackend, SettingsBackend, SettingsConfig, SettingsStore};

const EEPROM_PATH: &str = "webgui.eeprom";
const FLASH_PATH: &str = "webgui.flash";

fn report<B: SettingsBackend>(name: &str, store: &mut SettingsStore<B>) {
    println!(
        "{:<8} runs={:<4} ratio={:<6.3} dark_mode={:<5} label='{}'",
        name,
        store.load_int("runs"),
        store.load_float("ratio"),
        store.load_bool("dark_mode"),
        store.load_string("label"),
    );
}

fn bump<B: SettingsBackend>(store: &mut SettingsStore<B>) {
    let runs = store.load_int("runs") + 1;
    store.save("runs", runs);
    store.save("ratio", 1.0 / runs as f32);
    store.save("dark_mode", runs % 2 == 0);
    store.save("label", "desktop");
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("=================================");
    println!("  rs-webgui Desktop Settings");
    println!("=================================");
    println!();

    let clear = std::env::args().nth(1).as_deref() == Some("clear");
    let config = SettingsConfig::default();

    let eeprom = FileEeprom::open(EEPROM_PATH, DEFAULT_EEPROM_SIZE)?;
    println!("EEPROM: {} ({} bytes)", EEPROM_PATH, eeprom.capacity());
    let mut hashed = SettingsStore::hashed_eeprom(eeprom, &config)?;

    let record_len = FixedSlotBackend::<FileFlash, DEFAULT_SLOTS>::RECORD_LEN;
    let flash = FileFlash::open(FLASH_PATH, record_len)?;
    println!("Flash:  {} ({} bytes)", FLASH_PATH, record_len);
    let mut slots: SettingsStore<FixedSlotBackend<FileFlash>> =
        SettingsStore::fixed_slot(flash, &config);
    println!();

    if clear {
        hashed.try_clear().map_err(|e| anyhow::anyhow!("{}", e))?;
        slots.try_clear().map_err(|e| anyhow::anyhow!("{}", e))?;
        println!("Cleared.");
        return Ok(());
    }

    bump(&mut hashed);
    bump(&mut slots);

    report("eeprom", &mut hashed);
    report("flash", &mut slots);

    Ok(())
}
