//! ESP32 settings demo firmware.
//!
//! Counts boots in NVS and keeps a couple of dashboard settings across
//! resets:
//! - `boots`: incremented on every start
//! - `brightness`: seeded on first boot, then left alone
//! - `label`: device label, overridable at build time with `WEBGUI_LABEL`
//!
//! Hold the BOOT button (GPIO9) during reset to wipe all settings.
//!
//! # Build
//!
//! ```bash
//! cargo build --release --bin esp32_main --features esp32
//! espflash flash --monitor target/riscv32imc-esp-espidf/release/esp32_main
//! ```

use esp_idf_hal::gpio::{PinDriver, Pull};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_svc::log::EspLogger;
use log::{info, warn};
use rs_webgui::hal::esp32::Esp32Preferences;
use rs_webgui::{SettingsConfig, SettingsStore};
use std::thread;
use std::time::Duration;

/// Status log interval
const REPORT_INTERVAL: Duration = Duration::from_secs(10);

/// Brightness written on first boot
const DEFAULT_BRIGHTNESS: i32 = 80;

fn main() -> anyhow::Result<()> {
    // Initialize ESP-IDF
    esp_idf_hal::sys::link_patches();
    EspLogger::initialize_default();

    info!("================================");
    info!("  rs-webgui settings demo");
    info!("================================");

    let peripherals = Peripherals::take()?;

    // =========================================================================
    // Settings store (NVS namespace "webgui")
    // =========================================================================
    let config = SettingsConfig::default();
    let prefs = Esp32Preferences::take()?;
    let mut store = SettingsStore::preferences(prefs, &config);
    store
        .init()
        .map_err(|e| anyhow::anyhow!("Settings init failed: {}", e))?;
    info!("[OK] Settings ready (namespace '{}')", config.namespace);

    // =========================================================================
    // Factory reset (BOOT button held low at reset)
    // =========================================================================
    let mut boot_button = PinDriver::input(peripherals.pins.gpio9)?;
    boot_button.set_pull(Pull::Up)?;
    if boot_button.is_low() {
        warn!("BOOT held, clearing all settings");
        store.clear();
    }

    // =========================================================================
    // Boot counter and first-boot defaults
    // =========================================================================
    let boots = store.load_int("boots").saturating_add(1);
    store.save("boots", boots);

    if !store.load_bool("seeded") {
        store.save("brightness", DEFAULT_BRIGHTNESS);
        store.save("label", option_env!("WEBGUI_LABEL").unwrap_or("webgui"));
        store.save("seeded", true);
        info!("First boot, defaults written");
    }

    info!("Boot #{}", boots);

    // =========================================================================
    // Main loop
    // =========================================================================
    loop {
        info!(
            "boots={} brightness={} label='{}'",
            store.load_int("boots"),
            store.load_int("brightness"),
            store.load_string("label")
        );
        thread::sleep(REPORT_INTERVAL);
    }
}
