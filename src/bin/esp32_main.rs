//! ESP32 seven-segment display driver.
//!
//! This is the main entry point for the physical hardware. It:
//! - Claims the four control lines (DATA, CLOCK, STROBE, OUTPUT_ENABLE)
//! - Brings the display up and shows the boot text
//! - Reads lines from the console UART and writes each one to the display,
//!   the same way a write to a device node would
//!
//! # Build
//!
//! ```bash
//! cargo build --release --features esp32 --bin esp32_main
//!
//! # Eight digits with a custom boot text
//! SSEG_DIGITS=8 SSEG_BOOT_TEXT="HELLO" cargo build --release --features esp32
//!
//! # Move DATA and CLOCK to other GPIOs
//! SSEG_PIN_DATA=21 SSEG_PIN_CLOCK=22 cargo build --release --features esp32
//! ```

use anyhow::Context;
use esp_idf_hal::peripherals::Peripherals;
use rs_sseg::config::{DisplayConfig, LinePins, DEFAULT_DIGITS};
use rs_sseg::hal::esp32::ConfiguredBank;
use rs_sseg::{Line, SegmentDevice};
use std::io::BufRead;
use std::thread;
use std::time::Duration;

/// Console poll interval when no input is pending
const IDLE_INTERVAL_MS: u64 = 50;

fn main() -> anyhow::Result<()> {
    // Initialize ESP-IDF
    esp_idf_hal::sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();

    log::info!("rs-sseg starting");

    // =========================================================================
    // Configuration
    // =========================================================================
    let digits = option_env!("SSEG_DIGITS")
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_DIGITS);

    let mut pins = LinePins::default();
    for (line, value) in [
        (Line::Data, option_env!("SSEG_PIN_DATA")),
        (Line::Clock, option_env!("SSEG_PIN_CLOCK")),
        (Line::Strobe, option_env!("SSEG_PIN_STROBE")),
        (Line::OutputEnable, option_env!("SSEG_PIN_OE")),
    ] {
        if let Some(pin) = value.and_then(|s| s.parse().ok()) {
            pins = pins.with_pin(line, pin);
        }
    }

    let mut display = DisplayConfig::default()
        .with_digit_count(digits)
        .with_pins(pins);
    if let Some(text) = option_env!("SSEG_BOOT_TEXT") {
        display = display.with_boot_text(text);
    }
    let digit_count = display.validate().context("invalid display configuration")?;

    // held for the whole run so nothing else can claim the GPIOs
    let _peripherals = Peripherals::take()?;

    // =========================================================================
    // Initialize Display
    // =========================================================================
    log::info!(
        "display pins: data={} clock={} strobe={} oe={}",
        pins.data,
        pins.clock,
        pins.strobe,
        pins.output_enable
    );
    // SAFETY: the peripherals singleton is held above and `validate` ruled
    // out negative and shared pins, so each GPIO is claimed exactly once.
    let bank = unsafe { ConfiguredBank::from_pins(&display.pins) }
        .context("failed to claim display pins")?;

    let mut device = SegmentDevice::new(bank, &display).context("display bring-up failed")?;
    log::info!(
        "display ready: {} digits, writes up to {} bytes",
        digit_count.get(),
        device.max_write_len()
    );

    // =========================================================================
    // Console Loop
    // =========================================================================
    let stdin = std::io::stdin();
    let mut line = Vec::with_capacity(device.max_write_len() + 2);

    loop {
        line.clear();
        match stdin.lock().read_until(b'\n', &mut line) {
            Ok(0) => thread::sleep(Duration::from_millis(IDLE_INTERVAL_MS)),
            Ok(_) => {
                let accepted = device.open().write(&line).context("display write failed")?;
                log::debug!("accepted {} bytes", accepted);
            }
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                thread::sleep(Duration::from_millis(IDLE_INTERVAL_MS));
            }
            Err(e) => {
                log::warn!("console read failed: {}", e);
                thread::sleep(Duration::from_millis(IDLE_INTERVAL_MS));
            }
        }
    }
}
