//! ESP32 hardware abstraction layer for the seven-segment display.
//!
//! This module drives the shift-register chain from four GPIO outputs.
//!
//! # Hardware Configuration
//!
//! - **MCU**: any ESP32 supported by `esp-idf-hal`
//! - **Display**: N common-cathode digits, one 8-bit serial-in/parallel-out
//!   shift register per digit, chained DATA-out to DATA-in
//!
//! # Pin Assignments
//!
//! Pins come from [`crate::config::LinePins`]; the defaults are DATA=9,
//! CLOCK=8, STROBE=6, OUTPUT_ENABLE=4.

mod output;

pub use output::{ConfiguredBank, Esp32OutputBank};
