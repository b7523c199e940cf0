//! Trait definitions for hardware abstraction.
//!
//! This module defines the seam between the rendering/transmission core and
//! the platform that owns the physical output lines:
//! - Run on different hardware (ESP32, desktop mock)
//! - Verify the serial protocol without hardware by recording line edges
//!
//! # Hardware Abstraction
//!
//! - [`DigitalOutputBank`]: four binary outputs (DATA, CLOCK, STROBE, OUTPUT_ENABLE)
//! - [`Line`]: identifies one of those outputs

pub mod output;

pub use output::*;
