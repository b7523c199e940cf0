//! # rs-sseg
//!
//! A driver for multi-digit seven-segment displays wired behind a chain of
//! 8-bit serial-in/parallel-out shift registers, with optional web UI and
//! MQTT control.
//!
//! ## Features
//!
//! - **Text rendering**: digits, case-insensitive letters, blanks, glyphs and
//!   single segments; `.` and `:` light the decimal point of the character
//!   before them
//! - **Right-aligned windowing**: long input keeps its trailing N characters,
//!   short input is padded with blanks
//! - **Bit-banged protocol**: LSB-first bytes on DATA/CLOCK, one STROBE per
//!   frame so digits never show a half-shifted frame
//! - **Hardware abstraction**: four output lines behind one trait, with
//!   recording and simulated banks for desktop testing
//!
//! ## Architecture
//!
//! The crate is structured to allow testing on desktop without hardware:
//!
//! - `patterns` - Character classes and the segment pattern table
//! - `encoder` - Byte classification
//! - `render` - Right-to-left windowing with dot merging and padding
//! - `transmitter` - Serial protocol on top of a `DigitalOutputBank`
//! - `device` - Bring-up, exclusive write sessions, shutdown
//! - `hal` - Concrete banks (mock for testing, esp32 for hardware)
//!
//! ## Example
//!
//! ```rust
//! use rs_sseg::{DisplayConfig, SegmentDevice, hal::RecordingBank};
//!
//! // Five digits, boot text lights every decimal point
//! let mut device = SegmentDevice::new(RecordingBank::new(), &DisplayConfig::default()).unwrap();
//!
//! // Write like a character device
//! let mut session = device.open();
//! session.write(b"12.34\n").unwrap();
//! drop(session);
//!
//! assert_eq!(device.last_frame().emitted(), 4);
//! assert_eq!(device.bank().commit_count(), 2);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

/// Byte classification into pattern-table classes.
pub mod encoder;
/// Hardware abstraction layer with mock implementations for testing.
pub mod hal;
/// Character classes and the segment pattern table.
pub mod patterns;
/// Text windowing, dot merging and blank padding.
pub mod render;
/// Core traits for hardware abstraction.
pub mod traits;
/// Bit-level serial protocol for the shift-register chain.
pub mod transmitter;

/// Display device with exclusive write sessions.
pub mod device;

/// Shared configuration system for desktop and ESP32.
pub mod config;

/// Shared message types for HTTP/MQTT communication (serde-based).
#[cfg(feature = "serde")]
pub mod messages;

/// Network services for HTTP API and MQTT (feature-gated).
#[cfg(any(feature = "web", feature = "mqtt"))]
pub mod services;

// Re-exports for convenience
pub use device::{DeviceError, DisplaySession, SegmentDevice};
pub use encoder::{classify, is_dot_marker, Unsupported};
pub use patterns::{CharClass, CharKind, Glyph, PatternTable, SegmentPattern, SingleSegment};
pub use render::{RenderRequest, RenderedFrame, TextRenderer};
pub use traits::{DigitalOutputBank, Line};
pub use transmitter::SerialTransmitter;

// Config re-exports
pub use config::{
    Config, ConfigError, DigitCount, DisplayConfig, LinePins, MqttConfig, WebConfig,
};

// Message re-exports (for HTTP/MQTT APIs)
#[cfg(feature = "serde")]
pub use messages::{DisplayState, SetTextRequest};

// Parsing function re-exports (serde-json-core based)
#[cfg(feature = "serde-json-core")]
pub use messages::parse_text_request;
