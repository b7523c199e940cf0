//! Display device: bring-up, exclusive write sessions and shutdown.
//!
//! [`SegmentDevice`] owns the transmitter and the configured digit count. It
//! behaves like a write-only character device:
//!
//! - bring-up drives OUTPUT_ENABLE to the configured level, the other three
//!   lines low, and shows the boot text;
//! - [`SegmentDevice::open`] hands out a [`DisplaySession`] that mutably
//!   borrows the device, so only one writer exists at a time;
//! - a write keeps at most `2 x N` bytes, strips trailing CR/LF and reports
//!   the caller's full length as accepted;
//! - shutdown blanks the display and returns the bank for release.
//!
//! # Example
//!
//! ```rust
//! use rs_sseg::config::DisplayConfig;
//! use rs_sseg::device::SegmentDevice;
//! use rs_sseg::hal::RecordingBank;
//!
//! let config = DisplayConfig::default().with_digit_count(4);
//! let mut device = SegmentDevice::new(RecordingBank::new(), &config).unwrap();
//!
//! let mut session = device.open();
//! assert_eq!(session.write(b"12:34\r\n").unwrap(), 7);
//! drop(session);
//!
//! assert!(device.last_frame()[2].has_dot());
//! let bank = device.shutdown().unwrap();
//! assert_eq!(bank.commit_count(), 3); // boot, write, blank
//! ```

use crate::config::{ConfigError, DigitCount, DisplayConfig};
use crate::render::{RenderedFrame, TextRenderer};
use crate::traits::{DigitalOutputBank, Line};
use crate::transmitter::SerialTransmitter;

/// Device errors, generic over the bank's line error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeviceError<E> {
    /// Rejected display configuration.
    Config(ConfigError),
    /// A control line could not be driven.
    Line(E),
    /// Another writer holds the device.
    Busy,
}

impl<E> From<ConfigError> for DeviceError<E> {
    fn from(err: ConfigError) -> Self {
        DeviceError::Config(err)
    }
}

impl<E: core::fmt::Display> core::fmt::Display for DeviceError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DeviceError::Config(err) => write!(f, "invalid display config: {}", err),
            DeviceError::Line(err) => write!(f, "line error: {}", err),
            DeviceError::Busy => write!(f, "display is busy"),
        }
    }
}

#[cfg(feature = "std")]
impl<E: core::fmt::Debug + core::fmt::Display> std::error::Error for DeviceError<E> {}

/// A seven-segment display behind a shift-register chain.
#[derive(Debug)]
pub struct SegmentDevice<B> {
    tx: SerialTransmitter<B>,
    digits: DigitCount,
    last_frame: RenderedFrame,
    frames: u64,
}

impl<B: DigitalOutputBank> SegmentDevice<B> {
    /// Bring up the display on `bank`.
    ///
    /// Fails if the configuration is invalid or a line cannot be driven. The
    /// bank is dropped on failure, which releases whatever it holds.
    pub fn new(mut bank: B, config: &DisplayConfig) -> Result<Self, DeviceError<B::Error>> {
        let digits = config.validate()?;

        bank.set_line(Line::OutputEnable, config.output_enable_level)
            .map_err(DeviceError::Line)?;
        for line in [Line::Strobe, Line::Data, Line::Clock] {
            bank.set_low(line).map_err(DeviceError::Line)?;
        }

        let mut device = Self {
            tx: SerialTransmitter::new(bank),
            digits,
            last_frame: RenderedFrame::blank(digits),
            frames: 0,
        };
        device.show(config.boot_text.as_bytes())?;

        log::info!(
            "display up: {} digits, output enable {}",
            digits.get(),
            if config.output_enable_level { "high" } else { "low" }
        );
        Ok(device)
    }

    /// Start an exclusive write session.
    pub fn open(&mut self) -> DisplaySession<'_, B> {
        log::debug!("display opened");
        DisplaySession { device: self }
    }

    /// Blank every digit.
    pub fn clear(&mut self) -> Result<(), DeviceError<B::Error>> {
        self.show(&[])
    }

    /// Blank the display and give the bank back for release.
    pub fn shutdown(mut self) -> Result<B, DeviceError<B::Error>> {
        self.clear()?;
        log::info!("display down after {} frames", self.frames);
        Ok(self.tx.into_inner())
    }

    /// Configured digit count.
    pub fn digits(&self) -> DigitCount {
        self.digits
    }

    /// Largest number of bytes a write keeps.
    pub fn max_write_len(&self) -> usize {
        self.digits.max_write_len()
    }

    /// The most recently committed frame.
    pub fn last_frame(&self) -> &RenderedFrame {
        &self.last_frame
    }

    /// Number of frames committed since bring-up, boot text included.
    pub fn frames_committed(&self) -> u64 {
        self.frames
    }

    /// The underlying bank.
    pub fn bank(&self) -> &B {
        self.tx.bank()
    }

    fn show(&mut self, bytes: &[u8]) -> Result<(), DeviceError<B::Error>> {
        let frame = TextRenderer::render(bytes, bytes.len(), self.digits);
        self.tx.transmit(&frame).map_err(DeviceError::Line)?;
        self.last_frame = frame;
        self.frames += 1;
        Ok(())
    }
}

/// Exclusive writer for a [`SegmentDevice`]; the device is released on drop.
#[derive(Debug)]
pub struct DisplaySession<'a, B> {
    device: &'a mut SegmentDevice<B>,
}

impl<B: DigitalOutputBank> DisplaySession<'_, B> {
    /// Show `bytes` and return how many were accepted.
    ///
    /// At most `2 x N` bytes are kept, trailing `\r` and `\n` are stripped,
    /// and what remains is rendered and committed. The whole input counts as
    /// accepted even when truncated.
    pub fn write(&mut self, bytes: &[u8]) -> Result<usize, DeviceError<B::Error>> {
        let kept = trim_line_ending(&bytes[..bytes.len().min(self.device.max_write_len())]);
        self.device.show(kept)?;
        Ok(bytes.len())
    }

    /// Blank every digit.
    pub fn clear(&mut self) -> Result<(), DeviceError<B::Error>> {
        self.device.clear()
    }

    /// The device this session writes to.
    pub fn device(&self) -> &SegmentDevice<B> {
        &*self.device
    }
}

/// Strip trailing `\r` and `\n`.
pub(crate) fn trim_line_ending(mut bytes: &[u8]) -> &[u8] {
    while let [rest @ .., b'\n' | b'\r'] = bytes {
        bytes = rest;
    }
    bytes
}
