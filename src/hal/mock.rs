//! Mock implementations for testing without hardware.
//!
//! This module provides test doubles for [`DigitalOutputBank`], enabling
//! development and testing on desktop without a display attached.
//!
//! # Available Mocks
//!
//! | Mock | Purpose |
//! |------|---------|
//! | [`RecordingBank`] | Records every line change, decodes shifted bits and commits |
//! | [`ShiftChain`] | Simulates the register chain with a separate latch stage |
//!
//! # Example
//!
//! ```rust
//! use rs_sseg::config::DisplayConfig;
//! use rs_sseg::device::SegmentDevice;
//! use rs_sseg::hal::RecordingBank;
//! use rs_sseg::traits::Line;
//!
//! let mut device = SegmentDevice::new(RecordingBank::new(), &DisplayConfig::default()).unwrap();
//! device.open().write(b"12.34\n").unwrap();
//!
//! // Boot text plus one write
//! assert_eq!(device.bank().commit_count(), 2);
//! assert!(device.bank().level(Line::OutputEnable));
//! ```
//!
//! [`DigitalOutputBank`]: crate::traits::DigitalOutputBank

use alloc::collections::VecDeque;
use alloc::vec::Vec;

use crate::config::DigitCount;
use crate::traits::{DigitalOutputBank, Line};

/// Error returned by the mocks when a failure is injected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MockLineError(pub Line);

impl core::fmt::Display for MockLineError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "injected failure on {}", self.0)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for MockLineError {}

/// One successful `set_line` call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineEvent {
    /// Line that was driven.
    pub line: Line,
    /// Level it was driven to.
    pub high: bool,
}

impl LineEvent {
    /// Creates an event.
    pub const fn new(line: Line, high: bool) -> Self {
        Self { line, high }
    }
}

// ============================================================================
// Recording Bank
// ============================================================================

/// Output bank that records every line change.
///
/// All lines start low. Use the accessors to inspect the traffic after test
/// operations.
///
/// # Example
///
/// ```rust
/// use rs_sseg::hal::RecordingBank;
/// use rs_sseg::transmitter::SerialTransmitter;
///
/// let mut tx = SerialTransmitter::new(RecordingBank::new());
/// tx.send_byte(0b0000_0001).unwrap();
/// tx.commit().unwrap();
///
/// let bank = tx.into_inner();
/// assert_eq!(bank.shifted_bits()[0], true);
/// assert!(bank.shifted_bits()[1..].iter().all(|bit| !bit));
/// assert_eq!(bank.commit_count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct RecordingBank {
    events: Vec<LineEvent>,
    levels: [bool; 4],
    shifted: Vec<bool>,
    bits_at_commit: Vec<usize>,
    fail_line: Option<Line>,
    fail_after: Option<usize>,
}

impl RecordingBank {
    /// Creates a bank with every line low and nothing recorded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every call that drives `line`.
    pub fn fail_on(mut self, line: Line) -> Self {
        self.fail_line = Some(line);
        self
    }

    /// Accept `calls` line changes, then fail every call after them.
    pub fn fail_after(mut self, calls: usize) -> Self {
        self.fail_after = Some(calls);
        self
    }

    /// Stop injecting failures.
    pub fn heal(&mut self) {
        self.fail_line = None;
        self.fail_after = None;
    }

    /// Every successful line change, oldest first.
    pub fn events(&self) -> &[LineEvent] {
        &self.events
    }

    /// Current level of `line`.
    pub fn level(&self, line: Line) -> bool {
        self.levels[line.slot()]
    }

    /// Number of low-to-high transitions on `line`.
    pub fn rising_edges(&self, line: Line) -> usize {
        let mut level = false;
        let mut count = 0;
        for event in self.events.iter().filter(|e| e.line == line) {
            if event.high && !level {
                count += 1;
            }
            level = event.high;
        }
        count
    }

    /// Number of commits (rising STROBE edges).
    pub fn commit_count(&self) -> usize {
        self.bits_at_commit.len()
    }

    /// DATA level sampled at each rising CLOCK edge, oldest first.
    pub fn shifted_bits(&self) -> Vec<bool> {
        self.shifted.clone()
    }

    /// Shifted bits regrouped into bytes, least significant bit first.
    ///
    /// A trailing partial byte is dropped.
    pub fn shifted_bytes(&self) -> Vec<u8> {
        pack_lsb_first(&self.shifted)
    }

    /// Bytes shifted between the previous commit and the last one.
    pub fn last_committed_bytes(&self) -> Vec<u8> {
        let end = match self.bits_at_commit.last() {
            Some(end) => *end,
            None => return Vec::new(),
        };
        let start = match self.bits_at_commit.len() {
            0 | 1 => 0,
            n => self.bits_at_commit[n - 2],
        };
        pack_lsb_first(&self.shifted[start..end])
    }

    /// Forget recorded traffic but keep the current levels.
    pub fn clear_history(&mut self) {
        self.events.clear();
        self.shifted.clear();
        self.bits_at_commit.clear();
    }
}

fn pack_lsb_first(bits: &[bool]) -> Vec<u8> {
    bits.chunks_exact(8)
        .map(|chunk| {
            chunk
                .iter()
                .enumerate()
                .fold(0u8, |byte, (i, bit)| byte | ((*bit as u8) << i))
        })
        .collect()
}

impl DigitalOutputBank for RecordingBank {
    type Error = MockLineError;

    fn set_line(&mut self, line: Line, high: bool) -> Result<(), MockLineError> {
        if self.fail_line == Some(line) {
            return Err(MockLineError(line));
        }
        if let Some(limit) = self.fail_after {
            if self.events.len() >= limit {
                return Err(MockLineError(line));
            }
        }

        let was_high = self.levels[line.slot()];
        self.levels[line.slot()] = high;
        self.events.push(LineEvent::new(line, high));

        if high && !was_high {
            match line {
                Line::Clock => self.shifted.push(self.levels[Line::Data.slot()]),
                Line::Strobe => self.bits_at_commit.push(self.shifted.len()),
                _ => {}
            }
        }
        Ok(())
    }
}

// ============================================================================
// Shift Chain
// ============================================================================

/// Simulated chain of N 8-bit shift registers with an output latch.
///
/// Each rising CLOCK edge moves DATA into the front of the chain and drops the
/// bit at the far end. A rising STROBE edge copies the whole chain into the
/// latch, which is what the digits show. OUTPUT_ENABLE is only recorded.
///
/// # Example
///
/// ```rust
/// use rs_sseg::config::DigitCount;
/// use rs_sseg::hal::ShiftChain;
/// use rs_sseg::transmitter::SerialTransmitter;
///
/// let digits = DigitCount::new(2).unwrap();
/// let mut tx = SerialTransmitter::new(ShiftChain::new(digits));
///
/// tx.send_byte(0xAA).unwrap();
/// tx.send_byte(0x55).unwrap();
/// assert_eq!(tx.bank().latched(), vec![0, 0]); // nothing latched yet
///
/// tx.commit().unwrap();
/// assert_eq!(tx.bank().latched(), vec![0xAA, 0x55]);
/// ```
#[derive(Debug)]
pub struct ShiftChain {
    register: VecDeque<bool>,
    latch: Vec<bool>,
    levels: [bool; 4],
    commits: usize,
}

impl ShiftChain {
    /// Creates a chain of `digits` registers, all cleared.
    pub fn new(digits: DigitCount) -> Self {
        let bits = digits.frame_bits();
        Self {
            register: core::iter::repeat(false).take(bits).collect(),
            latch: alloc::vec![false; bits],
            levels: [false; 4],
            commits: 0,
        }
    }

    /// Number of registers in the chain.
    pub fn digits(&self) -> usize {
        self.register.len() / 8
    }

    /// Latched bytes, ordered as they were transmitted.
    pub fn latched(&self) -> Vec<u8> {
        decode(self.latch.iter().copied().collect())
    }

    /// Shift-stage bytes, ordered as they were transmitted.
    pub fn pending(&self) -> Vec<u8> {
        decode(self.register.iter().copied().collect())
    }

    /// Whether OUTPUT_ENABLE is currently high.
    pub fn output_enabled(&self) -> bool {
        self.levels[Line::OutputEnable.slot()]
    }

    /// Number of latch pulses seen.
    pub fn commit_count(&self) -> usize {
        self.commits
    }
}

// Position 0 holds the newest bit, so bit `b` of the `i`th transmitted byte
// sits at `len - 1 - (8 * i + b)`.
fn decode(bits: Vec<bool>) -> Vec<u8> {
    let len = bits.len();
    (0..len / 8)
        .map(|i| {
            (0..8).fold(0u8, |byte, b| {
                byte | ((bits[len - 1 - (8 * i + b)] as u8) << b)
            })
        })
        .collect()
}

impl DigitalOutputBank for ShiftChain {
    type Error = core::convert::Infallible;

    fn set_line(&mut self, line: Line, high: bool) -> Result<(), Self::Error> {
        let was_high = self.levels[line.slot()];
        self.levels[line.slot()] = high;

        if high && !was_high {
            match line {
                Line::Clock => {
                    self.register.push_front(self.levels[Line::Data.slot()]);
                    self.register.pop_back();
                }
                Line::Strobe => {
                    self.latch.clear();
                    self.latch.extend(self.register.iter().copied());
                    self.commits += 1;
                }
                _ => {}
            }
        }
        Ok(())
    }
}
