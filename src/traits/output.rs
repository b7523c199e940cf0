//! Digital output abstraction for the shift-register control lines.
//!
//! A seven-segment bank behind a shift-register chain needs four binary
//! outputs. This module names them ([`Line`]) and defines the capability the
//! transmitter drives ([`DigitalOutputBank`]).
//!
//! # Implementation
//!
//! For tests and desktop development use [`RecordingBank`] from
//! [`crate::hal::mock`]. For ESP32 hardware use `hal::esp32::Esp32OutputBank`
//! (requires the `esp32` feature).
//!
//! # Example
//!
//! ```rust
//! use rs_sseg::traits::{DigitalOutputBank, Line};
//! use rs_sseg::hal::RecordingBank;
//!
//! let mut bank = RecordingBank::new();
//! bank.set_high(Line::Strobe).unwrap();
//! bank.set_low(Line::Strobe).unwrap();
//!
//! assert_eq!(bank.commit_count(), 1);
//! assert!(!bank.level(Line::Strobe));
//! ```
//!
//! [`RecordingBank`]: crate::hal::RecordingBank

/// One of the four control lines of the shift-register chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Line {
    /// Serial data input of the first register.
    Data,
    /// Shift clock. Data is shifted on the rising edge.
    Clock,
    /// Latch strobe. A high pulse copies the shift stage into the output stage.
    Strobe,
    /// Output enable of the register outputs.
    OutputEnable,
}

impl Line {
    /// All lines, in the order the device brings them up.
    pub const ALL: [Line; 4] = [Line::OutputEnable, Line::Strobe, Line::Data, Line::Clock];

    /// Returns the line name as a lowercase string.
    ///
    /// # Examples
    ///
    /// ```
    /// use rs_sseg::traits::Line;
    ///
    /// assert_eq!(Line::Data.as_str(), "data");
    /// assert_eq!(Line::OutputEnable.as_str(), "output_enable");
    /// ```
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Line::Data => "data",
            Line::Clock => "clock",
            Line::Strobe => "strobe",
            Line::OutputEnable => "output_enable",
        }
    }

    /// Label used when requesting the line from the platform.
    #[inline]
    pub const fn label(&self) -> &'static str {
        match self {
            Line::Data => "sseg_data",
            Line::Clock => "sseg_clock",
            Line::Strobe => "sseg_strobe",
            Line::OutputEnable => "sseg_oe",
        }
    }

    /// Position of the line inside [`Line::ALL`]-sized arrays.
    #[inline]
    pub(crate) const fn slot(&self) -> usize {
        match self {
            Line::OutputEnable => 0,
            Line::Strobe => 1,
            Line::Data => 2,
            Line::Clock => 3,
        }
    }
}

impl core::fmt::Display for Line {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bank of four independently settable binary output lines.
///
/// Acquiring, validating and releasing the underlying outputs is the
/// implementation's business. Holding a value of this type is the "lines are
/// ready" precondition for everything in [`crate::transmitter`].
///
/// # Implementation Notes
///
/// - `set_line` must be synchronous: the line has the requested level when
///   the call returns.
/// - Implementations must not reorder or coalesce calls. The serial protocol
///   relies on every CLOCK and STROBE edge reaching the hardware.
///
/// # Example Implementation
///
/// ```rust,ignore
/// use rs_sseg::traits::{DigitalOutputBank, Line};
///
/// struct MyBank { /* gpio handles */ }
///
/// impl DigitalOutputBank for MyBank {
///     type Error = ();
///
///     fn set_line(&mut self, line: Line, high: bool) -> Result<(), ()> {
///         // Write the GPIO register for `line`...
///         Ok(())
///     }
/// }
/// ```
pub trait DigitalOutputBank {
    /// Error type for line operations.
    type Error;

    /// Drive `line` to `high` (true) or low (false).
    fn set_line(&mut self, line: Line, high: bool) -> Result<(), Self::Error>;

    /// Drive `line` high.
    fn set_high(&mut self, line: Line) -> Result<(), Self::Error> {
        self.set_line(line, true)
    }

    /// Drive `line` low.
    fn set_low(&mut self, line: Line) -> Result<(), Self::Error> {
        self.set_line(line, false)
    }
}

impl<B: DigitalOutputBank + ?Sized> DigitalOutputBank for &mut B {
    type Error = B::Error;

    fn set_line(&mut self, line: Line, high: bool) -> Result<(), Self::Error> {
        (**self).set_line(line, high)
    }
}
