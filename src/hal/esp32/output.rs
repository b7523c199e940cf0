//! GPIO output bank for ESP32 using `PinDriver`.
//!
//! Each control line is a push-pull output. Acquiring a pin consumes its
//! peripheral handle, so the same GPIO cannot be claimed twice; dropping the
//! bank releases all four.

use crate::config::LinePins;
use crate::traits::{DigitalOutputBank, Line};
use esp_idf_hal::gpio::{AnyOutputPin, Level, Output, OutputPin, PinDriver};
use esp_idf_hal::peripheral::Peripheral;
use esp_idf_hal::sys::EspError;

/// Shift-register control lines on four ESP32 GPIOs.
///
/// # Example
///
/// ```ignore
/// use rs_sseg::hal::esp32::Esp32OutputBank;
///
/// let peripherals = Peripherals::take()?;
/// let bank = Esp32OutputBank::new(
///     peripherals.pins.gpio9, // DATA
///     peripherals.pins.gpio8, // CLOCK
///     peripherals.pins.gpio6, // STROBE
///     peripherals.pins.gpio4, // OUTPUT_ENABLE
/// )?;
/// ```
pub struct Esp32OutputBank<'d, D, C, S, E>
where
    D: OutputPin,
    C: OutputPin,
    S: OutputPin,
    E: OutputPin,
{
    data: PinDriver<'d, D, Output>,
    clock: PinDriver<'d, C, Output>,
    strobe: PinDriver<'d, S, Output>,
    output_enable: PinDriver<'d, E, Output>,
}

impl<'d, D, C, S, E> Esp32OutputBank<'d, D, C, S, E>
where
    D: OutputPin,
    C: OutputPin,
    S: OutputPin,
    E: OutputPin,
{
    /// Claims the four pins as outputs.
    ///
    /// # Errors
    ///
    /// Returns the first `EspError` from pin configuration. Pins already
    /// claimed are released when the partial drivers drop.
    pub fn new(
        data: impl Peripheral<P = D> + 'd,
        clock: impl Peripheral<P = C> + 'd,
        strobe: impl Peripheral<P = S> + 'd,
        output_enable: impl Peripheral<P = E> + 'd,
    ) -> Result<Self, EspError> {
        let output_enable = PinDriver::output(output_enable)?;
        let strobe = PinDriver::output(strobe)?;
        let data = PinDriver::output(data)?;
        let clock = PinDriver::output(clock)?;

        log::info!(
            "claimed {} {} {} {}",
            Line::OutputEnable.label(),
            Line::Strobe.label(),
            Line::Data.label(),
            Line::Clock.label()
        );

        Ok(Self {
            data,
            clock,
            strobe,
            output_enable,
        })
    }
}

/// Bank whose GPIOs are picked at runtime from [`LinePins`].
pub type ConfiguredBank =
    Esp32OutputBank<'static, AnyOutputPin, AnyOutputPin, AnyOutputPin, AnyOutputPin>;

impl ConfiguredBank {
    /// Claims the GPIOs named in `pins`.
    ///
    /// `pins` should already have passed [`LinePins::validate`]; a pin the
    /// chip does not have fails here with an `EspError`.
    ///
    /// # Safety
    ///
    /// The caller must own the GPIO peripherals, for example by holding the
    /// `Peripherals` singleton, and must not hand any of these pins out
    /// elsewhere while the bank lives.
    pub unsafe fn from_pins(pins: &LinePins) -> Result<Self, EspError> {
        Self::new(
            AnyOutputPin::new(pins.data),
            AnyOutputPin::new(pins.clock),
            AnyOutputPin::new(pins.strobe),
            AnyOutputPin::new(pins.output_enable),
        )
    }
}

impl<D, C, S, E> DigitalOutputBank for Esp32OutputBank<'_, D, C, S, E>
where
    D: OutputPin,
    C: OutputPin,
    S: OutputPin,
    E: OutputPin,
{
    type Error = EspError;

    fn set_line(&mut self, line: Line, high: bool) -> Result<(), EspError> {
        let level = Level::from(high);
        match line {
            Line::Data => self.data.set_level(level),
            Line::Clock => self.clock.set_level(level),
            Line::Strobe => self.strobe.set_level(level),
            Line::OutputEnable => self.output_enable.set_level(level),
        }
    }
}
