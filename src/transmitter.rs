//! Bit-level serial protocol for the shift-register chain.
//!
//! The chain shifts on the rising edge of CLOCK and copies its shift stage
//! to the outputs on the rising edge of STROBE:
//!
//! ```text
//! bit:    CLOCK low -> DATA = bit -> CLOCK high
//! byte:   8 bits, least significant first
//! commit: STROBE high -> STROBE low
//! frame:  every pattern in frame order, then one commit
//! ```
//!
//! OUTPUT_ENABLE is never touched here. Bring-up owns it.
//!
//! # Example
//!
//! ```rust
//! use rs_sseg::config::DigitCount;
//! use rs_sseg::hal::RecordingBank;
//! use rs_sseg::render::TextRenderer;
//! use rs_sseg::transmitter::SerialTransmitter;
//!
//! let digits = DigitCount::new(2).unwrap();
//! let frame = TextRenderer::render(b"42", 2, digits);
//!
//! let mut tx = SerialTransmitter::new(RecordingBank::new());
//! tx.transmit(&frame).unwrap();
//!
//! let bank = tx.into_inner();
//! assert_eq!(bank.commit_count(), 1);
//! assert_eq!(bank.shifted_bytes(), frame.to_bytes().to_vec());
//! ```

use crate::patterns::SegmentPattern;
use crate::render::RenderedFrame;
use crate::traits::{DigitalOutputBank, Line};

/// Drives DATA, CLOCK and STROBE of a [`DigitalOutputBank`].
///
/// The first error from the bank aborts the current operation and is
/// returned as is. Lines keep whatever level they had at that point.
#[derive(Debug)]
pub struct SerialTransmitter<B> {
    bank: B,
}

impl<B: DigitalOutputBank> SerialTransmitter<B> {
    /// Wrap a bank whose lines are already configured as outputs.
    pub fn new(bank: B) -> Self {
        Self { bank }
    }

    /// Shift one bit into the chain.
    pub fn send_bit(&mut self, bit: bool) -> Result<(), B::Error> {
        self.bank.set_low(Line::Clock)?;
        self.bank.set_line(Line::Data, bit)?;
        self.bank.set_high(Line::Clock)
    }

    /// Shift one byte into the chain, least significant bit first.
    pub fn send_byte(&mut self, byte: u8) -> Result<(), B::Error> {
        for i in 0..8 {
            self.send_bit((byte >> i) & 0x01 != 0)?;
        }
        Ok(())
    }

    /// Shift one segment pattern.
    #[inline]
    pub fn send_pattern(&mut self, pattern: SegmentPattern) -> Result<(), B::Error> {
        self.send_byte(pattern.bits())
    }

    /// Latch the shift stage onto the outputs.
    pub fn commit(&mut self) -> Result<(), B::Error> {
        self.bank.set_high(Line::Strobe)?;
        self.bank.set_low(Line::Strobe)
    }

    /// Shift out every pattern of `frame`, then commit once.
    pub fn transmit(&mut self, frame: &RenderedFrame) -> Result<(), B::Error> {
        for pattern in frame.iter() {
            self.send_pattern(pattern)?;
        }
        log::debug!("shifted {} digits ({} from input)", frame.len(), frame.emitted());
        self.commit()
    }

    /// The underlying bank.
    pub fn bank(&self) -> &B {
        &self.bank
    }

    /// The underlying bank, mutably.
    pub fn bank_mut(&mut self) -> &mut B {
        &mut self.bank
    }

    /// Give the bank back.
    pub fn into_inner(self) -> B {
        self.bank
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DigitCount;
    use crate::hal::{LineEvent, RecordingBank};
    use crate::render::TextRenderer;

    fn tx() -> SerialTransmitter<RecordingBank> {
        SerialTransmitter::new(RecordingBank::new())
    }

    // =========================================================================
    // Bit and Byte Tests
    // =========================================================================

    #[test]
    fn send_bit_sequence() {
        let mut tx = tx();
        tx.send_bit(true).unwrap();

        assert_eq!(
            tx.bank().events(),
            &[
                LineEvent::new(Line::Clock, false),
                LineEvent::new(Line::Data, true),
                LineEvent::new(Line::Clock, true),
            ]
        );
    }

    #[test]
    fn send_byte_is_lsb_first() {
        let mut tx = tx();
        tx.send_byte(0b0000_0110).unwrap();
        assert_eq!(
            tx.bank().shifted_bits(),
            vec![false, true, true, false, false, false, false, false]
        );
        assert_eq!(tx.bank().rising_edges(Line::Clock), 8);
    }

    #[test]
    fn commit_pulses_strobe() {
        let mut tx = tx();
        tx.commit().unwrap();
        assert_eq!(
            tx.bank().events(),
            &[
                LineEvent::new(Line::Strobe, true),
                LineEvent::new(Line::Strobe, false),
            ]
        );
    }

    // =========================================================================
    // Frame Tests
    // =========================================================================

    #[test]
    fn transmit_frame_then_single_commit() {
        let digits = DigitCount::new(5).unwrap();
        let frame = TextRenderer::render(b"hello", 5, digits);

        let mut tx = tx();
        tx.transmit(&frame).unwrap();
        let bank = tx.into_inner();

        assert_eq!(bank.rising_edges(Line::Clock), 40);
        assert_eq!(bank.commit_count(), 1);
        assert_eq!(bank.shifted_bytes(), frame.to_bytes().to_vec());
        // strobe is the last thing touched
        assert_eq!(bank.events().last(), Some(&LineEvent::new(Line::Strobe, false)));
    }

    #[test]
    fn transmit_never_touches_output_enable() {
        let digits = DigitCount::new(3).unwrap();
        let frame = TextRenderer::render(b"8.8.8.", 6, digits);

        let mut tx = tx();
        tx.transmit(&frame).unwrap();
        assert!(tx
            .bank()
            .events()
            .iter()
            .all(|event| event.line != Line::OutputEnable));
    }

    #[test]
    fn error_aborts_before_commit() {
        let digits = DigitCount::new(2).unwrap();
        let frame = TextRenderer::render(b"12", 2, digits);

        let mut tx = SerialTransmitter::new(RecordingBank::new().fail_after(5));
        assert!(tx.transmit(&frame).is_err());
        assert_eq!(tx.bank().commit_count(), 0);
        assert_eq!(tx.bank().events().len(), 5);
    }

    #[test]
    fn works_through_mutable_reference() {
        let mut bank = RecordingBank::new();
        {
            let mut tx = SerialTransmitter::new(&mut bank);
            tx.send_byte(0xFF).unwrap();
            tx.bank_mut().set_low(Line::Data).unwrap();
        }
        assert_eq!(bank.shifted_bytes(), vec![0xFF]);
        assert!(!bank.level(Line::Data));
    }
}
