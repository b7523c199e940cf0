//! Text windowing, dot merging and blank padding.
//!
//! [`TextRenderer`] turns an input buffer of any length into exactly N digit
//! patterns, in the order they are shifted out.
//!
//! # Algorithm
//!
//! The buffer is scanned from its last byte toward its first:
//!
//! - `.` and `:` set a pending-dot flag and use no digit slot.
//! - Unsupported bytes are skipped. The pending-dot flag survives the skip and
//!   lands on the next supported character.
//! - Supported bytes emit their pattern, OR'd with the decimal point if the
//!   flag is set, and clear the flag.
//!
//! The scan stops after N digits or at the start of the buffer. Missing digits
//! are blank padding at the end of the frame. The first pattern of the frame is
//! therefore the rightmost supported character of the input, and long inputs
//! keep their trailing N characters.
//!
//! # Example
//!
//! ```rust
//! use rs_sseg::config::DigitCount;
//! use rs_sseg::render::TextRenderer;
//!
//! let digits = DigitCount::new(5).unwrap();
//! let frame = TextRenderer::render(b"12.5", 4, digits);
//!
//! assert_eq!(frame.len(), 5);
//! assert_eq!(frame.emitted(), 3);
//! assert!(frame[1].has_dot()); // '2' carries the dot
//! assert!(frame[3].is_blank());
//! ```

use core::ops::Index;

use heapless::Vec;

use crate::config::{DigitCount, MAX_DIGITS};
use crate::encoder::{classify, is_dot_marker};
use crate::patterns::{PatternTable, SegmentPattern};

/// Input buffer with an explicit length.
///
/// The length is independent of any terminator: zero bytes are data. A length
/// past the end of the buffer is clamped to the buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderRequest<'a> {
    buffer: &'a [u8],
    length: usize,
}

impl<'a> RenderRequest<'a> {
    /// Creates a request for the first `length` bytes of `buffer`.
    pub fn new(buffer: &'a [u8], length: usize) -> Self {
        Self {
            buffer,
            length: length.min(buffer.len()),
        }
    }

    /// Creates a request covering the whole buffer.
    pub fn whole(buffer: &'a [u8]) -> Self {
        Self::new(buffer, buffer.len())
    }

    /// The bytes that take part in rendering.
    #[inline]
    pub fn bytes(&self) -> &'a [u8] {
        &self.buffer[..self.length]
    }

    /// Effective length.
    #[inline]
    pub fn len(&self) -> usize {
        self.length
    }

    /// Returns true if nothing would be rendered from input.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }
}

/// Exactly N segment patterns, first-transmitted first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedFrame {
    patterns: Vec<SegmentPattern, MAX_DIGITS>,
    emitted: usize,
}

impl RenderedFrame {
    /// A frame of `digits` blank patterns.
    pub fn blank(digits: DigitCount) -> Self {
        let mut patterns = Vec::new();
        pad(&mut patterns, digits.get());
        Self {
            patterns,
            emitted: 0,
        }
    }

    /// Patterns in transmission order.
    #[inline]
    pub fn patterns(&self) -> &[SegmentPattern] {
        &self.patterns
    }

    /// Number of patterns (always the configured digit count).
    #[inline]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Always false; a frame has at least one digit.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Number of digits that came from input rather than padding.
    #[inline]
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    /// Iterates over the patterns in transmission order.
    pub fn iter(&self) -> impl Iterator<Item = SegmentPattern> + '_ {
        self.patterns.iter().copied()
    }

    /// Raw pattern bytes in transmission order.
    pub fn to_bytes(&self) -> Vec<u8, MAX_DIGITS> {
        self.patterns.iter().map(|p| p.bits()).collect()
    }
}

impl Index<usize> for RenderedFrame {
    type Output = SegmentPattern;

    fn index(&self, index: usize) -> &SegmentPattern {
        &self.patterns[index]
    }
}

impl<'a> IntoIterator for &'a RenderedFrame {
    type Item = &'a SegmentPattern;
    type IntoIter = core::slice::Iter<'a, SegmentPattern>;

    fn into_iter(self) -> Self::IntoIter {
        self.patterns.iter()
    }
}

fn pad(patterns: &mut Vec<SegmentPattern, MAX_DIGITS>, digits: usize) {
    while patterns.len() < digits {
        // DigitCount keeps `digits` within capacity
        let _ = patterns.push(SegmentPattern::BLANK);
    }
}

/// Renders byte buffers into digit frames.
pub struct TextRenderer;

impl TextRenderer {
    /// Render the first `length` bytes of `buffer` onto `digits` digits.
    pub fn render(buffer: &[u8], length: usize, digits: DigitCount) -> RenderedFrame {
        Self::render_request(RenderRequest::new(buffer, length), digits)
    }

    /// Render a [`RenderRequest`] onto `digits` digits.
    pub fn render_request(request: RenderRequest<'_>, digits: DigitCount) -> RenderedFrame {
        let n = digits.get();
        let mut patterns: Vec<SegmentPattern, MAX_DIGITS> = Vec::new();
        let mut include_dot = false;

        for &c in request.bytes().iter().rev() {
            if patterns.len() >= n {
                break;
            }

            if is_dot_marker(c) {
                include_dot = true;
                continue;
            }

            let Ok(class) = classify(c) else {
                continue;
            };

            let mut pattern = PatternTable::lookup(class);
            if include_dot {
                pattern = pattern.with_dot();
            }
            include_dot = false;
            let _ = patterns.push(pattern);
        }

        let emitted = patterns.len();
        pad(&mut patterns, n);

        RenderedFrame { patterns, emitted }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(digits: usize) -> DigitCount {
        DigitCount::new(digits).unwrap()
    }

    fn p(c: u8) -> SegmentPattern {
        PatternTable::lookup(classify(c).unwrap())
    }

    // =========================================================================
    // RenderRequest Tests
    // =========================================================================

    #[test]
    fn request_clamps_length_to_buffer() {
        let request = RenderRequest::new(b"abc", 10);
        assert_eq!(request.len(), 3);
        assert_eq!(request.bytes(), b"abc");
    }

    #[test]
    fn request_honours_shorter_length() {
        let request = RenderRequest::new(b"abcdef", 2);
        assert_eq!(request.bytes(), b"ab");
        assert!(!request.is_empty());
        assert!(RenderRequest::new(b"abc", 0).is_empty());
    }

    // =========================================================================
    // Rendering Tests
    // =========================================================================

    #[test]
    fn dot_merges_into_preceding_character() {
        let frame = TextRenderer::render(b"5.", 2, n(1));
        assert_eq!(frame.patterns(), &[p(b'5').with_dot()]);
    }

    #[test]
    fn unsupported_bytes_are_skipped() {
        let frame = TextRenderer::render(b"a!b", 3, n(2));
        assert_eq!(frame.patterns(), &[p(b'b'), p(b'a')]);
        assert_eq!(frame.emitted(), 2);
    }

    #[test]
    fn short_input_is_padded_at_the_end() {
        let frame = TextRenderer::render(b"7", 1, n(5));
        assert_eq!(
            frame.patterns(),
            &[
                p(b'7'),
                SegmentPattern::BLANK,
                SegmentPattern::BLANK,
                SegmentPattern::BLANK,
                SegmentPattern::BLANK
            ]
        );
        assert_eq!(frame.emitted(), 1);
    }

    #[test]
    fn empty_input_is_all_blank() {
        let frame = TextRenderer::render(b"", 0, n(5));
        assert_eq!(frame, RenderedFrame::blank(n(5)));
        assert!(frame.iter().all(SegmentPattern::is_blank));
    }

    #[test]
    fn long_input_keeps_trailing_digits() {
        let frame = TextRenderer::render(b"123456789", 9, n(3));
        assert_eq!(frame.patterns(), &[p(b'9'), p(b'8'), p(b'7')]);
    }

    #[test]
    fn dots_do_not_count_toward_the_window() {
        let frame = TextRenderer::render(b"1.2.3.", 6, n(3));
        assert_eq!(
            frame.patterns(),
            &[p(b'3').with_dot(), p(b'2').with_dot(), p(b'1').with_dot()]
        );
    }

    #[test]
    fn dot_carries_across_skipped_bytes() {
        // The dot after '!' lands on 'a', two bytes away.
        let frame = TextRenderer::render(b"a!.b", 4, n(2));
        assert_eq!(frame.patterns(), &[p(b'b'), p(b'a').with_dot()]);
    }

    #[test]
    fn repeated_dots_collapse_into_one() {
        let frame = TextRenderer::render(b"4..", 3, n(1));
        assert_eq!(frame.patterns(), &[p(b'4').with_dot()]);
    }

    #[test]
    fn leading_dot_without_character_is_dropped() {
        let frame = TextRenderer::render(b".8", 2, n(2));
        assert_eq!(frame.patterns(), &[p(b'8'), SegmentPattern::BLANK]);
    }

    #[test]
    fn colon_is_a_dot_marker() {
        let frame = TextRenderer::render(b"12:34", 5, n(4));
        assert_eq!(
            frame.patterns(),
            &[p(b'4'), p(b'3'), p(b'2').with_dot(), p(b'1')]
        );
    }

    #[test]
    fn boot_text_lights_every_decimal_point() {
        let frame = TextRenderer::render(b" . . . . .", 10, n(5));
        assert!(frame.iter().all(|pattern| pattern == SegmentPattern::DOT));
        assert_eq!(frame.emitted(), 5);
    }

    #[test]
    fn zero_bytes_are_data_not_terminators() {
        // The NUL is unsupported and skipped, the scan continues past it.
        let frame = TextRenderer::render(b"1\x002", 3, n(3));
        assert_eq!(frame.patterns(), &[p(b'2'), p(b'1'), SegmentPattern::BLANK]);
    }

    #[test]
    fn length_limits_the_scan() {
        let frame = TextRenderer::render(b"12345", 2, n(2));
        assert_eq!(frame.patterns(), &[p(b'2'), p(b'1')]);
    }

    #[test]
    fn glyph_bytes_render() {
        let frame = TextRenderer::render(&[0x80, 0x89], 2, n(2));
        assert_eq!(frame.to_bytes().as_slice(), &[0x40, 0xC8]);
    }

    #[test]
    fn frame_indexing_and_iteration() {
        let frame = TextRenderer::render(b"ab", 2, n(2));
        assert_eq!(frame[0], p(b'b'));
        let collected: std::vec::Vec<_> = (&frame).into_iter().copied().collect();
        assert_eq!(collected, vec![p(b'b'), p(b'a')]);
    }

    #[test]
    fn max_digit_count_fills_the_frame() {
        let frame = TextRenderer::render(b"x", 1, n(MAX_DIGITS));
        assert_eq!(frame.len(), MAX_DIGITS);
        assert!(!frame.is_empty());
    }
}
