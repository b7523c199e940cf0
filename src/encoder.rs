//! Byte classification for the pattern table.
//!
//! [`classify`] maps one input byte to a [`CharClass`]. Decimal-point markers
//! (`.` and `:`) are not character classes; the renderer detects them with
//! [`is_dot_marker`] before classifying anything else.
//!
//! Classification order, first match wins:
//!
//! | Input | Class index |
//! |-------|-------------|
//! | `0`..=`9` | `c - '0'` |
//! | `a`..=`z` | `c - 'a' + 10` |
//! | `A`..=`Z` | `c - 'A' + 10` |
//! | whitespace (space, `\t`, `\n`, `\v`, `\f`, `\r`) | 36 |
//! | `0x80`..=`0x89` | `37 + (c - 0x80)` |
//! | anything else | [`Unsupported`] |
//!
//! # Example
//!
//! ```rust
//! use rs_sseg::encoder::{classify, is_dot_marker, Unsupported};
//!
//! assert_eq!(classify(b'7').unwrap().index(), 7);
//! assert_eq!(classify(b'q').unwrap().index(), 26);
//! assert_eq!(classify(0x80).unwrap().index(), 37);
//! assert_eq!(classify(b'!'), Err(Unsupported(b'!')));
//! assert!(is_dot_marker(b':'));
//! ```

use crate::patterns::{CharClass, GLYPH_BASE};

/// Number of extended glyph bytes starting at `0x80`.
const GLYPH_COUNT: u8 = 10;

/// A byte with no character class.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Unsupported(pub u8);

impl core::fmt::Display for Unsupported {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "unsupported byte 0x{:02X}", self.0)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Unsupported {}

/// Returns true for bytes that light the decimal point of a neighbouring digit.
#[inline]
pub const fn is_dot_marker(c: u8) -> bool {
    matches!(c, b'.' | b':')
}

/// Whitespace as the C locale defines it, including vertical tab.
#[inline]
const fn is_space(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\n' | 0x0B | 0x0C | b'\r')
}

/// Classify one input byte.
pub fn classify(c: u8) -> Result<CharClass, Unsupported> {
    let class = match c {
        b'0'..=b'9' => CharClass::digit(c - b'0'),
        b'a'..=b'z' | b'A'..=b'Z' => CharClass::letter(c),
        _ if is_space(c) => Some(CharClass::BLANK),
        _ if c.wrapping_sub(GLYPH_BASE) < GLYPH_COUNT => {
            CharClass::from_index(37 + (c - GLYPH_BASE) as usize)
        }
        _ => None,
    };
    class.ok_or(Unsupported(c))
}
