//! Segment patterns and the character-class table.
//!
//! Every displayable character belongs to one of 47 classes. Each class maps
//! to exactly one [`SegmentPattern`] through the immutable [`PatternTable`].
//!
//! # Bit Layout
//!
//! ```text
//!  bit:   7    6    5    4    3    2    1    0
//!        cc   tl   tc   tr   bl   bc   br   dp
//!
//!          tc
//!        ┌────┐
//!     tl │ cc │ tr
//!        ├────┤
//!     bl │    │ br
//!        └────┘ . dp
//!          bc
//! ```
//!
//! # Example
//!
//! ```rust
//! use rs_sseg::patterns::{CharClass, PatternTable, SegmentPattern};
//!
//! let eight = PatternTable::lookup(CharClass::digit(8).unwrap());
//! assert_eq!(eight.bits(), 0xFE);
//! assert_eq!(eight.with_dot().bits(), 0xFF);
//! assert_eq!(PatternTable::lookup(CharClass::BLANK), SegmentPattern::BLANK);
//! ```

/// Number of character classes in the table.
pub const CLASS_COUNT: usize = 47;

/// First byte value of the extended glyph range (play, pause, stop, single segments).
pub const GLYPH_BASE: u8 = 0x80;

const BLANK_INDEX: u8 = 36;
const GLYPH_INDEX: u8 = 37;
const SEGMENT_INDEX: u8 = 40;

/// 8-bit segment pattern for one digit.
///
/// Bit 0 is the decimal point, bits 1..=7 drive the seven segments in the
/// wiring order shown in the [module docs](self).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SegmentPattern(u8);

impl SegmentPattern {
    /// All segments off.
    pub const BLANK: SegmentPattern = SegmentPattern(0x00);

    /// Decimal point only.
    pub const DOT: SegmentPattern = SegmentPattern(0x01);

    /// Wraps a raw pattern byte.
    #[inline]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// Returns the raw pattern byte.
    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Returns this pattern with the decimal point lit.
    #[inline]
    pub const fn with_dot(self) -> Self {
        Self(self.0 | Self::DOT.0)
    }

    /// Returns true if the decimal point is lit.
    #[inline]
    pub const fn has_dot(self) -> bool {
        self.0 & Self::DOT.0 != 0
    }

    /// Returns true if no segment and no dot is lit.
    #[inline]
    pub const fn is_blank(self) -> bool {
        self.0 == 0
    }
}

impl From<SegmentPattern> for u8 {
    fn from(pattern: SegmentPattern) -> u8 {
        pattern.0
    }
}

/// Animation glyphs addressed by bytes `0x80..=0x82`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Glyph {
    /// Play triangle (0x80).
    Play,
    /// Pause bars (0x81).
    Pause,
    /// Stop square (0x82).
    Stop,
}

impl Glyph {
    /// Input byte that selects this glyph.
    #[inline]
    pub const fn byte(self) -> u8 {
        GLYPH_BASE + self as u8
    }
}

/// Single-segment glyphs addressed by bytes `0x83..=0x89`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SingleSegment {
    /// Center segment (0x83).
    Center,
    /// Top segment (0x84).
    TopCenter,
    /// Upper right segment (0x85).
    TopRight,
    /// Lower right segment (0x86).
    BottomRight,
    /// Bottom segment (0x87).
    BottomCenter,
    /// Lower left segment (0x88).
    BottomLeft,
    /// Upper left segment (0x89).
    TopLeft,
}

impl SingleSegment {
    /// All single segments, in byte order.
    pub const ALL: [SingleSegment; 7] = [
        SingleSegment::Center,
        SingleSegment::TopCenter,
        SingleSegment::TopRight,
        SingleSegment::BottomRight,
        SingleSegment::BottomCenter,
        SingleSegment::BottomLeft,
        SingleSegment::TopLeft,
    ];

    /// Input byte that selects this segment.
    #[inline]
    pub const fn byte(self) -> u8 {
        GLYPH_BASE + (SEGMENT_INDEX - GLYPH_INDEX) + self as u8
    }
}

/// Tagged view of a [`CharClass`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharKind {
    /// Decimal digit, 0..=9.
    Digit(u8),
    /// Letter, as its uppercase ASCII byte.
    Letter(u8),
    /// Blank digit (any whitespace).
    Blank,
    /// Animation glyph.
    Glyph(Glyph),
    /// Single lit segment.
    Segment(SingleSegment),
}

/// Index of a character class in the [`PatternTable`].
///
/// The index is private and always in `0..CLASS_COUNT`, so
/// [`PatternTable::lookup`] cannot fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CharClass(u8);

impl CharClass {
    /// The blank class (index 36).
    pub const BLANK: CharClass = CharClass(BLANK_INDEX);

    /// Class of decimal digit `value` (0..=9).
    pub const fn digit(value: u8) -> Option<Self> {
        if value <= 9 {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Class of ASCII letter `c`, either case.
    pub const fn letter(c: u8) -> Option<Self> {
        match c {
            b'a'..=b'z' => Some(Self(c - b'a' + 10)),
            b'A'..=b'Z' => Some(Self(c - b'A' + 10)),
            _ => None,
        }
    }

    /// Class of an animation glyph.
    pub const fn glyph(glyph: Glyph) -> Self {
        Self(GLYPH_INDEX + glyph as u8)
    }

    /// Class of a single-segment glyph.
    pub const fn segment(segment: SingleSegment) -> Self {
        Self(SEGMENT_INDEX + segment as u8)
    }

    /// Class for a raw table index, if it is in range.
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < CLASS_COUNT {
            Some(Self(index as u8))
        } else {
            None
        }
    }

    /// Position of this class in the table.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Tagged view of this class.
    pub const fn kind(self) -> CharKind {
        match self.0 {
            0..=9 => CharKind::Digit(self.0),
            10..=35 => CharKind::Letter(b'A' + self.0 - 10),
            BLANK_INDEX => CharKind::Blank,
            37 => CharKind::Glyph(Glyph::Play),
            38 => CharKind::Glyph(Glyph::Pause),
            39 => CharKind::Glyph(Glyph::Stop),
            40 => CharKind::Segment(SingleSegment::Center),
            41 => CharKind::Segment(SingleSegment::TopCenter),
            42 => CharKind::Segment(SingleSegment::TopRight),
            43 => CharKind::Segment(SingleSegment::BottomRight),
            44 => CharKind::Segment(SingleSegment::BottomCenter),
            45 => CharKind::Segment(SingleSegment::BottomLeft),
            _ => CharKind::Segment(SingleSegment::TopLeft),
        }
    }
}

#[rustfmt::skip]
static PATTERNS: [u8; CLASS_COUNT] = [
    //      idx  class      cc tl tc tr bl bc br dp
    0x7E, //  0  '0'        0  1  1  1  1  1  1  0
    0x12, //  1  '1'        0  0  0  1  0  0  1  0
    0xBC, //  2  '2'        1  0  1  1  1  1  0  0
    0xB6, //  3  '3'        1  0  1  1  0  1  1  0
    0xD2, //  4  '4'        1  1  0  1  0  0  1  0
    0xE6, //  5  '5'        1  1  1  0  0  1  1  0
    0xEE, //  6  '6'        1  1  1  0  1  1  1  0
    0x32, //  7  '7'        0  0  1  1  0  0  1  0
    0xFE, //  8  '8'        1  1  1  1  1  1  1  0
    0xF6, //  9  '9'        1  1  1  1  0  1  1  0

    0xFA, // 10  A
    0xCE, // 11  b
    0x6C, // 12  C
    0x9E, // 13  d
    0xEC, // 14  E
    0xE8, // 15  F
    0x6E, // 16  G
    0xDA, // 17  H
    0x48, // 18  I
    0x1E, // 19  J
    0xEA, // 20  K
    0x4C, // 21  L
    0x7A, // 22  M
    0x8A, // 23  n
    0x8E, // 24  o
    0xF8, // 25  P
    0xF2, // 26  q
    0x88, // 27  r
    0xE6, // 28  S
    0xCC, // 29  t
    0x0E, // 30  u
    0x5E, // 31  V
    0xDE, // 32  W
    0xDA, // 33  X
    0xD2, // 34  Y
    0xBC, // 35  Z

    0x00, // 36  blank

    0xC8, // 37  play       0x80
    0x5A, // 38  pause      0x81
    0xF0, // 39  stop       0x82

    0x80, // 40  center     0x83
    0x20, // 41  top        0x84
    0x10, // 42  top right  0x85
    0x02, // 43  bot right  0x86
    0x04, // 44  bottom     0x87
    0x08, // 45  bot left   0x88
    0x40, // 46  top left   0x89
];

/// Immutable character-class to segment-pattern table.
pub struct PatternTable;

impl PatternTable {
    /// Pattern for `class`.
    #[inline]
    pub fn lookup(class: CharClass) -> SegmentPattern {
        SegmentPattern(PATTERNS[class.index()])
    }

    /// Pattern for a raw table index, if it is in range.
    #[inline]
    pub fn get(index: usize) -> Option<SegmentPattern> {
        PATTERNS.get(index).copied().map(SegmentPattern)
    }

    /// Number of entries.
    #[inline]
    pub const fn len() -> usize {
        CLASS_COUNT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // SegmentPattern Tests
    // =========================================================================

    #[test]
    fn blank_pattern_is_zero() {
        assert_eq!(SegmentPattern::BLANK.bits(), 0x00);
        assert!(SegmentPattern::BLANK.is_blank());
        assert!(!SegmentPattern::BLANK.has_dot());
    }

    #[test]
    fn with_dot_sets_bit_zero_only() {
        let seven = SegmentPattern::from_bits(0x32);
        assert_eq!(seven.with_dot().bits(), 0x33);
        assert!(seven.with_dot().has_dot());
        assert_eq!(seven.with_dot().with_dot(), seven.with_dot());
    }

    #[test]
    fn pattern_converts_to_u8() {
        let byte: u8 = SegmentPattern::from_bits(0xC8).into();
        assert_eq!(byte, 0xC8);
    }

    // =========================================================================
    // CharClass Tests
    // =========================================================================

    #[test]
    fn digit_classes() {
        for d in 0..=9u8 {
            assert_eq!(CharClass::digit(d).unwrap().index(), d as usize);
            assert_eq!(CharClass::digit(d).unwrap().kind(), CharKind::Digit(d));
        }
        assert!(CharClass::digit(10).is_none());
    }

    #[test]
    fn letter_classes_ignore_case() {
        assert_eq!(CharClass::letter(b'a'), CharClass::letter(b'A'));
        assert_eq!(CharClass::letter(b'z').unwrap().index(), 35);
        assert_eq!(CharClass::letter(b'H').unwrap().kind(), CharKind::Letter(b'H'));
        assert_eq!(CharClass::letter(b'h').unwrap().kind(), CharKind::Letter(b'H'));
        assert!(CharClass::letter(b'0').is_none());
        assert!(CharClass::letter(b'[').is_none());
    }

    #[test]
    fn glyph_and_segment_classes() {
        assert_eq!(CharClass::glyph(Glyph::Play).index(), 37);
        assert_eq!(CharClass::glyph(Glyph::Stop).index(), 39);
        assert_eq!(CharClass::segment(SingleSegment::Center).index(), 40);
        assert_eq!(CharClass::segment(SingleSegment::TopLeft).index(), 46);
        assert_eq!(
            CharClass::segment(SingleSegment::BottomLeft).kind(),
            CharKind::Segment(SingleSegment::BottomLeft)
        );
    }

    #[test]
    fn glyph_bytes() {
        assert_eq!(Glyph::Play.byte(), 0x80);
        assert_eq!(Glyph::Pause.byte(), 0x81);
        assert_eq!(Glyph::Stop.byte(), 0x82);
        assert_eq!(SingleSegment::Center.byte(), 0x83);
        assert_eq!(SingleSegment::TopLeft.byte(), 0x89);
    }

    #[test]
    fn from_index_round_trips_kind() {
        for index in 0..CLASS_COUNT {
            let class = CharClass::from_index(index).unwrap();
            assert_eq!(class.index(), index);
        }
        assert!(CharClass::from_index(CLASS_COUNT).is_none());
        assert_eq!(CharClass::from_index(36).unwrap().kind(), CharKind::Blank);
    }

    // =========================================================================
    // PatternTable Tests
    // =========================================================================

    #[test]
    fn table_has_47_entries() {
        assert_eq!(PatternTable::len(), 47);
        assert!(PatternTable::get(46).is_some());
        assert!(PatternTable::get(47).is_none());
    }

    #[test]
    fn table_values_match_wiring() {
        let digit = |d| PatternTable::lookup(CharClass::digit(d).unwrap()).bits();
        assert_eq!(digit(0), 0x7E);
        assert_eq!(digit(1), 0x12);
        assert_eq!(digit(8), 0xFE);
        assert_eq!(PatternTable::lookup(CharClass::letter(b'A').unwrap()).bits(), 0xFA);
        assert_eq!(PatternTable::lookup(CharClass::BLANK).bits(), 0x00);
        assert_eq!(PatternTable::lookup(CharClass::glyph(Glyph::Pause)).bits(), 0x5A);
    }

    #[test]
    fn single_segments_light_exactly_one_segment() {
        for segment in SingleSegment::ALL {
            let bits = PatternTable::lookup(CharClass::segment(segment)).bits();
            assert_eq!(bits.count_ones(), 1, "{:?}", segment);
            assert!(!SegmentPattern::from_bits(bits).has_dot());
        }
    }

    #[test]
    fn no_table_entry_lights_the_dot() {
        for index in 0..CLASS_COUNT {
            assert!(!PatternTable::get(index).unwrap().has_dot());
        }
    }

    #[test]
    fn eight_is_all_segments() {
        let all_segments = SingleSegment::ALL
            .iter()
            .fold(0u8, |acc, s| acc | PatternTable::lookup(CharClass::segment(*s)).bits());
        assert_eq!(all_segments, 0xFE);
    }
}
