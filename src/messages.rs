//! Shared message types for HTTP/MQTT communication.
//!
//! These types are `no_std` compatible and can be deserialized using either
//! `serde_json` (desktop) or `serde-json-core` (embedded).
//!
//! # Example
//!
//! ```
//! use rs_sseg::messages::SetTextRequest;
//!
//! // Desktop: using serde_json
//! #[cfg(feature = "std")]
//! {
//!     let json = r#"{"text": "12.34"}"#;
//!     let req: SetTextRequest = serde_json::from_str(json).unwrap();
//!     assert_eq!(req.payload(), b"12.34");
//! }
//! ```

use heapless::{String as HString, Vec as HVec};
use serde::{Deserialize, Serialize};

use crate::config::{LongString, MAX_DIGITS, MAX_WRITE_LEN};
use crate::render::RenderedFrame;

// ============================================================================
// Request Types
// ============================================================================

/// Request to show text on the display.
///
/// Exactly like a device write, the payload is truncated to twice the digit
/// count and trailing line endings are ignored. Use `bytes` for glyph codes
/// (0x80..=0x89) that have no UTF-8 spelling.
///
/// # JSON Examples
///
/// Plain text:
/// ```json
/// {"text": "12:34"}
/// ```
///
/// Raw bytes (play glyph, then "1"):
/// ```json
/// {"bytes": [128, 49]}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetTextRequest {
    /// Text to show
    #[serde(default)]
    pub text: Option<HString<MAX_WRITE_LEN>>,
    /// Raw bytes to show; wins over `text` when both are present
    #[serde(default)]
    pub bytes: Option<HVec<u8, MAX_WRITE_LEN>>,
}

impl SetTextRequest {
    /// Create a text request, truncated to [`MAX_WRITE_LEN`] bytes.
    pub fn text(text: &str) -> Self {
        let mut s = HString::new();
        for c in text.chars() {
            if s.push(c).is_err() {
                break;
            }
        }
        Self {
            text: Some(s),
            bytes: None,
        }
    }

    /// Create a raw byte request, truncated to [`MAX_WRITE_LEN`] bytes.
    pub fn bytes(bytes: &[u8]) -> Self {
        let mut v = HVec::new();
        let _ = v.extend_from_slice(&bytes[..bytes.len().min(MAX_WRITE_LEN)]);
        Self {
            text: None,
            bytes: Some(v),
        }
    }

    /// The bytes to write to the display.
    pub fn payload(&self) -> &[u8] {
        match (&self.bytes, &self.text) {
            (Some(bytes), _) => bytes.as_slice(),
            (None, Some(text)) => text.as_bytes(),
            (None, None) => &[],
        }
    }
}

// ============================================================================
// Response Types
// ============================================================================

/// Snapshot of what the display shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayState {
    /// Configured digit count
    pub digits: usize,
    /// Last written input, with non-printable bytes replaced by `?`
    pub text: LongString,
    /// Committed patterns in transmission order
    pub frame: HVec<u8, MAX_DIGITS>,
    /// Writes accepted since startup
    pub writes: u64,
}

impl DisplayState {
    /// Build a snapshot from the last input and committed frame.
    pub fn new(input: &[u8], frame: &RenderedFrame, writes: u64) -> Self {
        Self {
            digits: frame.len(),
            text: printable(input),
            frame: frame.to_bytes(),
            writes,
        }
    }
}

fn printable(input: &[u8]) -> LongString {
    let mut text = LongString::new();
    for &b in input {
        let c = if b.is_ascii_graphic() || b == b' ' {
            b as char
        } else {
            '?'
        };
        if text.push(c).is_err() {
            break;
        }
    }
    text
}

// ============================================================================
// Parsing Functions (using serde-json-core for no_std compatibility)
// ============================================================================

/// Parse a text request from JSON bytes.
///
/// Works in both `std` and `no_std` environments using `serde-json-core`.
///
/// # Example
///
/// ```
/// use rs_sseg::messages::parse_text_request;
///
/// let req = parse_text_request(br#"{"bytes": [128, 49]}"#).unwrap();
/// assert_eq!(req.payload(), &[0x80, b'1']);
/// ```
#[cfg(feature = "serde-json-core")]
pub fn parse_text_request(json: &[u8]) -> Option<SetTextRequest> {
    serde_json_core::from_slice(json).ok().map(|(req, _)| req)
}
