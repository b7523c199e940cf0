//! Shared configuration system for desktop and ESP32.
//!
//! Uses `heapless::String` for `no_std` compatibility while remaining
//! ergonomic to use on desktop with `std`.
//!
//! All of this is startup-time configuration. Constructors take it by
//! reference and nothing in the crate mutates it afterwards.
//!
//! # Example
//!
//! ```rust
//! use rs_sseg::config::{Config, DisplayConfig, LinePins, MqttConfig, WebConfig};
//!
//! // Use defaults: 5 digits on DATA=9, CLOCK=8, STROBE=6, OE=4
//! let config = Config::default();
//! assert_eq!(config.display.digit_count, 5);
//!
//! // Or customize
//! let config = Config::default()
//!     .with_display(DisplayConfig::default().with_digit_count(8))
//!     .with_mqtt(MqttConfig::default().with_host("192.168.1.100"))
//!     .with_web(WebConfig::default().with_port(3000));
//! assert_eq!(config.display.max_write_len(), 16);
//! ```

use heapless::String as HString;

use crate::traits::Line;

/// Largest supported digit count.
pub const MAX_DIGITS: usize = 64;

/// Default digit count.
pub const DEFAULT_DIGITS: usize = 5;

/// Largest write any digit count accepts.
pub const MAX_WRITE_LEN: usize = 2 * MAX_DIGITS;

/// Maximum length for short config strings (hostnames, client IDs)
pub const MAX_SHORT_STRING: usize = 64;

/// Maximum length for longer config strings (boot text, topic prefixes)
pub const MAX_LONG_STRING: usize = 128;

/// Type alias for short config strings
pub type ShortString = HString<MAX_SHORT_STRING>;

/// Type alias for longer config strings
pub type LongString = HString<MAX_LONG_STRING>;

// ============================================================================
// Helper for creating heapless strings
// ============================================================================

fn utf8_prefix(s: &str, max: usize) -> &str {
    let take = s.len().min(max);
    let valid_end = s
        .char_indices()
        .take_while(|(i, _)| *i < take)
        .map(|(i, c)| i + c.len_utf8())
        .take_while(|end| *end <= take)
        .last()
        .unwrap_or(0);
    &s[..valid_end]
}

/// Create a ShortString from a &str, truncating if too long
pub fn short_string(s: &str) -> ShortString {
    let mut hs = ShortString::new();
    let _ = hs.push_str(utf8_prefix(s, MAX_SHORT_STRING));
    hs
}

/// Create a LongString from a &str, truncating if too long
pub fn long_string(s: &str) -> LongString {
    let mut hs = LongString::new();
    let _ = hs.push_str(utf8_prefix(s, MAX_LONG_STRING));
    hs
}

// ============================================================================
// Errors
// ============================================================================

/// Display configuration errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Digit count outside `1..=MAX_DIGITS`.
    DigitCount(usize),
    /// A line has a negative pin number.
    InvalidPin {
        /// The line.
        line: Line,
        /// The rejected pin number.
        pin: i32,
    },
    /// Two lines share the same pin.
    DuplicatePin {
        /// The first line using the pin.
        first: Line,
        /// The second line using the pin.
        second: Line,
        /// The shared pin number.
        pin: i32,
    },
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::DigitCount(n) => {
                write!(f, "digit count {} outside 1..={}", n, MAX_DIGITS)
            }
            ConfigError::InvalidPin { line, pin } => {
                write!(f, "{} has invalid pin {}", line, pin)
            }
            ConfigError::DuplicatePin { first, second, pin } => {
                write!(f, "{} and {} both use pin {}", first, second, pin)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

// ============================================================================
// Digit Count
// ============================================================================

/// Validated number of digits, `1..=MAX_DIGITS`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DigitCount(usize);

impl DigitCount {
    /// Returns `None` for 0 or anything above [`MAX_DIGITS`].
    pub const fn new(n: usize) -> Option<Self> {
        if n >= 1 && n <= MAX_DIGITS {
            Some(Self(n))
        } else {
            None
        }
    }

    /// The digit count.
    #[inline]
    pub const fn get(self) -> usize {
        self.0
    }

    /// Number of bits shifted per frame.
    #[inline]
    pub const fn frame_bits(self) -> usize {
        self.0 * 8
    }

    /// Largest write the device accepts, twice the digit count.
    #[inline]
    pub const fn max_write_len(self) -> usize {
        self.0 * 2
    }
}

impl Default for DigitCount {
    fn default() -> Self {
        Self(DEFAULT_DIGITS)
    }
}

impl TryFrom<usize> for DigitCount {
    type Error = ConfigError;

    fn try_from(n: usize) -> Result<Self, ConfigError> {
        Self::new(n).ok_or(ConfigError::DigitCount(n))
    }
}

// ============================================================================
// Main Config
// ============================================================================

/// Complete application configuration
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    /// Display hardware configuration
    pub display: DisplayConfig,
    /// MQTT client configuration
    pub mqtt: MqttConfig,
    /// Web server configuration
    pub web: WebConfig,
}

impl Config {
    /// Set display configuration
    pub fn with_display(mut self, display: DisplayConfig) -> Self {
        self.display = display;
        self
    }

    /// Set MQTT configuration
    pub fn with_mqtt(mut self, mqtt: MqttConfig) -> Self {
        self.mqtt = mqtt;
        self
    }

    /// Set web configuration
    pub fn with_web(mut self, web: WebConfig) -> Self {
        self.web = web;
        self
    }
}

// ============================================================================
// Display Config
// ============================================================================

/// Platform pin numbers of the four control lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinePins {
    /// Serial data pin
    pub data: i32,
    /// Shift clock pin
    pub clock: i32,
    /// Latch strobe pin
    pub strobe: i32,
    /// Output enable pin
    pub output_enable: i32,
}

impl Default for LinePins {
    fn default() -> Self {
        Self {
            data: 9,
            clock: 8,
            strobe: 6,
            output_enable: 4,
        }
    }
}

impl LinePins {
    /// Pin number of `line`.
    pub const fn pin(&self, line: Line) -> i32 {
        match line {
            Line::Data => self.data,
            Line::Clock => self.clock,
            Line::Strobe => self.strobe,
            Line::OutputEnable => self.output_enable,
        }
    }

    /// Set the pin of one line.
    pub fn with_pin(mut self, line: Line, pin: i32) -> Self {
        match line {
            Line::Data => self.data = pin,
            Line::Clock => self.clock = pin,
            Line::Strobe => self.strobe = pin,
            Line::OutputEnable => self.output_enable = pin,
        }
        self
    }

    /// Checks that every pin is non-negative and no two lines share one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for line in Line::ALL {
            let pin = self.pin(line);
            if pin < 0 {
                return Err(ConfigError::InvalidPin { line, pin });
            }
        }
        for (i, first) in Line::ALL.iter().enumerate() {
            for second in &Line::ALL[i + 1..] {
                let pin = self.pin(*first);
                if pin == self.pin(*second) {
                    return Err(ConfigError::DuplicatePin {
                        first: *first,
                        second: *second,
                        pin,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Display hardware configuration
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DisplayConfig {
    /// Number of digits in the shift-register chain
    pub digit_count: usize,
    /// Control line pins
    pub pins: LinePins,
    /// Level OUTPUT_ENABLE is driven to at bring-up
    pub output_enable_level: bool,
    /// Text shown once the lines are up
    pub boot_text: LongString,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            digit_count: DEFAULT_DIGITS,
            pins: LinePins::default(),
            output_enable_level: true,
            boot_text: long_string(" . . . . ."),
        }
    }
}

impl DisplayConfig {
    /// Set the digit count
    pub fn with_digit_count(mut self, n: usize) -> Self {
        self.digit_count = n;
        self
    }

    /// Set the line pins
    pub fn with_pins(mut self, pins: LinePins) -> Self {
        self.pins = pins;
        self
    }

    /// Set the OUTPUT_ENABLE bring-up level
    pub fn with_output_enable_level(mut self, high: bool) -> Self {
        self.output_enable_level = high;
        self
    }

    /// Set the boot text
    pub fn with_boot_text(mut self, text: &str) -> Self {
        self.boot_text = long_string(text);
        self
    }

    /// Validate digit count and pins.
    pub fn validate(&self) -> Result<DigitCount, ConfigError> {
        let digits = DigitCount::try_from(self.digit_count)?;
        self.pins.validate()?;
        Ok(digits)
    }

    /// Largest write accepted by the device (twice the digit count).
    pub fn max_write_len(&self) -> usize {
        self.digit_count * 2
    }
}

// ============================================================================
// MQTT Config
// ============================================================================

/// MQTT client configuration
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MqttConfig {
    /// Broker hostname or IP
    pub host: ShortString,
    /// Broker port
    pub port: u16,
    /// Username (empty for anonymous)
    pub username: ShortString,
    /// Password
    pub password: ShortString,
    /// Client ID (should be unique per device)
    pub client_id: ShortString,
    /// Topic prefix for all pub/sub (e.g., "sseg" -> "sseg/text/set")
    pub topic_prefix: ShortString,
    /// Heartbeat/state publish interval in milliseconds
    pub heartbeat_ms: u32,
    /// Keep-alive interval in seconds
    pub keep_alive_secs: u16,
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            host: short_string("localhost"),
            port: 1883,
            username: ShortString::new(),
            password: ShortString::new(),
            client_id: short_string("rs-sseg"),
            topic_prefix: short_string("sseg"),
            heartbeat_ms: 5000,
            keep_alive_secs: 30,
        }
    }
}

impl MqttConfig {
    /// Set the broker host
    pub fn with_host(mut self, host: &str) -> Self {
        self.host = short_string(host);
        self
    }

    /// Set the broker port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set broker credentials
    pub fn with_credentials(mut self, username: &str, password: &str) -> Self {
        self.username = short_string(username);
        self.password = short_string(password);
        self
    }

    /// Set the client ID
    pub fn with_client_id(mut self, id: &str) -> Self {
        self.client_id = short_string(id);
        self
    }

    /// Set the topic prefix
    pub fn with_topic_prefix(mut self, prefix: &str) -> Self {
        self.topic_prefix = short_string(prefix);
        self
    }

    /// Set the heartbeat interval
    pub fn with_heartbeat_ms(mut self, ms: u32) -> Self {
        self.heartbeat_ms = ms;
        self
    }

    /// Build a topic string with the configured prefix
    pub fn topic(&self, suffix: &str) -> LongString {
        let mut topic = LongString::new();
        let _ = topic.push_str(self.topic_prefix.as_str());
        let _ = topic.push('/');
        let _ = topic.push_str(suffix);
        topic
    }
}

// ============================================================================
// Web Config
// ============================================================================

/// Web server configuration
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WebConfig {
    /// Port to listen on
    pub port: u16,
    /// Whether to enable CORS for all origins
    pub cors_permissive: bool,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            cors_permissive: true,
        }
    }
}

impl WebConfig {
    /// Set the port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set CORS mode
    pub fn with_cors(mut self, permissive: bool) -> Self {
        self.cors_permissive = permissive;
        self
    }
}

// ============================================================================
// Tests
// ============================================================================
