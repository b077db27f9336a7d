//! Hexadecimal color strings
//!
//! Parses `rgb`, `argb`, `rrggbb` and `aarrggbb` notations (optionally prefixed
//! with `0x` or `#`) into a 32-bit ARGB value. Note that the alpha channel is
//! the highest byte, unlike CSS where it comes last.

use std::error::Error;
use std::fmt;

/// 32-bit color, laid out as alpha, red, green, blue from the most to the
/// least significant byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Argb(pub u32);

impl Argb {
    pub const OPAQUE_WHITE: Argb = Argb(0xffff_ffff);

    pub fn get(&self) -> u32 {
        self.0
    }

    pub fn alpha(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub fn red(&self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub fn green(&self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub fn blue(&self) -> u8 {
        self.0 as u8
    }
}

impl Default for Argb {
    fn default() -> Self {
        Argb::OPAQUE_WHITE
    }
}

impl fmt::Display for Argb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:08x}", self.0)
    }
}

/// Color parse failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    /// Digit count (after prefix removal) is not 3, 4, 6 or 8
    InvalidLength(usize),
    /// Digits contain something other than `0-9a-f`
    InvalidDigit(String),
    /// Digits do not fit the bit width of the notation
    OutOfRange(String),
}

impl fmt::Display for ColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorError::InvalidLength(len) => write!(f, "invalid length: {}", len),
            ColorError::InvalidDigit(digits) => {
                write!(f, "invalid hexadecimal digits: {:?}", digits)
            }
            ColorError::OutOfRange(digits) => write!(f, "value out of range: {:?}", digits),
        }
    }
}

impl Error for ColorError {}

/// Expand a 16-bit short color (one nibble per channel) to 32 bits by
/// duplicating each nibble.
///
/// For example:
/// - `0x0fff` -> `0x00ffffff`
/// - `0xffff` -> `0xffffffff`
/// - `0x0abc` -> `0x00aabbcc`
/// - `0x10e2` -> `0x1100ee22`
pub fn expand_short_color(short: u16) -> u32 {
    let n = short as u32;
    (n << 16 & 0xf000_0000)
        | (n << 12 & 0x0ff0_0000)
        | (n << 8 & 0x000f_f000)
        | (n << 4 & 0x0000_0ff0)
        | (n & 0x0000_000f)
}

/// Parse a color string, returning the expanded value together with any
/// digit error.
///
/// The value is always computed, even when the digits are bad: a syntax
/// error yields the expansion of zero, an out-of-range error the expansion
/// of the bit-width maximum. Callers must check the error before trusting
/// the value. A length mismatch yields `0`.
pub fn parse_color_lossy(s: &str) -> (u32, Option<ColorError>) {
    let lower = s.to_ascii_lowercase();
    let stripped = lower.strip_prefix("0x").unwrap_or(&lower);
    let digits = stripped.strip_prefix('#').unwrap_or(stripped);

    match digits.len() {
        3 => {
            let (value, err) = parse_hex(digits, 12);
            (expand_short_color(0xf000 | (value & 0x0fff) as u16), err)
        }
        4 => {
            let (value, err) = parse_hex(digits, 16);
            (expand_short_color((value & 0xffff) as u16), err)
        }
        6 => {
            let (value, err) = parse_hex(digits, 24);
            (0xff00_0000 | value, err)
        }
        8 => parse_hex(digits, 32),
        len => (0, Some(ColorError::InvalidLength(len))),
    }
}

/// Parse a color string into an ARGB value.
pub fn parse_color(s: &str) -> Result<Argb, ColorError> {
    match parse_color_lossy(s) {
        (_, Some(err)) => Err(err),
        (value, None) => Ok(Argb(value)),
    }
}

/// Unsigned base-16 parse limited to `bits`.
fn parse_hex(digits: &str, bits: u32) -> (u32, Option<ColorError>) {
    // from_str_radix accepts a leading '+', the protocol notation does not
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return (0, Some(ColorError::InvalidDigit(digits.to_string())));
    }

    let max = ((1u64 << bits) - 1) as u32;
    match u64::from_str_radix(digits, 16) {
        Ok(value) if value <= max as u64 => (value as u32, None),
        Ok(_) | Err(_) => (max, Some(ColorError::OutOfRange(digits.to_string()))),
    }
}
