//! Raw-byte helpers shared by the field decoders: big-endian integers,
//! affine scaling with sentinels, midpoint-signed values, BCD, masked
//! enumerations and fixed-length text.

use std::borrow::Cow;

use crate::record::{Fixed, Value};

/// Affine transform `raw * mul / div + offset`, kept in fixed point with
/// `places` decimals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scale {
    mul: i64,
    div: i64,
    offset: i64,
    places: u8,
}

impl Scale {
    pub const fn new(mul: i64, div: i64, offset: i64, places: u8) -> Self {
        Self {
            mul,
            div,
            offset,
            places,
        }
    }

    pub fn apply(self, raw: u32) -> Fixed {
        let unit = 10i64.pow(self.places as u32);
        let scaled = (raw as i64) * self.mul * unit / self.div + self.offset * unit;
        Fixed::new(scaled, self.places)
    }

    /// Like [`Scale::apply`], but `sentinel` maps to [`Value::NotApplicable`].
    pub fn apply_or_na(self, raw: u32, sentinel: u32) -> Value {
        if raw == sentinel {
            Value::NotApplicable
        } else {
            Value::Fixed(self.apply(raw))
        }
    }
}

/// °C as `raw - 40`.
pub const TEMP_OFFSET_40: Scale = Scale::new(1, 1, -40, 0);
/// °C as `raw / 2 - 40`.
pub const TEMP_HALF_OFFSET_40: Scale = Scale::new(1, 2, -40, 1);
/// km/h as `raw / 100`.
pub const CENTI: Scale = Scale::new(1, 100, 0, 2);
/// `raw / 10`.
pub const DECI: Scale = Scale::new(1, 10, 0, 1);
/// `raw / 2`.
pub const HALF: Scale = Scale::new(1, 2, 0, 1);

pub fn u16_be(data: &[u8], at: usize) -> u16 {
    u16::from_be_bytes([data[at], data[at + 1]])
}

pub fn u24_be(data: &[u8], at: usize) -> u32 {
    u32::from_be_bytes([0, data[at], data[at + 1], data[at + 2]])
}

/// Signed value stored as `raw - midpoint`.
pub fn from_midpoint(raw: u8, midpoint: u8) -> i16 {
    raw as i16 - midpoint as i16
}

/// Two BCD digits; `None` for the all-ones sentinel or a non-decimal nibble.
pub fn bcd(raw: u8) -> Option<u8> {
    let (hi, lo) = (raw >> 4, raw & 0x0F);
    if hi > 9 || lo > 9 {
        return None;
    }
    Some(hi * 10 + lo)
}

pub fn bit(byte: u8, mask: u8) -> bool {
    byte & mask != 0
}

/// Enumeration label for `raw`, falling back to `0x..` hex when the table has
/// no entry.
pub fn label_or_hex(raw: u32, lookup: impl Fn(u32) -> Option<&'static str>) -> Value {
    match lookup(raw) {
        Some(label) => Value::Label(Cow::Borrowed(label)),
        None => Value::Label(Cow::Owned(format!("0x{raw:02X}"))),
    }
}

/// Copy a byte range into a string, stopping at the first NUL.
///
/// Bytes outside printable ASCII map to their Latin-1 code point.
pub fn text(data: &[u8]) -> String {
    data.iter()
        .take_while(|&&b| b != 0)
        .map(|&b| b as char)
        .collect()
}

/// Same as [`text`] with trailing spaces removed.
pub fn trimmed_text(data: &[u8]) -> String {
    let mut s = text(data);
    s.truncate(s.trim_end().len());
    s
}
