//! DPT 11.001 - Date (3 bytes)
//!
//! Day (1-31), month (1-12) and a two-digit year. Year bytes below 90 map
//! to 2000-2089, the rest to 1990-1999.

use crate::dpt::{ensure_capacity, ensure_length, DptDecode, DptEncode};
use crate::error::Result;

/// Calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Date {
    /// 1-31
    pub day: u8,
    /// 1-12
    pub month: u8,
    /// 1990-2089
    pub year: u16,
}

impl Date {
    /// Build a date.
    pub const fn new(day: u8, month: u8, year: u16) -> Self {
        Self { day, month, year }
    }
}

impl Default for Date {
    fn default() -> Self {
        Self::new(1, 1, 2000)
    }
}

/// DPT 11.xxx date types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Dpt11 {
    /// DPT 11.001 - Date
    Date,
}

impl Dpt11 {
    /// Get the DPT identifier string
    pub const fn identifier(&self) -> &'static str {
        "11.001"
    }

    /// Encode to 3 bytes. Day and month clamp into range; a year outside
    /// 1990-2089 encodes as 2000.
    pub fn encode_to_bytes(&self, date: Date) -> [u8; 3] {
        let year_byte = match date.year {
            2000..=2089 => (date.year - 2000) as u8,
            1990..=1999 => (date.year - 1900) as u8,
            _ => 0,
        };
        [date.day.clamp(1, 31), date.month.clamp(1, 12), year_byte]
    }
}

impl DptEncode<Date> for Dpt11 {
    fn encode(&self, value: Date, buf: &mut [u8]) -> Result<usize> {
        ensure_capacity(buf, 3)?;
        buf[..3].copy_from_slice(&self.encode_to_bytes(value));
        Ok(3)
    }
}

impl DptDecode<Date> for Dpt11 {
    fn decode(&self, data: &[u8]) -> Result<Date> {
        ensure_length(data, 3)?;
        let day = data[0] & 0x1F;
        let month = data[1] & 0x0F;
        let year_byte = data[2] & 0x7F;
        Ok(Date {
            day: if (1..=31).contains(&day) { day } else { 1 },
            month: if (1..=12).contains(&month) { month } else { 1 },
            year: if year_byte < 90 {
                2000 + u16::from(year_byte)
            } else {
                1900 + u16::from(year_byte)
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode() {
        assert_eq!(Dpt11::Date.encode_to_bytes(Date::new(14, 10, 2026)), [14, 10, 26]);
        assert_eq!(Dpt11::Date.encode_to_bytes(Date::new(31, 12, 1995)), [31, 12, 95]);
    }

    #[test]
    fn test_encode_clamps() {
        assert_eq!(Dpt11::Date.encode_to_bytes(Date::new(0, 13, 2100)), [1, 12, 0]);
    }

    #[test]
    fn test_decode_century() {
        assert_eq!(Dpt11::Date.decode(&[1, 2, 89]).unwrap().year, 2089);
        assert_eq!(Dpt11::Date.decode(&[1, 2, 90]).unwrap().year, 1990);
    }

    #[test]
    fn test_decode_defaults() {
        assert_eq!(Dpt11::Date.decode(&[0, 0, 0]).unwrap(), Date::default());
    }

    #[test]
    fn test_decode_short() {
        assert!(Dpt11::Date.decode(&[]).is_err());
    }
}
