//! DPT 19.001 - Date and Time (8 bytes)
//!
//! ```text
//! Byte 0-1: year (1990-2089, big-endian)
//! Byte 2:   month (1-12)
//! Byte 3:   day (1-31)
//! Byte 4:   DDDH HHHH   day of week, hour
//! Byte 5:   minute
//! Byte 6:   second
//! Byte 7:   F WD NWD NY ND NDOW NT SUTI   flags
//! ```
//!
//! This is the payload of the periodic bus time broadcast.

use crate::dpt::{ensure_capacity, ensure_length, DptDecode, DptEncode};
use crate::error::Result;

const FLAG_FAULT: u8 = 0x80;
const FLAG_WORKING_DAY: u8 = 0x40;
const FLAG_NO_WORKING_DAY: u8 = 0x20;
const FLAG_NO_YEAR: u8 = 0x10;
const FLAG_NO_DATE: u8 = 0x08;
const FLAG_NO_DAY_OF_WEEK: u8 = 0x04;
const FLAG_NO_TIME: u8 = 0x02;
const FLAG_SUMMER_TIME: u8 = 0x01;

/// Date, time and quality flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DateTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    /// 0 = no day, 1 = Monday .. 7 = Sunday
    pub day_of_week: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    /// Clock fault
    pub fault: bool,
    pub working_day: bool,
    /// Working-day flag is not valid
    pub no_working_day: bool,
    pub no_year: bool,
    pub no_date: bool,
    pub no_day_of_week: bool,
    pub no_time: bool,
    /// Daylight saving time active
    pub summer_time: bool,
}

impl DateTime {
    /// Date and time without weekday information.
    pub const fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            year,
            month,
            day,
            day_of_week: 0,
            hour,
            minute,
            second,
            fault: false,
            working_day: false,
            no_working_day: true,
            no_year: false,
            no_date: false,
            no_day_of_week: true,
            no_time: false,
            summer_time: false,
        }
    }

    /// Set the weekday (1 = Monday .. 7 = Sunday) and derive the
    /// working-day flag from it.
    pub const fn with_day_of_week(mut self, day_of_week: u8) -> Self {
        self.day_of_week = day_of_week;
        self.no_day_of_week = day_of_week == 0;
        self.working_day = matches!(day_of_week, 1..=5);
        self.no_working_day = day_of_week == 0;
        self
    }

    fn flags(&self) -> u8 {
        [
            (self.fault, FLAG_FAULT),
            (self.working_day, FLAG_WORKING_DAY),
            (self.no_working_day, FLAG_NO_WORKING_DAY),
            (self.no_year, FLAG_NO_YEAR),
            (self.no_date, FLAG_NO_DATE),
            (self.no_day_of_week, FLAG_NO_DAY_OF_WEEK),
            (self.no_time, FLAG_NO_TIME),
            (self.summer_time, FLAG_SUMMER_TIME),
        ]
        .iter()
        .filter(|(set, _)| *set)
        .fold(0, |acc, (_, bit)| acc | bit)
    }
}

impl Default for DateTime {
    fn default() -> Self {
        Self::new(2000, 1, 1, 0, 0, 0)
    }
}

/// DPT 19.xxx date-time types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Dpt19 {
    /// DPT 19.001 - Date and time
    DateTime,
}

impl Dpt19 {
    /// Get the DPT identifier string
    pub const fn identifier(&self) -> &'static str {
        "19.001"
    }

    /// Encode to 8 bytes, clamping every field to its legal range.
    pub fn encode_to_bytes(&self, dt: DateTime) -> [u8; 8] {
        let year = dt.year.clamp(1990, 2089).to_be_bytes();
        [
            year[0],
            year[1],
            dt.month.clamp(1, 12),
            dt.day.clamp(1, 31),
            ((dt.day_of_week & 0x07) << 5) | dt.hour.min(23),
            dt.minute.min(59),
            dt.second.min(59),
            dt.flags(),
        ]
    }
}

impl DptEncode<DateTime> for Dpt19 {
    fn encode(&self, value: DateTime, buf: &mut [u8]) -> Result<usize> {
        ensure_capacity(buf, 8)?;
        buf[..8].copy_from_slice(&self.encode_to_bytes(value));
        Ok(8)
    }
}

impl DptDecode<DateTime> for Dpt19 {
    /// Fewer than 8 bytes is a decode error. Out-of-range fields are
    /// replaced by the defaults of 2000-01-01 00:00:00.
    fn decode(&self, data: &[u8]) -> Result<DateTime> {
        ensure_length(data, 8)?;
        let year = u16::from_be_bytes([data[0], data[1]]);
        let hour = data[4] & 0x1F;
        let flags = data[7];
        Ok(DateTime {
            year: if (1990..=2089).contains(&year) { year } else { 2000 },
            month: if (1..=12).contains(&data[2]) { data[2] } else { 1 },
            day: if (1..=31).contains(&data[3]) { data[3] } else { 1 },
            day_of_week: (data[4] >> 5) & 0x07,
            hour: if hour > 23 { 0 } else { hour },
            minute: if data[5] > 59 { 0 } else { data[5] },
            second: if data[6] > 59 { 0 } else { data[6] },
            fault: flags & FLAG_FAULT != 0,
            working_day: flags & FLAG_WORKING_DAY != 0,
            no_working_day: flags & FLAG_NO_WORKING_DAY != 0,
            no_year: flags & FLAG_NO_YEAR != 0,
            no_date: flags & FLAG_NO_DATE != 0,
            no_day_of_week: flags & FLAG_NO_DAY_OF_WEEK != 0,
            no_time: flags & FLAG_NO_TIME != 0,
            summer_time: flags & FLAG_SUMMER_TIME != 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_layout() {
        let dt = DateTime::new(2026, 10, 14, 8, 15, 30).with_day_of_week(3);
        let bytes = Dpt19::DateTime.encode_to_bytes(dt);
        assert_eq!(bytes, [0x07, 0xEA, 10, 14, 0x68, 15, 30, FLAG_WORKING_DAY]);
    }

    #[test]
    fn test_encode_clamps() {
        let mut dt = DateTime::new(1980, 0, 40, 25, 61, 99);
        dt.summer_time = true;
        let bytes = Dpt19::DateTime.encode_to_bytes(dt);
        assert_eq!(&bytes[..7], &[0x07, 0xC6, 1, 31, 23, 59, 59]);
        assert_eq!(bytes[7], FLAG_NO_WORKING_DAY | FLAG_NO_DAY_OF_WEEK | FLAG_SUMMER_TIME);
    }

    #[test]
    fn test_round_trip() {
        let mut dt = DateTime::new(2031, 2, 28, 23, 59, 0).with_day_of_week(7);
        dt.summer_time = true;
        dt.fault = true;
        let bytes = Dpt19::DateTime.encode_to_bytes(dt);
        assert_eq!(Dpt19::DateTime.decode(&bytes).unwrap(), dt);
    }

    #[test]
    fn test_decode_defaults() {
        let dt = Dpt19::DateTime
            .decode(&[0xFF, 0xFF, 13, 0, 0x1F, 60, 60, 0])
            .unwrap();
        assert_eq!((dt.year, dt.month, dt.day), (2000, 1, 1));
        assert_eq!((dt.hour, dt.minute, dt.second), (0, 0, 0));
    }

    #[test]
    fn test_decode_short() {
        assert!(Dpt19::DateTime.decode(&[0u8; 7]).unwrap_err().is_decode_error());
    }
}
