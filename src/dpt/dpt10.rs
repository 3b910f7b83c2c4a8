//! DPT 10.001 - Time of Day (3 bytes)
//!
//! ```text
//! Byte 0: DDDH HHHH   day of week (0 = no day, 1 = Monday .. 7 = Sunday), hour
//! Byte 1: 00MM MMMM   minute
//! Byte 2: 00SS SSSS   second
//! ```

use crate::dpt::{ensure_capacity, ensure_length, DptDecode, DptEncode};
use crate::error::Result;

/// Time of day with optional weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeOfDay {
    /// 0 = no day, 1 = Monday .. 7 = Sunday
    pub day_of_week: u8,
    /// 0-23
    pub hour: u8,
    /// 0-59
    pub minute: u8,
    /// 0-59
    pub second: u8,
}

impl TimeOfDay {
    /// Build a time of day. Fields are clamped on encode, not here.
    pub const fn new(day_of_week: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            day_of_week,
            hour,
            minute,
            second,
        }
    }
}

/// DPT 10.xxx time types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Dpt10 {
    /// DPT 10.001 - Time of day
    TimeOfDay,
}

impl Dpt10 {
    /// Get the DPT identifier string
    pub const fn identifier(&self) -> &'static str {
        "10.001"
    }

    /// Encode to 3 bytes. Hour clamps to 23, minute and second to 59.
    pub fn encode_to_bytes(&self, time: TimeOfDay) -> [u8; 3] {
        let dow = time.day_of_week & 0x07;
        [
            (dow << 5) | time.hour.min(23),
            time.minute.min(59),
            time.second.min(59),
        ]
    }
}

impl DptEncode<TimeOfDay> for Dpt10 {
    fn encode(&self, value: TimeOfDay, buf: &mut [u8]) -> Result<usize> {
        ensure_capacity(buf, 3)?;
        buf[..3].copy_from_slice(&self.encode_to_bytes(value));
        Ok(3)
    }
}

impl DptDecode<TimeOfDay> for Dpt10 {
    /// Out-of-range fields decode as 0.
    fn decode(&self, data: &[u8]) -> Result<TimeOfDay> {
        ensure_length(data, 3)?;
        let hour = data[0] & 0x1F;
        let minute = data[1] & 0x3F;
        let second = data[2] & 0x3F;
        Ok(TimeOfDay {
            day_of_week: (data[0] >> 5) & 0x07,
            hour: if hour > 23 { 0 } else { hour },
            minute: if minute > 59 { 0 } else { minute },
            second: if second > 59 { 0 } else { second },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode() {
        // Wednesday 12:30:05
        let bytes = Dpt10::TimeOfDay.encode_to_bytes(TimeOfDay::new(3, 12, 30, 5));
        assert_eq!(bytes, [0x6C, 30, 5]);
    }

    #[test]
    fn test_encode_clamps() {
        let bytes = Dpt10::TimeOfDay.encode_to_bytes(TimeOfDay::new(0, 30, 75, 60));
        assert_eq!(bytes, [23, 59, 59]);
    }

    #[test]
    fn test_decode() {
        let time = Dpt10::TimeOfDay.decode(&[0x6C, 30, 5]).unwrap();
        assert_eq!(time, TimeOfDay::new(3, 12, 30, 5));
    }

    #[test]
    fn test_decode_defaults_out_of_range() {
        let time = Dpt10::TimeOfDay.decode(&[0x1F, 0x3F, 0x3C]).unwrap();
        assert_eq!(time, TimeOfDay::new(0, 0, 0, 0));
    }

    #[test]
    fn test_decode_short() {
        assert!(Dpt10::TimeOfDay.decode(&[0x6C, 30]).unwrap_err().is_decode_error());
    }
}
