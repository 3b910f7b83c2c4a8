//! DPT 9.xxx - 2-byte Float (16-bit floating point)
//!
//! 2-byte floating point datapoint types represent values using a custom
//! 16-bit format with 1 sign bit, 4 exponent bits, and 11 mantissa bits.
//!
//! ## Format
//!
//! ```text
//! Byte 0: SEEE EMMM
//! Byte 1: MMMM MMMM
//!
//! S = Sign bit (bit 15)
//! E = Exponent (bits 14-11, 0-15)
//! M = Mantissa (bits 10-0, two's complement together with S)
//!
//! Value = 0.01 * M * 2^E
//! ```
//!
//! ## Range
//!
//! - Min: -671088.64
//! - Max: +670760.96
//! - Resolution: 0.01 at exponent 0
//!
//! Values beyond the range saturate to the nearest bound at exponent 15.
//!
//! ## Example
//!
//! ```
//! use knx_tp::dpt::{Dpt9, DptDecode, DptEncode};
//!
//! let mut buf = [0u8; 2];
//! let len = Dpt9::Temperature.encode(21.0, &mut buf)?;
//! assert_eq!(&buf[..len], &[0x0C, 0x1A]);
//! assert_eq!(Dpt9::Temperature.decode(&buf)?, 21.0);
//! # Ok::<(), knx_tp::KnxError>(())
//! ```

use crate::dpt::{ensure_capacity, ensure_length, round_f32, DptDecode, DptEncode, Saturation};
use crate::error::Result;

const MANTISSA_MIN: i32 = -2048;
const MANTISSA_MAX: i32 = 2047;
const EXPONENT_MAX: u8 = 15;

/// DPT 9.xxx 2-byte float types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Dpt9 {
    /// DPT 9.001 - Temperature (°C)
    Temperature,
    /// DPT 9.002 - Temperature difference (K)
    TemperatureDifference,
    /// DPT 9.004 - Illuminance (lux)
    Illuminance,
    /// DPT 9.005 - Wind speed (m/s)
    WindSpeed,
    /// DPT 9.006 - Pressure (Pa)
    Pressure,
    /// DPT 9.007 - Humidity (%)
    Humidity,
    /// DPT 9.008 - Air quality (ppm)
    AirQuality,
    /// DPT 9.020 - Voltage (mV)
    Voltage,
    /// DPT 9.021 - Current (mA)
    Current,
    /// DPT 9.024 - Power (kW)
    Power,
}

impl Dpt9 {
    /// Get the DPT identifier string
    pub const fn identifier(&self) -> &'static str {
        match self {
            Dpt9::Temperature => "9.001",
            Dpt9::TemperatureDifference => "9.002",
            Dpt9::Illuminance => "9.004",
            Dpt9::WindSpeed => "9.005",
            Dpt9::Pressure => "9.006",
            Dpt9::Humidity => "9.007",
            Dpt9::AirQuality => "9.008",
            Dpt9::Voltage => "9.020",
            Dpt9::Current => "9.021",
            Dpt9::Power => "9.024",
        }
    }

    /// Get the unit string
    pub const fn unit(&self) -> &'static str {
        match self {
            Dpt9::Temperature => "°C",
            Dpt9::TemperatureDifference => "K",
            Dpt9::Illuminance => "lux",
            Dpt9::WindSpeed => "m/s",
            Dpt9::Pressure => "Pa",
            Dpt9::Humidity => "%",
            Dpt9::AirQuality => "ppm",
            Dpt9::Voltage => "mV",
            Dpt9::Current => "mA",
            Dpt9::Power => "kW",
        }
    }

    /// Encode to 2 bytes, reporting whether the value saturated.
    ///
    /// Picks the smallest exponent for which `round(value * 100) >> exponent`
    /// fits the signed 12-bit mantissa range. NaN encodes as zero.
    pub fn encode_with_status(&self, value: f32) -> ([u8; 2], Saturation) {
        if value.is_nan() {
            knx_log!(warn, "DPT {} encode: NaN replaced by 0", self.identifier());
            return ([0x00, 0x00], Saturation::Clamped);
        }

        let scaled = round_f32(value * 100.0);
        let mut exponent = 0u8;
        let mut mantissa = scaled;

        while !(MANTISSA_MIN..=MANTISSA_MAX).contains(&mantissa) && exponent < EXPONENT_MAX {
            exponent += 1;
            mantissa = scaled >> exponent;
        }

        let status = if (MANTISSA_MIN..=MANTISSA_MAX).contains(&mantissa) {
            Saturation::Exact
        } else {
            knx_log!(warn, "DPT {} encode: value out of range, saturated", self.identifier());
            mantissa = mantissa.clamp(MANTISSA_MIN, MANTISSA_MAX);
            Saturation::Clamped
        };

        let sign_bit = u16::from(mantissa < 0);
        let mantissa_bits = (mantissa as u16) & 0x07FF;
        let raw = (sign_bit << 15) | (u16::from(exponent) << 11) | mantissa_bits;

        (raw.to_be_bytes(), status)
    }

    /// Encode to 2 bytes, saturating out-of-range values.
    #[inline]
    pub fn encode_to_bytes(&self, value: f32) -> [u8; 2] {
        self.encode_with_status(value).0
    }

    /// Decode 2-byte KNX float format to f32.
    fn decode_raw(raw: u16) -> f32 {
        let exponent = ((raw >> 11) & 0x0F) as u8;
        let mantissa_bits = (raw & 0x07FF) as i32;
        let mantissa = if raw & 0x8000 != 0 {
            mantissa_bits - 2048
        } else {
            mantissa_bits
        };

        (mantissa as f32) * ((1u32 << exponent) as f32) / 100.0
    }
}

impl DptEncode<f32> for Dpt9 {
    fn encode(&self, value: f32, buf: &mut [u8]) -> Result<usize> {
        ensure_capacity(buf, 2)?;
        let bytes = self.encode_to_bytes(value);
        buf[..2].copy_from_slice(&bytes);
        Ok(2)
    }
}

impl DptDecode<f32> for Dpt9 {
    /// Fewer than 2 bytes is a decode error.
    fn decode(&self, data: &[u8]) -> Result<f32> {
        ensure_length(data, 2)?;
        Ok(Self::decode_raw(u16::from_be_bytes([data[0], data[1]])))
    }
}
