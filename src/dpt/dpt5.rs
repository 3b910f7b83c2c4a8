//! DPT 5.xxx - 8-bit Unsigned Value (1 byte)
//!
//! ## Common Subtypes
//!
//! - **5.001** - Percentage (0-100 %, scaled to 0-255)
//! - **5.003** - Angle (0-360 degrees, scaled to 0-255)
//! - **5.004** - Percentage 0-255 (unscaled)
//! - **5.010** - Counter pulses (unscaled)
//!
//! Percentage input is clamped to 0-100 and angle input is normalized into
//! [0, 360) before scaling; both then round to the nearest byte.
//!
//! ## Example
//!
//! ```
//! use knx_tp::dpt::{Dpt5, DptDecode};
//!
//! assert_eq!(Dpt5::Percentage.encode_to_byte(50.0), 0x80);
//! let pct = Dpt5::Percentage.decode(&[0x80])?;
//! assert!((pct - 50.2).abs() < 0.01);
//! # Ok::<(), knx_tp::KnxError>(())
//! ```

use crate::dpt::{ensure_capacity, round_f32, DptDecode, DptEncode, Saturation};
use crate::error::Result;

/// DPT 5.xxx 8-bit unsigned types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Dpt5 {
    /// DPT 5.001 - Percentage (0-100%)
    Percentage,
    /// DPT 5.003 - Angle (0-360°)
    Angle,
    /// DPT 5.004 - Percentage 0-255
    PercentU8,
    /// DPT 5.010 - Counter pulses (0-255)
    Unsigned,
}

impl Dpt5 {
    /// Get the DPT identifier string (e.g., "5.001")
    pub const fn identifier(&self) -> &'static str {
        match self {
            Dpt5::Percentage => "5.001",
            Dpt5::Angle => "5.003",
            Dpt5::PercentU8 => "5.004",
            Dpt5::Unsigned => "5.010",
        }
    }

    /// Get the unit string for this DPT
    pub const fn unit(&self) -> &'static str {
        match self {
            Dpt5::Percentage => "%",
            Dpt5::Angle => "°",
            Dpt5::PercentU8 => "",
            Dpt5::Unsigned => "pulses",
        }
    }

    /// True for subtypes carried as the raw byte value
    pub const fn is_unscaled(&self) -> bool {
        matches!(self, Dpt5::PercentU8 | Dpt5::Unsigned)
    }

    /// Encode to a byte, reporting whether the input had to be clamped.
    pub fn encode_with_status(&self, value: f32) -> (u8, Saturation) {
        if value.is_nan() {
            knx_log!(warn, "DPT {} encode: NaN replaced by 0", self.identifier());
            return (0, Saturation::Clamped);
        }

        let (scaled, status) = match self {
            Dpt5::Percentage => {
                let clamped = value.clamp(0.0, 100.0);
                (clamped * 255.0 / 100.0, saturation(clamped != value))
            }
            Dpt5::Angle => {
                let mut angle = value % 360.0;
                if angle.is_nan() {
                    angle = 0.0;
                } else if angle < 0.0 {
                    angle += 360.0;
                }
                (angle * 255.0 / 360.0, saturation(!(0.0..360.0).contains(&value)))
            }
            Dpt5::PercentU8 | Dpt5::Unsigned => {
                let clamped = value.clamp(0.0, 255.0);
                (clamped, saturation(clamped != value))
            }
        };

        if status.is_clamped() {
            knx_log!(warn, "DPT {} encode: input outside range, clamped", self.identifier());
        }

        (round_f32(scaled).clamp(0, 255) as u8, status)
    }

    /// Encode to a byte, clamping out-of-range input.
    #[inline]
    pub fn encode_to_byte(&self, value: f32) -> u8 {
        self.encode_with_status(value).0
    }

    /// Raw byte value, 0 for an empty payload.
    #[inline]
    pub fn decode_u8(&self, data: &[u8]) -> u8 {
        data.first().copied().unwrap_or(0)
    }
}

#[inline]
fn saturation(clamped: bool) -> Saturation {
    if clamped {
        Saturation::Clamped
    } else {
        Saturation::Exact
    }
}

impl DptEncode<f32> for Dpt5 {
    fn encode(&self, value: f32, buf: &mut [u8]) -> Result<usize> {
        ensure_capacity(buf, 1)?;
        buf[0] = self.encode_to_byte(value);
        Ok(1)
    }
}

impl DptDecode<f32> for Dpt5 {
    /// An empty payload decodes as 0.
    fn decode(&self, data: &[u8]) -> Result<f32> {
        let raw = f32::from(self.decode_u8(data));
        Ok(match self {
            Dpt5::Percentage => raw * 100.0 / 255.0,
            Dpt5::Angle => raw * 360.0 / 255.0,
            Dpt5::PercentU8 | Dpt5::Unsigned => raw,
        })
    }
}
