//! KNX Datapoint Types (DPT)
//!
//! This module provides encoding and decoding for KNX Datapoint Types.
//! DPTs define how to interpret the data payload in KNX telegrams.
//!
//! ## Supported DPT Families
//!
//! - **DPT 1.xxx** - Boolean (1 bit): switches, buttons, binary sensors
//! - **DPT 5.xxx** - 8-bit unsigned: raw values, percentages, angles
//! - **DPT 9.xxx** - 2-byte float: temperature, illuminance, humidity
//! - **DPT 10.001** - Time of day (3 bytes)
//! - **DPT 11.001** - Date (3 bytes)
//! - **DPT 14.xxx** - 4-byte IEEE float: power, energy, current
//! - **DPT 16.000** - ASCII string (up to 13 characters + NUL)
//! - **DPT 19.001** - Date and time (8 bytes)
//! - **DPT 20.102** - HVAC mode
//!
//! ## Usage
//!
//! ```
//! use knx_tp::dpt::{Dpt1, Dpt5, Dpt9, DptDecode, DptEncode};
//!
//! let mut buf = [0u8; 2];
//!
//! Dpt1::Switch.encode(true, &mut buf)?;
//! assert_eq!(buf[0], 0x01);
//!
//! Dpt5::Percentage.encode(50.0, &mut buf)?;
//! assert_eq!(buf[0], 0x80);
//!
//! let len = Dpt9::Temperature.encode(21.0, &mut buf)?;
//! assert_eq!(&buf[..len], &[0x0C, 0x1A]);
//! assert_eq!(Dpt9::Temperature.decode(&buf)?, 21.0);
//! # Ok::<(), knx_tp::KnxError>(())
//! ```
//!
//! ## Decode policy
//!
//! 1-byte types decode an empty payload to their zero/default value.
//! Fixed-width multi-byte types (Float16, Float32, time, date, date-time)
//! reject undersized payloads with a `Dpt(InvalidLength)` error.
//!
//! ## Saturation
//!
//! Out-of-range input to the Float16, percentage and angle encoders is
//! clamped, not rejected. The `encode_with_status` methods return a
//! [`Saturation`] alongside the bytes, and a clamp is logged at `warn`.

use crate::error::{KnxError, Result};
use crate::protocol::constants::MAX_PAYLOAD_LEN;

pub mod dpt1;
pub mod dpt5;
pub mod dpt9;
pub mod dpt10;
pub mod dpt11;
pub mod dpt14;
pub mod dpt16;
pub mod dpt19;
pub mod dpt20;

#[doc(inline)]
pub use dpt1::Dpt1;
#[doc(inline)]
pub use dpt5::Dpt5;
#[doc(inline)]
pub use dpt9::Dpt9;
#[doc(inline)]
pub use dpt10::{Dpt10, TimeOfDay};
#[doc(inline)]
pub use dpt11::{Date, Dpt11};
#[doc(inline)]
pub use dpt14::Dpt14;
#[doc(inline)]
pub use dpt16::{Dpt16, DptString, MAX_STRING_LEN};
#[doc(inline)]
pub use dpt19::{DateTime, Dpt19};
#[doc(inline)]
pub use dpt20::{Dpt20, HvacMode};

/// Encoded datapoint payload, bounded by the telegram payload ceiling.
pub type Payload = heapless::Vec<u8, MAX_PAYLOAD_LEN>;

/// Trait for encoding values to KNX data format
pub trait DptEncode<T> {
    /// Encode `value` into `buf`, returning the number of bytes written.
    ///
    /// # Errors
    ///
    /// Returns `Dpt(BufferTooSmall)` if `buf` cannot hold the encoding.
    fn encode(&self, value: T, buf: &mut [u8]) -> Result<usize>;
}

/// Trait for decoding KNX data to values
pub trait DptDecode<T> {
    /// Decode KNX byte representation to a value
    fn decode(&self, data: &[u8]) -> Result<T>;
}

/// Outcome of a saturating encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Saturation {
    /// Input was representable without clamping
    Exact,
    /// Input was outside the encodable range and was clamped
    Clamped,
}

impl Saturation {
    /// True if the encoder had to clamp
    #[inline]
    pub const fn is_clamped(self) -> bool {
        matches!(self, Self::Clamped)
    }
}

/// Round half away from zero without `std`.
///
/// Out-of-range results saturate at `i32::MIN`/`i32::MAX`.
#[inline]
pub(crate) fn round_f32(value: f32) -> i32 {
    if value >= 0.0 {
        (value + 0.5) as i32
    } else {
        (value - 0.5) as i32
    }
}

#[inline]
pub(crate) fn ensure_capacity(buf: &[u8], needed: usize) -> Result<()> {
    if buf.len() < needed {
        return Err(KnxError::dpt_buffer_too_small());
    }
    Ok(())
}

#[inline]
pub(crate) fn ensure_length(data: &[u8], needed: usize) -> Result<()> {
    if data.len() < needed {
        return Err(KnxError::invalid_dpt_data());
    }
    Ok(())
}

/// A typed datapoint value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DptValue {
    /// DPT 1.xxx
    Bool(bool),
    /// DPT 5.010 and other unscaled 8-bit values
    Unsigned8(u8),
    /// DPT 5.001, 0-100 %
    Percentage(f32),
    /// DPT 5.003, 0-360 degrees
    Angle(f32),
    /// DPT 9.xxx
    Float16(f32),
    /// DPT 14.xxx
    Float32(f32),
    /// DPT 16.000
    Text(DptString),
    /// DPT 20.102
    HvacMode(HvacMode),
    /// DPT 10.001
    TimeOfDay(TimeOfDay),
    /// DPT 11.001
    Date(Date),
    /// DPT 19.001
    DateTime(DateTime),
}

impl DptValue {
    /// Datapoint type used when the value is sent without an explicit type.
    ///
    /// Subtypes of one family share their wire encoding, so one
    /// representative subtype stands in for all of them.
    pub const fn default_type(&self) -> DatapointType {
        match self {
            Self::Bool(_) => DatapointType::Dpt1(Dpt1::Switch),
            Self::Unsigned8(_) => DatapointType::Dpt5(Dpt5::Unsigned),
            Self::Percentage(_) => DatapointType::Dpt5(Dpt5::Percentage),
            Self::Angle(_) => DatapointType::Dpt5(Dpt5::Angle),
            Self::Float16(_) => DatapointType::Dpt9(Dpt9::Temperature),
            Self::Float32(_) => DatapointType::Dpt14(Dpt14::Power),
            Self::Text(_) => DatapointType::Dpt16(Dpt16::Ascii),
            Self::HvacMode(_) => DatapointType::Dpt20(Dpt20::HvacMode),
            Self::TimeOfDay(_) => DatapointType::Dpt10(Dpt10::TimeOfDay),
            Self::Date(_) => DatapointType::Dpt11(Dpt11::Date),
            Self::DateTime(_) => DatapointType::Dpt19(Dpt19::DateTime),
        }
    }

    /// Encode with [`Self::default_type`].
    pub fn encode(&self) -> Result<Payload> {
        self.default_type().encode(self)
    }
}

/// Every supported datapoint encoding.
///
/// Dispatches a [`DptValue`] to the matching family codec.
///
/// ```
/// use knx_tp::dpt::{DatapointType, Dpt9, DptValue};
///
/// let dpt = DatapointType::Dpt9(Dpt9::Temperature);
/// let payload = dpt.encode(&DptValue::Float16(21.0))?;
/// assert_eq!(payload.as_slice(), &[0x0C, 0x1A]);
/// assert_eq!(dpt.decode(&payload)?, DptValue::Float16(21.0));
/// assert_eq!(dpt.identifier(), "9.001");
/// # Ok::<(), knx_tp::KnxError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DatapointType {
    /// Boolean
    Dpt1(Dpt1),
    /// 8-bit unsigned, raw or scaled
    Dpt5(Dpt5),
    /// 2-byte float
    Dpt9(Dpt9),
    /// Time of day
    Dpt10(Dpt10),
    /// Date
    Dpt11(Dpt11),
    /// 4-byte float
    Dpt14(Dpt14),
    /// ASCII string
    Dpt16(Dpt16),
    /// Date and time
    Dpt19(Dpt19),
    /// HVAC mode
    Dpt20(Dpt20),
}

impl DatapointType {
    /// DPT identifier string (e.g. `"9.001"`)
    pub const fn identifier(&self) -> &'static str {
        match self {
            Self::Dpt1(d) => d.identifier(),
            Self::Dpt5(d) => d.identifier(),
            Self::Dpt9(d) => d.identifier(),
            Self::Dpt10(d) => d.identifier(),
            Self::Dpt11(d) => d.identifier(),
            Self::Dpt14(d) => d.identifier(),
            Self::Dpt16(d) => d.identifier(),
            Self::Dpt19(d) => d.identifier(),
            Self::Dpt20(d) => d.identifier(),
        }
    }

    /// Encode `value` into a payload.
    ///
    /// # Errors
    ///
    /// Returns `Dpt(TypeMismatch)` when the value variant does not belong
    /// to this datapoint type.
    pub fn encode(&self, value: &DptValue) -> Result<Payload> {
        let mut buf = [0u8; MAX_PAYLOAD_LEN];
        let len = match (self, value) {
            (Self::Dpt1(d), DptValue::Bool(v)) => d.encode(*v, &mut buf)?,
            (Self::Dpt5(d @ Dpt5::Percentage), DptValue::Percentage(v))
            | (Self::Dpt5(d @ Dpt5::Angle), DptValue::Angle(v)) => d.encode(*v, &mut buf)?,
            (Self::Dpt5(d), DptValue::Unsigned8(v)) if d.is_unscaled() => {
                d.encode(f32::from(*v), &mut buf)?
            }
            (Self::Dpt9(d), DptValue::Float16(v)) => d.encode(*v, &mut buf)?,
            (Self::Dpt10(d), DptValue::TimeOfDay(v)) => d.encode(*v, &mut buf)?,
            (Self::Dpt11(d), DptValue::Date(v)) => d.encode(*v, &mut buf)?,
            (Self::Dpt14(d), DptValue::Float32(v)) => d.encode(*v, &mut buf)?,
            (Self::Dpt16(d), DptValue::Text(v)) => d.encode(v.as_str(), &mut buf)?,
            (Self::Dpt19(d), DptValue::DateTime(v)) => d.encode(*v, &mut buf)?,
            (Self::Dpt20(d), DptValue::HvacMode(v)) => d.encode(*v, &mut buf)?,
            _ => return Err(KnxError::dpt_type_mismatch()),
        };

        let mut payload = Payload::new();
        if payload.extend_from_slice(&buf[..len]).is_err() {
            return Err(KnxError::payload_too_large());
        }
        Ok(payload)
    }

    /// Decode a payload into the value variant of this datapoint type.
    pub fn decode(&self, data: &[u8]) -> Result<DptValue> {
        Ok(match self {
            Self::Dpt1(d) => DptValue::Bool(d.decode(data)?),
            Self::Dpt5(Dpt5::Percentage) => DptValue::Percentage(Dpt5::Percentage.decode(data)?),
            Self::Dpt5(Dpt5::Angle) => DptValue::Angle(Dpt5::Angle.decode(data)?),
            Self::Dpt5(d) => DptValue::Unsigned8(d.decode_u8(data)),
            Self::Dpt9(d) => DptValue::Float16(d.decode(data)?),
            Self::Dpt10(d) => DptValue::TimeOfDay(d.decode(data)?),
            Self::Dpt11(d) => DptValue::Date(d.decode(data)?),
            Self::Dpt14(d) => DptValue::Float32(d.decode(data)?),
            Self::Dpt16(d) => DptValue::Text(d.decode(data)?),
            Self::Dpt19(d) => DptValue::DateTime(d.decode(data)?),
            Self::Dpt20(d) => DptValue::HvacMode(d.decode(data)?),
        })
    }
}
