//! KNX Physical Address implementation.
//!
//! Physical addresses identify devices on the bus.
//! Format: Area.Line.Device (e.g., 1.1.200)
//! - Area: 0-31 (5 bits)
//! - Line: 0-7 (3 bits)
//! - Device: 0-255 (8 bits)

use super::{pack, parse_components, MAX_HIGH, MAX_MID};
use crate::error::{KnxError, Result};
use core::fmt;

/// KNX Physical Address (Area.Line.Device)
///
/// # Examples
///
/// ```
/// use knx_tp::PhysicalAddress;
///
/// let addr = PhysicalAddress::new(1, 1, 200).unwrap();
/// assert_eq!(addr.to_string(), "1.1.200");
/// assert_eq!(addr.raw(), 0x09C8);
///
/// let parsed: PhysicalAddress = "1/1/200".parse().unwrap();
/// assert_eq!(parsed, addr);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhysicalAddress {
    raw: u16,
}

impl PhysicalAddress {
    /// Maximum area value (5 bits)
    pub const MAX_AREA: u8 = MAX_HIGH;
    /// Maximum line value (3 bits)
    pub const MAX_LINE: u8 = MAX_MID;
    /// Maximum device value (8 bits)
    pub const MAX_DEVICE: u8 = 255;

    /// Create a new Physical Address from components.
    ///
    /// # Errors
    ///
    /// Returns an `OutOfRange` addressing error if area > 31 or line > 7.
    pub fn new(area: u8, line: u8, device: u8) -> Result<Self> {
        if area > Self::MAX_AREA || line > Self::MAX_LINE {
            return Err(KnxError::address_out_of_range());
        }
        Ok(Self {
            raw: pack(area, line, device),
        })
    }

    /// Build from the raw 16-bit value.
    #[inline(always)]
    pub const fn from_raw(raw: u16) -> Self {
        Self { raw }
    }

    /// Get the raw u16 representation of the address.
    #[inline(always)]
    pub const fn raw(self) -> u16 {
        self.raw
    }

    /// Get the area component (0-31).
    #[inline(always)]
    pub const fn area(self) -> u8 {
        ((self.raw >> 11) & 0x1F) as u8
    }

    /// Get the line component (0-7).
    #[inline(always)]
    pub const fn line(self) -> u8 {
        ((self.raw >> 8) & 0x07) as u8
    }

    /// Get the device component (0-255).
    #[inline(always)]
    pub const fn device(self) -> u8 {
        (self.raw & 0xFF) as u8
    }

    /// Encode the address into a byte buffer (big-endian).
    ///
    /// # Errors
    ///
    /// Returns `Addressing(BufferTooSmall)` if `buf` holds fewer than 2 bytes.
    #[inline]
    pub fn encode(&self, buf: &mut [u8]) -> Result<usize> {
        if buf.len() < 2 {
            return Err(KnxError::address_buffer_too_small());
        }
        buf[0..2].copy_from_slice(&self.raw.to_be_bytes());
        Ok(2)
    }

    /// Decode an address from the first 2 bytes of `buf` (big-endian).
    ///
    /// # Errors
    ///
    /// Returns `Addressing(BufferTooSmall)` if `buf` holds fewer than 2 bytes.
    #[inline]
    pub fn decode(buf: &[u8]) -> Result<Self> {
        match buf {
            [hi, lo, ..] => Ok(Self::from_raw(u16::from_be_bytes([*hi, *lo]))),
            _ => Err(KnxError::address_buffer_too_small()),
        }
    }
}

impl From<u16> for PhysicalAddress {
    #[inline(always)]
    fn from(raw: u16) -> Self {
        Self { raw }
    }
}

impl From<PhysicalAddress> for u16 {
    #[inline(always)]
    fn from(addr: PhysicalAddress) -> u16 {
        addr.raw
    }
}

impl fmt::Display for PhysicalAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.area(), self.line(), self.device())
    }
}

impl core::str::FromStr for PhysicalAddress {
    type Err = KnxError;

    fn from_str(s: &str) -> Result<Self> {
        let (area, line, device) = parse_components(s, KnxError::invalid_physical_address)?;
        Self::new(area, line, device)
    }
}
