//! KNX Group Address implementation.
//!
//! Group addresses represent logical groupings of devices for functional control.
//! Only the 3-level format (Main/Middle/Sub, e.g. `1/2/3`) is supported.
//!
//! Internally stored as 16 bits:
//! - Main: 5 bits (0-31)
//! - Middle: 3 bits (0-7)
//! - Sub: 8 bits (0-255)

use super::{pack, parse_components, MAX_HIGH, MAX_MID};
use crate::error::{KnxError, Result};
use core::fmt;

/// KNX Group Address
///
/// Used for logical grouping of devices and functions.
///
/// # Examples
///
/// ```
/// use knx_tp::GroupAddress;
///
/// let addr = GroupAddress::new(1, 2, 3).unwrap();
/// assert_eq!(addr.to_string(), "1.2.3");
///
/// // Create from raw u16
/// let addr = GroupAddress::from(0x0A03u16);
/// assert_eq!(addr.main(), 1);
/// assert_eq!(addr.middle(), 2);
/// assert_eq!(addr.sub(), 3);
///
/// // Either separator is accepted
/// let slash: GroupAddress = "1/2/3".parse().unwrap();
/// let dot: GroupAddress = "1.2.3".parse().unwrap();
/// assert_eq!(slash, dot);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupAddress {
    raw: u16,
}

impl GroupAddress {
    /// Maximum main group value (5 bits)
    pub const MAX_MAIN: u8 = MAX_HIGH;
    /// Maximum middle group value (3 bits)
    pub const MAX_MIDDLE: u8 = MAX_MID;
    /// Maximum sub group value (8 bits)
    pub const MAX_SUB: u8 = 255;

    /// Create a new Group Address (Main/Middle/Sub).
    ///
    /// # Errors
    ///
    /// Returns an `OutOfRange` addressing error if main > 31 or middle > 7.
    pub fn new(main: u8, middle: u8, sub: u8) -> Result<Self> {
        if main > Self::MAX_MAIN || middle > Self::MAX_MIDDLE {
            return Err(KnxError::address_out_of_range());
        }
        Ok(Self {
            raw: pack(main, middle, sub),
        })
    }

    /// Create from a 3-element array `[main, middle, sub]`.
    ///
    /// ```
    /// use knx_tp::GroupAddress;
    ///
    /// let addr = GroupAddress::from_array([1, 2, 3])?;
    /// assert_eq!(addr.to_string(), "1.2.3");
    /// # Ok::<(), knx_tp::KnxError>(())
    /// ```
    pub fn from_array(parts: [u8; 3]) -> Result<Self> {
        Self::new(parts[0], parts[1], parts[2])
    }

    /// Build from the raw 16-bit value. Every value is a valid address.
    #[inline(always)]
    pub const fn from_raw(raw: u16) -> Self {
        Self { raw }
    }

    /// Get the raw u16 representation of the address.
    #[inline(always)]
    pub const fn raw(self) -> u16 {
        self.raw
    }

    /// Get the main group component (0-31).
    #[inline(always)]
    pub const fn main(self) -> u8 {
        ((self.raw >> 11) & 0x1F) as u8
    }

    /// Get the middle group component (0-7).
    #[inline(always)]
    pub const fn middle(self) -> u8 {
        ((self.raw >> 8) & 0x07) as u8
    }

    /// Get the sub group component (0-255).
    #[inline(always)]
    pub const fn sub(self) -> u8 {
        (self.raw & 0xFF) as u8
    }

    /// Format with slash separators (`1/2/3`), as ETS displays it.
    pub fn to_slash_string(&self) -> heapless::String<16> {
        use core::fmt::Write;
        let mut s = heapless::String::new();
        let _ = write!(s, "{}/{}/{}", self.main(), self.middle(), self.sub());
        s
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

impl From<u16> for GroupAddress {
    #[inline(always)]
    fn from(raw: u16) -> Self {
        Self { raw }
    }
}

impl From<GroupAddress> for u16 {
    #[inline(always)]
    fn from(addr: GroupAddress) -> u16 {
        addr.raw
    }
}

impl fmt::Display for GroupAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.main(), self.middle(), self.sub())
    }
}

impl core::str::FromStr for GroupAddress {
    type Err = KnxError;

    fn from_str(s: &str) -> Result<Self> {
        let (main, middle, sub) = parse_components(s, KnxError::invalid_group_address)?;
        Self::new(main, middle, sub)
    }
}
