//! KNX addressing system.
//!
//! KNX uses two types of addresses:
//! - Physical addresses for devices on the bus (Area.Line.Device)
//! - Group addresses for logical signal groups (Main.Middle.Sub)
//!
//! Both are 16 bits on the wire and share one bit layout in this crate:
//!
//! ```text
//! AAAAA LLL DDDDDDDD    (5 bits / 3 bits / 8 bits, big-endian)
//! ```
//!
//! Address strings use `.` or `/` between components; the canonical form
//! produced by `Display` is always dot-separated (`1.2.3`).

pub mod group;
pub mod physical;

pub use group::GroupAddress;
pub use physical::PhysicalAddress;

use crate::error::{KnxError, Result};
use core::fmt;

/// Maximum value of the 5-bit leading component (main / area)
pub(crate) const MAX_HIGH: u8 = 31;
/// Maximum value of the 3-bit middle component (middle / line)
pub(crate) const MAX_MID: u8 = 7;

/// Pack three components into the shared 5/3/8 layout.
#[inline(always)]
pub(crate) const fn pack(high: u8, mid: u8, low: u8) -> u16 {
    (((high & 0x1F) as u16) << 11) | (((mid & 0x07) as u16) << 8) | low as u16
}

/// Split an address string into three bounded components.
///
/// Accepts `.` or `/` separators, requires exactly three non-empty decimal
/// components. `malformed` builds the error for a syntax problem; components
/// that parse but exceed their field yield `OutOfRange`.
pub(crate) fn parse_components(s: &str, malformed: fn() -> KnxError) -> Result<(u8, u8, u8)> {
    let mut parts = s.split(['.', '/']);
    let mut values = [0u32; 3];

    for value in &mut values {
        let part = parts.next().ok_or_else(malformed)?;
        if part.is_empty() || part.len() > 5 || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        *value = part.parse::<u32>().map_err(|_| malformed())?;
    }

    if parts.next().is_some() {
        return Err(malformed());
    }

    let [high, mid, low] = values;
    if high > u32::from(MAX_HIGH) || mid > u32::from(MAX_MID) || low > 255 {
        return Err(KnxError::address_out_of_range());
    }

    Ok((high as u8, mid as u8, low as u8))
}

/// Parse a group address string (`"1/2/3"` or `"1.2.3"`).
pub fn parse_group(s: &str) -> Result<GroupAddress> {
    s.parse()
}

/// Parse a physical address string (`"1.1.200"` or `"1/1/200"`).
pub fn parse_physical(s: &str) -> Result<PhysicalAddress> {
    s.parse()
}

/// Encode a group address as 2 big-endian bytes.
#[inline]
pub const fn encode_group(addr: GroupAddress) -> [u8; 2] {
    addr.raw().to_be_bytes()
}

/// Decode 2 big-endian bytes into a group address.
#[inline]
pub const fn decode_group(bytes: [u8; 2]) -> GroupAddress {
    GroupAddress::from_raw(u16::from_be_bytes(bytes))
}

/// Encode a physical address as 2 big-endian bytes.
#[inline]
pub const fn encode_physical(addr: PhysicalAddress) -> [u8; 2] {
    addr.raw().to_be_bytes()
}

/// Decode 2 big-endian bytes into a physical address.
#[inline]
pub const fn decode_physical(bytes: [u8; 2]) -> PhysicalAddress {
    PhysicalAddress::from_raw(u16::from_be_bytes(bytes))
}

/// Telegram destination: a group or a single device.
///
/// On the wire both are 16 bits; the address-type flag in the telegram's
/// length byte tells them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Destination {
    /// Multicast to a group address
    Group(GroupAddress),
    /// Unicast to a physical address
    Physical(PhysicalAddress),
}

impl Destination {
    /// Raw 16-bit wire value
    #[inline]
    pub const fn raw(self) -> u16 {
        match self {
            Self::Group(ga) => ga.raw(),
            Self::Physical(pa) => pa.raw(),
        }
    }

    /// True for group destinations
    #[inline]
    pub const fn is_group(self) -> bool {
        matches!(self, Self::Group(_))
    }

    /// Group address, if this is a group destination
    #[inline]
    pub const fn group(self) -> Option<GroupAddress> {
        match self {
            Self::Group(ga) => Some(ga),
            Self::Physical(_) => None,
        }
    }

    /// Rebuild from the raw wire value and the address-type flag
    #[inline]
    pub const fn from_wire(raw: u16, is_group: bool) -> Self {
        if is_group {
            Self::Group(GroupAddress::from_raw(raw))
        } else {
            Self::Physical(PhysicalAddress::from_raw(raw))
        }
    }
}

impl From<GroupAddress> for Destination {
    fn from(addr: GroupAddress) -> Self {
        Self::Group(addr)
    }
}

impl From<PhysicalAddress> for Destination {
    fn from(addr: PhysicalAddress) -> Self {
        Self::Physical(addr)
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Group(ga) => write!(f, "group {ga}"),
            Self::Physical(pa) => write!(f, "device {pa}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_group_scenario() {
        let ga = parse_group("1/2/3").unwrap();
        assert_eq!(ga, GroupAddress::new(1, 2, 3).unwrap());
        assert_eq!(encode_group(ga), [0x0A, 0x03]);
        assert_eq!(u16::from_be_bytes(encode_group(ga)), (1 << 11) | (2 << 8) | 3);
    }

    #[test]
    fn test_group_round_trip_all_values() {
        for main in 0..=31u8 {
            for middle in 0..=7u8 {
                for sub in [0u8, 1, 127, 128, 254, 255] {
                    let ga = GroupAddress::new(main, middle, sub).unwrap();
                    assert_eq!(decode_group(encode_group(ga)), ga);
                }
            }
        }
    }

    #[test]
    fn test_format_parse_is_canonical() {
        for s in ["0.0.0", "1.2.3", "31.7.255", "1/2/3", "10/0/200"] {
            let ga = parse_group(s).unwrap();
            let canonical = s.replace('/', ".");
            assert_eq!(ga.to_string(), canonical);
            assert_eq!(parse_group(&ga.to_string()).unwrap(), ga);

            let pa = parse_physical(s).unwrap();
            assert_eq!(pa.to_string(), canonical);
        }
    }

    #[test]
    fn test_physical_codec() {
        let pa = parse_physical("1.1.200").unwrap();
        assert_eq!(decode_physical(encode_physical(pa)), pa);
        assert_eq!(encode_physical(pa), [0x09, 0xC8]);
    }

    #[test]
    fn test_parse_components_rejects() {
        let malformed = KnxError::invalid_group_address;
        assert!(parse_components("1.2", malformed).is_err());
        assert!(parse_components("1.2.3.4", malformed).is_err());
        assert!(parse_components("1..3", malformed).is_err());
        assert!(parse_components("+1.2.3", malformed).is_err());
        assert!(parse_components("-1.2.3", malformed).is_err());
        assert!(parse_components(" 1.2.3", malformed).is_err());
        assert!(parse_components("1.2.3.", malformed).is_err());
        assert!(parse_components("", malformed).is_err());

        let err = parse_components("1.8.3", malformed).unwrap_err();
        assert!(matches!(err, KnxError::Addressing(ref e) if e.is_out_of_range()));
        let err = parse_components("1.2.256", malformed).unwrap_err();
        assert!(matches!(err, KnxError::Addressing(ref e) if e.is_out_of_range()));
        let err = parse_components("32.0.0", malformed).unwrap_err();
        assert!(matches!(err, KnxError::Addressing(ref e) if e.is_out_of_range()));
    }

    #[test]
    fn test_destination() {
        let dest = Destination::from(GroupAddress::new(1, 2, 3).unwrap());
        assert!(dest.is_group());
        assert_eq!(dest.raw(), 0x0A03);
        assert_eq!(Destination::from_wire(0x0A03, true), dest);
        assert_eq!(
            Destination::from_wire(0x0A03, false),
            Destination::Physical(PhysicalAddress::from(0x0A03))
        );
        assert_eq!(dest.group(), Some(GroupAddress::from(0x0A03)));
    }
}
