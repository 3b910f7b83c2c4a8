//! KNX TP1 standard telegram parsing and building.
//!
//! ## Frame Structure
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │ Control (1 byte)                         │
//! ├──────────────────────────────────────────┤
//! │ Source Address (2 bytes)                 │
//! ├──────────────────────────────────────────┤
//! │ Destination Address (2 bytes)            │
//! ├──────────────────────────────────────────┤
//! │ Routing: group flag, hop count, length   │
//! ├──────────────────────────────────────────┤
//! │ Command (1 byte)                         │
//! ├──────────────────────────────────────────┤
//! │ Payload (0-14 bytes)                     │
//! ├──────────────────────────────────────────┤
//! │ Checksum (1 byte)                        │
//! └──────────────────────────────────────────┘
//! ```
//!
//! The checksum is the bitwise complement of the XOR of every preceding byte.
//!
//! ## Example
//!
//! ```
//! use knx_tp::protocol::telegram::{self, Command, Telegram};
//! use knx_tp::{ga, pa};
//!
//! let frame = telegram::build(Command::GroupValueWrite, pa!(1 . 1 . 200), ga!(1/2/3).into(), &[0x01])?;
//! let parsed = Telegram::parse(&frame)?;
//! assert!(parsed.is_group_write());
//! assert_eq!(parsed.payload(), &[0x01]);
//! # Ok::<(), knx_tp::KnxError>(())
//! ```

use crate::addressing::{Destination, PhysicalAddress};
use crate::error::{KnxError, Result};
use crate::protocol::constants::{
    Priority, COMMAND_MASK, COMMAND_OFFSET, DEFAULT_HOP_COUNT, LENGTH_OFFSET, MAX_PAYLOAD_LEN,
    MAX_TELEGRAM_LEN, MIN_TELEGRAM_LEN, PAYLOAD_OFFSET,
};

/// Encoded telegram bytes
pub type Frame = heapless::Vec<u8, MAX_TELEGRAM_LEN>;

/// Bitwise complement of the XOR of `bytes`.
#[inline]
pub fn checksum(bytes: &[u8]) -> u8 {
    !bytes.iter().fold(0u8, |acc, b| acc ^ b)
}

/// Control byte of a standard telegram
///
/// ```text
/// Bit 7: Frame Type (1=standard)
/// Bit 6: Reserved (0)
/// Bit 5: Repeat (0=repeated, 1=not repeated)
/// Bit 4: Reserved (1)
/// Bit 3-2: Priority (00=system, 01=normal, 10=urgent, 11=low)
/// Bit 1-0: Reserved (00)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlField {
    raw: u8,
}

impl From<u8> for ControlField {
    #[inline(always)]
    fn from(raw: u8) -> Self {
        Self { raw }
    }
}

impl From<ControlField> for u8 {
    #[inline(always)]
    fn from(ctrl: ControlField) -> u8 {
        ctrl.raw
    }
}

impl ControlField {
    const FIXED_MASK: u8 = 0xD3;
    const FIXED_BITS: u8 = 0x90;

    /// Create a standard-frame control byte
    pub const fn new(priority: Priority, repeated: bool) -> Self {
        let mut raw = Self::FIXED_BITS | ((priority.to_u8() & 0x03) << 2);
        if !repeated {
            raw |= 0x20;
        }
        Self { raw }
    }

    /// Get raw byte value
    #[inline(always)]
    pub const fn raw(self) -> u8 {
        self.raw
    }

    /// True if the fixed bits match a standard data frame.
    ///
    /// Used by the stream framer to find the start of a telegram.
    #[inline(always)]
    pub const fn is_standard_frame(byte: u8) -> bool {
        byte & Self::FIXED_MASK == Self::FIXED_BITS
    }

    /// Check if this telegram is a repetition
    #[inline(always)]
    pub const fn is_repeated(self) -> bool {
        (self.raw & 0x20) == 0
    }

    /// Get priority
    #[inline(always)]
    pub const fn priority(self) -> Priority {
        Priority::from_u8((self.raw >> 2) & 0x03)
    }
}

impl Default for ControlField {
    #[inline]
    fn default() -> Self {
        // Standard frame, not repeated, low priority: 0b1011_1100
        Self { raw: 0xBC }
    }
}

/// Routing byte: address type, hop count and payload length
///
/// ```text
/// Bit 7: Destination Address Type (0=physical, 1=group)
/// Bit 6-4: Hop Count (0-7)
/// Bit 3-0: Payload Length (0-14)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RoutingField {
    raw: u8,
}

impl From<u8> for RoutingField {
    #[inline(always)]
    fn from(raw: u8) -> Self {
        Self { raw }
    }
}

impl RoutingField {
    /// Create a routing byte. `payload_len` must already be validated.
    pub const fn new(is_group: bool, hop_count: u8, payload_len: u8) -> Self {
        let mut raw = ((hop_count & 0x07) << 4) | (payload_len & 0x0F);
        if is_group {
            raw |= 0x80;
        }
        Self { raw }
    }

    /// Get raw byte value
    #[inline(always)]
    pub const fn raw(self) -> u8 {
        self.raw
    }

    /// Check if destination is group address (true) or physical (false)
    #[inline(always)]
    pub const fn is_group_address(self) -> bool {
        (self.raw & 0x80) != 0
    }

    /// Get hop count (0-7)
    #[inline(always)]
    pub const fn hop_count(self) -> u8 {
        (self.raw >> 4) & 0x07
    }

    /// Payload length announced by the sender (0-15)
    #[inline(always)]
    pub const fn payload_len(self) -> usize {
        (self.raw & 0x0F) as usize
    }

    /// Total telegram length announced by this byte
    #[inline(always)]
    pub const fn telegram_len(self) -> usize {
        MIN_TELEGRAM_LEN + self.payload_len()
    }
}

/// Telegram operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Command {
    /// Group Value Read (`A_GroupValue_Read`)
    GroupValueRead = 0x00,
    /// Group Value Response (`A_GroupValue_Response`)
    GroupValueResponse = 0x40,
    /// Group Value Write (`A_GroupValue_Write`)
    GroupValueWrite = 0x80,
}

impl Command {
    /// Decode the command bits, ignoring the lower six bits.
    ///
    /// # Errors
    ///
    /// Returns `Frame(UnsupportedCommand)` for `0b11xx_xxxx`.
    pub fn from_byte(byte: u8) -> Result<Self> {
        match byte & COMMAND_MASK {
            0x00 => Ok(Self::GroupValueRead),
            0x40 => Ok(Self::GroupValueResponse),
            0x80 => Ok(Self::GroupValueWrite),
            _ => Err(KnxError::unsupported_command()),
        }
    }

    /// Command byte value
    #[inline(always)]
    pub const fn to_byte(self) -> u8 {
        self as u8
    }
}

impl core::fmt::Display for Command {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Self::GroupValueRead => "GroupValueRead",
            Self::GroupValueResponse => "GroupValueResponse",
            Self::GroupValueWrite => "GroupValueWrite",
        })
    }
}

/// A standard KNX TP1 telegram.
///
/// Parsing borrows the payload from the input buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Telegram<'a> {
    /// Control byte
    pub control: ControlField,
    /// Sending device
    pub source: PhysicalAddress,
    /// Group or device destination
    pub destination: Destination,
    /// Remaining routing hops (0-7)
    pub hop_count: u8,
    /// Operation
    pub command: Command,
    payload: &'a [u8],
}

impl<'a> Telegram<'a> {
    /// Create an outbound telegram with the default control byte and hop count.
    pub fn new(
        command: Command,
        source: PhysicalAddress,
        destination: Destination,
        payload: &'a [u8],
    ) -> Self {
        Self {
            control: ControlField::default(),
            source,
            destination,
            hop_count: DEFAULT_HOP_COUNT,
            command,
            payload,
        }
    }

    /// Replace the priority (keeps the repeat flag)
    #[must_use]
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.control = ControlField::new(priority, self.control.is_repeated());
        self
    }

    /// Replace the hop count
    #[must_use]
    pub fn with_hop_count(mut self, hop_count: u8) -> Self {
        self.hop_count = hop_count & 0x07;
        self
    }

    /// Application payload
    #[inline(always)]
    pub const fn payload(&self) -> &'a [u8] {
        self.payload
    }

    /// Check if this is a group value write
    #[inline(always)]
    pub const fn is_group_write(&self) -> bool {
        matches!(self.command, Command::GroupValueWrite)
    }

    /// Check if this is a group value read
    #[inline(always)]
    pub const fn is_group_read(&self) -> bool {
        matches!(self.command, Command::GroupValueRead)
    }

    /// Check if this is a group value response
    #[inline(always)]
    pub const fn is_group_response(&self) -> bool {
        matches!(self.command, Command::GroupValueResponse)
    }

    /// Encoded length in bytes
    #[inline]
    pub const fn encoded_len(&self) -> usize {
        MIN_TELEGRAM_LEN + self.payload.len()
    }

    /// Parse a complete telegram.
    ///
    /// Checks run in a fixed order: minimum length, checksum, then the
    /// length field and command bits.
    ///
    /// # Errors
    ///
    /// - `TooShort` for fewer than 8 bytes
    /// - `ChecksumMismatch` if the trailing byte is wrong
    /// - `PayloadTooLarge` if the length field exceeds 14
    /// - `LengthMismatch` if the length field disagrees with `data.len()`
    /// - `UnsupportedCommand` for command bits `0b11`
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        if data.len() < MIN_TELEGRAM_LEN {
            return Err(KnxError::too_short());
        }

        let (body, trailer) = data.split_at(data.len() - 1);
        if checksum(body) != trailer[0] {
            return Err(KnxError::checksum_mismatch());
        }

        let routing = RoutingField::from(data[LENGTH_OFFSET]);
        if routing.payload_len() > MAX_PAYLOAD_LEN {
            return Err(KnxError::payload_too_large());
        }
        if routing.telegram_len() != data.len() {
            return Err(KnxError::length_mismatch());
        }

        let command = Command::from_byte(data[COMMAND_OFFSET])?;
        let source = PhysicalAddress::from(u16::from_be_bytes([data[1], data[2]]));
        let destination = Destination::from_wire(
            u16::from_be_bytes([data[3], data[4]]),
            routing.is_group_address(),
        );

        Ok(Self {
            control: ControlField::from(data[0]),
            source,
            destination,
            hop_count: routing.hop_count(),
            command,
            payload: &data[PAYLOAD_OFFSET..data.len() - 1],
        })
    }

    /// Encode into `buf`, returning the number of bytes written.
    ///
    /// # Errors
    ///
    /// Returns `PayloadTooLarge` for more than 14 payload bytes and
    /// `Frame(BufferTooSmall)` if `buf` cannot hold the telegram.
    pub fn encode(&self, buf: &mut [u8]) -> Result<usize> {
        if self.payload.len() > MAX_PAYLOAD_LEN {
            return Err(KnxError::payload_too_large());
        }
        let len = self.encoded_len();
        if buf.len() < len {
            return Err(KnxError::frame_buffer_too_small());
        }

        let routing = RoutingField::new(
            self.destination.is_group(),
            self.hop_count,
            self.payload.len() as u8,
        );

        buf[0] = self.control.raw();
        buf[1..3].copy_from_slice(&self.source.raw().to_be_bytes());
        buf[3..5].copy_from_slice(&self.destination.raw().to_be_bytes());
        buf[LENGTH_OFFSET] = routing.raw();
        buf[COMMAND_OFFSET] = self.command.to_byte();
        buf[PAYLOAD_OFFSET..len - 1].copy_from_slice(self.payload);
        buf[len - 1] = checksum(&buf[..len - 1]);

        Ok(len)
    }

    /// Encode into an owned frame.
    pub fn to_frame(&self) -> Result<Frame> {
        let mut buf = [0u8; MAX_TELEGRAM_LEN];
        let len = self.encode(&mut buf)?;
        let mut frame = Frame::new();
        if frame.extend_from_slice(&buf[..len]).is_err() {
            return Err(KnxError::frame_buffer_too_small());
        }
        Ok(frame)
    }
}

/// Build a telegram with the default control byte and hop count.
pub fn build(
    command: Command,
    source: PhysicalAddress,
    destination: Destination,
    payload: &[u8],
) -> Result<Frame> {
    Telegram::new(command, source, destination, payload).to_frame()
}
