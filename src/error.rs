//! Error types for KNX TP operations following M-ERRORS-CANONICAL-STRUCTS guideline.
//!
//! Every error belongs to one category (addressing, registry, frame, DPT,
//! transport, configuration). Each category is a small struct carrying a
//! public kind enum and, when `std` is enabled, a captured backtrace.
//!
//! Configuration-time errors (addressing, duplicate ids, malformed config
//! lines) are meant to abort startup. Frame errors are per-telegram and
//! never fatal: the router drops the telegram and keeps going.

use core::fmt;

#[cfg(feature = "std")]
use std::backtrace::Backtrace;

/// Result type alias for KNX operations.
pub type Result<T> = core::result::Result<T, KnxError>;

// =============================================================================
// Error Kind Enums
// =============================================================================

/// Address string or value rejected by the address codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AddressingErrorKind {
    /// Physical address string is not `area.line.device`
    InvalidPhysicalAddress,
    /// Group address string is not `main.middle.sub`
    InvalidGroupAddress,
    /// A component does not fit its bit field
    OutOfRange,
    /// Fewer than 2 bytes to encode into or decode from
    BufferTooSmall,
}

/// Group address registry failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegistryErrorKind {
    /// Symbolic id already registered in this registry
    DuplicateId,
    /// Symbolic id unknown to this registry
    NotFound,
    /// Registry or listener table is full
    CapacityExceeded,
    /// Symbolic id longer than [`crate::registry::MAX_ID_LEN`]
    IdTooLong,
}

/// Malformed inbound telegram or unbuildable outbound telegram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameErrorKind {
    /// Fewer than the minimum 8 telegram bytes
    TooShort,
    /// Trailing checksum does not match the recomputed one
    ChecksumMismatch,
    /// Length field disagrees with the number of bytes received
    LengthMismatch,
    /// Payload exceeds the 14 byte ceiling
    PayloadTooLarge,
    /// Command byte is not a group value read/write/response
    UnsupportedCommand,
    /// Output buffer cannot hold the encoded telegram
    BufferTooSmall,
}

/// Datapoint codec failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DptErrorKind {
    /// Payload too short for a fixed-width datapoint type
    InvalidLength,
    /// Value variant does not match the requested datapoint type
    TypeMismatch,
    /// Output buffer cannot hold the encoded value
    BufferTooSmall,
}

/// Transport boundary failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportErrorKind {
    /// Transport refused or failed to transmit the frame
    SendFailed,
    /// Bus coupler not connected
    NotReady,
}

/// Startup configuration failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigErrorKind {
    /// No `PHYSICAL_ADDRESS=` line
    MissingPhysicalAddress,
    /// Line is not `KEY=value` or its value is unparsable
    MalformedLine,
    /// Key not recognised
    UnknownKey,
}

// =============================================================================
// Main Error Type
// =============================================================================

/// KNX protocol error types.
///
/// This is the main error type returned by all KNX operations.
/// It contains a backtrace (when std feature is enabled) and detailed
/// error information through helper methods.
#[derive(Debug)]
pub enum KnxError {
    /// Addressing errors (malformed or out-of-range address)
    Addressing(AddressingError),
    /// Registry errors (duplicate or unknown id, capacity)
    Registry(RegistryError),
    /// Framing errors (short telegram, bad checksum, ...)
    Frame(FrameError),
    /// Datapoint Type errors (decoding, type mismatch)
    Dpt(DptError),
    /// Transport errors (send failed, bus not ready)
    Transport(TransportError),
    /// Configuration errors
    Config(ConfigError),
}

// =============================================================================
// Structured Error Types
// =============================================================================

macro_rules! error_struct {
    ($(#[$meta:meta])* $name:ident, $kind:ty) => {
        $(#[$meta])*
        #[derive(Debug)]
        pub struct $name {
            kind: $kind,
            #[cfg(feature = "std")]
            backtrace: Backtrace,
        }

        impl $name {
            pub(crate) fn new(kind: $kind) -> Self {
                Self {
                    kind,
                    #[cfg(feature = "std")]
                    backtrace: Backtrace::capture(),
                }
            }

            /// Get the error kind
            pub const fn kind(&self) -> $kind {
                self.kind
            }

            /// Backtrace captured when the error was created
            #[cfg(feature = "std")]
            pub fn backtrace(&self) -> &Backtrace {
                &self.backtrace
            }
        }
    };
}

error_struct!(
    /// Addressing error with optional backtrace
    AddressingError,
    AddressingErrorKind
);
error_struct!(
    /// Registry error with optional backtrace
    RegistryError,
    RegistryErrorKind
);
error_struct!(
    /// Frame error with optional backtrace
    FrameError,
    FrameErrorKind
);
error_struct!(
    /// DPT error with optional backtrace
    DptError,
    DptErrorKind
);
error_struct!(
    /// Transport error with optional backtrace
    TransportError,
    TransportErrorKind
);
error_struct!(
    /// Configuration error with optional backtrace
    ConfigError,
    ConfigErrorKind
);

impl AddressingError {
    /// Check if address is out of range
    pub fn is_out_of_range(&self) -> bool {
        matches!(self.kind, AddressingErrorKind::OutOfRange)
    }
}

impl FrameError {
    /// Check if the checksum did not match
    pub fn is_checksum_mismatch(&self) -> bool {
        matches!(self.kind, FrameErrorKind::ChecksumMismatch)
    }

    /// Check if the telegram was too short
    pub fn is_too_short(&self) -> bool {
        matches!(self.kind, FrameErrorKind::TooShort)
    }
}

// =============================================================================
// Convenience Constructors for KnxError
// =============================================================================

impl KnxError {
    // Addressing errors
    pub(crate) fn invalid_physical_address() -> Self {
        Self::Addressing(AddressingError::new(AddressingErrorKind::InvalidPhysicalAddress))
    }

    pub(crate) fn invalid_group_address() -> Self {
        Self::Addressing(AddressingError::new(AddressingErrorKind::InvalidGroupAddress))
    }

    pub(crate) fn address_out_of_range() -> Self {
        Self::Addressing(AddressingError::new(AddressingErrorKind::OutOfRange))
    }

    pub(crate) fn address_buffer_too_small() -> Self {
        Self::Addressing(AddressingError::new(AddressingErrorKind::BufferTooSmall))
    }

    // Registry errors
    pub(crate) fn duplicate_id() -> Self {
        Self::Registry(RegistryError::new(RegistryErrorKind::DuplicateId))
    }

    pub(crate) fn not_found() -> Self {
        Self::Registry(RegistryError::new(RegistryErrorKind::NotFound))
    }

    pub(crate) fn capacity_exceeded() -> Self {
        Self::Registry(RegistryError::new(RegistryErrorKind::CapacityExceeded))
    }

    pub(crate) fn id_too_long() -> Self {
        Self::Registry(RegistryError::new(RegistryErrorKind::IdTooLong))
    }

    // Frame errors
    pub(crate) fn too_short() -> Self {
        Self::Frame(FrameError::new(FrameErrorKind::TooShort))
    }

    pub(crate) fn checksum_mismatch() -> Self {
        Self::Frame(FrameError::new(FrameErrorKind::ChecksumMismatch))
    }

    pub(crate) fn length_mismatch() -> Self {
        Self::Frame(FrameError::new(FrameErrorKind::LengthMismatch))
    }

    pub(crate) fn payload_too_large() -> Self {
        Self::Frame(FrameError::new(FrameErrorKind::PayloadTooLarge))
    }

    pub(crate) fn unsupported_command() -> Self {
        Self::Frame(FrameError::new(FrameErrorKind::UnsupportedCommand))
    }

    pub(crate) fn frame_buffer_too_small() -> Self {
        Self::Frame(FrameError::new(FrameErrorKind::BufferTooSmall))
    }

    // DPT errors
    pub(crate) fn invalid_dpt_data() -> Self {
        Self::Dpt(DptError::new(DptErrorKind::InvalidLength))
    }

    pub(crate) fn dpt_type_mismatch() -> Self {
        Self::Dpt(DptError::new(DptErrorKind::TypeMismatch))
    }

    pub(crate) fn dpt_buffer_too_small() -> Self {
        Self::Dpt(DptError::new(DptErrorKind::BufferTooSmall))
    }

    // Transport errors, public for `Transport` implementations

    /// The frame could not be written to the bus coupler
    pub fn send_failed() -> Self {
        Self::Transport(TransportError::new(TransportErrorKind::SendFailed))
    }

    /// The bus coupler is not connected
    pub fn not_ready() -> Self {
        Self::Transport(TransportError::new(TransportErrorKind::NotReady))
    }

    // Configuration errors
    pub(crate) fn missing_physical_address() -> Self {
        Self::Config(ConfigError::new(ConfigErrorKind::MissingPhysicalAddress))
    }

    pub(crate) fn malformed_line() -> Self {
        Self::Config(ConfigError::new(ConfigErrorKind::MalformedLine))
    }

    pub(crate) fn unknown_key() -> Self {
        Self::Config(ConfigError::new(ConfigErrorKind::UnknownKey))
    }

    // Predicates

    /// Unknown symbolic id on lookup or send
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Registry(e) if e.kind == RegistryErrorKind::NotFound)
    }

    /// Symbolic id registered twice
    pub fn is_duplicate_id(&self) -> bool {
        matches!(self, Self::Registry(e) if e.kind == RegistryErrorKind::DuplicateId)
    }

    /// Checksum of an inbound telegram did not match
    pub fn is_checksum_mismatch(&self) -> bool {
        matches!(self, Self::Frame(e) if e.is_checksum_mismatch())
    }

    /// Inbound telegram shorter than the minimum frame
    pub fn is_too_short(&self) -> bool {
        matches!(self, Self::Frame(e) if e.is_too_short())
    }

    /// Fixed-width datapoint payload too short
    pub fn is_decode_error(&self) -> bool {
        matches!(self, Self::Dpt(e) if e.kind == DptErrorKind::InvalidLength)
    }

    /// Address string or component rejected
    pub fn is_address_error(&self) -> bool {
        matches!(self, Self::Addressing(_))
    }

    /// Transport refused or failed a send
    pub fn is_transport_error(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Frame kind, if this is a framing error
    pub fn frame_kind(&self) -> Option<FrameErrorKind> {
        match self {
            Self::Frame(e) => Some(e.kind),
            _ => None,
        }
    }
}

// =============================================================================
// Display Implementation
// =============================================================================

impl fmt::Display for KnxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KnxError::Addressing(e) => write!(f, "Addressing error: {:?}", e.kind),
            KnxError::Registry(e) => write!(f, "Registry error: {:?}", e.kind),
            KnxError::Frame(e) => write!(f, "Frame error: {:?}", e.kind),
            KnxError::Dpt(e) => write!(f, "DPT error: {:?}", e.kind),
            KnxError::Transport(e) => write!(f, "Transport error: {:?}", e.kind),
            KnxError::Config(e) => write!(f, "Configuration error: {:?}", e.kind),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for KnxError {
    fn format(&self, f: defmt::Formatter<'_>) {
        match self {
            KnxError::Addressing(e) => defmt::write!(f, "Addressing error: {}", e.kind),
            KnxError::Registry(e) => defmt::write!(f, "Registry error: {}", e.kind),
            KnxError::Frame(e) => defmt::write!(f, "Frame error: {}", e.kind),
            KnxError::Dpt(e) => defmt::write!(f, "DPT error: {}", e.kind),
            KnxError::Transport(e) => defmt::write!(f, "Transport error: {}", e.kind),
            KnxError::Config(e) => defmt::write!(f, "Configuration error: {}", e.kind),
        }
    }
}

// Implement std::error::Error for std-based applications
#[cfg(feature = "std")]
impl std::error::Error for KnxError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicates() {
        assert!(KnxError::not_found().is_not_found());
        assert!(KnxError::duplicate_id().is_duplicate_id());
        assert!(KnxError::checksum_mismatch().is_checksum_mismatch());
        assert!(KnxError::too_short().is_too_short());
        assert!(KnxError::invalid_dpt_data().is_decode_error());
        assert!(!KnxError::not_found().is_duplicate_id());
    }

    #[test]
    fn test_frame_kind() {
        assert_eq!(
            KnxError::length_mismatch().frame_kind(),
            Some(FrameErrorKind::LengthMismatch)
        );
        assert_eq!(KnxError::not_ready().frame_kind(), None);
        assert_eq!(
            KnxError::frame_buffer_too_small().frame_kind(),
            Some(FrameErrorKind::BufferTooSmall)
        );
    }

    #[test]
    fn test_codec_buffer_errors_keep_their_category() {
        assert!(KnxError::address_buffer_too_small().is_address_error());
        assert!(matches!(
            KnxError::dpt_buffer_too_small(),
            KnxError::Dpt(ref e) if e.kind() == DptErrorKind::BufferTooSmall
        ));
        assert!(matches!(KnxError::send_failed(), KnxError::Transport(_)));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            format!("{}", KnxError::checksum_mismatch()),
            "Frame error: ChecksumMismatch"
        );
        assert_eq!(
            format!("{}", KnxError::address_out_of_range()),
            "Addressing error: OutOfRange"
        );
    }
}
