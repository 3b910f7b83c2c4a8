//! KNX TP1 telegram constants.

/// Maximum payload bytes in one standard telegram
pub const MAX_PAYLOAD_LEN: usize = 14;

/// Control, source (2), destination (2), length, command and checksum
pub const TELEGRAM_OVERHEAD: usize = 8;

/// Smallest valid telegram (empty payload)
pub const MIN_TELEGRAM_LEN: usize = TELEGRAM_OVERHEAD;

/// Largest valid telegram (full payload)
pub const MAX_TELEGRAM_LEN: usize = TELEGRAM_OVERHEAD + MAX_PAYLOAD_LEN;

/// Offset of the routing/length byte
pub const LENGTH_OFFSET: usize = 5;

/// Offset of the command byte
pub const COMMAND_OFFSET: usize = 6;

/// Offset of the first payload byte
pub const PAYLOAD_OFFSET: usize = 7;

/// Default hop count for outbound telegrams
pub const DEFAULT_HOP_COUNT: u8 = 6;

/// Command bits of the command byte
pub const COMMAND_MASK: u8 = 0xC0;

// =============================================================================
// KNX Priority
// =============================================================================

/// KNX message priority levels (control byte bits 3-2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Priority {
    /// System priority
    System = 0b00,
    /// Normal priority
    Normal = 0b01,
    /// Urgent priority
    Urgent = 0b10,
    /// Low priority (default for group communication)
    #[default]
    Low = 0b11,
}

impl Priority {
    /// Convert u8 to Priority
    pub const fn from_u8(value: u8) -> Self {
        match value & 0b11 {
            0b00 => Self::System,
            0b01 => Self::Normal,
            0b10 => Self::Urgent,
            _ => Self::Low,
        }
    }

    /// Convert Priority to u8
    pub const fn to_u8(self) -> u8 {
        self as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_round_trip() {
        for p in [Priority::System, Priority::Normal, Priority::Urgent, Priority::Low] {
            assert_eq!(Priority::from_u8(p.to_u8()), p);
        }
    }

    #[test]
    fn test_telegram_bounds() {
        assert_eq!(MIN_TELEGRAM_LEN, 8);
        assert_eq!(MAX_TELEGRAM_LEN, 22);
    }
}
