//! DPT 20.102 - HVAC Mode (1 byte enumeration)

use crate::dpt::{ensure_capacity, DptDecode, DptEncode};
use crate::error::Result;

/// HVAC operating mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum HvacMode {
    #[default]
    Auto = 0,
    Comfort = 1,
    Standby = 2,
    /// Night setback
    Economy = 3,
    /// Frost / heat protection
    BuildingProtection = 4,
}

impl HvacMode {
    /// Mode for an ordinal, `None` for values above 4.
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Auto),
            1 => Some(Self::Comfort),
            2 => Some(Self::Standby),
            3 => Some(Self::Economy),
            4 => Some(Self::BuildingProtection),
            _ => None,
        }
    }
}

/// DPT 20.xxx enumeration types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Dpt20 {
    /// DPT 20.102 - HVAC mode
    HvacMode,
}

impl Dpt20 {
    /// Get the DPT identifier string
    pub const fn identifier(&self) -> &'static str {
        "20.102"
    }
}

impl DptEncode<HvacMode> for Dpt20 {
    fn encode(&self, value: HvacMode, buf: &mut [u8]) -> Result<usize> {
        ensure_capacity(buf, 1)?;
        buf[0] = value as u8;
        Ok(1)
    }
}

impl DptDecode<HvacMode> for Dpt20 {
    /// Empty payloads and unknown ordinals decode as [`HvacMode::Auto`].
    fn decode(&self, data: &[u8]) -> Result<HvacMode> {
        Ok(data
            .first()
            .and_then(|b| HvacMode::from_u8(*b))
            .unwrap_or_default())
    }
}
