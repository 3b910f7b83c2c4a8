//! DPT 1.xxx - Boolean (1-bit)
//!
//! Boolean datapoint types represent binary states (on/off, true/false, etc.)
//! encoded in the LSB of a single payload byte.
//!
//! ## Common Subtypes
//!
//! - **1.001** - Switch (off/on)
//! - **1.002** - Bool (false/true)
//! - **1.003** - Enable (disable/enable)
//! - **1.008** - UpDown (up/down)
//! - **1.009** - OpenClose (open/close)
//!
//! ## Example
//!
//! ```
//! use knx_tp::dpt::{Dpt1, DptDecode};
//!
//! assert_eq!(Dpt1::Switch.encode_to_byte(true), 0x01);
//! assert!(!Dpt1::Switch.decode(&[0x00])?);
//! # Ok::<(), knx_tp::KnxError>(())
//! ```

use crate::dpt::{ensure_capacity, DptDecode, DptEncode};
use crate::error::Result;

/// DPT 1.xxx Boolean types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Dpt1 {
    /// DPT 1.001 - Switch (off/on)
    Switch,
    /// DPT 1.002 - Bool (false/true)
    Bool,
    /// DPT 1.003 - Enable (disable/enable)
    Enable,
    /// DPT 1.005 - Alarm (no alarm/alarm)
    Alarm,
    /// DPT 1.008 - UpDown (up/down)
    UpDown,
    /// DPT 1.009 - OpenClose (open/close)
    OpenClose,
    /// DPT 1.010 - Start (stop/start)
    Start,
    /// DPT 1.011 - State (inactive/active)
    State,
}

impl Dpt1 {
    /// Get the DPT identifier string (e.g., "1.001")
    pub const fn identifier(&self) -> &'static str {
        match self {
            Dpt1::Switch => "1.001",
            Dpt1::Bool => "1.002",
            Dpt1::Enable => "1.003",
            Dpt1::Alarm => "1.005",
            Dpt1::UpDown => "1.008",
            Dpt1::OpenClose => "1.009",
            Dpt1::Start => "1.010",
            Dpt1::State => "1.011",
        }
    }

    /// Semantic labels for (false, true)
    pub const fn labels(&self) -> (&'static str, &'static str) {
        match self {
            Dpt1::Switch => ("off", "on"),
            Dpt1::Bool => ("false", "true"),
            Dpt1::Enable => ("disable", "enable"),
            Dpt1::Alarm => ("no alarm", "alarm"),
            Dpt1::UpDown => ("up", "down"),
            Dpt1::OpenClose => ("open", "close"),
            Dpt1::Start => ("stop", "start"),
            Dpt1::State => ("inactive", "active"),
        }
    }

    /// Encode to the single payload byte
    #[inline]
    pub const fn encode_to_byte(&self, value: bool) -> u8 {
        value as u8
    }
}

impl DptEncode<bool> for Dpt1 {
    fn encode(&self, value: bool, buf: &mut [u8]) -> Result<usize> {
        ensure_capacity(buf, 1)?;
        buf[0] = self.encode_to_byte(value);
        Ok(1)
    }
}

impl DptDecode<bool> for Dpt1 {
    /// Only the LSB matters. An empty payload decodes as `false`.
    fn decode(&self, data: &[u8]) -> Result<bool> {
        Ok(data.first().is_some_and(|b| b & 0x01 != 0))
    }
}
