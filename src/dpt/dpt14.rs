//! DPT 14.xxx - 4-byte IEEE 754 float (big-endian)

use crate::dpt::{ensure_capacity, ensure_length, DptDecode, DptEncode};
use crate::error::Result;

/// DPT 14.xxx 4-byte float types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Dpt14 {
    /// DPT 14.019 - Electric current (A)
    ElectricCurrent,
    /// DPT 14.027 - Electric potential (V)
    ElectricPotential,
    /// DPT 14.033 - Frequency (Hz)
    Frequency,
    /// DPT 14.056 - Power (W)
    Power,
    /// DPT 14.068 - Temperature (°C)
    Temperature,
}

impl Dpt14 {
    /// Get the DPT identifier string
    pub const fn identifier(&self) -> &'static str {
        match self {
            Dpt14::ElectricCurrent => "14.019",
            Dpt14::ElectricPotential => "14.027",
            Dpt14::Frequency => "14.033",
            Dpt14::Power => "14.056",
            Dpt14::Temperature => "14.068",
        }
    }

    /// Get the unit string
    pub const fn unit(&self) -> &'static str {
        match self {
            Dpt14::ElectricCurrent => "A",
            Dpt14::ElectricPotential => "V",
            Dpt14::Frequency => "Hz",
            Dpt14::Power => "W",
            Dpt14::Temperature => "°C",
        }
    }
}

impl DptEncode<f32> for Dpt14 {
    fn encode(&self, value: f32, buf: &mut [u8]) -> Result<usize> {
        ensure_capacity(buf, 4)?;
        buf[..4].copy_from_slice(&value.to_be_bytes());
        Ok(4)
    }
}

impl DptDecode<f32> for Dpt14 {
    /// Fewer than 4 bytes is a decode error.
    fn decode(&self, data: &[u8]) -> Result<f32> {
        ensure_length(data, 4)?;
        Ok(f32::from_be_bytes([data[0], data[1], data[2], data[3]]))
    }
}
