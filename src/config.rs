//! Startup configuration.
//!
//! The device is configured from a `KEY=value` text block, typically embedded
//! in firmware as a `const &str`:
//!
//! ```text
//! # device
//! PHYSICAL_ADDRESS=1.1.200
//!
//! GROUP_ADDRESS=kitchen_light,1/2/3
//! GROUP_ADDRESS=kitchen_light_state,1/2/4
//! GROUP_ADDRESS=clock,0/0/1
//!
//! TIME_BROADCAST_GA=clock
//! TIME_BROADCAST_INTERVAL_MS=60000
//! ```
//!
//! Parsing is fail-fast: the first bad line aborts with an error and nothing
//! is returned.

use crate::addressing::{parse_physical, PhysicalAddress};
use crate::error::{KnxError, Result};
use crate::registry::{symbolic_id, GroupAddressRegistry, SymbolicId};

/// Default period between time broadcasts
pub const DEFAULT_TIME_BROADCAST_INTERVAL_MS: u32 = 60_000;

const PHYSICAL_ADDRESS: &str = "PHYSICAL_ADDRESS";
const GROUP_ADDRESS: &str = "GROUP_ADDRESS";
const TIME_BROADCAST_GA: &str = "TIME_BROADCAST_GA";
const TIME_BROADCAST_INTERVAL_MS: &str = "TIME_BROADCAST_INTERVAL_MS";

/// Periodic time broadcast schedule.
///
/// Works with a wrapping millisecond tick counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeBroadcast {
    /// Symbolic id the time is written to
    pub id: SymbolicId,
    /// Period between broadcasts
    pub interval_ms: u32,
    last_ms: u32,
}

impl TimeBroadcast {
    /// Create a schedule whose first broadcast is due `interval_ms` after tick 0.
    pub fn new(id: &str, interval_ms: u32) -> Result<Self> {
        Ok(Self {
            id: symbolic_id(id)?,
            interval_ms,
            last_ms: 0,
        })
    }

    /// Returns `true` and restarts the period if a broadcast is due at `now_ms`.
    pub fn poll(&mut self, now_ms: u32) -> bool {
        if now_ms.wrapping_sub(self.last_ms) < self.interval_ms {
            return false;
        }
        self.last_ms = now_ms;
        true
    }
}

/// Parsed startup configuration.
#[derive(Debug, Clone)]
pub struct Configuration<const N: usize = 64> {
    /// Own physical address
    pub physical_address: PhysicalAddress,
    /// Symbolic id bindings, in file order
    pub registry: GroupAddressRegistry<N>,
    /// Optional periodic time broadcast
    pub time_broadcast: Option<TimeBroadcast>,
}

impl<const N: usize> Configuration<N> {
    /// Parse a configuration text block.
    ///
    /// # Errors
    ///
    /// - `Config(MissingPhysicalAddress)` when `PHYSICAL_ADDRESS` is absent
    /// - `Config(MalformedLine)` for a line without `=`, a `GROUP_ADDRESS`
    ///   value without `,`, or a non-numeric interval
    /// - `Config(UnknownKey)` for any other key
    /// - `Addressing(_)` for a bad address
    /// - `Registry(DuplicateId)` when an id is bound twice
    /// - `Registry(NotFound)` when `TIME_BROADCAST_GA` names an unbound id
    pub fn parse(text: &str) -> Result<Self> {
        let mut physical_address = None;
        let mut registry = GroupAddressRegistry::new();
        let mut broadcast_id: Option<SymbolicId> = None;
        let mut interval_ms = DEFAULT_TIME_BROADCAST_INTERVAL_MS;

        for (number, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                knx_log!(warn, "Config line {}: missing '='", number + 1);
                return Err(KnxError::malformed_line());
            };
            let value = value.trim();

            match key.trim() {
                PHYSICAL_ADDRESS => physical_address = Some(parse_physical(value)?),
                GROUP_ADDRESS => {
                    let Some((id, address)) = value.split_once(',') else {
                        knx_log!(warn, "Config line {}: expected <id>,<address>", number + 1);
                        return Err(KnxError::malformed_line());
                    };
                    registry.register_str(id.trim(), address.trim())?;
                }
                TIME_BROADCAST_GA => broadcast_id = Some(symbolic_id(value)?),
                TIME_BROADCAST_INTERVAL_MS => {
                    let Ok(ms) = value.parse() else {
                        knx_log!(warn, "Config line {}: bad interval", number + 1);
                        return Err(KnxError::malformed_line());
                    };
                    interval_ms = ms;
                }
                other => {
                    knx_log!(warn, "Config line {}: unknown key {}", number + 1, other);
                    return Err(KnxError::unknown_key());
                }
            }
        }

        let Some(physical_address) = physical_address else {
            return Err(KnxError::missing_physical_address());
        };

        let time_broadcast = match broadcast_id {
            Some(id) => {
                if !registry.contains(&id) {
                    knx_log!(warn, "Time broadcast id {} is not bound", id.as_str());
                    return Err(KnxError::not_found());
                }
                Some(TimeBroadcast {
                    id,
                    interval_ms,
                    last_ms: 0,
                })
            }
            None => None,
        };

        Ok(Self {
            physical_address,
            registry,
            time_broadcast,
        })
    }

    /// Log the resolved configuration at info level.
    pub fn dump(&self) {
        knx_log!(info, "Physical address: {}", self.physical_address);
        for (id, address) in self.registry.iter() {
            knx_log!(info, "  {} = {}", id, address);
        }
        if let Some(broadcast) = &self.time_broadcast {
            knx_log!(
                info,
                "Time broadcast: {} every {} ms",
                broadcast.id.as_str(),
                broadcast.interval_ms
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::addressing::GroupAddress;
    use crate::error::ConfigErrorKind;

    const SAMPLE: &str = "
# kitchen
PHYSICAL_ADDRESS=1.1.200

GROUP_ADDRESS=kitchen_light,1/2/3
GROUP_ADDRESS = kitchen_light_state , 1.2.4
GROUP_ADDRESS=clock,0/0/1
TIME_BROADCAST_GA=clock
TIME_BROADCAST_INTERVAL_MS=30000
";

    fn config_kind(err: &KnxError) -> Option<ConfigErrorKind> {
        match err {
            KnxError::Config(e) => Some(e.kind()),
            _ => None,
        }
    }

    #[test]
    fn test_parse_sample() {
        let config: Configuration<8> = Configuration::parse(SAMPLE).unwrap();
        assert_eq!(config.physical_address, PhysicalAddress::new(1, 1, 200).unwrap());
        assert_eq!(config.registry.len(), 3);
        assert_eq!(
            config.registry.lookup_by_id("kitchen_light_state").unwrap(),
            GroupAddress::new(1, 2, 4).unwrap()
        );

        let broadcast = config.time_broadcast.unwrap();
        assert_eq!(broadcast.id.as_str(), "clock");
        assert_eq!(broadcast.interval_ms, 30_000);
    }

    #[test]
    fn test_default_interval() {
        let config: Configuration<8> = Configuration::parse(
            "PHYSICAL_ADDRESS=1.1.1\nGROUP_ADDRESS=clock,0/0/1\nTIME_BROADCAST_GA=clock",
        )
        .unwrap();
        assert_eq!(
            config.time_broadcast.unwrap().interval_ms,
            DEFAULT_TIME_BROADCAST_INTERVAL_MS
        );
    }

    #[test]
    fn test_missing_physical_address() {
        let err = Configuration::<8>::parse("GROUP_ADDRESS=a,1/2/3").unwrap_err();
        assert_eq!(config_kind(&err), Some(ConfigErrorKind::MissingPhysicalAddress));
    }

    #[test]
    fn test_malformed_lines() {
        let err = Configuration::<8>::parse("PHYSICAL_ADDRESS 1.1.1").unwrap_err();
        assert_eq!(config_kind(&err), Some(ConfigErrorKind::MalformedLine));

        let err = Configuration::<8>::parse("PHYSICAL_ADDRESS=1.1.1\nGROUP_ADDRESS=a 1/2/3")
            .unwrap_err();
        assert_eq!(config_kind(&err), Some(ConfigErrorKind::MalformedLine));

        let err =
            Configuration::<8>::parse("PHYSICAL_ADDRESS=1.1.1\nTIME_BROADCAST_INTERVAL_MS=soon")
                .unwrap_err();
        assert_eq!(config_kind(&err), Some(ConfigErrorKind::MalformedLine));
    }

    #[test]
    fn test_unknown_key() {
        let err = Configuration::<8>::parse("PHYSICAL_ADDRESS=1.1.1\nWIFI_NETWORK=home")
            .unwrap_err();
        assert_eq!(config_kind(&err), Some(ConfigErrorKind::UnknownKey));
    }

    #[test]
    fn test_bad_addresses_fail_fast() {
        assert!(Configuration::<8>::parse("PHYSICAL_ADDRESS=1.8.1")
            .unwrap_err()
            .is_address_error());
        assert!(Configuration::<8>::parse("PHYSICAL_ADDRESS=1.1.1\nGROUP_ADDRESS=a,32/0/0")
            .unwrap_err()
            .is_address_error());
    }

    #[test]
    fn test_duplicate_id_fails() {
        let err = Configuration::<8>::parse(
            "PHYSICAL_ADDRESS=1.1.1\nGROUP_ADDRESS=a,1/2/3\nGROUP_ADDRESS=a,1/2/4",
        )
        .unwrap_err();
        assert!(err.is_duplicate_id());
    }

    #[test]
    fn test_unbound_time_broadcast_id() {
        let err = Configuration::<8>::parse("PHYSICAL_ADDRESS=1.1.1\nTIME_BROADCAST_GA=clock")
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_time_broadcast_poll() {
        let mut schedule = TimeBroadcast::new("clock", 100).unwrap();
        assert!(!schedule.poll(99));
        assert!(schedule.poll(100));
        assert!(!schedule.poll(150));
        assert!(schedule.poll(200));

        // Tick counter wrap
        let mut schedule = TimeBroadcast::new("clock", 100).unwrap();
        assert!(schedule.poll(u32::MAX - 10));
        assert!(!schedule.poll(20));
        assert!(schedule.poll(90));
    }
}
