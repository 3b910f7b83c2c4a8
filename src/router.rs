//! Telegram dispatch between the bus and its consumers.
//!
//! [`DispatchRouter`] owns the [`GroupAddressRegistry`], the stream framer and
//! the transport. Outbound, it resolves symbolic ids and hands finished frames
//! to the transport. Inbound, it validates telegrams and notifies every
//! listener registered for any id that aliases the destination address.
//!
//! Listeners receive a [`GroupSender`] during notification, so they can answer
//! a read or echo a state change without holding a reference to the router.
//!
//! ## Example
//!
//! ```
//! use core::cell::Cell;
//! use knx_tp::router::{DispatchRouter, GroupSender, TelegramListener};
//! use knx_tp::registry::GroupAddressRegistry;
//! use knx_tp::transport::Transport;
//! use knx_tp::{ga, pa};
//!
//! #[derive(Default)]
//! struct Wire {
//!     sent: Vec<Vec<u8>>,
//! }
//!
//! impl Transport for Wire {
//!     fn transmit(&mut self, frame: &[u8]) -> knx_tp::Result<()> {
//!         self.sent.push(frame.to_vec());
//!         Ok(())
//!     }
//! }
//!
//! struct Lamp {
//!     on: Cell<bool>,
//! }
//!
//! impl TelegramListener for Lamp {
//!     fn on_telegram(&self, _id: &str, payload: &[u8], bus: &mut dyn GroupSender) {
//!         let on = payload.first().is_some_and(|b| b & 1 != 0);
//!         self.on.set(on);
//!         let _ = bus.send_group_write("lamp_state", &[u8::from(on)]);
//!     }
//! }
//!
//! let mut registry: GroupAddressRegistry = GroupAddressRegistry::new();
//! registry.register("lamp", ga!(1/2/3))?;
//! registry.register("lamp_state", ga!(1/2/4))?;
//!
//! let lamp = Lamp { on: Cell::new(false) };
//! let mut router: DispatchRouter<'_, Wire> =
//!     DispatchRouter::new(pa!(1 . 1 . 200), registry, Wire::default());
//! router.register_listener("lamp", &lamp)?;
//!
//! let frame = knx_tp::protocol::build(
//!     knx_tp::protocol::Command::GroupValueWrite,
//!     pa!(1 . 1 . 10),
//!     ga!(1/2/3).into(),
//!     &[0x01],
//! )?;
//! assert_eq!(router.on_inbound_telegram(&frame)?, 1);
//! assert!(lamp.on.get());
//! assert_eq!(router.transport().sent.len(), 1);
//! # Ok::<(), knx_tp::KnxError>(())
//! ```

use crate::addressing::{Destination, GroupAddress, PhysicalAddress};
use crate::config::{Configuration, TimeBroadcast};
use crate::dpt::{DateTime, DptValue};
use crate::error::{KnxError, Result};
use crate::protocol::constants::MAX_TELEGRAM_LEN;
use crate::protocol::{build, Command, StreamFramer, Telegram};
use crate::registry::{symbolic_id, GroupAddressRegistry, SymbolicId};
use crate::transport::Transport;

/// Maximum number of telegram monitors per router
pub const MAX_MONITORS: usize = 4;

/// Consumer of group telegrams for one or more symbolic ids.
///
/// Implementations use interior mutability for their own state. Errors are
/// the listener's own business and never reach the router.
pub trait TelegramListener {
    /// A GroupValueWrite or GroupValueResponse arrived for `id`.
    fn on_telegram(&self, id: &str, payload: &[u8], bus: &mut dyn GroupSender);

    /// A GroupValueRead arrived for `id`.
    ///
    /// Forwarded to [`Self::on_telegram`] with an empty payload by default.
    /// Override to answer with [`GroupSender::send_group_response`].
    fn on_read(&self, id: &str, bus: &mut dyn GroupSender) {
        self.on_telegram(id, &[], bus);
    }
}

/// Observer of every valid inbound telegram, registered or not.
pub trait TelegramMonitor {
    /// Called once per valid telegram, before any listener.
    fn on_telegram(&self, telegram: &Telegram<'_>);
}

/// Send primitives available to listeners during notification.
pub trait GroupSender {
    /// Send a GroupValueWrite to the address bound to `id`.
    ///
    /// # Errors
    ///
    /// `Registry(NotFound)` for an unknown id, `Transport(NotReady)` when the
    /// bus is down, or whatever the transport reports. Nothing is sent on error.
    fn send_group_write(&mut self, id: &str, payload: &[u8]) -> Result<()>;

    /// Send a GroupValueRead (empty payload) to the address bound to `id`.
    fn send_group_read(&mut self, id: &str) -> Result<()>;

    /// Send a GroupValueResponse to the address bound to `id`.
    fn send_group_response(&mut self, id: &str, payload: &[u8]) -> Result<()>;

    /// Encode `value` and send it as a GroupValueWrite.
    fn write_value(&mut self, id: &str, value: &DptValue) -> Result<()> {
        let payload = value.encode()?;
        self.send_group_write(id, &payload)
    }

    /// Encode `value` and send it as a GroupValueResponse.
    fn respond_value(&mut self, id: &str, value: &DptValue) -> Result<()> {
        let payload = value.encode()?;
        self.send_group_response(id, &payload)
    }
}

type Registration<'a> = (SymbolicId, &'a dyn TelegramListener);

/// Outbound half of the router, borrowed apart from the listener table.
struct Bus<'r, T: Transport, const N: usize> {
    source: PhysicalAddress,
    registry: &'r GroupAddressRegistry<N>,
    transport: &'r mut T,
}

impl<T: Transport, const N: usize> Bus<'_, T, N> {
    fn resolve(&self, id: &str) -> Result<GroupAddress> {
        self.registry.lookup_by_id(id).inspect_err(|_| {
            knx_log!(warn, "Send to unknown group address id {}", id);
        })
    }

    fn send_to_id(&mut self, command: Command, id: &str, payload: &[u8]) -> Result<()> {
        let address = self.resolve(id)?;
        knx_log!(debug, "{} {} -> {} ({} bytes)", command, id, address, payload.len());
        self.send(command, Destination::Group(address), payload)
    }

    fn send(&mut self, command: Command, destination: Destination, payload: &[u8]) -> Result<()> {
        if !self.transport.is_ready() {
            knx_log!(warn, "Bus not ready, dropping {} to {}", command, destination);
            return Err(KnxError::not_ready());
        }
        let frame = build(command, self.source, destination, payload)?;
        self.transport.transmit(&frame)
    }
}

impl<T: Transport, const N: usize> GroupSender for Bus<'_, T, N> {
    fn send_group_write(&mut self, id: &str, payload: &[u8]) -> Result<()> {
        self.send_to_id(Command::GroupValueWrite, id, payload)
    }

    fn send_group_read(&mut self, id: &str) -> Result<()> {
        self.send_to_id(Command::GroupValueRead, id, &[])
    }

    fn send_group_response(&mut self, id: &str, payload: &[u8]) -> Result<()> {
        self.send_to_id(Command::GroupValueResponse, id, payload)
    }
}

/// Protocol engine for one device on the bus.
///
/// - `N`: registry capacity (symbolic ids)
/// - `L`: listener registrations
pub struct DispatchRouter<'a, T: Transport, const N: usize = 64, const L: usize = 32> {
    address: PhysicalAddress,
    registry: GroupAddressRegistry<N>,
    listeners: heapless::Vec<Registration<'a>, L>,
    monitors: heapless::Vec<&'a dyn TelegramMonitor, MAX_MONITORS>,
    transport: T,
    framer: StreamFramer,
    time_broadcast: Option<TimeBroadcast>,
}

impl<T: Transport, const N: usize, const L: usize> core::fmt::Debug for DispatchRouter<'_, T, N, L> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DispatchRouter")
            .field("address", &self.address)
            .field("ids", &self.registry.len())
            .field("listeners", &self.listeners.len())
            .field("monitors", &self.monitors.len())
            .field("framer", &self.framer.state())
            .finish_non_exhaustive()
    }
}

impl<'a, T: Transport, const N: usize, const L: usize> DispatchRouter<'a, T, N, L> {
    /// Create a router sending as `address`.
    pub fn new(address: PhysicalAddress, registry: GroupAddressRegistry<N>, transport: T) -> Self {
        Self {
            address,
            registry,
            listeners: heapless::Vec::new(),
            monitors: heapless::Vec::new(),
            transport,
            framer: StreamFramer::new(),
            time_broadcast: None,
        }
    }

    /// Create a router from a parsed configuration.
    ///
    /// Consumes the configuration's registry and time broadcast settings.
    pub fn from_config(config: Configuration<N>, transport: T) -> Self {
        config.dump();
        let Configuration {
            physical_address,
            registry,
            time_broadcast,
        } = config;
        let mut router = Self::new(physical_address, registry, transport);
        router.time_broadcast = time_broadcast;
        router
    }

    /// Own physical address
    pub const fn address(&self) -> PhysicalAddress {
        self.address
    }

    /// Group address registry
    pub const fn registry(&self) -> &GroupAddressRegistry<N> {
        &self.registry
    }

    /// Underlying transport
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Underlying transport, mutably
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Inbound stream framer
    pub const fn framer(&self) -> &StreamFramer {
        &self.framer
    }

    /// Configured time broadcast, if any
    pub const fn time_broadcast(&self) -> Option<&TimeBroadcast> {
        self.time_broadcast.as_ref()
    }

    /// Number of listener registrations
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Register `listener` for `id`.
    ///
    /// Registrations are kept in order and never deduplicated. The id does not
    /// have to be in the registry yet.
    ///
    /// # Errors
    ///
    /// `Registry(IdTooLong)` or `Registry(CapacityExceeded)`.
    pub fn register_listener(&mut self, id: &str, listener: &'a dyn TelegramListener) -> Result<()> {
        let id = symbolic_id(id)?;
        if self.listeners.push((id, listener)).is_err() {
            return Err(KnxError::capacity_exceeded());
        }
        Ok(())
    }

    /// Register `listener` for each of `ids`, stopping at the first failure.
    pub fn register_listener_for(
        &mut self,
        ids: &[&str],
        listener: &'a dyn TelegramListener,
    ) -> Result<()> {
        for id in ids {
            self.register_listener(id, listener)?;
        }
        Ok(())
    }

    /// Register a monitor that sees every valid inbound telegram.
    pub fn register_monitor(&mut self, monitor: &'a dyn TelegramMonitor) -> Result<()> {
        if self.monitors.push(monitor).is_err() {
            return Err(KnxError::capacity_exceeded());
        }
        Ok(())
    }

    fn bus(&mut self) -> Bus<'_, T, N> {
        Bus {
            source: self.address,
            registry: &self.registry,
            transport: &mut self.transport,
        }
    }

    /// Send a GroupValueWrite to the address bound to `id`.
    pub fn send_group_write(&mut self, id: &str, payload: &[u8]) -> Result<()> {
        self.bus().send_group_write(id, payload)
    }

    /// Send a GroupValueRead to the address bound to `id`.
    pub fn send_group_read(&mut self, id: &str) -> Result<()> {
        self.bus().send_group_read(id)
    }

    /// Send a GroupValueResponse to the address bound to `id`.
    pub fn send_group_response(&mut self, id: &str, payload: &[u8]) -> Result<()> {
        self.bus().send_group_response(id, payload)
    }

    /// Encode `value` and send it as a GroupValueWrite.
    pub fn write_value(&mut self, id: &str, value: &DptValue) -> Result<()> {
        self.bus().write_value(id, value)
    }

    /// Encode `value` and send it as a GroupValueResponse.
    pub fn respond_value(&mut self, id: &str, value: &DptValue) -> Result<()> {
        self.bus().respond_value(id, value)
    }

    /// Send to an explicit group or device address, bypassing the registry.
    pub fn send_telegram(
        &mut self,
        destination: Destination,
        command: Command,
        payload: &[u8],
    ) -> Result<()> {
        knx_log!(debug, "{} -> {} ({} bytes)", command, destination, payload.len());
        self.bus().send(command, destination, payload)
    }

    /// Send `now` as a DPT 19.001 GroupValueWrite to `id`.
    pub fn broadcast_time(&mut self, id: &str, now: &DateTime) -> Result<()> {
        self.write_value(id, &DptValue::DateTime(*now))
    }

    /// Broadcast the time if the configured interval has elapsed.
    ///
    /// `clock` is only called when a broadcast is due and returns `None` while
    /// the time source is unsynchronized. Returns whether a telegram was sent.
    pub fn poll_time_broadcast(
        &mut self,
        now_ms: u32,
        clock: impl FnOnce() -> Option<DateTime>,
    ) -> Result<bool> {
        let Some(schedule) = self.time_broadcast.as_mut() else {
            return Ok(false);
        };
        if !self.transport.is_ready() || !schedule.poll(now_ms) {
            return Ok(false);
        }
        let id = schedule.id.clone();
        let Some(now) = clock() else {
            knx_log!(debug, "Clock not set, skipping time broadcast");
            return Ok(false);
        };
        self.broadcast_time(&id, &now)?;
        Ok(true)
    }

    /// Validate one complete telegram and dispatch it.
    ///
    /// Returns the number of listener notifications.
    ///
    /// # Errors
    ///
    /// Any `Frame` error from parsing. The telegram is dropped and the router
    /// stays usable.
    pub fn on_inbound_telegram(&mut self, bytes: &[u8]) -> Result<usize> {
        let telegram = Telegram::parse(bytes).inspect_err(|e| {
            knx_log!(warn, "Dropped malformed telegram: {}", e);
        })?;

        let Self {
            address,
            registry,
            listeners,
            monitors,
            transport,
            ..
        } = self;
        let mut bus = Bus {
            source: *address,
            registry,
            transport,
        };
        Ok(Self::dispatch(&telegram, &mut bus, listeners, monitors))
    }

    /// Feed raw bytes from a streaming transport.
    ///
    /// Malformed telegrams are dropped by the framer and never abort the
    /// stream. Returns the number of listener notifications.
    pub fn on_inbound_bytes(&mut self, bytes: &[u8]) -> usize {
        let Self {
            address,
            registry,
            listeners,
            monitors,
            transport,
            framer,
            ..
        } = self;
        let mut bus = Bus {
            source: *address,
            registry,
            transport,
        };

        let mut notified = 0;
        for &byte in bytes {
            if let Some(Ok(telegram)) = framer.push(byte) {
                notified += Self::dispatch(&telegram, &mut bus, listeners, monitors);
            }
            while let Some(result) = framer.resume() {
                if let Ok(telegram) = result {
                    notified += Self::dispatch(&telegram, &mut bus, listeners, monitors);
                }
            }
        }
        notified
    }

    /// Signal an inter-byte gap from the transport.
    ///
    /// # Errors
    ///
    /// `Frame(TooShort)` if a partial telegram was discarded.
    pub fn end_of_frame(&mut self) -> Result<()> {
        self.framer.end_of_frame()
    }

    /// Drain the transport's receive side through the framer.
    pub fn poll(&mut self) -> Result<usize> {
        let mut buf = [0u8; MAX_TELEGRAM_LEN];
        let mut notified = 0;
        loop {
            let n = self.transport.receive(&mut buf)?;
            if n == 0 {
                return Ok(notified);
            }
            notified += self.on_inbound_bytes(&buf[..n]);
        }
    }

    fn dispatch(
        telegram: &Telegram<'_>,
        bus: &mut Bus<'_, T, N>,
        listeners: &[Registration<'a>],
        monitors: &[&'a dyn TelegramMonitor],
    ) -> usize {
        for monitor in monitors {
            monitor.on_telegram(telegram);
        }

        let Destination::Group(address) = telegram.destination else {
            return 0;
        };

        // The registry outlives the bus borrow handed to listeners.
        let registry = bus.registry;
        let mut notified = 0;
        for id in registry.lookup_by_address(address) {
            for (_, listener) in listeners.iter().filter(|(bound, _)| bound.as_str() == id) {
                match telegram.command {
                    Command::GroupValueRead => listener.on_read(id, bus),
                    Command::GroupValueWrite | Command::GroupValueResponse => {
                        listener.on_telegram(id, telegram.payload(), bus);
                    }
                }
                notified += 1;
            }
        }

        if notified == 0 {
            knx_log!(trace, "No listener for {} {}", telegram.command, address);
        }
        notified
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dpt::{DatapointType, Dpt19};
    use crate::transport::mock::MockTransport;
    use core::cell::{Cell, RefCell};

    #[derive(Default)]
    struct Recorder {
        seen: RefCell<Vec<(String, Vec<u8>)>>,
        reads: Cell<usize>,
    }

    impl TelegramListener for Recorder {
        fn on_telegram(&self, id: &str, payload: &[u8], _bus: &mut dyn GroupSender) {
            self.seen.borrow_mut().push((id.to_string(), payload.to_vec()));
        }

        fn on_read(&self, _id: &str, _bus: &mut dyn GroupSender) {
            self.reads.set(self.reads.get() + 1);
        }
    }

    struct Responder;

    impl TelegramListener for Responder {
        fn on_telegram(&self, _id: &str, _payload: &[u8], _bus: &mut dyn GroupSender) {}

        fn on_read(&self, id: &str, bus: &mut dyn GroupSender) {
            bus.write_value("state", &DptValue::Bool(true)).unwrap();
            bus.send_group_response(id, &[0x2A]).unwrap();
        }
    }

    #[derive(Default)]
    struct Counter {
        count: Cell<usize>,
    }

    impl TelegramMonitor for Counter {
        fn on_telegram(&self, _telegram: &Telegram<'_>) {
            self.count.set(self.count.get() + 1);
        }
    }

    fn ga(main: u8, middle: u8, sub: u8) -> GroupAddress {
        GroupAddress::new(main, middle, sub).unwrap()
    }

    fn router<'a>() -> DispatchRouter<'a, MockTransport, 8, 8> {
        let mut registry = GroupAddressRegistry::new();
        registry.register("light", ga(1, 2, 3)).unwrap();
        registry.register("light_alias", ga(1, 2, 3)).unwrap();
        registry.register("state", ga(1, 2, 4)).unwrap();
        DispatchRouter::new(
            PhysicalAddress::new(1, 1, 200).unwrap(),
            registry,
            MockTransport::new(),
        )
    }

    fn inbound(command: Command, destination: GroupAddress, payload: &[u8]) -> Vec<u8> {
        build(
            command,
            PhysicalAddress::new(1, 1, 10).unwrap(),
            destination.into(),
            payload,
        )
        .unwrap()
        .to_vec()
    }

    #[test]
    fn test_send_group_write() {
        let mut router = router();
        router.send_group_write("light", &[0x01]).unwrap();

        let sent = router.transport().last_sent().unwrap();
        let telegram = Telegram::parse(sent).unwrap();
        assert_eq!(telegram.command, Command::GroupValueWrite);
        assert_eq!(telegram.destination, Destination::Group(ga(1, 2, 3)));
        assert_eq!(telegram.source, PhysicalAddress::new(1, 1, 200).unwrap());
        assert_eq!(telegram.payload(), &[0x01]);
    }

    #[test]
    fn test_send_group_read_has_empty_payload() {
        let mut router = router();
        router.send_group_read("state").unwrap();

        let telegram = Telegram::parse(router.transport().last_sent().unwrap()).unwrap();
        assert!(telegram.is_group_read());
        assert!(telegram.payload().is_empty());
    }

    #[test]
    fn test_send_unknown_id_sends_nothing() {
        let mut router = router();
        let err = router.send_group_write("missing", &[0x01]).unwrap_err();
        assert!(err.is_not_found());
        assert!(router.send_group_read("missing").unwrap_err().is_not_found());
        assert!(router.transport().sent_frames().is_empty());
    }

    #[test]
    fn test_send_when_not_ready() {
        let mut router = router();
        router.transport_mut().set_ready(false);
        let err = router.send_group_write("light", &[0x01]).unwrap_err();
        assert!(matches!(
            err,
            KnxError::Transport(ref e) if e.kind() == crate::error::TransportErrorKind::NotReady
        ));
        assert!(router.transport().sent_frames().is_empty());
    }

    #[test]
    fn test_write_value_encodes() {
        let mut router = router();
        router.write_value("state", &DptValue::Float16(21.0)).unwrap();
        let telegram = Telegram::parse(router.transport().last_sent().unwrap()).unwrap();
        assert_eq!(telegram.payload(), &[0x0C, 0x1A]);
    }

    #[test]
    fn test_respond_value_encodes() {
        let mut router = router();
        router.respond_value("state", &DptValue::Percentage(50.0)).unwrap();
        let telegram = Telegram::parse(router.transport().last_sent().unwrap()).unwrap();
        assert!(telegram.is_group_response());
        assert_eq!(telegram.payload(), &[0x80]);
    }

    #[test]
    fn test_send_telegram_to_device() {
        let mut router = router();
        let device = PhysicalAddress::new(1, 1, 5).unwrap();
        router
            .send_telegram(device.into(), Command::GroupValueWrite, &[0x07])
            .unwrap();
        let telegram = Telegram::parse(router.transport().last_sent().unwrap()).unwrap();
        assert_eq!(telegram.destination, Destination::Physical(device));
    }

    #[test]
    fn test_broadcast_time() {
        let mut router = router();
        let now = DateTime::new(2024, 5, 17, 12, 30, 15);
        router.broadcast_time("state", &now).unwrap();

        let telegram = Telegram::parse(router.transport().last_sent().unwrap()).unwrap();
        assert_eq!(telegram.payload().len(), 8);
        let decoded = DatapointType::Dpt19(Dpt19::DateTime)
            .decode(telegram.payload())
            .unwrap();
        assert_eq!(decoded, DptValue::DateTime(now));
    }

    #[test]
    fn test_fan_out_to_aliases() {
        let recorder = Recorder::default();
        let mut router = router();
        router.register_listener("light", &recorder).unwrap();
        router.register_listener("light_alias", &recorder).unwrap();
        router.register_listener("state", &recorder).unwrap();

        let notified = router
            .on_inbound_telegram(&inbound(Command::GroupValueWrite, ga(1, 2, 3), &[0x01]))
            .unwrap();
        assert_eq!(notified, 2);

        let seen = recorder.seen.borrow();
        assert_eq!(seen[0], ("light".to_string(), vec![0x01]));
        assert_eq!(seen[1], ("light_alias".to_string(), vec![0x01]));
    }

    #[test]
    fn test_duplicate_registrations_notify_twice() {
        let recorder = Recorder::default();
        let mut router = router();
        router.register_listener_for(&["state", "state"], &recorder).unwrap();
        assert_eq!(router.listener_count(), 2);

        let notified = router
            .on_inbound_telegram(&inbound(Command::GroupValueResponse, ga(1, 2, 4), &[0x00]))
            .unwrap();
        assert_eq!(notified, 2);
    }

    #[test]
    fn test_read_goes_to_on_read() {
        let recorder = Recorder::default();
        let mut router = router();
        router.register_listener("state", &recorder).unwrap();

        router
            .on_inbound_telegram(&inbound(Command::GroupValueRead, ga(1, 2, 4), &[]))
            .unwrap();
        assert_eq!(recorder.reads.get(), 1);
        assert!(recorder.seen.borrow().is_empty());
    }

    #[test]
    fn test_read_defaults_to_on_telegram() {
        #[derive(Default)]
        struct WriteOnly {
            seen: RefCell<Vec<(String, Vec<u8>)>>,
        }

        impl TelegramListener for WriteOnly {
            fn on_telegram(&self, id: &str, payload: &[u8], _bus: &mut dyn GroupSender) {
                self.seen.borrow_mut().push((id.to_string(), payload.to_vec()));
            }
        }

        let listener = WriteOnly::default();
        let mut router = router();
        router.register_listener("state", &listener).unwrap();

        let notified = router
            .on_inbound_telegram(&inbound(Command::GroupValueRead, ga(1, 2, 4), &[]))
            .unwrap();
        assert_eq!(notified, 1);
        assert_eq!(*listener.seen.borrow(), vec![("state".to_string(), vec![])]);
    }

    #[test]
    fn test_stray_control_byte_before_telegrams() {
        let recorder = Recorder::default();
        let mut router = router();
        router.register_listener("light", &recorder).unwrap();

        let mut bytes = vec![0xBC];
        for _ in 0..5 {
            bytes.extend_from_slice(&inbound(Command::GroupValueWrite, ga(1, 2, 3), &[0x01]));
        }
        assert_eq!(router.on_inbound_bytes(&bytes), 5);
        assert_eq!(recorder.seen.borrow().len(), 5);
    }

    #[test]
    fn test_listener_can_send_during_notification() {
        let responder = Responder;
        let mut router = router();
        router.register_listener("light", &responder).unwrap();

        router
            .on_inbound_telegram(&inbound(Command::GroupValueRead, ga(1, 2, 3), &[]))
            .unwrap();

        let sent = router.transport().sent_frames();
        assert_eq!(sent.len(), 2);
        let echo = Telegram::parse(&sent[0]).unwrap();
        assert_eq!(echo.destination, Destination::Group(ga(1, 2, 4)));
        let response = Telegram::parse(&sent[1]).unwrap();
        assert!(response.is_group_response());
        assert_eq!(response.payload(), &[0x2A]);
    }

    #[test]
    fn test_monitor_sees_unregistered_addresses() {
        let counter = Counter::default();
        let recorder = Recorder::default();
        let mut router = router();
        router.register_monitor(&counter).unwrap();
        router.register_listener("light", &recorder).unwrap();

        let notified = router
            .on_inbound_telegram(&inbound(Command::GroupValueWrite, ga(9, 0, 1), &[0x01]))
            .unwrap();
        assert_eq!(notified, 0);
        assert_eq!(counter.count.get(), 1);
    }

    #[test]
    fn test_malformed_telegram_is_dropped() {
        let recorder = Recorder::default();
        let mut router = router();
        router.register_listener("light", &recorder).unwrap();

        let mut frame = inbound(Command::GroupValueWrite, ga(1, 2, 3), &[0x01]);
        let last = frame.len() - 1;
        frame[last] ^= 0x01;
        assert!(router.on_inbound_telegram(&frame).unwrap_err().is_checksum_mismatch());
        assert!(router.on_inbound_telegram(&frame[..4]).unwrap_err().is_too_short());
        assert!(recorder.seen.borrow().is_empty());

        // Still usable afterwards
        let good = inbound(Command::GroupValueWrite, ga(1, 2, 3), &[0x00]);
        assert_eq!(router.on_inbound_telegram(&good).unwrap(), 1);
    }

    #[test]
    fn test_inbound_bytes_resync_after_garbage() {
        let recorder = Recorder::default();
        let mut router = router();
        router.register_listener("light", &recorder).unwrap();

        let mut stream = vec![0x00, 0xFF, 0x13];
        stream.extend(inbound(Command::GroupValueWrite, ga(1, 2, 3), &[0x01]));
        stream.extend(inbound(Command::GroupValueWrite, ga(1, 2, 3), &[0x00]));

        assert_eq!(router.on_inbound_bytes(&stream), 2);
        assert_eq!(recorder.seen.borrow().len(), 2);
    }

    #[test]
    fn test_poll_drains_transport() {
        let recorder = Recorder::default();
        let mut router = router();
        router.register_listener("state", &recorder).unwrap();

        let frame = inbound(Command::GroupValueWrite, ga(1, 2, 4), &[0x0C, 0x1A]);
        router.transport_mut().inject(&frame);
        router.transport_mut().inject(&frame);

        assert_eq!(router.poll().unwrap(), 2);
        assert_eq!(router.transport().pending_inbound(), 0);
    }

    #[test]
    fn test_listener_capacity() {
        let recorder = Recorder::default();
        let mut router: DispatchRouter<'_, MockTransport, 8, 1> = DispatchRouter::new(
            PhysicalAddress::new(1, 1, 1).unwrap(),
            GroupAddressRegistry::new(),
            MockTransport::new(),
        );
        router.register_listener("a", &recorder).unwrap();
        assert!(matches!(
            router.register_listener("b", &recorder).unwrap_err(),
            KnxError::Registry(ref e) if e.kind() == crate::error::RegistryErrorKind::CapacityExceeded
        ));
    }

    #[test]
    fn test_poll_time_broadcast() {
        let config = Configuration::<8>::parse(
            "PHYSICAL_ADDRESS=1.1.200\n\
             GROUP_ADDRESS=clock,0/0/1\n\
             TIME_BROADCAST_GA=clock\n\
             TIME_BROADCAST_INTERVAL_MS=1000\n",
        )
        .unwrap();
        let mut router: DispatchRouter<'_, MockTransport, 8, 8> =
            DispatchRouter::from_config(config, MockTransport::new());
        let now = || Some(DateTime::new(2024, 1, 1, 0, 0, 0));

        assert!(!router.poll_time_broadcast(500, now).unwrap());
        assert!(router.poll_time_broadcast(1000, now).unwrap());
        assert!(!router.poll_time_broadcast(1500, now).unwrap());
        assert!(!router.poll_time_broadcast(2000, || None).unwrap());
        assert_eq!(router.transport().sent_frames().len(), 1);
    }
}
