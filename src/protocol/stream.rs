//! Telegram reassembly for byte-oriented transports.
//!
//! A UART-attached bus coupler hands over one byte at a time. The framer
//! collects them until the length byte says the telegram is complete, then
//! parses it. Garbage between telegrams is skipped by waiting for a byte that
//! looks like a standard control field. When a candidate telegram turns out
//! malformed, only its first byte is dropped and the rest is scanned again.
//!
//! ```text
//! WaitHeader ──▶ Accumulating ──▶ Complete ──▶ WaitHeader
//!                     │
//!                     └──▶ Discarded ──▶ WaitHeader
//! ```
//!
//! ## Example
//!
//! ```
//! use knx_tp::protocol::stream::StreamFramer;
//! use knx_tp::protocol::telegram::{self, Command};
//! use knx_tp::{ga, pa};
//!
//! let frame = telegram::build(Command::GroupValueWrite, pa!(1 . 1 . 1), ga!(0/0/1).into(), &[1])?;
//! let mut framer = StreamFramer::new();
//!
//! let mut seen = 0;
//! for &byte in frame.iter() {
//!     if let Some(Ok(t)) = framer.push(byte) {
//!         assert_eq!(t.payload(), &[1]);
//!         seen += 1;
//!     }
//!     // Replay bytes left over from a discarded telegram
//!     while let Some(result) = framer.resume() {
//!         if result.is_ok() {
//!             seen += 1;
//!         }
//!     }
//! }
//! assert_eq!(seen, 1);
//! # Ok::<(), knx_tp::KnxError>(())
//! ```

use crate::error::{KnxError, Result};
use crate::protocol::constants::{LENGTH_OFFSET, MAX_PAYLOAD_LEN, MAX_TELEGRAM_LEN};
use crate::protocol::telegram::{ControlField, RoutingField, Telegram};

/// Bytes held for replay after a discard, plus input not yet drained.
const BACKLOG_LEN: usize = 2 * MAX_TELEGRAM_LEN;

/// Reassembly state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FramerState {
    /// Waiting for a control byte
    WaitHeader,
    /// Collecting header and payload bytes
    Accumulating,
    /// A telegram was just delivered
    Complete,
    /// The last telegram was malformed and dropped
    Discarded,
}

/// Byte-stream telegram framer.
///
/// A malformed candidate telegram only costs its first byte: the bytes after
/// it are scanned for the next control byte and replayed, so a real telegram
/// swallowed by a false header is still delivered.
#[derive(Debug)]
pub struct StreamFramer {
    buf: heapless::Vec<u8, MAX_TELEGRAM_LEN>,
    backlog: heapless::Deque<u8, BACKLOG_LEN>,
    expected: Option<usize>,
    state: FramerState,
    skipped: usize,
}

impl Default for StreamFramer {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamFramer {
    /// Create an idle framer
    pub const fn new() -> Self {
        Self {
            buf: heapless::Vec::new(),
            backlog: heapless::Deque::new(),
            expected: None,
            state: FramerState::WaitHeader,
            skipped: 0,
        }
    }

    /// Current state
    #[inline]
    pub const fn state(&self) -> FramerState {
        self.state
    }

    /// Bytes skipped while hunting for a control byte
    #[inline]
    pub const fn skipped(&self) -> usize {
        self.skipped
    }

    /// Bytes buffered for the telegram in progress
    #[inline]
    pub fn pending(&self) -> usize {
        self.buf.len()
    }

    /// Bytes queued for [`Self::resume`]
    #[inline]
    pub fn backlog(&self) -> usize {
        self.backlog.len()
    }

    /// Drop any partial telegram and queued bytes, then wait for the next header.
    pub fn reset(&mut self) {
        self.backlog.clear();
        self.restart();
    }

    /// Feed one byte.
    ///
    /// Returns `Some(Ok(_))` when a telegram completes, `Some(Err(_))` when a
    /// telegram was discarded and `None` while more bytes are needed.
    ///
    /// A discard can leave bytes queued for replay. Call [`Self::resume`]
    /// until it returns `None` before feeding the next byte.
    pub fn push(&mut self, byte: u8) -> Option<Result<Telegram<'_>>> {
        if self.backlog.is_full() {
            let _ = self.backlog.pop_front();
            self.skipped += 1;
            knx_log!(warn, "Framer backlog full, oldest byte dropped");
        }
        let _ = self.backlog.push_back(byte);
        self.resume()
    }

    /// Process queued bytes until the next telegram or discard.
    ///
    /// Returns `None` once the queue is empty.
    pub fn resume(&mut self) -> Option<Result<Telegram<'_>>> {
        let mut outcome = None;
        while let Some(byte) = self.backlog.pop_front() {
            outcome = self.step(byte);
            if outcome.is_some() {
                break;
            }
        }
        Some(match outcome? {
            Ok(()) => Telegram::parse(&self.buf),
            Err(e) => Err(e),
        })
    }

    /// Signal an inter-byte gap from the transport.
    ///
    /// A telegram still in progress can no longer complete and is discarded
    /// whole, since bytes on either side of a gap never belong together.
    ///
    /// # Errors
    ///
    /// Returns `TooShort` if a partial telegram was dropped.
    pub fn end_of_frame(&mut self) -> Result<()> {
        if self.state != FramerState::Accumulating {
            return Ok(());
        }
        knx_log!(warn, "Gap after {} bytes, partial telegram dropped", self.buf.len());
        self.restart();
        self.state = FramerState::Discarded;
        Err(KnxError::too_short())
    }

    /// Advance the state machine by one byte.
    ///
    /// `Some(Ok(()))` means `buf` holds a valid telegram.
    fn step(&mut self, byte: u8) -> Option<Result<()>> {
        if matches!(self.state, FramerState::Complete | FramerState::Discarded) {
            self.restart();
        }

        if self.state == FramerState::WaitHeader {
            if !ControlField::is_standard_frame(byte) {
                self.skipped += 1;
                knx_log!(debug, "Framer skipped byte {}", byte);
                return None;
            }
            self.state = FramerState::Accumulating;
        }

        if self.buf.push(byte).is_err() {
            return Some(Err(self.resync(KnxError::payload_too_large())));
        }

        if self.buf.len() == LENGTH_OFFSET + 1 {
            let routing = RoutingField::from(byte);
            if routing.payload_len() > MAX_PAYLOAD_LEN {
                return Some(Err(self.resync(KnxError::payload_too_large())));
            }
            self.expected = Some(routing.telegram_len());
        }

        if self.expected != Some(self.buf.len()) {
            return None;
        }

        match Telegram::parse(&self.buf) {
            Ok(_) => {
                self.state = FramerState::Complete;
                Some(Ok(()))
            }
            Err(e) => Some(Err(self.resync(e))),
        }
    }

    /// Drop the candidate's first byte and queue the rest from the next
    /// plausible control byte for replay.
    fn resync(&mut self, err: KnxError) -> KnxError {
        knx_log!(warn, "Dropped malformed telegram: {}", err);
        let start = self
            .buf
            .iter()
            .skip(1)
            .position(|&b| ControlField::is_standard_frame(b))
            .map_or(self.buf.len(), |i| i + 1);
        self.skipped += start;

        for &b in self.buf[start..].iter().rev() {
            if self.backlog.push_front(b).is_err() {
                self.skipped += 1;
            }
        }
        if start < self.buf.len() {
            knx_log!(debug, "Resync: replaying {} bytes", self.buf.len() - start);
        }

        self.restart();
        self.state = FramerState::Discarded;
        err
    }

    fn restart(&mut self) {
        self.buf.clear();
        self.expected = None;
        self.state = FramerState::WaitHeader;
    }
}
