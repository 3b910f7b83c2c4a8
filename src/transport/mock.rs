//! Mock transport implementation for testing.
//!
//! Records every transmitted frame, replays injected inbound bytes and can
//! simulate a disconnected bus coupler or a failing send.
//!
//! ```ignore
//! use knx_tp::transport::{mock::MockTransport, Transport};
//!
//! let mut mock = MockTransport::new();
//! mock.transmit(&[0xBC, 0x11])?;
//! assert_eq!(mock.sent_frames().len(), 1);
//!
//! mock.inject(&[0x01, 0x02]);
//! let mut buf = [0u8; 8];
//! assert_eq!(mock.receive(&mut buf)?, 2);
//! # Ok::<(), knx_tp::KnxError>(())
//! ```

use crate::error::{KnxError, Result};
use crate::transport::Transport;

use std::collections::VecDeque;

/// Mock transport for testing without a bus coupler.
#[derive(Debug)]
pub struct MockTransport {
    /// Inbound bytes returned by `receive()`
    inbound: VecDeque<u8>,
    /// Record of all frames passed to `transmit()`
    sent: Vec<Vec<u8>>,
    /// Simulated coupler state
    ready: bool,
    /// Number of upcoming transmits that fail
    failures: usize,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTransport {
    /// Create a connected mock with no history.
    pub fn new() -> Self {
        Self {
            inbound: VecDeque::new(),
            sent: Vec::new(),
            ready: true,
            failures: 0,
        }
    }

    /// Queue bytes for the next `receive()` calls.
    pub fn inject(&mut self, bytes: &[u8]) {
        self.inbound.extend(bytes.iter().copied());
    }

    /// All frames transmitted so far, oldest first.
    pub fn sent_frames(&self) -> &[Vec<u8>] {
        &self.sent
    }

    /// The most recent frame, if any.
    pub fn last_sent(&self) -> Option<&[u8]> {
        self.sent.last().map(Vec::as_slice)
    }

    /// Clear the transmit history.
    pub fn clear_sent(&mut self) {
        self.sent.clear();
    }

    /// Simulate the bus coupler connecting or disconnecting.
    pub fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
    }

    /// Make the next `count` transmits fail with `SendFailed`.
    pub fn fail_next(&mut self, count: usize) {
        self.failures = count;
    }

    /// Inbound bytes not yet consumed.
    pub fn pending_inbound(&self) -> usize {
        self.inbound.len()
    }
}

impl Transport for MockTransport {
    fn transmit(&mut self, frame: &[u8]) -> Result<()> {
        if !self.ready {
            return Err(KnxError::not_ready());
        }
        if self.failures > 0 {
            self.failures -= 1;
            return Err(KnxError::send_failed());
        }
        self.sent.push(frame.to_vec());
        Ok(())
    }

    fn receive(&mut self, buf: &mut [u8]) -> Result<usize> {
        let n = buf.len().min(self.inbound.len());
        for (slot, byte) in buf.iter_mut().zip(self.inbound.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }

    fn is_ready(&self) -> bool {
        self.ready
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_frames() {
        let mut mock = MockTransport::new();
        mock.transmit(&[0xAA, 0xBB]).unwrap();
        mock.transmit(&[0xCC]).unwrap();
        assert_eq!(mock.sent_frames(), &[vec![0xAA, 0xBB], vec![0xCC]]);
        assert_eq!(mock.last_sent(), Some(&[0xCC][..]));

        mock.clear_sent();
        assert!(mock.sent_frames().is_empty());
    }

    #[test]
    fn test_not_ready() {
        let mut mock = MockTransport::new();
        assert!(mock.is_ready());
        mock.set_ready(false);
        assert!(!mock.is_ready());
        assert!(mock.transmit(&[0x01]).is_err());
        assert!(mock.sent_frames().is_empty());
    }

    #[test]
    fn test_fail_next() {
        let mut mock = MockTransport::new();
        mock.fail_next(1);
        assert!(matches!(mock.transmit(&[0x01]), Err(KnxError::Transport(_))));
        assert!(mock.transmit(&[0x02]).is_ok());
        assert_eq!(mock.sent_frames().len(), 1);
    }

    #[test]
    fn test_receive_fifo() {
        let mut mock = MockTransport::new();
        mock.inject(&[1, 2, 3]);
        mock.inject(&[4]);

        let mut buf = [0u8; 3];
        assert_eq!(mock.receive(&mut buf).unwrap(), 3);
        assert_eq!(buf, [1, 2, 3]);
        assert_eq!(mock.pending_inbound(), 1);
        assert_eq!(mock.receive(&mut buf).unwrap(), 1);
        assert_eq!(buf[0], 4);
        assert_eq!(mock.receive(&mut buf).unwrap(), 0);
    }
}
