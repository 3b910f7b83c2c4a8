//! Bus transport abstraction.
//!
//! The protocol core never touches hardware. It hands finished telegrams to
//! a [`Transport`] and receives raw bytes back from it, so production code can
//! drive a UART bus coupler while tests use [`mock::MockTransport`].
//!
//! No retry or backoff happens at this layer. A failed transmit is reported
//! to the caller once.
//!
//! ## Example
//!
//! ```
//! use knx_tp::transport::Transport;
//! use knx_tp::Result;
//!
//! struct Uart {
//!     coupler_ready: bool,
//! }
//!
//! impl Transport for Uart {
//!     fn transmit(&mut self, frame: &[u8]) -> Result<()> {
//!         // write `frame` to the bus coupler
//!         let _ = frame;
//!         Ok(())
//!     }
//!
//!     fn is_ready(&self) -> bool {
//!         self.coupler_ready
//!     }
//! }
//! ```

use crate::error::Result;

#[cfg(any(test, feature = "std"))]
pub mod mock;

/// Synchronous bus transport.
///
/// Sends are fire-and-forget: `transmit` returns once the frame is queued
/// or written.
pub trait Transport {
    /// Transmit one complete telegram.
    ///
    /// # Errors
    ///
    /// Returns `Transport(SendFailed)` if the frame could not be written.
    fn transmit(&mut self, frame: &[u8]) -> Result<()>;

    /// Read whatever bytes are available without blocking.
    ///
    /// Returns the number of bytes written into `buf`; 0 means nothing is
    /// pending. The default implementation never has data, for transports
    /// that push inbound bytes to the router themselves.
    fn receive(&mut self, _buf: &mut [u8]) -> Result<usize> {
        Ok(0)
    }

    /// Whether the bus coupler is connected and able to send.
    ///
    /// Defaults to `true` for transports without readiness detection.
    fn is_ready(&self) -> bool {
        true
    }
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn transmit(&mut self, frame: &[u8]) -> Result<()> {
        (**self).transmit(frame)
    }

    fn receive(&mut self, buf: &mut [u8]) -> Result<usize> {
        (**self).receive(buf)
    }

    fn is_ready(&self) -> bool {
        (**self).is_ready()
    }
}
