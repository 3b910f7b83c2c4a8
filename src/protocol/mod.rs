//! KNX TP1 telegram framing.
//!
//! - [`telegram`] parses and builds complete telegrams
//! - [`stream`] reassembles telegrams from a byte stream
//! - [`constants`] holds frame sizes and offsets

pub mod constants;
pub mod stream;
pub mod telegram;

pub use stream::{FramerState, StreamFramer};
pub use telegram::{build, checksum, Command, Frame, Telegram};
