#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
#![doc = include_str!("../README.md")]

//! ## Modules
//!
//! - [`addressing`]: physical and group addresses, string and wire codecs
//! - [`dpt`]: datapoint type codecs
//! - [`registry`]: symbolic id to group address bindings
//! - [`protocol`]: TP telegram build/parse and the stream framer
//! - [`router`]: send primitives and inbound fan-out to listeners
//! - [`transport`]: bus transport boundary
//! - [`config`]: startup configuration

// Macro modules (must be declared before use)
#[macro_use]
pub mod logging;
#[macro_use]
pub mod macros;

pub mod addressing;
pub mod config;
pub mod dpt;
pub mod error;
pub mod protocol;
pub mod registry;
pub mod router;
pub mod transport;

// Re-export commonly used types
#[doc(inline)]
pub use addressing::{Destination, GroupAddress, PhysicalAddress};
#[doc(inline)]
pub use config::Configuration;
#[doc(inline)]
pub use dpt::{DatapointType, DptDecode, DptEncode, DptValue};
#[doc(inline)]
pub use error::{KnxError, Result};
#[doc(inline)]
pub use protocol::{Command, Telegram};
#[doc(inline)]
pub use registry::GroupAddressRegistry;
#[doc(inline)]
pub use router::{DispatchRouter, GroupSender, TelegramListener, TelegramMonitor};
#[doc(inline)]
pub use transport::Transport;
