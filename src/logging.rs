//! Unified Logging Macros for KNX-TP
//!
//! This module provides a unified logging interface that automatically
//! selects between `log::` and `defmt::` based on the active feature flags.
//!
//! # Usage
//!
//! ```rust,ignore
//! knx_log!(info, "Router ready");
//! knx_log!(debug, "Received {} bytes", n);
//! knx_log!(warn, "Dropped telegram: {}", err);
//! ```
//!
//! # Feature Flags
//!
//! - `log` - Uses `log::` crate (host tools, USB serial debugging)
//! - `defmt` - Uses `defmt::` (more efficient for embedded targets)
//! - Neither - Logging compiles away
//!
//! Arguments must be usable with both backends: plain `{}` placeholders and
//! values implementing both `Display` and `defmt::Format`.

/// Unified logging macro - automatically selects log:: or defmt:: based on features
#[macro_export]
#[cfg(feature = "log")]
macro_rules! knx_log {
    (info, $($arg:tt)*) => { log::info!($($arg)*) };
    (debug, $($arg:tt)*) => { log::debug!($($arg)*) };
    (warn, $($arg:tt)*) => { log::warn!($($arg)*) };
    (error, $($arg:tt)*) => { log::error!($($arg)*) };
    (trace, $($arg:tt)*) => { log::trace!($($arg)*) };
}

#[macro_export]
#[cfg(all(feature = "defmt", not(feature = "log")))]
macro_rules! knx_log {
    (info, $($arg:tt)*) => { defmt::info!($($arg)*) };
    (debug, $($arg:tt)*) => { defmt::debug!($($arg)*) };
    (warn, $($arg:tt)*) => { defmt::warn!($($arg)*) };
    (error, $($arg:tt)*) => { defmt::error!($($arg)*) };
    (trace, $($arg:tt)*) => { defmt::trace!($($arg)*) };
}

// No backend: type-check the arguments, emit nothing.
#[macro_export]
#[cfg(not(any(feature = "defmt", feature = "log")))]
macro_rules! knx_log {
    ($level:ident, $($arg:tt)*) => {{
        if false {
            let _ = core::format_args!($($arg)*);
        }
    }};
}
