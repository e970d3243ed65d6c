//! Crate-internal logging macros.
//!
//! Each macro forwards to [`log`](https://docs.rs/log) (feature `log`, on by
//! default) or [`tracing`](https://docs.rs/tracing) (feature `tracing`).
//! Enabling both is rejected at compile time; enabling neither silences the
//! crate.
//!
//! Levels used by the router and session:
//!
//! | Level | Events |
//! |-------|--------|
//! | `error` | Cached profile fails to decode or encode, guard redirect loop cut off |
//! | `warn` | Authorization failure before teardown, failed verification, guard denial |
//! | `info` | Route registered or replaced, listeners attached, login, logout, account created |
//! | `debug` | Every dispatch with its pattern, origin and generation; stale teardown skipped |
//! | `trace` | Resolution cache hits and misses, exit cleanups run |
//!
//! Credentials are never logged; login logs the identifier only.

/// Forward one record to the enabled backend at `$level`.
#[doc(hidden)]
#[macro_export]
macro_rules! __navigator_log {
    ($level:ident, $($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::$level!($($arg)*);
        #[cfg(feature = "log")]
        ::log::$level!($($arg)*);
    };
}

/// Log at `trace`.
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => { $crate::__navigator_log!(trace, $($arg)*); };
}

/// Log at `debug`.
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => { $crate::__navigator_log!(debug, $($arg)*); };
}

/// Log at `info`.
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => { $crate::__navigator_log!(info, $($arg)*); };
}

/// Log at `warn`.
#[macro_export]
macro_rules! warn_log {
    ($($arg:tt)*) => { $crate::__navigator_log!(warn, $($arg)*); };
}

/// Log at `error`.
#[macro_export]
macro_rules! error_log {
    ($($arg:tt)*) => { $crate::__navigator_log!(error, $($arg)*); };
}
