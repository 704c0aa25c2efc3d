//! Logging macros for ergonomic log message formatting.
//!
//! Each macro takes an optional logger followed by `format!`-style arguments.
//! Without a logger the message goes to the default instance in
//! [`crate::global`].
//!
//! # Examples
//!
//! ```
//! use svclog::prelude::*;
//! use svclog::{debug, info, warn};
//!
//! let logger = Logger::new();
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//!
//! // Debug lines are dropped until debug mode is enabled
//! debug!(logger, "not written");
//! logger.set_debug(true);
//! debug!(logger, "cache size: {}", 42);
//!
//! // Default instance
//! warn!("disk usage at {}%", 91);
//! ```

/// Log a debug message, written only while debug mode is enabled.
#[macro_export]
macro_rules! debug {
    ($fmt:literal $($arg:tt)*) => {
        $crate::global::debug(::std::format_args!($fmt $($arg)*))
    };
    ($logger:expr, $($arg:tt)+) => {
        $logger.debug(::std::format_args!($($arg)+))
    };
}

/// Log an information message.
#[macro_export]
macro_rules! info {
    ($fmt:literal $($arg:tt)*) => {
        $crate::global::info(::std::format_args!($fmt $($arg)*))
    };
    ($logger:expr, $($arg:tt)+) => {
        $logger.info(::std::format_args!($($arg)+))
    };
}

/// Log a warning and call the warning statistics hook.
#[macro_export]
macro_rules! warn {
    ($fmt:literal $($arg:tt)*) => {
        $crate::global::warn(::std::format_args!($fmt $($arg)*))
    };
    ($logger:expr, $($arg:tt)+) => {
        $logger.warn(::std::format_args!($($arg)+))
    };
}

/// Log an error, copy it to stderr and call the error statistics hook.
#[macro_export]
macro_rules! error {
    ($fmt:literal $($arg:tt)*) => {
        $crate::global::err(::std::format_args!($fmt $($arg)*))
    };
    ($logger:expr, $($arg:tt)+) => {
        $logger.err(::std::format_args!($($arg)+))
    };
}

/// Log a fatal message, then terminate the process.
#[macro_export]
macro_rules! fatal {
    ($fmt:literal $($arg:tt)*) => {
        $crate::global::fatal(::std::format_args!($fmt $($arg)*))
    };
    ($logger:expr, $($arg:tt)+) => {
        $logger.fatal(::std::format_args!($($arg)+))
    };
}
