//! # svclog
//!
//! A serialized line logger for long-running services.
//!
//! ## Features
//!
//! - **Process identifier** in every line prefix, optional via [`Flags::NO_PID`]
//! - **Reopen** support for external log rotation
//! - **Statistics hooks** called on warnings and errors
//! - **Debug gating**: debug lines are written only when enabled
//! - **Error duplication**: errors and fatal messages are copied to stderr
//! - **Serialized writes**: one writer thread, callers return once their line
//!   is written
//!
//! ## Example
//!
//! ```no_run
//! use svclog::prelude::*;
//! use svclog::{error, info, warn};
//!
//! let logger = Logger::new();
//! logger.open("/tmp/test-app.log", "test-app", Flags::STD).unwrap();
//!
//! info!(logger, "[#{}] INFO log message", 1);
//! warn!(logger, "[#{}] WARNING log message", 2);
//! error!(logger, "[#{}] ERROR log message", 3);
//!
//! // SIGHUP from logrotate
//! logger.reopen().unwrap();
//!
//! logger.close().unwrap();
//! ```

pub mod appenders;
pub mod core;
pub mod global;
pub mod macros;

pub mod prelude {
    pub use crate::appenders::{ConsoleAppender, FileAppender};
    pub use crate::core::{
        stat_fn, Appender, ErrorKind, Flags, LogConfig, LogError, LogLevel, Logger,
        LoggerBuilder, NoExit, ProcessExit, Result, StatFn, Terminate,
    };
}

pub use appenders::{ConsoleAppender, FileAppender};
pub use core::{
    stat_fn, Appender, ErrorKind, Flags, LineFormat, LogConfig, LogError, LogLevel, Logger,
    LoggerBuilder, NoExit, Prefix, ProcessExit, Result, StatFn, Terminate, FATAL_EXIT_CODE,
};
