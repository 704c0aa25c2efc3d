//! Core logger types and traits

pub mod appender;
pub mod config;
pub mod error;
pub mod flags;
pub mod line_format;
pub(crate) mod log_event;
pub mod log_level;
pub mod logger;
pub mod stat_hooks;
pub mod terminate;
pub(crate) mod writer;

pub use appender::Appender;
pub use config::LogConfig;
pub use error::{ErrorKind, LogError, Result};
pub use flags::{Flags, Prefix};
pub use line_format::LineFormat;
pub use log_level::LogLevel;
pub use logger::{Logger, LoggerBuilder};
pub use stat_hooks::{stat_fn, StatFn};
pub use terminate::{NoExit, ProcessExit, Terminate, FATAL_EXIT_CODE};
