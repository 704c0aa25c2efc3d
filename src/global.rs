//! Process-wide default logger
//!
//! The default instance is created on first use with [`Logger::new`], or
//! installed explicitly with [`init`] before any other call. Installing works
//! at most once per process; everything else forwards to [`logger()`].
//!
//! ```no_run
//! use svclog::{global, info, Flags, Logger};
//!
//! global::init(Logger::builder().debug(true).build()).ok();
//! global::open("/tmp/test-app.log", "test-app", Flags::NO_PID).unwrap();
//! info!("started with pid {}", std::process::id());
//! global::close().unwrap();
//! ```

use crate::core::{Flags, LogConfig, Logger, Result, StatFn};
use std::fmt;
use std::path::Path;
use std::sync::OnceLock;

static LOGGER: OnceLock<Logger> = OnceLock::new();

/// Install `logger` as the default instance
///
/// Returns the logger back if a default instance already exists.
pub fn init(logger: Logger) -> std::result::Result<(), Logger> {
    LOGGER.set(logger)
}

/// The default instance
pub fn logger() -> &'static Logger {
    LOGGER.get_or_init(Logger::new)
}

pub fn open(path: impl AsRef<Path>, app_name: &str, flags: Flags) -> Result<()> {
    logger().open(path, app_name, flags)
}

pub fn open_with(config: &LogConfig) -> Result<()> {
    logger().open_with(config)
}

/// Must be called before exit, otherwise the last lines may be lost
pub fn close() -> Result<()> {
    logger().close()
}

pub fn reopen() -> Result<()> {
    logger().reopen()
}

pub fn flags() -> Flags {
    logger().flags()
}

pub fn set_flags(flags: Flags) -> Result<()> {
    logger().set_flags(flags)
}

pub fn set_debug(enabled: bool) {
    logger().set_debug(enabled);
}

pub fn set_stat_funcs(error: Option<StatFn>, warning: Option<StatFn>) {
    logger().set_stat_funcs(error, warning);
}

#[track_caller]
pub fn debug(args: fmt::Arguments<'_>) {
    logger().debug(args);
}

#[track_caller]
pub fn info(args: fmt::Arguments<'_>) {
    logger().info(args);
}

#[track_caller]
pub fn warn(args: fmt::Arguments<'_>) {
    logger().warn(args);
}

#[track_caller]
pub fn err(args: fmt::Arguments<'_>) {
    logger().err(args);
}

#[track_caller]
pub fn fatal(args: fmt::Arguments<'_>) {
    logger().fatal(args);
}

#[track_caller]
pub fn d(args: fmt::Arguments<'_>) {
    logger().debug(args);
}

#[track_caller]
pub fn i(args: fmt::Arguments<'_>) {
    logger().info(args);
}

#[track_caller]
pub fn w(args: fmt::Arguments<'_>) {
    logger().warn(args);
}

#[track_caller]
pub fn e(args: fmt::Arguments<'_>) {
    logger().err(args);
}

#[track_caller]
pub fn f(args: fmt::Arguments<'_>) {
    logger().fatal(args);
}
