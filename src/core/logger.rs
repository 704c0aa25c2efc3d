//! Main logger implementation
//!
//! A [`Logger`] starts unconfigured. [`Logger::open`] resolves the line prefix,
//! opens the destination and starts the writer thread; [`Logger::close`] parks
//! the writer and releases the destination; [`Logger::reopen`] does both at the
//! same path, which is how external log rotation is supported.

use super::appender::Appender;
use super::config::LogConfig;
use super::error::{LogError, Result};
use super::flags::{Flags, Prefix};
use super::line_format::LineFormat;
use super::log_event::LogEvent;
use super::log_level::LogLevel;
use super::stat_hooks::{StatFn, StatHooks};
use super::terminate::{ProcessExit, Terminate, FATAL_EXIT_CODE};
use super::writer::{Backend, WriterHandle};
use crate::appenders::{ConsoleAppender, FileAppender};
use crossbeam_channel::{SendError, Sender};
use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Destination, prefix and writer state changed by open/close/reopen
struct Lifecycle {
    /// Empty means the default stream
    path: PathBuf,
    app_name: String,
    format: LineFormat,
    closed: bool,
    writer: Option<WriterHandle>,
}

impl Lifecycle {
    fn writer(&self) -> Result<&WriterHandle> {
        self.writer
            .as_ref()
            .ok_or_else(|| LogError::op_msg("log writer is not running"))
    }

    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Err(LogError::Closed);
        }

        let result = self.writer().and_then(WriterHandle::stop).and_then(Backend::close);

        // The writer is parked and the destination released even when closing
        // the handle reported an error
        self.closed = true;
        result
    }
}

/// Prefix and flags mirrored onto stderr for Error/Fatal duplicates and for
/// lines emitted before the first open
struct StderrMirror {
    format: LineFormat,
    duplicate: bool,
    sink: Box<dyn Appender>,
}

impl StderrMirror {
    fn write(&mut self, message: &str, location: &Location<'_>) {
        let line = self.format.render(message, Some(location));
        if let Err(e) = self.sink.append(&line) {
            eprintln!(
                "[LOGGER ERROR] Appender '{}' failed: {}",
                self.sink.name(),
                e
            );
        }
    }
}

/// A serialized line logger
///
/// All methods take `&self` and may be called from any number of threads;
/// every emitted line is written by one writer thread in delivery order, and
/// each emit returns only after its line was handed to the destination.
///
/// NOTE: emitting after [`Logger::close`] without a following
/// [`Logger::open`] or [`Logger::reopen`] blocks the caller, because the
/// parked writer does not accept events.
pub struct Logger {
    lifecycle: Mutex<Lifecycle>,
    events: RwLock<Option<Sender<LogEvent>>>,
    mirror: Mutex<StderrMirror>,
    debug: AtomicBool,
    hooks: RwLock<StatHooks>,
    terminator: Arc<dyn Terminate>,
    pid: u32,
}

impl Logger {
    /// Create an unconfigured logger, see [`Logger::open`]
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Open `path` for appending and start writing lines prefixed with
    /// `app_name`. An empty path selects the default stream (stderr).
    pub fn open(&self, path: impl AsRef<Path>, app_name: &str, flags: Flags) -> Result<()> {
        let path = path.as_ref().to_path_buf();
        let prefix = Prefix::resolve(app_name, self.pid, flags);
        let format = LineFormat::new(prefix.line, prefix.flags);

        let backend = open_backend(&path, &format)?;
        let duplicate = !backend.is_default_stream();
        let writer = WriterHandle::spawn(backend, Arc::clone(&self.terminator))?;

        let mut state = self.lifecycle.lock();
        *self.events.write() = Some(writer.events());
        self.mirror_format(&format, duplicate);

        state.path = path;
        state.app_name = prefix.app_name;
        state.format = format;
        state.closed = false;
        // A previous writer, running or parked, exits when its handle drops
        let previous = state.writer.replace(writer);
        drop(state);
        drop(previous);

        Ok(())
    }

    /// [`Logger::open`] with the settings of `config`
    pub fn open_with(&self, config: &LogConfig) -> Result<()> {
        self.set_debug(config.debug);
        self.open(&config.path, &config.app_name, config.flags)
    }

    /// Park the writer and close the destination
    ///
    /// Returns [`LogError::Closed`] if the log is not open. A failure to close
    /// the file is returned as a file error; the logger is closed either way.
    pub fn close(&self) -> Result<()> {
        self.lifecycle.lock().close()
    }

    /// Close and open the destination again at the same path, keeping the
    /// prefix and flags
    pub fn reopen(&self) -> Result<()> {
        let mut state = self.lifecycle.lock();
        self.reopen_locked(&mut state)
    }

    fn reopen_locked(&self, state: &mut Lifecycle) -> Result<()> {
        state.close()?;

        let backend = open_backend(&state.path, &state.format)?;
        self.mirror_format(&state.format, !backend.is_default_stream());
        state.writer()?.resume(backend)?;
        state.closed = false;

        Ok(())
    }

    /// Effective flags, including the always-on ones
    pub fn flags(&self) -> Flags {
        self.lifecycle.lock().format.flags()
    }

    /// Apply a new flag set and reopen the destination
    ///
    /// The new flags are recorded even if the reopen fails, e.g. with
    /// [`LogError::Closed`] on a log that is not open.
    pub fn set_flags(&self, flags: Flags) -> Result<()> {
        let mut state = self.lifecycle.lock();
        let prefix = Prefix::resolve(&state.app_name, self.pid, flags);
        state.format = LineFormat::new(prefix.line, prefix.flags);
        self.reopen_locked(&mut state)
    }

    /// Enable or disable debug messages
    pub fn set_debug(&self, enabled: bool) {
        self.debug.store(enabled, Ordering::Relaxed);
    }

    pub fn is_debug(&self) -> bool {
        self.debug.load(Ordering::Relaxed)
    }

    /// Set the error and warning statistics callbacks, `None` removes one
    pub fn set_stat_funcs(&self, error: Option<StatFn>, warning: Option<StatFn>) {
        *self.hooks.write() = StatHooks::new(error, warning);
    }

    pub fn is_closed(&self) -> bool {
        self.lifecycle.lock().closed
    }

    /// Destination path, empty for the default stream
    pub fn path(&self) -> PathBuf {
        self.lifecycle.lock().path.clone()
    }

    /// Line prefix currently applied, e.g. `"app[1234]: "`
    pub fn prefix(&self) -> String {
        self.lifecycle.lock().format.prefix().to_string()
    }

    pub fn process_id(&self) -> u32 {
        self.pid
    }

    /// Write a debug message marked with `<D>`, only while debug is enabled
    #[track_caller]
    pub fn debug(&self, args: fmt::Arguments<'_>) {
        if !self.is_debug() {
            return;
        }
        let message = LogLevel::Debug.decorate(args);
        self.emit(LogLevel::Debug, message, Location::caller());
    }

    /// Shortcut for [`Logger::debug`]
    #[track_caller]
    #[inline]
    pub fn d(&self, args: fmt::Arguments<'_>) {
        self.debug(args);
    }

    /// Write an information message without a level marker
    #[track_caller]
    pub fn info(&self, args: fmt::Arguments<'_>) {
        let message = LogLevel::Info.decorate(args);
        self.emit(LogLevel::Info, message, Location::caller());
    }

    #[track_caller]
    #[inline]
    pub fn i(&self, args: fmt::Arguments<'_>) {
        self.info(args);
    }

    /// Write a warning marked with `<WRN>` and call the warning hook
    #[track_caller]
    pub fn warn(&self, args: fmt::Arguments<'_>) {
        let message = LogLevel::Warn.decorate(args);
        self.emit(LogLevel::Warn, message, Location::caller());

        if let Some(hook) = self.hooks().warning {
            hook(args);
        }
    }

    #[track_caller]
    #[inline]
    pub fn w(&self, args: fmt::Arguments<'_>) {
        self.warn(args);
    }

    /// Write an error marked with `<ERR>`, copy it to stderr when logging to
    /// a file, and call the error hook
    #[track_caller]
    pub fn err(&self, args: fmt::Arguments<'_>) {
        let message = LogLevel::Error.decorate(args);
        self.emit(LogLevel::Error, message, Location::caller());

        if let Some(hook) = self.hooks().error {
            hook(args);
        }
    }

    #[track_caller]
    #[inline]
    pub fn e(&self, args: fmt::Arguments<'_>) {
        self.err(args);
    }

    /// Write a fatal message marked with `<FATAL>`, copy it to stderr when
    /// logging to a file, then terminate the process
    ///
    /// The error hook runs before the line is written, since the process is
    /// gone afterwards.
    #[track_caller]
    pub fn fatal(&self, args: fmt::Arguments<'_>) {
        let message = LogLevel::Fatal.decorate(args);

        if let Some(hook) = self.hooks().error {
            hook(args);
        }

        self.emit(LogLevel::Fatal, message, Location::caller());
    }

    #[track_caller]
    #[inline]
    pub fn f(&self, args: fmt::Arguments<'_>) {
        self.fatal(args);
    }

    /// Hand a message to the writer and wait until it is written
    fn emit(&self, level: LogLevel, message: String, location: &'static Location<'static>) {
        if level.duplicates_to_stderr() {
            self.duplicate_to_stderr(&message, location);
        }

        let events = self.events.read().clone();
        let Some(mut events) = events else {
            // Never opened: no writer exists yet
            self.write_unattached(level, &message, location);
            return;
        };

        let (mut event, done) = LogEvent::new(level, message, location);
        // An open on another thread may retire the writer behind `events`
        while let Err(SendError(returned)) = events.send(event) {
            match self.events.read().clone() {
                Some(next) if !next.same_channel(&events) => {
                    events = next;
                    event = returned;
                }
                _ => {
                    eprintln!(
                        "[LOGGER ERROR] Log writer is gone, dropped line: {}",
                        returned.message
                    );
                    return;
                }
            }
        }
        let _ = done.recv();
    }

    /// Hooks are cloned out so a hook may call back into the logger
    fn hooks(&self) -> StatHooks {
        self.hooks.read().clone()
    }

    fn write_unattached(&self, level: LogLevel, message: &str, location: &Location<'_>) {
        self.mirror.lock().write(message, location);
        if level.is_fatal() {
            self.terminator.terminate(FATAL_EXIT_CODE);
        }
    }

    fn duplicate_to_stderr(&self, message: &str, location: &Location<'_>) {
        let mut mirror = self.mirror.lock();
        if mirror.duplicate {
            mirror.write(message, location);
        }
    }

    fn mirror_format(&self, format: &LineFormat, duplicate: bool) {
        let mut mirror = self.mirror.lock();
        mirror.format = format.clone();
        mirror.duplicate = duplicate;
    }
}

fn open_backend(path: &Path, format: &LineFormat) -> Result<Backend> {
    let appender: Box<dyn Appender> = if path.as_os_str().is_empty() {
        Box::new(ConsoleAppender::new())
    } else {
        Box::new(FileAppender::open(path)?)
    };
    Ok(Backend::new(appender, format.clone()))
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lifecycle.lock();
        f.debug_struct("Logger")
            .field("path", &state.path)
            .field("prefix", &state.format.prefix())
            .field("flags", &state.format.flags())
            .field("closed", &state.closed)
            .field("debug", &self.is_debug())
            .field("pid", &self.pid)
            .finish()
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use svclog::prelude::*;
/// use std::sync::Arc;
///
/// let logger = Logger::builder()
///     .terminator(Arc::new(NoExit))
///     .process_id(4242)
///     .debug(true)
///     .build();
/// assert!(logger.is_closed());
/// ```
pub struct LoggerBuilder {
    terminator: Arc<dyn Terminate>,
    mirror: Box<dyn Appender>,
    pid: Option<u32>,
    debug: bool,
    hooks: StatHooks,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            terminator: Arc::new(ProcessExit),
            mirror: Box::new(ConsoleAppender::new()),
            pid: None,
            debug: false,
            hooks: StatHooks::default(),
        }
    }

    /// Replace what happens after a fatal line is written
    #[must_use = "builder methods return a new value"]
    pub fn terminator(mut self, terminator: Arc<dyn Terminate>) -> Self {
        self.terminator = terminator;
        self
    }

    /// Write Error/Fatal copies, and lines emitted before the first open, to
    /// `appender` instead of stderr
    #[must_use = "builder methods return a new value"]
    pub fn mirror(mut self, appender: Box<dyn Appender>) -> Self {
        self.mirror = appender;
        self
    }

    /// Use a fixed process identifier in the prefix instead of the real one
    #[must_use = "builder methods return a new value"]
    pub fn process_id(mut self, pid: u32) -> Self {
        self.pid = Some(pid);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn debug(mut self, enabled: bool) -> Self {
        self.debug = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn error_hook(mut self, hook: StatFn) -> Self {
        self.hooks.error = Some(hook);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn warning_hook(mut self, hook: StatFn) -> Self {
        self.hooks.warning = Some(hook);
        self
    }

    /// Build the Logger
    pub fn build(self) -> Logger {
        Logger {
            lifecycle: Mutex::new(Lifecycle {
                path: PathBuf::new(),
                app_name: String::new(),
                format: LineFormat::new("", Flags::ALWAYS),
                closed: true,
                writer: None,
            }),
            events: RwLock::new(None),
            mirror: Mutex::new(StderrMirror {
                format: LineFormat::new("", Flags::ALWAYS),
                duplicate: false,
                sink: self.mirror,
            }),
            debug: AtomicBool::new(self.debug),
            hooks: RwLock::new(self.hooks),
            terminator: self.terminator,
            pid: self.pid.unwrap_or_else(std::process::id),
        }
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    /// Create a builder for Logger
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }
}
