//! Log level definitions

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl LogLevel {
    /// Marker written between the line prefix and the message
    pub fn marker(&self) -> &'static str {
        match self {
            LogLevel::Debug => "<D> ",
            LogLevel::Info => "",
            LogLevel::Warn => "<WRN> ",
            LogLevel::Error => "<ERR> ",
            LogLevel::Fatal => "<FATAL> ",
        }
    }

    /// Error and Fatal lines are also copied to stderr when the log is a file
    pub fn duplicates_to_stderr(&self) -> bool {
        matches!(self, LogLevel::Error | LogLevel::Fatal)
    }

    pub fn is_fatal(&self) -> bool {
        *self == LogLevel::Fatal
    }

    /// Expand `args` behind this level's marker
    pub fn decorate(&self, args: fmt::Arguments<'_>) -> String {
        let marker = self.marker();
        match args.as_str() {
            Some(s) if marker.is_empty() => s.to_string(),
            _ => format!("{}{}", marker, args),
        }
    }
}
