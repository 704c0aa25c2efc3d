//! Appender trait for log output destinations

use super::error::Result;

/// A destination that receives fully rendered lines
///
/// Appenders are owned by exactly one writer at a time, so they only need to
/// be movable between threads.
pub trait Appender: Send {
    /// Write one rendered line, including its trailing newline
    fn append(&mut self, line: &str) -> Result<()>;

    /// Release the destination, reporting a failure to do so
    fn close(self: Box<Self>) -> Result<()>;

    /// True when the destination is the process-wide default stream
    fn is_default_stream(&self) -> bool;

    fn name(&self) -> &str;
}
