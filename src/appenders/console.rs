//! Default stream appender

use crate::core::{Appender, LogError, Result};
use std::io::{self, Write};

/// Writes lines to the process-wide default stream (stderr)
///
/// Nothing is owned, so closing it is a no-op.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleAppender;

impl ConsoleAppender {
    pub fn new() -> Self {
        Self
    }

    /// Write `line` to stderr as a single write
    pub fn write_line(line: &str) -> Result<()> {
        let mut stderr = io::stderr().lock();
        stderr
            .write_all(line.as_bytes())
            .and_then(|()| stderr.flush())
            .map_err(|e| LogError::op("cannot write to stderr", e))
    }
}

impl Appender for ConsoleAppender {
    fn append(&mut self, line: &str) -> Result<()> {
        Self::write_line(line)
    }

    fn close(self: Box<Self>) -> Result<()> {
        Ok(())
    }

    fn is_default_stream(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "stderr"
    }
}
