//! Per-call unit of work handed to the writer

use super::log_level::LogLevel;
use crossbeam_channel::{bounded, Receiver, Sender};
use std::panic::Location;

/// One emitted message on its way to the writer
///
/// The message is already expanded and carries its level marker; the writer
/// adds the header and prefix. Dropping the event releases the caller waiting
/// on the paired completion receiver.
pub(crate) struct LogEvent {
    pub level: LogLevel,
    pub message: String,
    pub location: &'static Location<'static>,
    done: Sender<()>,
}

impl LogEvent {
    /// Create an event and the receiver that unblocks once it is consumed
    pub fn new(
        level: LogLevel,
        message: String,
        location: &'static Location<'static>,
    ) -> (Self, Receiver<()>) {
        let (done, completed) = bounded(1);
        let event = Self {
            level,
            message,
            location,
            done,
        };
        (event, completed)
    }

    /// Signal the emitting caller that the line was handed to the backend
    pub fn complete(self) {
        let _ = self.done.try_send(());
    }
}
