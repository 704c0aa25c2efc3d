//! The single writer thread and its event/control channels
//!
//! Exactly one thread owns the backend. Emitters hand it events over a
//! rendezvous channel and wait for completion, so concurrent emits are
//! linearized in delivery order with no buffering in between. Lifecycle
//! operations talk to the same thread over a control channel: `Stop` makes the
//! writer hand its backend back and park until `Resume` delivers a new one.

use super::appender::Appender;
use super::error::{LogError, Result};
use super::line_format::LineFormat;
use super::log_event::LogEvent;
use super::terminate::{Terminate, FATAL_EXIT_CODE};
use crossbeam_channel::{bounded, select, Receiver, Sender};
use std::sync::Arc;
use std::thread;

/// An open destination together with the format applied to its lines
pub(crate) struct Backend {
    appender: Box<dyn Appender>,
    format: LineFormat,
}

impl Backend {
    pub fn new(appender: Box<dyn Appender>, format: LineFormat) -> Self {
        Self { appender, format }
    }

    pub fn is_default_stream(&self) -> bool {
        self.appender.is_default_stream()
    }

    fn write(&mut self, event: &LogEvent) -> Result<()> {
        let line = self.format.render(&event.message, Some(event.location));
        self.appender.append(&line)
    }

    pub fn close(self) -> Result<()> {
        self.appender.close()
    }
}

pub(crate) enum Control {
    /// Hand the backend over on the ack channel, then park
    Stop,
    /// Leave the parked state writing to the given backend
    Resume(Backend),
    /// Exit the thread
    Shutdown,
}

/// Owning handle of a running writer thread
pub(crate) struct WriterHandle {
    events: Sender<LogEvent>,
    control: Sender<Control>,
    acks: Receiver<Backend>,
    thread: Option<thread::JoinHandle<()>>,
}

impl WriterHandle {
    /// Start a writer thread that owns `backend`
    pub fn spawn(backend: Backend, terminator: Arc<dyn Terminate>) -> Result<Self> {
        let (events, event_rx) = bounded(0);
        let (control, control_rx) = bounded(0);
        let (ack_tx, acks) = bounded(0);

        let thread = thread::Builder::new()
            .name("svclog-writer".to_string())
            .spawn(move || run(backend, event_rx, control_rx, ack_tx, terminator))
            .map_err(|e| LogError::op("cannot start log writer thread", e))?;

        Ok(Self {
            events,
            control,
            acks,
            thread: Some(thread),
        })
    }

    pub fn events(&self) -> Sender<LogEvent> {
        self.events.clone()
    }

    /// Park the writer and take its backend
    ///
    /// Blocks until the writer finished the line it may be writing.
    pub fn stop(&self) -> Result<Backend> {
        self.control
            .send(Control::Stop)
            .map_err(|_| LogError::op_msg("log writer is not running"))?;
        self.acks
            .recv()
            .map_err(|e| LogError::op("log writer did not acknowledge stop", e))
    }

    /// Unpark the writer with a freshly opened backend
    pub fn resume(&self, backend: Backend) -> Result<()> {
        self.control
            .send(Control::Resume(backend))
            .map_err(|_| LogError::op_msg("log writer is not running"))
    }
}

impl Drop for WriterHandle {
    fn drop(&mut self) {
        // Reaches the writer both while running and while parked
        let _ = self.control.send(Control::Shutdown);

        if let Some(thread) = self.thread.take() {
            if let Err(e) = thread.join() {
                eprintln!("[LOGGER ERROR] Log writer thread panicked: {:?}", e);
            }
        }
    }
}

fn run(
    mut backend: Backend,
    events: Receiver<LogEvent>,
    control: Receiver<Control>,
    acks: Sender<Backend>,
    terminator: Arc<dyn Terminate>,
) {
    loop {
        select! {
            recv(events) -> event => match event {
                Ok(event) => write_event(&mut backend, event, terminator.as_ref()),
                Err(_) => return,
            },
            recv(control) -> signal => match signal {
                Ok(Control::Stop) => {
                    if acks.send(backend).is_err() {
                        return;
                    }
                    // Parked: events stay undelivered until a backend comes back
                    backend = match control.recv() {
                        Ok(Control::Resume(next)) => next,
                        Ok(Control::Stop) | Ok(Control::Shutdown) | Err(_) => return,
                    };
                }
                Ok(Control::Resume(next)) => backend = next,
                Ok(Control::Shutdown) | Err(_) => return,
            },
        }
    }
}

fn write_event(backend: &mut Backend, event: LogEvent, terminator: &dyn Terminate) {
    let written = backend.write(&event);

    if event.level.is_fatal() {
        // Termination supersedes any write failure
        terminator.terminate(FATAL_EXIT_CODE);
    } else if let Err(e) = written {
        eprintln!(
            "[LOGGER ERROR] Appender '{}' failed: {}",
            backend.appender.name(),
            e
        );
    }

    event.complete();
}
