//! Process termination strategy used by fatal messages

/// Exit status used after a fatal message has been written
pub const FATAL_EXIT_CODE: i32 = 1;

/// What the writer does after a fatal line reaches the backend
pub trait Terminate: Send + Sync {
    fn terminate(&self, code: i32);
}

/// Exit the process, the behavior for production loggers
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessExit;

impl Terminate for ProcessExit {
    fn terminate(&self, code: i32) {
        std::process::exit(code);
    }
}

/// Keep running after fatal messages; used by tests
#[derive(Debug, Default, Clone, Copy)]
pub struct NoExit;

impl Terminate for NoExit {
    fn terminate(&self, _code: i32) {}
}
