//! Appender implementations

pub mod console;
pub mod file;

pub use console::ConsoleAppender;
pub use file::{FileAppender, DEFAULT_PERM_MODE};

pub use crate::core::Appender;
