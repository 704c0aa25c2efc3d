//! Error types for the logger system

use std::io;
use std::path::{Path, PathBuf};

pub type Result<T> = std::result::Result<T, LogError>;

/// Coarse classification of a [`LogError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Generic operation failure (writer thread, configuration)
    OpFailure,
    /// Opening, writing or closing the log file failed at the OS level
    FileFailure,
    /// `close` was called on a log that is not open
    AlreadyClosed,
}

#[derive(Debug, thiserror::Error)]
pub enum LogError {
    /// Generic operation error with an optional cause
    #[error("{message}")]
    Op {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// OS-level failure on the log file
    #[error("cannot {action} log file '{}': {source}", path.display())]
    File {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Close on a closed or never opened log
    #[error("log already closed/not opened yet")]
    Closed,
}

impl LogError {
    /// Create an operation error that wraps `source`
    pub fn op<E>(message: impl Into<String>, source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        LogError::Op {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Create an operation error without a cause
    pub fn op_msg(message: impl Into<String>) -> Self {
        LogError::Op {
            message: message.into(),
            source: None,
        }
    }

    /// Create a file error for `action` ("open", "write", "close") on `path`
    pub fn file(action: &'static str, path: impl AsRef<Path>, source: io::Error) -> Self {
        LogError::File {
            action,
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            LogError::Op { .. } => ErrorKind::OpFailure,
            LogError::File { .. } => ErrorKind::FileFailure,
            LogError::Closed => ErrorKind::AlreadyClosed,
        }
    }

    /// The underlying OS error, if this error wraps one
    pub fn io_error(&self) -> Option<&io::Error> {
        match self {
            LogError::File { source, .. } => Some(source),
            LogError::Op {
                source: Some(source),
                ..
            } => source.downcast_ref::<io::Error>(),
            _ => None,
        }
    }

    /// The cause is a missing file or directory
    pub fn is_not_found(&self) -> bool {
        self.io_error()
            .is_some_and(|e| e.kind() == io::ErrorKind::NotFound)
    }

    pub fn is_permission_denied(&self) -> bool {
        self.io_error()
            .is_some_and(|e| e.kind() == io::ErrorKind::PermissionDenied)
    }

    /// The cause is a descriptor that was already closed
    pub fn is_bad_descriptor(&self) -> bool {
        self.io_error()
            .and_then(io::Error::raw_os_error)
            .is_some_and(|code| code == BAD_DESCRIPTOR)
    }
}

#[cfg(unix)]
const BAD_DESCRIPTOR: i32 = libc::EBADF;

// ERROR_INVALID_HANDLE
#[cfg(not(unix))]
const BAD_DESCRIPTOR: i32 = 6;
