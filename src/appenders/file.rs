//! File appender implementation

use crate::core::{Appender, LogError, Result};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Permission bits for newly created log files
pub const DEFAULT_PERM_MODE: u32 = 0o644;

/// Appends lines to a file opened write-only in append mode
///
/// Every line is handed to the OS with a single write; nothing is buffered in
/// process, so a line is on its way to disk once `append` returns.
#[derive(Debug)]
pub struct FileAppender {
    path: PathBuf,
    file: File,
}

impl FileAppender {
    /// Open `path` for appending, creating it if missing
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let mut options = OpenOptions::new();
        options.append(true).create(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(DEFAULT_PERM_MODE);
        }

        let file = options
            .open(&path)
            .map_err(|e| LogError::file("open", &path, e))?;

        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Appender for FileAppender {
    fn append(&mut self, line: &str) -> Result<()> {
        self.file
            .write_all(line.as_bytes())
            .map_err(|e| LogError::file("write", &self.path, e))
    }

    fn close(self: Box<Self>) -> Result<()> {
        let FileAppender { path, file } = *self;
        close_file(file).map_err(|e| LogError::file("close", &path, e))
    }

    fn is_default_stream(&self) -> bool {
        false
    }

    fn name(&self) -> &str {
        "file"
    }
}

#[cfg(unix)]
fn close_file(file: File) -> io::Result<()> {
    use std::os::unix::io::IntoRawFd;

    let fd = file.into_raw_fd();
    // SAFETY: `into_raw_fd` released ownership of `fd`, nothing else closes it.
    if unsafe { libc::close(fd) } == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

#[cfg(not(unix))]
fn close_file(file: File) -> io::Result<()> {
    file.sync_all()
}
