//! Serializable logger settings

use super::error::{LogError, Result};
use super::flags::Flags;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Settings consumed by [`Logger::open_with`](crate::Logger::open_with)
///
/// # Example
///
/// ```
/// use svclog::{Flags, LogConfig};
///
/// let config = LogConfig::from_json(r#"{
///     "path": "/var/log/app.log",
///     "app_name": "app",
///     "flags": "date|time|nopid"
/// }"#).unwrap();
/// assert_eq!(config.flags, Flags::STD | Flags::NO_PID);
/// assert!(!config.debug);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Log file; empty selects stderr
    pub path: PathBuf,
    pub app_name: String,
    pub flags: Flags,
    pub debug: bool,
}

impl LogConfig {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, app_name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            app_name: app_name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_flags(mut self, flags: Flags) -> Self {
        self.flags = flags;
        self
    }

    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| LogError::op("invalid log configuration", e))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| LogError::op("cannot serialize log configuration", e))
    }
}
