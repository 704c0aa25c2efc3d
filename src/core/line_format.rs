//! Rendering of a single log line
//!
//! A line is laid out as `<header><prefix><message>\n`, where the header holds
//! the optional date, time and call-site segments selected by [`Flags`].
//! Without [`Flags::MSG_PREFIX`] the prefix moves in front of the header.

use super::flags::Flags;
use chrono::{DateTime, Local, TimeZone, Utc};
use std::fmt::{Display, Write as _};
use std::panic::Location;
use std::path::Path;

/// Prefix and flags applied to every line written to one destination
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineFormat {
    prefix: String,
    flags: Flags,
}

impl LineFormat {
    #[must_use]
    pub fn new(prefix: impl Into<String>, flags: Flags) -> Self {
        Self {
            prefix: prefix.into(),
            flags,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn flags(&self) -> Flags {
        self.flags
    }

    /// Render `message` stamped with the current time
    #[must_use]
    pub fn render(&self, message: &str, location: Option<&Location<'_>>) -> String {
        self.render_at(&Utc::now(), message, location)
    }

    /// Render `message` as if it was logged at `now`
    #[must_use]
    pub fn render_at(
        &self,
        now: &DateTime<Utc>,
        message: &str,
        location: Option<&Location<'_>>,
    ) -> String {
        let mut line = String::with_capacity(self.prefix.len() + message.len() + 48);

        if !self.flags.contains(Flags::MSG_PREFIX) {
            line.push_str(&self.prefix);
        }

        if self
            .flags
            .intersects(Flags::DATE | Flags::TIME | Flags::MICROSECONDS)
        {
            if self.flags.contains(Flags::UTC) {
                push_timestamp(&mut line, self.flags, now);
            } else {
                push_timestamp(&mut line, self.flags, &now.with_timezone(&Local));
            }
        }

        if self.flags.intersects(Flags::SHORT_FILE | Flags::LONG_FILE) {
            let (file, line_no) = match location {
                Some(loc) => (loc.file(), loc.line()),
                None => ("???", 0),
            };
            let file = if self.flags.contains(Flags::SHORT_FILE) {
                Path::new(file)
                    .file_name()
                    .and_then(|name| name.to_str())
                    .unwrap_or(file)
            } else {
                file
            };
            let _ = write!(line, "{}:{}: ", file, line_no);
        }

        if self.flags.contains(Flags::MSG_PREFIX) {
            line.push_str(&self.prefix);
        }

        line.push_str(message);
        if !message.ends_with('\n') {
            line.push('\n');
        }
        line
    }
}

fn push_timestamp<Tz>(line: &mut String, flags: Flags, at: &DateTime<Tz>)
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if flags.contains(Flags::DATE) {
        let _ = write!(line, "{} ", at.format("%Y/%m/%d"));
    }
    if flags.intersects(Flags::TIME | Flags::MICROSECONDS) {
        let _ = write!(line, "{}", at.format("%H:%M:%S"));
        if flags.contains(Flags::MICROSECONDS) {
            let _ = write!(line, "{}", at.format("%.6f"));
        }
        line.push(' ');
    }
}
