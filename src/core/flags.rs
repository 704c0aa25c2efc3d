//! Line-formatting flags and the prefix resolver
//!
//! The low bits follow the conventional line-formatting set (date, time,
//! microseconds, caller location, UTC, message-prefix placement). Flags owned
//! by this crate are allocated from the high end of the 32-bit range so they
//! never collide with the formatting bits.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign, BitXor};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Flags(u32);

impl Flags {
    pub const NONE: Flags = Flags(0);
    /// Local date: `2009/01/23`
    pub const DATE: Flags = Flags(1);
    /// Local time: `01:23:23`
    pub const TIME: Flags = Flags(1 << 1);
    /// Microsecond resolution: `01:23:23.123123`, implies TIME
    pub const MICROSECONDS: Flags = Flags(1 << 2);
    /// Full file path and line number of the call site
    pub const LONG_FILE: Flags = Flags(1 << 3);
    /// Final file name element and line number, overrides LONG_FILE
    pub const SHORT_FILE: Flags = Flags(1 << 4);
    /// Use UTC rather than the local time zone
    pub const UTC: Flags = Flags(1 << 5);
    /// Place the prefix right before the message instead of at line start
    pub const MSG_PREFIX: Flags = Flags(1 << 6);
    pub const STD: Flags = Flags(Self::DATE.0 | Self::TIME.0);

    /// Do not put the process identifier into the line prefix
    pub const NO_PID: Flags = Flags(1 << 31);

    /// Flags that are applied regardless of what the caller asked for
    pub const ALWAYS: Flags = Self::MSG_PREFIX;

    const NAMES: [(&'static str, Flags); 8] = [
        ("date", Self::DATE),
        ("time", Self::TIME),
        ("microseconds", Self::MICROSECONDS),
        ("longfile", Self::LONG_FILE),
        ("shortfile", Self::SHORT_FILE),
        ("utc", Self::UTC),
        ("msgprefix", Self::MSG_PREFIX),
        ("nopid", Self::NO_PID),
    ];

    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Flags(bits)
    }

    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn contains(self, other: Flags) -> bool {
        self.0 & other.0 == other.0
    }

    #[must_use]
    pub const fn intersects(self, other: Flags) -> bool {
        self.0 & other.0 != 0
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// The flag set actually used for formatting: `self` plus [`Flags::ALWAYS`]
    #[must_use]
    pub const fn effective(self) -> Self {
        Flags(self.0 | Self::ALWAYS.0)
    }
}

impl BitOr for Flags {
    type Output = Flags;

    fn bitor(self, rhs: Flags) -> Flags {
        Flags(self.0 | rhs.0)
    }
}

impl BitOrAssign for Flags {
    fn bitor_assign(&mut self, rhs: Flags) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Flags {
    type Output = Flags;

    fn bitand(self, rhs: Flags) -> Flags {
        Flags(self.0 & rhs.0)
    }
}

impl BitXor for Flags {
    type Output = Flags;

    fn bitxor(self, rhs: Flags) -> Flags {
        Flags(self.0 ^ rhs.0)
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }

        let mut rest = self.0;
        let mut first = true;
        for (name, flag) in Self::NAMES {
            if self.contains(flag) {
                if !first {
                    f.write_str("|")?;
                }
                f.write_str(name)?;
                rest &= !flag.0;
                first = false;
            }
        }

        if rest != 0 {
            if !first {
                f.write_str("|")?;
            }
            write!(f, "{:#x}", rest)?;
        }
        Ok(())
    }
}

impl FromStr for Flags {
    type Err = String;

    /// Parse `"date|time|nopid"`; `|` or `,` separate names, case is ignored
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut flags = Flags::NONE;

        for token in s.split(['|', ',']).map(str::trim) {
            let lower = token.to_lowercase();
            match lower.as_str() {
                "" | "none" => {}
                "std" => flags |= Flags::STD,
                _ => {
                    if let Some(hex) = lower.strip_prefix("0x") {
                        let bits = u32::from_str_radix(hex, 16)
                            .map_err(|_| format!("Invalid log flag: '{}'", token))?;
                        flags |= Flags(bits);
                        continue;
                    }

                    let (_, flag) = Self::NAMES
                        .iter()
                        .find(|(name, _)| *name == lower)
                        .ok_or_else(|| format!("Invalid log flag: '{}'", token))?;
                    flags |= *flag;
                }
            }
        }

        Ok(flags)
    }
}

impl Serialize for Flags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Flags {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FlagsVisitor;

        impl Visitor<'_> for FlagsVisitor {
            type Value = Flags;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a flag list such as \"date|time|nopid\" or a bit mask")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Flags, E> {
                v.parse().map_err(E::custom)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Flags, E> {
                u32::try_from(v)
                    .map(Flags)
                    .map_err(|_| E::custom(format!("flag mask out of range: {}", v)))
            }
        }

        deserializer.deserialize_any(FlagsVisitor)
    }
}

/// Outcome of resolving the application name and flags into a line prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prefix {
    /// Application name as given by the caller
    pub app_name: String,
    /// Prefix written in front of every message
    pub line: String,
    /// Caller flags plus [`Flags::ALWAYS`]
    pub flags: Flags,
}

impl Prefix {
    /// Derive the line prefix:
    ///
    /// - `"<app>[<pid>]: "` unless [`Flags::NO_PID`] is set
    /// - `"<app>: "` with NO_PID and a non-empty application name
    /// - `""` otherwise
    #[must_use]
    pub fn resolve(app_name: &str, pid: u32, flags: Flags) -> Self {
        let line = if !flags.contains(Flags::NO_PID) {
            format!("{}[{}]: ", app_name, pid)
        } else if !app_name.is_empty() {
            format!("{}: ", app_name)
        } else {
            String::new()
        };

        Self {
            app_name: app_name.to_string(),
            line,
            flags: flags.effective(),
        }
    }
}
