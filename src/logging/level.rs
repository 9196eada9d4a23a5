// gitauto-rs: Git Task Automation
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Verbosity on the 0-6 scale accepted by `--log-level`.
///
/// `Debug` shows every git and shell invocation. `Dump` is `Trace` with
/// dependency crates uncapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LogLevel {
    Silent,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
    Dump,
}

impl LogLevel {
    const ALL: [Self; 7] = [
        Self::Silent,
        Self::Error,
        Self::Warn,
        Self::Info,
        Self::Debug,
        Self::Trace,
        Self::Dump,
    ];

    /// Level for a number on the 0-6 scale.
    ///
    /// # Errors
    ///
    /// `ConfigError::InvalidValue` above 6.
    pub fn new(level: u8) -> Result<Self, ConfigError> {
        Self::ALL
            .get(usize::from(level))
            .copied()
            .ok_or_else(|| invalid(format!("log level must be 0-6, got {level}")))
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Silent => "silent",
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
            Self::Dump => "dump",
        }
    }

    /// `EnvFilter` directives. Dependencies stay at `warn` below `Dump`.
    #[must_use]
    pub fn directives(self) -> String {
        match self {
            Self::Silent => "off".to_string(),
            Self::Error => "error".to_string(),
            Self::Dump => "trace".to_string(),
            own => format!("warn,gitauto_rs={own},gitauto={own}"),
        }
    }
}

fn invalid(message: String) -> ConfigError {
    ConfigError::InvalidValue {
        task: "*".to_string(),
        key: "log_level".to_string(),
        message,
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    /// A number (`4`) or a name (`debug`), case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.parse::<u8>() {
            Ok(level) => Self::new(level),
            Err(_) => Self::ALL
                .into_iter()
                .find(|level| level.name().eq_ignore_ascii_case(s))
                .ok_or_else(|| invalid(format!("unknown log level '{s}'"))),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
