// gitauto-rs: Git Task Automation
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Commit message composition.
//!
//! ```text
//! template + (timestamp_format empty ? "" : " " + clock.now().format(timestamp_format))
//! ```

use std::fmt::Write as _;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, Local, NaiveDate};

/// Source of the current local time, offset included so `%z` can be formatted.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Wall clock in local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// Clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl FixedClock {
    /// Midnight UTC of the given date, or the Unix epoch for an invalid date.
    #[must_use]
    pub fn at_date(year: i32, month: u32, day: u32) -> Self {
        let date = NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default();
        Self(
            date.and_hms_opt(0, 0, 0)
                .unwrap_or_default()
                .and_utc()
                .fixed_offset(),
        )
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

/// Checks a strftime format string without formatting anything.
///
/// # Errors
///
/// Returns a description of the problem when the format has an invalid specifier.
pub fn validate_timestamp_format(format: &str) -> Result<(), String> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        Err(format!("'{format}' is not a valid strftime format"))
    } else {
        Ok(())
    }
}

/// Builds the commit message for one run.
///
/// # Errors
///
/// Returns a description of the problem when `timestamp_format` is invalid.
pub fn compose_message(
    template: &str,
    timestamp_format: &str,
    clock: &dyn Clock,
) -> Result<String, String> {
    if timestamp_format.is_empty() {
        return Ok(template.to_string());
    }
    validate_timestamp_format(timestamp_format)?;

    let mut message = String::with_capacity(template.len() + timestamp_format.len() + 8);
    message.push_str(template);
    message.push(' ');
    write!(
        message,
        "{}",
        clock
            .now()
            .format_with_items(StrftimeItems::new(timestamp_format))
    )
    .map_err(|_| format!("cannot format timestamp with '{timestamp_format}'"))?;
    Ok(message)
}
